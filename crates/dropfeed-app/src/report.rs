// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Machine-readable snapshot of the ad runtime.

use std::collections::BTreeMap;

use dropfeed_ads::{ActiveProvider, ProbeReport};
use dropfeed_core::config::{AdSlotIds, BuildTarget};
use dropfeed_core::types::PlatformInfo;
use serde::Serialize;

use crate::services::ad_services::AdServices;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub build_target: BuildTarget,
    pub platform: PlatformInfo,
    /// Evidence behind `platform`; empty when detection fell back.
    pub probes: Vec<ProbeReport>,
    pub features: BTreeMap<&'static str, bool>,
    pub active_provider: ActiveProvider,
    pub ready: bool,
    pub slots: AdSlotIds,
}

impl StatusReport {
    pub fn collect(services: &AdServices) -> Self {
        let detector = services.detector();
        Self {
            build_target: services.config().build_target,
            platform: *detector.platform_info(),
            probes: detector.probes().to_vec(),
            features: services.flags().snapshot(),
            active_provider: services.manager().active_provider(),
            ready: services.is_ready(),
            slots: services.config().slots.clone(),
        }
    }
}
