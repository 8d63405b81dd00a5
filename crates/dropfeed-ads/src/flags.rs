// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Feature flags gated on build target and runtime platform.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use dropfeed_core::config::BuildTarget;
use dropfeed_core::error::AdError;

use crate::platform::PlatformDetector;

/// Flag names as the front end spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureFlag {
    ServerSideRendering,
    ApiRoutes,
    WebPushNotifications,
    NativePushNotifications,
    AdSense,
    AdMob,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 6] = [
        Self::ServerSideRendering,
        Self::ApiRoutes,
        Self::WebPushNotifications,
        Self::NativePushNotifications,
        Self::AdSense,
        Self::AdMob,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ServerSideRendering => "serverSideRendering",
            Self::ApiRoutes => "apiRoutes",
            Self::WebPushNotifications => "webPushNotifications",
            Self::NativePushNotifications => "nativePushNotifications",
            Self::AdSense => "adSense",
            Self::AdMob => "adMob",
        }
    }
}

impl FromStr for FeatureFlag {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| AdError::Config(format!("unknown feature flag: {s}")))
    }
}

/// Capability switches. Build-target flags are fixed at construction; the ad
/// flags ask the detector on every call.
#[derive(Debug, Clone)]
pub struct FeatureFlags {
    pub server_side_rendering: bool,
    pub api_routes: bool,
    pub web_push_notifications: bool,
    pub native_push_notifications: bool,
    detector: Arc<PlatformDetector>,
}

impl FeatureFlags {
    pub fn new(target: BuildTarget, detector: Arc<PlatformDetector>) -> Self {
        let web = target == BuildTarget::Web;
        let native = detector.platform_info().is_native_app;
        Self {
            server_side_rendering: web,
            api_routes: web,
            web_push_notifications: web && !native,
            native_push_notifications: !web && native,
            detector,
        }
    }

    pub fn ad_sense(&self) -> bool {
        self.detector.should_use_adsense()
    }

    pub fn ad_mob(&self) -> bool {
        self.detector.should_use_admob()
    }

    pub fn get(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::ServerSideRendering => self.server_side_rendering,
            FeatureFlag::ApiRoutes => self.api_routes,
            FeatureFlag::WebPushNotifications => self.web_push_notifications,
            FeatureFlag::NativePushNotifications => self.native_push_notifications,
            FeatureFlag::AdSense => self.ad_sense(),
            FeatureFlag::AdMob => self.ad_mob(),
        }
    }

    /// Look a flag up by name. Unknown names are off.
    pub fn get_feature_flag(&self, name: &str) -> bool {
        name.parse::<FeatureFlag>().is_ok_and(|flag| self.get(flag))
    }

    /// Every flag by name, evaluated now.
    pub fn snapshot(&self) -> BTreeMap<&'static str, bool> {
        FeatureFlag::ALL
            .into_iter()
            .map(|flag| (flag.name(), self.get(flag)))
            .collect()
    }
}
