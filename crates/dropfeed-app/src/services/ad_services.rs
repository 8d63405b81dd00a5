// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition root for the ad runtime.
//
// Detection, flags and the manager are built exactly once per process and
// shared by every caller through cheap clones of this struct.

use std::sync::{Arc, OnceLock};

use dropfeed_ads::{AdManager, AdProvider, BannerPlacement, FeatureFlags, PlatformDetector};
use dropfeed_core::AppConfig;
use dropfeed_core::config::AdSlotIds;
use dropfeed_core::error::Result;
use tracing::{debug, info};

use crate::report::StatusReport;

/// The catalog's fixed banner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    Header,
    Sidebar,
    Article,
}

impl PagePosition {
    /// Id of the element the page reserves for this position.
    pub fn container_id(&self) -> &'static str {
        match self {
            Self::Header => "ad-banner",
            Self::Sidebar => "ad-sidebar",
            Self::Article => "ad-article",
        }
    }

    /// Options for both networks; the manager uses whichever applies.
    pub fn placement(&self, slots: &AdSlotIds) -> BannerPlacement {
        let slot = match self {
            Self::Header => slots.banner_slot(),
            Self::Sidebar => slots.sidebar_slot(),
            Self::Article => slots.article_slot(),
        };
        BannerPlacement::web(slot, self.container_id()).with_mobile(slots.mobile_banner())
    }
}

#[derive(Clone)]
pub struct AdServices {
    config: Arc<AppConfig>,
    flags: Arc<FeatureFlags>,
    manager: &'static AdManager,
}

impl AdServices {
    /// Build the process-wide services. Call once at startup; later calls
    /// return the first call's services and ignore their configuration.
    pub fn init(config: AppConfig) -> Result<Self> {
        static SERVICES: OnceLock<AdServices> = OnceLock::new();

        if let Some(services) = SERVICES.get() {
            debug!("ad services already built; ignoring new configuration");
            return Ok(services.clone());
        }

        let manager = AdManager::get_instance(Some(config.ads.clone()))?;
        let flags = FeatureFlags::new(config.build_target, PlatformDetector::shared());

        info!(
            build_target = ?config.build_target,
            provider = %manager.active_provider(),
            "ad services initialised"
        );

        let services = Self {
            config: Arc::new(config),
            flags: Arc::new(flags),
            manager,
        };
        Ok(SERVICES.get_or_init(|| services).clone())
    }

    /// Load the active provider's script or SDK.
    pub async fn initialize(&self) -> Result<()> {
        self.manager.initialize().await
    }

    /// Show the configured banner for `position`.
    pub async fn show_banner(&self, position: PagePosition) -> Result<()> {
        let placement = position.placement(&self.config.slots);
        self.manager.show_banner(&placement).await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn detector(&self) -> &PlatformDetector {
        self.manager.detector()
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn manager(&self) -> &'static AdManager {
        self.manager
    }

    /// Whether the active provider finished loading.
    pub fn is_ready(&self) -> bool {
        match self.manager.provider() {
            AdProvider::WebAdSense(adsense) => adsense.is_initialized(),
            AdProvider::NativeAdMob(admob) => admob.is_initialized(),
            AdProvider::NoProvider => false,
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport::collect(self)
    }
}
