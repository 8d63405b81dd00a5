// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ad manager: the single entry point for showing ads.
//
// Picks at most one provider from the platform classification when it is
// built, then routes each call to it. Calls that do not apply to the current
// platform (a mobile banner on the web, an interstitial in a browser) are
// silent no-ops: callers pass the options for every platform and let the
// manager pick.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use dropfeed_bridge::{NativeAdSdk, WebDocument};
use dropfeed_core::config::AdManagerConfig;
use dropfeed_core::error::{AdError, Result};
use dropfeed_core::types::{AdSlot, BannerOptions, InterstitialOptions, RewardOptions};

use crate::admob::AdMobProvider;
use crate::adsense::AdSenseProvider;
use crate::platform::PlatformDetector;

/// The provider chosen for this runtime.
pub enum AdProvider {
    WebAdSense(AdSenseProvider),
    NativeAdMob(AdMobProvider),
    NoProvider,
}

/// Which network, if any, is currently serving ads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveProvider {
    AdSense,
    AdMob,
    None,
}

impl ActiveProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdSense => "adsense",
            Self::AdMob => "admob",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for ActiveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a web banner goes: which slot, rendered into which element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebBannerOptions {
    pub slot: AdSlot,
    pub container_id: String,
}

/// A banner request carrying options for each platform. Either side may be
/// omitted; only the one matching the runtime is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerPlacement {
    pub web: Option<WebBannerOptions>,
    pub mobile: Option<BannerOptions>,
}

impl BannerPlacement {
    pub fn web(slot: AdSlot, container_id: impl Into<String>) -> Self {
        Self {
            web: Some(WebBannerOptions {
                slot,
                container_id: container_id.into(),
            }),
            mobile: None,
        }
    }

    pub fn mobile(options: BannerOptions) -> Self {
        Self {
            web: None,
            mobile: Some(options),
        }
    }

    pub fn with_mobile(mut self, options: BannerOptions) -> Self {
        self.mobile = Some(options);
        self
    }
}

pub struct AdManager {
    detector: Arc<PlatformDetector>,
    provider: AdProvider,
}

impl AdManager {
    /// Build a manager over explicit bridge implementations. Only the
    /// provider the detector allows is constructed.
    pub fn new(
        config: AdManagerConfig,
        detector: Arc<PlatformDetector>,
        document: Arc<dyn WebDocument>,
        sdk: Arc<dyn NativeAdSdk>,
    ) -> Self {
        let provider = if detector.should_use_adsense() {
            AdProvider::WebAdSense(AdSenseProvider::new(config.adsense, document))
        } else if detector.should_use_admob() {
            AdProvider::NativeAdMob(AdMobProvider::new(config.admob, sdk))
        } else {
            AdProvider::NoProvider
        };

        let manager = Self { detector, provider };
        info!(provider = %manager.provider_name(), "ad manager ready");
        manager
    }

    /// Build a manager over the default bridge for the current target.
    pub fn from_bridge(config: AdManagerConfig, detector: Arc<PlatformDetector>) -> Self {
        Self::new(
            config,
            detector,
            dropfeed_bridge::web_document(),
            dropfeed_bridge::native_ad_sdk(),
        )
    }

    /// The process-wide manager.
    ///
    /// The first call must carry a configuration; later calls may pass
    /// `None` and get the same instance. A configuration passed after the
    /// manager exists is ignored.
    pub fn get_instance(config: Option<AdManagerConfig>) -> Result<&'static AdManager> {
        static INSTANCE: OnceLock<AdManager> = OnceLock::new();

        if let Some(manager) = INSTANCE.get() {
            if config.is_some() {
                debug!("ad manager already built; ignoring new configuration");
            }
            return Ok(manager);
        }

        let config = config.ok_or(AdError::NotConfigured)?;
        Ok(INSTANCE.get_or_init(|| Self::from_bridge(config, PlatformDetector::shared())))
    }

    /// Initialise the active provider. A no-op when there is none.
    pub async fn initialize(&self) -> Result<()> {
        match &self.provider {
            AdProvider::WebAdSense(adsense) => adsense.initialize().await,
            AdProvider::NativeAdMob(admob) => admob.initialize().await,
            AdProvider::NoProvider => Ok(()),
        }
    }

    pub async fn show_banner(&self, placement: &BannerPlacement) -> Result<()> {
        match (&self.provider, &placement.web, &placement.mobile) {
            (AdProvider::WebAdSense(adsense), Some(web), _)
                if self.detector.should_use_adsense() =>
            {
                adsense.display_ad(&web.slot, &web.container_id).await
            }
            (AdProvider::NativeAdMob(admob), _, Some(mobile))
                if self.detector.should_use_admob() =>
            {
                admob.show_banner(mobile).await
            }
            _ => {
                self.skip("banner");
                Ok(())
            }
        }
    }

    pub async fn hide_banner(&self) {
        match self.native() {
            Some(admob) => admob.hide_banner().await,
            None => self.skip("hide banner"),
        }
    }

    pub async fn show_interstitial(&self, options: &InterstitialOptions) -> Result<()> {
        match self.native() {
            Some(admob) => admob.show_interstitial(options).await,
            None => {
                self.skip("interstitial");
                Ok(())
            }
        }
    }

    pub async fn show_reward_video(&self, options: &RewardOptions) -> Result<()> {
        match self.native() {
            Some(admob) => admob.show_reward_video(options).await,
            None => {
                self.skip("reward video");
                Ok(())
            }
        }
    }

    pub fn is_adsense_enabled(&self) -> bool {
        matches!(&self.provider, AdProvider::WebAdSense(adsense) if adsense.is_enabled())
    }

    pub fn is_admob_enabled(&self) -> bool {
        matches!(&self.provider, AdProvider::NativeAdMob(admob) if admob.is_enabled())
    }

    /// The first enabled network, AdSense checked first.
    pub fn active_provider(&self) -> ActiveProvider {
        if self.is_adsense_enabled() {
            ActiveProvider::AdSense
        } else if self.is_admob_enabled() {
            ActiveProvider::AdMob
        } else {
            ActiveProvider::None
        }
    }

    pub fn provider(&self) -> &AdProvider {
        &self.provider
    }

    pub fn detector(&self) -> &PlatformDetector {
        &self.detector
    }

    fn native(&self) -> Option<&AdMobProvider> {
        match &self.provider {
            AdProvider::NativeAdMob(admob) if self.detector.should_use_admob() => Some(admob),
            _ => None,
        }
    }

    fn skip(&self, call: &str) {
        debug!(call, provider = %self.provider_name(), "not applicable on this platform");
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            AdProvider::WebAdSense(_) => "adsense",
            AdProvider::NativeAdMob(_) => "admob",
            AdProvider::NoProvider => "none",
        }
    }
}

/// Turns an ad failure into "no ad here" at UI-facing call sites.
pub trait AdResultExt<T> {
    /// `Some` on success. On failure logs against `placement` and returns
    /// `None`; configuration errors are logged as errors, the rest as
    /// warnings.
    fn or_skip_ad(self, placement: &str) -> Option<T>;
}

impl<T> AdResultExt<T> for Result<T> {
    fn or_skip_ad(self, placement: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) if e.is_degradable() => {
                warn!(placement, error = %e, "ad unavailable; skipping");
                None
            }
            Err(e) => {
                error!(placement, error = %e, "ad misconfigured; skipping");
                None
            }
        }
    }
}
