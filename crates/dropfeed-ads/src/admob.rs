// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native in-app ad provider.
//
// Wraps the native ad plugin. Every presentation call initialises the SDK
// first if needed. In test mode every placement is swapped for the
// network's reserved sample unit so a development build can never request
// (or bill) live inventory.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use dropfeed_bridge::{AdLoadOptions, AdMobInitOptions, BannerAdOptions, NativeAdSdk};
use dropfeed_core::config::AdMobConfig;
use dropfeed_core::error::{AdError, Result};
use dropfeed_core::types::{BannerOptions, InterstitialOptions, RewardOptions};

/// Reserved sample units published by the network for development.
pub const TEST_BANNER_AD_ID: &str = "ca-app-pub-3940256099942544/6300978111";
pub const TEST_INTERSTITIAL_AD_ID: &str = "ca-app-pub-3940256099942544/1033173712";
pub const TEST_REWARD_AD_ID: &str = "ca-app-pub-3940256099942544/5224354917";

pub struct AdMobProvider {
    config: AdMobConfig,
    sdk: Arc<dyn NativeAdSdk>,
    initialized: OnceCell<()>,
}

impl AdMobProvider {
    pub fn new(config: AdMobConfig, sdk: Arc<dyn NativeAdSdk>) -> Self {
        Self {
            config,
            sdk,
            initialized: OnceCell::new(),
        }
    }

    /// Initialise the SDK, at most once. Failures propagate: without an
    /// initialised SDK no other call can succeed.
    pub async fn initialize(&self) -> Result<()> {
        self.initialized
            .get_or_try_init(|| async {
                let options = AdMobInitOptions {
                    request_tracking_authorization: true,
                    testing_devices: self.config.test_device_ids.clone(),
                    initialize_for_testing: self.config.test_mode,
                };
                self.sdk.initialize(&options).await?;
                info!(
                    app_id = %self.config.app_id,
                    test_mode = self.config.test_mode,
                    "native ad SDK initialised"
                );
                Ok::<(), AdError>(())
            })
            .await
            .map(|_| ())
    }

    pub async fn show_banner(&self, options: &BannerOptions) -> Result<()> {
        self.initialize().await?;
        let request = BannerAdOptions {
            ad_id: self.ad_unit(&options.ad_id, TEST_BANNER_AD_ID),
            ad_size: options.size,
            position: options.position,
            margin: options.margin,
            is_testing: self.config.test_mode,
        };
        self.sdk.show_banner(&request).await
    }

    /// Best effort: there may be no banner to hide.
    pub async fn hide_banner(&self) {
        if let Err(e) = self.sdk.hide_banner().await {
            warn!(error = %e, "hide banner failed");
        }
    }

    /// Fetch, then present, a full-screen interstitial.
    pub async fn show_interstitial(&self, options: &InterstitialOptions) -> Result<()> {
        self.initialize().await?;
        let request = self.load_options(&options.ad_id, TEST_INTERSTITIAL_AD_ID);
        self.sdk.prepare_interstitial(&request).await?;
        self.sdk.show_interstitial().await
    }

    /// Fetch, then present, a rewarded video.
    pub async fn show_reward_video(&self, options: &RewardOptions) -> Result<()> {
        self.initialize().await?;
        let request = self.load_options(&options.ad_id, TEST_REWARD_AD_ID);
        self.sdk.prepare_reward_video(&request).await?;
        self.sdk.show_reward_video().await
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    fn load_options(&self, ad_id: &str, test_id: &str) -> AdLoadOptions {
        AdLoadOptions {
            ad_id: self.ad_unit(ad_id, test_id),
            is_testing: self.config.test_mode,
        }
    }

    fn ad_unit(&self, requested: &str, test_id: &str) -> String {
        if self.config.test_mode {
            debug!(requested, substitute = test_id, "test mode: using sample ad unit");
            test_id.to_string()
        } else {
            requested.to_string()
        }
    }
}
