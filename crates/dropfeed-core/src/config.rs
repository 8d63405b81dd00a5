// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Everything here is read once at startup, either from the process
// environment or from a JSON file, and never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AdSlot, BannerOptions, InterstitialOptions, RewardOptions};

/// Which artefact is being built: the server-rendered web site or the static
/// export bundled into the mobile shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    #[default]
    Web,
    Mobile,
}

impl BuildTarget {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobile" | "capacitor" | "app" => Self::Mobile,
            _ => Self::Web,
        }
    }
}

/// Browser ad network settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdSenseConfig {
    /// Publisher id, e.g. `ca-pub-1234567890123456`.
    pub client_id: String,
    pub enabled: bool,
    /// Never serve real ads; placeholders are marked as test traffic.
    pub test_mode: bool,
}

/// Native in-app ad SDK settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdMobConfig {
    pub app_id: String,
    pub enabled: bool,
    /// Substitute the reserved sample ad units for every placement.
    pub test_mode: bool,
    /// Devices that always receive test ads.
    pub test_device_ids: Vec<String>,
}

/// Both provider configurations, supplied once to the ad manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdManagerConfig {
    pub adsense: AdSenseConfig,
    pub admob: AdMobConfig,
}

/// Web slot identifiers for the catalog's fixed placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebSlotIds {
    pub banner: String,
    pub sidebar: String,
    pub article: String,
}

/// Native ad unit identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MobileAdUnitIds {
    pub banner: String,
    pub interstitial: String,
    pub reward: String,
}

/// Per-placement identifiers for both networks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdSlotIds {
    pub web: WebSlotIds,
    pub mobile: MobileAdUnitIds,
}

impl AdSlotIds {
    pub fn banner_slot(&self) -> AdSlot {
        AdSlot::auto(&self.web.banner)
    }

    pub fn sidebar_slot(&self) -> AdSlot {
        AdSlot::fixed(&self.web.sidebar, 300, 600)
    }

    pub fn article_slot(&self) -> AdSlot {
        AdSlot::auto(&self.web.article)
    }

    pub fn mobile_banner(&self) -> BannerOptions {
        BannerOptions::new(&self.mobile.banner)
    }

    pub fn interstitial(&self) -> InterstitialOptions {
        InterstitialOptions {
            ad_id: self.mobile.interstitial.clone(),
        }
    }

    pub fn reward(&self) -> RewardOptions {
        RewardOptions {
            ad_id: self.mobile.reward.clone(),
        }
    }
}

/// Complete runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub build_target: BuildTarget,
    pub ads: AdManagerConfig,
    pub slots: AdSlotIds,
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup. Missing keys fall back
    /// to defaults (disabled providers, empty identifiers, web build).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let flag = |key: &str| lookup(key).is_some_and(|v| parse_bool(&v));
        let test_mode = flag("ADS_TEST_MODE");

        Self {
            build_target: lookup("DROPFEED_BUILD_TARGET")
                .map(|v| BuildTarget::parse(&v))
                .unwrap_or_default(),
            ads: AdManagerConfig {
                adsense: AdSenseConfig {
                    client_id: text("ADSENSE_CLIENT_ID"),
                    enabled: flag("ADSENSE_ENABLED"),
                    test_mode,
                },
                admob: AdMobConfig {
                    app_id: text("ADMOB_APP_ID"),
                    enabled: flag("ADMOB_ENABLED"),
                    test_mode,
                    test_device_ids: split_list(&text("ADMOB_TEST_DEVICE_IDS")),
                },
            },
            slots: AdSlotIds {
                web: WebSlotIds {
                    banner: text("ADSENSE_SLOT_BANNER"),
                    sidebar: text("ADSENSE_SLOT_SIDEBAR"),
                    article: text("ADSENSE_SLOT_ARTICLE"),
                },
                mobile: MobileAdUnitIds {
                    banner: text("ADMOB_BANNER_ID"),
                    interstitial: text("ADMOB_INTERSTITIAL_ID"),
                    reward: text("ADMOB_REWARD_ID"),
                },
            },
        }
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
