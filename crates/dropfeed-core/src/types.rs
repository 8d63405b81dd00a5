// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Dropfeed ad runtime.

use serde::{Deserialize, Serialize};

/// Operating platform reported by the runtime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Ios,
    Android,
    Unknown,
}

impl Platform {
    /// Map the platform name reported by a native container bridge.
    pub fn from_bridge_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "ios" => Self::Ios,
            "android" => Self::Android,
            "web" => Self::Web,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable classification of the runtime the application is executing in.
///
/// `is_native_app` and `is_web` are mutually exclusive, and `is_web_view` is
/// only ever set when `is_native_app` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub is_web: bool,
    pub is_native_app: bool,
    #[serde(rename = "isIOS")]
    pub is_ios: bool,
    pub is_android: bool,
    #[serde(rename = "isPWA")]
    pub is_pwa: bool,
    pub is_web_view: bool,
    pub platform: Platform,
}

impl PlatformInfo {
    /// Classification used whenever there is no DOM to inspect, or when
    /// inspecting it failed: a plain web browser.
    pub const fn web_default() -> Self {
        Self {
            is_web: true,
            is_native_app: false,
            is_ios: false,
            is_android: false,
            is_pwa: false,
            is_web_view: false,
            platform: Platform::Web,
        }
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::web_default()
    }
}

// ---------------------------------------------------------------------------
// Web placements
// ---------------------------------------------------------------------------

/// Rendering format of a web ad slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdFormat {
    /// Responsive, full-width placement sized by the ad network.
    #[default]
    Auto,
    /// Explicit pixel size.
    Fixed { width: u32, height: u32 },
}

/// A web ad placement: the slot identifier configured in the network
/// dashboard and how it should be sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSlot {
    pub slot_id: String,
    #[serde(default)]
    pub format: AdFormat,
}

impl AdSlot {
    pub fn auto(slot_id: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
            format: AdFormat::Auto,
        }
    }

    pub fn fixed(slot_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            slot_id: slot_id.into(),
            format: AdFormat::Fixed { width, height },
        }
    }
}

// ---------------------------------------------------------------------------
// Native placements
// ---------------------------------------------------------------------------

/// Banner sizes understood by the native ad plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerAdSize {
    Banner,
    FullBanner,
    LargeBanner,
    MediumRectangle,
    Leaderboard,
    AdaptiveBanner,
    SmartBanner,
}

/// Where the native banner is docked on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerAdPosition {
    TopCenter,
    CenterOverlay,
    BottomCenter,
}

/// Parameters for a native banner placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerOptions {
    pub ad_id: String,
    pub size: BannerAdSize,
    pub position: BannerAdPosition,
    /// Distance from the docked edge, in density-independent pixels.
    pub margin: u32,
}

impl BannerOptions {
    /// Adaptive banner docked at the bottom of the screen.
    pub fn new(ad_id: impl Into<String>) -> Self {
        Self {
            ad_id: ad_id.into(),
            size: BannerAdSize::AdaptiveBanner,
            position: BannerAdPosition::BottomCenter,
            margin: 0,
        }
    }
}

/// Parameters for a full-screen interstitial placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterstitialOptions {
    pub ad_id: String,
}

/// Parameters for a rewarded video placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardOptions {
    pub ad_id: String,
}
