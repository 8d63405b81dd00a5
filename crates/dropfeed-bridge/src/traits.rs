// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the runtime the ad layer runs in.
//
// Three seams: the environment probes consumed by platform detection, the
// document used by the browser ad network, and the native ad SDK plugin.

use serde::{Deserialize, Serialize};

use dropfeed_core::error::Result;
use dropfeed_core::types::{AdFormat, BannerAdPosition, BannerAdSize};

/// Loader script of the browser ad network.
pub const ADSENSE_LOADER_URL: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

// ---------------------------------------------------------------------------
// Environment probes
// ---------------------------------------------------------------------------

/// What the native container bridge reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBridgeStatus {
    /// `isNativePlatform()` of the bridge.
    pub is_native_platform: bool,
    /// `getPlatform()` of the bridge ("ios", "android", "web").
    pub platform: String,
}

/// Read-only view of the host environment.
///
/// Probes other than [`has_window`](Self::has_window) may fail (a hostile
/// page can replace globals with throwing getters); callers treat any error
/// as "cannot classify".
pub trait RuntimeEnvironment: Send + Sync {
    /// Whether a window/DOM exists at all. False during server rendering.
    fn has_window(&self) -> bool;

    /// Status of the native container bridge, `None` when no bridge exists.
    fn native_bridge(&self) -> Result<Option<NativeBridgeStatus>>;

    fn user_agent(&self) -> Result<String>;

    /// Whether a global is defined. Dotted paths walk nested properties
    /// (`webkit.messageHandlers`).
    fn has_global(&self, path: &str) -> Result<bool>;

    /// Result of `matchMedia("(display-mode: standalone)")`, `None` when
    /// media queries are unsupported.
    fn display_mode_standalone(&self) -> Result<Option<bool>>;

    /// iOS Safari's non-standard `navigator.standalone`.
    fn navigator_standalone(&self) -> Result<Option<bool>>;
}

// ---------------------------------------------------------------------------
// Browser document
// ---------------------------------------------------------------------------

/// A `<script>` element to inject into the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub is_async: bool,
    pub cross_origin: Option<String>,
    /// `data-*` attributes, keys without the `data-` prefix.
    pub data: Vec<(String, String)>,
}

impl ScriptTag {
    /// Loader tag for the given publisher id.
    pub fn adsense_loader(client_id: &str) -> Self {
        Self {
            src: format!("{ADSENSE_LOADER_URL}?client={client_id}"),
            is_async: true,
            cross_origin: Some("anonymous".into()),
            data: vec![("ad-client".into(), client_id.into())],
        }
    }
}

/// The `<ins class="adsbygoogle">` element the ad network fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPlaceholder {
    pub client_id: String,
    pub slot_id: String,
    pub format: AdFormat,
    /// Mark the request as test traffic (`data-adtest="on"`).
    pub test: bool,
}

impl AdPlaceholder {
    pub const CLASS: &'static str = "adsbygoogle";

    /// Inline style for the element.
    pub fn style(&self) -> String {
        match self.format {
            AdFormat::Auto => "display:block".to_string(),
            AdFormat::Fixed { width, height } => {
                format!("display:inline-block;width:{width}px;height:{height}px")
            }
        }
    }

    /// `data-*` attributes, keys without the `data-` prefix.
    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("ad-client", self.client_id.clone()),
            ("ad-slot", self.slot_id.clone()),
        ];
        if self.format == AdFormat::Auto {
            attrs.push(("ad-format", "auto".into()));
            attrs.push(("full-width-responsive", "true".into()));
        }
        if self.test {
            attrs.push(("adtest", "on".into()));
        }
        attrs
    }
}

/// DOM operations needed by the browser ad network.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait WebDocument: Send + Sync {
    /// Whether a script with exactly this `src` is already in the document.
    fn has_script(&self, src: &str) -> bool;

    /// Append the script to `<head>`; resolves on `load`, fails on `error`.
    async fn load_script(&self, script: &ScriptTag) -> Result<()>;

    /// Remove a previously injected script. Missing scripts are ignored.
    fn remove_script(&self, src: &str);

    /// Clear the container's children and append the placeholder.
    fn mount_placeholder(&self, container_id: &str, placeholder: &AdPlaceholder) -> Result<()>;

    /// Push a render request onto the network's global queue.
    fn push_render_request(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Native ad SDK
// ---------------------------------------------------------------------------

/// Options for SDK initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdMobInitOptions {
    pub request_tracking_authorization: bool,
    pub testing_devices: Vec<String>,
    pub initialize_for_testing: bool,
}

/// Options for `showBanner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerAdOptions {
    pub ad_id: String,
    pub ad_size: BannerAdSize,
    pub position: BannerAdPosition,
    pub margin: u32,
    pub is_testing: bool,
}

/// Options for `prepareInterstitial` / `prepareRewardVideoAd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdLoadOptions {
    pub ad_id: String,
    pub is_testing: bool,
}

/// The native in-app ad plugin.
///
/// Full-screen formats are two-step: `prepare_*` fetches and caches the
/// creative, `show_*` presents the cached one.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait NativeAdSdk: Send + Sync {
    async fn initialize(&self, options: &AdMobInitOptions) -> Result<()>;

    async fn show_banner(&self, options: &BannerAdOptions) -> Result<()>;

    async fn hide_banner(&self) -> Result<()>;

    async fn prepare_interstitial(&self, options: &AdLoadOptions) -> Result<()>;

    async fn show_interstitial(&self) -> Result<()>;

    async fn prepare_reward_video(&self, options: &AdLoadOptions) -> Result<()>;

    async fn show_reward_video(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_tag_carries_client_id() {
        let tag = ScriptTag::adsense_loader("ca-pub-123");
        assert_eq!(
            tag.src,
            "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client=ca-pub-123"
        );
        assert!(tag.is_async);
        assert_eq!(tag.cross_origin.as_deref(), Some("anonymous"));
        assert_eq!(tag.data, vec![("ad-client".to_string(), "ca-pub-123".to_string())]);
    }

    #[test]
    fn auto_placeholder_is_responsive() {
        let ph = AdPlaceholder {
            client_id: "ca-pub-1".into(),
            slot_id: "42".into(),
            format: AdFormat::Auto,
            test: false,
        };
        assert_eq!(ph.style(), "display:block");
        let attrs = ph.data_attributes();
        assert!(attrs.contains(&("ad-format", "auto".to_string())));
        assert!(attrs.contains(&("full-width-responsive", "true".to_string())));
        assert!(!attrs.iter().any(|(k, _)| *k == "adtest"));
    }

    #[test]
    fn fixed_placeholder_has_pixel_size() {
        let ph = AdPlaceholder {
            client_id: "ca-pub-1".into(),
            slot_id: "42".into(),
            format: AdFormat::Fixed {
                width: 300,
                height: 250,
            },
            test: true,
        };
        assert_eq!(ph.style(), "display:inline-block;width:300px;height:250px");
        let attrs = ph.data_attributes();
        assert!(!attrs.iter().any(|(k, _)| *k == "ad-format"));
        assert!(attrs.contains(&("adtest", "on".to_string())));
    }

    #[test]
    fn plugin_options_are_camel_case() {
        let opts = BannerAdOptions {
            ad_id: "unit".into(),
            ad_size: BannerAdSize::Banner,
            position: BannerAdPosition::TopCenter,
            margin: 8,
            is_testing: false,
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            serde_json::json!({
                "adId": "unit",
                "adSize": "BANNER",
                "position": "TOP_CENTER",
                "margin": 8,
                "isTesting": false,
            })
        );
    }
}
