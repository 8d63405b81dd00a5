// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for server rendering, desktop and CI builds where there is no
// browser and no native shell.
//
// `StaticEnvironment` doubles as a fixed snapshot of any environment, which
// is how server-rendered pages and tests describe the runtime they assume.
// The document and SDK stubs return `PlatformUnavailable`; the real ones live
// in the `web` module.

use dropfeed_core::error::{AdError, Result};

use crate::traits::*;

/// User agent of Chrome on an Android phone.
pub const UA_ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";
/// User agent of an Android system web-view (note the `; wv)` marker).
pub const UA_ANDROID_WEBVIEW: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/126.0.0.0 Mobile Safari/537.36";
/// User agent of Safari on an iPhone.
pub const UA_IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
/// User agent of desktop Firefox.
pub const UA_DESKTOP_FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// A fixed description of the host environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub window: bool,
    pub native_bridge: Option<NativeBridgeStatus>,
    pub user_agent: String,
    /// Defined globals, dotted paths allowed.
    pub globals: Vec<String>,
    pub display_mode_standalone: Option<bool>,
    pub navigator_standalone: Option<bool>,
}

impl StaticEnvironment {
    /// No window at all: server-side rendering or a plain process.
    pub fn server() -> Self {
        Self::default()
    }

    /// A browser tab with the given user agent and no native bridge.
    pub fn browser(user_agent: &str) -> Self {
        Self {
            window: true,
            user_agent: user_agent.into(),
            display_mode_standalone: Some(false),
            ..Self::default()
        }
    }

    /// A native shell whose bridge reports `platform`.
    pub fn native(platform: &str) -> Self {
        let user_agent = match platform {
            "ios" => UA_IPHONE_SAFARI,
            _ => UA_ANDROID_WEBVIEW,
        };
        Self {
            native_bridge: Some(NativeBridgeStatus {
                is_native_platform: true,
                platform: platform.into(),
            }),
            ..Self::browser(user_agent)
        }
    }

    pub fn with_global(mut self, path: &str) -> Self {
        self.globals.push(path.into());
        self
    }

    pub fn with_bridge(mut self, status: NativeBridgeStatus) -> Self {
        self.native_bridge = Some(status);
        self
    }

    pub fn installed(mut self) -> Self {
        self.display_mode_standalone = Some(true);
        self
    }
}

impl RuntimeEnvironment for StaticEnvironment {
    fn has_window(&self) -> bool {
        self.window
    }

    fn native_bridge(&self) -> Result<Option<NativeBridgeStatus>> {
        Ok(self.native_bridge.clone())
    }

    fn user_agent(&self) -> Result<String> {
        Ok(self.user_agent.clone())
    }

    fn has_global(&self, path: &str) -> Result<bool> {
        // A defined `a.b` implies a defined `a`.
        Ok(self
            .globals
            .iter()
            .any(|g| g == path || g.starts_with(&format!("{path}."))))
    }

    fn display_mode_standalone(&self) -> Result<Option<bool>> {
        Ok(self.display_mode_standalone)
    }

    fn navigator_standalone(&self) -> Result<Option<bool>> {
        Ok(self.navigator_standalone)
    }
}

/// No-op document returned where there is no DOM.
pub struct StubDocument;

#[async_trait::async_trait]
impl WebDocument for StubDocument {
    fn has_script(&self, _src: &str) -> bool {
        false
    }

    async fn load_script(&self, script: &ScriptTag) -> Result<()> {
        tracing::warn!(src = %script.src, "WebDocument::load_script called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    fn remove_script(&self, _src: &str) {}

    fn mount_placeholder(&self, container_id: &str, _placeholder: &AdPlaceholder) -> Result<()> {
        tracing::warn!(container_id, "WebDocument::mount_placeholder called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    fn push_render_request(&self) -> Result<()> {
        Err(AdError::PlatformUnavailable)
    }
}

/// No-op ad SDK returned outside a native shell.
pub struct StubAdSdk;

#[async_trait::async_trait]
impl NativeAdSdk for StubAdSdk {
    async fn initialize(&self, _options: &AdMobInitOptions) -> Result<()> {
        tracing::warn!("NativeAdSdk::initialize called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    async fn show_banner(&self, _options: &BannerAdOptions) -> Result<()> {
        tracing::warn!("NativeAdSdk::show_banner called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    async fn hide_banner(&self) -> Result<()> {
        Err(AdError::PlatformUnavailable)
    }

    async fn prepare_interstitial(&self, _options: &AdLoadOptions) -> Result<()> {
        tracing::warn!("NativeAdSdk::prepare_interstitial called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    async fn show_interstitial(&self) -> Result<()> {
        Err(AdError::PlatformUnavailable)
    }

    async fn prepare_reward_video(&self, _options: &AdLoadOptions) -> Result<()> {
        tracing::warn!("NativeAdSdk::prepare_reward_video called on stub bridge");
        Err(AdError::PlatformUnavailable)
    }

    async fn show_reward_video(&self) -> Result<()> {
        Err(AdError::PlatformUnavailable)
    }
}
