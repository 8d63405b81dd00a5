// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording fakes for the bridge traits, shared by the unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use dropfeed_bridge::stub::StaticEnvironment;
use dropfeed_bridge::{
    AdLoadOptions, AdMobInitOptions, AdPlaceholder, BannerAdOptions, NativeAdSdk,
    NativeBridgeStatus, RuntimeEnvironment, ScriptTag, WebDocument,
};
use dropfeed_core::error::{AdError, Result};

use crate::platform::PlatformDetector;

pub fn detector(env: StaticEnvironment) -> Arc<PlatformDetector> {
    Arc::new(PlatformDetector::new(&env))
}

// ---------------------------------------------------------------------------
// Environments
// ---------------------------------------------------------------------------

/// Wraps an environment and counts every probe call.
pub struct CountingEnvironment {
    inner: StaticEnvironment,
    calls: AtomicUsize,
}

impl CountingEnvironment {
    pub fn new(inner: StaticEnvironment) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl RuntimeEnvironment for CountingEnvironment {
    fn has_window(&self) -> bool {
        self.tick();
        self.inner.has_window()
    }

    fn native_bridge(&self) -> Result<Option<NativeBridgeStatus>> {
        self.tick();
        self.inner.native_bridge()
    }

    fn user_agent(&self) -> Result<String> {
        self.tick();
        self.inner.user_agent()
    }

    fn has_global(&self, path: &str) -> Result<bool> {
        self.tick();
        self.inner.has_global(path)
    }

    fn display_mode_standalone(&self) -> Result<Option<bool>> {
        self.tick();
        self.inner.display_mode_standalone()
    }

    fn navigator_standalone(&self) -> Result<Option<bool>> {
        self.tick();
        self.inner.navigator_standalone()
    }
}

/// A window whose probes all throw.
pub struct FailingEnvironment;

impl RuntimeEnvironment for FailingEnvironment {
    fn has_window(&self) -> bool {
        true
    }

    fn native_bridge(&self) -> Result<Option<NativeBridgeStatus>> {
        Err(AdError::Probe("Capacitor getter threw".into()))
    }

    fn user_agent(&self) -> Result<String> {
        Err(AdError::Probe("navigator is not defined".into()))
    }

    fn has_global(&self, path: &str) -> Result<bool> {
        Err(AdError::Probe(format!("{path} getter threw")))
    }

    fn display_mode_standalone(&self) -> Result<Option<bool>> {
        Err(AdError::Probe("matchMedia threw".into()))
    }

    fn navigator_standalone(&self) -> Result<Option<bool>> {
        Err(AdError::Probe("navigator is not defined".into()))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// In-memory document that records injected scripts and mounted slots.
#[derive(Default)]
pub struct RecordingDocument {
    pub head: Mutex<Vec<ScriptTag>>,
    pub mounted: Mutex<Vec<(String, AdPlaceholder)>>,
    pub render_requests: AtomicUsize,
    pub loads: AtomicUsize,
    pub fail_load: bool,
    pub missing_container: bool,
}

impl RecordingDocument {
    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub fn scripts(&self) -> Vec<ScriptTag> {
        self.head.lock().unwrap().clone()
    }

    pub fn mounted(&self) -> Vec<(String, AdPlaceholder)> {
        self.mounted.lock().unwrap().clone()
    }

    pub fn render_requests(&self) -> usize {
        self.render_requests.load(Ordering::SeqCst)
    }

    /// Calls to `load_script`, failed ones included.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebDocument for RecordingDocument {
    fn has_script(&self, src: &str) -> bool {
        self.head.lock().unwrap().iter().any(|s| s.src == src)
    }

    async fn load_script(&self, script: &ScriptTag) -> Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.head.lock().unwrap().push(script.clone());
        // Let concurrent callers run while the "download" is in flight.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        if self.fail_load {
            Err(AdError::ScriptLoad(format!("failed to load {}", script.src)))
        } else {
            Ok(())
        }
    }

    fn remove_script(&self, src: &str) {
        self.head.lock().unwrap().retain(|s| s.src != src);
    }

    fn mount_placeholder(&self, container_id: &str, placeholder: &AdPlaceholder) -> Result<()> {
        if self.missing_container {
            return Err(AdError::ContainerNotFound(container_id.into()));
        }
        let mut mounted = self.mounted.lock().unwrap();
        mounted.retain(|(id, _)| id != container_id);
        mounted.push((container_id.into(), placeholder.clone()));
        Ok(())
    }

    fn push_render_request(&self) -> Result<()> {
        self.render_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Native SDK
// ---------------------------------------------------------------------------

/// One call received by [`RecordingSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Initialize(AdMobInitOptions),
    ShowBanner(BannerAdOptions),
    HideBanner,
    PrepareInterstitial(AdLoadOptions),
    ShowInterstitial,
    PrepareRewardVideo(AdLoadOptions),
    ShowRewardVideo,
}

/// In-memory SDK that records every call in order.
#[derive(Default)]
pub struct RecordingSdk {
    pub calls: Mutex<Vec<SdkCall>>,
    pub fail_initialize: bool,
    pub fail_hide: bool,
    pub fail_prepare: bool,
}

impl RecordingSdk {
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SdkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NativeAdSdk for RecordingSdk {
    async fn initialize(&self, options: &AdMobInitOptions) -> Result<()> {
        self.record(SdkCall::Initialize(options.clone()));
        tokio::task::yield_now().await;
        if self.fail_initialize {
            return Err(AdError::SdkInit("plugin not implemented".into()));
        }
        Ok(())
    }

    async fn show_banner(&self, options: &BannerAdOptions) -> Result<()> {
        self.record(SdkCall::ShowBanner(options.clone()));
        Ok(())
    }

    async fn hide_banner(&self) -> Result<()> {
        self.record(SdkCall::HideBanner);
        if self.fail_hide {
            return Err(AdError::Presentation("no banner is showing".into()));
        }
        Ok(())
    }

    async fn prepare_interstitial(&self, options: &AdLoadOptions) -> Result<()> {
        self.record(SdkCall::PrepareInterstitial(options.clone()));
        if self.fail_prepare {
            return Err(AdError::Presentation("no fill".into()));
        }
        Ok(())
    }

    async fn show_interstitial(&self) -> Result<()> {
        self.record(SdkCall::ShowInterstitial);
        Ok(())
    }

    async fn prepare_reward_video(&self, options: &AdLoadOptions) -> Result<()> {
        self.record(SdkCall::PrepareRewardVideo(options.clone()));
        if self.fail_prepare {
            return Err(AdError::Presentation("no fill".into()));
        }
        Ok(())
    }

    async fn show_reward_video(&self) -> Result<()> {
        self.record(SdkCall::ShowRewardVideo);
        Ok(())
    }
}
