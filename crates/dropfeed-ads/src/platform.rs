// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime platform detection.
//
// Classifies the host once (browser tab, installed PWA, third-party web-view,
// or our own native shell) and answers which ad network may run there.
// Detection never fails: without a window, or when any probe throws, the
// result is the plain-web default.
//
// Probes are combined by a fixed precedence:
//
//   native bridge confirmation  >  web-view heuristic  >  browser default
//
// so a native shell whose user agent also carries a web-view marker is still
// classified as native.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use dropfeed_bridge::RuntimeEnvironment;
use dropfeed_core::error::Result;
use dropfeed_core::types::{Platform, PlatformInfo};

/// User-agent fragments (lowercase) of embedded browser engines.
const WEB_VIEW_UA_MARKERS: &[&str] = &["; wv)", "webview"];

/// Globals injected by web-view hosts.
const WEB_VIEW_GLOBALS: &[&str] = &["ReactNativeWebView", "webkit.messageHandlers"];

/// Tri-state outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Evidence {
    Yes,
    No,
    /// The signal the probe looks for does not exist on this host.
    Unknown,
}

impl Evidence {
    fn from_bool(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

/// The named probes, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeKind {
    NativeBridge,
    WebView,
    InstalledPwa,
    MobileUserAgent,
}

/// What one probe saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub probe: ProbeKind,
    pub evidence: Evidence,
}

/// Raw probe results before precedence is applied.
struct Probes {
    native: Evidence,
    native_platform: Option<Platform>,
    web_view: Evidence,
    installed_pwa: Evidence,
    ua_platform: Option<Platform>,
}

impl Probes {
    fn collect(env: &dyn RuntimeEnvironment) -> Result<Self> {
        let bridge = env.native_bridge()?;
        let native = match &bridge {
            Some(status) => Evidence::from_bool(status.is_native_platform),
            None => Evidence::Unknown,
        };
        let native_platform = bridge
            .filter(|status| status.is_native_platform)
            .map(|status| match Platform::from_bridge_name(&status.platform) {
                // A native shell that calls itself "web" is lying about something.
                Platform::Web => Platform::Unknown,
                other => other,
            });

        let ua = env.user_agent()?.to_ascii_lowercase();
        let mut web_view = WEB_VIEW_UA_MARKERS.iter().any(|m| ua.contains(m));
        if !web_view {
            for global in WEB_VIEW_GLOBALS {
                if env.has_global(global)? {
                    web_view = true;
                    break;
                }
            }
        }

        let installed_pwa = match (env.display_mode_standalone()?, env.navigator_standalone()?) {
            (Some(true), _) | (_, Some(true)) => Evidence::Yes,
            (None, None) => Evidence::Unknown,
            _ => Evidence::No,
        };

        let ua_platform = if ["iphone", "ipad", "ipod"].iter().any(|m| ua.contains(m)) {
            Some(Platform::Ios)
        } else if ua.contains("android") {
            Some(Platform::Android)
        } else {
            None
        };

        Ok(Self {
            native,
            native_platform,
            web_view: Evidence::from_bool(web_view),
            installed_pwa,
            ua_platform,
        })
    }

    fn resolve(&self) -> PlatformInfo {
        let is_native_app = self.native == Evidence::Yes;
        let is_web_view = !is_native_app && self.web_view == Evidence::Yes;
        let platform = if is_native_app {
            self.native_platform.unwrap_or(Platform::Unknown)
        } else {
            // Browser-side inference only; never implies a native shell.
            self.ua_platform.unwrap_or(Platform::Web)
        };

        PlatformInfo {
            is_web: !is_native_app && !is_web_view,
            is_native_app,
            is_ios: platform == Platform::Ios,
            is_android: platform == Platform::Android,
            is_pwa: self.installed_pwa == Evidence::Yes,
            is_web_view,
            platform,
        }
    }

    fn reports(&self) -> Vec<ProbeReport> {
        vec![
            ProbeReport {
                probe: ProbeKind::NativeBridge,
                evidence: self.native,
            },
            ProbeReport {
                probe: ProbeKind::WebView,
                evidence: self.web_view,
            },
            ProbeReport {
                probe: ProbeKind::InstalledPwa,
                evidence: self.installed_pwa,
            },
            ProbeReport {
                probe: ProbeKind::MobileUserAgent,
                evidence: Evidence::from_bool(self.ua_platform.is_some()),
            },
        ]
    }
}

/// Run every probe and apply precedence. Never fails.
fn detect_platform(env: &dyn RuntimeEnvironment) -> (PlatformInfo, Vec<ProbeReport>) {
    if !env.has_window() {
        debug!("no window; assuming plain web");
        return (PlatformInfo::web_default(), Vec::new());
    }

    match Probes::collect(env) {
        Ok(probes) => (probes.resolve(), probes.reports()),
        Err(e) => {
            warn!(error = %e, "platform detection failed; assuming plain web");
            (PlatformInfo::web_default(), Vec::new())
        }
    }
}

/// The runtime classification, computed once.
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    info: PlatformInfo,
    probes: Vec<ProbeReport>,
}

impl PlatformDetector {
    /// Classify `env`. This is the only place probes run.
    pub fn new(env: &dyn RuntimeEnvironment) -> Self {
        let (info, probes) = detect_platform(env);
        info!(
            platform = %info.platform,
            native = info.is_native_app,
            web_view = info.is_web_view,
            pwa = info.is_pwa,
            "runtime classified"
        );
        Self { info, probes }
    }

    /// Wrap a classification made elsewhere (e.g. by the server for the page
    /// it rendered).
    pub fn with_info(info: PlatformInfo) -> Self {
        Self {
            info,
            probes: Vec::new(),
        }
    }

    /// Process-wide detector for the current target's environment, created
    /// on first use.
    pub fn shared() -> Arc<PlatformDetector> {
        static SHARED: OnceLock<Arc<PlatformDetector>> = OnceLock::new();
        Self::shared_in(&SHARED, dropfeed_bridge::runtime_environment)
    }

    /// The detector held by `cell`, classifying the environment built by
    /// `env` on first use only.
    pub(crate) fn shared_in<F>(
        cell: &OnceLock<Arc<PlatformDetector>>,
        env: F,
    ) -> Arc<PlatformDetector>
    where
        F: FnOnce() -> Box<dyn RuntimeEnvironment>,
    {
        cell.get_or_init(|| {
            let env = env();
            Arc::new(Self::new(env.as_ref()))
        })
        .clone()
    }

    pub fn platform_info(&self) -> &PlatformInfo {
        &self.info
    }

    /// Per-probe evidence behind the classification. Empty when detection
    /// was skipped or fell back.
    pub fn probes(&self) -> &[ProbeReport] {
        &self.probes
    }

    /// Script-based web ads: a clean browser only, never a web-view or shell.
    pub fn should_use_adsense(&self) -> bool {
        self.info.is_web && !self.info.is_web_view
    }

    /// Native ads: only inside a true native container.
    pub fn should_use_admob(&self) -> bool {
        self.info.is_native_app
    }
}

#[cfg(test)]
mod tests {
    use dropfeed_bridge::NativeBridgeStatus;
    use dropfeed_bridge::stub::{
        StaticEnvironment, UA_ANDROID_CHROME, UA_ANDROID_WEBVIEW, UA_DESKTOP_FIREFOX,
        UA_IPHONE_SAFARI,
    };

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::{CountingEnvironment, FailingEnvironment};

    #[test]
    fn server_side_is_plain_web() {
        let detector = PlatformDetector::new(&StaticEnvironment::server());
        assert_eq!(
            *detector.platform_info(),
            PlatformInfo {
                is_web: true,
                is_native_app: false,
                is_ios: false,
                is_android: false,
                is_pwa: false,
                is_web_view: false,
                platform: Platform::Web,
            }
        );
        assert!(detector.probes().is_empty());
        assert!(detector.should_use_adsense());
        assert!(!detector.should_use_admob());
    }

    #[test]
    fn shared_detector_on_host_is_plain_web() {
        let first = PlatformDetector::shared();
        let second = PlatformDetector::shared();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first.platform_info(), PlatformInfo::web_default());
    }

    #[test]
    fn native_android_bridge_selects_admob() {
        let detector = PlatformDetector::new(&StaticEnvironment::native("android"));
        let info = detector.platform_info();
        assert!(info.is_native_app);
        assert!(info.is_android);
        assert!(!info.is_web);
        assert!(!info.is_web_view, "bridge confirmation outranks the wv marker");
        assert_eq!(info.platform, Platform::Android);
        assert!(detector.should_use_admob());
        assert!(!detector.should_use_adsense());
    }

    #[test]
    fn native_ios_bridge_selects_admob() {
        let detector = PlatformDetector::new(&StaticEnvironment::native("ios"));
        assert_eq!(detector.platform_info().platform, Platform::Ios);
        assert!(detector.platform_info().is_ios);
        assert!(detector.should_use_admob());
        assert!(!detector.should_use_adsense());
    }

    #[test]
    fn bridge_reporting_not_native_is_plain_browser() {
        let env = StaticEnvironment::browser(UA_DESKTOP_FIREFOX).with_bridge(NativeBridgeStatus {
            is_native_platform: false,
            platform: "web".into(),
        });
        let detector = PlatformDetector::new(&env);
        assert!(detector.platform_info().is_web);
        assert!(detector.should_use_adsense());
        assert!(!detector.should_use_admob());
        assert_eq!(detector.probes()[0].evidence, Evidence::No);
    }

    #[test]
    fn missing_bridge_is_unknown_evidence() {
        let detector = PlatformDetector::new(&StaticEnvironment::browser(UA_DESKTOP_FIREFOX));
        assert_eq!(
            detector.probes()[0],
            ProbeReport {
                probe: ProbeKind::NativeBridge,
                evidence: Evidence::Unknown,
            }
        );
    }

    #[test]
    fn react_native_web_view_disables_both_networks() {
        let env = StaticEnvironment::browser(UA_ANDROID_CHROME).with_global("ReactNativeWebView");
        let detector = PlatformDetector::new(&env);
        let info = detector.platform_info();
        assert!(info.is_web_view);
        assert!(!info.is_web);
        assert!(!info.is_native_app);
        assert!(!detector.should_use_adsense());
        assert!(!detector.should_use_admob());
    }

    #[test]
    fn webkit_message_handlers_mark_web_view() {
        let env =
            StaticEnvironment::browser(UA_IPHONE_SAFARI).with_global("webkit.messageHandlers");
        let detector = PlatformDetector::new(&env);
        assert!(detector.platform_info().is_web_view);
        assert!(!detector.should_use_adsense());
    }

    #[test]
    fn android_wv_user_agent_marks_web_view() {
        let detector = PlatformDetector::new(&StaticEnvironment::browser(UA_ANDROID_WEBVIEW));
        let info = detector.platform_info();
        assert!(info.is_web_view);
        assert_eq!(info.platform, Platform::Android);
        assert!(!detector.should_use_adsense());
        assert!(!detector.should_use_admob());
    }

    #[test]
    fn mobile_safari_infers_ios_without_native() {
        let detector = PlatformDetector::new(&StaticEnvironment::browser(UA_IPHONE_SAFARI));
        let info = detector.platform_info();
        assert_eq!(info.platform, Platform::Ios);
        assert!(info.is_ios);
        assert!(info.is_web);
        assert!(!info.is_native_app);
        assert!(detector.should_use_adsense());
    }

    #[test]
    fn installed_pwa_detected_by_display_mode() {
        let env = StaticEnvironment::browser(UA_ANDROID_CHROME).installed();
        let detector = PlatformDetector::new(&env);
        assert!(detector.platform_info().is_pwa);
        assert!(detector.platform_info().is_web);
        assert!(detector.should_use_adsense());
    }

    #[test]
    fn installed_pwa_detected_by_ios_standalone_flag() {
        let env = StaticEnvironment {
            navigator_standalone: Some(true),
            ..StaticEnvironment::browser(UA_IPHONE_SAFARI)
        };
        assert!(PlatformDetector::new(&env).platform_info().is_pwa);
    }

    #[test]
    fn pwa_evidence_unknown_without_media_queries() {
        let env = StaticEnvironment {
            display_mode_standalone: None,
            ..StaticEnvironment::browser(UA_DESKTOP_FIREFOX)
        };
        let detector = PlatformDetector::new(&env);
        assert!(!detector.platform_info().is_pwa);
        assert_eq!(detector.probes()[2].evidence, Evidence::Unknown);
    }

    #[test]
    fn probe_failure_falls_back_to_web() {
        let detector = PlatformDetector::new(&FailingEnvironment);
        assert_eq!(*detector.platform_info(), PlatformInfo::web_default());
        assert!(detector.probes().is_empty());
    }

    #[test]
    fn unknown_native_platform_is_still_native() {
        let env = StaticEnvironment::browser(UA_DESKTOP_FIREFOX).with_bridge(NativeBridgeStatus {
            is_native_platform: true,
            platform: "electron".into(),
        });
        let detector = PlatformDetector::new(&env);
        assert_eq!(detector.platform_info().platform, Platform::Unknown);
        assert!(detector.should_use_admob());
    }

    #[test]
    fn detection_runs_once() {
        let env = CountingEnvironment::new(StaticEnvironment::native("android"));
        let detector = PlatformDetector::new(&env);
        let after_detection = env.calls();
        assert!(after_detection > 0);

        for _ in 0..10 {
            let _ = detector.platform_info();
            let _ = detector.should_use_adsense();
            let _ = detector.should_use_admob();
        }
        assert_eq!(env.calls(), after_detection);
    }

    #[test]
    fn shared_detector_detects_on_first_use_only() {
        let cell = OnceLock::new();
        let environments = AtomicUsize::new(0);
        let build = || -> Box<dyn RuntimeEnvironment> {
            environments.fetch_add(1, Ordering::SeqCst);
            Box::new(StaticEnvironment::native("android"))
        };

        let detectors: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| PlatformDetector::shared_in(&cell, build)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(environments.load(Ordering::SeqCst), 1);
        assert!(detectors.iter().all(|d| Arc::ptr_eq(d, &detectors[0])));
        assert!(detectors[0].should_use_admob());

        let later = PlatformDetector::shared_in(&cell, build);
        assert!(Arc::ptr_eq(&later, &detectors[0]));
        assert_eq!(environments.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn webview_token_marks_web_view() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
                  AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 CatalogApp WebView/3.2";
        let detector = PlatformDetector::new(&StaticEnvironment::browser(ua));
        let info = detector.platform_info();
        assert!(info.is_web_view);
        assert!(!info.is_web);
        assert!(!info.is_native_app);
        assert!(!detector.should_use_adsense());
        assert!(!detector.should_use_admob());
    }

    #[test]
    fn ad_networks_are_mutually_exclusive() {
        let user_agents = [
            "",
            UA_ANDROID_CHROME,
            UA_ANDROID_WEBVIEW,
            UA_IPHONE_SAFARI,
            UA_DESKTOP_FIREFOX,
        ];
        let bridges = [
            None,
            Some((false, "web")),
            Some((true, "android")),
            Some((true, "ios")),
            Some((true, "web")),
        ];
        let globals: [&[&str]; 3] = [&[], &["ReactNativeWebView"], &["webkit.messageHandlers"]];

        for window in [false, true] {
            for ua in user_agents {
                for bridge in bridges {
                    for globs in globals {
                        for standalone in [None, Some(false), Some(true)] {
                            let env = StaticEnvironment {
                                window,
                                native_bridge: bridge.map(|(native, platform)| NativeBridgeStatus {
                                    is_native_platform: native,
                                    platform: platform.into(),
                                }),
                                user_agent: ua.into(),
                                globals: globs.iter().map(|g| g.to_string()).collect(),
                                display_mode_standalone: standalone,
                                navigator_standalone: standalone,
                            };
                            let detector = PlatformDetector::new(&env);
                            let info = detector.platform_info();

                            assert!(!(detector.should_use_adsense() && detector.should_use_admob()));
                            assert!(!(info.is_web && info.is_native_app));
                            assert!(!(info.is_web_view && info.is_native_app));

                            let native = window && bridge.is_some_and(|(n, _)| n);
                            assert_eq!(detector.should_use_admob(), native);
                            if !native && !info.is_web_view {
                                assert!(detector.should_use_adsense());
                            }
                        }
                    }
                }
            }
        }
    }
}
