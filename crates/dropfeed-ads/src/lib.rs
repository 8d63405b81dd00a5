// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dropfeed — Platform-aware ad serving.
//
// Detects what kind of runtime the app is in, then serves ads from the one
// network allowed there: the browser network on the open web, the native SDK
// inside our own app shell, and nothing inside third-party web-views.

pub mod admob;
pub mod adsense;
pub mod flags;
pub mod manager;
pub mod platform;

#[cfg(test)]
mod testing;

pub use admob::AdMobProvider;
pub use adsense::AdSenseProvider;
pub use flags::{FeatureFlag, FeatureFlags};
pub use manager::{
    ActiveProvider, AdManager, AdProvider, AdResultExt, BannerPlacement, WebBannerOptions,
};
pub use platform::{Evidence, PlatformDetector, ProbeKind, ProbeReport};
