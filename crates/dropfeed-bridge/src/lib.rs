// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dropfeed — Runtime bridge abstractions.
//
// Defines the seams between the ad layer and whatever is hosting it: the
// environment probes used for platform detection, the browser document the
// web ad network renders into, and the native in-app ad SDK. The `web`
// implementation is the real one for the wasm bundle (browser tab, web-view
// or Capacitor shell); everything else gets the stub.

pub mod traits;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub mod stub;

use std::sync::Arc;

pub use traits::*;

/// Environment probes for the current target.
pub fn runtime_environment() -> Box<dyn RuntimeEnvironment> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(web::BrowserEnvironment)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        // SERVER/DESKTOP/CI: no window, detection degrades to "web".
        Box::new(stub::StaticEnvironment::server())
    }
}

/// Document access for the browser ad network.
pub fn web_document() -> Arc<dyn WebDocument> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(web::BrowserDocument)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(stub::StubDocument)
    }
}

/// The native in-app ad plugin.
pub fn native_ad_sdk() -> Arc<dyn NativeAdSdk> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(web::CapacitorAdMob)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(stub::StubAdSdk)
    }
}
