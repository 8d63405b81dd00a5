// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Browser / web-view / native-shell bridge via wasm-bindgen.
//
// Compiled only for `wasm32`. The same bundle runs in three hosts: a browser
// tab, a third-party app's web-view, and our own Capacitor shell. Each
// struct here is zero-sized and re-reads `window` on every call, so nothing
// JS-owned is held across calls.
//
// ## Native shell contract
//
// The Capacitor runtime exposes `window.Capacitor` with `isNativePlatform()`
// and `getPlatform()`, and registers the AdMob plugin under
// `window.Capacitor.Plugins.AdMob`. Every plugin method takes one JSON-shaped
// options object and returns a promise.

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use dropfeed_core::error::{AdError, Result};

use crate::traits::*;

/// Global the ad network's loader replaces with its request queue.
const AD_QUEUE_GLOBAL: &str = "adsbygoogle";

// ---------------------------------------------------------------------------
// JS helpers
// ---------------------------------------------------------------------------

fn js_err(context: &str, e: JsValue) -> String {
    match e.as_string() {
        Some(s) => format!("{context}: {s}"),
        None => format!("{context}: {e:?}"),
    }
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or(AdError::PlatformUnavailable)
}

fn document() -> Result<web_sys::Document> {
    window()?
        .document()
        .ok_or_else(|| AdError::Dom("window has no document".into()))
}

/// `target[key]`, with `undefined`/`null` mapped to `None`.
fn property(target: &JsValue, key: &str) -> std::result::Result<Option<JsValue>, JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key))?;
    if value.is_undefined() || value.is_null() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Call `target[method](...args)` with `this` bound to `target`.
fn call_method(target: &JsValue, method: &str, args: &[JsValue]) -> std::result::Result<JsValue, JsValue> {
    let func: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    match args {
        [] => func.call0(target),
        [a] => func.call1(target, a),
        _ => func.apply(target, &args.iter().collect::<js_sys::Array>()),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|e| AdError::Bridge(js_err("JSON.parse", e)))
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Probes the live `window`.
pub struct BrowserEnvironment;

impl RuntimeEnvironment for BrowserEnvironment {
    fn has_window(&self) -> bool {
        web_sys::window().is_some()
    }

    fn native_bridge(&self) -> Result<Option<NativeBridgeStatus>> {
        let win: JsValue = window()?.into();
        let probe = |e| AdError::Probe(js_err("Capacitor", e));

        let Some(capacitor) = property(&win, "Capacitor").map_err(probe)? else {
            return Ok(None);
        };
        let is_native_platform = call_method(&capacitor, "isNativePlatform", &[])
            .map_err(probe)?
            .as_bool()
            .unwrap_or(false);
        let platform = call_method(&capacitor, "getPlatform", &[])
            .map_err(probe)?
            .as_string()
            .unwrap_or_else(|| "web".into());

        Ok(Some(NativeBridgeStatus {
            is_native_platform,
            platform,
        }))
    }

    fn user_agent(&self) -> Result<String> {
        window()?
            .navigator()
            .user_agent()
            .map_err(|e| AdError::Probe(js_err("navigator.userAgent", e)))
    }

    fn has_global(&self, path: &str) -> Result<bool> {
        let mut current: JsValue = window()?.into();
        for key in path.split('.') {
            match property(&current, key).map_err(|e| AdError::Probe(js_err(path, e)))? {
                Some(next) => current = next,
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn display_mode_standalone(&self) -> Result<Option<bool>> {
        let query = window()?
            .match_media("(display-mode: standalone)")
            .map_err(|e| AdError::Probe(js_err("matchMedia", e)))?;
        Ok(query.map(|q| q.matches()))
    }

    fn navigator_standalone(&self) -> Result<Option<bool>> {
        let navigator: JsValue = window()?.navigator().into();
        let value = property(&navigator, "standalone")
            .map_err(|e| AdError::Probe(js_err("navigator.standalone", e)))?;
        Ok(value.and_then(|v| v.as_bool()))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// DOM access for the browser ad network.
pub struct BrowserDocument;

impl BrowserDocument {
    fn find_script(src: &str) -> Option<web_sys::Element> {
        let selector = format!("script[src=\"{src}\"]");
        document().ok()?.query_selector(&selector).ok().flatten()
    }
}

#[async_trait::async_trait(?Send)]
impl WebDocument for BrowserDocument {
    fn has_script(&self, src: &str) -> bool {
        Self::find_script(src).is_some()
    }

    async fn load_script(&self, script: &ScriptTag) -> Result<()> {
        let doc = document()?;
        let head = doc
            .head()
            .ok_or_else(|| AdError::Dom("document has no <head>".into()))?;
        let dom = |e| AdError::Dom(js_err("script element", e));

        let el: web_sys::HtmlElement = doc
            .create_element("script")
            .map_err(dom)?
            .dyn_into()
            .map_err(|_| AdError::Dom("created script is not an HtmlElement".into()))?;
        el.set_attribute("src", &script.src).map_err(dom)?;
        if script.is_async {
            el.set_attribute("async", "").map_err(dom)?;
        }
        if let Some(cors) = &script.cross_origin {
            el.set_attribute("crossorigin", cors).map_err(dom)?;
        }
        for (key, value) in &script.data {
            el.set_attribute(&format!("data-{key}"), value).map_err(dom)?;
        }

        let loaded = Promise::new(&mut |resolve, reject| {
            el.set_onload(Some(&resolve));
            el.set_onerror(Some(&reject));
        });
        head.append_child(&el).map_err(dom)?;

        let outcome = JsFuture::from(loaded).await;
        el.set_onload(None);
        el.set_onerror(None);
        outcome
            .map(|_| ())
            .map_err(|_| AdError::ScriptLoad(format!("failed to load {}", script.src)))
    }

    fn remove_script(&self, src: &str) {
        if let Some(el) = Self::find_script(src) {
            el.remove();
        }
    }

    fn mount_placeholder(&self, container_id: &str, placeholder: &AdPlaceholder) -> Result<()> {
        let doc = document()?;
        let container = doc
            .get_element_by_id(container_id)
            .ok_or_else(|| AdError::ContainerNotFound(container_id.into()))?;
        let dom = |e| AdError::Dom(js_err("ad placeholder", e));

        container.set_inner_html("");
        let ins = doc.create_element("ins").map_err(dom)?;
        ins.set_class_name(AdPlaceholder::CLASS);
        ins.set_attribute("style", &placeholder.style()).map_err(dom)?;
        for (key, value) in placeholder.data_attributes() {
            ins.set_attribute(&format!("data-{key}"), &value).map_err(dom)?;
        }
        container.append_child(&ins).map_err(dom)?;
        Ok(())
    }

    fn push_render_request(&self) -> Result<()> {
        let win: JsValue = window()?.into();
        let dom = |e| AdError::Dom(js_err(AD_QUEUE_GLOBAL, e));

        // (adsbygoogle = window.adsbygoogle || []).push({})
        let queue = match property(&win, AD_QUEUE_GLOBAL).map_err(dom)? {
            Some(queue) => queue,
            None => {
                let fresh: JsValue = js_sys::Array::new().into();
                Reflect::set(&win, &JsValue::from_str(AD_QUEUE_GLOBAL), &fresh).map_err(dom)?;
                fresh
            }
        };
        call_method(&queue, "push", &[Object::new().into()]).map_err(dom)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Native ad SDK (Capacitor plugin)
// ---------------------------------------------------------------------------

/// The AdMob plugin registered by the Capacitor shell.
pub struct CapacitorAdMob;

impl CapacitorAdMob {
    fn plugin() -> Result<JsValue> {
        let win: JsValue = window()?.into();
        let lookup = |e| AdError::Bridge(js_err("Capacitor.Plugins.AdMob", e));
        let plugin = property(&win, "Capacitor")
            .map_err(lookup)?
            .map(|cap| property(&cap, "Plugins"))
            .transpose()
            .map_err(lookup)?
            .flatten()
            .map(|plugins| property(&plugins, "AdMob"))
            .transpose()
            .map_err(lookup)?
            .flatten();
        plugin.ok_or(AdError::PlatformUnavailable)
    }

    /// Invoke a plugin method and await the promise it returns.
    async fn invoke(method: &str, arg: Option<JsValue>) -> std::result::Result<JsValue, String> {
        let plugin = Self::plugin().map_err(|e| e.to_string())?;
        let args: Vec<JsValue> = arg.into_iter().collect();
        let returned = call_method(&plugin, method, &args).map_err(|e| js_err(method, e))?;
        let promise: Promise = returned
            .dyn_into()
            .unwrap_or_else(|value| Promise::resolve(&value));
        JsFuture::from(promise).await.map_err(|e| js_err(method, e))
    }
}

#[async_trait::async_trait(?Send)]
impl NativeAdSdk for CapacitorAdMob {
    async fn initialize(&self, options: &AdMobInitOptions) -> Result<()> {
        Self::invoke("initialize", Some(to_js(options)?))
            .await
            .map(|_| ())
            .map_err(AdError::SdkInit)
    }

    async fn show_banner(&self, options: &BannerAdOptions) -> Result<()> {
        Self::invoke("showBanner", Some(to_js(options)?))
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }

    async fn hide_banner(&self) -> Result<()> {
        Self::invoke("hideBanner", None)
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }

    async fn prepare_interstitial(&self, options: &AdLoadOptions) -> Result<()> {
        Self::invoke("prepareInterstitial", Some(to_js(options)?))
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }

    async fn show_interstitial(&self) -> Result<()> {
        Self::invoke("showInterstitial", None)
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }

    async fn prepare_reward_video(&self, options: &AdLoadOptions) -> Result<()> {
        Self::invoke("prepareRewardVideoAd", Some(to_js(options)?))
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }

    async fn show_reward_video(&self) -> Result<()> {
        Self::invoke("showRewardVideoAd", None)
            .await
            .map(|_| ())
            .map_err(AdError::Presentation)
    }
}
