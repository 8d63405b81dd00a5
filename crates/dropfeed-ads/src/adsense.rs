// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Browser ad network provider.
//
// Loads the network's script once, then renders placements into containers
// supplied by the page. Load failures mean "no ads on this page", never a
// broken page.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use dropfeed_bridge::{AdPlaceholder, ScriptTag, WebDocument};
use dropfeed_core::config::AdSenseConfig;
use dropfeed_core::error::{AdError, Result};
use dropfeed_core::types::AdSlot;

pub struct AdSenseProvider {
    config: AdSenseConfig,
    document: Arc<dyn WebDocument>,
    /// Set once the loader script has loaded. Concurrent initialisers wait on
    /// the same in-flight load; a failed load leaves it unset.
    loaded: OnceCell<()>,
    failures: Mutex<LoadFailures>,
}

/// Failed load attempts so far, and the most recent error.
#[derive(Default)]
struct LoadFailures {
    count: u64,
    last: Option<Arc<AdError>>,
}

impl AdSenseProvider {
    pub fn new(config: AdSenseConfig, document: Arc<dyn WebDocument>) -> Self {
        Self {
            config,
            document,
            loaded: OnceCell::new(),
            failures: Mutex::new(LoadFailures::default()),
        }
    }

    /// Inject the loader script, at most once.
    ///
    /// Callers that arrive while a load is in flight share its outcome, a
    /// failure included. Only a call made after a failure starts a new load.
    pub async fn initialize(&self) -> Result<()> {
        if self.config.client_id.is_empty() {
            return Err(AdError::Config("AdSense client id is empty".into()));
        }

        let seen = self.failures().count;
        self.loaded
            .get_or_try_init(|| self.load_once(seen))
            .await
            .map(|_| ())
    }

    async fn load_once(&self, seen: u64) -> Result<()> {
        if let Some(failure) = self.failure_since(seen) {
            debug!(error = %failure, "waited on a script load that failed");
            return Err(AdError::Shared(failure));
        }

        if let Err(e) = self.load_script().await {
            let failure = Arc::new(e);
            let mut failures = self.failures();
            failures.count += 1;
            failures.last = Some(failure.clone());
            return Err(AdError::Shared(failure));
        }
        Ok(())
    }

    async fn load_script(&self) -> Result<()> {
        let script = ScriptTag::adsense_loader(&self.config.client_id);
        if self.document.has_script(&script.src) {
            debug!(src = %script.src, "ad script already present");
            return Ok(());
        }

        info!(client_id = %self.config.client_id, "injecting ad script");
        if let Err(e) = self.document.load_script(&script).await {
            warn!(error = %e, "ad script failed to load");
            // Drop the dead tag so a later attempt injects a fresh one.
            self.document.remove_script(&script.src);
            return Err(e);
        }
        Ok(())
    }

    /// The latest failure, if any load failed after `seen` was read.
    fn failure_since(&self, seen: u64) -> Option<Arc<AdError>> {
        let failures = self.failures();
        if failures.count == seen {
            None
        } else {
            failures.last.clone()
        }
    }

    fn failures(&self) -> MutexGuard<'_, LoadFailures> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render `slot` into the element with id `container_id`, replacing
    /// whatever it held.
    ///
    /// Not safe to call concurrently for the same container.
    pub async fn display_ad(&self, slot: &AdSlot, container_id: &str) -> Result<()> {
        self.initialize().await?;

        let placeholder = AdPlaceholder {
            client_id: self.config.client_id.clone(),
            slot_id: slot.slot_id.clone(),
            format: slot.format,
            test: self.config.test_mode,
        };
        self.document.mount_placeholder(container_id, &placeholder)?;
        self.document.push_render_request()?;

        debug!(slot = %slot.slot_id, container_id, "ad slot requested");
        Ok(())
    }

    /// Enabled and not in test mode. Test mode never serves real ads.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.test_mode
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.initialized()
    }
}
