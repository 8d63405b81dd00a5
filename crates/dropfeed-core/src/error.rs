// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Dropfeed.

use std::sync::Arc;

use thiserror::Error;

/// Top-level error type for all ad runtime operations.
#[derive(Debug, Error)]
pub enum AdError {
    // -- Web ad network --
    #[error("ad script failed to load: {0}")]
    ScriptLoad(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("ad container not found: #{0}")]
    ContainerNotFound(String),

    // -- Native ad SDK --
    #[error("native ad SDK initialization failed: {0}")]
    SdkInit(String),

    #[error("ad presentation failed: {0}")]
    Presentation(String),

    // -- Environment --
    #[error("environment probe failed: {0}")]
    Probe(String),

    // -- Configuration --
    #[error("invalid ad configuration: {0}")]
    Config(String),

    #[error("ad manager has not been configured")]
    NotConfigured,

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    /// One failure handed to every caller that waited on the same attempt.
    #[error(transparent)]
    Shared(Arc<AdError>),
}

impl AdError {
    /// Whether the failure should degrade to "no ad shown" rather than being
    /// reported as a defect. Configuration mistakes are the only exception.
    pub fn is_degradable(&self) -> bool {
        match self {
            Self::Shared(inner) => inner.is_degradable(),
            Self::Config(_) | Self::NotConfigured | Self::Serialization(_) => false,
            _ => true,
        }
    }

    /// The underlying failure, looking through [`AdError::Shared`].
    pub fn root(&self) -> &AdError {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AdError>;
