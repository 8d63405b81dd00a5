// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dropfeed — ad runtime bootstrap.
//
// Entry point. Loads configuration, initialises logging, builds the ad
// services once, tries to bring the active provider up and fill the header
// slot, then prints a JSON status report. Ad failures never stop the program.

mod report;
mod services;

use std::path::PathBuf;

use dropfeed_ads::AdResultExt;
use dropfeed_core::AppConfig;
use dropfeed_core::error::Result;

use services::ad_services::{AdServices, PagePosition};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal outside development.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Dropfeed starting");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration file");
            AppConfig::load(&path)?
        }
        None => AppConfig::from_env(),
    };

    let services = AdServices::init(config)?;
    if services.initialize().await.or_skip_ad("startup").is_some() {
        tracing::info!(provider = %services.manager().active_provider(), "ads ready");
        services
            .show_banner(PagePosition::Header)
            .await
            .or_skip_ad(PagePosition::Header.container_id());
    }

    println!("{}", serde_json::to_string_pretty(&services.status())?);
    Ok(())
}
