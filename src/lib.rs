//! IPv4 whitelist verification service.
//!
//! Answers `GET /v1/verify/{address}` with `{ address, allow }` against a
//! whitelist of inclusive address ranges read from `IP_WHITELIST` at startup,
//! and writes an audit record for every decision.

pub mod audit;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;

use audit::{init_transport, AuditLogger};
use colored::Colorize;
use config::Config;
use http::AppState;
use models::{build_whitelist, Whitelist};
use std::error::Error;
use std::sync::Arc;

/// Turn the configured `IP_WHITELIST` into the policy the service runs with.
///
/// An invalid specification does not stop the service: it is logged and
/// replaced by [`Whitelist::DenyAll`] until the configuration is fixed.
pub fn load_policy(spec: Option<&str>) -> Whitelist {
    match build_whitelist(spec) {
        Ok(Whitelist::Unrestricted) => {
            log::warn!("Warning: No IP_WHITELIST or empty IP_WHITELIST.");
            log::warn!(
                "Returning {} for all IP addresses until you configure your IP_WHITELIST environment variable.",
                "{ allow: true }".green()
            );
            Whitelist::Unrestricted
        }
        Ok(whitelist) => {
            log::info!("Whitelist loaded: {}", whitelist.describe());
            whitelist
        }
        Err(e) => {
            log::error!("Error: {e}");
            log::warn!(
                "Returning {} for all IP addresses until you fix your IP_WHITELIST environment variable.",
                "{ allow: false }".red()
            );
            Whitelist::DenyAll {
                reason: e.to_string(),
            }
        }
    }
}

/// Start the audit worker and serve requests until Ctrl-C.
///
/// Pending audit messages are delivered before this returns.
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    log::info!(
        "#Start run() environment={env} port={port}",
        env = config.environment,
        port = config.port
    );

    let whitelist = load_policy(config.ip_whitelist.as_deref());
    let transport = init_transport(&config.audit);
    let (audit, worker) = AuditLogger::start(transport, &config.audit.topic);

    let state = Arc::new(AppState::new(whitelist, audit));
    http::serve(state, config.port, shutdown_signal()).await?;

    // The server dropped its state; the worker ends after draining.
    if let Err(e) = worker.await {
        log::error!("Audit worker failed: {e}");
    }
    log::info!("#End run()");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown requested"),
        Err(e) => log::error!("Error listening for shutdown signal: {e}"),
    }
}
