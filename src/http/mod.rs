//! HTTP boundary in front of the whitelist engine.
//!
//! - [`routes`] - the verification endpoint and its router

mod routes;

pub use routes::{router, verify, VerifyResponse, VERIFY_ADDRESS_ROUTE};

use crate::audit::AuditLogger;
use crate::models::Whitelist;
use std::error::Error;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared, read-only request state.
#[derive(Debug)]
pub struct AppState {
    pub whitelist: Whitelist,
    pub audit: AuditLogger,
}

impl AppState {
    pub fn new(whitelist: Whitelist, audit: AuditLogger) -> Self {
        AppState { whitelist, audit }
    }
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves.
pub async fn serve<F>(state: Arc<AppState>, port: u16, shutdown: F) -> Result<(), Box<dyn Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Error binding {addr}: {e}"))?;
    log::info!("Listening on port {port}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Server error: {e}"))?;

    Ok(())
}
