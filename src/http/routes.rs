//! Verification endpoint.

use super::AppState;
use crate::audit::{AuditRecord, LogLevel};
use crate::models::validate_ipv4;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub const VERIFY_ADDRESS_ROUTE: &str = "/v1/verify/{address}";

/// Body of a successful verification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyResponse {
    pub address: String,
    pub allow: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(VERIFY_ADDRESS_ROUTE, get(verify))
        .with_state(state)
}

/// `GET /v1/verify/{address}`.
///
/// 400 `text/plain` for anything that is not a dotted-quad, including a
/// segment that does not decode to UTF-8; otherwise 200 with a
/// [`VerifyResponse`].
pub async fn verify(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    address: Result<Path<String>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let address = match address {
        Ok(Path(address)) => address,
        Err(rejection) => {
            log::debug!("Verify path not decoded: {rejection}");
            raw_address(&uri)
        }
    };

    if !validate_ipv4(&address) {
        let message = format!("Invalid IPv4 address: \"{address}\"");
        let elapsed_ms = elapsed_ms(start);
        log::debug!("{}", verify_line(&address, &message, elapsed_ms));
        state.audit.write(
            &AuditRecord::rejected(&address, &message, elapsed_ms),
            LogLevel::Warn,
        );
        return (StatusCode::BAD_REQUEST, message).into_response();
    }

    let allow = state.whitelist.allows(&address);
    let elapsed_ms = elapsed_ms(start);
    log::debug!("{}", verify_line(&address, &allow, elapsed_ms));
    state.audit.write(
        &AuditRecord::decision(&address, allow, elapsed_ms),
        LogLevel::Info,
    );

    Json(VerifyResponse { address, allow }).into_response()
}

/// One log line per request; the untrusted address is always escaped.
fn verify_line<T: std::fmt::Debug>(address: &str, outcome: &T, elapsed_ms: u64) -> String {
    format!("Verify {address:?} ==> {outcome:?} ({elapsed_ms}ms)")
}

/// Last path segment, still percent-encoded.
fn raw_address(uri: &Uri) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
