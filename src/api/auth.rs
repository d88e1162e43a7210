// src/api/auth.rs

use crate::api::types::{error, ApiError};
use crate::api::ApiState;
use axum::http::{HeaderMap, StatusCode};

/// Verify the bearer token if one is configured.
pub fn check_auth(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(ref expected) = state.token else {
        return Ok(());
    };

    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth_header.strip_prefix("Bearer ").unwrap_or("");

    if constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        tracing::debug!("Rejected request with missing or invalid bearer token");
        Err(error(
            StatusCode::UNAUTHORIZED,
            "Invalid or missing bearer token",
        ))
    }
}

/// Constant-time byte comparison for token checks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
