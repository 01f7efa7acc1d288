//! Health endpoint

use hyper::{Response, StatusCode};
use serde::Serialize;

use super::{json_response, BoxBody};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    commit: &'static str,
    built_at: &'static str,
}

/// GET /health
pub fn handle_health() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            commit: env!("GIT_COMMIT_SHORT"),
            built_at: env!("BUILD_TIMESTAMP"),
        },
    )
}
