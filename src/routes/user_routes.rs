//! Gated endpoints
//!
//! - GET /api/v1/users/profile - the authenticated identity
//! - GET /api/v1/token/info    - metadata of the presented access token

use hyper::{Request, Response, StatusCode};
use serde_json::json;
use std::sync::Arc;

use super::{authenticated, error_response, json_response, BoxBody};
use crate::server::AppState;

/// GET /api/v1/users/profile
pub async fn handle_profile<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody> {
    let ctx = match authenticated(&state, req.headers()).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match ctx.identity() {
        Ok(identity) => json_response(StatusCode::OK, &json!({ "profile": identity })),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/token/info
pub async fn handle_token_info<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody> {
    let ctx = match authenticated(&state, req.headers()).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match ctx.token_metadata() {
        Ok(metadata) => json_response(StatusCode::OK, &json!({ "token_metadata": metadata })),
        Err(e) => error_response(&e),
    }
}
