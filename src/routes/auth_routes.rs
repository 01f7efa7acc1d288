//! Token refresh endpoint
//!
//! - POST /api/v1/auth/refresh - exchange a refresh token for a new pair
//!
//! Registration and login live with the user store, outside this service.

use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::{error_response, json_response, parse_json_body, BoxBody, BoxError};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /api/v1/auth/refresh
pub async fn handle_refresh<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let body: RefreshRequest = match parse_json_body(req).await {
        Ok(body) => body,
        Err(e) => return error_response(&e),
    };

    match state.tokens.refresh(&body.refresh_token) {
        Ok(pair) => json_response(StatusCode::OK, &pair),
        Err(e) => error_response(&e),
    }
}
