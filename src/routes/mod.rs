//! HTTP route handlers and response helpers

pub mod auth_routes;
pub mod health;
pub mod user_routes;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::{HeaderMap, Request, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, warn};

use crate::auth::RequestContext;
use crate::server::AppState;
use crate::types::{classify, AuthError};

pub use auth_routes::handle_refresh;
pub use health::handle_health;
pub use user_routes::{handle_profile, handle_token_info};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Error type request bodies must convert into
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Largest JSON body accepted on public routes
const MAX_BODY_BYTES: usize = 10 * 1024;

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    let mut response = Response::new(full_body(json));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

/// Render an error through the classifier
///
/// Only the classified code and message are sent; the error's own text is
/// logged.
pub fn error_response(err: &AuthError) -> Response<BoxBody> {
    let triple = classify(err);
    if triple.status.is_server_error() {
        error!(code = triple.code, "Request failed: {}", err);
    } else {
        warn!(code = triple.code, "Request refused: {}", err);
    }

    let mut response = json_response(triple.status, &triple.body());
    if triple.status == StatusCode::UNAUTHORIZED {
        response.headers_mut().insert(
            hyper::header::WWW_AUTHENTICATE,
            hyper::header::HeaderValue::from_static("Bearer"),
        );
    }
    response
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Read and decode a JSON body of at most `MAX_BODY_BYTES`
///
/// The limit is enforced while streaming, so an oversized body is refused
/// without being buffered.
pub async fn parse_json_body<T, B>(req: Request<B>) -> Result<T, AuthError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<BoxError>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                AuthError::BadRequest("Request body too large".into())
            } else {
                AuthError::BadRequest(format!("Failed to read body: {}", e))
            }
        })?;

    serde_json::from_slice(&body.to_bytes())
        .map_err(|e| AuthError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Run the gate, turning a rejection straight into a response
pub async fn authenticated(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RequestContext, Response<BoxBody>> {
    state
        .gate
        .authenticate(headers)
        .await
        .map_err(|e| error_response(&e))
}
