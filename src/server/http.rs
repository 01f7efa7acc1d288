//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Routing is a flat
//! match on method and path.

use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::auth::{AuthenticationGate, TokenService, UserDirectory};
use crate::routes::{self, json_response, BoxBody, BoxError};
use crate::types::AuthError;

/// Shared application state
///
/// Built once after the key store has loaded; read-only afterwards.
pub struct AppState {
    pub tokens: TokenService,
    pub gate: AuthenticationGate,
}

impl AppState {
    pub fn new(tokens: TokenService, directory: Arc<dyn UserDirectory>) -> Self {
        let gate = AuthenticationGate::new(tokens.verifier().clone(), directory);
        Self { tokens, gate }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>, listen: SocketAddr) -> Result<(), AuthError> {
    let listener = TcpListener::bind(listen).await?;
    info!("keygate listening on {}", listen);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle_request(state, req).await) }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Dispatch one request
pub async fn handle_request<B>(state: Arc<AppState>, req: Request<B>) -> Response<BoxBody>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "Request");

    match (&method, path.as_str()) {
        (&Method::GET, "/health") => routes::handle_health(),
        (&Method::POST, "/api/v1/auth/refresh") => routes::handle_refresh(req, state).await,
        (&Method::GET, "/api/v1/users/profile") => routes::handle_profile(req, state).await,
        (&Method::GET, "/api/v1/token/info") => routes::handle_token_info(req, state).await,

        (_, "/health")
        | (_, "/api/v1/auth/refresh")
        | (_, "/api/v1/users/profile")
        | (_, "/api/v1/token/info") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &json!({ "code": "METHOD_NOT_ALLOWED", "message": "Method not allowed" }),
        ),

        _ => json_response(
            StatusCode::NOT_FOUND,
            &json!({ "code": "NOT_FOUND", "message": "Not found" }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{fixture_config, fixture_keys};
    use crate::auth::{AuthenticatedIdentity, InMemoryUserDirectory, ManualClock};
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use serde_json::Value;

    fn state() -> Arc<AppState> {
        let clock = Arc::new(ManualClock::starting_now());
        let tokens = TokenService::new(fixture_keys(), fixture_config(), clock);
        let directory = InMemoryUserDirectory::new();
        directory.insert(AuthenticatedIdentity {
            subject_id: "42".into(),
            email: "bob@example.com".into(),
            name: "Bob".into(),
        });
        Arc::new(AppState::new(tokens, Arc::new(directory)))
    }

    fn request(method: Method, path: &str, auth: Option<&str>, body: &str) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, Value) {
        let response = handle_request(Arc::clone(state), req).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let state = state();
        let (status, body) = send(&state, request(Method::GET, "/health", None, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_profile_requires_credential() {
        let state = state();
        let (status, body) =
            send(&state, request(Method::GET, "/api/v1/users/profile", None, "")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_AUTH_HEADER");

        let (status, body) = send(
            &state,
            request(Method::GET, "/api/v1/users/profile", Some("Token xyz"), ""),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_AUTH_HEADER");
    }

    #[tokio::test]
    async fn test_profile_and_token_info() {
        let state = state();
        let pair = state.tokens.issue(&"42".into()).unwrap();
        let auth = format!("Bearer {}", pair.access_token);

        let (status, body) = send(
            &state,
            request(Method::GET, "/api/v1/users/profile", Some(&auth), ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["email"], "bob@example.com");

        let (status, body) = send(
            &state,
            request(Method::GET, "/api/v1/token/info", Some(&auth), ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_metadata"]["subject_id"], "42");
        assert_eq!(body["token_metadata"]["token_type"], "access");
    }

    #[tokio::test]
    async fn test_forged_token_gets_opaque_error() {
        let state = state();
        let (status, body) = send(
            &state,
            request(Method::GET, "/api/v1/token/info", Some("Bearer a.b.c"), ""),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_refresh_endpoint() {
        let state = state();
        let pair = state.tokens.issue(&"42".into()).unwrap();

        let body = format!(r#"{{"refresh_token":"{}"}}"#, pair.refresh_token);
        let (status, renewed) =
            send(&state, request(Method::POST, "/api/v1/auth/refresh", None, &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(renewed["access_token"].is_string());
        assert!(renewed["refresh_token"].is_string());

        let body = format!(r#"{{"refresh_token":"{}"}}"#, pair.access_token);
        let (status, _) =
            send(&state, request(Method::POST, "/api/v1/auth/refresh", None, &body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, err) =
            send(&state, request(Method::POST, "/api/v1/auth/refresh", None, "{")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INVALID_INPUT");
    }

    /// Body that never ends, 64 KiB per frame
    struct EndlessBody;

    impl Body for EndlessBody {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Option<Result<hyper::body::Frame<Bytes>, Infallible>>> {
            std::task::Poll::Ready(Some(Ok(hyper::body::Frame::data(Bytes::from(
                vec![b' '; 64 * 1024],
            )))))
        }
    }

    #[tokio::test]
    async fn test_oversized_refresh_body_is_refused_while_streaming() {
        let state = state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/refresh")
            .body(EndlessBody)
            .unwrap();

        let response = handle_request(Arc::clone(&state), req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let state = state();
        let (status, _) = send(&state, request(Method::GET, "/nope", None, "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&state, request(Method::DELETE, "/health", None, "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
