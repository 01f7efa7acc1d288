//! keygate - bearer token authentication
//!
//! Issues RSA-signed access and refresh tokens and authenticates requests
//! presenting them. Each token class has its own key pair, loaded once at
//! startup and shared read-only by the issuer, the verifier and the
//! per-request authentication gate.

pub mod auth;
pub mod config;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{AuthError, Result};
