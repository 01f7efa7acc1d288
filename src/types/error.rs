//! Error types for keygate
//!
//! `AuthError` is the closed set of failure kinds every public operation
//! returns. Startup key failures carry their own `KeyLoadError` so the cause
//! (path, stage) survives into the fatal log line.

use std::path::PathBuf;

use hyper::StatusCode;

use crate::auth::TokenClass;
use crate::types::classify::classify;

/// Main error type for keygate operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Key load failure: {0}")]
    KeyLoad(#[from] KeyLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Authorization header is missing")]
    MissingCredential,

    #[error("Authorization header is malformed")]
    MalformedCredential,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Transport status for this error, as decided by the classifier
    pub fn status_code(&self) -> StatusCode {
        classify(self).status
    }

    /// True for kinds that should abort the process instead of being
    /// returned to a caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::KeyLoad(_) | Self::Config(_))
    }
}

/// Why key material could not be loaded at startup
#[derive(Debug, thiserror::Error)]
pub enum KeyLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode PEM block in {path}: {reason}")]
    Pem { path: PathBuf, reason: String },

    #[error("failed to parse private key in {path} (tried {attempts})")]
    PrivateKeyDecode { path: PathBuf, attempts: String },

    #[error("failed to parse public key in {path}: {reason}")]
    PublicKeyDecode { path: PathBuf, reason: String },

    #[error("key in {path} is not an RSA key (algorithm {oid})")]
    UnexpectedAlgorithm { path: PathBuf, oid: String },

    #[error("{class} private key does not match its public key")]
    MismatchedPair { class: TokenClass },

    #[error("access and refresh tokens must use distinct key pairs")]
    SharedKeyPair,

    #[error("failed to prepare {class} key for signing: {reason}")]
    Encoding { class: TokenClass, reason: String },
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for AuthError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

/// Result type alias for keygate operations
pub type Result<T> = std::result::Result<T, AuthError>;
