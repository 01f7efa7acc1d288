//! Maps internal error kinds to the stable triple sent over the wire.
//!
//! The table is the only place transport codes and messages are decided.
//! Diagnostic text carried inside an `AuthError` never reaches the triple.

use hyper::StatusCode;
use serde::Serialize;

use crate::types::AuthError;

/// Stable external representation of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTriple {
    pub code: &'static str,
    pub status: StatusCode,
    pub message: &'static str,
}

impl ErrorTriple {
    const fn new(code: &'static str, status: StatusCode, message: &'static str) -> Self {
        Self {
            code,
            status,
            message,
        }
    }

    /// JSON body for this triple
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code,
            message: self.message,
        }
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: &'static str,
}

const MISSING_AUTH_HEADER: ErrorTriple = ErrorTriple::new(
    "MISSING_AUTH_HEADER",
    StatusCode::UNAUTHORIZED,
    "Authorization header is missing",
);

const INVALID_AUTH_HEADER: ErrorTriple = ErrorTriple::new(
    "INVALID_AUTH_HEADER",
    StatusCode::UNAUTHORIZED,
    "Invalid authorization header",
);

// Shared by every token rejection and by unknown subjects.
const UNAUTHORIZED: ErrorTriple =
    ErrorTriple::new("UNAUTHORIZED", StatusCode::UNAUTHORIZED, "Unauthorized");

const INVALID_INPUT: ErrorTriple =
    ErrorTriple::new("INVALID_INPUT", StatusCode::BAD_REQUEST, "Invalid request body");

/// Triple for anything not classified as a client error
pub const INTERNAL_SERVER_ERROR: ErrorTriple = ErrorTriple::new(
    "INTERNAL_SERVER_ERROR",
    StatusCode::INTERNAL_SERVER_ERROR,
    "An unexpected error occurred",
);

/// Classify an error into its external triple
pub fn classify(err: &AuthError) -> ErrorTriple {
    match err {
        AuthError::MissingCredential => MISSING_AUTH_HEADER,
        AuthError::MalformedCredential => INVALID_AUTH_HEADER,
        AuthError::InvalidToken | AuthError::UserNotFound | AuthError::Unauthorized => {
            UNAUTHORIZED
        }
        AuthError::BadRequest(_) => INVALID_INPUT,
        AuthError::KeyLoad(_)
        | AuthError::Config(_)
        | AuthError::TokenGeneration(_)
        | AuthError::Internal(_) => INTERNAL_SERVER_ERROR,
    }
}
