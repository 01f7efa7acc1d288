//! Shared types for keygate

pub mod classify;
pub mod error;

pub use classify::{classify, ErrorBody, ErrorTriple, INTERNAL_SERVER_ERROR};
pub use error::{AuthError, KeyLoadError, Result};
