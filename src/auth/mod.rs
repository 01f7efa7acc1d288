//! Token lifecycle and request authentication
//!
//! Provides:
//! - Per-class RSA key loading (`KeyStore`)
//! - Token issuance and verification
//! - The per-request `AuthenticationGate`
//! - The user lookup collaborator trait

pub mod claims;
pub mod clock;
pub mod directory;
pub mod gate;
pub mod issuer;
pub mod keys;
pub mod service;
pub mod settings;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::{Claims, SubjectId, TokenClass, TokenMetadata, TokenPair};
pub use clock::{Clock, ManualClock, SystemClock};
pub use directory::{AuthenticatedIdentity, DirectoryError, InMemoryUserDirectory, UserDirectory};
pub use gate::{extract_bearer_token, AuthenticationGate, GateState, RequestContext, BEARER_SCHEME};
pub use issuer::TokenIssuer;
pub use keys::{KeyPair, KeyStore, PrivateKeyEncoding, PRIVATE_KEY_DECODERS};
pub use service::TokenService;
pub use settings::{
    parse_algorithm, ClassSettings, TokenConfig, MAX_EXPIRATION_DAYS, RSA_FAMILY,
};
pub use verifier::TokenVerifier;
