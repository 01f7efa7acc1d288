//! Token verification
//!
//! Checks run in a fixed order: structure, declared algorithm, signature
//! under the expected class's public key, expiry, issuer, class. Every
//! rejection leaves this module as the same `AuthError::InvalidToken`; the
//! stage that failed is only logged.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use std::sync::Arc;
use tracing::debug;

use crate::auth::settings::RSA_FAMILY;
use crate::auth::{Claims, Clock, KeyStore, TokenClass, TokenConfig, TokenMetadata};
use crate::types::{AuthError, Result};

/// Internal reason a token was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum Rejection {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("algorithm {0:?} is not accepted")]
    Algorithm(Algorithm),

    #[error("signature verification failed: {0}")]
    Signature(String),

    #[error("expired at {expires_at}, now {now}")]
    Expired { expires_at: i64, now: i64 },

    #[error("unexpected issuer {0:?}")]
    Issuer(String),

    #[error("expected {expected} token, got {found}")]
    Class {
        expected: TokenClass,
        found: TokenClass,
    },
}

impl Rejection {
    pub(crate) fn stage(&self) -> &'static str {
        match self {
            Rejection::Malformed(_) => "structure",
            Rejection::Algorithm(_) => "algorithm",
            Rejection::Signature(_) => "signature",
            Rejection::Expired { .. } => "expiry",
            Rejection::Issuer(_) => "issuer",
            Rejection::Class { .. } => "class",
        }
    }
}

/// Verifies tokens against the per-class public keys
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyStore>,
    config: Arc<TokenConfig>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyStore>, config: Arc<TokenConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys,
            config,
            clock,
        }
    }

    /// Verify `token` as a token of class `expected`
    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<TokenMetadata> {
        self.check(token, expected).map_err(|rejection| {
            debug!(
                expected = %expected,
                stage = rejection.stage(),
                reason = %rejection,
                "Token rejected"
            );
            AuthError::InvalidToken
        })
    }

    pub(crate) fn check(
        &self,
        token: &str,
        expected: TokenClass,
    ) -> std::result::Result<TokenMetadata, Rejection> {
        if token.split('.').count() != 3 {
            return Err(Rejection::Malformed("expected three segments".into()));
        }

        // "none" and symmetric algorithms either fail to parse here or are
        // refused by the family check below.
        let header = decode_header(token).map_err(|e| Rejection::Malformed(e.to_string()))?;
        if !RSA_FAMILY.contains(&header.alg) {
            return Err(Rejection::Algorithm(header.alg));
        }

        let claims = decode::<Claims>(
            token,
            self.keys.pair(expected).decoding_key(),
            &self.validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidRsaKey(_) | ErrorKind::Crypto(_) => {
                Rejection::Signature(e.to_string())
            }
            ErrorKind::InvalidAlgorithm => Rejection::Algorithm(header.alg),
            _ => Rejection::Malformed(e.to_string()),
        })?
        .claims;

        let now = self.clock.now().timestamp();
        if now >= claims.exp {
            return Err(Rejection::Expired {
                expires_at: claims.exp,
                now,
            });
        }

        if claims.iss != self.config.issuer {
            return Err(Rejection::Issuer(claims.iss));
        }

        if claims.token_type != expected {
            return Err(Rejection::Class {
                expected,
                found: claims.token_type,
            });
        }

        Ok(claims.into())
    }

    // Signature and structure only; time, issuer and class are checked
    // above against the injected clock.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm);
        validation.algorithms = RSA_FAMILY.to_vec();
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }
}
