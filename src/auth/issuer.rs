//! Token issuance
//!
//! Mints one signed token per class from a subject id. Issuance is pure:
//! nothing is stored, the pair is simply returned.

use jsonwebtoken::{encode, Header};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::auth::{Claims, Clock, KeyStore, SubjectId, TokenClass, TokenConfig, TokenPair};
use crate::types::{AuthError, Result};

/// Signs access/refresh tokens with the per-class private keys
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyStore>,
    config: Arc<TokenConfig>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(keys: Arc<KeyStore>, config: Arc<TokenConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys,
            config,
            clock,
        }
    }

    /// Issue an access + refresh pair for `subject`
    pub fn issue(&self, subject: &SubjectId) -> Result<TokenPair> {
        let access_token = self.issue_class(subject, TokenClass::Access)?;
        let refresh_token = self.issue_class(subject, TokenClass::Refresh)?;

        debug!(subject = %subject, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Issue a single token of the given class
    pub fn issue_class(&self, subject: &SubjectId, class: TokenClass) -> Result<String> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.config.expiration(class))
            .ok_or_else(|| {
                error!(class = %class, "{} token expiry overflows the calendar", class);
                AuthError::TokenGeneration(format!("{} token expiry is out of range", class))
            })?;

        let claims = Claims {
            sub: subject.clone(),
            token_type: class,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims, class)
    }

    fn sign(&self, claims: &Claims, class: TokenClass) -> Result<String> {
        let header = Header::new(self.config.algorithm);

        encode(&header, claims, self.keys.pair(class).encoding_key()).map_err(|e| {
            error!(class = %class, "Failed to sign {} token: {}", class, e);
            AuthError::TokenGeneration(format!("failed to sign {} token: {}", class, e))
        })
    }
}
