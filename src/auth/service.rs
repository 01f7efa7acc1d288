//! Issuer and verifier built over one key store

use std::sync::Arc;
use tracing::info;

use crate::auth::{
    Clock, KeyStore, SubjectId, SystemClock, TokenClass, TokenConfig, TokenIssuer,
    TokenMetadata, TokenPair, TokenVerifier,
};
use crate::types::Result;

/// Token lifecycle operations sharing one key store, config and clock
#[derive(Debug, Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl TokenService {
    pub fn new(keys: Arc<KeyStore>, config: Arc<TokenConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            issuer: TokenIssuer::new(keys.clone(), config.clone(), clock.clone()),
            verifier: TokenVerifier::new(keys, config, clock),
        }
    }

    /// Service reading the wall clock
    pub fn with_system_clock(keys: Arc<KeyStore>, config: Arc<TokenConfig>) -> Self {
        Self::new(keys, config, Arc::new(SystemClock))
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn issue(&self, subject: &SubjectId) -> Result<TokenPair> {
        self.issuer.issue(subject)
    }

    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<TokenMetadata> {
        self.verifier.verify(token, expected)
    }

    /// Exchange a valid refresh token for a new pair
    ///
    /// Expired refresh tokens are refused; there is no grace window.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let metadata = self.verifier.verify(refresh_token, TokenClass::Refresh)?;
        let pair = self.issuer.issue(&metadata.subject_id)?;
        info!(subject = %metadata.subject_id, "Refreshed token pair");
        Ok(pair)
    }
}
