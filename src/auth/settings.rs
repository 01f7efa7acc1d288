//! Token configuration, resolved once at startup and read-only thereafter

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::path::PathBuf;

use crate::auth::TokenClass;
use crate::types::AuthError;

/// Algorithms accepted for signing and verification (RSASSA-PKCS1-v1_5)
pub const RSA_FAMILY: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Longest lifetime accepted for either token class
pub const MAX_EXPIRATION_DAYS: i64 = 3650;

/// Parse a configured algorithm name, rejecting anything outside the RSA family
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "RS256" => Ok(Algorithm::RS256),
        "RS384" => Ok(Algorithm::RS384),
        "RS512" => Ok(Algorithm::RS512),
        other => Err(AuthError::Config(format!(
            "unsupported JWT algorithm {:?}, expected one of RS256, RS384, RS512",
            other
        ))),
    }
}

/// Key locations and lifetime for one token class
#[derive(Debug, Clone)]
pub struct ClassSettings {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub expiration: Duration,
}

/// Token issuance and verification settings
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub issuer: String,
    pub algorithm: Algorithm,
    pub access: ClassSettings,
    pub refresh: ClassSettings,
}

impl TokenConfig {
    pub fn class(&self, class: TokenClass) -> &ClassSettings {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    pub fn expiration(&self, class: TokenClass) -> Duration {
        self.class(class).expiration
    }

    /// Check invariants that paths alone cannot express
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.issuer.trim().is_empty() {
            return Err(AuthError::Config("JWT issuer must not be empty".into()));
        }

        if !RSA_FAMILY.contains(&self.algorithm) {
            return Err(AuthError::Config(format!(
                "JWT algorithm {:?} is not an RSA signature algorithm",
                self.algorithm
            )));
        }

        for class in TokenClass::ALL {
            if self.expiration(class) <= Duration::zero() {
                return Err(AuthError::Config(format!(
                    "{} token expiration must be positive",
                    class
                )));
            }
            if self.expiration(class) > Duration::days(MAX_EXPIRATION_DAYS) {
                return Err(AuthError::Config(format!(
                    "{} token expiration must not exceed {} days",
                    class, MAX_EXPIRATION_DAYS
                )));
            }
        }

        Ok(())
    }
}
