//! Token payload types
//!
//! `Claims` only ever exists inside a signed token. `TokenMetadata` is the
//! verified subset handed back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token class: determines key pair, lifetime and audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub const ALL: [TokenClass; 2] = [TokenClass::Access, TokenClass::Refresh];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the user a token was minted for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Payload stored in a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user) identifier
    pub sub: SubjectId,
    /// Token class
    pub token_type: TokenClass,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Access and refresh token minted together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Verified subset of the claims, returned after successful validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub subject_id: SubjectId,
    pub token_type: TokenClass,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for TokenMetadata {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            token_type: claims.token_type,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
