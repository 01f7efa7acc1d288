//! Per-request authentication
//!
//! A request moves Unauthenticated -> HeaderExtracted -> Verified ->
//! Authenticated, or drops to Rejected from any of them. The result is a
//! [`RequestContext`] owned by the handler for that one request; nothing is
//! cached between requests.

use hyper::header::AUTHORIZATION;
use hyper::HeaderMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{AuthenticatedIdentity, TokenClass, TokenMetadata, TokenVerifier, UserDirectory};
use crate::types::{AuthError, Result};

/// Scheme expected in the Authorization header
pub const BEARER_SCHEME: &str = "Bearer";

/// Where a request is in the authentication flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    HeaderExtracted,
    Verified,
    Authenticated,
    Rejected,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateState::Unauthenticated => "unauthenticated",
            GateState::HeaderExtracted => "header_extracted",
            GateState::Verified => "verified",
            GateState::Authenticated => "authenticated",
            GateState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Request-scoped authentication results
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<AuthenticatedIdentity>,
    token: Option<TokenMetadata>,
}

impl RequestContext {
    /// Context for a request that has not been through the gate
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The authenticated user, or `Unauthorized` if the gate never ran
    pub fn identity(&self) -> Result<&AuthenticatedIdentity> {
        self.identity.as_ref().ok_or(AuthError::Unauthorized)
    }

    /// The verified token metadata, or `Unauthorized` if the gate never ran
    pub fn token_metadata(&self) -> Result<&TokenMetadata> {
        self.token.as_ref().ok_or(AuthError::Unauthorized)
    }
}

/// Extract the token from a single `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str> {
    let mut values = headers.get_all(AUTHORIZATION).iter();
    let value = match (values.next(), values.next()) {
        (None, _) => return Err(AuthError::MissingCredential),
        (Some(_), Some(_)) => return Err(AuthError::MalformedCredential),
        (Some(value), None) => value,
    };

    let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
    if value.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// Turns a raw credential into an authenticated identity or a rejection
#[derive(Clone)]
pub struct AuthenticationGate {
    verifier: TokenVerifier,
    directory: Arc<dyn UserDirectory>,
}

impl AuthenticationGate {
    pub fn new(verifier: TokenVerifier, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            verifier,
            directory,
        }
    }

    /// Authenticate a request from its headers
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<RequestContext> {
        let mut state = GateState::Unauthenticated;

        let token = extract_bearer_token(headers).map_err(|e| reject(state, e))?;
        state = GateState::HeaderExtracted;

        // Expired, forged and wrong-class tokens all look the same from here
        let metadata = self
            .verifier
            .verify(token, TokenClass::Access)
            .map_err(|_| reject(state, AuthError::InvalidToken))?;
        state = GateState::Verified;

        let identity = match self.directory.find_by_subject(&metadata.subject_id).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(reject(state, AuthError::UserNotFound)),
            Err(e) => {
                warn!(subject = %metadata.subject_id, "User lookup failed: {}", e);
                return Err(reject(state, AuthError::Internal(e.to_string())));
            }
        };

        debug!(
            subject = %metadata.subject_id,
            from = %state,
            to = %GateState::Authenticated,
            "Request authenticated"
        );

        Ok(RequestContext {
            identity: Some(identity),
            token: Some(metadata),
        })
    }

    /// Role requirement hook
    ///
    /// Only checks that the request is authenticated; roles are not
    /// enforced yet.
    pub fn require_role(&self, ctx: &RequestContext, roles: &[&str]) -> Result<()> {
        let identity = ctx.identity()?;
        debug!(subject = %identity.subject_id, ?roles, "Role check skipped");
        Ok(())
    }
}

impl fmt::Debug for AuthenticationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationGate")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

fn reject(from: GateState, err: AuthError) -> AuthError {
    debug!(from = %from, to = %GateState::Rejected, reason = %err, "Request rejected");
    err
}
