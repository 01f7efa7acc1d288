//! User lookup collaborator
//!
//! The gate only needs to turn a verified subject id into the minimal
//! identity handlers see. Real deployments implement [`UserDirectory`] over
//! their user store; [`InMemoryUserDirectory`] backs local runs and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::auth::SubjectId;
use crate::types::AuthError;

/// Minimal user projection attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub subject_id: SubjectId,
    pub email: String,
    pub name: String,
}

/// Failure of the lookup itself (as opposed to a miss)
#[derive(Debug, thiserror::Error)]
#[error("user directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Resolves subjects to identities
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the subject does not exist
    async fn find_by_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<AuthenticatedIdentity>, DirectoryError>;
}

/// Directory held in memory
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<SubjectId, AuthenticatedIdentity>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a JSON array of identities
    pub fn from_json_file(path: &Path) -> Result<Self, AuthError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Config(format!("failed to read users file {}: {}", path.display(), e))
        })?;
        let identities: Vec<AuthenticatedIdentity> = serde_json::from_str(&text).map_err(|e| {
            AuthError::Config(format!("invalid users file {}: {}", path.display(), e))
        })?;

        let directory = Self::new();
        for identity in identities {
            directory.insert(identity);
        }

        info!("Loaded {} users from {}", directory.len(), path.display());
        Ok(directory)
    }

    pub fn insert(&self, identity: AuthenticatedIdentity) {
        self.users.insert(identity.subject_id.clone(), identity);
    }

    pub fn remove(&self, subject: &SubjectId) -> Option<AuthenticatedIdentity> {
        self.users.remove(subject).map(|(_, identity)| identity)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<AuthenticatedIdentity>, DirectoryError> {
        Ok(self.users.get(subject).map(|entry| entry.value().clone()))
    }
}
