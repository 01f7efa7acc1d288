//! Shared helpers for keygate integration tests

#![allow(dead_code)]

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keygate::auth::{
    AuthenticatedIdentity, AuthenticationGate, ClassSettings, InMemoryUserDirectory, KeyStore,
    ManualClock, TokenConfig, TokenService,
};

pub fn key_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/keys")
        .join(name)
}

pub fn class_settings(private: &str, public: &str, expiration: Duration) -> ClassSettings {
    ClassSettings {
        private_key_path: key_path(private),
        public_key_path: key_path(public),
        expiration,
    }
}

/// 15 minute access tokens, 30 day refresh tokens
pub fn test_config() -> TokenConfig {
    TokenConfig {
        issuer: "keygate-it".into(),
        algorithm: Algorithm::RS256,
        access: class_settings(
            "access_private.pem",
            "access_public.pem",
            Duration::minutes(15),
        ),
        refresh: class_settings(
            "refresh_private.pem",
            "refresh_public.pem",
            Duration::days(30),
        ),
    }
}

/// Service over the fixture keys with a clock the test controls
pub fn test_service() -> (TokenService, Arc<ManualClock>) {
    let config = test_config();
    let keys = KeyStore::load(&config).expect("fixture keys load");
    let clock = Arc::new(ManualClock::starting_now());
    let service = TokenService::new(Arc::new(keys), Arc::new(config), clock.clone());
    (service, clock)
}

pub fn identity(subject: &str) -> AuthenticatedIdentity {
    AuthenticatedIdentity {
        subject_id: subject.into(),
        email: format!("user{}@example.com", subject),
        name: format!("User {}", subject),
    }
}

/// Gate over `service` whose directory knows `subjects`
pub fn gate_for(service: &TokenService, subjects: &[&str]) -> AuthenticationGate {
    let directory = InMemoryUserDirectory::new();
    for subject in subjects {
        directory.insert(identity(subject));
    }
    AuthenticationGate::new(service.verifier().clone(), Arc::new(directory))
}

pub fn bearer(token: &str) -> hyper::HeaderMap {
    let mut headers = hyper::HeaderMap::new();
    headers.insert(
        hyper::header::AUTHORIZATION,
        format!("Bearer {}", token).parse().expect("valid header value"),
    );
    headers
}
