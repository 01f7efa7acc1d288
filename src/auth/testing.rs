//! Fixtures shared by the auth unit tests

use chrono::Duration;
use jsonwebtoken::{Algorithm, Header};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::auth::{ClassSettings, Claims, KeyStore, TokenClass, TokenConfig};

pub(crate) fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/keys")
        .join(name)
}

pub(crate) fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

pub(crate) fn fixture_config() -> Arc<TokenConfig> {
    Arc::new(TokenConfig {
        issuer: "keygate-test".into(),
        algorithm: Algorithm::RS256,
        access: ClassSettings {
            private_key_path: fixture("access_private.pem"),
            public_key_path: fixture("access_public.pem"),
            expiration: Duration::minutes(15),
        },
        refresh: ClassSettings {
            private_key_path: fixture("refresh_private.pem"),
            public_key_path: fixture("refresh_public.pem"),
            expiration: Duration::days(30),
        },
    })
}

/// Key store loaded once per test binary
pub(crate) fn fixture_keys() -> Arc<KeyStore> {
    static KEYS: OnceLock<Arc<KeyStore>> = OnceLock::new();
    KEYS.get_or_init(|| Arc::new(KeyStore::load(&fixture_config()).unwrap()))
        .clone()
}

/// Sign arbitrary claims with one class's private key
pub(crate) fn sign_with(class: TokenClass, claims: &Claims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        claims,
        fixture_keys().pair(class).encoding_key(),
    )
    .unwrap()
}
