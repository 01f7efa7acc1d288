//! Configuration for keygate
//!
//! CLI arguments and environment variable handling using clap. Token
//! settings are a flattened group so the server and the mint tool read the
//! same variables.

use chrono::Duration;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::{parse_algorithm, ClassSettings, TokenConfig};
use crate::types::AuthError;

/// keygate - bearer token authentication service
#[derive(Parser, Debug, Clone)]
#[command(name = "keygate")]
#[command(about = "Issues and verifies RSA-signed access and refresh tokens")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Token signing configuration
    #[command(flatten)]
    pub tokens: TokenArgs,

    /// JSON file seeding the in-memory user directory
    /// (array of {subject_id, email, name})
    #[arg(long, env = "USERS_FILE")]
    pub users_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Token signing configuration
#[derive(Parser, Debug, Clone)]
pub struct TokenArgs {
    /// Signature algorithm (RS256, RS384 or RS512)
    #[arg(long, env = "JWT_ALGORITHM", default_value = "RS256")]
    pub jwt_algorithm: String,

    /// Issuer embedded in and required of every token
    #[arg(long, env = "JWT_ISSUER", default_value = "keygate")]
    pub jwt_issuer: String,

    /// Access token private key (PEM, PKCS#8 or PKCS#1)
    #[arg(long, env = "JWT_ACCESS_PRIVATE_KEY_PATH", default_value = "keys/access_private.pem")]
    pub access_private_key_path: PathBuf,

    /// Access token public key (PEM, SubjectPublicKeyInfo)
    #[arg(long, env = "JWT_ACCESS_PUBLIC_KEY_PATH", default_value = "keys/access_public.pem")]
    pub access_public_key_path: PathBuf,

    /// Access token lifetime in minutes
    #[arg(long, env = "JWT_ACCESS_EXPIRATION_TIME", default_value = "15")]
    pub access_expiration_minutes: i64,

    /// Refresh token private key (PEM, PKCS#8 or PKCS#1)
    #[arg(long, env = "JWT_REFRESH_PRIVATE_KEY_PATH", default_value = "keys/refresh_private.pem")]
    pub refresh_private_key_path: PathBuf,

    /// Refresh token public key (PEM, SubjectPublicKeyInfo)
    #[arg(long, env = "JWT_REFRESH_PUBLIC_KEY_PATH", default_value = "keys/refresh_public.pem")]
    pub refresh_public_key_path: PathBuf,

    /// Refresh token lifetime in days
    #[arg(long, env = "JWT_REFRESH_EXPIRATION_TIME", default_value = "30")]
    pub refresh_expiration_days: i64,
}

impl TokenArgs {
    /// Resolve into the immutable token configuration
    pub fn token_config(&self) -> Result<TokenConfig, AuthError> {
        if self.access_expiration_minutes <= 0 {
            return Err(AuthError::Config(
                "JWT_ACCESS_EXPIRATION_TIME must be a positive number of minutes".into(),
            ));
        }
        if self.refresh_expiration_days <= 0 {
            return Err(AuthError::Config(
                "JWT_REFRESH_EXPIRATION_TIME must be a positive number of days".into(),
            ));
        }

        let config = TokenConfig {
            issuer: self.jwt_issuer.clone(),
            algorithm: parse_algorithm(&self.jwt_algorithm)?,
            access: ClassSettings {
                private_key_path: self.access_private_key_path.clone(),
                public_key_path: self.access_public_key_path.clone(),
                expiration: Duration::try_minutes(self.access_expiration_minutes).ok_or_else(
                    || AuthError::Config("JWT_ACCESS_EXPIRATION_TIME is out of range".into()),
                )?,
            },
            refresh: ClassSettings {
                private_key_path: self.refresh_private_key_path.clone(),
                public_key_path: self.refresh_public_key_path.clone(),
                expiration: Duration::try_days(self.refresh_expiration_days).ok_or_else(|| {
                    AuthError::Config("JWT_REFRESH_EXPIRATION_TIME is out of range".into())
                })?,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.tokens.token_config().map(|_| ()).map_err(|e| match e {
            AuthError::Config(msg) => msg,
            other => other.to_string(),
        })
    }
}
