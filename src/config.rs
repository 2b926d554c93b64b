// src/config.rs
use std::{env, path::PathBuf};

use thiserror::Error;

use crate::services::messages::CreateMode;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REGISTRATION_ID: &str = "client-oauth";
pub const DEFAULT_SEED_MESSAGE: &str = "Hello, World!";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either JWT_SECRET or JWT_PUBLIC_KEY_PATH must be set")]
    MissingKey,
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Key material used to verify bearer tokens.
#[derive(Debug, Clone)]
pub enum TokenKey {
    /// Shared secret, HS256.
    Hmac(String),
    /// PEM encoded RSA public key, RS256.
    RsaPem(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub registration_id: String,
    pub authorization_uri: String,
    pub client_id: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
}

impl Default for OAuthClientConfig {
    fn default() -> Self {
        Self {
            registration_id: DEFAULT_REGISTRATION_ID.to_string(),
            authorization_uri: "http://127.0.0.1:9000/oauth2/authorize".to_string(),
            client_id: "client-app".to_string(),
            scopes: vec!["openid".to_string(), "read".to_string(), "write".to_string()],
            redirect_uri: "http://127.0.0.1:3000/authorized".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub token_key: TokenKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub create_mode: CreateMode,
    pub seed_messages: Vec<String>,
    pub oauth: OAuthClientConfig,
}

impl AppConfig {
    /// Config with defaults for everything except the HMAC secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            token_key: TokenKey::Hmac(secret.into()),
            issuer: None,
            audience: None,
            create_mode: CreateMode::Echo,
            seed_messages: vec![DEFAULT_SEED_MESSAGE.to_string()],
            oauth: OAuthClientConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token_key = match (non_empty("JWT_PUBLIC_KEY_PATH"), non_empty("JWT_SECRET")) {
            (Some(path), _) => {
                let path = PathBuf::from(path);
                let pem = std::fs::read(&path).map_err(|source| ConfigError::Io { path, source })?;
                TokenKey::RsaPem(pem)
            }
            (None, Some(secret)) => TokenKey::Hmac(secret),
            (None, None) => return Err(ConfigError::MissingKey),
        };

        let create_mode = match non_empty("MESSAGE_MODE") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "MESSAGE_MODE",
                value,
            })?,
            None => CreateMode::Echo,
        };

        let seed_messages = non_empty("SEED_MESSAGES")
            .map(|raw| raw.split('|').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|| vec![DEFAULT_SEED_MESSAGE.to_string()]);

        let defaults = OAuthClientConfig::default();
        let oauth = OAuthClientConfig {
            registration_id: non_empty("OAUTH_REGISTRATION_ID").unwrap_or(defaults.registration_id),
            authorization_uri: non_empty("OAUTH_AUTHORIZATION_URI")
                .unwrap_or(defaults.authorization_uri),
            client_id: non_empty("OAUTH_CLIENT_ID").unwrap_or(defaults.client_id),
            scopes: non_empty("OAUTH_SCOPES")
                .map(|raw| split_scopes(&raw))
                .unwrap_or(defaults.scopes),
            redirect_uri: non_empty("OAUTH_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            token_key,
            issuer: non_empty("JWT_ISSUER"),
            audience: non_empty("JWT_AUDIENCE"),
            create_mode,
            seed_messages,
            oauth,
        })
    }
}

// Accepts both "read write" and "read,write".
fn split_scopes(raw: &str) -> Vec<String> {
    raw.split([' ', ','])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
