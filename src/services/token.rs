//! Bearer token verification.
//!
//! Tokens are JWTs carrying the granted scopes in `scope` (space-delimited
//! string or array). `scp` is read only when `scope` is absent.

use std::collections::BTreeSet;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, TokenKey},
    error::AuthError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeClaim {
    Delimited(String),
    List(Vec<String>),
}

impl ScopeClaim {
    fn values(&self) -> Vec<&str> {
        match self {
            ScopeClaim::Delimited(raw) => raw.split_whitespace().collect(),
            ScopeClaim::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scp: Option<ScopeClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

/// Authenticated caller, available to handlers as a request extension.
/// Tokens without a `sub` claim still authenticate, with no subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: Option<String>,
    pub scopes: BTreeSet<String>,
}

impl Principal {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    pub fn has_any_scope<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        scopes.iter().any(|s| self.has_scope(s.as_ref()))
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        let scopes = claims
            .scope
            .as_ref()
            .or(claims.scp.as_ref())
            .map(|claim| claim.values().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        Self { subject: claims.sub, scopes }
    }
}

#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_config(config: &AppConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let (decoding_key, algorithm) = match &config.token_key {
            TokenKey::Hmac(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            TokenKey::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem)?, Algorithm::RS256),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { decoding_key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| Principal::from(data.claims))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Mints HS256 tokens. Used for local development and tests; production
/// tokens come from the authorization server.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(
        &self,
        subject: &str,
        scopes: &[&str],
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Some(subject.to_string()),
            scope: Some(ScopeClaim::Delimited(scopes.join(" "))),
            scp: None,
            iss: None,
            iat: Some(now),
            exp: now + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }
}
