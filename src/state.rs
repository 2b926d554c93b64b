// src/state.rs
use std::sync::Arc;

use crate::config::{AppConfig, OAuthClientConfig};
use crate::services::messages::MessageService;
use crate::services::policy::PolicyTable;
use crate::services::token::TokenVerifier;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub messages: MessageService,
    pub policy: PolicyTable,
    pub tokens: TokenVerifier,
    pub oauth: OAuthClientConfig,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self {
            messages: MessageService::new(config.seed_messages.clone(), config.create_mode),
            policy: PolicyTable::standard(),
            tokens: TokenVerifier::from_config(config)?,
            oauth: config.oauth.clone(),
        })
    }
}
