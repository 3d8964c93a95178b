//! Shared application state.

use crate::config::Config;
use chrono::TimeDelta;
use sqlchat_core::{
    Accounts, ChatService, ConnectionRegistry, QueryTranslator, Store, TokenSigner, TranslatorClient,
};
use std::sync::Arc;

pub struct AppState {
    pub accounts: Accounts,
    pub registry: ConnectionRegistry,
    pub chat: ChatService,
    pub config: Config,
}

impl AppState {
    /// Wire the state against the configured translation service.
    pub fn new(config: Config) -> sqlchat_core::Result<Self> {
        let translator = Arc::new(TranslatorClient::new(config.translator_url.clone())?);
        Self::with_translator(config, translator)
    }

    /// Wire the state against any translator implementation.
    pub fn with_translator(
        config: Config,
        translator: Arc<dyn QueryTranslator>,
    ) -> sqlchat_core::Result<Self> {
        let store = Arc::new(Store::open(&config.db_path)?);
        let ttl = TimeDelta::seconds(config.token_ttl_secs.min(i64::MAX as u64) as i64);
        let signer = Arc::new(TokenSigner::from_files(
            &config.jwt_private_key_path,
            &config.jwt_public_key_path,
            ttl,
        )?);

        Ok(Self {
            accounts: Accounts::new(store.clone(), signer),
            registry: ConnectionRegistry::new(store.clone(), translator.clone()),
            chat: ChatService::new(store, translator, config.default_query_timeout()),
            config,
        })
    }
}
