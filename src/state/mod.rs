use std::sync::Arc;

use crate::chat::ChatService;
use crate::core::config::{AppConfig, AppPaths};
use crate::history::HistoryStore;
use crate::llm::GroqProvider;
use crate::retrieval::{builtin_corpus, TfidfIndex};

pub mod error;

use error::InitializationError;

/// Global application state shared across routes and the REPL.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub chat: ChatService,
}

impl AppState {
    /// Loads configuration and builds the relevance index before any
    /// request is accepted. A missing API credential or an empty corpus
    /// halts startup entirely.
    pub fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());
        let config = AppConfig::load(&paths).map_err(InitializationError::Config)?;

        let api_key = config
            .groq
            .api_key
            .clone()
            .ok_or(InitializationError::MissingApiKey)?;

        let index = Arc::new(
            TfidfIndex::build(builtin_corpus())
                .map_err(|e| InitializationError::Index(e.into()))?,
        );

        let history = HistoryStore::new(config.history.max_turns);
        let provider = Arc::new(GroqProvider::new(config.groq.base_url.clone(), api_key));
        let chat = ChatService::new(
            index,
            history,
            provider,
            config.groq.model.clone(),
            config.groq.temperature,
        );

        Ok(Arc::new(AppState {
            paths,
            config,
            chat,
        }))
    }
}
