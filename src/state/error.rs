use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("GROQ_API_KEY not found. Please set it in your environment or .env file.")]
    MissingApiKey,

    #[error("Failed to load configuration: {0}")]
    Config(#[source] anyhow::Error),

    #[error("Failed to build relevance index: {0}")]
    Index(#[source] anyhow::Error),
}
