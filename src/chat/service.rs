use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::history::{HistoryStore, Role};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::retrieval::TfidfIndex;

use super::prompt::build_prompt;

/// Number of documents interpolated into each prompt. Fixed, not
/// caller-configurable.
const TOP_N: usize = 2;

/// Orchestrates one chat turn: retrieve context, build the prompt, extend
/// the session transcript, call the model.
#[derive(Clone)]
pub struct ChatService {
    index: Arc<TfidfIndex>,
    history: HistoryStore,
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
}

impl ChatService {
    pub fn new(
        index: Arc<TfidfIndex>,
        history: HistoryStore,
        provider: Arc<dyn LlmProvider>,
        model: String,
        temperature: f64,
    ) -> Self {
        Self {
            index,
            history,
            provider,
            model,
            temperature,
        }
    }

    pub fn index(&self) -> &TfidfIndex {
        &self.index
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Answers `query` within `session_id`, creating the session on first
    /// use. On a model failure the already-appended user turn stays
    /// recorded; the assistant turn is only appended on success.
    pub async fn answer(&self, session_id: &str, query: &str) -> Result<String, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::EmptyQuery);
        }

        let retrieved = self.index.query(query, TOP_N);
        tracing::debug!(
            "retrieved documents {:?} for session {}",
            retrieved.iter().map(|doc| doc.id).collect::<Vec<_>>(),
            session_id
        );
        let context = retrieved
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let prompt = build_prompt(&context, query);
        self.history.append(session_id, Role::User, &prompt).await;

        let messages: Vec<ChatMessage> = self
            .history
            .render(session_id)
            .await
            .into_iter()
            .map(|turn| ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content,
            })
            .collect();
        let request = ChatRequest::new(messages).with_temperature(self.temperature);

        let reply = self.provider.chat(request, &self.model).await?;

        self.history
            .append(session_id, Role::Assistant, &reply)
            .await;
        Ok(reply)
    }
}
