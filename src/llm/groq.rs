use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// Client for Groq's OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct GroqProvider {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/models", self.base_url);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ModelUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::ModelUnavailable(format!(
                "groq chat error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| ApiError::ModelUnavailable(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    #[test]
    fn trailing_slash_is_stripped_from_the_base_url() {
        let provider = GroqProvider::new(
            "https://api.groq.com/openai/v1/".to_string(),
            "key".to_string(),
        );
        assert_eq!(provider.base_url, "https://api.groq.com/openai/v1");
    }

    #[tokio::test]
    #[ignore]
    async fn live_groq_chat_round_trip() {
        let api_key = std::env::var("GROQ_API_KEY").expect("GROQ_API_KEY must be set");
        let provider = GroqProvider::new("https://api.groq.com/openai/v1".to_string(), api_key);

        assert!(provider.health_check().await.expect("health check"));

        let request = ChatRequest::new(vec![ChatMessage {
            role: "user".to_string(),
            content: "Reply with the single word: pong".to_string(),
        }]);
        let reply = provider
            .chat(request, "llama3-8b-8192")
            .await
            .expect("chat should succeed");
        assert!(!reply.is_empty());
    }
}
