//! DeepSeek API client (OpenAI-compatible chat completions).

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Client for the DeepSeek chat-completion API.
#[derive(Clone)]
pub struct DeepSeekClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum DeepSeekError {
    /// Transport failure: connect error, timeout, or body read.
    #[error("deepseek request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response body was not JSON at all.
    #[error("deepseek api error: {0}")]
    Api(String),
}

impl DeepSeekClient {
    /// Build a client. `timeout` bounds the whole request; a slow upstream
    /// fails the call rather than holding the webhook open.
    pub fn new(base_url: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// POST /chat/completions — non-streaming chat completion.
    ///
    /// Status is not checked before decoding: a non-2xx answer carries the
    /// API's structured JSON error body (no `choices`), and callers treat a
    /// choice-less response as its own failure class. Only transport failures
    /// and undecodable bodies surface as errors here.
    pub async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<ChatResponse, DeepSeekError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
        };
        let mut req = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            log::debug!("deepseek non-2xx answer: {} {}", status, body);
        }
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => Ok(serde_json::from_value(value)
                .unwrap_or_else(|_| ChatResponse { choices: Vec::new() })),
            Err(_) => Err(DeepSeekError::Api(format!("{} {}", status, body))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// One candidate completion; only the first is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Content of the first choice's message, if any. Returned verbatim.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_content_of_empty_choices_is_none() {
        let res: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).expect("parse");
        assert!(res.first_content().is_none());
    }

    #[test]
    fn missing_choices_field_parses_as_empty() {
        let res: ChatResponse = serde_json::from_str(r#"{}"#).expect("parse");
        assert!(res.choices.is_empty());
    }

    #[test]
    fn first_content_takes_first_choice_only() {
        let res: ChatResponse = serde_json::from_str(
            r#"{ "choices": [
                { "message": { "role": "assistant", "content": "Good job!" } },
                { "message": { "role": "assistant", "content": "unused" } }
            ] }"#,
        )
        .expect("parse");
        assert_eq!(res.first_content(), Some("Good job!"));
    }
}
