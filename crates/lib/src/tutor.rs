//! Reply generator: denylist screen, then one chat-completion round trip.
//!
//! This path never errors toward the caller. Every failure class maps to a
//! fixed conversational string so the webhook always has something to say.

use crate::config::{resolve_api_key, Config};
use crate::guard::{self, Verdict};
use crate::llm::{ChatMessage, DeepSeekClient};
use std::time::Duration;

/// Teaching constraints given to the model on every turn. The sensitive-topic
/// refusal is repeated here so the model refuses even when the denylist does
/// not catch a phrasing; model output is otherwise returned unfiltered.
const SYSTEM_PROMPT: &str = "\
你是一个耐心、友好的英语老师，专门教零基础中国成年人学习英语。

教学原则：
1. 只用简单英语回复，句子不超过8个单词
2. 每次只教1-2个新单词
3. 多用鼓励性语言：Good job! Excellent! Well done!
4. 如果学生说中文，用简单英语回复并鼓励他们说英语
5. 绝对不讨论政治、宗教、色情等敏感话题
6. 专注于日常生活场景：吃饭、工作、家庭、购物等";

/// Fallback when the upstream answered with JSON but no choices (this
/// includes the API's structured error bodies, e.g. an invalid key).
pub const EMPTY_FALLBACK: &str = "Let's try again! Say something in English.";

/// Fallback when the upstream call itself failed (network, timeout, non-JSON body).
pub const ERROR_FALLBACK: &str = "I'm learning too! Try again with simple English.";

/// English-tutor reply generator. One instance is shared across requests;
/// it holds only immutable settings and the HTTP client.
pub struct Tutor {
    client: DeepSeekClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Tutor {
    /// Build from config; resolves the API key (env over file) once.
    pub fn from_config(config: &Config) -> Self {
        let api_key = resolve_api_key(config);
        if api_key.is_none() {
            log::warn!("no upstream API key configured (DEEPSEEK_API_KEY); calls will fail");
        }
        let client = DeepSeekClient::new(
            Some(config.upstream.base_url.clone()),
            api_key,
            Duration::from_secs(config.upstream.timeout_secs),
        );
        Self {
            client,
            model: config.upstream.model.clone(),
            max_tokens: config.upstream.max_tokens,
            temperature: config.upstream.temperature,
        }
    }

    /// Generate a reply for one user message. Screens against the denylist
    /// first; on a hit the upstream is never called. Upstream failures and
    /// empty completions map to distinct fixed fallbacks.
    pub async fn generate_reply(&self, user_message: &str) -> String {
        if guard::screen(user_message) == Verdict::Refuse {
            return guard::REFUSAL.to_string();
        }

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message),
        ];
        match self
            .client
            .chat(&self.model, messages, self.max_tokens, self.temperature)
            .await
        {
            Ok(res) => match res.first_content() {
                Some(content) => content.to_string(),
                None => EMPTY_FALLBACK.to_string(),
            },
            Err(e) => {
                log::warn!("upstream chat call failed: {}", e);
                ERROR_FALLBACK.to_string()
            }
        }
    }
}
