//! Webhook HTTP server: liveness, diagnostic, and the platform callback.

use crate::config::Config;
use crate::tutor::Tutor;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Status string served at the root path (liveness probes).
const LIVENESS_MESSAGE: &str = "英语学习机器人服务正常运行中！";

/// Sent when the inbound payload carried no usable text.
const PROMPT_FOR_INPUT: &str = "Please say something in English!";

/// Sent when request handling failed for any internal reason.
const BUSY_MESSAGE: &str = "System busy, try again later.";

/// Fixed input used by the GET /test diagnostic.
const TEST_MESSAGE: &str = "hello";

/// Shared state for the server: the reply generator, built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub tutor: Arc<Tutor>,
}

/// Text-reply envelope the messaging platform expects:
/// `{"msgtype":"text","text":{"content":…}}`.
#[derive(Debug, Serialize)]
pub struct ReplyEnvelope {
    msgtype: &'static str,
    text: ReplyText,
}

#[derive(Debug, Serialize)]
struct ReplyText {
    content: String,
}

impl ReplyEnvelope {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            msgtype: "text",
            text: ReplyText {
                content: content.into(),
            },
        }
    }
}

/// Build the router (exposed separately so tests can drive it directly).
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/test", get(test_bot))
        .route("/wechat/webhook", post(wechat_webhook))
        .with_state(state)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Port precedence (CLI flag, PORT env) is resolved by the caller before this.
/// Blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn run_server(config: Config) -> Result<()> {
    let port = config.server.port;
    let bind = config.server.bind.trim().to_string();
    let state = ServerState {
        tutor: Arc::new(Tutor::from_config(&config)),
    };
    let app = router(state);

    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// Extract the user message from a webhook payload: `text` first, then
/// `Content`, surrounding whitespace trimmed. None when both are empty/absent.
fn extract_message(payload: &serde_json::Value) -> Option<String> {
    for field in ["text", "Content"] {
        if let Some(s) = payload.get(field).and_then(|v| v.as_str()) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// POST /wechat/webhook — platform callback. Always answers 200 with a text
/// envelope: malformed JSON and internal failures get the busy message, a
/// missing/empty message gets a prompt, anything else gets a generated reply.
async fn wechat_webhook(State(state): State<ServerState>, body: Bytes) -> Json<ReplyEnvelope> {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("webhook payload not JSON: {}", e);
            return Json(ReplyEnvelope::text(BUSY_MESSAGE));
        }
    };
    log::debug!("webhook payload: {}", payload);

    let Some(user_message) = extract_message(&payload) else {
        return Json(ReplyEnvelope::text(PROMPT_FOR_INPUT));
    };

    let reply = state.tutor.generate_reply(&user_message).await;
    log::info!("reply: {}", reply);
    Json(ReplyEnvelope::text(reply))
}

/// GET /test — run the generator against a fixed sample input and return a
/// human-readable diagnostic (not the webhook envelope).
async fn test_bot(State(state): State<ServerState>) -> Html<String> {
    let reply = state.tutor.generate_reply(TEST_MESSAGE).await;
    Html(format!("测试消息: {}<br>机器人回复: {}", TEST_MESSAGE, reply))
}

/// GET / returns a fixed status string (liveness).
async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_prefers_text_over_content() {
        let payload = json!({ "text": "hello", "Content": "other" });
        assert_eq!(extract_message(&payload).as_deref(), Some("hello"));
    }

    #[test]
    fn extract_falls_back_to_content() {
        let payload = json!({ "Content": "  你好  " });
        assert_eq!(extract_message(&payload).as_deref(), Some("你好"));
    }

    #[test]
    fn extract_empty_text_falls_through_to_content() {
        let payload = json!({ "text": "   ", "Content": "hi" });
        assert_eq!(extract_message(&payload).as_deref(), Some("hi"));
    }

    #[test]
    fn extract_none_when_both_missing_or_empty() {
        assert!(extract_message(&json!({})).is_none());
        assert!(extract_message(&json!({ "text": "" })).is_none());
        // Non-string fields and non-object bodies read as "no text": the
        // caller prompts for input rather than reporting an internal failure.
        assert!(extract_message(&json!({ "text": 42 })).is_none());
        assert!(extract_message(&json!(null)).is_none());
    }

    #[test]
    fn envelope_serializes_platform_shape() {
        let env = ReplyEnvelope::text("Good job!");
        let v = serde_json::to_value(&env).expect("serialize");
        assert_eq!(
            v,
            json!({ "msgtype": "text", "text": { "content": "Good job!" } })
        );
    }
}
