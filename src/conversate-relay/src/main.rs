//! Conversate Relay - stateless chat forwarding service.
//!
//! Accepts a conversation payload from a browser client and forwards the
//! last message to an OpenAI-compatible endpoint as a fresh single-turn
//! session. No history is persisted across requests; every failure maps to
//! a generic 500.

use std::env;
use std::sync::Arc;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Connection settings for the upstream model endpoint.
#[derive(Debug, Clone)]
struct RelaySettings {
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    messages: Vec<RelayMessage>,
}

#[derive(Debug, Deserialize)]
struct RelayMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: &'static str,
}

#[derive(Error, Debug)]
enum RelayError {
    #[error("request contained no messages")]
    EmptyPayload,

    #[error("OpenAI API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("model returned no content")]
    EmptyCompletion,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Arc::new(RelaySettings {
        api_base: env::var("OPENAI_API_BASE")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
        model: env::var("RELAY_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
    });

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let app = Router::new()
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(settings);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "relay listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn chat(
    State(settings): State<Arc<RelaySettings>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ErrorReply>)> {
    match relay_turn(&settings, &request).await {
        Ok(message) => Ok(Json(ChatReply { message })),
        Err(err) => {
            error!(error = %err, "relay request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReply {
                    error: "Internal server error",
                }),
            ))
        }
    }
}

/// Forward the last message to the model as a single-turn session.
async fn relay_turn(settings: &RelaySettings, request: &ChatRequest) -> Result<String, RelayError> {
    let content = last_content(&request.messages).ok_or(RelayError::EmptyPayload)?;

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .connect_timeout(std::time::Duration::from_secs(30))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_key(&settings.api_key)
        .with_api_base(&settings.api_base);

    let client = Client::with_config(config).with_http_client(http_client);

    let completion_request = CreateChatCompletionRequestArgs::default()
        .model(&settings.model)
        .messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: content.to_string().into(),
                name: None,
            },
        )])
        .build()?;

    let response = client.chat().create(completion_request).await?;

    response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|content| !content.is_empty())
        .ok_or(RelayError::EmptyCompletion)
}

/// The relay forwards only the final entry of the submitted conversation.
fn last_content(messages: &[RelayMessage]) -> Option<&str> {
    messages.last().map(|m| m.content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_content_picks_final_entry() {
        let messages = vec![
            RelayMessage {
                content: "first".to_string(),
            },
            RelayMessage {
                content: "second".to_string(),
            },
        ];
        assert_eq!(last_content(&messages), Some("second"));
    }

    #[test]
    fn test_last_content_empty_payload() {
        assert_eq!(last_content(&[]), None);
    }

    #[test]
    fn test_chat_request_parses_browser_payload() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"messages": [{"content": "Hello"}]}"#).unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "Hello");
    }

    #[test]
    fn test_chat_request_missing_messages_is_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.messages.is_empty());
    }

    #[test]
    fn test_error_reply_shape() {
        let body = serde_json::to_string(&ErrorReply {
            error: "Internal server error",
        })
        .unwrap();
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
    }
}
