//! Response generator client.
//!
//! Sends the formatted conversation context to an OpenAI-compatible chat
//! endpoint and parses the structured persona reply.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ChatError;

/// A parsed persona reply: which participant speaks, and what they say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaReply {
    pub speaker: String,
    pub message: String,
}

/// Client that turns a formatted context into a persona reply.
///
/// One outbound model call per invocation; no caching, no retry.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(
        &self,
        context: &str,
        participant_names: &[String],
    ) -> Result<PersonaReply, ChatError>;
}

/// Connection settings for the model endpoint.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Turn prompt template with `{context}` and `{participants}` placeholders.
    pub prompt_template: String,
}

/// Production [`ResponseGenerator`] backed by an OpenAI-compatible API.
pub struct ModelResponder {
    settings: ModelSettings,
}

impl ModelResponder {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }

    /// Get a completion from the model for the given prompt.
    async fn complete(&self, prompt: String) -> Result<String, ChatError> {
        // Custom HTTP client so hung calls fail instead of blocking the turn
        // pipeline indefinitely.
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let config = OpenAIConfig::new()
            .with_api_key(&self.settings.api_key)
            .with_api_base(&self.settings.api_base);

        let client = Client::with_config(config).with_http_client(http_client);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .max_completion_tokens(self.settings.max_tokens)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: prompt.into(),
                    name: None,
                },
            )])
            .build()?;

        let response = client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        tracing::debug!(chars = content.len(), "model reply received");
        Ok(content)
    }
}

#[async_trait]
impl ResponseGenerator for ModelResponder {
    async fn generate(
        &self,
        context: &str,
        participant_names: &[String],
    ) -> Result<PersonaReply, ChatError> {
        let prompt = render_prompt(&self.settings.prompt_template, context, participant_names);
        let raw = self.complete(prompt).await?;
        let reply = parse_reply(&raw)?;
        validate_speaker(reply, participant_names)
    }
}

/// Build the turn prompt from its template.
pub fn render_prompt(template: &str, context: &str, participant_names: &[String]) -> String {
    template
        .replace("{context}", context)
        .replace("{participants}", &participant_names.join(", "))
}

#[derive(Debug, Deserialize)]
struct RawReply {
    speaker: String,
    message: String,
}

/// Parse the model output as a `{speaker, message}` JSON object.
///
/// Models often wrap the object in markdown fences or surrounding prose, so
/// the outermost object is extracted before deserializing. Anything that
/// still fails to parse is a hard [`ChatError::MalformedResponse`].
fn parse_reply(raw: &str) -> Result<RawReply, ChatError> {
    let stripped = strip_code_fences(raw);
    let candidate = extract_object(&stripped).unwrap_or(&stripped);

    serde_json::from_str(candidate).map_err(|e| ChatError::MalformedResponse(e.to_string()))
}

/// Check that the chosen speaker exists in the registry.
fn validate_speaker(
    reply: RawReply,
    participant_names: &[String],
) -> Result<PersonaReply, ChatError> {
    if !participant_names.iter().any(|n| n == &reply.speaker) {
        return Err(ChatError::UnknownSpeaker(reply.speaker));
    }

    Ok(PersonaReply {
        speaker: reply.speaker,
        message: reply.message,
    })
}

/// Strip a surrounding ```json fence, if present.
fn strip_code_fences(raw: &str) -> String {
    if let Ok(re) = regex::Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```") {
        if let Some(caps) = re.captures(raw) {
            return caps[1].to_string();
        }
    }

    raw.trim().to_string()
}

/// Slice out the outermost `{...}`, tolerating prose around it.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
