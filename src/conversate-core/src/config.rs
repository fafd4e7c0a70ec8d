//! Configuration module for loading TOML config files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ChatError;
use crate::participant::Participant;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub chat: ChatSettings,
    pub speech: SpeechSettings,
    pub prompts: PromptsConfig,
    pub participants: Vec<Participant>,
}

/// Settings for the language-model call.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    /// Model used to pick a speaker and write the reply.
    pub model: String,
    /// Response length cap; replies are 2-3 sentences.
    pub max_tokens: u32,
}

/// Settings for the speech synthesis service.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    /// Synthesis endpoint URL.
    pub endpoint: String,
    /// Audio container format requested from the service.
    pub format: String,
}

/// Prompt templates.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    /// Per-turn instruction, with `{context}` and `{participants}` placeholders.
    pub turn_prompt: String,
    /// Scripted opening line spoken by the first participant.
    #[serde(default)]
    pub greeting: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChatError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ChatError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_str(&content)
    }

    /// Load configuration from string content.
    pub fn from_str(content: &str) -> Result<Self, ChatError> {
        toml::from_str(content)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Default configuration embedded in the binary: the demo panel of five
/// scientists.
pub fn default_config() -> Config {
    Config {
        chat: ChatSettings {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 200,
        },
        speech: SpeechSettings {
            endpoint: "https://api.murf.ai/v1/speech/generate".to_string(),
            format: "mp3".to_string(),
        },
        prompts: PromptsConfig {
            turn_prompt: DEFAULT_TURN_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        },
        participants: vec![
            Participant::new(
                "Albert Einstein",
                "A brilliant physicist known for the theory of relativity. Speaks with deep \
                 insight about space, time, and the universe. Often uses thought experiments \
                 and analogies.",
                "en-US-Wavenet-D",
            ),
            Participant::new(
                "Isaac Newton",
                "A mathematical genius who discovered gravity. Precise and methodical in \
                 explanations. Interested in mechanics and mathematics.",
                "en-GB-Wavenet-B",
            ),
            Participant::new(
                "Marie Curie",
                "A pioneering scientist in radioactivity. Passionate about research and \
                 discovery. Speaks about persistence and the joy of scientific inquiry.",
                "en-GB-Wavenet-C",
            ),
            Participant::new(
                "Nikola Tesla",
                "A visionary inventor focused on electricity and energy. Speaks with \
                 enthusiasm about future technology and innovation.",
                "en-US-Wavenet-B",
            ),
            Participant::new(
                "Charles Darwin",
                "A naturalist who developed the theory of evolution. Observant and \
                 detail-oriented. Speaks about nature, adaptation, and the interconnectedness \
                 of life.",
                "en-GB-Wavenet-D",
            ),
        ],
    }
}

const DEFAULT_TURN_PROMPT: &str = r#"You are participating in a scientific discussion. Here's the context:
{context}

Choose one of these participants to respond as: {participants}.
Respond naturally and concisely (2-3 sentences) in their voice and personality.

Format your response in JSON:
{
  "speaker": "[participant name]",
  "message": "[your response]"
}"#;

const DEFAULT_GREETING: &str = "Welcome to our scientific discussion! I'm joined by my esteemed \
colleagues. Feel free to ask us anything about science, our theories, or start a discussion \
between us.";
