//! Error types for the chat pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("OpenAI API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("Invalid participant registry: {0}")]
    InvalidRegistry(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
