//! Conversate Core Library
//!
//! Provides the conversation turn pipeline: the participant registry,
//! context formatting, the model and speech-synthesis clients, and the
//! single-flight turn orchestrator.

pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod participant;
pub mod responder;
pub mod speech;

pub use config::{Config, default_config};
pub use context::{HISTORY_WINDOW, format_context};
pub use error::ChatError;
pub use message::Message;
pub use orchestrator::{
    ChatCallback, ChatEvent, ChatOrchestrator, SendOutcome, TURN_ERROR_NOTICE, TurnState,
};
pub use participant::Participant;
pub use responder::{ModelResponder, ModelSettings, PersonaReply, ResponseGenerator};
pub use speech::{SpeechApiClient, SpeechSynthesizer};
