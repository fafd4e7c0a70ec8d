//! Turn orchestration logic.
//!
//! Sequences one full user-message to assistant-message cycle: context
//! formatting, the model call, speech synthesis, and the conversation log
//! update. At most one turn runs at a time; a send attempt during an active
//! turn is dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::context::format_context;
use crate::error::ChatError;
use crate::message::Message;
use crate::participant::{self, Participant};
use crate::responder::ResponseGenerator;
use crate::speech::SpeechSynthesizer;

/// Notice shown to the user when a turn fails, whatever the cause.
pub const TURN_ERROR_NOTICE: &str = "Error processing message. Please try again.";

/// Turn pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Processing,
}

/// Events emitted as the conversation log changes.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The user's message was appended to the log.
    UserMessage { message: Message },
    /// A participant's reply was appended to the log.
    AssistantMessage { message: Message },
    /// The turn failed; `notice` is the user-visible text.
    TurnFailed { notice: String },
}

/// Callback for chat events.
pub type ChatCallback = Box<dyn Fn(ChatEvent) + Send + Sync>;

/// Result of a send attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// Both downstream calls succeeded and the reply was appended.
    Completed(Message),
    /// Input was empty; nothing happened.
    Ignored,
    /// Another turn was already processing; the input was discarded.
    Dropped,
    /// The turn failed after the user's message was appended.
    Failed(ChatError),
}

/// Orchestrates conversation turns against the model and synthesis clients.
///
/// Owns the conversation log exclusively; the log is append-only and
/// snapshots are handed out by clone.
pub struct ChatOrchestrator {
    participants: Vec<Participant>,
    user_name: String,
    responder: Box<dyn ResponseGenerator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    messages: Mutex<Vec<Message>>,
    processing: AtomicBool,
    callback: Option<ChatCallback>,
}

impl ChatOrchestrator {
    /// Create a new orchestrator over an immutable participant registry.
    pub fn new(
        participants: Vec<Participant>,
        user_name: impl Into<String>,
        responder: Box<dyn ResponseGenerator>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Result<Self, ChatError> {
        if participants.is_empty() {
            return Err(ChatError::InvalidRegistry(
                "at least one participant is required".to_string(),
            ));
        }

        for (i, p) in participants.iter().enumerate() {
            if participants[..i].iter().any(|q| q.name == p.name) {
                return Err(ChatError::InvalidRegistry(format!(
                    "duplicate participant name '{}'",
                    p.name
                )));
            }
        }

        Ok(Self {
            participants,
            user_name: user_name.into(),
            responder,
            synthesizer,
            messages: Mutex::new(Vec::new()),
            processing: AtomicBool::new(false),
            callback: None,
        })
    }

    /// Set a callback for chat events.
    pub fn with_callback(mut self, callback: ChatCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Seed the log with a scripted greeting from the first participant.
    ///
    /// The greeting is an ordinary assistant message without audio; an empty
    /// greeting is a no-op.
    pub fn greet(&self, greeting: &str) {
        let greeting = greeting.trim();
        if greeting.is_empty() {
            return;
        }

        // new() rejects empty registries, so first() always yields here.
        let Some(first) = self.participants.first() else {
            return;
        };

        let message = Message::assistant(&first.name, greeting, None);
        self.log().push(message.clone());
        self.emit(ChatEvent::AssistantMessage { message });
    }

    /// Run one conversation turn.
    ///
    /// The user's message is appended immediately; the participant's reply is
    /// appended only once the model call and speech synthesis both succeed.
    /// On failure the user's message is retained (no rollback) and the error
    /// is surfaced as [`SendOutcome::Failed`] plus a [`ChatEvent::TurnFailed`]
    /// notice. The orchestrator returns to idle in every case.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let input = input.trim();
        if input.is_empty() {
            return SendOutcome::Ignored;
        }

        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("send dropped: a turn is already processing");
            return SendOutcome::Dropped;
        }

        let result = self.run_turn(input).await;
        self.processing.store(false, Ordering::SeqCst);

        match result {
            Ok(message) => SendOutcome::Completed(message),
            Err(err) => {
                tracing::error!(error = %err, "turn failed");
                self.emit(ChatEvent::TurnFailed {
                    notice: TURN_ERROR_NOTICE.to_string(),
                });
                SendOutcome::Failed(err)
            }
        }
    }

    async fn run_turn(&self, input: &str) -> Result<Message, ChatError> {
        let user_message = Message::user(&self.user_name, input);
        self.log().push(user_message.clone());
        self.emit(ChatEvent::UserMessage {
            message: user_message,
        });

        // The just-appended user message is part of the history window.
        let context = format_context(&self.participants, &self.log());
        let names = participant::names(&self.participants);

        let reply = self.responder.generate(&context, &names).await?;

        let speaker = participant::find_by_name(&self.participants, &reply.speaker)
            .ok_or_else(|| ChatError::UnknownSpeaker(reply.speaker.clone()))?;

        let audio_url = self
            .synthesizer
            .synthesize(&reply.message, &speaker.voice_id)
            .await?;

        let message = Message::assistant(&speaker.name, &reply.message, Some(audio_url));
        self.log().push(message.clone());
        self.emit(ChatEvent::AssistantMessage {
            message: message.clone(),
        });

        Ok(message)
    }

    /// Snapshot of the conversation log, in display order.
    pub fn messages(&self) -> Vec<Message> {
        self.log().clone()
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        if self.processing.load(Ordering::SeqCst) {
            TurnState::Processing
        } else {
            TurnState::Idle
        }
    }

    /// Get participants.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    // A poisoned lock only means some thread panicked mid-append; the log
    // itself is still a valid Vec, so recover it rather than propagate.
    fn log(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Emit an event if a callback is registered.
    fn emit(&self, event: ChatEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }
}
