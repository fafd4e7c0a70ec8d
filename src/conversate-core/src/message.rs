//! Conversation messages.
//!
//! Messages are created once, never mutated, and appended to an ordered
//! conversation log (insertion order is display order).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The human user's name or a participant's name.
    pub sender: String,
    /// The message text.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Reference to synthesized audio, when available.
    pub audio_url: Option<String>,
}

impl Message {
    /// Create a message typed (or spoken) by the human user.
    pub fn user(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
            audio_url: None,
        }
    }

    /// Create a message spoken by a participant.
    pub fn assistant(
        sender: impl Into<String>,
        content: impl Into<String>,
        audio_url: Option<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
            audio_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_audio() {
        let message = Message::user("You", "Hello");
        assert_eq!(message.sender, "You");
        assert_eq!(message.content, "Hello");
        assert!(message.audio_url.is_none());
    }

    #[test]
    fn test_assistant_message_keeps_audio_reference() {
        let message =
            Message::assistant("Isaac Newton", "Gravity.", Some("https://a.test/1.mp3".into()));
        assert_eq!(message.audio_url.as_deref(), Some("https://a.test/1.mp3"));
    }
}
