//! Conversation context formatting.
//!
//! Builds the text block fed to the response generator: the participant
//! roster followed by the recent message history.

use crate::message::Message;
use crate::participant::Participant;

/// Number of trailing messages included in the history section.
pub const HISTORY_WINDOW: usize = 5;

/// Format the participant roster and the last [`HISTORY_WINDOW`] messages,
/// oldest first.
///
/// Pure and deterministic. An empty history yields the section headers with
/// no history lines.
pub fn format_context(participants: &[Participant], messages: &[Message]) -> String {
    let mut context = String::from("Current participants:\n");
    for p in participants {
        context.push_str(&p.name);
        context.push_str(": ");
        context.push_str(&p.personality);
        context.push('\n');
    }

    context.push_str("\nConversation history:\n");
    let start = messages.len().saturating_sub(HISTORY_WINDOW);
    for m in &messages[start..] {
        context.push_str(&m.sender);
        context.push_str(": ");
        context.push_str(&m.content);
        context.push('\n');
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants() -> Vec<Participant> {
        vec![
            Participant::new("Ada Lovelace", "First programmer.", "v1"),
            Participant::new("Alan Turing", "Computing pioneer.", "v2"),
        ]
    }

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| Message::user("You", format!("message {i}")))
            .collect()
    }

    #[test]
    fn test_empty_history_yields_headers_only() {
        let context = format_context(&participants(), &[]);
        assert_eq!(
            context,
            "Current participants:\n\
             Ada Lovelace: First programmer.\n\
             Alan Turing: Computing pioneer.\n\
             \nConversation history:\n"
        );
    }

    #[test]
    fn test_short_history_is_included_whole() {
        let context = format_context(&participants(), &history(3));
        assert!(context.ends_with(
            "Conversation history:\n\
             You: message 0\n\
             You: message 1\n\
             You: message 2\n"
        ));
    }

    #[test]
    fn test_long_history_keeps_exactly_last_five_in_order() {
        let context = format_context(&participants(), &history(8));
        let history_section = context
            .split_once("\nConversation history:\n")
            .map(|(_, h)| h)
            .unwrap();
        assert_eq!(
            history_section,
            "You: message 3\n\
             You: message 4\n\
             You: message 5\n\
             You: message 6\n\
             You: message 7\n"
        );
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let participants = participants();
        let messages = history(6);
        assert_eq!(
            format_context(&participants, &messages),
            format_context(&participants, &messages)
        );
    }
}
