//! Participant definitions.
//!
//! Represents the fixed personas that take part in the conversation.

use serde::{Deserialize, Serialize};

/// A persona in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Display name, unique within the registry.
    pub name: String,
    /// Personality description, used verbatim in prompts.
    pub personality: String,
    /// Voice identifier passed to the speech synthesis API.
    pub voice_id: String,
}

impl Participant {
    /// Create a new participant.
    pub fn new(
        name: impl Into<String>,
        personality: impl Into<String>,
        voice_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            personality: personality.into(),
            voice_id: voice_id.into(),
        }
    }
}

/// Look up a participant by exact name.
pub fn find_by_name<'a>(participants: &'a [Participant], name: &str) -> Option<&'a Participant> {
    participants.iter().find(|p| p.name == name)
}

/// Collect the registry's display names, in registry order.
pub fn names(participants: &[Participant]) -> Vec<String> {
    participants.iter().map(|p| p.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<Participant> {
        vec![
            Participant::new("Ada Lovelace", "First programmer.", "en-GB-Wavenet-A"),
            Participant::new("Alan Turing", "Computing pioneer.", "en-GB-Wavenet-B"),
        ]
    }

    #[test]
    fn test_find_by_name_hit() {
        let participants = registry();
        let found = find_by_name(&participants, "Alan Turing");
        assert_eq!(found.map(|p| p.voice_id.as_str()), Some("en-GB-Wavenet-B"));
    }

    #[test]
    fn test_find_by_name_miss() {
        let participants = registry();
        assert!(find_by_name(&participants, "Grace Hopper").is_none());
    }

    #[test]
    fn test_names_preserve_order() {
        let participants = registry();
        assert_eq!(names(&participants), vec!["Ada Lovelace", "Alan Turing"]);
    }
}
