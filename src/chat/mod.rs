//! Conversational placement assistant: memory, prompt assembly, the
//! mock-interview state machine, and the response orchestrator.

pub mod interview;
pub mod memory;
pub mod message;
pub mod orchestrator;
pub mod prompts;
pub mod suggest;

pub use memory::{ConversationContext, ConversationMemory};
pub use message::{Message, MessageKind, Sender};
pub use orchestrator::PlacementChatbot;

use serde::{Deserialize, Serialize};

/// Preferences a user sets for the session; folded into the prompt and
/// the suggestion generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub industry: Option<String>,
    pub skills: Vec<String>,
}

impl UserPreferences {
    pub fn is_empty(&self) -> bool {
        self.industry.is_none() && self.skills.is_empty()
    }
}
