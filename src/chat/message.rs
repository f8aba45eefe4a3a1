//! Chat message types.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    QuickReply,
    Suggestion,
    Error,
    System,
    RichContent,
    Code,
    Interview,
    Resource,
    ResumeFeedback,
    JobMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One turn fragment in the conversation. Ephemeral: messages live only
/// in the bounded conversation log for the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub kind: MessageKind,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            content: content.to_string(),
            kind: MessageKind::Text,
            sender: Sender::User,
            timestamp: Local::now(),
            metadata: None,
        }
    }

    pub fn bot(content: &str, kind: MessageKind) -> Self {
        Self {
            content: content.to_string(),
            kind,
            sender: Sender::Bot,
            timestamp: Local::now(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
