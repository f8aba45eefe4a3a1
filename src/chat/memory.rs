//! Bounded conversation log with derived context.
//!
//! The context sets only grow within a session; the current focus is
//! overwritten by the first matching category in a fixed priority
//! order. Matching is case-insensitive substring containment over
//! literal keyword tables.

use crate::chat::message::{Message, MessageKind, Sender};
use aho_corasick::AhoCorasick;
use std::collections::{BTreeSet, VecDeque};

pub const DEFAULT_CAPACITY: usize = 50;

const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "technical",
        &["algorithm", "coding", "programming", "system design", "development"],
    ),
    ("interview", &["interview", "questions", "preparation", "practice"]),
    ("career", &["career", "growth", "path", "future", "goals"]),
    ("skills", &["skills", "learning", "technology", "tools"]),
    ("companies", &["company", "organization", "workplace", "employer"]),
    ("placement", &["placement", "job", "position", "opportunity"]),
];

const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node",
    "sql",
    "machine learning",
    "ai",
    "cloud",
    "aws",
    "azure",
    "system design",
    "algorithms",
    "data structures",
];

const COMPANY_KEYWORDS: &[&str] = &[
    "google",
    "microsoft",
    "amazon",
    "meta",
    "apple",
    "netflix",
    "uber",
    "twitter",
    "linkedin",
];

/// Checked in order; the first category with a match becomes the focus.
const FOCUS_INDICATORS: &[(&str, &[&str])] = &[
    ("technical", &["how to", "example", "code", "implement"]),
    ("conceptual", &["explain", "what is", "understand", "concept"]),
    ("practical", &["apply", "use", "practice", "real world"]),
    ("career", &["career", "job", "future", "growth"]),
];

#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    pub topics: BTreeSet<String>,
    pub skills_mentioned: BTreeSet<String>,
    pub companies_mentioned: BTreeSet<String>,
    pub current_focus: Option<String>,
}

pub struct ConversationMemory {
    messages: VecDeque<Message>,
    capacity: usize,
    context: ConversationContext,
    topic_matcher: AhoCorasick,
    topic_labels: Vec<&'static str>,
    skill_matcher: AhoCorasick,
    company_matcher: AhoCorasick,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        let mut topic_patterns = Vec::new();
        let mut topic_labels = Vec::new();
        for (topic, keywords) in TOPIC_KEYWORDS {
            for keyword in *keywords {
                topic_patterns.push(*keyword);
                topic_labels.push(*topic);
            }
        }

        Self {
            messages: VecDeque::new(),
            capacity,
            context: ConversationContext::default(),
            topic_matcher: build_matcher(&topic_patterns),
            topic_labels,
            skill_matcher: build_matcher(SKILL_KEYWORDS),
            company_matcher: build_matcher(COMPANY_KEYWORDS),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Appends a message, evicting the oldest once over capacity.
    /// Plain-text turns re-derive the conversation context.
    pub fn add(&mut self, message: Message) {
        let is_text = message.kind == MessageKind::Text;
        let content = message.content.clone();

        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            self.messages.pop_front();
        }

        if is_text {
            self.update_context(&content);
        }
    }

    fn update_context(&mut self, content: &str) {
        for mat in self.topic_matcher.find_iter(content) {
            let topic = self.topic_labels[mat.pattern().as_usize()];
            self.context.topics.insert(topic.to_string());
        }

        for mat in self.skill_matcher.find_iter(content) {
            self.context
                .skills_mentioned
                .insert(SKILL_KEYWORDS[mat.pattern().as_usize()].to_string());
        }

        for mat in self.company_matcher.find_iter(content) {
            self.context
                .companies_mentioned
                .insert(COMPANY_KEYWORDS[mat.pattern().as_usize()].to_string());
        }

        let lowered = content.to_lowercase();
        for (focus, indicators) in FOCUS_INDICATORS {
            if indicators.iter().any(|kw| lowered.contains(kw)) {
                self.context.current_focus = Some((*focus).to_string());
                break;
            }
        }
    }

    /// Renders the context block used verbatim in the model prompt.
    /// Empty string when there is nothing to report.
    pub fn format_context(&self) -> String {
        let mut parts = Vec::new();

        if let Some(focus) = &self.context.current_focus {
            parts.push(format!("Current focus: {}", focus));
        }

        if !self.context.topics.is_empty() {
            parts.push(format!(
                "Active topics: {}",
                join_set(&self.context.topics)
            ));
        }

        if !self.context.skills_mentioned.is_empty() {
            parts.push(format!(
                "Skills discussed: {}",
                join_set(&self.context.skills_mentioned)
            ));
        }

        if !self.context.companies_mentioned.is_empty() {
            parts.push(format!(
                "Companies mentioned: {}",
                join_set(&self.context.companies_mentioned)
            ));
        }

        if !self.messages.is_empty() {
            parts.push("\nRecent conversation:".to_string());
            let start = self.messages.len().saturating_sub(3);
            for message in self.messages.iter().skip(start) {
                let sender = match message.sender {
                    Sender::User => "User",
                    Sender::Bot => "Assistant",
                };
                parts.push(format!("{}: {}", sender, message.content));
            }
        }

        parts.join("\n")
    }
}

fn build_matcher(patterns: &[&str]) -> AhoCorasick {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .expect("Invalid context keyword patterns")
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}
