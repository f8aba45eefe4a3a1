//! Language-model service integration.
//!
//! The portal treats the model as an external black-box completion
//! service. Everything that talks to it goes through the
//! [`LanguageModel`] trait so the chat pipeline can be exercised with a
//! scripted double in tests.

pub mod ollama;

pub use ollama::OllamaClient;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Decoding options sent with every chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    /// Context window requested from the service.
    pub context_window: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            context_window: 8192,
        }
    }
}

/// A text-completion service.
pub trait LanguageModel {
    /// Streaming chat completion. `on_fragment` is invoked for every
    /// content fragment as it arrives; the assembled full response is
    /// returned once the stream ends.
    fn chat_stream(
        &self,
        system: &str,
        user: &str,
        options: &ChatOptions,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String>;

    /// Plain (non-streaming) completion for a single prompt.
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Vision completion: answer `prompt` about the raw image bytes.
    fn describe_image(&self, prompt: &str, image: &[u8], max_tokens: u32) -> Result<String>;

    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_options_default() {
        let options = ChatOptions::default();
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.top_p, 0.9);
        assert_eq!(options.top_k, 40);
        assert_eq!(options.context_window, 8192);
    }
}
