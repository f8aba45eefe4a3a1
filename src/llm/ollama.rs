//! Client for a local Ollama-compatible model service.
//!
//! Chat completions stream as newline-delimited JSON chunks; the vision
//! endpoint takes base64-encoded image bytes. No retries and no request
//! timeout: a call runs until the service answers or the connection
//! drops, and the failure is reported to the caller as-is.

use crate::error::{PortalError, Result};
use crate::llm::{ChatOptions, LanguageModel};
use base64::Engine;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};

pub struct OllamaClient {
    endpoint: String,
    text_model: String,
    vision_model: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_ctx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl WireOptions {
    fn from_chat(options: &ChatOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            num_ctx: options.context_window,
            num_predict: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: WireOptions,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, text_model: &str, vision_model: &str) -> Result<Self> {
        // No request timeout: streamed completions are open-ended.
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            text_model: text_model.to_string(),
            vision_model: vision_model.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn generate_with_model(
        &self,
        model: &str,
        prompt: &str,
        images: Vec<String>,
        max_tokens: u32,
    ) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            images,
            options: GenerateOptions {
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(PortalError::ModelService(format!(
                "completion request failed with status {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response.json()?;
        Ok(body.response)
    }
}

impl LanguageModel for OllamaClient {
    fn chat_stream(
        &self,
        system: &str,
        user: &str,
        options: &ChatOptions,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.text_model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: system,
                },
                WireMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: true,
            options: WireOptions::from_chat(options),
        };

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(PortalError::ModelService(format!(
                "chat request failed with status {}: {}",
                status, body
            )));
        }

        let mut full_response = String::new();
        let reader = BufReader::new(response);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let chunk = parse_chat_chunk(&line)?;
            if let Some(message) = chunk.message {
                if !message.content.is_empty() {
                    full_response.push_str(&message.content);
                    on_fragment(&message.content);
                }
            }
            if chunk.done {
                break;
            }
        }

        debug!(
            "chat completion finished: {} characters",
            full_response.len()
        );
        Ok(full_response)
    }

    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        self.generate_with_model(&self.text_model, prompt, Vec::new(), max_tokens)
    }

    fn describe_image(&self, prompt: &str, image: &[u8], max_tokens: u32) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        self.generate_with_model(&self.vision_model, prompt, vec![encoded], max_tokens)
    }

    fn model_name(&self) -> &str {
        &self.text_model
    }
}

fn parse_chat_chunk(line: &str) -> Result<ChatChunk> {
    serde_json::from_str(line)
        .map_err(|e| PortalError::ModelService(format!("malformed stream chunk: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_chunk() {
        let chunk =
            parse_chat_chunk(r#"{"message":{"role":"assistant","content":"Hi"},"done":false}"#)
                .unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hi");
        assert!(!chunk.done);

        let done = parse_chat_chunk(r#"{"done":true}"#).unwrap();
        assert!(done.done);
        assert!(done.message.is_none());
    }

    #[test]
    fn test_parse_chat_chunk_malformed() {
        assert!(parse_chat_chunk("not json").is_err());
    }

    #[test]
    fn test_wire_options_match_chat_options() {
        let wire = WireOptions::from_chat(&ChatOptions::default());
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["top_p"], 0.9);
        assert_eq!(json["top_k"], 40);
        assert_eq!(json["num_ctx"], 8192);
        assert!(json.get("num_predict").is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "m", "v").unwrap();
        assert_eq!(client.url("/api/chat"), "http://localhost:11434/api/chat");
    }
}
