//! Configuration management for the placement portal

use crate::error::{PortalError, Result};
use crate::llm::ChatOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub model: ModelServiceConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the CSV record tables (users, jobs, applications).
    pub data_dir: PathBuf,
    /// Directory holding the read-only knowledge base JSON documents.
    pub knowledge_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelServiceConfig {
    /// Base URL of the local model service.
    pub endpoint: String,
    pub text_model: String,
    pub vision_model: String,
    pub options: ChatOptions,
    /// Token budgets for the non-streaming completions.
    pub summary_max_tokens: u32,
    pub critique_max_tokens: u32,
    pub feedback_max_tokens: u32,
    pub extraction_max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of messages kept in conversation memory.
    pub memory_capacity: usize,
    /// Maximum number of follow-up suggestions emitted per response.
    pub max_suggestions: usize,
    /// Resume texts longer than this (in characters) are summarized
    /// before being critiqued.
    pub resume_summary_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".placement-portal");

        Self {
            storage: StorageConfig {
                data_dir: base_dir.join("data"),
                knowledge_dir: base_dir.join("knowledge"),
            },
            model: ModelServiceConfig {
                endpoint: "http://localhost:11434".to_string(),
                text_model: "gemma2:27b".to_string(),
                vision_model: "llama3.2-vision:latest".to_string(),
                options: ChatOptions::default(),
                summary_max_tokens: 200,
                critique_max_tokens: 300,
                feedback_max_tokens: 150,
                extraction_max_tokens: 500,
            },
            chat: ChatConfig {
                memory_capacity: 50,
                max_suggestions: 3,
                resume_summary_threshold: 1000,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &PathBuf) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| PortalError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PortalError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("placement-portal")
            .join("config.toml")
    }

    pub fn ensure_data_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage.data_dir)?;
        std::fs::create_dir_all(&self.storage.knowledge_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chat.memory_capacity, 50);
        assert_eq!(config.chat.max_suggestions, 3);
        assert_eq!(config.chat.resume_summary_threshold, 1000);
        assert_eq!(config.model.text_model, "gemma2:27b");
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.model.endpoint = "http://model-host:11434".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model.endpoint, "http://model-host:11434");
        assert_eq!(loaded.chat.memory_capacity, 50);
    }

    #[test]
    fn test_load_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.chat.max_suggestions, 3);
    }
}
