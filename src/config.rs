//! Configuration management for Open Canvas
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.opencanvas/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{CanvasError, Result};

/// Complete configuration for Open Canvas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Hosted embedding API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub api_key_env: String,
    pub timeout_sec: u64,
}

/// Which vector index backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorProvider {
    Pinecone,
    Qdrant,
}

/// Vector index provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub provider: VectorProvider,
    /// Pinecone control plane
    pub controller_url: String,
    pub qdrant_url: String,
    pub api_key_env: String,
    pub top_k: usize,
    pub timeout_sec: u64,
}

/// Which language model backend generates text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    Ollama,
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_sec: u64,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
}

/// Terminal output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub color_output: bool,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_sec: 30,
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            provider: VectorProvider::Pinecone,
            controller_url: "https://api.pinecone.io".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            api_key_env: "PINECONE_API_KEY".to_string(),
            top_k: 10,
            timeout_sec: 30,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_sec: 120,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.opencanvas".to_string(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            color_output: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CanvasError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| CanvasError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".opencanvas").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.model.trim().is_empty() {
            return Err(CanvasError::ConfigError(
                "embeddings.model must not be empty".to_string(),
            ));
        }

        if self.embeddings.dimension == 0 {
            return Err(CanvasError::ConfigError(
                "embeddings.dimension must be greater than 0".to_string(),
            ));
        }

        if self.vector.top_k == 0 {
            return Err(CanvasError::ConfigError(
                "vector.top_k must be greater than 0".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(CanvasError::ConfigError(
                "llm.model must not be empty".to_string(),
            ));
        }

        for (name, url) in [
            ("embeddings.base_url", &self.embeddings.base_url),
            ("vector.controller_url", &self.vector.controller_url),
            ("llm.base_url", &self.llm.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CanvasError::ConfigError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        match self.telemetry.default_verbosity.as_str() {
            "quiet" | "normal" | "verbose" | "very_verbose" => {}
            _ => {
                return Err(CanvasError::ConfigError(format!(
                    "Invalid verbosity level: {}",
                    self.telemetry.default_verbosity
                )))
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CanvasError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CanvasError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CanvasError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// Directory holding per-user assistant files
    pub fn assistants_dir(&self) -> PathBuf {
        self.state_dir().join("assistants")
    }

    /// Read an API key from the environment variable named in config
    pub fn api_key(env_var: &str) -> Result<String> {
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CanvasError::ConfigError(format!(
                "environment variable {} is not set",
                env_var
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.embeddings.model, "text-embedding-3-small");
        assert_eq!(config.embeddings.dimension, 1536);
        assert_eq!(config.vector.provider, VectorProvider::Pinecone);
        assert_eq!(config.vector.top_k, 10);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_top_k() {
        let mut config = Config::default();
        config.vector.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = Config::default();
        config.llm.base_url = "api.openai.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.telemetry.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[llm]\nprovider = \"ollama\"\nmodel = \"llama3.1\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.model, "llama3.1");
        assert_eq!(config.llm.timeout_sec, 120);
        assert_eq!(config.embeddings.model, "text-embedding-3-small");
    }

    #[test]
    fn test_single_key_section_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[vector]\nprovider = \"qdrant\"\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.vector.provider, VectorProvider::Qdrant);
        assert_eq!(config.vector.controller_url, "https://api.pinecone.io");
        assert_eq!(config.vector.qdrant_url, "http://localhost:6334");
        assert_eq!(config.vector.top_k, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.vector.provider = VectorProvider::Qdrant;
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.vector.provider, VectorProvider::Qdrant);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.opencanvas");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }

    #[test]
    fn test_api_key_missing() {
        let err = Config::api_key("OPENCANVAS_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(err.to_string().contains("OPENCANVAS_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
