//! Configuration for generation, scanning and output settings.
//!
//! Load order: `.s2r/config.toml` → environment variables → defaults.
//! Environment access goes through [`ConfigSource`] so tests can inject values
//! without touching the real process environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable holding the completion API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Languages offered by the interactive prompt.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "Go",
    "Rust",
    "Dart/Flutter",
    "C++",
    "C#",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
];

/// Licenses offered by the interactive prompt. The first entry is the default.
pub const LICENSE_OPTIONS: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "GPL-3.0",
    "BSD-3-Clause",
    "Unlicense",
    "MPL-2.0",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not set. Add it to your environment or a .env file.")]
    MissingCredential { var: &'static str },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Key/value lookup for environment-style settings.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Top-level snippet2readme configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct S2rConfig {
    pub llm: LlmConfig,
    pub prompt: PromptConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

/// Completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completion model identifier.
    pub model: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Sampling temperature. Kept low so repeated runs produce similar structure.
    pub temperature: f32,
    /// Ceiling on generated tokens.
    pub max_tokens: u32,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Prompt template settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Replaces the built-in system prompt when set.
    pub system_prompt: Option<String>,
}

/// Directory scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Walk depth below the root. 1 = top-level entries only.
    pub max_depth: usize,
    /// How many top-level file names are listed verbatim as hints.
    pub max_listed_files: usize,
    /// Extra glob patterns (relative to the scanned root) to skip.
    pub exclude: Vec<String>,
}

/// README output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub filename: String,
    /// Characters of the generated README echoed after a successful run.
    pub preview_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.4,
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_listed_files: 10,
            exclude: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: crate::writer::DEFAULT_README_NAME.to_string(),
            preview_chars: 500,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(source: &dyn ConfigSource, var: &str, target: &mut T) {
    if let Some(v) = source.get(var)
        && let Ok(n) = v.trim().parse()
    {
        *target = n;
    }
}

impl S2rConfig {
    /// Path of the project-local config file.
    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(".s2r").join("config.toml")
    }

    /// Load config from `.s2r/config.toml` in the project root, with overrides
    /// from `source`. Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path, source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let config_path = Self::config_path(project_root);

        let mut config: Self = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?
        } else {
            Self::default()
        };

        // Model and base URL are plain strings, blank values are ignored.
        if let Some(model) = source.get("MODEL_NAME").filter(|m| !m.trim().is_empty()) {
            config.llm.model = model.trim().to_string();
        }
        if let Some(url) = source
            .get("OPENAI_BASE_URL")
            .filter(|u| !u.trim().is_empty())
        {
            config.llm.base_url = url.trim().to_string();
        }
        env_override(source, "S2R_TEMPERATURE", &mut config.llm.temperature);
        env_override(source, "S2R_MAX_TOKENS", &mut config.llm.max_tokens);
        env_override(source, "S2R_TIMEOUT_SECS", &mut config.llm.timeout_secs);
        env_override(source, "S2R_SCAN_DEPTH", &mut config.scan.max_depth);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid {
                field: "llm.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "llm.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "llm.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "llm.model",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Look up the completion API key. Blank values count as missing.
pub fn resolve_api_key(source: &dyn ConfigSource) -> Result<String, ConfigError> {
    source
        .get(API_KEY_VAR)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingCredential { var: API_KEY_VAR })
}
