//! Loads the NyayaGPT configuration from `~/.nyaya/config.toml`.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ProviderSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Owner of the local document collection.
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub rerank: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_user() -> String {
    "local".to_string()
}

fn default_backend() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_model(),
            api_key_env: None,
            base_url: None,
            timeout_seconds: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { rerank: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// `$NYAYA_HOME`, or `~/.nyaya` when unset.
    pub fn base_dir() -> Result<PathBuf, String> {
        if let Ok(dir) = env::var("NYAYA_HOME") {
            return Ok(PathBuf::from(dir));
        }
        let home =
            env::var("HOME").map_err(|_| "Unable to determine HOME directory".to_string())?;
        Ok(PathBuf::from(home).join(".nyaya"))
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config.toml: {}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config.toml: {}", e))
    }
}

impl ProviderConfig {
    /// Environment variable holding the API key. Empty for keyless backends.
    pub fn key_var(&self) -> String {
        if let Some(var) = &self.api_key_env {
            return var.clone();
        }
        match self.backend.to_ascii_lowercase().as_str() {
            "openai" => "OPENAI_API_KEY",
            "anthropic" => "ANTHROPIC_API_KEY",
            "google" => "GOOGLE_API_KEY",
            "groq" => "GROQ_API_KEY",
            "xai" => "XAI_API_KEY",
            "cohere" => "COHERE_API_KEY",
            "deepseek" => "DEEPSEEK_API_KEY",
            "mistral" => "MISTRAL_API_KEY",
            _ => "",
        }
        .to_string()
    }

    /// Resolves the API key from the environment.
    pub fn settings(&self) -> Result<ProviderSettings, String> {
        let key_var = self.key_var();
        let api_key = if key_var.is_empty() {
            None
        } else {
            Some(env::var(&key_var).map_err(|_| {
                format!(
                    "Environment variable '{}' not set for provider '{}'",
                    key_var, self.backend
                )
            })?)
        };

        Ok(ProviderSettings {
            backend: self.backend.clone(),
            model: self.model.clone(),
            api_key,
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
        })
    }
}
