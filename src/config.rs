//! Configuration management for innersense-rs.
//!
//! Loads config from YAML files in standard locations. API keys are
//! taken from the process environment only, never from the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8770,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Filled from `OPENAI_API_KEY`; not read from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4".into(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElevenLabsConfig {
    pub base_url: String,
    pub voice_id: String,
    pub stability: f64,
    pub similarity_boost: f64,
    pub timeout_secs: u64,
    /// Filled from `ELEVENLABS_API_KEY`; not read from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            voice_id: "EXAVITQu4vr4xnSDxMaL".into(),
            stability: 0.4,
            similarity_boost: 0.7,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "innersense.db".into(),
            pool_size: 4,
            busy_timeout_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./innersense.yaml
    /// 2. ~/.config/innersense/config.yaml
    /// 3. /etc/innersense/config.yaml
    ///
    /// Afterwards `OPENAI_API_KEY` and `ELEVENLABS_API_KEY` are read from
    /// the environment regardless of which file (if any) was found.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("innersense.yaml")),
                dirs::home_dir().map(|h| h.join(".config/innersense/config.yaml")),
                Some(PathBuf::from("/etc/innersense/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let mut config = match resolved {
            Some(config_path) => match std::fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", config_path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.openai.api_key = env_key("OPENAI_API_KEY");
        config.elevenlabs.api_key = env_key("ELEVENLABS_API_KEY");
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
