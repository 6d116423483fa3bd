use crate::dataset::DEFAULT_PERSONA;
use crate::providers::openai::DEFAULT_MODEL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const RELAY_DIR: &str = ".relay";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    pub persona: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub questions_per_chunk: usize,
    pub similarity_top_k: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            chunk_size: 512,
            chunk_overlap: 128,
            questions_per_chunk: 10,
            similarity_top_k: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tool_rounds: usize,
    pub dataset: DatasetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tool_rounds: 1,
            dataset: DatasetConfig::default(),
        }
    }
}

pub fn get_relay_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(RELAY_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_relay_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

impl Config {
    /// Reads `~/.relay/config.toml`, falling back to defaults when it is absent.
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}
