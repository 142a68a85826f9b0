use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the default config file location.
pub const CONFIG_PATH_ENV: &str = "MARKDOWN_TOKENSPLIT_CONFIG";

/// Token budget used when the config file does not set one.
pub const DEFAULT_MAX_TOKENS: i64 = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid max_tokens {max_tokens} in {config_path}: must be a positive integer")]
    InvalidMaxTokens { config_path: PathBuf, max_tokens: i64 },
}

/// BPE vocabulary used to count tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// GPT-2 / GPT-3 vocabulary.
    #[default]
    R50kBase,
    P50kBase,
    Cl100kBase,
    O200kBase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_tokens: i64,
    pub encoding: Encoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            encoding: Encoding::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if config.max_tokens <= 0 {
            return Err(ConfigError::InvalidMaxTokens {
                config_path: config_path.to_path_buf(),
                max_tokens: config.max_tokens,
            });
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// `$MARKDOWN_TOKENSPLIT_CONFIG` when set, else `~/.config/markdown-tokensplit/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(overridden) = std::env::var(CONFIG_PATH_ENV)
            && !overridden.trim().is_empty()
        {
            let path = PathBuf::from(&overridden);
            return Self::expand_path(&path).unwrap_or(path);
        }

        let config_dir = shellexpand::tilde("~/.config/markdown-tokensplit");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
