use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::memory::StoreConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ShellmindConfig {
    pub log: LogConfig,
    pub storage: StorageConfig,
    pub relevance: RelevanceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub history_path: String,
    pub facts_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RelevanceConfig {
    /// `"passthrough"` or `"embedding"`.
    pub mode: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub top_k: usize,
    pub min_score: f32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_shellmind_dir();
        Self {
            history_path: dir.join("history.json").to_string_lossy().into_owned(),
            facts_path: dir.join("fact_memory.txt").to_string_lossy().into_owned(),
        }
    }
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            mode: "embedding".into(),
            endpoint: "https://api-inference.huggingface.co/models".into(),
            model: "sentence-transformers/all-MiniLM-L6-v2".into(),
            api_key: None,
            timeout_secs: 30,
            top_k: 5,
            min_score: 0.2,
        }
    }
}

/// Returns `~/.config/shellmind/`, or `./.shellmind/` when no config directory is known.
pub fn default_shellmind_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("shellmind"))
        .unwrap_or_else(|| PathBuf::from(".shellmind"))
}

/// Returns the default config file path: `~/.config/shellmind/config.toml`
pub fn default_config_path() -> PathBuf {
    default_shellmind_dir().join("config.toml")
}

impl ShellmindConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ShellmindConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (SHELLMIND_HISTORY, SHELLMIND_FACTS, SHELLMIND_LOG_LEVEL, SHELLMIND_HF_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SHELLMIND_HISTORY") {
            self.storage.history_path = val;
        }
        if let Ok(val) = std::env::var("SHELLMIND_FACTS") {
            self.storage.facts_path = val;
        }
        if let Ok(val) = std::env::var("SHELLMIND_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Ok(val) = std::env::var("SHELLMIND_HF_API_KEY") {
            self.relevance.api_key = Some(val);
        }
    }

    pub fn history_store(&self) -> StoreConfig {
        StoreConfig::new(expand_tilde(&self.storage.history_path))
    }

    pub fn fact_store(&self) -> StoreConfig {
        StoreConfig::new(expand_tilde(&self.storage.facts_path))
    }

    /// Look up a dotted key (e.g. `relevance.api_key`) in the effective config.
    ///
    /// Returns `Ok(None)` for keys that exist but are unset.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = toml::Value::try_from(self).context("failed to serialize config")?;
        let mut current = &value;
        for part in key.split('.') {
            current = match current.get(part) {
                Some(v) => v,
                None if is_optional_key(key) => return Ok(None),
                None => bail!("unknown config key: {key}"),
            };
        }
        match current {
            toml::Value::String(s) => Ok(Some(s.clone())),
            toml::Value::Table(_) => bail!("{key} is a section, not a value"),
            other => Ok(Some(other.to_string())),
        }
    }
}

/// Keys whose absence from the serialized config means "unset".
fn is_optional_key(key: &str) -> bool {
    key == "relevance.api_key"
}

/// Set a dotted key in the config file at `path`, creating the file if absent.
///
/// The value takes the type the field has in the default config; fields that
/// are unset by default are strings. The resulting file must still load as a
/// valid config.
pub fn set_value(path: impl AsRef<Path>, key: &str, raw: &str) -> Result<()> {
    let path = path.as_ref();
    let mut table: toml::Table = if path.exists() {
        let contents = std::fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&contents).context("failed to parse config TOML")?
    } else {
        toml::Table::new()
    };

    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("config key must be <section>.<field>, got {key}"))?;

    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(section_table) = entry.as_table_mut() else {
        bail!("{section} is not a section in {}", path.display());
    };
    section_table.insert(field.to_string(), coerce_value(section, field, raw)?);

    let rendered = toml::to_string_pretty(&table).context("failed to render config TOML")?;
    toml::from_str::<ShellmindConfig>(&rendered)
        .with_context(|| format!("invalid value for {key}: {raw}"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write config file {}", path.display()))?;

    info!(key, path = %path.display(), "config value updated");
    Ok(())
}

/// Convert `raw` to the TOML type `section.field` has in the default config.
fn coerce_value(section: &str, field: &str, raw: &str) -> Result<toml::Value> {
    let defaults =
        toml::Value::try_from(ShellmindConfig::default()).context("failed to serialize config")?;
    let template = defaults.get(section).and_then(|s| s.get(field));

    let value = match template {
        Some(toml::Value::Integer(_)) => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .with_context(|| format!("{section}.{field} expects an integer, got {raw}"))?,
        Some(toml::Value::Float(_)) => raw
            .parse::<f64>()
            .map(toml::Value::Float)
            .with_context(|| format!("{section}.{field} expects a number, got {raw}"))?,
        Some(toml::Value::Boolean(_)) => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .with_context(|| format!("{section}.{field} expects true or false, got {raw}"))?,
        _ => toml::Value::String(raw.to_string()),
    };
    Ok(value)
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
