//! Config loader — reads `~/.chatlist/config.json`, applies legacy
//! migrations, and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.chatlist/config.json`
//! 3. Environment variables `CHATLIST_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::schema::Config;

/// Errors from writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write config to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    migrate_config(&mut raw);

    let config: Config = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    let io_err = |source| ConfigError::Io {
        path: config_path.clone(),
        source,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, json).map_err(io_err)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply legacy config migrations to provider entries.
///
/// Older exports used numeric ids and an integer `is_active` flag
/// (`1`/`0`); both are rewritten into the current shape.
fn migrate_config(raw: &mut serde_json::Value) {
    let Some(providers) = raw.get_mut("providers").and_then(|p| p.as_array_mut()) else {
        return;
    };

    for entry in providers.iter_mut() {
        let Some(obj) = entry.as_object_mut() else {
            continue;
        };

        if let Some(id) = obj.get("id").filter(|v| v.is_number()).cloned() {
            obj.insert("id".to_string(), serde_json::Value::String(id.to_string()));
            debug!("Migrated numeric provider id {}", id);
        }

        if obj.get("active").is_none() {
            let legacy = obj.remove("is_active").or_else(|| obj.remove("isActive"));
            if let Some(flag) = legacy {
                let active = match &flag {
                    serde_json::Value::Bool(b) => *b,
                    serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
                    _ => true,
                };
                obj.insert("active".to_string(), serde_json::Value::Bool(active));
                debug!("Migrated is_active → active");
            }
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `CHATLIST_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `CHATLIST_DISPATCH__TIMEOUT_SECS` → `dispatch.timeout_secs`
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(val) = lookup("CHATLIST_DISPATCH__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(secs) if secs > 0 => config.dispatch.timeout_secs = secs,
            _ => warn!("Ignoring invalid CHATLIST_DISPATCH__TIMEOUT_SECS={}", val),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
