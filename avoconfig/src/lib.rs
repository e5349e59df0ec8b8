//! # AVOCatalog Configuration Module
//!
//! This module provides configuration management for AVOCatalog, including:
//! - Loading configuration from YAML files
//! - Merging with the embedded default configuration
//! - Environment variable overrides
//! - Typed getters and setters for host-level values
//! - Thread-safe singleton access
//!
//! Catalog-specific settings (API tokens, legacy credentials, player keys...)
//! are not read here: the `avocatalog` crate adds them through its own
//! extension trait on [`Config`].
//!
//! ## Usage
//!
//! ```no_run
//! use avoconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! config.set_http_port(9000)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("avocatalog.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load AVOCatalog configuration"));
}

const ENV_CONFIG_DIR: &str = "AVOCATALOG_CONFIG";
const ENV_PREFIX: &str = "AVOCATALOG_CONFIG__";
const DEFAULT_CONFIG_DIR: &str = ".avocatalog";

const DEFAULT_BASE_URL: &str = "localhost";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Generates a getter/setter pair for a usize value with a default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path) {
                Ok(Value::Number(n)) => Ok(n.as_u64().map(|v| v as usize).unwrap_or($default)),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(size as u64)))
        }
    };
}

/// Generates a getter/setter pair for a bool value with a default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Configuration manager for AVOCatalog
///
/// Values live in a YAML tree guarded by a mutex. Every setter writes the
/// whole tree back to `config.yaml`, except for in-memory configurations
/// built with [`Config::from_yaml_str`].
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: Option<String>,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.lock_data().map(|d| d.clone()).unwrap_or(Value::Null);
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    fn find_config_dir(directory: &str) -> String {
        if !directory.is_empty() {
            return directory.to_string();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return env_path;
        }

        if Path::new(DEFAULT_CONFIG_DIR).exists() {
            return DEFAULT_CONFIG_DIR.to_string();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(DEFAULT_CONFIG_DIR);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        DEFAULT_CONFIG_DIR.to_string()
    }

    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Vérifie les droits d'écriture
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `AVOCATALOG_CONFIG` environment variable
    /// 3. `.avocatalog` in the current directory
    /// 4. `.avocatalog` in the user's home directory
    ///
    /// The directory is created if it doesn't exist.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// The embedded defaults are merged with `config.yaml` (when present),
    /// keys are lowercased, `AVOCATALOG_CONFIG__*` environment overrides are
    /// applied, and the merged result is written back.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir = %config_dir, "Using config directory");

        let path = Path::new(&config_dir)
            .join("config.yaml")
            .to_string_lossy()
            .to_string();

        let mut config_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        match fs::read(&path) {
            Ok(data) => {
                info!(config_file = %path, "Loaded config file");
                let external: Value = serde_yaml::from_slice(&data)?;
                merge_yaml(&mut config_value, &external);
            }
            Err(_) => {
                info!(config_file = %path, "Config file not found, using embedded defaults");
            }
        }

        let mut config_value = lower_keys_value(config_value);
        apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path: Some(path),
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Builds an in-memory configuration from a YAML document
    ///
    /// The document is merged over the embedded defaults. Nothing is ever
    /// written to disk and environment overrides are not applied.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        if !yaml.trim().is_empty() {
            let external: Value = serde_yaml::from_str(yaml)?;
            merge_yaml(&mut config_value, &external);
        }

        Ok(Config {
            config_dir: String::new(),
            path: None,
            data: Mutex::new(lower_keys_value(config_value)),
        })
    }

    /// Directory holding `config.yaml` (empty for in-memory configurations)
    pub fn directory(&self) -> &str {
        &self.config_dir
    }

    fn lock_data(&self) -> Result<MutexGuard<'_, Value>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("Configuration lock poisoned"))
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let yaml = {
            let data = self.lock_data()?;
            serde_yaml::to_string(&*data)?
        };
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Keys leading to the value (e.g., `&["host", "http_port"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.lock_data()?;
            set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock_data()?;
        get_value_internal(&data, path)
    }

    /// Gets the public host name of the HTTP server
    pub fn get_base_url(&self) -> String {
        match self.get_value(&["host", "base_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Gets the HTTP port, falling back to 8080 when unset or invalid
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                Some(port) => port,
                None => {
                    tracing::warn!("Invalid HTTP port {}, using default {}", n, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(Value::String(s)) => s.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("Invalid HTTP port '{}', using default {}", s, DEFAULT_HTTP_PORT);
                DEFAULT_HTTP_PORT
            }),
            _ => DEFAULT_HTTP_PORT,
        }
    }

    /// Sets the HTTP port
    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::Number(Number::from(port)))
    }

    impl_usize_config!(
        get_log_cache_size,
        set_log_cache_size,
        &["host", "logger", "buffer_capacity"],
        DEFAULT_LOG_BUFFER_CAPACITY
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Minimum log level (ERROR, WARN, INFO, DEBUG or TRACE)
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Returns the global configuration instance
///
/// The configuration is loaded lazily on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };

    if data.is_null() {
        *data = Value::Mapping(Mapping::new());
    }

    match data {
        Value::Mapping(map) => {
            let key = Value::String(first.to_lowercase());
            if rest.is_empty() {
                map.insert(key, value);
                Ok(())
            } else {
                let entry = map.entry(key).or_insert(Value::Mapping(Mapping::new()));
                set_value_internal(entry, rest, value)
            }
        }
        _ => Err(anyhow!("Config node at {} is not a map", first)),
    }
}

fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
    let mut current = data;
    for (i, key) in path.iter().enumerate() {
        match current {
            Value::Mapping(map) => match map.get(Value::String(key.to_lowercase())) {
                Some(next) => current = next,
                None => return Err(anyhow!("Path {} does not exist", path[..=i].join("."))),
            },
            _ => return Err(anyhow!("Path {} is not a map", path[..i].join("."))),
        }
    }
    Ok(current.clone())
}

fn apply_env_overrides(config: &mut Value) {
    apply_overrides(config, env::vars());
}

fn apply_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            let key_path = stripped.split("__").collect::<Vec<_>>();
            if let Err(e) = set_value_internal(config, &key_path, convert_env_value(&value)) {
                tracing::warn!(env_var = %key, "Ignoring config override: {}", e);
            }
        }
    }
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut new_map = Mapping::new();
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => Value::String(s.to_lowercase()),
                    other => other,
                };
                new_map.insert(key, lower_keys_value(v));
            }
            Value::Mapping(new_map)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Merges an external YAML tree into the default one
///
/// Mappings are merged key by key; scalars and sequences from `external`
/// replace the default value.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_embedded() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config.get_http_port(), DEFAULT_HTTP_PORT);
        assert_eq!(config.get_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.get_log_cache_size().unwrap(), 1000);
        assert!(config.get_log_enable_console().unwrap());
        assert_eq!(config.get_log_min_level().unwrap(), "INFO");
    }

    #[test]
    fn test_external_yaml_is_merged_over_defaults() {
        let config = Config::from_yaml_str(
            "Host:\n  HTTP_Port: 9090\ncatalog:\n  api:\n    token: abc\n",
        )
        .unwrap();

        assert_eq!(config.get_http_port(), 9090);
        assert_eq!(
            config.get_value(&["catalog", "api", "token"]).unwrap(),
            Value::String("abc".into())
        );
        // Les valeurs non surchargées restent présentes
        assert_eq!(
            config.get_value(&["catalog", "api", "items_per_page"]).unwrap(),
            Value::Number(12.into())
        );
    }

    #[test]
    fn test_set_and_get_nested_value() {
        let config = Config::from_yaml_str("").unwrap();
        config
            .set_value(&["a", "b", "c"], Value::String("deep".into()))
            .unwrap();
        assert_eq!(
            config.get_value(&["A", "B", "C"]).unwrap(),
            Value::String("deep".into())
        );
        assert!(config.get_value(&["a", "missing"]).is_err());
    }

    #[test]
    fn test_string_port_is_parsed() {
        let config = Config::from_yaml_str("host:\n  http_port: \"7000\"\n").unwrap();
        assert_eq!(config.get_http_port(), 7000);

        let config = Config::from_yaml_str("host:\n  http_port: nope\n").unwrap();
        assert_eq!(config.get_http_port(), DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_overrides_follow_double_underscore_paths() {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        apply_overrides(
            &mut value,
            vec![
                (
                    "AVOCATALOG_CONFIG__CATALOG__API__ITEMS_PER_PAGE".to_string(),
                    "24".to_string(),
                ),
                ("UNRELATED".to_string(), "x".to_string()),
            ],
        );

        assert_eq!(
            get_value_internal(&value, &["catalog", "api", "items_per_page"]).unwrap(),
            Value::Number(24.into())
        );
    }

    #[test]
    fn test_convert_env_value() {
        assert_eq!(convert_env_value("true"), Value::Bool(true));
        assert_eq!(convert_env_value("42"), Value::Number(42.into()));
        assert_eq!(
            convert_env_value("https://api.example.org/"),
            Value::String("https://api.example.org/".into())
        );
    }

    #[test]
    fn test_merge_replaces_scalars_and_sequences() {
        let mut default: Value = serde_yaml::from_str("a: 1\nb: [1, 2]\nc: {d: 1}").unwrap();
        let external: Value = serde_yaml::from_str("a: 2\nb: [3]\nc: {e: 2}").unwrap();
        merge_yaml(&mut default, &external);

        let expected: Value = serde_yaml::from_str("a: 2\nb: [3]\nc: {d: 1, e: 2}").unwrap();
        assert_eq!(default, expected);
    }

    #[test]
    fn test_load_config_writes_merged_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "host:\n  http_port: 8181\n").unwrap();

        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.get_http_port(), 8181);

        config.set_http_port(8282).unwrap();
        let reloaded = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(reloaded.get_http_port(), 8282);
        assert_eq!(
            reloaded.get_value(&["catalog", "cache", "max_capacity"]).unwrap(),
            Value::Number(1000.into())
        );
    }
}
