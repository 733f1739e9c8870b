//! TOML configuration file loading and merging
//!
//! Values from the file only fill options the command line left unset, so the
//! command line always wins.

use super::args::Args;
use super::error::{ConfigError, ConfigResult};
use crate::core::validation::{validate_capacity, validate_endpoint_name, validate_output_dir};
use crate::relay::api::{FullPolicy, RelayConfig};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "Keystream";
const CONFIG_FILE_NAME: &str = "keystream.toml";

pub(crate) const KNOWN_KEYS: &[&str] = &[
    "capacity",
    "policy",
    "output-dir",
    "endpoint-name",
    "log-level",
    "log-format",
    "log-file",
];

/// `<config_dir>/Keystream/keystream.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read the configuration file
///
/// An explicitly named file must exist; the default file is optional.
pub async fn load_config_file(explicit: Option<&Path>) -> ConfigResult<Option<toml::Table>> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents)
        .map_err(|source| ConfigError::Parse { path, source })?;
    Ok(Some(table))
}

/// Everything the application needs after CLI and file have been merged
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub relay: RelayConfig,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Fill unset options from a parsed configuration table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ConfigResult<()> {
        if let Some(key) = config.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            return Err(ConfigError::UnknownKey { key: key.clone() });
        }

        if self.capacity.is_none() {
            if let Some(value) = config.get("capacity") {
                let raw = value
                    .as_integer()
                    .ok_or_else(|| ConfigError::invalid("capacity", "expected an integer"))?;
                self.capacity =
                    Some(validate_capacity(raw).map_err(|e| ConfigError::invalid("capacity", e))?);
            }
        }

        if self.policy.is_none() {
            if let Some(policy) = string_value(config, "policy")? {
                policy
                    .parse::<FullPolicy>()
                    .map_err(|_| ConfigError::invalid("policy", format!("'{}' is not one of drop, wait", policy)))?;
                self.policy = Some(policy);
            }
        }

        if self.endpoint_name.is_none() {
            if let Some(name) = string_value(config, "endpoint-name")? {
                self.endpoint_name =
                    Some(validate_endpoint_name(&name).map_err(|e| ConfigError::invalid("endpoint-name", e))?);
            }
        }

        if self.output_dir.is_none() {
            self.output_dir = string_value(config, "output-dir")?.map(PathBuf::from);
        }
        if self.log_level.is_none() {
            self.log_level = string_value(config, "log-level")?;
        }
        if self.log_format.is_none() {
            self.log_format = string_value(config, "log-format")?;
        }
        if self.log_file.is_none() {
            self.log_file = string_value(config, "log-file")?.map(PathBuf::from);
        }

        Ok(())
    }

    /// Validate the merged options and turn them into settings
    pub fn into_settings(self) -> ConfigResult<Settings> {
        let mut relay = RelayConfig::default();

        if let Some(capacity) = self.capacity {
            relay.capacity = capacity;
        }
        if let Some(policy) = self.full_policy() {
            relay.full_policy = policy.map_err(|e| ConfigError::invalid("policy", e.to_string()))?;
        }
        if let Some(name) = self.endpoint_name {
            relay.endpoint_name = name;
        }
        if let Some(dir) = &self.output_dir {
            validate_output_dir(dir).map_err(|e| ConfigError::invalid("output-dir", e))?;
        }
        if let Some(format) = self.log_format.as_deref() {
            if !matches!(format, "text" | "ext" | "json") {
                return Err(ConfigError::invalid(
                    "log-format",
                    format!("'{}' is not one of text, ext, json", format),
                ));
            }
        }

        Ok(Settings {
            relay,
            output_dir: self.output_dir,
            log_level: self.log_level,
            log_format: self.log_format,
            log_file: self.log_file,
        })
    }
}

fn string_value(config: &toml::Table, key: &str) -> ConfigResult<Option<String>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ConfigError::invalid(key, "expected a string")),
    }
}
