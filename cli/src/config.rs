//! CLI Configuration
//!
//! `~/.primarie/config.toml`, or `config.<profile>.toml` for a named
//! profile. Command-line flags and environment variables win over the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{CliError, Result};
use crate::output::OutputFormat;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_format: Option<OutputFormat>,
    /// Use the built-in catalogue instead of the backend
    pub offline: Option<bool>,
}

pub const KEYS: [&str; 5] = ["api_url", "api_token", "timeout_secs", "default_format", "offline"];

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))?;
        if config.timeout_secs == Some(0) {
            return Err(zero_timeout());
        }
        Ok(config)
    }

    pub fn render(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Writes the file and returns where it went.
    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        let io_error = |source| CliError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&path, self.render()?).map_err(io_error)?;
        Ok(path)
    }

    pub fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("cannot find home directory".into()))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".primarie").join(filename))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => self.api_url = Some(value.to_string()),
            "api_token" => self.api_token = Some(value.to_string()),
            "timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| CliError::Config(format!("timeout_secs must be a whole number, got {}", value)))?;
                if secs == 0 {
                    return Err(zero_timeout());
                }
                self.timeout_secs = Some(secs);
            }
            "default_format" => {
                let format = <OutputFormat as clap::ValueEnum>::from_str(value, true)
                    .map_err(|_| CliError::Config(format!("unknown format: {}", value)))?;
                self.default_format = Some(format);
            }
            "offline" => {
                let offline = value
                    .parse::<bool>()
                    .map_err(|_| CliError::Config(format!("offline must be true or false, got {}", value)))?;
                self.offline = Some(offline);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Display value of `key`; the token is masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api_url" => self.api_url.clone(),
            "api_token" => self.api_token.as_deref().map(mask),
            "timeout_secs" => self.timeout_secs.map(|s| s.to_string()),
            "default_format" => self.default_format.map(|f| f.to_string()),
            "offline" => self.offline.map(|o| o.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::Config(format!("unknown config key: {} (expected one of {})", key, KEYS.join(", ")))
}

fn zero_timeout() -> CliError {
    CliError::Config("timeout_secs must be at least 1".into())
}

fn mask(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{}****", visible)
}
