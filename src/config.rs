use std::{
    collections::HashMap,
    fs::{self, File},
    io::prelude::*,
    path::Path,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::target::{ParseTargetError, Target, DEFAULT_PORT};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PingConfig {
    /// Per-query deadline in milliseconds, covering connect, write and read.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Port used when a target omits one.
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// Servers queried by `sweep`.
    #[serde(default)]
    pub target: Vec<TargetConfig>,

    #[serde(flatten)]
    pub other_fields: HashMap<String, toml::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TargetConfig {
    /// Label shown in output; defaults to `host:port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub host: String,
    /// Falls back to `default_port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            default_port: default_port(),
            target: Vec::new(),
            other_fields: HashMap::new(),
        }
    }
}

impl PingConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.timeout_ms == 0 {
            return Err(ConfigLoadError::Invalid("timeout_ms must be greater than 0"));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_str = toml::to_string(&self)?;
        let mut file = File::create(path)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn parse_target(&self, address: &str) -> Result<Target, ParseTargetError> {
        Target::parse_with_default(address, self.default_port)
    }

    /// Configured targets paired with their display label.
    pub fn targets(&self) -> anyhow::Result<Vec<(String, Target)>> {
        self.target
            .iter()
            .enumerate()
            .map(|(idx, cfg)| {
                let port = cfg.port.unwrap_or(self.default_port);
                let target = Target::parse_with_default(&cfg.host, port).map_err(|err| {
                    anyhow::anyhow!("invalid host '{}' in target {idx}: {err}", cfg.host)
                })?;
                let label = cfg.name.clone().unwrap_or_else(|| target.to_string());
                Ok((label, target))
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Could not open config")]
    Io(#[from] std::io::Error),
    #[error("Could not parse")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value: {0}")]
    Invalid(&'static str),
}
