//! Configuration Management
//!
//! Resolves runtime settings from the command line, the environment and an
//! optional config file (`$XDG_CONFIG_HOME/cfgview/config.json`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Region queried when nothing else is configured
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Address the HTTP server binds to by default
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

pub const ENV_AGGREGATOR: &str = "CONFIG_AGGREGATOR_NAME";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_BIND: &str = "CFGVIEW_BIND";

/// File configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name of the AWS Config configuration aggregator
    #[serde(default)]
    pub aggregator_name: Option<String>,
    /// Region the aggregator lives in
    #[serde(default)]
    pub region: Option<String>,
    /// Listen address of the HTTP server
    #[serde(default)]
    pub bind: Option<String>,
}

/// Settings after applying CLI > env > file > default
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub aggregator_name: String,
    pub region: String,
    pub bind: String,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cfgview").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file, falling back to defaults if it is
    /// missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Cannot read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Resolve effective settings from the process environment
    pub fn resolve(
        &self,
        aggregator: Option<String>,
        region: Option<String>,
        bind: Option<String>,
    ) -> Result<Settings> {
        self.resolve_with(aggregator, region, bind, |key| std::env::var(key).ok())
    }

    /// Resolve effective settings with an explicit environment lookup
    pub fn resolve_with(
        &self,
        aggregator: Option<String>,
        region: Option<String>,
        bind: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings> {
        let pick = |cli: Option<String>, key: &str, file: &Option<String>| {
            non_empty(cli)
                .or_else(|| non_empty(env(key)))
                .or_else(|| non_empty(file.clone()))
        };

        let aggregator_name = pick(aggregator, ENV_AGGREGATOR, &self.aggregator_name)
            .context(
                "No configuration aggregator configured. Set CONFIG_AGGREGATOR_NAME or use --aggregator",
            )?;
        let region = pick(region, ENV_REGION, &self.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let bind = pick(bind, ENV_BIND, &self.bind).unwrap_or_else(|| DEFAULT_BIND.to_string());

        Ok(Settings {
            aggregator_name,
            region,
            bind,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
