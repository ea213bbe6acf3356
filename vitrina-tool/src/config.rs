use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;
use vitrina_core::Viewer;
use vitrina_rest::DEFAULT_BASE_URL;

use crate::error::VtrError;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub log_level: Option<String>,
    pub operator: Option<Viewer>,
}

/// Backend address and credentials after applying precedence.
#[derive(Debug, PartialEq, Eq)]
pub struct Connection {
    pub base_url: String,
    pub token: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitrina").join("config.toml"))
}

/// Loads the config file. A missing file yields the defaults.
pub fn load_config() -> Result<Config, VtrError> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(err) => Err(err.into()),
    }
}

pub fn parse_config(content: &str) -> Result<Config, VtrError> {
    Ok(toml::from_str(content)?)
}

/// `cli_*` values already include environment overrides (clap reads them).
pub fn resolve_connection(
    cli_url: Option<String>,
    cli_token: Option<String>,
    config: &Config,
) -> Connection {
    let base_url = non_empty(cli_url)
        .or_else(|| non_empty(config.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let token = non_empty(cli_token).or_else(|| non_empty(config.token.clone()));

    Connection { base_url, token }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
