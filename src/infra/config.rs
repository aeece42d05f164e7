use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub hubspot: HubSpotConfig,
}

/// Connection settings for the HubSpot CRM API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HubSpotConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    mode: Option<String>,
    port: Option<u16>,
    hubspot: HubSpotConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::layer_env(FileConfig::default())
    }

    /// Read the TOML file named by `HUBSPOT_CONFIG` (if any), then apply
    /// environment overrides on top.
    pub fn from_env_and_toml() -> Self {
        let file = match std::env::var("HUBSPOT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => match load_toml(Path::new(&path)) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "ignoring unreadable config file");
                    FileConfig::default()
                }
            },
            _ => FileConfig::default(),
        };
        Self::layer_env(file)
    }

    fn layer_env(file: FileConfig) -> Self {
        let mode = std::env::var("MODE")
            .ok()
            .or(file.mode)
            .unwrap_or_else(|| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .or(file.port)
            .unwrap_or(8080);

        let mut hubspot = file.hubspot;
        if let Some(token) = non_empty_env("HUBSPOT_ACCESS_TOKEN") {
            hubspot.access_token = Some(token);
        }
        if let Some(base) = non_empty_env("HUBSPOT_BASE_URL") {
            hubspot.base_url = base;
        }
        if let Some(ms) = non_empty_env("HUBSPOT_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            hubspot.timeout_ms = ms;
        }
        if let Some(ms) = non_empty_env("HUBSPOT_CONNECT_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            hubspot.connect_timeout_ms = ms;
        }
        hubspot.access_token = hubspot.access_token.filter(|t| !t.trim().is_empty());

        Self { mode, port, hubspot }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_toml(path: &Path) -> Result<FileConfig, Box<dyn std::error::Error + Send + Sync>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
