use std::time::Duration;

use crate::infra::config::HubSpotConfig;

/// Build a reqwest client with the configured connect/request timeouts.
pub fn make_http_client_with(cfg: &HubSpotConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()
}
