use std::time::Instant;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::HubSpotError;
use crate::infra::config::HubSpotConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::logging::{count_request, log_metric};
use crate::infra::runtime::limits::make_http_client_with;

/// Authenticated handle on the HubSpot CRM v3 REST API. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct HubSpotClient {
    base: String,
    access_token: Option<String>,
    http: Client,
}

impl HubSpotClient {
    pub fn new(base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            access_token: Some(access_token.into()),
            http: Client::new(),
        }
    }

    pub fn from_config(cfg: &HubSpotConfig) -> Result<Self, HubSpotError> {
        let http = make_http_client_with(cfg)?;
        Ok(Self {
            base: cfg.base_url.clone(),
            access_token: cfg.access_token.clone(),
            http,
        })
    }

    /// Append `segments` to the base URL, each percent-encoded as exactly one
    /// path segment, so caller-supplied ids cannot add segments or a query.
    fn url(&self, segments: &[&str]) -> Result<Url, HubSpotError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(HubSpotError::InvalidPathSegment(bad.to_string()));
        }
        let invalid_base = || HubSpotError::InvalidBaseUrl(self.base.clone());
        let mut url = Url::parse(&self.base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, HubSpotError> {
        let builder = self.http.get(self.url(path)?).query(query);
        self.send(operation, builder).await
    }

    pub async fn post<B, T>(&self, operation: &'static str, path: &[&str], body: &B) -> Result<T, HubSpotError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.post(self.url(path)?).json(body);
        self.send(operation, builder).await
    }

    pub async fn patch<B, T>(&self, operation: &'static str, path: &[&str], body: &B) -> Result<T, HubSpotError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.patch(self.url(path)?).json(body);
        self.send(operation, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, HubSpotError> {
        let token = self.access_token.as_deref().ok_or(HubSpotError::NotConfigured)?;
        let (builder, rid) = add_standard_headers(builder, token);
        tracing::debug!(operation, request_id = %rid, "hubspot request");

        let start = Instant::now();
        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                count_request(operation, 0);
                return Err(e.into());
            }
        };
        let status = resp.status();
        count_request(operation, status.as_u16());
        let body = resp.bytes().await?;
        log_metric(operation, "hubspot_request_latency_ms", start.elapsed().as_millis() as f64);

        if !status.is_success() {
            let err = api_error(status.as_u16(), &body);
            tracing::debug!(operation, request_id = %rid, status = status.as_u16(), "hubspot request failed");
            return Err(err);
        }
        tracing::trace!(operation, request_id = %rid, bytes = body.len(), "hubspot response");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// HubSpot's standard error document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    correlation_id: Option<String>,
}

fn api_error(status: u16, body: &[u8]) -> HubSpotError {
    let raw = String::from_utf8_lossy(body).trim().to_string();
    let fallback = || if raw.is_empty() { format!("HTTP {status}") } else { raw.clone() };
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => HubSpotError::Api {
            status,
            message: parsed.message.unwrap_or_else(fallback),
            category: parsed.category,
            correlation_id: parsed.correlation_id,
        },
        Err(_) => HubSpotError::Api {
            status,
            message: fallback(),
            category: None,
            correlation_id: None,
        },
    }
}
