//! Client side of the relay's HTTP API.

use async_trait::async_trait;
use pn_core::{AnalysisRequest, AnalysisResponse, CustomLensRequest, CustomLensResult, Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 90;

#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn analyze(&self, news_text: &str) -> Result<AnalysisResponse>;

    async fn create_custom_lens(&self, request: &CustomLensRequest) -> Result<CustomLensResult>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    base_url: Url,
}

impl HttpRelayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidInput(format!("Invalid relay URL '{}': {}", base_url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Uses `API_BASE_URL` when set, the local relay otherwise.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self::new(&base_url, Duration::from_secs(DEFAULT_CLIENT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidInput(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let details = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            warn!("⚠️ Relay answered {} for {}", status, path);
            return Err(Error::Upstream {
                status: status.as_u16(),
                details,
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn analyze(&self, news_text: &str) -> Result<AnalysisResponse> {
        let request = AnalysisRequest {
            news_text: news_text.to_string(),
        };
        self.post("/api/analyze-news", &request).await
    }

    async fn create_custom_lens(&self, request: &CustomLensRequest) -> Result<CustomLensResult> {
        self.post("/api/create-custom-philosophy", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_onto_base() {
        let client = HttpRelayClient::new("http://relay.local:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint("/api/analyze-news").unwrap().as_str(),
            "http://relay.local:8080/api/analyze-news"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = HttpRelayClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(err.is_input_error());
    }
}
