use async_trait::async_trait;
use pn_core::{CompletionRequest, Error, InferenceModel, RawCompletion, Result};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::Config;

/// Chat completion backend speaking the OpenAI HTTP protocol.
pub struct OpenAiModel {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.inference_config.base_url().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| Error::InvalidInput(format!("Invalid backend URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(config.inference_config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        let mut builder = self.client.post(self.endpoint()).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        // Error pages are not always JSON; keep them as a string body.
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if !(200..300).contains(&status) {
            tracing::warn!("🚨 {} returned status {} for model {}", self.name(), status, request.model);
        }

        Ok(RawCompletion { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferenceConfig;

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = Config {
            inference_config: InferenceConfig {
                base_url: Some("not a url".to_string()),
                ..InferenceConfig::default()
            },
            ..Config::default()
        };
        assert!(OpenAiModel::new(&config).is_err());
    }

    #[test]
    fn test_endpoint_and_redacted_debug() {
        let config = Config {
            api_key: Some("sk-test".to_string()),
            inference_config: InferenceConfig {
                base_url: Some("http://localhost:8080/v1/".to_string()),
                ..InferenceConfig::default()
            },
            ..Config::default()
        };
        let model = OpenAiModel::new(&config).unwrap();
        assert_eq!(model.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert!(!format!("{:?}", model).contains("sk-test"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = Config {
            api_key: Some("  ".to_string()),
            ..Config::default()
        };
        let model = OpenAiModel::new(&config).unwrap();
        assert!(model.api_key.is_none());
    }
}
