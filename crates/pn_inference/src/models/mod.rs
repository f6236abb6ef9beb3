use std::sync::Arc;

use pn_core::{Error, InferenceModel, Result};

pub use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Builds the backend named in `config.model_name` (`openai` by default).
pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    let config = config.unwrap_or_default();
    let name = config
        .model_name
        .clone()
        .unwrap_or_else(|| "openai".to_string())
        .to_lowercase();

    match name.as_str() {
        "openai" | "gpt" => {
            if config.api_key.is_none() {
                tracing::warn!("⚠️ OPENAI_API_KEY is not set; backend calls will fail at request time");
            }
            Ok(Arc::new(OpenAiModel::new(&config)?))
        }
        "dummy" | "offline" => Ok(Arc::new(DummyModel::new(Some(&config)))),
        other => Err(Error::InvalidInput(format!(
            "Unknown model '{}'. Available models: openai (default), dummy",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_model_by_name() {
        let model = create_model(None).await.unwrap();
        assert_eq!(model.name(), "OpenAI");

        let config = Config {
            model_name: Some("Dummy".to_string()),
            ..Config::default()
        };
        assert_eq!(create_model(Some(config)).await.unwrap().name(), "Dummy");

        let config = Config {
            model_name: Some("llama".to_string()),
            ..Config::default()
        };
        assert!(create_model(Some(config)).await.is_err());
    }
}
