use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pn_core::{Error, Result};

pub mod analysis;
pub mod custom;
pub mod models;
pub mod parsing;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_CUSTOM_MODEL: &str = "gpt-4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How the per-lens backend calls of one analysis are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanoutMode {
    #[default]
    Parallel,
    Sequential,
}

impl FromStr for FanoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(FanoutMode::Parallel),
            "sequential" => Ok(FanoutMode::Sequential),
            other => Err(Error::InvalidInput(format!(
                "Unknown fan-out mode '{}', expected parallel or sequential",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub base_url: Option<String>,
    pub analysis_model: String,
    pub custom_model: String,
    pub timeout: Duration,
    pub fanout: FanoutMode,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            custom_model: DEFAULT_CUSTOM_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fanout: FanoutMode::default(),
        }
    }
}

impl InferenceConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub inference_config: InferenceConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("inference_config", &self.inference_config)
            .finish()
    }
}

pub mod prelude {
    pub use super::analysis::LensAnalyzer;
    pub use super::custom::CustomLensGenerator;
    pub use super::models::create_model;
    pub use super::{Config, FanoutMode, InferenceConfig};
    pub use pn_core::{AnalysisResponse, CustomLensRequest, CustomLensResult, Error, LensId, Result};
}

pub use analysis::LensAnalyzer;
pub use custom::CustomLensGenerator;
pub use models::create_model;
