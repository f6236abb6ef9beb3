use std::sync::Arc;
use pn_core::InferenceModel;
use pn_inference::{CustomLensGenerator, InferenceConfig, LensAnalyzer};

pub struct AppState {
    pub inference_model: Arc<dyn InferenceModel>,
    pub analyzer: LensAnalyzer,
    pub custom_lens: CustomLensGenerator,
    pub proxy_model_name: String,
}

impl AppState {
    pub fn new(inference_model: Arc<dyn InferenceModel>, config: &InferenceConfig) -> Self {
        Self {
            analyzer: LensAnalyzer::new(inference_model.clone(), config),
            custom_lens: CustomLensGenerator::new(inference_model.clone(), config),
            proxy_model_name: config.analysis_model.clone(),
            inference_model,
        }
    }
}
