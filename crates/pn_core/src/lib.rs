pub mod error;
pub mod lens;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use lens::LensId;
pub use models::InferenceModel;
pub use types::{
    AnalysisRequest, AnalysisResponse, ChatMessage, CompletionRequest, CustomLensRequest,
    CustomLensResult, Facet, FacetAnalysis, FacetWeight, LegacyLens, LensResult, Perspective,
    PerspectiveName, RawCompletion, StructuredLens, VisualGuide, Weight,
};
