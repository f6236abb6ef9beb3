use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::lens::LensId;

pub const DEFAULT_STRONG_KEYWORDS: [&str; 2] = ["자유", "선택"];
pub const DEFAULT_WEAK_KEYWORDS: [&str; 2] = ["책임", "의미"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub news_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensResult {
    pub keywords: Vec<String>,
    pub interpretation: String,
}

impl LensResult {
    pub fn is_usable(&self) -> bool {
        !self.keywords.is_empty() && !self.interpretation.trim().is_empty()
    }
}

/// Per-lens results of one analysis, keyed by lens id on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResponse {
    results: BTreeMap<LensId, LensResult>,
}

impl AnalysisResponse {
    pub fn from_results(results: impl IntoIterator<Item = (LensId, LensResult)>) -> Self {
        Self {
            results: results.into_iter().collect(),
        }
    }

    pub fn get(&self, lens: LensId) -> Option<&LensResult> {
        self.results.get(&lens)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LensId, &LensResult)> {
        self.results.iter().map(|(lens, result)| (*lens, result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Every fixed lens is present and carries usable content.
    pub fn is_complete(&self) -> bool {
        LensId::ALL
            .iter()
            .all(|lens| self.results.get(lens).map_or(false, LensResult::is_usable))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLensRequest {
    pub news_text: String,
    #[serde(default)]
    pub strong_keywords: Vec<String>,
    #[serde(default)]
    pub weak_keywords: Vec<String>,
}

impl CustomLensRequest {
    /// Replaces empty keyword lists with the fixed default pairs.
    pub fn with_defaults(mut self) -> Self {
        if self.strong_keywords.is_empty() {
            self.strong_keywords = DEFAULT_STRONG_KEYWORDS.iter().map(|s| s.to_string()).collect();
        }
        if self.weak_keywords.is_empty() {
            self.weak_keywords = DEFAULT_WEAK_KEYWORDS.iter().map(|s| s.to_string()).collect();
        }
        self
    }
}

/// Relative emphasis the custom lens gives an analysis facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weight {
    Large,
    #[default]
    Medium,
    Small,
}

impl Weight {
    pub fn label(&self) -> &'static str {
        match self {
            Weight::Large => "크게",
            Weight::Medium => "중간",
            Weight::Small => "작게",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Weight::Large => "large",
            Weight::Medium => "medium",
            Weight::Small => "small",
        }
    }

    /// Unknown spellings fall back to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "크게" | "large" | "Large" => Weight::Large,
            "작게" | "small" | "Small" => Weight::Small,
            _ => Weight::Medium,
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Weight::parse_lenient).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacetWeight {
    #[serde(default)]
    pub weight: Weight,
}

impl From<Weight> for FacetWeight {
    fn from(weight: Weight) -> Self {
        Self { weight }
    }
}

/// The ten fixed analysis facets of a structured lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Event,
    Cause,
    Result,
    Subject,
    Context,
    Quotation,
    Framing,
    Past,
    Present,
    Future,
}

impl Facet {
    pub const ALL: [Facet; 10] = [
        Facet::Event,
        Facet::Cause,
        Facet::Result,
        Facet::Subject,
        Facet::Context,
        Facet::Quotation,
        Facet::Framing,
        Facet::Past,
        Facet::Present,
        Facet::Future,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Facet::Event => "event",
            Facet::Cause => "cause",
            Facet::Result => "result",
            Facet::Subject => "subject",
            Facet::Context => "context",
            Facet::Quotation => "quotation",
            Facet::Framing => "framing",
            Facet::Past => "past",
            Facet::Present => "present",
            Facet::Future => "future",
        }
    }

    pub fn korean_label(&self) -> &'static str {
        match self {
            Facet::Event => "사건",
            Facet::Cause => "원인",
            Facet::Result => "결과",
            Facet::Subject => "주체",
            Facet::Context => "맥락",
            Facet::Quotation => "인용",
            Facet::Framing => "프레이밍",
            Facet::Past => "과거",
            Facet::Present => "현재",
            Facet::Future => "미래",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetAnalysis {
    pub event: FacetWeight,
    pub cause: FacetWeight,
    pub result: FacetWeight,
    pub subject: FacetWeight,
    pub context: FacetWeight,
    pub quotation: FacetWeight,
    pub framing: FacetWeight,
    pub past: FacetWeight,
    pub present: FacetWeight,
    pub future: FacetWeight,
}

impl FacetAnalysis {
    pub fn weight(&self, facet: Facet) -> Weight {
        let slot = match facet {
            Facet::Event => &self.event,
            Facet::Cause => &self.cause,
            Facet::Result => &self.result,
            Facet::Subject => &self.subject,
            Facet::Context => &self.context,
            Facet::Quotation => &self.quotation,
            Facet::Framing => &self.framing,
            Facet::Past => &self.past,
            Facet::Present => &self.present,
            Facet::Future => &self.future,
        };
        slot.weight
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facet, Weight)> + '_ {
        Facet::ALL.into_iter().map(move |facet| (facet, self.weight(facet)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveName {
    pub korean: String,
    #[serde(default)]
    pub english: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualGuide {
    pub primary_color: String,
    pub secondary_color: String,
    pub symbol: String,
}

impl Default for VisualGuide {
    fn default() -> Self {
        Self {
            primary_color: "#667eea".to_string(),
            secondary_color: "#764ba2".to_string(),
            symbol: "🎯".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredLens {
    pub perspective_name: PerspectiveName,
    #[serde(default)]
    pub additional_perspectives: Vec<Perspective>,
    pub analysis: FacetAnalysis,
    #[serde(default)]
    pub headline_template: String,
    #[serde(default)]
    pub visual_guide: VisualGuide,
    #[serde(default)]
    pub bias_warning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLens {
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub similar_philosophy: String,
    #[serde(default)]
    pub strong_keywords: Vec<String>,
    #[serde(default)]
    pub weak_keywords: Vec<String>,
    #[serde(default)]
    pub interpretation: String,
}

/// A synthesized lens. Decoded by the presence of `perspectiveName`;
/// serialized as the bare variant object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomLensResult {
    Structured(StructuredLens),
    Legacy(LegacyLens),
}

impl CustomLensResult {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if !value.is_object() {
            return Err(serde_json::Error::custom("custom lens must be a JSON object"));
        }
        if value.get("perspectiveName").is_some() {
            serde_json::from_value(value).map(CustomLensResult::Structured)
        } else {
            serde_json::from_value(value).map(CustomLensResult::Legacy)
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CustomLensResult::Structured(lens) => &lens.perspective_name.korean,
            CustomLensResult::Legacy(lens) => &lens.name,
        }
    }
}

impl<'de> Deserialize<'de> for CustomLensResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CustomLensResult::from_value(value).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One chat completion call as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Backend reply kept verbatim, status included.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompletion {
    pub status: u16,
    pub body: Value,
}

impl RawCompletion {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `choices[0].message.content` of a chat completion body.
    pub fn content(&self) -> Option<&str> {
        self.body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
    }
}
