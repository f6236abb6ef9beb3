use pn_core::{
    ChatMessage, CompletionRequest, CustomLensRequest, CustomLensResult, Error, FacetAnalysis,
    InferenceModel, Perspective, PerspectiveName, Result, StructuredLens, VisualGuide, Weight,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::parsing::parse_json;
use crate::InferenceConfig;

pub const CUSTOM_MAX_TOKENS: u32 = 1500;
pub const CUSTOM_TEMPERATURE: f32 = 0.8;

pub(crate) const LENS_GENERATOR_MARKER: &str = "철학적 렌즈 생성기";
pub(crate) const STRONG_KEYWORDS_LABEL: &str = "강하게 반영할 키워드";
pub(crate) const WEAK_KEYWORDS_LABEL: &str = "약하게 반영할 키워드";

const SYSTEM_PROMPT: &str = r##"당신은 창의적인 "철학적 렌즈 생성기"입니다. 주어진 키워드들을 바탕으로 독창적이고 실용적인 철학적 관점을 생성합니다.

중요: 반드시 유효한 JSON 형식으로만 응답하세요. 다른 설명이나 텍스트는 포함하지 마세요.

JSON 스키마:
{
  "perspectiveName": {
    "korean": "창의적인 한국어 관점 이름 (예: 디지털 자유주의, 현실적 이상주의 등)",
    "english": "Creative English Perspective Name"
  },
  "additionalPerspectives": [
    {"name": "관련 철학적 관점 이름", "reason": "현대 뉴스 해석에 유용한 이유"},
    {"name": "보완적 관점 이름", "reason": "균형잡힌 시각을 위한 이유"}
  ],
  "analysis": {
    "event": {"weight": "크게"},
    "cause": {"weight": "중간"},
    "result": {"weight": "크게"},
    "subject": {"weight": "중간"},
    "context": {"weight": "크게"},
    "quotation": {"weight": "작게"},
    "framing": {"weight": "중간"},
    "past": {"weight": "작게"},
    "present": {"weight": "크게"},
    "future": {"weight": "중간"}
  },
  "headlineTemplate": "[주체]의 [키워드]적 관점에서 바라본 [사건명]",
  "visualGuide": {"primaryColor": "#667eea", "secondaryColor": "#764ba2", "symbol": "🎯"},
  "biasWarning": "이 관점의 한계와 균형잡힌 시각을 위한 조언"
}

지침:
- 키워드의 의미를 창의적으로 해석하여 독특한 관점명 생성
- 현실적이고 실용적인 내용으로 구성
- JSON 형식만 응답하고 다른 텍스트는 절대 포함하지 않음"##;

const USER_REQUIREMENTS: &str = "위 키워드들을 바탕으로 창의적이고 독창적인 철학적 관점을 생성해주세요.

요구사항:
1. 관점명은 키워드의 의미를 반영하되 독창적으로 만드세요
2. 추천 관점 2개를 현대적이고 실용적으로 제시하세요
3. 분석 가중치는 키워드의 특성을 고려하여 설정하세요
4. 헤드라인 템플릿은 실제 뉴스에 바로 적용할 수 있는 구체적인 문장으로 작성하세요
5. 색상과 심볼은 관점의 성격에 맞게 선택하세요
6. 편향 경고는 현실적이고 도움이 되는 조언으로 작성하세요

반드시 JSON 형식으로만 응답하세요.";

/// Synthesizes a custom lens from the sorted strong/weak keywords.
pub struct CustomLensGenerator {
    model: Arc<dyn InferenceModel>,
    model_name: String,
}

impl fmt::Debug for CustomLensGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomLensGenerator")
            .field("model", &self.model.name())
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl CustomLensGenerator {
    pub fn new(model: Arc<dyn InferenceModel>, config: &InferenceConfig) -> Self {
        Self {
            model,
            model_name: config.custom_model.clone(),
        }
    }

    /// Fails only when the backend cannot be reached or answers with a
    /// non-success status. Unparseable replies yield [`fallback_lens`].
    pub async fn generate(&self, request: CustomLensRequest) -> Result<CustomLensResult> {
        let request = request.with_defaults();
        info!(
            "🎨 Creating custom lens (strong: {}, weak: {})",
            request.strong_keywords.join(", "),
            request.weak_keywords.join(", ")
        );

        let raw = self.model.chat(&build_request(&request, &self.model_name)).await?;
        if !raw.is_success() {
            error!("🚨 Custom lens backend call failed with status {}", raw.status);
            return Err(Error::Upstream {
                status: raw.status,
                details: raw.body,
            });
        }

        let Some(content) = raw.content().map(str::trim) else {
            warn!("⚠️ Custom lens reply carried no content, using fallback");
            return Ok(fallback_lens(&request));
        };
        debug!("Custom lens raw reply: {}", content);

        match parse_json::<Value>(content).and_then(|value| CustomLensResult::from_value(value).map_err(Error::from)) {
            Ok(lens) => Ok(lens),
            Err(e) => {
                warn!("⚠️ Custom lens reply could not be decoded, using fallback: {}", e);
                Ok(fallback_lens(&request))
            }
        }
    }
}

pub fn build_request(request: &CustomLensRequest, model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "뉴스 내용: {}\n\n{}: {}\n{}: {}\n\n{}",
                request.news_text,
                STRONG_KEYWORDS_LABEL,
                request.strong_keywords.join(", "),
                WEAK_KEYWORDS_LABEL,
                request.weak_keywords.join(", "),
                USER_REQUIREMENTS
            )),
        ],
        max_tokens: CUSTOM_MAX_TOKENS,
        temperature: CUSTOM_TEMPERATURE,
    }
}

/// Deterministic structured lens derived from the first strong and weak keyword.
pub fn fallback_lens(request: &CustomLensRequest) -> CustomLensResult {
    let strong = request.strong_keywords.first().map(String::as_str).unwrap_or("자유");
    let weak = request.weak_keywords.first().map(String::as_str).unwrap_or("책임");

    let mut analysis = FacetAnalysis::default();
    for slot in [
        &mut analysis.event,
        &mut analysis.result,
        &mut analysis.context,
        &mut analysis.present,
    ] {
        slot.weight = Weight::Large;
    }
    for slot in [&mut analysis.quotation, &mut analysis.past] {
        slot.weight = Weight::Small;
    }

    CustomLensResult::Structured(StructuredLens {
        perspective_name: PerspectiveName {
            korean: format!("{} 중심주의", strong),
            english: format!("{}-Centrism", strong),
        },
        additional_perspectives: vec![
            Perspective {
                name: "현대 실용주의".to_string(),
                reason: "실제 뉴스 해석에 바로 적용할 수 있는 실용적 접근".to_string(),
            },
            Perspective {
                name: "균형적 관점".to_string(),
                reason: format!("{}을 고려한 균형잡힌 시각 제공", weak),
            },
        ],
        analysis,
        headline_template: format!("[주체]의 {}적 관점에서 바라본 [사건명]", strong),
        visual_guide: VisualGuide::default(),
        bias_warning: format!(
            "{} 중심적 편향을 인식하고 {}의 관점도 함께 고려하여 균형잡힌 해석을 하세요.",
            strong, weak
        ),
    })
}
