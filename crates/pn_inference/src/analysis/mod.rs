use futures::future::join_all;
use pn_core::{AnalysisResponse, ChatMessage, CompletionRequest, InferenceModel, LensId, LensResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::parsing::{fallback_result, parse_lens_reply};
use crate::{FanoutMode, InferenceConfig};

pub const ANALYSIS_MAX_TOKENS: u32 = 500;
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;

/// Runs an article through the five fixed lenses.
///
/// Never fails: every lens whose backend call or reply is unusable gets a
/// deterministic fallback, independently of the other lenses.
pub struct LensAnalyzer {
    model: Arc<dyn InferenceModel>,
    model_name: String,
    fanout: FanoutMode,
}

impl fmt::Debug for LensAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LensAnalyzer")
            .field("model", &self.model.name())
            .field("model_name", &self.model_name)
            .field("fanout", &self.fanout)
            .finish()
    }
}

impl LensAnalyzer {
    pub fn new(model: Arc<dyn InferenceModel>, config: &InferenceConfig) -> Self {
        Self {
            model,
            model_name: config.analysis_model.clone(),
            fanout: config.fanout,
        }
    }

    pub async fn analyze(&self, article: &str) -> AnalysisResponse {
        info!("🔎 Analyzing article ({} chars) with {} lenses", article.chars().count(), LensId::ALL.len());

        let results = match self.fanout {
            FanoutMode::Parallel => {
                join_all(LensId::ALL.iter().map(|lens| self.analyze_lens(*lens, article))).await
            }
            FanoutMode::Sequential => {
                let mut results = Vec::with_capacity(LensId::ALL.len());
                for lens in LensId::ALL {
                    results.push(self.analyze_lens(lens, article).await);
                }
                results
            }
        };

        AnalysisResponse::from_results(results)
    }

    async fn analyze_lens(&self, lens: LensId, article: &str) -> (LensId, LensResult) {
        let request = build_request(lens, article, &self.model_name);

        let content = match self.model.complete(&request).await {
            Ok(content) => content,
            Err(e) => {
                warn!("⚠️ {} analysis failed, using fallback: {}", lens, e);
                return (lens, fallback_result(lens));
            }
        };
        debug!("{} raw reply: {}", lens, content);

        match parse_lens_reply(&content) {
            Ok(reply) => (lens, reply.into_result(lens)),
            Err(e) => {
                warn!("⚠️ {} reply is not valid JSON, using fallback: {}", lens, e);
                (lens, fallback_result(lens))
            }
        }
    }
}

pub fn build_request(lens: LensId, article: &str, model: &str) -> CompletionRequest {
    let name = lens.korean_name();
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(format!(
                "당신은 {name} 전문가입니다. 주어진 뉴스를 {name} 관점에서 분석하고, 핵심 키워드 3-5개와 해석 문장을 제공해주세요."
            )),
            ChatMessage::user(format!(
                "{}\n\n뉴스 내용: {}\n\n응답 형식: {{\"keywords\": [\"키워드1\", \"키워드2\", \"키워드3\"], \"interpretation\": \"해석 문장\"}}",
                lens.prompt(),
                article
            )),
        ],
        max_tokens: ANALYSIS_MAX_TOKENS,
        temperature: ANALYSIS_TEMPERATURE,
    }
}
