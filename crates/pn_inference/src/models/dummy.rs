use async_trait::async_trait;
use pn_core::{CompletionRequest, InferenceModel, LensId, RawCompletion, Result};
use serde_json::{json, Value};
use std::fmt;

use super::Config;
use crate::custom::{LENS_GENERATOR_MARKER, STRONG_KEYWORDS_LABEL, WEAK_KEYWORDS_LABEL};

/// Offline backend producing deterministic, well-formed replies.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new(_config: Option<&Config>) -> Self {
        Self
    }

    fn reply_for(request: &CompletionRequest) -> String {
        let system = request
            .messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if system.contains(LENS_GENERATOR_MARKER) {
            return Self::custom_lens_reply(user).to_string();
        }

        if let Some(lens) = LensId::ALL
            .into_iter()
            .find(|lens| system.contains(&format!("{} 전문가", lens.korean_name())))
        {
            let keywords: Vec<&str> = lens.seed_keywords().iter().take(3).copied().collect();
            return json!({
                "keywords": keywords,
                "interpretation": format!(
                    "{} 관점에서 이 기사는 {}의 문제를 드러냅니다.",
                    lens.korean_name(),
                    keywords.join(", ")
                ),
            })
            .to_string();
        }

        // Take first 20 words of the last user message
        let words: Vec<&str> = user.split_whitespace().take(20).collect();
        words.join(" ")
    }

    fn keywords_after(label: &str, text: &str) -> Vec<String> {
        text.lines()
            .find_map(|line| line.trim().strip_prefix(label))
            .map(|rest| {
                rest.trim_start_matches(':')
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn custom_lens_reply(user: &str) -> Value {
        let strong = Self::keywords_after(STRONG_KEYWORDS_LABEL, user);
        let weak = Self::keywords_after(WEAK_KEYWORDS_LABEL, user);
        let strong = strong.first().map(String::as_str).unwrap_or("자유");
        let weak = weak.first().map(String::as_str).unwrap_or("책임");
        json!({
            "perspectiveName": {"korean": format!("{} 실천주의", strong), "english": format!("{} Praxis", strong)},
            "additionalPerspectives": [
                {"name": "현대 실용주의", "reason": "뉴스를 곧바로 행동의 언어로 옮길 수 있습니다"},
                {"name": "균형적 관점", "reason": format!("{}을(를) 함께 고려하게 합니다", weak)}
            ],
            "analysis": {
                "event": {"weight": "크게"}, "cause": {"weight": "중간"}, "result": {"weight": "크게"},
                "subject": {"weight": "중간"}, "context": {"weight": "크게"}, "quotation": {"weight": "작게"},
                "framing": {"weight": "중간"}, "past": {"weight": "작게"}, "present": {"weight": "크게"},
                "future": {"weight": "중간"}
            },
            "headlineTemplate": format!("[주체]의 {}적 선택이 [결과]로 이어지다", strong),
            "visualGuide": {"primaryColor": "#4f46e5", "secondaryColor": "#0ea5e9", "symbol": "🧭"},
            "biasWarning": format!("{}에 치우치지 않도록 {}의 시선도 함께 두세요.", strong, weak)
        })
    }
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        let content = Self::reply_for(request);
        tracing::debug!("Dummy reply for {}: {}", request.model, content);
        Ok(RawCompletion {
            status: 200,
            body: json!({
                "object": "chat.completion",
                "model": request.model,
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }]
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_request;
    use crate::parsing::parse_lens_reply;
    use pn_core::{ChatMessage, CustomLensRequest, CustomLensResult};

    #[tokio::test]
    async fn test_dummy_model_answers_lens_prompts() {
        let model = DummyModel::new(None);
        let request = build_request(LensId::Kantianism, "기사 본문", "gpt-3.5-turbo");
        let content = model.complete(&request).await.unwrap();
        let result = parse_lens_reply(&content).unwrap().into_result(LensId::Kantianism);
        assert_eq!(result.keywords, vec!["의무", "도덕법칙", "자율성"]);
        assert!(result.interpretation.starts_with("칸트주의"));
    }

    #[tokio::test]
    async fn test_dummy_model_answers_custom_lens_prompt() {
        let model = DummyModel::new(None);
        let request = crate::custom::build_request(
            &CustomLensRequest {
                news_text: "기사".to_string(),
                strong_keywords: vec!["노동".to_string()],
                weak_keywords: vec!["초인".to_string()],
            },
            "gpt-4",
        );
        let content = model.complete(&request).await.unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        let lens = CustomLensResult::from_value(value).unwrap();
        assert_eq!(lens.display_name(), "노동 실천주의");
    }

    #[tokio::test]
    async fn test_dummy_model_echoes_other_prompts() {
        let model = DummyModel::new(None);
        let request = CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("hello   there")],
            max_tokens: 10,
            temperature: 0.7,
        };
        let raw = model.chat(&request).await.unwrap();
        assert!(raw.is_success());
        assert_eq!(raw.content(), Some("hello there"));
    }
}
