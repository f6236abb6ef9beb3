//! Defensive decoding of model replies that should be JSON but may arrive
//! wrapped in code fences or prose.

use lazy_static::lazy_static;
use pn_core::{Error, LensId, LensResult, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Keyword lists longer than this are cut.
pub const MAX_KEYWORDS: usize = 5;
/// Number of seed keywords used when a reply carries none.
pub const FALLBACK_KEYWORDS: usize = 3;

lazy_static! {
    static ref JSON_FENCE: Regex = Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap();
    static ref ANY_FENCE: Regex = Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*(.*?)\s*```").unwrap();
}

/// Returns the body of the first ```json fence, else of the first plain
/// fence, else the trimmed input.
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    let fence = if content.contains("```json") {
        JSON_FENCE.captures(content)
    } else if content.contains("```") {
        ANY_FENCE.captures(content)
    } else {
        None
    };
    fence
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(content)
}

/// Outermost `{...}` slice of the input, if any.
pub fn outermost_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then_some(&raw[start..=end])
}

/// Parses a model reply as `T`, trying the fence-stripped payload first and
/// then the outermost object inside it.
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    let payload = strip_code_fence(content);
    match serde_json::from_str(payload) {
        Ok(value) => Ok(value),
        Err(first_error) => match outermost_object(payload) {
            Some(object) if object.len() < payload.len() => {
                serde_json::from_str(object).map_err(|_| Error::Serialization(first_error))
            }
            _ => Err(Error::Serialization(first_error)),
        },
    }
}

/// Shape of a per-lens reply. Both fields are optional so that partial
/// replies can be completed from the lens catalogue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LensReply {
    #[serde(default)]
    pub keywords: Option<Value>,
    #[serde(default)]
    pub interpretation: Option<String>,
}

impl LensReply {
    /// Keywords as strings; accepts an array or a comma separated string.
    fn keyword_list(&self) -> Vec<String> {
        let raw: Vec<String> = match &self.keywords {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(joined)) => joined.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        let mut keywords: Vec<String> = Vec::new();
        for keyword in raw.into_iter().map(|k| k.trim().to_string()) {
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        keywords.truncate(MAX_KEYWORDS);
        keywords
    }

    /// Completes missing parts from the lens catalogue.
    pub fn into_result(self, lens: LensId) -> LensResult {
        let mut keywords = self.keyword_list();
        if keywords.is_empty() {
            keywords = seed_keywords(lens);
        }
        let interpretation = self
            .interpretation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("{} 관점에서의 분석이 필요합니다.", lens.korean_name()));
        LensResult {
            keywords,
            interpretation,
        }
    }
}

pub fn parse_lens_reply(content: &str) -> Result<LensReply> {
    parse_json(content)
}

pub fn seed_keywords(lens: LensId) -> Vec<String> {
    lens.seed_keywords()
        .iter()
        .take(FALLBACK_KEYWORDS)
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Substitute used whenever a lens reply is unusable.
pub fn fallback_result(lens: LensId) -> LensResult {
    LensResult {
        keywords: seed_keywords(lens),
        interpretation: format!(
            "{} 관점에서 이 뉴스는 중요한 철학적 함의를 담고 있습니다.",
            lens.korean_name()
        ),
    }
}
