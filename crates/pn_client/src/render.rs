//! View models for lens results and custom lenses, with plain-text rendering.

use pn_core::{CustomLensResult, Facet, LegacyLens, LensId, LensResult, Perspective, Weight};
use std::fmt::Write;

const DEFAULT_DEFINITION: &str = "사용자가 선택한 키워드들을 바탕으로 한 독특한 철학적 관점입니다.";
const DEFAULT_SIMILAR_PHILOSOPHY: &str = "실용주의";
const DEFAULT_SHARE_NAME: &str = "나만의 철학적 관점";

#[derive(Debug, Clone, PartialEq)]
pub struct LensCard {
    pub lens: LensId,
    pub title: String,
    pub keywords: Vec<String>,
    pub interpretation: String,
}

impl LensCard {
    pub fn new(lens: LensId, result: &LensResult) -> Self {
        Self {
            lens,
            title: format!("{} 관점", lens.title()),
            keywords: result.keywords.clone(),
            interpretation: result.interpretation.clone(),
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "{}\n핵심 키워드: {}\n해석: {}",
            self.title,
            self.keywords.join(", "),
            self.interpretation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetCell {
    pub facet: Facet,
    pub label: &'static str,
    pub weight: Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredCard {
    pub korean_name: String,
    pub english_name: String,
    pub perspectives: Vec<Perspective>,
    /// Always the ten facets, in display order.
    pub facets: Vec<FacetCell>,
    pub headline_template: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub symbol: String,
    pub bias_warning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCard {
    pub name: String,
    pub definition: String,
    pub similar_philosophy: String,
    pub strong_keywords: Vec<String>,
    pub weak_keywords: Vec<String>,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomLensView {
    Structured(StructuredCard),
    Legacy(LegacyCard),
}

impl From<&CustomLensResult> for CustomLensView {
    fn from(lens: &CustomLensResult) -> Self {
        match lens {
            CustomLensResult::Structured(lens) => CustomLensView::Structured(StructuredCard {
                korean_name: lens.perspective_name.korean.clone(),
                english_name: lens.perspective_name.english.clone(),
                perspectives: lens.additional_perspectives.clone(),
                facets: lens
                    .analysis
                    .iter()
                    .map(|(facet, weight)| FacetCell {
                        facet,
                        label: facet.korean_label(),
                        weight,
                    })
                    .collect(),
                headline_template: lens.headline_template.clone(),
                primary_color: lens.visual_guide.primary_color.clone(),
                secondary_color: lens.visual_guide.secondary_color.clone(),
                symbol: lens.visual_guide.symbol.clone(),
                bias_warning: lens.bias_warning.clone(),
            }),
            CustomLensResult::Legacy(lens) => CustomLensView::Legacy(LegacyCard {
                name: lens.name.clone(),
                definition: non_empty_or(&lens.definition, DEFAULT_DEFINITION),
                similar_philosophy: non_empty_or(&lens.similar_philosophy, DEFAULT_SIMILAR_PHILOSOPHY),
                strong_keywords: lens.strong_keywords.clone(),
                weak_keywords: lens.weak_keywords.clone(),
                interpretation: lens.interpretation.clone(),
            }),
        }
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

impl CustomLensView {
    pub fn title(&self) -> &str {
        match self {
            CustomLensView::Structured(card) => &card.korean_name,
            CustomLensView::Legacy(card) => &card.name,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            CustomLensView::Structured(card) => {
                let _ = writeln!(out, "{} {} ({})", card.symbol, card.korean_name, card.english_name);
                let _ = writeln!(out, "\n🔗 추천 관점");
                for perspective in &card.perspectives {
                    let _ = writeln!(out, "- {}: {}", perspective.name, perspective.reason);
                }
                let _ = writeln!(out, "\n📊 분석 가중치");
                for row in card.facets.chunks(5) {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|cell| format!("{} {}", cell.label, cell.weight.label()))
                        .collect();
                    let _ = writeln!(out, "{}", cells.join(" | "));
                }
                let _ = writeln!(out, "\n📰 헤드라인 리프레이밍 템플릿\n{}", card.headline_template);
                let _ = writeln!(
                    out,
                    "\n🎨 시각적 스타일 가이드: {} / {}",
                    card.primary_color, card.secondary_color
                );
                let _ = write!(out, "\n⚠️ 위험요소/편향과 균형잡기 팁\n{}", card.bias_warning);
            }
            CustomLensView::Legacy(card) => {
                let _ = writeln!(out, "🎨 {}", card.name);
                let _ = writeln!(out, "\n📖 관점 설명\n{}", card.definition);
                let _ = writeln!(out, "\n🔗 유사한 철학적 관점: {}", card.similar_philosophy);
                let _ = writeln!(out, "💪 강하게 반영된 키워드: {}", card.strong_keywords.join(", "));
                let _ = writeln!(out, "🤏 약하게 반영된 키워드: {}", card.weak_keywords.join(", "));
                let _ = write!(out, "\n💭 나만의 해석\n{}", card.interpretation);
            }
        }
        out
    }
}

/// Legacy card shown locally when the custom lens could not be created.
pub fn fallback_custom_lens(strong: &[String], weak: &[String]) -> CustomLensResult {
    CustomLensResult::Legacy(LegacyLens {
        name: "키워드 중심주의".to_string(),
        definition: "당신이 선택한 키워드들의 조합을 바탕으로 한 창의적이고 개인적인 철학적 관점입니다."
            .to_string(),
        similar_philosophy: "디지털 실용주의".to_string(),
        strong_keywords: strong.to_vec(),
        weak_keywords: weak.to_vec(),
        interpretation: format!(
            "이 관점은 {} 키워드를 중심으로 뉴스를 해석하며, {} 키워드들을 보조적으로 고려합니다.",
            strong.join(", "),
            weak.join(", ")
        ),
    })
}

pub fn share_text(lens: Option<&CustomLensResult>) -> String {
    let name = lens.map(CustomLensResult::display_name).unwrap_or(DEFAULT_SHARE_NAME);
    format!(
        "🎨 나만의 철학적 관점을 만들었어요!\n\n\"{}\"\n\n철학적 다중 렌즈를 통한 뉴스 재해석 서비스에서 경험해보세요!",
        name
    )
}
