//! The five fixed philosophical lenses and their prompt material.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensId {
    Platonism,
    Kantianism,
    Nietzscheanism,
    Existentialism,
    Marxism,
}

impl LensId {
    pub const ALL: [LensId; 5] = [
        LensId::Platonism,
        LensId::Kantianism,
        LensId::Nietzscheanism,
        LensId::Existentialism,
        LensId::Marxism,
    ];

    /// Wire identifier, also used as the CSS class of highlight spans.
    pub fn as_str(&self) -> &'static str {
        match self {
            LensId::Platonism => "platonism",
            LensId::Kantianism => "kantianism",
            LensId::Nietzscheanism => "nietzscheanism",
            LensId::Existentialism => "existentialism",
            LensId::Marxism => "marxism",
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            LensId::Platonism => "플라톤주의",
            LensId::Kantianism => "칸트주의",
            LensId::Nietzscheanism => "니체주의",
            LensId::Existentialism => "실존주의",
            LensId::Marxism => "마르크스주의",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LensId::Platonism => "🏛️",
            LensId::Kantianism => "⚖️",
            LensId::Nietzscheanism => "⚡",
            LensId::Existentialism => "🌅",
            LensId::Marxism => "🔨",
        }
    }

    /// Seed keywords embedded in the prompt and used for fallback results.
    pub fn seed_keywords(&self) -> &'static [&'static str] {
        match self {
            LensId::Platonism => &[
                "이데아", "진리", "이상", "정의", "지혜", "선", "완벽성", "영혼", "형상", "동굴의 비유",
            ],
            LensId::Kantianism => &[
                "의무", "도덕법칙", "자율성", "정언명령", "이성", "존엄성", "보편성", "의지", "선의지", "정언명령",
            ],
            LensId::Nietzscheanism => &[
                "권력의지", "초인", "영원회귀", "가치전도", "창조", "생명력", "개별성", "극복", "신의 죽음", "가치창조",
            ],
            LensId::Existentialism => &[
                "자유", "선택", "책임", "불안", "죽음", "의미창조", "진정성", "현존재", "존재선행", "절망",
            ],
            LensId::Marxism => &[
                "계급", "자본", "착취", "변증법", "혁명", "생산관계", "이데올로기", "노동", "소외", "물질적 조건",
            ],
        }
    }

    /// Lens specific analysis instruction sent as part of the user prompt.
    pub fn prompt(&self) -> &'static str {
        match self {
            LensId::Platonism => "플라톤주의 관점에서 이 뉴스를 분석해주세요. 이데아, 진리, 이상, 정의, 지혜, 선, 완벽성, 영혼, 형상 등의 키워드를 중심으로 현실과 이상의 관계, 진리의 추구, 정의의 실현 등을 고려하여 분석해주세요.",
            LensId::Kantianism => "칸트주의 관점에서 이 뉴스를 분석해주세요. 의무, 도덕법칙, 자율성, 정언명령, 이성, 존엄성, 보편성, 의지 등의 키워드를 중심으로 도덕적 의무, 보편적 도덕법칙, 인간의 존엄성 등을 고려하여 분석해주세요.",
            LensId::Nietzscheanism => "니체주의 관점에서 이 뉴스를 분석해주세요. 권력의지, 초인, 영원회귀, 가치전도, 창조, 생명력, 개별성, 극복 등의 키워드를 중심으로 가치의 재평가, 개인의 창조적 힘, 전통적 가치의 극복 등을 고려하여 분석해주세요.",
            LensId::Existentialism => "실존주의 관점에서 이 뉴스를 분석해주세요. 자유, 선택, 책임, 불안, 죽음, 의미창조, 진정성, 현존재 등의 키워드를 중심으로 인간의 자유와 책임, 존재의 의미, 진정한 삶의 방식 등을 고려하여 분석해주세요.",
            LensId::Marxism => "마르크스주의 관점에서 이 뉴스를 분석해주세요. 계급, 자본, 착취, 변증법, 혁명, 생산관계, 이데올로기, 노동 등의 키워드를 중심으로 계급 갈등, 자본주의의 모순, 사회적 변혁의 필요성 등을 고려하여 분석해주세요.",
        }
    }

    /// Display title, e.g. `🏛️ 플라톤주의`.
    pub fn title(&self) -> String {
        format!("{} {}", self.emoji(), self.korean_name())
    }
}

impl fmt::Display for LensId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LensId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        LensId::ALL
            .into_iter()
            .find(|lens| lens.as_str() == needle || lens.korean_name() == s.trim())
            .ok_or_else(|| Error::InvalidInput(format!("Unknown lens: {}", s)))
    }
}
