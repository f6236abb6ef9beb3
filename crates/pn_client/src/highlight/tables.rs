//! Per-lens vocabulary used by the article highlighter.

use lazy_static::lazy_static;
use pn_core::LensId;
use regex::Regex;
use std::collections::HashMap;

/// Word lists that steer highlighting for one lens.
#[derive(Debug)]
pub struct LensVocabulary {
    /// Central concepts of the lens, always highlighted.
    pub core: &'static [&'static str],
    /// Broader related terms, always highlighted.
    pub related: &'static [&'static str],
    /// Backup terms tried when too few occurrences were found.
    pub additional: &'static [&'static str],
    /// Terms marking a sentence the lens would skip over.
    pub ignore: &'static [&'static str],
    /// Terms marking a sentence the lens would dwell on.
    pub focus: &'static [&'static str],
}

const COMMON_IGNORE: [&str; 11] = [
    "날짜", "시간", "장소", "연락처", "전화번호", "이메일", "주소", "가격", "비용", "할인", "세일",
];

macro_rules! ignore_list {
    ($($extra:literal),*) => {
        &[
            COMMON_IGNORE[0], COMMON_IGNORE[1], COMMON_IGNORE[2], COMMON_IGNORE[3],
            COMMON_IGNORE[4], COMMON_IGNORE[5], COMMON_IGNORE[6], COMMON_IGNORE[7],
            COMMON_IGNORE[8], COMMON_IGNORE[9], COMMON_IGNORE[10], $($extra),*
        ]
    };
}

static PLATONISM: LensVocabulary = LensVocabulary {
    core: &["이데아", "진리", "이상", "정의", "지혜", "선", "완벽성", "영혼", "형상", "동굴의 비유"],
    related: &[
        "이상적", "완벽", "진실", "선악", "지식", "철학", "형이상학", "본질", "실재", "가상",
        "현실", "이상국가", "철인정치", "교육", "계몽", "동굴", "비유", "완벽한", "진실한",
        "정의로운", "선한", "지혜로운", "영혼적", "형상적", "철인", "정치", "교육적", "계몽적",
        "진리적", "정의적", "정치적",
    ],
    additional: &[
        "이상", "완벽", "진리", "정의", "지혜", "선", "영혼", "형상", "이상적", "완벽한",
        "진실한", "정의로운", "선한", "지혜로운", "이상국가", "철인", "정치", "교육", "계몽",
        "진실", "선악", "지식", "철학", "형이상학", "본질", "실재", "가상", "현실", "철인정치",
        "동굴", "비유",
    ],
    ignore: ignore_list!(),
    focus: &[
        "이상", "완벽", "진리", "정의", "지혜", "선", "영혼", "형상", "이상적", "완벽한",
        "진실한", "정의로운", "선한", "지혜로운", "영혼적", "형상적", "이상국가", "철인", "정치",
        "교육", "계몽",
    ],
};

static KANTIANISM: LensVocabulary = LensVocabulary {
    core: &["의무", "도덕법칙", "자율성", "정언명령", "이성", "존엄성", "보편성", "의지", "선의지"],
    related: &[
        "도덕", "윤리", "책임", "자율", "보편", "존엄", "인간", "자유", "가언명령", "실천이성",
        "순수이성", "선험", "범주", "도덕적", "윤리적", "의무적", "책임적", "자율적", "이성적",
        "보편적", "인간적", "선험적", "범주적",
    ],
    additional: &[
        "도덕", "윤리", "의무", "책임", "자율", "이성", "보편", "존엄", "인간", "자유", "선의지",
        "정언명령", "가언명령", "실천이성", "순수이성", "선험", "범주", "도덕적", "윤리적",
        "의무적", "책임적", "자율적", "이성적", "보편적", "인간적", "선험적",
    ],
    ignore: ignore_list!("오락", "유흥"),
    focus: &[
        "도덕", "윤리", "의무", "책임", "자율", "이성", "보편", "존엄", "인간", "자유", "선의지",
        "정언명령", "가언명령", "실천이성", "순수이성", "선험", "범주",
    ],
};

static NIETZSCHEANISM: LensVocabulary = LensVocabulary {
    core: &["권력의지", "초인", "영원회귀", "가치전도", "창조", "생명력", "개별성", "극복", "신의 죽음", "가치창조"],
    related: &[
        "권력", "의지", "가치", "생명", "개별", "전통", "도덕", "기독교", "약자", "강자", "예술",
        "음악", "비극", "디오니소스", "아폴론", "권력적", "의지적", "초인적", "창조적", "생명적",
        "개별적", "전통적", "도덕적", "예술적", "비극적",
    ],
    additional: &[
        "권력", "의지", "초인", "가치", "창조", "생명", "개별", "극복", "전통", "도덕", "기독교",
        "약자", "강자", "예술", "음악", "비극", "디오니소스", "아폴론", "영원회귀", "권력적",
        "창조적", "생명적", "개별적", "전통적", "예술적", "비극적",
    ],
    ignore: ignore_list!("도덕적", "선량한"),
    focus: &[
        "권력", "의지", "초인", "가치", "창조", "생명", "개별", "극복", "전통", "도덕", "기독교",
        "약자", "강자", "예술", "음악", "비극", "디오니소스", "아폴론", "영원회귀",
    ],
};

static EXISTENTIALISM: LensVocabulary = LensVocabulary {
    core: &["자유", "선택", "책임", "불안", "죽음", "의미창조", "진정성", "현존재", "존재선행", "절망"],
    related: &[
        "의미", "존재", "고독", "무의미", "실존", "본질", "현재", "미래", "과거", "시간", "인간",
        "주체", "객체", "자유적", "선택적", "실존적", "본질적", "주체적", "인간적", "시간적",
    ],
    additional: &[
        "자유", "선택", "책임", "불안", "죽음", "의미", "진정성", "존재", "절망", "고독",
        "무의미", "실존", "본질", "현재", "미래", "과거", "시간", "인간", "주체", "객체",
        "실존적", "주체적",
    ],
    ignore: ignore_list!("일상적", "평범한"),
    focus: &[
        "자유", "선택", "책임", "불안", "죽음", "의미", "진정성", "존재", "절망", "고독",
        "무의미", "실존", "본질", "현재", "미래", "과거", "시간", "인간", "주체", "객체",
    ],
};

static MARXISM: LensVocabulary = LensVocabulary {
    core: &["계급", "자본", "착취", "변증법", "혁명", "생산관계", "이데올로기", "노동", "소외", "물질적 조건"],
    related: &[
        "생산", "물질", "경제", "사회", "정치", "부르주아", "프롤레타리아", "자본주의",
        "사회주의", "공산주의", "상품", "가치", "잉여가치", "계급적", "자본적", "착취적",
        "변증법적", "혁명적", "생산적", "이데올로기적", "노동적", "물질적", "경제적", "사회적",
        "정치적",
    ],
    additional: &[
        "계급", "자본", "착취", "변증법", "혁명", "생산", "이데올로기", "노동", "소외", "물질",
        "경제", "사회", "정치", "부르주아", "프롤레타리아", "자본주의", "사회주의", "공산주의",
        "상품", "가치", "잉여가치", "경제적", "사회적", "정치적",
    ],
    ignore: ignore_list!("개인적", "사적"),
    focus: &[
        "계급", "자본", "착취", "변증법", "혁명", "생산", "이데올로기", "노동", "소외", "물질",
        "경제", "사회", "정치", "부르주아", "프롤레타리아", "자본주의", "사회주의", "공산주의",
        "상품", "가치", "잉여가치",
    ],
};

lazy_static! {
    static ref VOCABULARY: HashMap<LensId, &'static LensVocabulary> = {
        let mut map = HashMap::new();
        map.insert(LensId::Platonism, &PLATONISM);
        map.insert(LensId::Kantianism, &KANTIANISM);
        map.insert(LensId::Nietzscheanism, &NIETZSCHEANISM);
        map.insert(LensId::Existentialism, &EXISTENTIALISM);
        map.insert(LensId::Marxism, &MARXISM);
        map
    };

    /// Sentences that merely list facts: a leading count or date unit, or contact details.
    static ref FACTUAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^\d+(년|월|일|시|분|원|%|명|개|건)").unwrap(),
        Regex::new(r"연락처|전화번호|이메일|주소|홈페이지|웹사이트").unwrap(),
    ];
}

pub fn vocabulary(lens: LensId) -> &'static LensVocabulary {
    VOCABULARY[&lens]
}

pub fn is_simple_factual_statement(segment: &str) -> bool {
    let segment = segment.trim_start();
    FACTUAL_PATTERNS.iter().any(|pattern| pattern.is_match(segment))
}
