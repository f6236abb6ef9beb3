//! Article highlighting for one lens, several lenses, or a custom lens.
//!
//! The highlighter never produces markup directly. It builds a
//! [`HighlightedArticle`] made of sentences and marked fragments which can be
//! rendered to HTML for the page or to a lightweight markup for terminals.
//! Concatenating every fragment and separator always yields the input text.

use lazy_static::lazy_static;
use pn_core::{CustomLensResult, LensId, LensResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::debug;

pub mod tables;

use tables::{is_simple_factual_statement, vocabulary};

/// Keyword occurrences a single-lens pass tries to reach.
pub const MIN_OCCURRENCES: usize = 3;
/// Shorter sentences are never struck through.
pub const STRIKE_MIN_CHARS: usize = 15;
/// Shorter sentences are never emphasized by the regular rules.
pub const EMPHASIS_MIN_CHARS: usize = 20;

const COMPARISON_CLASS: &str = "comparison-multi";

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+(\s+|$)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Keyword of the single active lens.
    Lens(LensId),
    /// Keyword of one of the lenses being compared.
    Compare(LensId),
    /// Keyword the user wanted strongly reflected.
    Strong,
    /// Keyword the user wanted weakly reflected.
    Weak,
}

impl Mark {
    pub fn class(&self) -> String {
        match self {
            Mark::Lens(lens) => format!("highlight {}", lens),
            Mark::Compare(lens) => format!("highlight comparison-{}", lens),
            Mark::Strong => "highlight strong-philosophy".to_string(),
            Mark::Weak => "highlight weak-philosophy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentenceStyle {
    #[default]
    Plain,
    Emphasized,
    Struck,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub fragments: Vec<Fragment>,
    pub style: SentenceStyle,
    /// Whitespace that followed the sentence in the source text.
    pub separator: String,
}

impl Sentence {
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn is_marked(&self) -> bool {
        self.fragments.iter().any(|f| !f.marks.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighlightedArticle {
    pub sentences: Vec<Sentence>,
    /// Extra class on emphasized sentences, usually the lens id.
    pub emphasis_class: String,
    /// Number of keyword occurrences that were marked.
    pub occurrences: usize,
}

impl HighlightedArticle {
    /// The article without any highlighting.
    pub fn plain(article: &str) -> Self {
        let segments = split_segments(article);
        let styles = vec![SentenceStyle::Plain; segments.len()];
        assemble(article, &segments, &styles, &[], String::new(), 0)
    }

    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for sentence in &self.sentences {
            for fragment in &sentence.fragments {
                text.push_str(&fragment.text);
            }
            text.push_str(&sentence.separator);
        }
        text
    }

    pub fn emphasized_count(&self) -> usize {
        self.count_style(SentenceStyle::Emphasized)
    }

    pub fn struck_count(&self) -> usize {
        self.count_style(SentenceStyle::Struck)
    }

    fn count_style(&self, style: SentenceStyle) -> usize {
        self.sentences.iter().filter(|s| s.style == style).count()
    }

    pub fn marked_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.sentences
            .iter()
            .flat_map(|s| s.fragments.iter())
            .filter(|f| !f.marks.is_empty())
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for sentence in &self.sentences {
            let wrapper = match sentence.style {
                SentenceStyle::Plain => None,
                SentenceStyle::Emphasized if self.emphasis_class.is_empty() => {
                    Some("sentence-highlight".to_string())
                }
                SentenceStyle::Emphasized => {
                    Some(format!("sentence-highlight {}", self.emphasis_class))
                }
                SentenceStyle::Struck => Some("strikethrough".to_string()),
            };
            if let Some(class) = &wrapper {
                html.push_str(&format!("<span class=\"{}\">", class));
            }
            for fragment in &sentence.fragments {
                for mark in &fragment.marks {
                    html.push_str(&format!("<span class=\"{}\">", mark.class()));
                }
                html.push_str(&escape_html(&fragment.text));
                for _ in &fragment.marks {
                    html.push_str("</span>");
                }
            }
            if wrapper.is_some() {
                html.push_str("</span>");
            }
            html.push_str(&escape_html(&sentence.separator));
        }
        html
    }

    /// Terminal-friendly rendering: `**keyword**`, `==emphasis==`, `~~struck~~`.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for sentence in &self.sentences {
            let fence = match sentence.style {
                SentenceStyle::Plain => "",
                SentenceStyle::Emphasized => "==",
                SentenceStyle::Struck => "~~",
            };
            out.push_str(fence);
            for fragment in &sentence.fragments {
                let marker = match fragment.marks.first() {
                    None => "",
                    Some(Mark::Weak) if fragment.marks.len() == 1 => "*",
                    Some(_) => "**",
                };
                out.push_str(marker);
                out.push_str(&fragment.text);
                out.push_str(marker);
            }
            out.push_str(fence);
            out.push_str(&sentence.separator);
        }
        out
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Highlights an article for the single active lens.
///
/// Randomness only decides which sentence gets forced emphasis when no
/// sentence qualifies on its own.
#[derive(Debug)]
pub struct Highlighter<R = StdRng> {
    rng: R,
}

impl Highlighter<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for Highlighter<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> Highlighter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn highlight(&mut self, article: &str, lens: LensId, result: &LensResult) -> HighlightedArticle {
        let vocabulary = vocabulary(lens);
        let terms = extended_keywords(lens, &result.keywords);

        let mut spans = SpanSet::new(Mark::Lens(lens));
        let mut occurrences = 0;
        for term in &terms {
            occurrences += spans.add_term(article, term);
        }

        if occurrences < MIN_OCCURRENCES {
            let mut used: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in vocabulary.additional {
                if occurrences >= MIN_OCCURRENCES {
                    break;
                }
                if used.insert(*term) {
                    occurrences += spans.add_term(article, term);
                }
            }
        }

        let segments = split_segments(article);
        let mut styles: Vec<SentenceStyle> = segments
            .iter()
            .map(|segment| {
                let text = &article[segment.start..segment.end];
                let chars = text.chars().count();
                let has_keyword = spans.overlaps(segment.start, segment.end);

                if chars >= STRIKE_MIN_CHARS
                    && !has_keyword
                    && (contains_any(text, vocabulary.ignore) || is_simple_factual_statement(text))
                {
                    SentenceStyle::Struck
                } else if chars >= EMPHASIS_MIN_CHARS
                    && (has_keyword || contains_any(text, vocabulary.focus))
                {
                    SentenceStyle::Emphasized
                } else {
                    SentenceStyle::Plain
                }
            })
            .collect();

        if !styles.contains(&SentenceStyle::Emphasized) {
            self.force_emphasis(article, &segments, &mut styles);
        }

        debug!(
            "Highlighted {} occurrences for {} across {} sentences",
            occurrences,
            lens,
            segments.len()
        );
        assemble(article, &segments, &styles, &spans.spans, lens.as_str().to_string(), occurrences)
    }

    fn force_emphasis(&mut self, article: &str, segments: &[Segment], styles: &mut [SentenceStyle]) {
        let candidates: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(i, segment)| {
                styles[*i] != SentenceStyle::Struck
                    && article[segment.start..segment.end].chars().count() > EMPHASIS_MIN_CHARS
            })
            .map(|(i, _)| i)
            .collect();

        let chosen = if candidates.is_empty() {
            segments
                .iter()
                .enumerate()
                .map(|(i, segment)| (i, article[segment.start..segment.end].trim().chars().count()))
                .filter(|(_, chars)| *chars > 0)
                .max_by_key(|(_, chars)| *chars)
                .map(|(i, _)| i)
        } else {
            Some(candidates[self.rng.gen_range(0..candidates.len())])
        };

        if let Some(index) = chosen {
            styles[index] = SentenceStyle::Emphasized;
        }
    }
}

/// Highlights the keywords of every selected lens; spans of different lenses may overlap.
///
/// A sentence is emphasized when it holds a keyword of any selected lens.
pub fn highlight_comparison(article: &str, selections: &[(LensId, &LensResult)]) -> HighlightedArticle {
    let mut spans = Vec::new();
    let mut occurrences = 0;
    for (lens, result) in selections {
        let mut set = SpanSet::new(Mark::Compare(*lens));
        for term in extended_keywords(*lens, &result.keywords) {
            occurrences += set.add_term(article, &term);
        }
        spans.extend(set.spans);
    }

    let segments = split_segments(article);
    let styles: Vec<SentenceStyle> = segments
        .iter()
        .map(|segment| {
            if spans.iter().any(|s| s.start < segment.end && segment.start < s.end) {
                SentenceStyle::Emphasized
            } else {
                SentenceStyle::Plain
            }
        })
        .collect();

    assemble(article, &segments, &styles, &spans, COMPARISON_CLASS.to_string(), occurrences)
}

/// Marks the strong and weak keywords of a legacy custom lens.
/// Structured lenses leave the article untouched.
pub fn highlight_custom(article: &str, lens: &CustomLensResult) -> HighlightedArticle {
    let CustomLensResult::Legacy(legacy) = lens else {
        return HighlightedArticle::plain(article);
    };

    let mut strong = SpanSet::new(Mark::Strong);
    let mut weak = SpanSet::new(Mark::Weak);
    let mut occurrences = 0;
    for keyword in &legacy.strong_keywords {
        occurrences += strong.add_term(article, keyword);
    }
    for keyword in &legacy.weak_keywords {
        occurrences += weak.add_term(article, keyword);
    }

    let segments = split_segments(article);
    let styles = vec![SentenceStyle::Plain; segments.len()];
    let mut spans = strong.spans;
    spans.extend(weak.spans);
    assemble(article, &segments, &styles, &spans, String::new(), occurrences)
}

/// Returned keywords followed by the lens's core and related terms, deduplicated in order.
pub fn extended_keywords(lens: LensId, keywords: &[String]) -> Vec<String> {
    let vocabulary = vocabulary(lens);
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(|k| k.trim())
        .chain(vocabulary.core.iter().copied())
        .chain(vocabulary.related.iter().copied())
        .filter(|term| !term.is_empty() && seen.insert(term.to_string()))
        .map(str::to_string)
        .collect()
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    let text = text.to_lowercase();
    terms.iter().any(|term| text.contains(&term.to_lowercase()))
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    mark: Mark,
}

/// Non-overlapping spans sharing one mark.
struct SpanSet {
    mark: Mark,
    spans: Vec<Span>,
}

impl SpanSet {
    fn new(mark: Mark) -> Self {
        Self { mark, spans: Vec::new() }
    }

    /// Marks every case-insensitive occurrence of `term`; returns how many were new.
    fn add_term(&mut self, text: &str, term: &str) -> usize {
        let term = term.trim();
        if term.is_empty() {
            return 0;
        }
        let Ok(pattern) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            return 0;
        };

        let mut added = 0;
        for found in pattern.find_iter(text) {
            let (start, end) = (found.start(), found.end());
            if self.overlaps(start, end) {
                continue;
            }
            self.spans.push(Span { start, end, mark: self.mark });
            added += 1;
        }
        added
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans.iter().any(|s| s.start < end && start < s.end)
    }
}

/// Byte range of a sentence and of the whitespace after it.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: usize,
    end: usize,
    separator_end: usize,
}

/// Splits after runs of `.`, `!` or `?` followed by whitespace or the end of the text.
fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;
    for found in SENTENCE_END.find_iter(text) {
        let end = found.start() + found.as_str().trim_end().len();
        segments.push(Segment {
            start,
            end,
            separator_end: found.end(),
        });
        start = found.end();
    }
    if start < text.len() {
        segments.push(Segment {
            start,
            end: text.len(),
            separator_end: text.len(),
        });
    }
    segments
}

fn assemble(
    article: &str,
    segments: &[Segment],
    styles: &[SentenceStyle],
    spans: &[Span],
    emphasis_class: String,
    occurrences: usize,
) -> HighlightedArticle {
    let sentences = segments
        .iter()
        .zip(styles)
        .map(|(segment, style)| {
            let mut cuts = vec![segment.start, segment.end];
            for span in spans {
                for cut in [span.start, span.end] {
                    if cut > segment.start && cut < segment.end {
                        cuts.push(cut);
                    }
                }
            }
            cuts.sort_unstable();
            cuts.dedup();

            let mut fragments: Vec<Fragment> = Vec::new();
            for window in cuts.windows(2) {
                let (from, to) = (window[0], window[1]);
                let mut marks = Vec::new();
                for span in spans.iter().filter(|s| s.start <= from && s.end >= to) {
                    if !marks.contains(&span.mark) {
                        marks.push(span.mark);
                    }
                }
                match fragments.last_mut() {
                    Some(last) if last.marks == marks => last.text.push_str(&article[from..to]),
                    _ => fragments.push(Fragment {
                        text: article[from..to].to_string(),
                        marks,
                    }),
                }
            }

            Sentence {
                fragments,
                style: *style,
                separator: article[segment.end..segment.separator_end].to_string(),
            }
        })
        .collect();

    HighlightedArticle {
        sentences,
        emphasis_class,
        occurrences,
    }
}
