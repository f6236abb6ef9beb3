//! Session state of the interactive client and the controller that drives it.

use pn_core::{AnalysisResponse, CustomLensRequest, CustomLensResult, Error, LensId, LensResult, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::api::RelayApi;
use crate::gesture::{
    BoardLayout, CaptureConstraints, CaptureDevice, DropOutcome, GestureConfig, GestureEvent,
    GestureScope, GestureTracker, HandTracker, KeywordBoard, Point, PointerDrag,
};
use crate::highlight::{highlight_comparison, highlight_custom, HighlightedArticle, Highlighter};
use crate::render::{fallback_custom_lens, share_text, CustomLensView, LensCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Input,
    Loading,
    Results,
    Recombine,
    CustomLens,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub article: String,
    pub analysis: Option<AnalysisResponse>,
    pub active_lens: Option<LensId>,
    pub comparison_mode: bool,
    /// Lenses picked for comparison, in the order they were picked.
    pub selected: Vec<LensId>,
    pub view: View,
    pub custom_lens: Option<CustomLensResult>,
    /// The custom lens was built locally because the relay call failed.
    pub custom_lens_is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LensView {
    pub card: LensCard,
    pub article: HighlightedArticle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub cards: Vec<LensCard>,
    pub article: HighlightedArticle,
}

#[derive(Debug, Clone, Default)]
pub struct RecombineOptions {
    pub layout: BoardLayout,
    pub gesture: GestureConfig,
    pub constraints: CaptureConstraints,
    /// Fixes keyword placement and particle spread.
    pub board_seed: Option<u64>,
}

/// An open recombine mode. Dropping it releases the camera and the tracker.
#[derive(Debug)]
pub struct RecombineSession {
    scope: GestureScope,
    pub board: KeywordBoard,
    pub pointer: PointerDrag,
    pub tracker: GestureTracker,
    previous_view: View,
}

impl RecombineSession {
    /// Feeds up to `max_frames` camera frames through the pinch tracker.
    pub fn pump(&mut self, max_frames: usize) -> Vec<GestureEvent> {
        self.tracker.run(&mut self.board, self.scope.frames().take(max_frames))
    }

    pub fn drag_start(&mut self, point: Point) -> Option<usize> {
        self.pointer.down(&self.board, point)
    }

    pub fn drag_move(&mut self, point: Point) {
        self.pointer.move_to(&mut self.board, point);
    }

    pub fn drag_end(&mut self) -> Option<DropOutcome> {
        self.pointer.up(&mut self.board)
    }
}

/// Owns the session state and turns user actions into relay calls and views.
#[derive(Debug)]
pub struct LensController<C, R = StdRng> {
    api: C,
    highlighter: Highlighter<R>,
    state: SessionState,
    recombine: Option<RecombineSession>,
}

impl<C: RelayApi> LensController<C, StdRng> {
    pub fn new(api: C) -> Self {
        Self::with_highlighter(api, Highlighter::from_entropy())
    }
}

impl<C: RelayApi, R: Rng> LensController<C, R> {
    pub fn with_highlighter(api: C, highlighter: Highlighter<R>) -> Self {
        Self {
            api,
            highlighter,
            state: SessionState::default(),
            recombine: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub async fn submit_article(&mut self, text: &str) -> Result<&AnalysisResponse> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("News text must not be empty".to_string()));
        }

        self.state.view = View::Loading;
        info!("📰 Submitting article ({} chars)", text.chars().count());

        match self.api.analyze(text).await {
            Ok(analysis) => {
                self.recombine = None;
                self.state = SessionState {
                    article: text.to_string(),
                    view: View::Results,
                    ..SessionState::default()
                };
                Ok(&*self.state.analysis.insert(analysis))
            }
            Err(e) => {
                warn!("⚠️ Analysis failed: {}", e);
                self.reset();
                Err(e)
            }
        }
    }

    fn lens_result(&self, lens: LensId) -> Result<&LensResult> {
        self.state
            .analysis
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("No analysis available yet".to_string()))?
            .get(lens)
            .ok_or_else(|| Error::InvalidInput(format!("No result for lens {}", lens)))
    }

    /// Single-lens mode: shows one card and the article highlighted for that lens.
    pub fn select_lens(&mut self, lens: LensId) -> Result<LensView> {
        let result = self.lens_result(lens)?.clone();
        self.state.active_lens = Some(lens);
        let article = self.highlighter.highlight(&self.state.article, lens, &result);
        Ok(LensView {
            card: LensCard::new(lens, &result),
            article,
        })
    }

    /// Adds or removes `lens` from the comparison, switching comparison mode on.
    pub fn toggle_lens_for_comparison(&mut self, lens: LensId) -> Result<ComparisonView> {
        self.lens_result(lens)?;
        if !self.state.comparison_mode {
            self.set_comparison_mode(true);
        }

        match self.state.selected.iter().position(|l| *l == lens) {
            Some(index) => {
                self.state.selected.remove(index);
            }
            None => self.state.selected.push(lens),
        }

        let analysis = self
            .state
            .analysis
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("No analysis available yet".to_string()))?;
        let selections: Vec<(LensId, &LensResult)> = self
            .state
            .selected
            .iter()
            .filter_map(|lens| analysis.get(*lens).map(|result| (*lens, result)))
            .collect();

        Ok(ComparisonView {
            cards: selections.iter().map(|(lens, result)| LensCard::new(*lens, result)).collect(),
            article: highlight_comparison(&self.state.article, &selections),
        })
    }

    pub fn set_comparison_mode(&mut self, enabled: bool) {
        self.state.comparison_mode = enabled;
        self.state.active_lens = None;
        self.state.selected.clear();
    }

    pub fn can_recombine(&self) -> bool {
        self.state.comparison_mode && self.state.selected.len() >= 2
    }

    /// Back to the input view with everything forgotten.
    pub fn reset(&mut self) {
        self.recombine = None;
        self.state = SessionState::default();
    }

    /// Opens the camera and lays out the keywords of the selected lenses.
    ///
    /// Any failure leaves the controller in the view it was in before.
    pub fn enter_recombine(
        &mut self,
        device: &mut dyn CaptureDevice,
        tracker: Box<dyn HandTracker>,
        options: RecombineOptions,
    ) -> Result<&mut RecombineSession> {
        if !self.can_recombine() {
            return Err(Error::InvalidInput(
                "Recombining needs at least two lenses selected for comparison".to_string(),
            ));
        }

        let previous_view = self.state.view;
        self.state.view = View::Recombine;
        let scope = match GestureScope::open(device, tracker, &options.constraints) {
            Ok(scope) => scope,
            Err(e) => {
                warn!("⚠️ Recombine mode unavailable: {}", e);
                self.state.view = previous_view;
                return Err(e);
            }
        };

        let mut board = match options.board_seed {
            Some(seed) => KeywordBoard::with_rng(options.layout, StdRng::seed_from_u64(seed)),
            None => KeywordBoard::new(options.layout),
        };
        if let Some(analysis) = &self.state.analysis {
            let keywords = self
                .state
                .selected
                .iter()
                .filter_map(|lens| analysis.get(*lens))
                .flat_map(|result| result.keywords.iter().cloned());
            board.populate(keywords);
        }

        info!("🎮 Recombine mode started");
        Ok(self.recombine.insert(RecombineSession {
            scope,
            board,
            pointer: PointerDrag::new(),
            tracker: GestureTracker::new(options.gesture),
            previous_view,
        }))
    }

    pub fn recombine(&mut self) -> Option<&mut RecombineSession> {
        self.recombine.as_mut()
    }

    /// Leaves recombine mode discarding the sorting.
    pub fn exit_recombine(&mut self) {
        if let Some(session) = self.recombine.take() {
            self.state.view = session.previous_view;
            info!("🚪 Recombine mode closed");
        }
    }

    /// Closes recombine mode and asks the relay for a lens built from the
    /// sorted keywords. Unsorted keywords count as weak. When the relay call
    /// fails a local card is shown instead.
    pub async fn create_custom_lens(&mut self) -> Result<CustomLensView> {
        let Some(session) = self.recombine.take() else {
            return Err(Error::InvalidInput("Recombine mode is not active".to_string()));
        };
        let RecombineSession { scope, board, .. } = session;
        drop(scope);
        let sorted = board.finish();

        self.state.view = View::Loading;
        let request = CustomLensRequest {
            news_text: self.state.article.clone(),
            strong_keywords: sorted.strong.clone(),
            weak_keywords: sorted.weak.clone(),
        };

        let (lens, is_fallback) = match self.api.create_custom_lens(&request).await {
            Ok(lens) => (lens, false),
            Err(e) => {
                warn!("⚠️ Custom lens creation failed, showing local card: {}", e);
                (fallback_custom_lens(&sorted.strong, &sorted.weak), true)
            }
        };

        info!("🎨 Custom lens ready: {}", lens.display_name());
        let view = CustomLensView::from(&lens);
        self.state.custom_lens = Some(lens);
        self.state.custom_lens_is_fallback = is_fallback;
        self.state.view = View::CustomLens;
        Ok(view)
    }

    pub fn custom_lens_view(&self) -> Option<CustomLensView> {
        self.state.custom_lens.as_ref().map(CustomLensView::from)
    }

    /// The article highlighted with the custom lens's keywords.
    pub fn custom_article(&self) -> Option<HighlightedArticle> {
        self.state
            .custom_lens
            .as_ref()
            .map(|lens| highlight_custom(&self.state.article, lens))
    }

    pub fn share_text(&self) -> String {
        share_text(self.state.custom_lens.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::camera::fakes::{FakeCamera, Probe, ScriptedTracker};
    use crate::gesture::landmarks::fixtures::pinching_at;
    use crate::gesture::{DropZone, HandFrame};
    use async_trait::async_trait;
    use pn_core::{LegacyLens, LensResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeRelay {
        fail_analysis: AtomicBool,
        fail_custom: bool,
        keywords: Vec<&'static str>,
        analyze_calls: AtomicUsize,
        last_custom: Mutex<Option<CustomLensRequest>>,
    }

    #[async_trait]
    impl RelayApi for FakeRelay {
        async fn analyze(&self, _news_text: &str) -> Result<AnalysisResponse> {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_analysis.load(Ordering::SeqCst) {
                return Err(Error::Inference("relay down".to_string()));
            }
            Ok(AnalysisResponse::from_results(LensId::ALL.into_iter().map(|lens| {
                let mut keywords: Vec<String> = self.keywords.iter().map(|k| k.to_string()).collect();
                if keywords.is_empty() {
                    keywords = lens.seed_keywords().iter().take(3).map(|k| k.to_string()).collect();
                }
                (
                    lens,
                    LensResult {
                        keywords,
                        interpretation: format!("{} 해석", lens.korean_name()),
                    },
                )
            })))
        }

        async fn create_custom_lens(&self, request: &CustomLensRequest) -> Result<CustomLensResult> {
            *self.last_custom.lock().unwrap() = Some(request.clone());
            if self.fail_custom {
                return Err(Error::Upstream {
                    status: 500,
                    details: serde_json::json!({"error": "OpenAI API 호출 실패"}),
                });
            }
            Ok(CustomLensResult::Legacy(LegacyLens {
                name: "연결주의".to_string(),
                definition: "정의".to_string(),
                similar_philosophy: "실용주의".to_string(),
                strong_keywords: request.strong_keywords.clone(),
                weak_keywords: request.weak_keywords.clone(),
                interpretation: "해석".to_string(),
            }))
        }
    }

    const ARTICLE: &str = "정부가 새로운 노동 정책을 발표했다. 시민들은 자유와 책임 사이에서 선택을 고민하고 있다.";

    fn controller(relay: FakeRelay) -> LensController<FakeRelay> {
        LensController::with_highlighter(relay, Highlighter::seeded(17))
    }

    async fn analyzed(relay: FakeRelay) -> LensController<FakeRelay> {
        let mut controller = controller(relay);
        controller.submit_article(ARTICLE).await.unwrap();
        controller
    }

    fn camera(probe: &Arc<Probe>, deny: bool) -> FakeCamera {
        FakeCamera { probe: probe.clone(), deny }
    }

    fn options() -> RecombineOptions {
        RecombineOptions {
            board_seed: Some(3),
            ..RecombineOptions::default()
        }
    }

    #[tokio::test]
    async fn test_empty_article_is_rejected_without_network() {
        let mut controller = controller(FakeRelay::default());
        let err = controller.submit_article("   \n ").await.unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(controller.api.analyze_calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.view(), View::Input);
    }

    #[tokio::test]
    async fn test_successful_submit_shows_results() {
        let mut controller = controller(FakeRelay::default());
        let analysis = controller.submit_article(&format!("  {}  ", ARTICLE)).await.unwrap();
        assert!(analysis.is_complete());
        assert_eq!(controller.view(), View::Results);
        assert_eq!(controller.state().article, ARTICLE);
    }

    #[tokio::test]
    async fn test_failed_submit_returns_to_input_without_partial_state() {
        let mut controller = controller(FakeRelay {
            fail_analysis: AtomicBool::new(true),
            ..FakeRelay::default()
        });
        assert!(controller.submit_article(ARTICLE).await.is_err());
        assert_eq!(controller.view(), View::Input);
        assert!(controller.state().analysis.is_none());
        assert!(controller.state().article.is_empty());
    }

    #[tokio::test]
    async fn test_failed_resubmit_clears_session_and_releases_camera() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Platonism).unwrap();

        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), Vec::new());
        controller
            .enter_recombine(&mut camera(&probe, false), tracker, options())
            .unwrap();

        controller.api.fail_analysis.store(true, Ordering::SeqCst);
        assert!(controller.submit_article("다른 기사입니다.").await.is_err());

        assert_eq!(controller.view(), View::Input);
        assert!(controller.state().analysis.is_none());
        assert!(controller.state().article.is_empty());
        assert!(controller.state().selected.is_empty());
        assert!(!controller.state().comparison_mode);
        assert!(controller.recombine().is_none());
        assert_eq!(probe.stopped(), 1);
        assert_eq!(probe.closed(), 1);
    }

    #[tokio::test]
    async fn test_select_lens_highlights_for_that_lens_only() {
        let mut controller = analyzed(FakeRelay::default()).await;
        let view = controller.select_lens(LensId::Marxism).unwrap();

        assert_eq!(controller.state().active_lens, Some(LensId::Marxism));
        assert_eq!(view.card.lens, LensId::Marxism);
        assert!(view.article.to_html().contains("highlight marxism"));
        assert!(!view.article.to_html().contains("highlight kantianism"));
        assert_eq!(view.article.plain_text(), ARTICLE);
    }

    #[tokio::test]
    async fn test_select_lens_before_analysis_fails() {
        let mut controller = controller(FakeRelay::default());
        assert!(controller.select_lens(LensId::Platonism).is_err());
    }

    #[tokio::test]
    async fn test_toggle_builds_ordered_comparison() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();
        let view = controller.toggle_lens_for_comparison(LensId::Kantianism).unwrap();

        assert!(controller.state().comparison_mode);
        assert_eq!(controller.state().selected, vec![LensId::Existentialism, LensId::Kantianism]);
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].lens, LensId::Existentialism);
        assert!(controller.can_recombine());

        controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();
        let view = controller.toggle_lens_for_comparison(LensId::Kantianism).unwrap();
        assert!(view.cards.is_empty());
        assert_eq!(view.article.marked_fragments().count(), 0);
        assert!(!controller.can_recombine());
    }

    #[tokio::test]
    async fn test_comparison_mode_switch_clears_selection() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.select_lens(LensId::Platonism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        assert_eq!(controller.state().active_lens, None);

        controller.set_comparison_mode(false);
        assert!(controller.state().selected.is_empty());
        assert!(!controller.state().comparison_mode);
    }

    #[tokio::test]
    async fn test_recombine_requires_two_selected_lenses() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), Vec::new());
        let err = controller
            .enter_recombine(&mut camera(&probe, false), tracker, options())
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_camera_denial_restores_previous_view() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Platonism).unwrap();

        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), Vec::new());
        let err = controller
            .enter_recombine(&mut camera(&probe, true), tracker, options())
            .unwrap_err();

        assert!(matches!(err, Error::Capture(_)));
        assert_eq!(controller.view(), View::Results);
        assert!(controller.recombine().is_none());
    }

    #[tokio::test]
    async fn test_recombine_lays_out_unique_keywords_and_exit_releases_camera() {
        let mut controller = analyzed(FakeRelay {
            keywords: vec!["자유", "노동"],
            ..FakeRelay::default()
        })
        .await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();

        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), Vec::new());
        let session = controller
            .enter_recombine(&mut camera(&probe, false), tracker, options())
            .unwrap();
        let texts: Vec<&str> = session.board.floating().iter().map(|k| k.text.as_str()).collect();
        assert_eq!(texts, vec!["자유", "노동"]);
        assert_eq!(controller.view(), View::Recombine);

        controller.exit_recombine();
        assert_eq!(probe.stopped(), 1);
        assert_eq!(probe.closed(), 1);
        assert_eq!(controller.view(), View::Results);
    }

    #[tokio::test]
    async fn test_pinch_sorting_feeds_custom_lens_request() {
        let relay = FakeRelay {
            keywords: vec!["자유"],
            ..FakeRelay::default()
        };
        let mut controller = analyzed(relay).await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();

        let layout = BoardLayout::default();
        let start = Point::new(300.0, 500.0);
        let zone = layout.zones.strong.center();
        let frame_at = |p: Point| {
            HandFrame::with_hands(vec![pinching_at(
                p.x / layout.viewport.width,
                p.y / layout.viewport.height,
            )])
        };
        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), vec![frame_at(start), frame_at(zone)]);

        let session = controller
            .enter_recombine(&mut camera(&probe, false), tracker, options())
            .unwrap();
        let id = session.board.floating()[0].id;
        session.board.center_on(id, start);
        let events = session.pump(10);
        assert!(events.iter().any(|e| matches!(
            e,
            GestureEvent::Dropped(outcome) if outcome.zone == DropZone::Strong
        )));

        let view = controller.create_custom_lens().await.unwrap();
        assert_eq!(view.title(), "연결주의");
        assert_eq!(probe.stopped(), 1);

        let request = controller.api.last_custom.lock().unwrap().clone().unwrap();
        assert_eq!(request.strong_keywords, vec!["자유".to_string()]);
        assert!(request.weak_keywords.is_empty());
        assert_eq!(request.news_text, ARTICLE);
        assert!(!controller.state().custom_lens_is_fallback);
    }

    #[tokio::test]
    async fn test_failed_custom_lens_shows_local_card_with_folded_keywords() {
        let mut controller = analyzed(FakeRelay {
            fail_custom: true,
            keywords: vec!["자유", "노동"],
            ..FakeRelay::default()
        })
        .await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();

        let probe = Arc::new(Probe::default());
        let tracker = ScriptedTracker::boxed(probe.clone(), Vec::new());
        let session = controller
            .enter_recombine(&mut camera(&probe, false), tracker, options())
            .unwrap();

        let target = session.board.layout().zones.strong.center();
        let grab = session.board.floating()[0].rect.center();
        session.drag_start(grab).unwrap();
        session.drag_move(target);
        assert_eq!(session.drag_end().unwrap().keyword, "자유");

        let view = controller.create_custom_lens().await.unwrap();
        assert_eq!(view.title(), "키워드 중심주의");
        assert!(controller.state().custom_lens_is_fallback);
        assert_eq!(controller.view(), View::CustomLens);
        assert_eq!(probe.stopped(), 1);

        let CustomLensView::Legacy(card) = view else {
            panic!("expected legacy card");
        };
        assert_eq!(card.strong_keywords, vec!["자유".to_string()]);
        assert_eq!(card.weak_keywords, vec!["노동".to_string()]);

        let article = controller.custom_article().unwrap();
        assert!(article.to_html().contains("highlight strong-philosophy"));
        assert!(controller.share_text().contains("키워드 중심주의"));
    }

    #[tokio::test]
    async fn test_create_custom_lens_outside_recombine_fails() {
        let mut controller = analyzed(FakeRelay::default()).await;
        assert!(controller.create_custom_lens().await.unwrap_err().is_input_error());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut controller = analyzed(FakeRelay::default()).await;
        controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
        controller.reset();
        assert_eq!(controller.view(), View::Input);
        assert!(controller.state().analysis.is_none());
        assert!(controller.state().selected.is_empty());
    }
}
