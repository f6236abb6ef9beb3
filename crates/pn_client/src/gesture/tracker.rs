//! Frame-by-frame pinch dragging driven by hand landmarks.

use tracing::debug;

use super::board::{DropOutcome, DropZone, KeywordBoard, DROP_TOLERANCE, PROXIMITY_BAND};
use super::geometry::Point;
use super::landmarks::{HandFrame, Pinch, PinchDetector, DEFAULT_PINCH_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Normalized thumb-to-index distance below which a hand pinches.
    pub pinch_threshold: f64,
    /// Pixel radius around the pinch point in which a keyword can be grabbed.
    pub grab_radius: f64,
    /// Fraction of the remaining distance a held keyword moves each frame.
    pub lerp_factor: f64,
    pub drop_tolerance: f64,
    pub proximity_band: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            grab_radius: 100.0,
            lerp_factor: 0.8,
            drop_tolerance: DROP_TOLERANCE,
            proximity_band: PROXIMITY_BAND,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    HandsChanged(usize),
    Grabbed { id: usize, keyword: String },
    Moved { id: usize, center: Point },
    /// The held keyword entered or left a zone's proximity band.
    ZoneHover(Option<DropZone>),
    Dropped(DropOutcome),
    /// The keyword was let go outside every zone.
    Released { id: usize },
}

/// Pinch state carried from one frame to the next.
#[derive(Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    detector: PinchDetector,
    target: Option<usize>,
    hover: Option<DropZone>,
    hands_seen: usize,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            detector: PinchDetector::new(config.pinch_threshold),
            config,
            target: None,
            hover: None,
            hands_seen: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Id of the keyword currently held by a pinch.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn status(&self) -> String {
        if self.hands_seen == 0 {
            "손을 카메라 앞에 대세요".to_string()
        } else {
            format!(
                "손 {}개 감지됨 - 핀치 제스처로 키워드를 드래그하세요",
                self.hands_seen
            )
        }
    }

    /// Processes every frame in order.
    pub fn run<I>(&mut self, board: &mut KeywordBoard, frames: I) -> Vec<GestureEvent>
    where
        I: IntoIterator<Item = HandFrame>,
    {
        let mut events = Vec::new();
        for frame in frames {
            events.extend(self.step(board, &frame));
        }
        events
    }

    /// Processes one frame. The first pinching hand drives the drag; no
    /// pinching hand, including no hand at all, releases the held keyword.
    pub fn step(&mut self, board: &mut KeywordBoard, frame: &HandFrame) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        let hands = frame.hands().count();
        if hands != self.hands_seen {
            self.hands_seen = hands;
            events.push(GestureEvent::HandsChanged(hands));
        }

        let pinch = frame
            .hands()
            .map(|hand| self.detector.detect(hand))
            .find(|pinch| pinch.is_pinching);

        match pinch {
            Some(pinch) => self.follow(board, pinch, &mut events),
            None => self.release(board, &mut events),
        }
        events
    }

    fn follow(&mut self, board: &mut KeywordBoard, pinch: Pinch, events: &mut Vec<GestureEvent>) {
        let center = board.layout().viewport.from_normalized(pinch.center);

        if self.target.is_none() {
            if let Some(id) = board.nearest_within(center, self.config.grab_radius) {
                let keyword = board.get(id).map(|k| k.text.clone()).unwrap_or_default();
                debug!("Pinch grabbed '{}'", keyword);
                self.target = Some(id);
                events.push(GestureEvent::Grabbed { id, keyword });
            }
        }

        let Some(id) = self.target else {
            return;
        };
        let Some(current) = board.get(id).map(|k| k.rect.center()) else {
            self.target = None;
            return;
        };

        let next = current.lerp(center, self.config.lerp_factor);
        board.center_on(id, next);
        events.push(GestureEvent::Moved { id, center: next });

        let near = board.zone_near(id, self.config.proximity_band);
        self.set_hover(near, events);
        if near.is_some() {
            self.release(board, events);
        }
    }

    fn release(&mut self, board: &mut KeywordBoard, events: &mut Vec<GestureEvent>) {
        if let Some(id) = self.target.take() {
            match board.drop_keyword(id, self.config.drop_tolerance) {
                Some(outcome) => events.push(GestureEvent::Dropped(outcome)),
                None => events.push(GestureEvent::Released { id }),
            }
        }
        self.set_hover(None, events);
    }

    fn set_hover(&mut self, zone: Option<DropZone>, events: &mut Vec<GestureEvent>) {
        if self.hover != zone {
            self.hover = zone;
            events.push(GestureEvent::ZoneHover(zone));
        }
    }
}
