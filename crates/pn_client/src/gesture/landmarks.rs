//! Hand landmarks as delivered by the tracking model, and pinch detection.

use pn_core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::geometry::Point;

pub const LANDMARK_COUNT: usize = 21;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
/// Hands considered per frame.
pub const MAX_HANDS: usize = 2;

pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.06;

/// One keypoint in normalized camera coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.points[THUMB_TIP]
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[INDEX_TIP]
    }

    /// The camera image is shown as a mirror, so `x` flips before any hit test.
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for point in points.iter_mut() {
            point.x = 1.0 - point.x;
        }
        Self { points }
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        let count = points.len();
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            Error::InvalidInput(format!(
                "A hand needs {} landmarks, got {}",
                LANDMARK_COUNT, count
            ))
        })?;
        Ok(Self { points })
    }
}

impl From<HandLandmarks> for Vec<Landmark> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.to_vec()
    }
}

/// Every hand detected in one camera frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandFrame {
    pub hands: Vec<HandLandmarks>,
}

impl HandFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hands(hands: Vec<HandLandmarks>) -> Self {
        Self { hands }
    }

    pub fn hands(&self) -> impl Iterator<Item = &HandLandmarks> {
        self.hands.iter().take(MAX_HANDS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    pub is_pinching: bool,
    /// Thumb-to-index distance in normalized units.
    pub distance: f64,
    /// Mirrored midpoint of the two fingertips, normalized.
    pub center: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDetector {
    pub threshold: f64,
}

impl Default for PinchDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PINCH_THRESHOLD,
        }
    }
}

impl PinchDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn detect(&self, hand: &HandLandmarks) -> Pinch {
        let hand = hand.mirrored();
        let thumb = Point::new(hand.thumb_tip().x, hand.thumb_tip().y);
        let index = Point::new(hand.index_tip().x, hand.index_tip().y);
        let distance = thumb.distance(index);
        Pinch {
            is_pinching: distance < self.threshold,
            distance,
            center: thumb.midpoint(index),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// An open hand with the thumb and index tips at the given positions.
    pub fn hand_with_tips(thumb: (f64, f64), index: (f64, f64)) -> HandLandmarks {
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        points[THUMB_TIP] = Landmark::new(thumb.0, thumb.1);
        points[INDEX_TIP] = Landmark::new(index.0, index.1);
        HandLandmarks::new(points)
    }

    /// A hand pinching at the given on-screen (already mirrored) position.
    pub fn pinching_at(x: f64, y: f64) -> HandLandmarks {
        let raw_x = 1.0 - x;
        hand_with_tips((raw_x - 0.01, y), (raw_x + 0.01, y))
    }

    pub fn open_at(x: f64, y: f64) -> HandLandmarks {
        let raw_x = 1.0 - x;
        hand_with_tips((raw_x - 0.1, y), (raw_x + 0.1, y))
    }
}
