//! Keyword sorting mini-game: drag floating keywords into the strong or weak
//! zone with a pointer or with a pinch seen by the camera.

pub mod board;
pub mod camera;
pub mod geometry;
pub mod landmarks;
pub mod pointer;
pub mod tracker;

pub use board::{
    BoardLayout, Burst, DropOutcome, DropZone, DropZones, FloatingKeyword, KeywordBoard,
    SortedKeywords, DROP_TOLERANCE, PROXIMITY_BAND,
};
pub use camera::{CaptureConstraints, CaptureDevice, GestureScope, HandTracker, MediaStream};
pub use geometry::{Point, Rect, Size};
pub use landmarks::{HandFrame, HandLandmarks, Landmark, Pinch, PinchDetector};
pub use pointer::PointerDrag;
pub use tracker::{GestureConfig, GestureEvent, GestureTracker};
