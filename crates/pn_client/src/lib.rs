//! Interactive client for the lens relay: article analysis, highlighting,
//! comparison and the keyword recombination game.

pub mod api;
pub mod gesture;
pub mod highlight;
pub mod render;
pub mod session;

pub use api::{HttpRelayClient, RelayApi};
pub use highlight::{HighlightedArticle, Highlighter};
pub use render::{CustomLensView, LensCard};
pub use session::{LensController, RecombineOptions, RecombineSession, SessionState, View};

pub mod prelude {
    pub use crate::api::{HttpRelayClient, RelayApi};
    pub use crate::gesture::{BoardLayout, DropZone, GestureEvent, KeywordBoard, Point};
    pub use crate::highlight::{highlight_comparison, highlight_custom, HighlightedArticle, Highlighter};
    pub use crate::render::{share_text, CustomLensView, LensCard};
    pub use crate::session::{LensController, View};
    pub use pn_core::{Error, LensId, Result};
}
