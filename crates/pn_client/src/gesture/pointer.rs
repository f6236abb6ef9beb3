use super::board::{DropOutcome, KeywordBoard, DROP_TOLERANCE};
use super::geometry::Point;

#[derive(Debug, Clone, Copy)]
struct Grab {
    id: usize,
    start: Point,
    origin: Point,
}

/// Mouse or touch dragging of floating keywords.
#[derive(Debug, Default)]
pub struct PointerDrag {
    grab: Option<Grab>,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Starts dragging the keyword under `point`; returns its id.
    pub fn down(&mut self, board: &KeywordBoard, point: Point) -> Option<usize> {
        let id = board.keyword_at(point)?;
        let origin = board.get(id)?.rect.origin();
        self.grab = Some(Grab { id, start: point, origin });
        Some(id)
    }

    pub fn move_to(&mut self, board: &mut KeywordBoard, point: Point) {
        if let Some(grab) = self.grab {
            let origin = Point::new(
                grab.origin.x + point.x - grab.start.x,
                grab.origin.y + point.y - grab.start.y,
            );
            board.move_to(grab.id, origin);
        }
    }

    /// Releases the keyword and runs the drop test.
    pub fn up(&mut self, board: &mut KeywordBoard) -> Option<DropOutcome> {
        let grab = self.grab.take()?;
        board.drop_keyword(grab.id, DROP_TOLERANCE)
    }
}
