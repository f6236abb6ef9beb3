//! Floating keywords and the two drop zones they are sorted into.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::{debug, info};

use super::geometry::{Point, Rect, Size};

/// Margin around a zone that still counts as a drop.
pub const DROP_TOLERANCE: f64 = 60.0;
/// Margin around a zone that triggers a drop while a keyword is being pinched.
pub const PROXIMITY_BAND: f64 = 50.0;
pub const PARTICLE_COUNT: usize = 12;

const MAX_PLACEMENT_ATTEMPTS: usize = 50;
/// No part of a keyword chip may reach below this percentage of the height.
const ZONE_BAND_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Strong,
    Weak,
}

impl DropZone {
    pub fn label(&self) -> &'static str {
        match self {
            DropZone::Strong => "강하게",
            DropZone::Weak => "약하게",
        }
    }

    /// Particle colour of the drop burst.
    pub fn color(&self) -> &'static str {
        match self {
            DropZone::Strong => "#ff5722",
            DropZone::Weak => "#2196f3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZones {
    pub strong: Rect,
    pub weak: Rect,
}

impl DropZones {
    /// Two side-by-side boxes in the bottom fifth of the viewport.
    pub fn bottom_of(viewport: Size) -> Self {
        let top = viewport.height * 0.82;
        let height = viewport.height * 0.16;
        Self {
            strong: Rect::new(viewport.width * 0.1, top, viewport.width * 0.35, height),
            weak: Rect::new(viewport.width * 0.55, top, viewport.width * 0.35, height),
        }
    }

    /// Zone that `rect` lands in, the strong zone winning ties.
    pub fn hit(&self, rect: &Rect, margin: f64) -> Option<DropZone> {
        if rect.overlaps_with_margin(&self.strong, margin) {
            Some(DropZone::Strong)
        } else if rect.overlaps_with_margin(&self.weak, margin) {
            Some(DropZone::Weak)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub viewport: Size,
    pub zones: DropZones,
    pub chip_height: f64,
    pub char_width: f64,
    pub chip_padding: f64,
}

impl BoardLayout {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            zones: DropZones::bottom_of(viewport),
            chip_height: 40.0,
            char_width: 16.0,
            chip_padding: 32.0,
        }
    }

    pub fn chip_size(&self, text: &str) -> Size {
        Size::new(
            self.chip_padding + self.char_width * text.chars().count() as f64,
            self.chip_height,
        )
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(Size::new(1280.0, 720.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingKeyword {
    pub id: usize,
    pub text: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub dx: f64,
    pub dy: f64,
}

/// Cosmetic particle explosion shown where a keyword was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub origin: Point,
    pub color: &'static str,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub keyword: String,
    pub zone: DropZone,
    pub burst: Burst,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortedKeywords {
    pub strong: Vec<String>,
    pub weak: Vec<String>,
}

/// Keyword sorting state for one recombine session.
///
/// The strong and weak lists never share a keyword, and a keyword leaves
/// the floating set once it is sorted.
#[derive(Debug)]
pub struct KeywordBoard {
    layout: BoardLayout,
    floating: Vec<FloatingKeyword>,
    strong: Vec<String>,
    weak: Vec<String>,
    next_id: usize,
    rng: StdRng,
}

impl KeywordBoard {
    pub fn new(layout: BoardLayout) -> Self {
        Self::with_rng(layout, StdRng::from_entropy())
    }

    pub fn with_rng(layout: BoardLayout, rng: StdRng) -> Self {
        Self {
            layout,
            floating: Vec::new(),
            strong: Vec::new(),
            weak: Vec::new(),
            next_id: 0,
            rng,
        }
    }

    /// Places each distinct keyword at a random spot outside the reserved bands.
    pub fn populate<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            let text: String = keyword.into();
            let text = text.trim().to_string();
            if text.is_empty() || self.contains(&text) {
                continue;
            }
            let size = self.layout.chip_size(&text);
            let origin = self.random_origin(size);
            self.floating.push(FloatingKeyword {
                id: self.next_id,
                text,
                rect: Rect::new(origin.x, origin.y, size.width, size.height),
            });
            self.next_id += 1;
        }
        info!("✨ {} floating keywords placed", self.floating.len());
    }

    fn contains(&self, text: &str) -> bool {
        self.floating.iter().any(|k| k.text == text)
            || self.strong.iter().any(|k| k == text)
            || self.weak.iter().any(|k| k == text)
    }

    /// Random origin in the play area (x 10-90 %, y 20-80 %), redrawn while
    /// the chip would hang into the zone band.
    fn random_origin(&mut self, chip: Size) -> Point {
        let viewport = self.layout.viewport;
        let band_top = viewport.height * ZONE_BAND_PERCENT / 100.0;

        let mut origin = Point::new(0.0, 0.0);
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            origin = viewport.from_percent(self.rng.gen_range(10.0..90.0), self.rng.gen_range(20.0..80.0));
            if origin.y + chip.height <= band_top {
                break;
            }
        }
        origin
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn floating(&self) -> &[FloatingKeyword] {
        &self.floating
    }

    pub fn strong(&self) -> &[String] {
        &self.strong
    }

    pub fn weak(&self) -> &[String] {
        &self.weak
    }

    pub fn get(&self, id: usize) -> Option<&FloatingKeyword> {
        self.floating.iter().find(|k| k.id == id)
    }

    /// Topmost keyword under `point`.
    pub fn keyword_at(&self, point: Point) -> Option<usize> {
        self.floating.iter().rev().find(|k| k.rect.contains(point)).map(|k| k.id)
    }

    /// Keyword whose centre is closest to `point`, if strictly within `radius`.
    pub fn nearest_within(&self, point: Point, radius: f64) -> Option<usize> {
        self.floating
            .iter()
            .map(|k| (k.id, k.rect.center().distance(point)))
            .filter(|(_, distance)| *distance < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn move_to(&mut self, id: usize, origin: Point) {
        if let Some(keyword) = self.floating.iter_mut().find(|k| k.id == id) {
            keyword.rect = keyword.rect.moved_to(origin);
        }
    }

    pub fn center_on(&mut self, id: usize, center: Point) {
        if let Some(keyword) = self.floating.iter_mut().find(|k| k.id == id) {
            keyword.rect = keyword.rect.centered_at(center);
        }
    }

    pub fn zone_near(&self, id: usize, margin: f64) -> Option<DropZone> {
        self.get(id).and_then(|k| self.layout.zones.hit(&k.rect, margin))
    }

    /// Sorts the keyword into the zone its rectangle lands in, if any.
    pub fn drop_keyword(&mut self, id: usize, margin: f64) -> Option<DropOutcome> {
        let zone = self.zone_near(id, margin)?;
        let index = self.floating.iter().position(|k| k.id == id)?;
        let keyword = self.floating.remove(index);
        self.assign(&keyword.text, zone);

        let burst = self.burst(keyword.rect.center(), zone.color());
        info!("📥 '{}' sorted into {}", keyword.text, zone.label());
        Some(DropOutcome {
            keyword: keyword.text,
            zone,
            burst,
        })
    }

    /// Appends `keyword` to `zone`'s list and removes it from the other list.
    pub fn assign(&mut self, keyword: &str, zone: DropZone) {
        let (target, other) = match zone {
            DropZone::Strong => (&mut self.strong, &mut self.weak),
            DropZone::Weak => (&mut self.weak, &mut self.strong),
        };
        other.retain(|k| k != keyword);
        if !target.iter().any(|k| k == keyword) {
            target.push(keyword.to_string());
        }
    }

    fn burst(&mut self, origin: Point, color: &'static str) -> Burst {
        let particles = (0..PARTICLE_COUNT)
            .map(|i| {
                let angle = i as f64 / PARTICLE_COUNT as f64 * 2.0 * PI;
                let distance = 50.0 + self.rng.gen_range(0.0..100.0);
                Particle {
                    dx: angle.cos() * distance,
                    dy: angle.sin() * distance,
                }
            })
            .collect();
        Burst { origin, color, particles }
    }

    /// Ends the session keeping the sorted lists; unsorted keywords join the weak list.
    pub fn finish(mut self) -> SortedKeywords {
        let leftovers: Vec<String> = self.floating.drain(..).map(|k| k.text).collect();
        if !leftovers.is_empty() {
            debug!("Folding {} unsorted keywords into weak", leftovers.len());
        }
        for keyword in leftovers {
            self.assign(&keyword, DropZone::Weak);
        }
        SortedKeywords {
            strong: self.strong,
            weak: self.weak,
        }
    }

    /// Ends the session discarding everything.
    pub fn cancel(&mut self) {
        self.floating.clear();
        self.strong.clear();
        self.weak.clear();
    }
}
