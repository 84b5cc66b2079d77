//! Arena dimensions and the planes derived from them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Read-only source of the arena's full extent. The arena is centered at the origin.
pub trait BoundaryProvider {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
}

/// Fixed-size rectangular arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a circle lies fully inside the arena, allowing `tolerance` of overlap.
    pub fn contains_circle(&self, center: Vec2, radius: f32, tolerance: f32) -> bool {
        let planes = ArenaPlanes::of(self);
        center.x - radius >= planes.left - tolerance
            && center.x + radius <= planes.right + tolerance
            && center.y - radius >= planes.bottom - tolerance
            && center.y + radius <= planes.top + tolerance
    }
}

impl BoundaryProvider for ArenaBounds {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// The four wall planes of an origin-centered arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaPlanes {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl ArenaPlanes {
    pub fn of(bounds: &dyn BoundaryProvider) -> Self {
        let half_width = bounds.width() / 2.0;
        let half_height = bounds.height() / 2.0;
        Self {
            left: -half_width,
            right: half_width,
            bottom: -half_height,
            top: half_height,
        }
    }
}
