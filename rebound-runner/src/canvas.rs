use glam::Vec2;
use log::{log, log_enabled, Level};
use rebound_core::Canvas;

/// Canvas that "renders" circles as log lines.
#[derive(Debug, Clone, Copy)]
pub struct LogCanvas {
    level: Level,
}

impl LogCanvas {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogCanvas {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl Canvas for LogCanvas {
    fn draw_circle(&mut self, radius: f32, center: Vec2, red: u8, green: u8, blue: u8, filled: bool) {
        if !log_enabled!(self.level) {
            return;
        }
        log!(
            self.level,
            "{} circle r={:.1} at ({:.1}, {:.1}) #{:02x}{:02x}{:02x}",
            if filled { "filled" } else { "outline" },
            radius,
            center.x,
            center.y,
            red,
            green,
            blue
        );
    }
}
