use serde::{Deserialize, Serialize};

const CHANNEL_MASK: u32 = 0xFF;
const COLOR_MASK: u32 = 0x00FF_FFFF;

/// A 24-bit RGB color, red in the most significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PackedColor(u32);

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor(COLOR_MASK);

    /// Packs three 8-bit channels as `(r << 16) | (g << 8) | b`.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        PackedColor(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & CHANNEL_MASK) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & CHANNEL_MASK) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & CHANNEL_MASK) as u8
    }

    /// Unpacks into `(red, green, blue)`.
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.red(), self.green(), self.blue())
    }
}

impl From<u32> for PackedColor {
    /// Bits above the 24-bit color are dropped.
    fn from(value: u32) -> Self {
        PackedColor(value & COLOR_MASK)
    }
}

impl From<PackedColor> for u32 {
    fn from(color: PackedColor) -> Self {
        color.0
    }
}
