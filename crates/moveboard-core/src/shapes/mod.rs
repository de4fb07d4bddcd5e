//! Rectangle records and the fixed color palette.

mod rectangle;

pub use rectangle::{Geometry, MIN_SIZE, RectId, Rectangle};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fill color tag drawn from a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
}

impl Color {
    /// Every palette entry, in display order.
    pub const PALETTE: [Color; 5] = [
        Color::Red,
        Color::Blue,
        Color::Yellow,
        Color::Green,
        Color::Purple,
    ];

    /// Pick a palette entry uniformly at random.
    pub fn random() -> Self {
        Self::random_with(&mut rand::rng())
    }

    /// Pick a palette entry using the given generator.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }

    /// CSS-style name of the color.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Purple => "purple",
        }
    }

    /// RGBA8 components matching the CSS named color.
    pub fn to_rgba8(self) -> [u8; 4] {
        match self {
            Color::Red => [255, 0, 0, 255],
            Color::Blue => [0, 0, 255, 255],
            Color::Yellow => [255, 255, 0, 255],
            Color::Green => [0, 128, 0, 255],
            Color::Purple => [128, 0, 128, 255],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        peniko::Color::from_rgba8(r, g, b, a)
    }
}
