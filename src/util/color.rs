use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const DARK_GRAY: Color = Color::new(64, 64, 64);
    pub const LIGHT_GRAY: Color = Color::new(192, 192, 192);
    /// Default color of collectible cells
    pub const CELL: Color = Color::new(90, 200, 120);
    /// Default color of the player
    pub const PLAYER: Color = Color::new(60, 140, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Random color, kept away from the darkest shades so it stays visible on a dark background
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(64..=255),
            g: rng.gen_range(64..=255),
            b: rng.gen_range(64..=255),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
