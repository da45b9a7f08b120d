//! Star colour palette and hex colour parsing.

use crate::constants::STAR_PALETTE;
use crate::error::{BackdropError, BackdropResult};
use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Parse `#rrggbb` / `rrggbb` into an opaque colour.
pub fn parse_hex_color(value: &str) -> BackdropResult<Color> {
    Srgba::hex(value.trim())
        .map(Color::from)
        .map_err(|_| BackdropError::InvalidColor {
            value: value.to_string(),
        })
}

/// Colours new stars are ignited with.
#[derive(Resource, Debug, Clone)]
pub struct StarPalette(pub Vec<Color>);

impl Default for StarPalette {
    fn default() -> Self {
        Self(
            STAR_PALETTE
                .iter()
                .filter_map(|hex| parse_hex_color(hex).ok())
                .collect(),
        )
    }
}

impl StarPalette {
    /// Build a palette from hex strings.  Any invalid entry rejects the list.
    pub fn from_hex_list(entries: &[String]) -> BackdropResult<Self> {
        if entries.is_empty() {
            return Err(BackdropError::EmptyPalette);
        }
        let colors = entries
            .iter()
            .map(|hex| parse_hex_color(hex))
            .collect::<BackdropResult<Vec<_>>>()?;
        Ok(Self(colors))
    }

    /// Pick a random palette colour; white if the palette is somehow empty.
    pub fn pick(&self, rng: &mut impl Rng) -> Color {
        self.0.choose(rng).copied().unwrap_or(Color::WHITE)
    }
}
