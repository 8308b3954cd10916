//! # Overlay Module
//!
//! Renders the diff overlay: a copy of the first image with every pixel that
//! fails the RGB predicate painted in a solid highlight colour.
//!
//! The overlay base keeps the first image's straight colour, even though
//! the predicates see premultiplied samples.
//!
//! Each output row depends only on the same row of both inputs, so rows are
//! painted in parallel straight into disjoint slices of the output buffer.

use crate::core::pixel::{
    self, ensure_same_bounds, normalize, straight_copy, PixelScore, Tolerance, CHANNELS,
};
use crate::error::CompareError;
use image::{DynamicImage, Rgba, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque colour used to paint differing pixels. Defaults to pure red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl HighlightColor {
    pub const RED: Self = Self::new(255, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, u8::MAX])
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self::RED
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for HighlightColor {
    type Err = String;

    /// Parse `rrggbb`, with or without a leading `#`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected a colour like ff0000, got '{}'", s));
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Overlay plus the counts gathered while painting it
#[derive(Debug, Clone)]
pub struct DiffPass {
    pub overlay: RgbaImage,
    /// Pixels failing the score predicate (alpha included)
    pub score: PixelScore,
    /// Pixels painted with the highlight colour (alpha excluded)
    pub highlighted_pixels: u64,
}

/// Builds diff overlays
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffRenderer {
    highlight: HighlightColor,
}

impl DiffRenderer {
    pub fn new(highlight: HighlightColor) -> Self {
        Self { highlight }
    }

    pub fn highlight(&self) -> HighlightColor {
        self.highlight
    }

    /// Copy of `first` with differing pixels highlighted
    pub fn render_diff_overlay(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
        tolerance: Tolerance,
    ) -> Result<RgbaImage, CompareError> {
        Ok(self.render_and_score(first, second, tolerance)?.overlay)
    }

    /// Paint the overlay and score the pair in a single pass over the pixels
    pub fn render_and_score(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
        tolerance: Tolerance,
    ) -> Result<DiffPass, CompareError> {
        let (width, height) = ensure_same_bounds(first, second)?;
        let left = normalize(first);
        let right = normalize(second);
        let mut overlay = straight_copy(first);

        let row_len = width as usize * CHANNELS;
        let highlight = self.highlight.to_rgba().0;

        let (differing, highlighted) = if row_len == 0 {
            (0, 0)
        } else {
            overlay
                .par_chunks_mut(row_len)
                .zip(left.as_raw().par_chunks(row_len))
                .zip(right.as_raw().par_chunks(row_len))
                .map(|((out, row_a), row_b)| paint_row(out, row_a, row_b, tolerance, &highlight))
                .reduce(|| (0, 0), |x, y| (x.0 + y.0, x.1 + y.1))
        };

        Ok(DiffPass {
            overlay,
            score: PixelScore::new(differing, width as u64 * height as u64),
            highlighted_pixels: highlighted,
        })
    }
}

/// Returns (score-differing, highlighted) counts for one row
fn paint_row(
    out: &mut [u8],
    row_a: &[u8],
    row_b: &[u8],
    tolerance: Tolerance,
    highlight: &[u8; CHANNELS],
) -> (u64, u64) {
    let mut differing = 0;
    let mut highlighted = 0;

    for ((px, a), b) in out
        .chunks_exact_mut(CHANNELS)
        .zip(row_a.chunks_exact(CHANNELS))
        .zip(row_b.chunks_exact(CHANNELS))
    {
        if pixel::rgba_differs(a, b, tolerance) {
            differing += 1;
        }
        if pixel::rgb_differs(a, b, tolerance) {
            px.copy_from_slice(highlight);
            highlighted += 1;
        }
    }

    (differing, highlighted)
}
