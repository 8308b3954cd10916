//! # Pixel Module
//!
//! Tolerance-based per-pixel comparison.
//!
//! Two predicates are in play, and they intentionally disagree on alpha:
//! - the **overlay** predicate looks at red, green and blue only
//! - the **score** predicate also looks at alpha
//!
//! A pixel whose colour matches but whose transparency changed therefore
//! lowers the similarity score without being highlighted. Keep both as-is;
//! which one is "right" is an open question.
//!
//! Colour channels are compared alpha-premultiplied (see [`sample`]), so
//! fully transparent pixels match regardless of the RGB they hide.
//!
//! ## Parallelism
//! Rows are independent, so whole-image passes split the buffers into row
//! chunks with rayon and sum the per-row counts.

mod sample;
mod tolerance;

pub use sample::{narrow, normalize, premultiplied_narrow, sample, straight_copy, widen, CHANNEL_SHIFT};
pub use tolerance::{Tolerance, DEFAULT_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD};

use crate::error::CompareError;
use image::{DynamicImage, GenericImageView, RgbaImage};
use rayon::prelude::*;

/// Bytes per normalized RGBA pixel
pub(crate) const CHANNELS: usize = 4;

/// Overlay predicate: any of R, G, B differs by at least the tolerance
#[inline]
pub fn rgb_differs(a: &[u8], b: &[u8], tolerance: Tolerance) -> bool {
    (0..3).any(|c| tolerance.is_met_by(a[c].abs_diff(b[c])))
}

/// Score predicate: any of R, G, B, A differs by at least the tolerance
#[inline]
pub fn rgba_differs(a: &[u8], b: &[u8], tolerance: Tolerance) -> bool {
    (0..CHANNELS).any(|c| tolerance.is_met_by(a[c].abs_diff(b[c])))
}

/// Fail unless both images have the same width and height
pub fn ensure_same_bounds(
    first: &DynamicImage,
    second: &DynamicImage,
) -> Result<(u32, u32), CompareError> {
    let (left_width, left_height) = first.dimensions();
    let (right_width, right_height) = second.dimensions();

    if (left_width, left_height) != (right_width, right_height) {
        return Err(CompareError::BoundsMismatch {
            left_width,
            left_height,
            right_width,
            right_height,
        });
    }

    Ok((left_width, left_height))
}

/// `100 * (1 - differing / total)`; an image with no pixels is fully similar
pub fn similarity_percent(differing: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (total - differing.min(total)) as f64 * 100.0 / total as f64
}

/// Outcome of a scoring pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScore {
    pub differing_pixels: u64,
    pub total_pixels: u64,
    pub similarity_percent: f64,
}

impl PixelScore {
    pub fn new(differing_pixels: u64, total_pixels: u64) -> Self {
        Self {
            differing_pixels,
            total_pixels,
            similarity_percent: similarity_percent(differing_pixels, total_pixels),
        }
    }
}

/// Compares images pixel by pixel under a fixed tolerance
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelComparator {
    tolerance: Tolerance,
}

impl PixelComparator {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Overlay predicate at a single coordinate (alpha excluded)
    pub fn pixel_differs(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
        x: u32,
        y: u32,
    ) -> Result<bool, CompareError> {
        let (width, height) = ensure_same_bounds(first, second)?;
        if x >= width || y >= height {
            return Err(CompareError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        Ok(rgb_differs(
            &sample(first, x, y),
            &sample(second, x, y),
            self.tolerance,
        ))
    }

    /// Percentage of pixels that do not differ under the score predicate
    pub fn compute_similarity(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
    ) -> Result<f64, CompareError> {
        Ok(self.score(first, second)?.similarity_percent)
    }

    /// Full scoring pass, with the raw counts
    pub fn score(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
    ) -> Result<PixelScore, CompareError> {
        let (width, height) = ensure_same_bounds(first, second)?;
        let differing = self.count_differing(&normalize(first), &normalize(second));
        Ok(PixelScore::new(differing, width as u64 * height as u64))
    }

    /// Count pixels differing under the score predicate.
    ///
    /// Both buffers must already share dimensions.
    pub fn count_differing(&self, first: &RgbaImage, second: &RgbaImage) -> u64 {
        let row_len = first.width() as usize * CHANNELS;
        if row_len == 0 {
            return 0;
        }

        let tolerance = self.tolerance;
        first
            .as_raw()
            .par_chunks(row_len)
            .zip(second.as_raw().par_chunks(row_len))
            .map(|(row_a, row_b)| {
                row_a
                    .chunks_exact(CHANNELS)
                    .zip(row_b.chunks_exact(CHANNELS))
                    .filter(|(a, b)| rgba_differs(a, b, tolerance))
                    .count() as u64
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(width, height, Rgba(pixel)))
    }

    fn comparator(threshold: i64) -> PixelComparator {
        PixelComparator::new(Tolerance::new(threshold).unwrap())
    }

    fn base_10x10() -> RgbaImage {
        ImageBuffer::from_fn(10, 10, |x, y| {
            Rgba([(x * 20) as u8, (y * 20) as u8, 100, 255])
        })
    }

    #[test]
    fn identical_images_are_fully_similar() {
        let image = DynamicImage::ImageRgba8(base_10x10());
        assert_eq!(comparator(45).compute_similarity(&image, &image).unwrap(), 100.0);
    }

    #[test]
    fn black_and_white_are_fully_different() {
        let black = solid(2, 2, [0, 0, 0, 255]);
        let white = solid(2, 2, [255, 255, 255, 255]);

        let score = comparator(45).score(&black, &white).unwrap();
        assert_eq!(score.differing_pixels, 4);
        assert_eq!(score.similarity_percent, 0.0);
    }

    #[test]
    fn small_delta_under_threshold_is_ignored() {
        let base = base_10x10();
        let mut altered = base.clone();
        let p = altered.get_pixel_mut(4, 4);
        p.0[0] += 9;
        p.0[1] += 9;
        p.0[2] += 9;

        let similarity = comparator(10)
            .compute_similarity(
                &DynamicImage::ImageRgba8(base),
                &DynamicImage::ImageRgba8(altered),
            )
            .unwrap();
        assert_eq!(similarity, 100.0);
    }

    #[test]
    fn large_delta_flags_one_pixel() {
        let base = base_10x10();
        let mut altered = base.clone();
        altered.get_pixel_mut(4, 4).0[2] = 200;

        let first = DynamicImage::ImageRgba8(base);
        let second = DynamicImage::ImageRgba8(altered);
        let cmp = comparator(10);

        assert_eq!(cmp.compute_similarity(&first, &second).unwrap(), 99.0);
        assert!(cmp.pixel_differs(&first, &second, 4, 4).unwrap());
        assert!(!cmp.pixel_differs(&first, &second, 5, 4).unwrap());
    }

    #[test]
    fn alpha_counts_for_score_but_not_overlay() {
        let opaque = solid(1, 1, [10, 20, 30, 255]);
        let clear = solid(1, 1, [10, 20, 30, 0]);
        let cmp = comparator(45);

        assert_eq!(cmp.compute_similarity(&opaque, &clear).unwrap(), 0.0);
        assert!(!cmp.pixel_differs(&opaque, &clear, 0, 0).unwrap());
    }

    #[test]
    fn hidden_colour_under_zero_alpha_is_ignored() {
        let clear_black = solid(2, 2, [0, 0, 0, 0]);
        let clear_white = solid(2, 2, [255, 255, 255, 0]);
        let cmp = comparator(1);

        assert_eq!(cmp.compute_similarity(&clear_black, &clear_white).unwrap(), 100.0);
        assert!(!cmp.pixel_differs(&clear_black, &clear_white, 1, 1).unwrap());
    }

    #[test]
    fn translucent_colour_is_weighed_by_alpha() {
        // 100 apart straight, 39 apart once scaled by alpha 100
        let dark = solid(1, 1, [0, 0, 0, 100]);
        let light = solid(1, 1, [100, 100, 100, 100]);

        assert_eq!(comparator(45).compute_similarity(&dark, &light).unwrap(), 100.0);
        assert_eq!(comparator(30).compute_similarity(&dark, &light).unwrap(), 0.0);
    }

    #[test]
    fn bounds_mismatch_by_one_pixel_fails() {
        let a = solid(10, 10, [0, 0, 0, 255]);
        let wider = solid(11, 10, [0, 0, 0, 255]);
        let taller = solid(10, 11, [0, 0, 0, 255]);
        let cmp = comparator(45);

        assert!(matches!(
            cmp.compute_similarity(&a, &wider),
            Err(CompareError::BoundsMismatch { right_width: 11, .. })
        ));
        assert!(matches!(
            cmp.compute_similarity(&a, &taller),
            Err(CompareError::BoundsMismatch { right_height: 11, .. })
        ));
    }

    #[test]
    fn coordinate_outside_image_is_rejected() {
        let a = solid(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            comparator(45).pixel_differs(&a, &a, 2, 0),
            Err(CompareError::OutOfBounds { x: 2, y: 0, .. })
        ));
    }

    #[test]
    fn raising_threshold_never_lowers_similarity() {
        let first = DynamicImage::ImageRgba8(base_10x10());
        let second = DynamicImage::ImageRgba8(ImageBuffer::from_fn(10, 10, |x, y| {
            Rgba([(x * 23) as u8, (y * 17) as u8, (x * y) as u8, 255])
        }));

        let mut previous = 0.0;
        for threshold in 1..=100 {
            let similarity = comparator(threshold).compute_similarity(&first, &second).unwrap();
            assert!(similarity >= previous, "threshold {} dropped similarity", threshold);
            previous = similarity;
        }
    }

    #[test]
    fn similarity_percent_of_empty_image_is_100() {
        assert_eq!(similarity_percent(0, 0), 100.0);
        assert_eq!(similarity_percent(1, 100), 99.0);
    }
}
