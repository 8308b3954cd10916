//! Comparison execution.

use crate::core::comparator::{hamming_distance, similarity_from_hash, MatchType};
use crate::core::hasher::{DifferenceHash, DifferenceHasher};
use crate::core::overlay::{DiffRenderer, HighlightColor};
use crate::core::pixel::{ensure_same_bounds, PixelScore, Tolerance};
use crate::error::{CompareError, ImageCompareError};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Result of comparing two images
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// dHash of the first image
    pub first_hash: DifferenceHash,
    /// dHash of the second image
    pub second_hash: DifferenceHash,
    /// Differing hash bits, 0-64
    pub hamming_distance: u32,
    /// Hash similarity as a percentage (0-100)
    pub hash_similarity_percent: f64,
    /// Classification of the hash distance
    pub match_type: MatchType,
    /// Pixel similarity as a percentage (0-100)
    pub pixel_similarity_percent: f64,
    /// Pixels failing the score predicate
    pub differing_pixels: u64,
    /// Width x height of either input
    pub total_pixels: u64,
    /// Tolerance the pixel pass ran with
    pub threshold_used: u8,
    /// Present exactly when `pixel_similarity_percent < 100`
    pub diff_image: Option<RgbaImage>,
}

impl ComparisonResult {
    /// True when no pixel differs under the tolerance
    pub fn is_identical(&self) -> bool {
        self.diff_image.is_none()
    }
}

/// Comparison settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Per-channel tolerance, 1-100. `None` means 45.
    pub threshold: Option<i64>,
    /// Colour painted over differing pixels
    pub highlight: HighlightColor,
}

/// Builder for a [`Comparison`]
#[derive(Debug, Clone, Default)]
pub struct ComparisonBuilder {
    config: ComparisonConfig,
}

impl ComparisonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerance threshold (validated by `build`)
    pub fn threshold(mut self, threshold: i64) -> Self {
        self.config.threshold = Some(threshold);
        self
    }

    /// Set the highlight colour for the overlay
    pub fn highlight(mut self, highlight: HighlightColor) -> Self {
        self.config.highlight = highlight;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ComparisonConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the threshold and build the comparison
    pub fn build(self) -> Result<Comparison, CompareError> {
        let tolerance = Tolerance::from_option(self.config.threshold).inspect_err(|e| {
            warn!(error = %e, "rejected threshold");
        })?;

        Ok(Comparison {
            tolerance,
            hasher: DifferenceHasher::new(),
            renderer: DiffRenderer::new(self.config.highlight),
        })
    }
}

/// A validated, reusable comparison. Holds no per-request state.
#[derive(Debug, Clone, Copy)]
pub struct Comparison {
    tolerance: Tolerance,
    hasher: DifferenceHasher,
    renderer: DiffRenderer,
}

impl Comparison {
    /// Create a new comparison builder
    pub fn builder() -> ComparisonBuilder {
        ComparisonBuilder::new()
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Hash both images, score their pixels and, if anything differs, build the overlay
    #[instrument(skip_all, fields(threshold = %self.tolerance))]
    pub fn compare(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
    ) -> Result<ComparisonResult, ImageCompareError> {
        let (width, height) = ensure_same_bounds(first, second).inspect_err(|e| {
            warn!(error = %e, "refusing to compare");
        })?;
        if width == 0 || height == 0 {
            return Err(CompareError::EmptyImage { width, height }.into());
        }

        let first_hash = self.hasher.hash_image(first)?;
        let second_hash = self.hasher.hash_image(second)?;
        let distance = hamming_distance(&first_hash, &second_hash);
        let hash_similarity = similarity_from_hash(&first_hash, &second_hash);
        debug!(
            first = %first_hash,
            second = %second_hash,
            distance,
            hash_similarity,
            "difference hashes"
        );

        let pass = self.renderer.render_and_score(first, second, self.tolerance)?;
        let PixelScore {
            differing_pixels,
            total_pixels,
            similarity_percent,
        } = pass.score;
        debug!(
            differing_pixels,
            highlighted_pixels = pass.highlighted_pixels,
            total_pixels,
            "pixel pass"
        );

        let diff_image = (similarity_percent < 100.0).then_some(pass.overlay);

        info!(
            width,
            height,
            distance,
            pixel_similarity = similarity_percent,
            overlay = diff_image.is_some(),
            "images compared"
        );

        Ok(ComparisonResult {
            first_hash,
            second_hash,
            hamming_distance: distance,
            hash_similarity_percent: hash_similarity,
            match_type: MatchType::from_distance(distance),
            pixel_similarity_percent: similarity_percent,
            differing_pixels,
            total_pixels,
            threshold_used: self.tolerance.value(),
            diff_image,
        })
    }
}

/// One-shot comparison with the default highlight colour
pub fn compare(
    first: &DynamicImage,
    second: &DynamicImage,
    threshold: Option<i64>,
) -> Result<ComparisonResult, ImageCompareError> {
    let comparison = Comparison::builder()
        .config(ComparisonConfig {
            threshold,
            ..ComparisonConfig::default()
        })
        .build()?;
    comparison.compare(first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(width, height, Rgba(pixel)))
    }

    fn gradient_10x10() -> RgbaImage {
        ImageBuffer::from_fn(10, 10, |x, y| {
            Rgba([(x * 25) as u8, (y * 25) as u8, 128, 255])
        })
    }

    #[test]
    fn identical_solid_images() {
        let a = solid(4, 4, [30, 60, 90, 255]);
        let b = solid(4, 4, [30, 60, 90, 255]);

        let result = compare(&a, &b, Some(45)).unwrap();

        assert_eq!(result.hamming_distance, 0);
        assert_eq!(result.hash_similarity_percent, 100.0);
        assert_eq!(result.pixel_similarity_percent, 100.0);
        assert_eq!(result.match_type, MatchType::Exact);
        assert!(result.diff_image.is_none());
        assert!(result.is_identical());
    }

    #[test]
    fn black_versus_white() {
        let black = solid(2, 2, [0, 0, 0, 255]);
        let white = solid(2, 2, [255, 255, 255, 255]);

        let result = compare(&black, &white, Some(45)).unwrap();

        assert_eq!(result.differing_pixels, 4);
        assert_eq!(result.pixel_similarity_percent, 0.0);
        let overlay = result.diff_image.unwrap();
        assert!(overlay.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn small_change_under_threshold() {
        let base = gradient_10x10();
        let mut altered = base.clone();
        let pixel = altered.get_pixel_mut(5, 5);
        for c in 0..3 {
            pixel.0[c] += 5;
        }

        let result = compare(
            &DynamicImage::ImageRgba8(base),
            &DynamicImage::ImageRgba8(altered),
            Some(10),
        )
        .unwrap();

        assert_eq!(result.pixel_similarity_percent, 100.0);
        assert!(result.diff_image.is_none());
    }

    #[test]
    fn large_change_flags_exactly_one_pixel() {
        let base = gradient_10x10();
        let mut altered = base.clone();
        altered.put_pixel(5, 5, Rgba([0, 0, 0, 255]));

        let result = compare(
            &DynamicImage::ImageRgba8(base),
            &DynamicImage::ImageRgba8(altered),
            Some(10),
        )
        .unwrap();

        assert_eq!(result.differing_pixels, 1);
        assert_eq!(result.pixel_similarity_percent, 99.0);
        let overlay = result.diff_image.unwrap();
        assert_eq!(overlay.dimensions(), (10, 10));
        assert_eq!(*overlay.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn threshold_defaults_to_45() {
        let a = solid(3, 3, [0, 0, 0, 255]);
        let result = compare(&a, &a, None).unwrap();
        assert_eq!(result.threshold_used, 45);
    }

    #[test]
    fn invalid_threshold_is_rejected_before_work() {
        // Mismatched bounds would also fail; the threshold must be reported first.
        let a = solid(3, 3, [0, 0, 0, 255]);
        let b = solid(4, 3, [0, 0, 0, 255]);

        for value in [0, 101] {
            let err = compare(&a, &b, Some(value)).unwrap_err();
            assert!(matches!(
                err,
                ImageCompareError::Compare(CompareError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn mismatched_bounds_are_fatal() {
        let a = solid(10, 10, [0, 0, 0, 255]);
        let b = solid(10, 9, [0, 0, 0, 255]);

        let err = compare(&a, &b, None).unwrap_err();
        assert!(matches!(
            err,
            ImageCompareError::Compare(CompareError::BoundsMismatch { .. })
        ));
    }

    #[test]
    fn empty_images_are_rejected() {
        let a = DynamicImage::new_rgba8(0, 0);
        let err = compare(&a, &a, None).unwrap_err();
        assert!(matches!(
            err,
            ImageCompareError::Compare(CompareError::EmptyImage { .. })
        ));
    }

    #[test]
    fn alpha_only_change_still_yields_overlay() {
        let opaque = solid(2, 2, [10, 10, 10, 255]);
        let clear = solid(2, 2, [10, 10, 10, 0]);

        let result = compare(&opaque, &clear, None).unwrap();

        assert_eq!(result.pixel_similarity_percent, 0.0);
        assert_eq!(result.diff_image.unwrap(), opaque.to_rgba8());
    }

    #[test]
    fn fully_transparent_images_match_whatever_colour_they_hide() {
        let clear_black = solid(2, 2, [0, 0, 0, 0]);
        let clear_white = solid(2, 2, [255, 255, 255, 0]);

        let result = compare(&clear_black, &clear_white, None).unwrap();

        assert_eq!(result.pixel_similarity_percent, 100.0);
        assert_eq!(result.differing_pixels, 0);
        assert!(result.diff_image.is_none());
    }

    #[test]
    fn builder_applies_highlight() {
        let comparison = Comparison::builder()
            .threshold(20)
            .highlight(HighlightColor::new(0, 0, 255))
            .build()
            .unwrap();
        let black = solid(1, 1, [0, 0, 0, 255]);
        let white = solid(1, 1, [255, 255, 255, 255]);

        let result = comparison.compare(&black, &white).unwrap();

        assert_eq!(comparison.tolerance().value(), 20);
        assert_eq!(*result.diff_image.unwrap().get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config: ComparisonConfig = serde_json::from_str(r#"{"threshold": 12}"#).unwrap();
        assert_eq!(config.threshold, Some(12));
        assert_eq!(config.highlight, HighlightColor::RED);
    }
}
