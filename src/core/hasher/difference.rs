//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Resizing the image to 9x8
//! 2. Converting to grayscale
//! 3. Comparing each pixel to the one to its right
//! 4. If the left pixel is at least as bright, set bit to 1, else 0
//!
//! This captures the relative gradient of brightness changes.

use super::fast_resize::FastResizer;
use super::traits::{DifferenceHash, HASH_BITS};
use crate::error::HashError;
use image::DynamicImage;

/// Rows in the comparison grid
const GRID_HEIGHT: u32 = 8;
/// One extra column so each row yields eight comparisons
const GRID_WIDTH: u32 = GRID_HEIGHT + 1;

/// Difference Hash (dHash) hasher
#[derive(Debug, Default, Clone, Copy)]
pub struct DifferenceHasher;

impl DifferenceHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn hash_image(&self, image: &DynamicImage) -> Result<DifferenceHash, HashError> {
        let gray = FastResizer::new().resize_to_grayscale(image, GRID_WIDTH, GRID_HEIGHT)?;

        let mut bits: u64 = 0;
        let mut position = HASH_BITS;

        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH - 1 {
                position -= 1;
                let left = gray.get_pixel(x, y)[0];
                let right = gray.get_pixel(x + 1, y)[0];

                if left >= right {
                    bits |= 1 << position;
                }
            }
        }

        Ok(DifferenceHash::from_bits(bits))
    }
}

/// Compute the 64-bit difference hash of an image
pub fn compute_difference_hash(image: &DynamicImage) -> Result<DifferenceHash, HashError> {
    DifferenceHasher::new().hash_image(image)
}
