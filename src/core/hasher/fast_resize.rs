//! SIMD-accelerated downsampling to a grayscale grid.
//!
//! Uses fast_image_resize, which picks AVX2/NEON kernels when available.
//! The filter is fixed so the same input always lands on the same grid.

use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};

/// Grayscale resizer with a fixed bilinear filter
pub struct FastResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        }
    }

    /// Convert to luminance and resample to `width` x `height`.
    ///
    /// Sources smaller than the target (down to a single pixel) are
    /// upsampled, which replicates their pixels across the grid.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, HashError> {
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(HashError::EmptyImage {
                width: src_width,
                height: src_height,
            });
        }

        if width == 0 || height == 0 {
            return Err(HashError::ComputationFailed(format!(
                "invalid target grid {}x{}",
                width, height
            )));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| HashError::ComputationFailed(format!("source buffer: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

        GrayImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::ComputationFailed("resized buffer has the wrong length".to_string())
        })
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off resize with a fresh resizer
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 128 / (width + height).max(1)) as u8;
            Rgb([r, g, b])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_hash_grid() {
        let image = create_test_image(200, 100);
        let resized = resize_to_grayscale(&image, 9, 8).unwrap();

        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn single_pixel_is_upsampled() {
        let image = create_test_image(1, 1);
        let resized = resize_to_grayscale(&image, 9, 8).unwrap();

        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn empty_source_is_rejected() {
        let image = DynamicImage::new_rgb8(0, 5);
        let result = resize_to_grayscale(&image, 9, 8);

        assert!(matches!(result, Err(HashError::EmptyImage { width: 0, height: 5 })));
    }

    #[test]
    fn resizer_is_deterministic_across_reuse() {
        let mut resizer = FastResizer::new();
        let image = create_test_image(100, 100);

        let first = resizer.resize_to_grayscale(&image, 9, 8).unwrap();
        let second = resizer.resize_to_grayscale(&image, 9, 8).unwrap();

        assert_eq!(first.as_raw(), second.as_raw());
    }
}
