//! Channel sampling on a common 8-bit scale.
//!
//! Colour channels are compared alpha-premultiplied: every sample is widened
//! to 16 bits, scaled by its alpha, then narrowed by dropping its low-order
//! bits. Two fully transparent pixels therefore compare equal whatever RGB
//! they carry, and an 8-bit image and its 16-bit re-encoding compare equal.

use image::{DynamicImage, GenericImageView, Pixel, Rgba, RgbaImage};

/// Low-order bits discarded from a 16-bit channel before differencing.
///
/// Changing this changes what every threshold means.
pub const CHANNEL_SHIFT: u32 = 8;

/// Narrow a 16-bit channel sample to 8 bits
#[inline]
pub fn narrow(sample: u16) -> u8 {
    (sample >> CHANNEL_SHIFT) as u8
}

/// Widen an 8-bit channel sample to 16 bits (`0xAB` becomes `0xABAB`)
#[inline]
pub fn widen(sample: u8) -> u16 {
    ((sample as u16) << 8) | sample as u16
}

/// Scale R, G, B by alpha on the 16-bit scale, then narrow all four
#[inline]
pub fn premultiplied_narrow(wide: [u16; 4]) -> [u8; 4] {
    let alpha = wide[3] as u32;
    let scale = |c: u16| narrow((c as u32 * alpha / u16::MAX as u32) as u16);
    [scale(wide[0]), scale(wide[1]), scale(wide[2]), narrow(wide[3])]
}

/// Premultiplied RGBA samples of one coordinate on the 8-bit scale.
///
/// Panics if `(x, y)` is outside the image, like `GenericImageView::get_pixel`.
pub fn sample(image: &DynamicImage, x: u32, y: u32) -> [u8; 4] {
    let wide = match image {
        DynamicImage::ImageLuma16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
        DynamicImage::ImageLumaA16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
        DynamicImage::ImageRgb16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
        DynamicImage::ImageRgba16(buffer) => buffer.get_pixel(x, y).0,
        other => other.get_pixel(x, y).0.map(widen),
    };
    premultiplied_narrow(wide)
}

/// Whole image as a premultiplied 8-bit RGBA buffer, built the same way as [`sample`]
pub fn normalize(image: &DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(buffer) => premultiply_buffer(buffer.width(), buffer.height(), |x, y| {
            buffer.get_pixel(x, y).0.map(widen)
        }),
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            let wide = image.to_rgba16();
            premultiply_buffer(wide.width(), wide.height(), |x, y| wide.get_pixel(x, y).0)
        }
        other => {
            let rgba = other.to_rgba8();
            premultiply_buffer(rgba.width(), rgba.height(), |x, y| rgba.get_pixel(x, y).0.map(widen))
        }
    }
}

/// Whole image as a straight (not premultiplied) 8-bit RGBA buffer.
///
/// Wide channels are narrowed by the same shift as [`normalize`], so the
/// overlay base keeps each pixel's own colour.
pub fn straight_copy(image: &DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            let wide = image.to_rgba16();
            RgbaImage::from_fn(wide.width(), wide.height(), |x, y| {
                Rgba(wide.get_pixel(x, y).0.map(narrow))
            })
        }
        other => other.to_rgba8(),
    }
}

fn premultiply_buffer(width: u32, height: u32, wide_at: impl Fn(u32, u32) -> [u16; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba(premultiplied_narrow(wide_at(x, y))))
}
