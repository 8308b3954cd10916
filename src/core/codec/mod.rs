//! # Codec Module
//!
//! The decode/encode collaborator around the comparison core. The core only
//! ever sees decoded images; reading uploads and writing the overlay happen
//! here, on the caller's side.
//!
//! - Inputs are bounded by [`DecodeLimits`] so a huge upload cannot turn into
//!   unbounded pixel work.
//! - The overlay is written through a file handle scoped to one call; nothing
//!   is written to a fixed process-wide location.

mod fast_decode;

pub use fast_decode::{FastDecoder, ImageFormat};

use crate::error::CodecError;
use image::buffer::ConvertBuffer;
use image::{DynamicImage, ImageReader, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default ceiling on decoded pixels (64 megapixels)
pub const DEFAULT_MAX_PIXELS: u64 = 64_000_000;

/// Bounds applied to every decoded input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeLimits {
    pub max_pixels: u64,
}

impl DecodeLimits {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Refuse `width x height` when it exceeds the pixel ceiling
    pub fn check(&self, path: &Path, width: u32, height: u32) -> Result<(), CodecError> {
        if width as u64 * height as u64 > self.max_pixels {
            return Err(CodecError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_pixels: self.max_pixels,
            });
        }
        Ok(())
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PIXELS)
    }
}

/// Decode an image file, refusing it from its header when it exceeds the limits
pub fn decode_file(path: &Path, limits: &DecodeLimits) -> Result<DynamicImage, CodecError> {
    let image = FastDecoder::decode(path, limits)?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "decoded");
    Ok(image)
}

/// Decode an in-memory upload; `name` is only used in error messages
pub fn decode_bytes(
    bytes: &[u8],
    name: &str,
    limits: &DecodeLimits,
) -> Result<DynamicImage, CodecError> {
    let path = PathBuf::from(name);
    FastDecoder::decode_reader(ImageReader::new(Cursor::new(bytes)), &path, limits)
}

/// Output format for `path`, or `UnsupportedFormat` if the overlay cannot be written there.
///
/// Cheap enough to call before any decoding so a bad output name fails fast.
pub fn ensure_encodable(path: &Path) -> Result<ImageFormat, CodecError> {
    match ImageFormat::from_path(path) {
        ImageFormat::Other => Err(CodecError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
        format => Ok(format),
    }
}

/// Write an overlay to `path`, picking PNG or JPEG from the extension.
///
/// JPEG has no alpha channel, so the overlay is flattened to RGB first.
pub fn save_overlay(overlay: &RgbaImage, path: &Path) -> Result<(), CodecError> {
    let format = ensure_encodable(path)?;

    let file = File::create(path).map_err(|e| CodecError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        ImageFormat::Jpeg => {
            let rgb: RgbImage = overlay.convert();
            rgb.write_to(&mut writer, image::ImageFormat::Jpeg)
        }
        _ => overlay.write_to(&mut writer, image::ImageFormat::Png),
    };
    encoded.map_err(|e| encode_failure(path, e))?;
    writer.flush().map_err(|e| encode_failure(path, e))?;

    debug!(path = %path.display(), "overlay written");
    Ok(())
}

/// Encode an overlay as PNG bytes, for callers that stream it themselves
pub fn encode_png(overlay: &RgbaImage) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Cursor::new(Vec::new());
    overlay
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| encode_failure(Path::new("<memory>"), e))?;
    Ok(buffer.into_inner())
}

fn encode_failure(path: &Path, reason: impl ToString) -> CodecError {
    CodecError::EncodeFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
