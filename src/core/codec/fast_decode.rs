//! Image decoding with format-specific fast paths.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats.
//!
//! Both paths read the header first and refuse oversized images before any
//! pixel buffer is allocated.

use super::DecodeLimits;
use crate::error::CodecError;
use image::{DynamicImage, GrayImage, ImageDecoder, ImageReader, RgbImage, RgbaImage};
use std::fs;
use std::io::{BufRead, Seek};
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Formats the decoder and encoder distinguish by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Other,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            _ => Self::Other,
        }
    }
}

/// Decoder that picks the fastest available path per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image file within `limits`.
    ///
    /// JPEG goes through zune-jpeg and falls back to the image crate if that
    /// fails; everything else goes straight to the image crate. An oversized
    /// header is final and never retried.
    pub fn decode(path: &Path, limits: &DecodeLimits) -> Result<DynamicImage, CodecError> {
        match ImageFormat::from_path(path) {
            ImageFormat::Jpeg => Self::decode_jpeg(path, limits).or_else(|e| match e {
                CodecError::ImageTooLarge { .. } => Err(e),
                _ => Self::decode_fallback(path, limits),
            }),
            _ => Self::decode_fallback(path, limits),
        }
    }

    /// Decode an in-memory image, sniffing the format from its magic bytes.
    ///
    /// `path` only labels errors.
    pub fn decode_reader<R: BufRead + Seek>(
        reader: ImageReader<R>,
        path: &Path,
        limits: &DecodeLimits,
    ) -> Result<DynamicImage, CodecError> {
        let decoder = reader
            .with_guessed_format()
            .map_err(|e| decode_failure(path, e))?
            .into_decoder()
            .map_err(|e| decode_failure(path, e))?;

        let (width, height) = decoder.dimensions();
        limits.check(path, width, height)?;

        DynamicImage::from_decoder(decoder).map_err(|e| decode_failure(path, e))
    }

    fn decode_jpeg(path: &Path, limits: &DecodeLimits) -> Result<DynamicImage, CodecError> {
        let file_bytes = fs::read(path).map_err(|e| CodecError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        decoder
            .decode_headers()
            .map_err(|e| decode_failure(path, format!("zune-jpeg: {:?}", e)))?;
        let info = decoder
            .info()
            .ok_or_else(|| decode_failure(path, "missing JPEG header info"))?;
        let width = info.width as u32;
        let height = info.height as u32;
        limits.check(path, width, height)?;

        let pixels = decoder.decode().map_err(|e| decode_failure(path, format!("zune-jpeg: {:?}", e)))?;

        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
            ColorSpace::RGBA => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
            ColorSpace::Luma => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
            _ => return Self::decode_fallback(path, limits),
        };

        image.ok_or_else(|| decode_failure(path, "decoded buffer does not match the header size"))
    }

    fn decode_fallback(path: &Path, limits: &DecodeLimits) -> Result<DynamicImage, CodecError> {
        let reader = ImageReader::open(path).map_err(|e| decode_failure(path, e))?;
        Self::decode_reader(reader, path, limits)
    }
}

fn decode_failure(path: &Path, reason: impl ToString) -> CodecError {
    CodecError::DecodeFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
