//! # Error Module
//!
//! Error types for image comparison.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - dimensions, paths, offending values
//! - **Deterministic** - the same inputs always reproduce the same error, so nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ImageCompareError {
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Image codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that stop a comparison before any score is produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "Images have different bounds: first is {left_width}x{left_height}, second is {right_width}x{right_height}"
    )]
    BoundsMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    #[error("Invalid threshold: {value} (must be 1-100)")]
    InvalidThreshold { value: i64 },

    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Errors that occur while computing a perceptual hash
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Image is empty ({width}x{height}), nothing to hash")]
    EmptyImage { width: u32, height: u32 },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Errors raised by the caller-side decode/encode collaborator
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("Failed to encode diff image {path}: {reason}")]
    EncodeFailure { path: PathBuf, reason: String },

    #[error("Unsupported output format for {path} (use .png, .jpg or .jpeg)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Image {path} is {width}x{height}, more than the {max_pixels} pixel limit")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("Failed to access image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ImageCompareError>;
