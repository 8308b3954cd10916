//! # Reporter Module
//!
//! Turns a [`ComparisonResult`] into something a caller can print or
//! serialize.
//!
//! ## Report Contents
//! 1. **Summary**: "Images are 99.00% identical pixel-for-pixel"
//! 2. **Hash**: both dHashes, Hamming distance, hash similarity
//! 3. **Pixels**: similarity, differing pixel count, threshold used
//! 4. **Overlay**: where the diff image went, that there was none, or why
//!    saving it failed
//!
//! A failed overlay save never costs the caller the numbers: see
//! [`save_and_report`].

use crate::core::codec;
use crate::core::comparator::MatchType;
use crate::core::hasher::HASH_BITS;
use crate::core::pipeline::ComparisonResult;
use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// What happened to the diff overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiffImageStatus {
    /// No pixel differed, so no overlay was produced
    Identical,
    /// Overlay written to this path
    Written { path: PathBuf },
    /// Overlay produced but the caller chose not to keep it
    Discarded,
    /// Overlay produced but writing it to `path` failed
    Failed { path: PathBuf, reason: String },
}

/// Hash half of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashSection {
    /// dHash of the first image (hex)
    pub first: String,
    /// dHash of the second image (hex)
    pub second: String,
    pub hamming_distance: u32,
    pub total_bits: u32,
    pub similarity_percent: f64,
    pub match_type: MatchType,
}

/// Pixel half of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelSection {
    pub similarity_percent: f64,
    /// `similarity_percent` with two decimals, for display
    pub similarity_display: String,
    pub differing_pixels: u64,
    pub total_pixels: u64,
    pub threshold_used: u8,
}

/// Serializable report of one comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summary: String,
    pub hash: HashSection,
    pub pixels: PixelSection,
    pub diff_image: DiffImageStatus,
}

impl ComparisonReport {
    /// Build a report.
    ///
    /// `overlay_path` is where the caller persisted the overlay, if it did.
    pub fn new(result: &ComparisonResult, overlay_path: Option<PathBuf>) -> Self {
        let diff_image = match (&result.diff_image, overlay_path) {
            (None, _) => DiffImageStatus::Identical,
            (Some(_), Some(path)) => DiffImageStatus::Written { path },
            (Some(_), None) => DiffImageStatus::Discarded,
        };
        Self::with_status(result, diff_image)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn with_status(result: &ComparisonResult, diff_image: DiffImageStatus) -> Self {
        Self {
            summary: summarize(result),
            hash: HashSection {
                first: result.first_hash.to_hex(),
                second: result.second_hash.to_hex(),
                hamming_distance: result.hamming_distance,
                total_bits: HASH_BITS,
                similarity_percent: result.hash_similarity_percent,
                match_type: result.match_type,
            },
            pixels: PixelSection {
                similarity_percent: result.pixel_similarity_percent,
                similarity_display: format!("{:.2}", result.pixel_similarity_percent),
                differing_pixels: result.differing_pixels,
                total_pixels: result.total_pixels,
                threshold_used: result.threshold_used,
            },
            diff_image,
        }
    }
}

/// Save the overlay to `overlay_path` (when there is one to save) and report.
///
/// The report is always complete. If the save fails its status is
/// [`DiffImageStatus::Failed`] and the error is returned next to it, so the
/// caller can show the numbers first and then fail.
pub fn save_and_report(
    result: &ComparisonResult,
    overlay_path: Option<PathBuf>,
) -> (ComparisonReport, Option<CodecError>) {
    let (overlay, path) = match (&result.diff_image, overlay_path) {
        (Some(overlay), Some(path)) => (overlay, path),
        (_, path) => return (ComparisonReport::new(result, path), None),
    };

    match codec::save_overlay(overlay, &path) {
        Ok(()) => (ComparisonReport::new(result, Some(path)), None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "diff overlay not saved");
            let status = DiffImageStatus::Failed {
                path,
                reason: e.to_string(),
            };
            (ComparisonReport::with_status(result, status), Some(e))
        }
    }
}

fn summarize(result: &ComparisonResult) -> String {
    if result.is_identical() {
        format!(
            "Images are identical within a tolerance of {} ({})",
            result.threshold_used, result.match_type
        )
    } else {
        format!(
            "Images are {:.2}% identical pixel-for-pixel; {} of {} pixels differ ({})",
            result.pixel_similarity_percent,
            result.differing_pixels,
            result.total_pixels,
            result.match_type
        )
    }
}
