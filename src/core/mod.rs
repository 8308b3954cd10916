//! # Core Module
//!
//! The comparison engine. Pure computation over decoded images; no file or
//! network I/O except in `codec`, which sits on the caller's side.
//!
//! ## Modules
//! - `hasher` - Computes 64-bit difference hashes
//! - `comparator` - Hamming distance and hash similarity
//! - `pixel` - Tolerance-based per-pixel comparison
//! - `overlay` - Renders the diff overlay
//! - `pipeline` - Orchestrates one comparison
//! - `codec` - Decodes inputs and encodes the overlay
//! - `reporter` - Serializable comparison reports

pub mod codec;
pub mod comparator;
pub mod hasher;
pub mod overlay;
pub mod pipeline;
pub mod pixel;
pub mod reporter;

// Re-export commonly used types
pub use comparator::{hamming_distance, similarity_from_hash, MatchType};
pub use hasher::{compute_difference_hash, DifferenceHash, PerceptualHash};
pub use overlay::{DiffRenderer, HighlightColor};
pub use pipeline::{compare, Comparison, ComparisonConfig, ComparisonResult};
pub use pixel::{PixelComparator, Tolerance};
pub use reporter::{ComparisonReport, DiffImageStatus};
