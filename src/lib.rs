//! # Image Similarity
//!
//! Compares two equal-size images and reports how alike they are.
//!
//! ## Two Measures
//! - **Perceptual** - 64-bit difference hash (dHash), compared by Hamming distance
//! - **Per-pixel** - share of pixels whose channels all stay within a tolerance
//!
//! When any pixel differs, a diff overlay is returned: the first image with
//! the differing pixels painted in a highlight colour.
//!
//! ## Architecture
//! - `core` - The comparison engine (plus the codec it is fed through)
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{ImageCompareError, Result};

/// Initialize tracing for the application
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`) applies.
/// Call once, from the entry point.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ImageCompareError::Config(format!("tracing already initialised: {}", e)))
}
