//! # Hasher Module
//!
//! Computes the 64-bit difference hash (dHash) of an image.
//!
//! ## How It Works
//! 1. Convert to grayscale
//! 2. Resize to a 9x8 grid with a fixed bilinear filter
//! 3. Compare each pixel with its right neighbour, one bit per comparison
//! 4. Compare hashes using Hamming distance
//!
//! ## Performance Optimizations
//! - Uses `fast_image_resize` for SIMD-accelerated resizing
//!
//! ## Example
//! ```rust,ignore
//! use image_similarity::core::hasher::{compute_difference_hash, PerceptualHash};
//!
//! let a = compute_difference_hash(&image_a)?;
//! let b = compute_difference_hash(&image_b)?;
//! println!("{} bits differ", a.distance(&b));
//! ```

mod difference;
pub mod fast_resize;
mod traits;

pub use difference::{compute_difference_hash, DifferenceHasher};
pub use traits::{DifferenceHash, PerceptualHash, HASH_BITS};
