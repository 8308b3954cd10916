//! # Pipeline Module
//!
//! Composes the hasher, comparator, pixel comparator and overlay renderer
//! into one comparison per request.
//!
//! ## Stages
//! 1. **Validate** - threshold in 1-100, equal non-empty bounds
//! 2. **Hash** - dHash both images, Hamming distance, hash similarity
//! 3. **Score + paint** - one parallel pass yields the pixel score and the overlay
//! 4. **Attach** - the overlay is kept only if some pixel differs
//!
//! Each comparison is stateless; a [`Comparison`] can be shared across threads.

mod executor;

pub use executor::{compare, Comparison, ComparisonBuilder, ComparisonConfig, ComparisonResult};
