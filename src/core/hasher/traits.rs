//! Trait definitions for perceptual hashing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Copy + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32;

    /// Calculate similarity as a percentage (0-100)
    fn similarity(&self, other: &Self) -> f64 {
        let distance = self.distance(other);
        let max_distance = self.bit_count();
        if max_distance == 0 {
            return 100.0;
        }
        (max_distance - distance) as f64 / max_distance as f64 * 100.0
    }
}

/// Number of bits in a difference hash
pub const HASH_BITS: u32 = 64;

/// 64-bit difference hash (dHash)
///
/// Bit 63 holds the first comparison of the top row, bit 0 the last
/// comparison of the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifferenceHash(u64);

impl DifferenceHash {
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Get the hash as a 16-digit hexadecimal string
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl PerceptualHash for DifferenceHash {
    fn distance(&self, other: &Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    fn bit_count(&self) -> u32 {
        HASH_BITS
    }
}

impl fmt::Display for DifferenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
