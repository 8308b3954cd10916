//! # Comparator Module
//!
//! Scores how alike two difference hashes are.
//!
//! [`MatchType`] is a display label on top of the distance. Nothing in the
//! comparison reads it back: scores, tolerance and the overlay are decided
//! without it.
//!
//! ## Match Labels
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact match   |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11-15    | Maybe similar |
//! | 16+      | Different     |

use crate::core::hasher::{DifferenceHash, PerceptualHash};
use serde::{Deserialize, Serialize};

/// Count of differing bit positions, in `0..=64`
pub fn hamming_distance(a: &DifferenceHash, b: &DifferenceHash) -> u32 {
    a.distance(b)
}

/// `(64 - distance) / 64 * 100`
pub fn similarity_from_hash(a: &DifferenceHash, b: &DifferenceHash) -> f64 {
    a.similarity(b)
}

/// Human-readable label for a hash distance, reported next to the numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely the same picture
    Similar,
    /// Distance 11-15, possibly related
    MaybeSimilar,
    /// Distance 16+
    Different,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            11..=15 => MatchType::MaybeSimilar,
            _ => MatchType::Different,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::MaybeSimilar => write!(f, "Possibly Similar"),
            MatchType::Different => write!(f, "Different"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(bits: u64) -> DifferenceHash {
        DifferenceHash::from_bits(bits)
    }

    #[test]
    fn distance_to_self_is_zero() {
        for bits in [0, u64::MAX, 0x0123_4567_89AB_CDEF] {
            assert_eq!(hamming_distance(&hash(bits), &hash(bits)), 0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = hash(0xF0F0_F0F0_0000_FFFF);
        let b = hash(0x0F0F_0000_FFFF_0001);

        assert_eq!(hamming_distance(&a, &b), hamming_distance(&b, &a));
    }

    #[test]
    fn distance_uses_all_64_bits() {
        assert_eq!(hamming_distance(&hash(1 << 63), &hash(0)), 1);
        assert_eq!(hamming_distance(&hash(u64::MAX), &hash(0)), 64);
    }

    #[test]
    fn similarity_of_identical_hashes_is_100() {
        let a = hash(0xABCD);
        assert_eq!(similarity_from_hash(&a, &a), 100.0);
    }

    #[test]
    fn similarity_drops_by_one_sixty_fourth_per_bit() {
        let a = hash(0xFFFF);
        let b = hash(0x0000);

        assert_eq!(similarity_from_hash(&a, &b), 75.0);
    }

    #[test]
    fn match_type_from_distance() {
        assert_eq!(MatchType::from_distance(0), MatchType::Exact);
        assert_eq!(MatchType::from_distance(3), MatchType::NearExact);
        assert_eq!(MatchType::from_distance(7), MatchType::Similar);
        assert_eq!(MatchType::from_distance(15), MatchType::MaybeSimilar);
        assert_eq!(MatchType::from_distance(64), MatchType::Different);
    }

    #[test]
    fn match_type_band_edges() {
        let edges = [
            (1, MatchType::NearExact),
            (4, MatchType::NearExact),
            (5, MatchType::Similar),
            (10, MatchType::Similar),
            (11, MatchType::MaybeSimilar),
            (16, MatchType::Different),
        ];
        for (distance, expected) in edges {
            assert_eq!(MatchType::from_distance(distance), expected, "distance {}", distance);
        }
    }
}
