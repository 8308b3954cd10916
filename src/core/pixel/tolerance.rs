//! The per-channel tolerance threshold.

use crate::error::CompareError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold applied when the caller does not supply one
pub const DEFAULT_THRESHOLD: u8 = 45;
/// Smallest accepted threshold
pub const MIN_THRESHOLD: u8 = 1;
/// Largest accepted threshold
pub const MAX_THRESHOLD: u8 = 100;

/// Per-channel absolute difference at or above which a pixel counts as differing.
///
/// Always within `MIN_THRESHOLD..=MAX_THRESHOLD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Tolerance(u8);

impl Tolerance {
    /// Validate a caller-supplied threshold
    pub fn new(value: i64) -> Result<Self, CompareError> {
        if (MIN_THRESHOLD as i64..=MAX_THRESHOLD as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CompareError::InvalidThreshold { value })
        }
    }

    /// Validate an optional threshold, falling back to `DEFAULT_THRESHOLD`
    pub fn from_option(value: Option<i64>) -> Result<Self, CompareError> {
        value.map_or(Ok(Self::default()), Self::new)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether a channel difference is large enough to count
    #[inline]
    pub fn is_met_by(&self, delta: u8) -> bool {
        delta >= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<i64> for Tolerance {
    type Error = CompareError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tolerance> for u8 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_45() {
        assert_eq!(Tolerance::default().value(), 45);
        assert_eq!(Tolerance::from_option(None).unwrap().value(), 45);
    }

    #[test]
    fn accepts_range_bounds() {
        assert_eq!(Tolerance::new(1).unwrap().value(), 1);
        assert_eq!(Tolerance::new(100).unwrap().value(), 100);
    }

    #[test]
    fn rejects_out_of_range() {
        for value in [0, -3, 101, 255, 1000] {
            assert_eq!(
                Tolerance::new(value),
                Err(CompareError::InvalidThreshold { value })
            );
        }
    }

    #[test]
    fn delta_equal_to_threshold_counts() {
        let tolerance = Tolerance::new(10).unwrap();
        assert!(tolerance.is_met_by(10));
        assert!(tolerance.is_met_by(11));
        assert!(!tolerance.is_met_by(9));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Tolerance = serde_json::from_str("30").unwrap();
        assert_eq!(ok.value(), 30);
        assert!(serde_json::from_str::<Tolerance>("0").is_err());
    }
}
