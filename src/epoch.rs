//! Activation tokens for scheduled alarms
//!
//! Every question activation, round start and return to the menu gets a new
//! epoch. Alarms remember the epoch that scheduled them, and an alarm whose
//! epoch no longer matches the live one is dropped instead of being applied
//! to a question that has already been replaced.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A monotonically increasing activation token
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the token that supersedes this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_next_is_greater() {
        let epoch = Epoch::default();
        let next = epoch.next();

        assert!(next > epoch);
        assert_ne!(next, epoch);
        assert_eq!(next.next(), Epoch(2));
    }

    #[test]
    fn test_epoch_wraps_instead_of_overflowing() {
        assert_eq!(Epoch(u64::MAX).next(), Epoch(0));
    }

    #[test]
    fn test_epoch_display() {
        assert_eq!(Epoch(7).to_string(), "#7");
    }

    #[test]
    fn test_epoch_serialization() {
        let json = serde_json::to_string(&Epoch(42)).unwrap();
        assert_eq!(json, "42");

        let back: Epoch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Epoch(42));
    }
}
