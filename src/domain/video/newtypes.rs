// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for video playback values,
//! ensuring they are always within valid ranges.

use crate::config::{MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE, PLAYBACK_RATE_CYCLE};

/// Two rates closer than this are considered equal.
const RATE_EPSILON: f64 = 0.001;

// =============================================================================
// PlaybackRate
// =============================================================================

/// Playback rate multiplier, guaranteed to be within valid range (0.25x–4.0x).
///
/// The rate toggle walks [`PLAYBACK_RATE_CYCLE`] in order and wraps around.
///
/// # Example
///
/// ```
/// use veilfeed::domain::video::PlaybackRate;
///
/// let rate = PlaybackRate::default();
/// assert_eq!(rate.cycle().value(), 1.5);
///
/// // Values outside range are clamped
/// assert_eq!(PlaybackRate::new(100.0).value(), 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Normal speed.
    pub const NORMAL: Self = Self(1.0);

    /// Creates a new playback rate, clamping to valid range.
    ///
    /// Non-finite input falls back to normal speed.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        if rate.is_finite() {
            Self(rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE))
        } else {
            Self::NORMAL
        }
    }

    /// Returns the rate value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the next rate of the toggle cycle.
    ///
    /// A rate that is not part of the cycle goes back to normal speed.
    #[must_use]
    pub fn cycle(self) -> Self {
        let next = PLAYBACK_RATE_CYCLE
            .iter()
            .position(|&r| (r - self.0).abs() < RATE_EPSILON)
            .map_or(PLAYBACK_RATE_CYCLE[0], |i| {
                PLAYBACK_RATE_CYCLE[(i + 1) % PLAYBACK_RATE_CYCLE.len()]
            });
        Self(next)
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl std::fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.0)
    }
}
