// SPDX-License-Identifier: MPL-2.0
//! Playback observations reported by the presentation layer.

/// Position and play/pause status of the active video surface at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackSnapshot {
    /// Current playback position in seconds.
    pub position_secs: f64,
    /// Whether the surface was paused.
    pub paused: bool,
}

impl PlaybackSnapshot {
    #[must_use]
    pub fn playing(position_secs: f64) -> Self {
        Self {
            position_secs,
            paused: false,
        }
    }

    #[must_use]
    pub fn paused(position_secs: f64) -> Self {
        Self {
            position_secs,
            paused: true,
        }
    }

    /// Returns true if `other` is more than `tolerance_secs` away from this position.
    #[must_use]
    pub fn drifted_from(&self, other: &Self, tolerance_secs: f64) -> bool {
        (self.position_secs - other.position_secs).abs() > tolerance_secs
    }
}
