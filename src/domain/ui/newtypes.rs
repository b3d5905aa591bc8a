// SPDX-License-Identifier: MPL-2.0
//! UI newtypes.
//!
//! This module provides type-safe wrappers for UI values,
//! ensuring they are always within valid ranges.

use crate::config::{
    DEFAULT_AUTO_HIDE_DELAY_SECS, MAX_AUTO_HIDE_DELAY_SECS, MIN_AUTO_HIDE_DELAY_SECS,
};
use std::time::Duration;

// =============================================================================
// AutoHideDelay
// =============================================================================

/// Inactivity delay before overlay controls hide, in seconds.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–30 seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHideDelay(u32);

impl AutoHideDelay {
    /// Creates a new delay, clamping to valid range.
    #[must_use]
    pub fn new(secs: u32) -> Self {
        Self(secs.clamp(MIN_AUTO_HIDE_DELAY_SECS, MAX_AUTO_HIDE_DELAY_SECS))
    }

    /// Returns the value in seconds.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the delay as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for AutoHideDelay {
    fn default() -> Self {
        Self(DEFAULT_AUTO_HIDE_DELAY_SECS)
    }
}
