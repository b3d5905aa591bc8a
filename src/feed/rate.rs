// SPDX-License-Identifier: MPL-2.0
//! Playback-rate toggle with debounce and position reconciliation.
//!
//! Rapid toggles coalesce: only the last rate of a burst reaches the player.
//! Some players jump or pause while switching rate, so after applying it the
//! captured position and play state are put back.

use crate::application::port::PlaybackSurface;
use crate::config::{DEFAULT_RATE_DEBOUNCE, DEFAULT_RATE_DRIFT_TOLERANCE_SECS};
use crate::domain::video::{PlaybackRate, PlaybackSnapshot};
use std::time::{Duration, Instant};

/// A rate waiting for its debounce to elapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRate {
    pub rate: PlaybackRate,
    /// Surface state at the most recent toggle, if a surface was mounted.
    pub captured: Option<PlaybackSnapshot>,
    pub generation: u64,
}

/// Debounce arm request produced by a toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateToggle {
    pub rate: PlaybackRate,
    pub deadline: Instant,
    pub generation: u64,
}

/// What reconciliation had to fix after applying a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// The position drifted and was sought back.
    pub restored: bool,
    /// Playback had stopped and was resumed.
    pub resumed: bool,
}

/// Debounced rate toggle state.
#[derive(Debug, Clone)]
pub struct RateController {
    debounce: Duration,
    drift_tolerance_secs: f64,
    pending: Option<PendingRate>,
    generation: u64,
}

impl Default for RateController {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_DEBOUNCE, DEFAULT_RATE_DRIFT_TOLERANCE_SECS)
    }
}

impl RateController {
    #[must_use]
    pub fn new(debounce: Duration, drift_tolerance_secs: f64) -> Self {
        Self {
            debounce,
            drift_tolerance_secs,
            pending: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn drift_tolerance_secs(&self) -> f64 {
        self.drift_tolerance_secs
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingRate> {
        self.pending.as_ref()
    }

    /// Steps the rate from the latest pending one (or `current`) and
    /// restarts the debounce.
    pub fn request_toggle(
        &mut self,
        current: PlaybackRate,
        captured: Option<PlaybackSnapshot>,
        now: Instant,
    ) -> RateToggle {
        let base = self.pending.map_or(current, |pending| pending.rate);
        let rate = base.cycle();
        self.generation += 1;
        self.pending = Some(PendingRate {
            rate,
            captured,
            generation: self.generation,
        });
        tracing::debug!(%rate, generation = self.generation, "rate toggle debounced");
        RateToggle {
            rate,
            deadline: now + self.debounce,
            generation: self.generation,
        }
    }

    /// The debounce armed with `generation` elapsed. Returns the rate to apply.
    pub fn expire(&mut self, generation: u64) -> Option<PendingRate> {
        match self.pending {
            Some(pending) if pending.generation == generation => self.pending.take(),
            _ => None,
        }
    }

    /// Drops any pending rate.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.generation += 1;
    }

    /// Ends the debounce early because the active video changed.
    ///
    /// The returned rate carries no capture: the position it held belongs to
    /// the video that was just left.
    pub fn flush(&mut self) -> Option<PendingRate> {
        let pending = self.pending.take()?;
        self.generation += 1;
        tracing::debug!(rate = %pending.rate, "pending rate flushed on navigation");
        Some(PendingRate {
            captured: None,
            ..pending
        })
    }
}

/// Applies `pending` to `surface`, then restores the captured position and
/// play state if the switch disturbed them.
pub fn reconcile(
    surface: &dyn PlaybackSurface,
    pending: &PendingRate,
    tolerance_secs: f64,
) -> ReconcileReport {
    surface.set_rate(pending.rate);

    let mut report = ReconcileReport::default();
    let (Some(captured), Some(after)) = (pending.captured, surface.snapshot()) else {
        return report;
    };
    if after.drifted_from(&captured, tolerance_secs) {
        surface.seek(captured.position_secs);
        report.restored = true;
    }
    if !captured.paused && after.paused {
        surface.resume();
        report.resumed = true;
    }
    tracing::debug!(
        rate = %pending.rate,
        restored = report.restored,
        resumed = report.resumed,
        "playback rate applied"
    );
    report
}
