// SPDX-License-Identifier: MPL-2.0
//! Engagement side-channel.
//!
//! Counts swipe-driven transitions for the session and raises a milestone
//! every few of them. An engine start may also draw a one-off alert. Whether
//! either is actually delivered is decided by the [`AlertLedger`], which
//! enforces a cooldown persisted across restarts.

use crate::config::{DEFAULT_ALERT_COOLDOWN, DEFAULT_ENGAGEMENT_INTERVAL};
use crate::feed::navigation::Transition;
use crate::persisted_state::AppState;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Session counter of swipe-driven transitions.
#[derive(Debug, Clone)]
pub struct EngagementTracker {
    interval: u64,
    swipes: u64,
}

impl Default for EngagementTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ENGAGEMENT_INTERVAL)
    }
}

impl EngagementTracker {
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            swipes: 0,
        }
    }

    #[must_use]
    pub fn swipes(&self) -> u64 {
        self.swipes
    }

    /// Records a transition; returns the count when it hits a milestone.
    ///
    /// Keyboard, button and deep-link transitions are not counted.
    pub fn record(&mut self, transition: &Transition) -> Option<u64> {
        if !transition.is_swipe() {
            return None;
        }
        self.swipes += 1;
        (self.swipes % self.interval == 0).then_some(self.swipes)
    }
}

#[derive(Debug, Clone)]
enum Store {
    Memory,
    Disk(Option<PathBuf>),
}

/// Cooldown gate for engagement alerts.
#[derive(Debug, Clone)]
pub struct AlertLedger {
    state: AppState,
    store: Store,
    cooldown: Duration,
}

impl Default for AlertLedger {
    fn default() -> Self {
        Self::in_memory(DEFAULT_ALERT_COOLDOWN)
    }
}

impl AlertLedger {
    /// A ledger that forgets everything when dropped.
    #[must_use]
    pub fn in_memory(cooldown: Duration) -> Self {
        Self {
            state: AppState::default(),
            store: Store::Memory,
            cooldown,
        }
    }

    /// A ledger backed by `state.cbor` in `base_dir` (or the default data dir).
    ///
    /// Returns the load warning key, if any.
    #[must_use]
    pub fn on_disk(base_dir: Option<PathBuf>, cooldown: Duration) -> (Self, Option<String>) {
        let (state, warning) = AppState::load_from(base_dir.clone());
        (
            Self {
                state,
                store: Store::Disk(base_dir),
                cooldown,
            },
            warning,
        )
    }

    #[must_use]
    pub fn last_alert_shown(&self) -> Option<DateTime<Utc>> {
        self.state.last_alert_shown
    }

    /// Claims the right to show an alert at `now`.
    ///
    /// On success the timestamp is recorded in memory. Disk ledgers also hand
    /// back the write, so the caller decides where the file I/O runs.
    pub fn try_claim(&mut self, now: DateTime<Utc>) -> Claim {
        if !self.state.alert_cooldown_elapsed(now, self.cooldown) {
            tracing::debug!(last = ?self.state.last_alert_shown, "engagement alert in cooldown");
            return Claim::Denied;
        }
        self.state.last_alert_shown = Some(now);
        let save = match &self.store {
            Store::Memory => None,
            Store::Disk(base_dir) => Some(StateSave {
                state: self.state.clone(),
                base_dir: base_dir.clone(),
            }),
        };
        Claim::Granted { save }
    }

    /// Claims the startup alert when `roll` (uniform in `[0, 1)`) lands
    /// below `chance`, subject to the same cooldown as milestones.
    pub fn try_claim_startup(&mut self, now: DateTime<Utc>, roll: f64, chance: f64) -> Claim {
        if roll >= chance {
            tracing::debug!(roll, chance, "startup alert not drawn");
            return Claim::Denied;
        }
        self.try_claim(now)
    }
}

/// Outcome of [`AlertLedger::try_claim`].
#[derive(Debug)]
#[must_use]
pub enum Claim {
    /// Still in cooldown.
    Denied,
    /// The alert may be shown. `save` persists the new timestamp.
    Granted { save: Option<StateSave> },
}

impl Claim {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// A state write detached from the ledger, safe to run on a blocking thread.
#[derive(Debug)]
pub struct StateSave {
    state: AppState,
    base_dir: Option<PathBuf>,
}

impl StateSave {
    /// Writes the state file. A failure is logged; the alert stays granted.
    pub fn run(self) {
        if let Some(warning) = self.state.save_to(self.base_dir) {
            tracing::warn!(warning = %warning, "could not persist engagement alert timestamp");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::gesture::IntentSource;
    use crate::feed::navigation::TransitionCause;
    use chrono::TimeDelta;
    use tempfile::tempdir;

    fn transition(source: IntentSource) -> Transition {
        Transition {
            from: 0,
            to: 1,
            cause: TransitionCause::Intent(source),
        }
    }

    #[test]
    fn every_tenth_swipe_is_a_milestone() {
        let mut tracker = EngagementTracker::default();
        let milestones: Vec<_> = (0..25)
            .filter_map(|_| tracker.record(&transition(IntentSource::Swipe)))
            .collect();
        assert_eq!(milestones, vec![10, 20]);
    }

    #[test]
    fn keyboard_and_deep_links_are_not_counted() {
        let mut tracker = EngagementTracker::default();
        for _ in 0..10 {
            assert!(tracker.record(&transition(IntentSource::Keyboard)).is_none());
        }
        let deep_link = Transition {
            from: 0,
            to: 4,
            cause: TransitionCause::DeepLink,
        };
        assert!(tracker.record(&deep_link).is_none());
        assert_eq!(tracker.swipes(), 0);
    }

    #[test]
    fn ledger_enforces_cooldown() {
        let mut ledger = AlertLedger::default();
        let now = Utc::now();
        assert!(ledger.try_claim(now).is_granted());
        assert!(!ledger.try_claim(now + TimeDelta::seconds(179)).is_granted());
        assert!(!ledger.try_claim(now + TimeDelta::seconds(180)).is_granted());
        assert!(ledger.try_claim(now + TimeDelta::seconds(181)).is_granted());
    }

    #[test]
    fn memory_ledger_has_nothing_to_save() {
        let mut ledger = AlertLedger::default();
        assert!(matches!(
            ledger.try_claim(Utc::now()),
            Claim::Granted { save: None }
        ));
    }

    #[test]
    fn startup_alert_needs_winning_roll_and_elapsed_cooldown() {
        let mut ledger = AlertLedger::default();
        let now = Utc::now();
        assert!(!ledger.try_claim_startup(now, 0.7, 0.5).is_granted());
        assert!(!ledger.try_claim_startup(now, 0.5, 0.5).is_granted());
        assert!(ledger.last_alert_shown().is_none());

        assert!(ledger.try_claim_startup(now, 0.2, 0.5).is_granted());
        assert_eq!(ledger.last_alert_shown(), Some(now));
        assert!(!ledger
            .try_claim_startup(now + TimeDelta::seconds(60), 0.0, 1.0)
            .is_granted());
    }

    #[test]
    fn zero_chance_never_claims() {
        let mut ledger = AlertLedger::default();
        assert!(!ledger.try_claim_startup(Utc::now(), 0.0, 0.0).is_granted());
    }

    #[test]
    fn disk_ledger_persists_claims() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base = Some(temp_dir.path().to_path_buf());
        let now = Utc::now();

        let (mut ledger, warning) = AlertLedger::on_disk(base.clone(), DEFAULT_ALERT_COOLDOWN);
        assert!(warning.is_none());
        let Claim::Granted { save: Some(save) } = ledger.try_claim(now) else {
            panic!("disk ledger must hand back a save");
        };

        let (before_save, _) = AlertLedger::on_disk(base.clone(), DEFAULT_ALERT_COOLDOWN);
        assert!(before_save.last_alert_shown().is_none());

        save.run();
        let (mut reloaded, _) = AlertLedger::on_disk(base, DEFAULT_ALERT_COOLDOWN);
        assert_eq!(reloaded.last_alert_shown(), Some(now));
        assert!(!reloaded.try_claim(now + TimeDelta::seconds(10)).is_granted());
    }
}
