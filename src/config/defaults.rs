// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the feed engine. Constants are organized by category.
//!
//! # Categories
//!
//! - **Gestures**: Swipe distance threshold and post-intent cooldown
//! - **Auto-hide**: Overlay controls countdown bounds
//! - **Playback**: Rate cycle, debounce and drift tolerance
//! - **Window**: Preload radius and next-page trigger distance
//! - **Engagement**: Milestone interval and alert cooldown

use std::time::Duration;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Minimum vertical travel (in pixels) for a drag or swipe to count as a gesture.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Quiet period after an emitted intent during which further intents are swallowed.
pub const DEFAULT_GESTURE_COOLDOWN: Duration = Duration::from_millis(300);

// ==========================================================================
// Auto-hide Defaults
// ==========================================================================

/// Whether overlay controls hide themselves after inactivity by default.
pub const DEFAULT_AUTO_HIDE_ENABLED: bool = false;

/// Default auto-hide countdown (in seconds).
pub const DEFAULT_AUTO_HIDE_DELAY_SECS: u32 = 3;

/// Minimum auto-hide countdown (in seconds).
pub const MIN_AUTO_HIDE_DELAY_SECS: u32 = 1;

/// Maximum auto-hide countdown (in seconds).
pub const MAX_AUTO_HIDE_DELAY_SECS: u32 = 30;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Playback rates visited by the rate toggle, in order. Wraps after the last.
pub const PLAYBACK_RATE_CYCLE: [f64; 4] = [1.0, 1.5, 2.0, 0.5];

/// Lowest playback rate accepted from configuration.
pub const MIN_PLAYBACK_RATE: f64 = 0.25;

/// Highest playback rate accepted from configuration.
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// Window in which repeated rate toggles coalesce into one applied change.
pub const DEFAULT_RATE_DEBOUNCE: Duration = Duration::from_millis(50);

/// Position drift (in seconds) after a rate change that triggers a restore.
pub const DEFAULT_RATE_DRIFT_TOLERANCE_SECS: f64 = 0.1;

/// Videos start muted.
pub const DEFAULT_MUTED: bool = true;

// ==========================================================================
// Window / Pagination Defaults
// ==========================================================================

/// Number of indices on each side of the active one whose covers are warmed.
pub const DEFAULT_PRELOAD_RADIUS: usize = 2;

/// The next page is requested once the active index is this close to the tail.
pub const DEFAULT_PREFETCH_DISTANCE: usize = 2;

// ==========================================================================
// Engagement Defaults
// ==========================================================================

/// Every n-th swipe-driven transition raises an engagement milestone.
pub const DEFAULT_ENGAGEMENT_INTERVAL: u64 = 10;

/// Minimum time between two delivered engagement alerts.
pub const DEFAULT_ALERT_COOLDOWN: Duration = Duration::from_secs(180);

/// Probability that an engine start offers an engagement alert.
pub const DEFAULT_STARTUP_ALERT_CHANCE: f64 = 0.5;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_SWIPE_THRESHOLD_PX > 0.0);

    assert!(MIN_AUTO_HIDE_DELAY_SECS > 0);
    assert!(MAX_AUTO_HIDE_DELAY_SECS >= MIN_AUTO_HIDE_DELAY_SECS);
    assert!(DEFAULT_AUTO_HIDE_DELAY_SECS >= MIN_AUTO_HIDE_DELAY_SECS);
    assert!(DEFAULT_AUTO_HIDE_DELAY_SECS <= MAX_AUTO_HIDE_DELAY_SECS);

    assert!(MIN_PLAYBACK_RATE > 0.0);
    assert!(MAX_PLAYBACK_RATE > MIN_PLAYBACK_RATE);
    assert!(DEFAULT_RATE_DRIFT_TOLERANCE_SECS > 0.0);

    assert!(DEFAULT_PRELOAD_RADIUS >= 1);
    assert!(DEFAULT_PREFETCH_DISTANCE >= 1);
    assert!(DEFAULT_ENGAGEMENT_INTERVAL > 0);
    assert!(DEFAULT_STARTUP_ALERT_CHANCE >= 0.0 && DEFAULT_STARTUP_ALERT_CHANCE <= 1.0);
};
