// SPDX-License-Identifier: MPL-2.0
//! Active-index state machine.
//!
//! The controller owns the single active index and the playback state shared
//! by every video of the feed (mute, rate, per-index positions).

use crate::config::DEFAULT_MUTED;
use crate::domain::feed::{FeedList, NavigationInfo};
use crate::domain::video::{PlaybackRate, VideoId};
use crate::feed::gesture::{IntentSource, NavIntent, SwipeDirection};
use std::collections::HashMap;

/// Why the active index moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Intent(IntentSource),
    DeepLink,
}

/// A successful change of the active index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub cause: TransitionCause,
}

impl Transition {
    /// Returns true if the user moved by swipe or drag.
    #[must_use]
    pub fn is_swipe(&self) -> bool {
        self.cause == TransitionCause::Intent(IntentSource::Swipe)
    }
}

/// Navigation state for one feed.
#[derive(Debug, Clone)]
pub struct NavigationController {
    active_index: usize,
    positions: HashMap<usize, f64>,
    playback_rate: PlaybackRate,
    muted: bool,
    pending_deep_link: Option<VideoId>,
    has_navigated: bool,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(DEFAULT_MUTED, PlaybackRate::default())
    }
}

impl NavigationController {
    #[must_use]
    pub fn new(muted: bool, playback_rate: PlaybackRate) -> Self {
        Self {
            active_index: 0,
            positions: HashMap::new(),
            playback_rate,
            muted,
            pending_deep_link: None,
            has_navigated: false,
        }
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[must_use]
    pub fn playback_rate(&self) -> PlaybackRate {
        self.playback_rate
    }

    pub fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.playback_rate = rate;
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Flips the shared mute state and returns the new value.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Stored position of `index`, 0 when none was recorded.
    #[must_use]
    pub fn position(&self, index: usize) -> f64 {
        self.positions.get(&index).copied().unwrap_or(0.0)
    }

    /// Records the playback position reported for `index`.
    pub fn record_position(&mut self, index: usize, seconds: f64) {
        if seconds.is_finite() && seconds >= 0.0 {
            self.positions.insert(index, seconds);
        }
    }

    /// The deep-linked video still waiting for its page, if any.
    #[must_use]
    pub fn pending_deep_link(&self) -> Option<&VideoId> {
        self.pending_deep_link.as_ref()
    }

    /// Starts a new query: index 0, positions forgotten, optional deep link.
    ///
    /// Mute and playback rate are shared across queries and kept.
    pub fn reset(&mut self, deep_link: Option<VideoId>) {
        self.active_index = 0;
        self.positions.clear();
        self.pending_deep_link = deep_link;
        self.has_navigated = false;
    }

    /// Applies an intent against a list of `len` items.
    ///
    /// There is no wraparound: advancing past the last item or going back
    /// from the first one is a no-op.
    pub fn navigate(&mut self, intent: NavIntent, len: usize) -> Option<Transition> {
        let from = self.active_index;
        let to = match intent.direction {
            SwipeDirection::Up if len > 0 && from < len - 1 => from + 1,
            SwipeDirection::Down if from > 0 => from - 1,
            _ => return None,
        };
        self.has_navigated = true;
        self.pending_deep_link = None;
        Some(self.move_to(to, TransitionCause::Intent(intent.source)))
    }

    /// Picks the initial index once the first page has been merged.
    ///
    /// A matched deep link wins; otherwise the index stays at 0 and an
    /// unmatched deep link is kept for later pages.
    pub fn resolve_initial(&mut self, feed: &FeedList) -> Option<Transition> {
        self.active_index = 0;
        self.try_resolve_deep_link(feed)
    }

    /// Resolves a pending deep link after another page was merged, unless the
    /// user already moved.
    pub fn on_page_merged(&mut self, feed: &FeedList) -> Option<Transition> {
        if self.has_navigated {
            self.pending_deep_link = None;
            return None;
        }
        self.try_resolve_deep_link(feed)
    }

    /// Affordances for previous/next controls.
    #[must_use]
    pub fn navigation_info(&self, len: usize) -> NavigationInfo {
        NavigationInfo {
            active_index: self.active_index,
            total: len,
            has_previous: self.active_index > 0,
            has_next: len > 0 && self.active_index < len - 1,
        }
    }

    fn try_resolve_deep_link(&mut self, feed: &FeedList) -> Option<Transition> {
        let index = feed.position_of(self.pending_deep_link.as_ref()?)?;
        self.pending_deep_link = None;
        if index == self.active_index {
            return None;
        }
        Some(self.move_to(index, TransitionCause::DeepLink))
    }

    fn move_to(&mut self, to: usize, cause: TransitionCause) -> Transition {
        let from = self.active_index;
        self.positions.insert(from, 0.0);
        self.active_index = to;
        tracing::debug!(from, to, ?cause, "active index changed");
        Transition { from, to, cause }
    }
}
