// SPDX-License-Identifier: MPL-2.0
//! Windowed mount and preload management.
//!
//! Only a handful of feed items are ever mounted: the active one, its two
//! neighbours and every item whose cover has been preloaded.
//!
//! # Design
//!
//! - **Covers only**: preloading warms the still cover, never the video payload
//! - **Monotonic marks**: once marked, an index stays mounted until the feed resets
//! - **One warm-up per index**: [`FeedWindow::mark_around`] only returns new marks

use crate::config::DEFAULT_PRELOAD_RADIUS;
use std::collections::BTreeSet;

/// Mount/preload window over the feed.
#[derive(Debug, Clone)]
pub struct FeedWindow {
    radius: usize,
    preloaded: BTreeSet<usize>,
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PRELOAD_RADIUS)
    }
}

impl FeedWindow {
    /// Creates a window that preloads `radius` items on each side of the active one.
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self {
            radius: radius.max(1),
            preloaded: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns true if `index` should be mounted while `active` is active.
    #[must_use]
    pub fn is_mount_eligible(&self, index: usize, active: usize) -> bool {
        index.abs_diff(active) <= 1 || self.preloaded.contains(&index)
    }

    #[must_use]
    pub fn is_preloaded(&self, index: usize) -> bool {
        self.preloaded.contains(&index)
    }

    /// All mount-eligible indices of a list of `len` items, ascending.
    #[must_use]
    pub fn render_window(&self, active: usize, len: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }
        let lo = active.saturating_sub(1);
        let hi = (active + 1).min(len - 1);
        let mut window: BTreeSet<usize> = (lo..=hi).collect();
        window.extend(self.preloaded.range(..len));
        window.into_iter().collect()
    }

    /// Marks the indices within the radius of `active` (excluding `active`
    /// itself) and returns the ones that were not marked before.
    ///
    /// Each returned index should get exactly one cover warm-up.
    pub fn mark_around(&mut self, active: usize, len: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }
        let lo = active.saturating_sub(self.radius);
        let hi = active.saturating_add(self.radius).min(len - 1);
        (lo..=hi)
            .filter(|&index| index != active)
            .filter(|&index| self.preloaded.insert(index))
            .collect()
    }

    /// Number of marked indices.
    #[must_use]
    pub fn preloaded_count(&self) -> usize {
        self.preloaded.len()
    }

    /// Forgets every mark (query change).
    pub fn reset(&mut self) {
        self.preloaded.clear();
    }
}
