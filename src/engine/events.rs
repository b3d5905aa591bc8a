// SPDX-License-Identifier: MPL-2.0
//! Notifications broadcast to the presentation layer.

use crate::domain::error::FeedError;
use crate::domain::feed::{FeedQuery, PaginationFlags};
use crate::domain::video::PlaybackRate;

/// Load status of the current feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// No query yet.
    #[default]
    Idle,
    /// The first page is being fetched.
    Loading,
    /// At least one item is available.
    Ready,
    /// The source has nothing for this query.
    NoResults,
    /// The first page could not be fetched.
    Failed(FeedError),
}

impl FeedStatus {
    /// Returns the i18n message key to show instead of the feed, if any.
    #[must_use]
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            FeedStatus::Idle | FeedStatus::Ready => None,
            FeedStatus::Loading => Some("feed-loading"),
            FeedStatus::NoResults => Some("feed-no-results"),
            FeedStatus::Failed(err) => Some(err.i18n_key()),
        }
    }
}

/// Something the presentation layer may want to re-render for.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A new query started; the list was cleared.
    FeedReset { query: FeedQuery },
    StatusChanged(FeedStatus),
    /// The list now holds `len` items, `added` of them new.
    FeedChanged { len: usize, added: usize },
    ActiveIndexChanged { from: usize, to: usize },
    PaginationChanged(PaginationFlags),
    ControlsVisibilityChanged(bool),
    PlaybackRateChanged(PlaybackRate),
    MuteChanged(bool),
}
