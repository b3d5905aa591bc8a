// SPDX-License-Identifier: MPL-2.0
//! Feed domain types: the item list, the query and one page of results.

pub mod list;
pub mod query;

pub use list::FeedList;
pub use query::{Cursor, FeedQuery};

use crate::domain::video::VideoItem;

/// One response of the video source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<VideoItem>,
    /// Token for the following page, if the source issued one.
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

impl Page {
    /// The final page: no cursor, nothing more to fetch.
    #[must_use]
    pub fn last(items: Vec<VideoItem>) -> Self {
        Self {
            items,
            next_cursor: None,
            has_more: false,
        }
    }

    #[must_use]
    pub fn with_next(items: Vec<VideoItem>, cursor: Cursor) -> Self {
        Self {
            items,
            next_cursor: Some(cursor),
            has_more: true,
        }
    }
}

/// Which page a fetch was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    FirstPage,
    NextPage,
}

/// Flags the presentation layer needs to render pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationFlags {
    pub has_more: bool,
    pub is_fetching: bool,
    /// True while a next-page fetch runs and the user is near the tail.
    pub show_loading_more: bool,
}

/// Navigation affordances for the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationInfo {
    pub active_index: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}
