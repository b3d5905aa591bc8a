// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core feed types with no runtime dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Apart from `serde` derives on [`VideoItem`](video::VideoItem), it only
//! depends on `std`, so everything here is testable without an async runtime.
//!
//! # Modules
//!
//! - [`error`]: User-visible feed errors ([`FeedError`](error::FeedError))
//! - [`feed`]: Feed list and pagination types ([`FeedList`](feed::FeedList),
//!   [`FeedQuery`](feed::FeedQuery), [`Cursor`](feed::Cursor), [`Page`](feed::Page))
//! - [`ui`]: UI value objects ([`AutoHideDelay`](ui::AutoHideDelay))
//! - [`video`]: Video types ([`VideoItem`](video::VideoItem),
//!   [`PlaybackRate`](video::PlaybackRate), [`PlaybackSnapshot`](video::PlaybackSnapshot))

pub mod error;
pub mod feed;
pub mod ui;
pub mod video;
