// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and feed fixtures.
//!
//! Re-exports the `approx` assertion macros, which handle floating-point
//! precision where `assert_eq!` cannot.

pub use approx::assert_abs_diff_eq;

use crate::domain::video::{Author, VideoItem};

/// Builds `count` videos published by `handle`, with ids `{handle}-{n}`.
pub fn catalog(handle: &str, count: usize) -> Vec<VideoItem> {
    (0..count)
        .map(|n| {
            let id = format!("{handle}-{n}");
            let mut item = VideoItem::new(
                id.as_str(),
                format!("/covers/{id}.jpg"),
                format!("/media/{id}.mp4"),
            );
            item.author = Author {
                id: format!("author-{handle}"),
                handle: handle.to_string(),
                display_name: handle.to_uppercase(),
                avatar_url: String::new(),
            };
            item
        })
        .collect()
}
