// SPDX-License-Identifier: MPL-2.0
//! Feed item types.
//!
//! A [`VideoItem`] is immutable once fetched; its identity is its [`VideoId`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a video, as issued by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VideoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The account that published a video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    /// Unique handle, without the leading `@`.
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Soundtrack attribution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicInfo {
    pub title: String,
    pub author: String,
}

/// Engagement counters shown next to a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
}

/// A single short video in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: VideoId,
    #[serde(default)]
    pub title: String,
    pub cover_url: String,
    pub media_url: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub music: Option<MusicInfo>,
    #[serde(default)]
    pub counters: Counters,
}

impl VideoItem {
    /// Creates an item with the required fields and empty metadata.
    #[must_use]
    pub fn new(
        id: impl Into<VideoId>,
        cover_url: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            cover_url: cover_url.into(),
            media_url: media_url.into(),
            avatar_url: String::new(),
            author: Author::default(),
            music: None,
            counters: Counters::default(),
        }
    }

    /// Resolves host-relative URLs (starting with `/`) against `base_url`.
    ///
    /// Absolute URLs and empty fields are left untouched.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        for url in [
            &mut self.cover_url,
            &mut self.media_url,
            &mut self.avatar_url,
            &mut self.author.avatar_url,
        ] {
            if url.starts_with('/') {
                *url = format!("{base}{url}");
            }
        }
        self
    }
}
