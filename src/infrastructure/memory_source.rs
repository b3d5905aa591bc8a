// SPDX-License-Identifier: MPL-2.0
//! In-memory adapter implementing the [`VideoSource`] port.
//!
//! [`MemorySource`] pages a fixed catalog of videos with numeric offset
//! cursors. It backs the demo binary and can be loaded from a TOML fixture:
//!
//! ```toml
//! page_size = 5
//!
//! [[videos]]
//! id = "v1"
//! title = "First"
//! cover_url = "/covers/v1.jpg"
//! media_url = "/media/v1.mp4"
//!
//! [videos.author]
//! id = "a1"
//! handle = "creator"
//! display_name = "Creator"
//! ```
//!
//! [`VideoSource`]: crate::application::port::VideoSource

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;

use crate::application::port::{SourceError, VideoSource};
use crate::domain::feed::{Cursor, FeedQuery, Page};
use crate::domain::video::VideoItem;
use crate::error::{Error, Result};

/// Page size used when a fixture does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default)]
    videos: Vec<VideoItem>,
}

/// Paginated source over a fixed list of videos.
///
/// A query matches the videos whose author handle equals the query handle,
/// ignoring ASCII case. Cursors are decimal offsets into the matching list.
#[derive(Debug, Clone)]
pub struct MemorySource {
    videos: Arc<[VideoItem]>,
    page_size: usize,
    latency: Option<Duration>,
}

impl MemorySource {
    /// Creates a source over `videos`. A `page_size` of 0 is treated as 1.
    #[must_use]
    pub fn new(videos: Vec<VideoItem>, page_size: usize) -> Self {
        Self {
            videos: videos.into(),
            page_size: page_size.max(1),
            latency: None,
        }
    }

    /// Delays every response by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Parses a TOML fixture.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not a valid fixture.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let fixture: Fixture = toml::from_str(content)?;
        Ok(Self::new(fixture.videos, fixture.page_size))
    }

    /// Reads and parses a TOML fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is not a valid fixture.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::Io(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&content)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn page(&self, query: &FeedQuery, cursor: &Cursor) -> std::result::Result<Page, SourceError> {
        let offset: usize = cursor.as_str().parse().map_err(|_| {
            SourceError::MalformedResponse(format!("invalid cursor {cursor:?}"))
        })?;

        let matching: Vec<&VideoItem> = self
            .videos
            .iter()
            .filter(|item| item.author.handle.eq_ignore_ascii_case(query.handle()))
            .collect();

        let end = offset.saturating_add(self.page_size).min(matching.len());
        let items: Vec<VideoItem> = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|item| (*item).clone())
            .collect();

        if end < matching.len() {
            Ok(Page::with_next(items, Cursor::new(end.to_string())))
        } else {
            Ok(Page::last(items))
        }
    }
}

impl VideoSource for MemorySource {
    fn fetch_page(
        &self,
        query: &FeedQuery,
        cursor: &Cursor,
    ) -> BoxFuture<'static, std::result::Result<Page, SourceError>> {
        let result = self.page(query, cursor);
        let latency = self.latency;
        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }
}
