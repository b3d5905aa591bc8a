// SPDX-License-Identifier: MPL-2.0
//! Video source port definition.
//!
//! This module defines the [`VideoSource`] trait, the cursor-paginated
//! provider of feed items. The wire protocol, retries and proxy fallback
//! all live behind it.
//!
//! # Design Notes
//!
//! - Futures are boxed and `'static` so the engine can spawn them as tasks
//! - The source never sees engine state; stale answers are filtered by the caller

use crate::domain::error::FeedError;
use crate::domain::feed::{Cursor, FeedQuery, Page};
use futures_util::future::BoxFuture;

// =============================================================================
// SourceError
// =============================================================================

/// Failures reported by a [`VideoSource`] or a [`CoverPreloader`](super::CoverPreloader).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure (timeout, DNS, connection reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The provider is throttling requests.
    #[error("rate limited by provider")]
    RateLimited,

    /// The provider answered but the payload could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl SourceError {
    /// Returns the i18n message key for this error type.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "error-source-network",
            SourceError::RateLimited => "error-source-rate-limited",
            SourceError::MalformedResponse(_) => "error-source-malformed",
        }
    }
}

impl From<SourceError> for FeedError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Network(detail) => FeedError::Unavailable(detail),
            SourceError::RateLimited => FeedError::RateLimited,
            SourceError::MalformedResponse(detail) => FeedError::Malformed(detail),
        }
    }
}

// =============================================================================
// VideoSource Trait
// =============================================================================

/// Port for fetching pages of feed items.
///
/// # Thread Safety
///
/// Implementations are shared behind an `Arc` and called from spawned tasks,
/// so they must be `Send + Sync`.
pub trait VideoSource: Send + Sync {
    /// Fetches the page of `query` that starts at `cursor`.
    ///
    /// The first page is requested with [`Cursor::start`].
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the provider cannot be reached or
    /// answers with an unusable payload.
    fn fetch_page(&self, query: &FeedQuery, cursor: &Cursor)
        -> BoxFuture<'static, Result<Page, SourceError>>;
}
