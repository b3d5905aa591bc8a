// SPDX-License-Identifier: MPL-2.0
//! Domain error types.
//!
//! This module provides pure domain error types that are independent
//! of external crates and infrastructure concerns.

use std::fmt;

/// Why the first page of a feed could not be shown.
///
/// Only first-page failures are surfaced to the user; later pages fail
/// silently by ending pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The source could not be reached.
    Unavailable(String),

    /// The source asked us to slow down.
    RateLimited,

    /// The source answered with something we could not understand.
    Malformed(String),
}

impl FeedError {
    /// Returns the i18n message key for this error type.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            FeedError::Unavailable(_) => "error-load-feed-unavailable",
            FeedError::RateLimited => "error-load-feed-rate-limited",
            FeedError::Malformed(_) => "error-load-feed-malformed",
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Unavailable(detail) => write!(f, "Failed to load videos: {detail}"),
            FeedError::RateLimited => write!(f, "Failed to load videos: too many requests"),
            FeedError::Malformed(detail) => {
                write!(f, "Failed to load videos: unexpected response ({detail})")
            }
        }
    }
}

impl std::error::Error for FeedError {}
