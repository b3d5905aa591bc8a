// SPDX-License-Identifier: MPL-2.0
//! Feed query and pagination token.

use std::fmt;

/// A normalized feed query: an account handle with a leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedQuery(String);

impl FeedQuery {
    /// Normalizes user input into a query.
    ///
    /// Surrounding whitespace is trimmed and a leading `@` is added when
    /// missing. Returns `None` for blank input (including a lone `@`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let handle = trimmed.trim_start_matches('@').trim();
        if handle.is_empty() {
            return None;
        }
        Some(Self(format!("@{handle}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The handle without its leading `@`.
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for FeedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque pagination token issued by the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Cursor of the first page.
    #[must_use]
    pub fn start() -> Self {
        Self("0".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
