// SPDX-License-Identifier: MPL-2.0
//! Cursor-based infinite-scroll pagination.
//!
//! The controller hands out [`FetchTicket`]s and later reconciles the
//! matching responses into the [`FeedList`]. A ticket carries the request
//! generation and cursor it was issued for; answers to anything but the
//! current request are discarded.
//!
//! # Failure policy
//!
//! - First page: the error is surfaced and the feed stays empty
//! - Later pages: pagination ends for the query, silently (fails closed)

use crate::application::port::SourceError;
use crate::config::DEFAULT_PREFETCH_DISTANCE;
use crate::domain::error::FeedError;
use crate::domain::feed::{Cursor, FeedList, FeedQuery, FetchKind, Page, PaginationFlags};

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: FeedQuery,
    pub cursor: Cursor,
    pub kind: FetchKind,
}

/// What a completed first-page fetch means for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstPageOutcome {
    /// The feed now holds `len` items.
    Loaded { len: usize },
    /// The source answered with nothing.
    NoResults,
    /// The source failed; the feed is empty.
    Failed(FeedError),
}

/// Result of reconciling a fetch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    FirstPage(FirstPageOutcome),
    /// A later page was merged; `added` new items reached the tail.
    NextPage { added: usize },
    /// A later page failed; pagination is over for this query.
    NextPageFailed(SourceError),
    /// The response belonged to a superseded request.
    Stale,
}

/// Pagination state for the current query.
#[derive(Debug, Clone)]
pub struct PaginationController {
    query: Option<FeedQuery>,
    cursor: Option<Cursor>,
    has_more: bool,
    in_flight: Option<FetchKind>,
    generation: u64,
    prefetch_distance: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PREFETCH_DISTANCE)
    }
}

impl PaginationController {
    #[must_use]
    pub fn new(prefetch_distance: usize) -> Self {
        Self {
            query: None,
            cursor: None,
            has_more: false,
            in_flight: None,
            generation: 0,
            prefetch_distance: prefetch_distance.max(1),
        }
    }

    #[must_use]
    pub fn query(&self) -> Option<&FeedQuery> {
        self.query.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts over for `query`: clears the feed and issues the first-page ticket.
    pub fn begin_first_page(&mut self, query: FeedQuery, feed: &mut FeedList) -> FetchTicket {
        feed.clear();
        self.generation += 1;
        self.cursor = None;
        self.has_more = false;
        self.in_flight = Some(FetchKind::FirstPage);
        self.query = Some(query.clone());
        tracing::debug!(generation = self.generation, %query, "first page requested");
        FetchTicket {
            generation: self.generation,
            query,
            cursor: Cursor::start(),
            kind: FetchKind::FirstPage,
        }
    }

    /// Issues the next-page ticket, or `None` if nothing should be fetched.
    pub fn begin_next_page(&mut self) -> Option<FetchTicket> {
        if !self.has_more || self.in_flight.is_some() {
            return None;
        }
        let query = self.query.clone()?;
        let cursor = self.cursor.clone()?;
        self.in_flight = Some(FetchKind::NextPage);
        tracing::debug!(generation = self.generation, %cursor, "next page requested");
        Some(FetchTicket {
            generation: self.generation,
            query,
            cursor,
            kind: FetchKind::NextPage,
        })
    }

    /// Returns true when the active index is close enough to the tail to
    /// request the next page.
    #[must_use]
    pub fn should_fetch_next(&self, active: usize, len: usize) -> bool {
        active + self.prefetch_distance >= len && self.has_more && self.in_flight.is_none()
    }

    /// Reconciles a fetch response into `feed`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page, SourceError>,
        feed: &mut FeedList,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding response of a superseded query"
            );
            return FetchOutcome::Stale;
        }
        if ticket.kind == FetchKind::NextPage && self.cursor.as_ref() != Some(&ticket.cursor) {
            tracing::debug!(cursor = %ticket.cursor, "discarding response for an old cursor");
            self.in_flight = None;
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match (ticket.kind, result) {
            (FetchKind::FirstPage, Ok(page)) => {
                let len = feed.replace(page.items);
                if len == 0 {
                    self.cursor = None;
                    self.has_more = false;
                    return FetchOutcome::FirstPage(FirstPageOutcome::NoResults);
                }
                self.has_more = page.has_more && page.next_cursor.is_some();
                self.cursor = page.next_cursor;
                FetchOutcome::FirstPage(FirstPageOutcome::Loaded { len })
            }
            (FetchKind::FirstPage, Err(err)) => {
                tracing::warn!(error = %err, query = %ticket.query, "first page failed");
                feed.clear();
                self.cursor = None;
                self.has_more = false;
                FetchOutcome::FirstPage(FirstPageOutcome::Failed(err.into()))
            }
            (FetchKind::NextPage, Ok(page)) => {
                if page.items.is_empty() {
                    tracing::debug!(cursor = %ticket.cursor, "empty page ends pagination");
                    self.has_more = false;
                    return FetchOutcome::NextPage { added: 0 };
                }
                let added = feed.append(page.items);
                let stuck = added == 0 && page.next_cursor.as_ref() == Some(&ticket.cursor);
                if stuck {
                    tracing::warn!(cursor = %ticket.cursor, "cursor did not advance, pagination stopped");
                }
                self.has_more = !stuck && page.has_more && page.next_cursor.is_some();
                self.cursor = page.next_cursor;
                FetchOutcome::NextPage { added }
            }
            (FetchKind::NextPage, Err(err)) => {
                tracing::warn!(error = %err, cursor = %ticket.cursor, "next page failed, pagination stopped");
                self.has_more = false;
                FetchOutcome::NextPageFailed(err)
            }
        }
    }

    /// Flags for rendering the pagination state at `active` of `len` items.
    #[must_use]
    pub fn flags(&self, active: usize, len: usize) -> PaginationFlags {
        PaginationFlags {
            has_more: self.has_more,
            is_fetching: self.is_fetching(),
            show_loading_more: self.in_flight == Some(FetchKind::NextPage)
                && active + self.prefetch_distance >= len,
        }
    }

    /// Invalidates every outstanding ticket and forgets the query.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.query = None;
        self.cursor = None;
        self.has_more = false;
        self.in_flight = None;
    }
}
