// SPDX-License-Identifier: MPL-2.0
//! Cover preloading port definition.

use super::SourceError;
use futures_util::future::BoxFuture;

/// Port for warming cover images ahead of display.
///
/// Only the still cover is fetched; video payloads are never preloaded.
/// Callers spawn the returned future and do not wait for it.
pub trait CoverPreloader: Send + Sync {
    /// Starts fetching the cover at `url` into whatever cache backs the display.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the image could not be fetched. Callers
    /// only log it.
    fn warm(&self, url: &str) -> BoxFuture<'static, Result<(), SourceError>>;
}

/// Preloader that does nothing, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreloader;

impl CoverPreloader for NoopPreloader {
    fn warm(&self, _url: &str) -> BoxFuture<'static, Result<(), SourceError>> {
        Box::pin(async { Ok(()) })
    }
}
