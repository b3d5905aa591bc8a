// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters and
//! the presentation layer implement. These traits use only domain types,
//! keeping the feed engine independent of concrete transports and players.
//!
//! # Available Ports
//!
//! - [`source`]: Cursor-paginated video source
//! - [`preload`]: Cover image warm-up
//! - [`player`]: Active video element (rate, seek, resume)
//! - [`engagement`]: Engagement milestone notifications
//!
//! # Design Notes
//!
//! - All traits are `Send + Sync` and shared behind `Arc<dyn _>`
//! - Network-bound operations return `BoxFuture<'static, _>` so the engine
//!   can spawn them without borrowing the adapter
//! - Playback operations are synchronous; they only poke the active element

pub mod engagement;
pub mod player;
pub mod preload;
pub mod source;

// Re-export main types for convenience
pub use engagement::{EngagementSink, SilentSink};
pub use player::{DetachedSurface, PlaybackSurface};
pub use preload::{CoverPreloader, NoopPreloader};
pub use source::{SourceError, VideoSource};
