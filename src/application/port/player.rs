// SPDX-License-Identifier: MPL-2.0
//! Playback surface port definition.
//!
//! This module defines the [`PlaybackSurface`] trait: the active video
//! element as seen by the engine. Only the operations needed to reconcile a
//! rate change are exposed; decoding and rendering stay outside.
//!
//! # Design Notes
//!
//! - Methods take `&self`; implementations use interior mutability since the
//!   surface is shared with the presentation layer
//! - All calls target whichever video is currently active

use crate::domain::video::{PlaybackRate, PlaybackSnapshot};

/// Port for the active video element.
pub trait PlaybackSurface: Send + Sync {
    /// Returns the current position and pause state, or `None` when no
    /// video surface is mounted.
    fn snapshot(&self) -> Option<PlaybackSnapshot>;

    /// Applies a playback rate to the active video.
    fn set_rate(&self, rate: PlaybackRate);

    /// Moves the active video to `position_secs`.
    fn seek(&self, position_secs: f64);

    /// Resumes a paused video.
    fn resume(&self);

    /// Applies the shared mute state. Surfaces without audio control may ignore it.
    fn set_muted(&self, _muted: bool) {}
}

/// Surface used when nothing is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSurface;

impl PlaybackSurface for DetachedSurface {
    fn snapshot(&self) -> Option<PlaybackSnapshot> {
        None
    }

    fn set_rate(&self, _rate: PlaybackRate) {}

    fn seek(&self, _position_secs: f64) {}

    fn resume(&self) {}
}
