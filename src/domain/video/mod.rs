// SPDX-License-Identifier: MPL-2.0
//! Video domain types.
//!
//! This module contains feed items and playback value objects that are
//! independent of any presentation or infrastructure concerns.

pub mod item;
pub mod newtypes;
pub mod playback;

// Re-export commonly used types
pub use item::{Author, Counters, MusicInfo, VideoId, VideoItem};
pub use newtypes::PlaybackRate;
pub use playback::PlaybackSnapshot;
