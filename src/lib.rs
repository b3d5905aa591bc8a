// SPDX-License-Identifier: MPL-2.0
//! `veilfeed` is a headless engine for vertically swiped short-video feeds.
//!
//! It turns pointer, touch and keyboard input into navigation over a
//! cursor-paginated list of videos, keeps a small window of neighbours
//! mounted and preloaded, fetches the next page before the tail is reached,
//! and coordinates shared playback state (mute, rate, positions) with the
//! host's video surface.
//!
//! The entry point is [`EngineHandle`], which runs a [`engine::FeedEngine`]
//! on a tokio task. Remote providers plug in through the traits in
//! [`application::port`].

#![doc(html_root_url = "https://docs.rs/veilfeed/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod feed;
pub mod infrastructure;
pub mod paths;
pub mod persisted_state;

#[cfg(test)]
mod test_utils;

pub use engine::EngineHandle;
pub use error::{Error, Result};
