// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! - [`memory_source`]: fixture-backed [`VideoSource`] used by the demo binary
//!
//! [`VideoSource`]: crate::application::port::VideoSource

pub mod memory_source;

pub use memory_source::MemorySource;
