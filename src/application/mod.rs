// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports the feed engine talks through.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The engine only ever holds `Arc<dyn Port>` handles
//!
//! # Example
//!
//! ```ignore
//! use veilfeed::application::port::VideoSource;
//!
//! // Infrastructure implements the port trait
//! struct HttpSource { /* ... */ }
//! impl VideoSource for HttpSource { /* ... */ }
//! ```

pub mod port;
