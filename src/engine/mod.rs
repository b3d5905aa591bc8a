// SPDX-License-Identifier: MPL-2.0
//! The video feed engine.
//!
//! - [`core`]: synchronous [`FeedEngine`] mapping messages to effects
//! - [`runtime`]: tokio actor and the [`EngineHandle`] API
//! - [`scheduler`]: rearmable timers used by the runtime
//! - [`events`]: [`FeedEvent`] and [`FeedStatus`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use veilfeed::engine::{Collaborators, EngineConfig, EngineHandle};
//! use veilfeed::infrastructure::MemorySource;
//!
//! # async fn demo() -> veilfeed::error::Result<()> {
//! let source = Arc::new(MemorySource::new(Vec::new(), 10));
//! let handle = EngineHandle::spawn(EngineConfig::default(), Collaborators::new(source));
//! handle.initialize("creator", None)?;
//! handle.settle().await?;
//! println!("{} videos", handle.current_feed_list().len());
//! handle.stop().await
//! # }
//! ```

pub mod core;
pub mod events;
pub mod runtime;
pub mod scheduler;

pub use self::core::{Effect, EngineConfig, FeedEngine, FeedSettings, Message};
pub use events::{FeedEvent, FeedStatus};
pub use runtime::{Collaborators, EngineHandle, EngineSnapshot};
pub use scheduler::ScheduledTask;
