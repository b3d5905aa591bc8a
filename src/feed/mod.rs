// SPDX-License-Identifier: MPL-2.0
//! Feed sub-components.
//!
//! Each controller is a plain synchronous state machine with injected time.
//! The [`engine`](crate::engine) composes them and turns their decisions
//! into side effects.
//!
//! - [`gesture`]: raw input to navigation intents, with cooldown
//! - [`navigation`]: active index, positions, mute and rate
//! - [`window`]: mount eligibility and cover preload marks
//! - [`pagination`]: cursor-based fetching and response reconciliation
//! - [`auto_hide`]: overlay controls countdown
//! - [`rate`]: debounced playback-rate toggle
//! - [`engagement`]: swipe milestones and alert cooldown

pub mod auto_hide;
pub mod engagement;
pub mod gesture;
pub mod navigation;
pub mod pagination;
pub mod rate;
pub mod window;

pub use auto_hide::{AutoHideSettings, AutoHideTimer, AutoHideUpdate, TimerCommand};
pub use engagement::{AlertLedger, Claim, EngagementTracker, StateSave};
pub use gesture::{
    GestureConfig, GestureEffect, GestureRecognizer, InputEvent, IntentSource, Key, NavIntent,
    SwipeDirection,
};
pub use navigation::{NavigationController, Transition, TransitionCause};
pub use pagination::{FetchOutcome, FetchTicket, FirstPageOutcome, PaginationController};
pub use rate::{PendingRate, RateController, RateToggle, ReconcileReport};
pub use window::FeedWindow;
