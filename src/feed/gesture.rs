// SPDX-License-Identifier: MPL-2.0
//! Gesture recognition sub-component.
//!
//! Turns raw pointer, touch and keyboard input into at most one
//! [`NavIntent`] per gesture. Time is always injected so the cooldown can be
//! driven deterministically.

use crate::config::{DEFAULT_GESTURE_COOLDOWN, DEFAULT_SWIPE_THRESHOLD_PX};
use std::time::{Duration, Instant};

/// Direction of a navigation intent.
///
/// `Up` is a finger moving upwards, which advances to the next video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Advance to the next video.
    Up,
    /// Go back to the previous video.
    Down,
}

/// What produced a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentSource {
    /// Pointer drag or touch swipe.
    Swipe,
    /// Arrow keys or on-screen navigation buttons.
    Keyboard,
}

/// A request to move the active index by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavIntent {
    pub direction: SwipeDirection,
    pub source: IntentSource,
}

impl NavIntent {
    #[must_use]
    pub fn swipe(direction: SwipeDirection) -> Self {
        Self {
            direction,
            source: IntentSource::Swipe,
        }
    }

    #[must_use]
    pub fn keyboard(direction: SwipeDirection) -> Self {
        Self {
            direction,
            source: IntentSource::Keyboard,
        }
    }
}

/// Keys the recognizer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Other,
}

/// Raw input forwarded by the presentation layer. `y` is in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { y: f32 },
    PointerMove { y: f32 },
    PointerUp,
    TouchStart { y: f32 },
    TouchMove { y: f32 },
    TouchEnd,
    Key(Key),
}

impl InputEvent {
    /// Returns true for events that count as user activity for auto-hide.
    #[must_use]
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerMove { .. } | InputEvent::TouchStart { .. } | InputEvent::TouchMove { .. }
        )
    }
}

/// Result of feeding one event to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEffect {
    /// Nothing to do.
    None,
    /// A tracked move: the host must suppress its default scrolling.
    SuppressDefault,
    /// A gesture completed and passed the cooldown gate.
    Intent(NavIntent),
}

/// Tunables of the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum vertical travel for a drag to count.
    pub threshold_px: f32,
    /// Quiet period after an emitted intent.
    pub cooldown: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            cooldown: DEFAULT_GESTURE_COOLDOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackKind {
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    kind: TrackKind,
    start_y: f32,
    end_y: Option<f32>,
}

/// Gesture recognizer state.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    track: Option<Track>,
    cooldown_until: Option<Instant>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            track: None,
            cooldown_until: None,
        }
    }

    /// Feeds one input event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> GestureEffect {
        match event {
            InputEvent::PointerDown { y } => self.start(TrackKind::Pointer, y),
            InputEvent::TouchStart { y } => self.start(TrackKind::Touch, y),
            InputEvent::PointerMove { y } => self.track_move(TrackKind::Pointer, y),
            InputEvent::TouchMove { y } => self.track_move(TrackKind::Touch, y),
            InputEvent::PointerUp => self.release(TrackKind::Pointer, now),
            InputEvent::TouchEnd => self.release(TrackKind::Touch, now),
            InputEvent::Key(Key::ArrowUp) => {
                self.gate(NavIntent::keyboard(SwipeDirection::Down), now)
            }
            InputEvent::Key(Key::ArrowDown) => {
                self.gate(NavIntent::keyboard(SwipeDirection::Up), now)
            }
            InputEvent::Key(Key::Other) => GestureEffect::None,
        }
    }

    /// Passes an intent that did not come from raw input (e.g. a button)
    /// through the same cooldown gate.
    pub fn admit(&mut self, intent: NavIntent, now: Instant) -> Option<NavIntent> {
        match self.gate(intent, now) {
            GestureEffect::Intent(intent) => Some(intent),
            _ => None,
        }
    }

    /// Returns true while intents are being swallowed.
    #[must_use]
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Forgets any gesture in progress and the cooldown.
    pub fn reset(&mut self) {
        self.track = None;
        self.cooldown_until = None;
    }

    fn start(&mut self, kind: TrackKind, y: f32) -> GestureEffect {
        self.track = Some(Track {
            kind,
            start_y: y,
            end_y: None,
        });
        GestureEffect::None
    }

    fn track_move(&mut self, kind: TrackKind, y: f32) -> GestureEffect {
        match self.track.as_mut() {
            Some(track) if track.kind == kind => {
                track.end_y = Some(y);
                GestureEffect::SuppressDefault
            }
            _ => GestureEffect::None,
        }
    }

    fn release(&mut self, kind: TrackKind, now: Instant) -> GestureEffect {
        let Some(track) = self.track.take_if(|track| track.kind == kind) else {
            return GestureEffect::None;
        };
        let Some(end_y) = track.end_y else {
            return GestureEffect::None;
        };

        let delta = end_y - track.start_y;
        let direction = if delta <= -self.config.threshold_px {
            SwipeDirection::Up
        } else if delta >= self.config.threshold_px {
            SwipeDirection::Down
        } else {
            return GestureEffect::None;
        };
        self.gate(NavIntent::swipe(direction), now)
    }

    fn gate(&mut self, intent: NavIntent, now: Instant) -> GestureEffect {
        if self.is_cooling_down(now) {
            tracing::trace!(?intent, "intent swallowed by cooldown");
            return GestureEffect::None;
        }
        self.cooldown_until = Some(now + self.config.cooldown);
        GestureEffect::Intent(intent)
    }
}
