// SPDX-License-Identifier: MPL-2.0
//! Auto-hide sub-component for overlay controls.
//!
//! The timer itself lives in the runtime; this state machine only decides
//! when to arm or cancel it and ignores expiries of superseded arms.

use crate::config::DEFAULT_AUTO_HIDE_ENABLED;
use crate::domain::ui::AutoHideDelay;
use std::time::Instant;

/// User-facing auto-hide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHideSettings {
    pub enabled: bool,
    pub delay: AutoHideDelay,
}

impl Default for AutoHideSettings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTO_HIDE_ENABLED,
            delay: AutoHideDelay::default(),
        }
    }
}

/// What the runtime should do with the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Unchanged,
    /// (Re)arm the countdown; the expiry must carry `generation` back.
    Arm { deadline: Instant, generation: u64 },
    Cancel,
}

/// Outcome of one auto-hide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHideUpdate {
    /// New visibility, if it changed.
    pub visibility: Option<bool>,
    pub timer: TimerCommand,
}

impl AutoHideUpdate {
    const NONE: Self = Self {
        visibility: None,
        timer: TimerCommand::Unchanged,
    };
}

/// Overlay controls visibility state.
#[derive(Debug, Clone)]
pub struct AutoHideTimer {
    settings: AutoHideSettings,
    visible: bool,
    generation: u64,
    deadline: Option<Instant>,
}

impl Default for AutoHideTimer {
    fn default() -> Self {
        Self::new(AutoHideSettings::default())
    }
}

impl AutoHideTimer {
    /// Controls start visible; call [`start`](Self::start) to arm the first countdown.
    #[must_use]
    pub fn new(settings: AutoHideSettings) -> Self {
        Self {
            settings,
            visible: true,
            generation: 0,
            deadline: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> AutoHideSettings {
        self.settings
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Pending expiry, if a countdown is armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Arms the initial countdown when enabled.
    pub fn start(&mut self, now: Instant) -> AutoHideUpdate {
        if !self.settings.enabled {
            return AutoHideUpdate::NONE;
        }
        AutoHideUpdate {
            visibility: None,
            timer: self.arm(now),
        }
    }

    /// User activity: shows hidden controls and restarts the countdown.
    pub fn interact(&mut self, now: Instant) -> AutoHideUpdate {
        if !self.settings.enabled {
            return AutoHideUpdate::NONE;
        }
        AutoHideUpdate {
            visibility: self.show(),
            timer: self.arm(now),
        }
    }

    /// The countdown armed with `generation` elapsed.
    pub fn expire(&mut self, generation: u64) -> AutoHideUpdate {
        if !self.settings.enabled || generation != self.generation || self.deadline.is_none() {
            tracing::trace!(generation, current = self.generation, "ignoring stale auto-hide expiry");
            return AutoHideUpdate::NONE;
        }
        self.deadline = None;
        if !self.visible {
            return AutoHideUpdate::NONE;
        }
        self.visible = false;
        tracing::debug!("overlay controls hidden");
        AutoHideUpdate {
            visibility: Some(false),
            timer: TimerCommand::Unchanged,
        }
    }

    /// Replaces the settings, invalidating any pending countdown.
    pub fn apply_settings(&mut self, settings: AutoHideSettings, now: Instant) -> AutoHideUpdate {
        self.settings = settings;
        let visibility = self.show();
        let timer = if settings.enabled {
            self.arm(now)
        } else {
            self.cancel()
        };
        AutoHideUpdate { visibility, timer }
    }

    /// Cancels the countdown for good.
    pub fn shutdown(&mut self) -> AutoHideUpdate {
        AutoHideUpdate {
            visibility: None,
            timer: self.cancel(),
        }
    }

    fn show(&mut self) -> Option<bool> {
        if self.visible {
            None
        } else {
            self.visible = true;
            tracing::debug!("overlay controls shown");
            Some(true)
        }
    }

    fn arm(&mut self, now: Instant) -> TimerCommand {
        self.generation += 1;
        let deadline = now + self.settings.delay.as_duration();
        self.deadline = Some(deadline);
        TimerCommand::Arm {
            deadline,
            generation: self.generation,
        }
    }

    fn cancel(&mut self) -> TimerCommand {
        self.generation += 1;
        self.deadline = None;
        TimerCommand::Cancel
    }
}
