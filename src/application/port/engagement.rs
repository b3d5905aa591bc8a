// SPDX-License-Identifier: MPL-2.0
//! Engagement notification port definition.

/// Port receiving engagement milestones (e.g. to show a support banner).
///
/// The engine only calls it when the alert cooldown allows; presentation is
/// entirely up to the implementation.
pub trait EngagementSink: Send + Sync {
    /// Called with the number of swipe-driven transitions so far.
    fn milestone_reached(&self, count: u64);

    /// Called when the engine start drew an alert.
    fn startup_alert(&self) {}
}

/// Sink that drops every milestone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl EngagementSink for SilentSink {
    fn milestone_reached(&self, _count: u64) {}
}
