// SPDX-License-Identifier: MPL-2.0
//! Single-shot rearmable timer backed by a tokio task.

use std::time::Instant;
use tokio::task::JoinHandle;

/// At most one pending timer; scheduling again aborts the previous one.
///
/// Dropping the task aborts the pending timer.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fire` at `deadline`, replacing any pending timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, deadline: Instant, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let deadline = tokio::time::Instant::from_std(deadline);
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fire();
        }));
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns true while a timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
