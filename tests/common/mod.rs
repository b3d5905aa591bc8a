// SPDX-License-Identifier: MPL-2.0
//! Shared mocks for the engine integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Semaphore;

use veilfeed::application::port::{EngagementSink, PlaybackSurface, SourceError, VideoSource};
use veilfeed::domain::feed::{Cursor, FeedQuery, Page};
use veilfeed::domain::video::{Author, PlaybackRate, PlaybackSnapshot, VideoItem};
use veilfeed::engine::{Collaborators, EngineConfig, EngineHandle};

/// Videos `{handle}-{start}` up to `{handle}-{end - 1}`.
pub fn videos(handle: &str, range: std::ops::Range<usize>) -> Vec<VideoItem> {
    range
        .map(|n| {
            let id = format!("{handle}-{n}");
            let mut item = VideoItem::new(
                id.as_str(),
                format!("/covers/{id}.jpg"),
                format!("/media/{id}.mp4"),
            );
            item.title = format!("Video {n}");
            item.author = Author {
                id: format!("author-{handle}"),
                handle: handle.to_string(),
                display_name: handle.to_string(),
                avatar_url: String::new(),
            };
            item
        })
        .collect()
}

/// Lets spawned fetches and timers reach the engine, then waits for it to
/// process everything queued.
pub async fn drain(handle: &EngineHandle) {
    for _ in 0..8 {
        tokio::task::yield_now().await;
        handle.settle().await.expect("engine running");
    }
}

/// Drains the engine, advances the paused clock by `millis` and drains again.
pub async fn advance(handle: &EngineHandle, millis: u64) {
    drain(handle).await;
    tokio::time::advance(Duration::from_millis(millis)).await;
    drain(handle).await;
}

// =============================================================================
// ScriptedSource
// =============================================================================

/// Source answering from a table keyed by query and cursor.
///
/// Unknown keys answer with an empty last page. A held key does not answer
/// until [`release`](Self::release) is called.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<(String, String), Result<Page, SourceError>>>,
    gates: Mutex<HashMap<(String, String), Arc<Semaphore>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, query: &str, cursor: &str, response: Result<Page, SourceError>) {
        self.responses
            .lock()
            .unwrap()
            .insert((query.to_string(), cursor.to_string()), response);
    }

    pub fn hold(&self, query: &str, cursor: &str) {
        self.gates.lock().unwrap().insert(
            (query.to_string(), cursor.to_string()),
            Arc::new(Semaphore::new(0)),
        );
    }

    pub fn release(&self, query: &str, cursor: &str) {
        if let Some(gate) = self
            .gates
            .lock()
            .unwrap()
            .get(&(query.to_string(), cursor.to_string()))
        {
            gate.add_permits(1);
        }
    }

    /// `(query, cursor)` of every fetch so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cursors(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, cursor)| cursor).collect()
    }
}

impl VideoSource for ScriptedSource {
    fn fetch_page(
        &self,
        query: &FeedQuery,
        cursor: &Cursor,
    ) -> BoxFuture<'static, Result<Page, SourceError>> {
        let key = (query.as_str().to_string(), cursor.as_str().to_string());
        self.calls.lock().unwrap().push(key.clone());
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(Page::last(Vec::new())));
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _permit = gate.acquire().await;
            }
            response
        })
    }
}

// =============================================================================
// RecordingSurface
// =============================================================================

#[derive(Debug, Default)]
struct SurfaceState {
    snapshot: Option<PlaybackSnapshot>,
    rates: Vec<f64>,
    seeks: Vec<f64>,
    resumes: usize,
    muted: Vec<bool>,
}

/// Surface that records calls. Changing the rate makes it jump to 0 and
/// pause, like some players do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    pub fn playing_at(position_secs: f64) -> Arc<Self> {
        let surface = Self::default();
        surface.state.lock().unwrap().snapshot = Some(PlaybackSnapshot::playing(position_secs));
        Arc::new(surface)
    }

    /// What the host player reports from now on, e.g. after mounting the
    /// next video.
    pub fn set_snapshot(&self, snapshot: PlaybackSnapshot) {
        self.state.lock().unwrap().snapshot = Some(snapshot);
    }

    pub fn rates(&self) -> Vec<f64> {
        self.state.lock().unwrap().rates.clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.state.lock().unwrap().seeks.clone()
    }

    pub fn resumes(&self) -> usize {
        self.state.lock().unwrap().resumes
    }

    pub fn muted(&self) -> Vec<bool> {
        self.state.lock().unwrap().muted.clone()
    }
}

impl PlaybackSurface for RecordingSurface {
    fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.state.lock().unwrap().snapshot
    }

    fn set_rate(&self, rate: PlaybackRate) {
        let mut state = self.state.lock().unwrap();
        state.rates.push(rate.value());
        state.snapshot = Some(PlaybackSnapshot::paused(0.0));
    }

    fn seek(&self, position_secs: f64) {
        let mut state = self.state.lock().unwrap();
        state.seeks.push(position_secs);
        if let Some(snapshot) = state.snapshot.as_mut() {
            snapshot.position_secs = position_secs;
        }
    }

    fn resume(&self) {
        let mut state = self.state.lock().unwrap();
        state.resumes += 1;
        if let Some(snapshot) = state.snapshot.as_mut() {
            snapshot.paused = false;
        }
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().unwrap().muted.push(muted);
    }
}

// =============================================================================
// CountingSink
// =============================================================================

#[derive(Debug, Default)]
pub struct CountingSink {
    milestones: Mutex<Vec<u64>>,
    startup_alerts: Mutex<usize>,
}

impl CountingSink {
    pub fn milestones(&self) -> Vec<u64> {
        self.milestones.lock().unwrap().clone()
    }

    pub fn startup_alerts(&self) -> usize {
        *self.startup_alerts.lock().unwrap()
    }
}

impl EngagementSink for CountingSink {
    fn milestone_reached(&self, count: u64) {
        self.milestones.lock().unwrap().push(count);
    }

    fn startup_alert(&self) {
        *self.startup_alerts.lock().unwrap() += 1;
    }
}

/// Spawns an engine over `source` with default settings.
pub fn spawn(source: Arc<ScriptedSource>) -> EngineHandle {
    EngineHandle::spawn(EngineConfig::default(), Collaborators::new(source))
}
