// SPDX-License-Identifier: MPL-2.0
//! Tokio actor hosting a [`FeedEngine`].
//!
//! One task owns the engine. Every public call on [`EngineHandle`] becomes a
//! command on an unbounded channel; fetch completions and timer expiries
//! re-enter through the same channel, so the engine sees a single ordered
//! stream of messages.
//!
//! After each command the actor publishes an [`EngineSnapshot`] on a `watch`
//! channel, which backs the synchronous `current_*` queries.

use crate::application::port::{
    CoverPreloader, DetachedSurface, EngagementSink, NoopPreloader, PlaybackSurface, SilentSink,
    VideoSource,
};
use crate::domain::feed::{FeedQuery, NavigationInfo, PaginationFlags};
use crate::domain::video::{PlaybackRate, VideoId, VideoItem};
use crate::engine::core::{Effect, EngineConfig, FeedEngine, FeedSettings, Message};
use crate::engine::events::{FeedEvent, FeedStatus};
use crate::engine::scheduler::ScheduledTask;
use crate::error::{Error, Result};
use crate::feed::{rate, AlertLedger, Claim, InputEvent, Key, NavIntent, StateSave};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::AbortHandle;

/// Capacity of the event broadcast; slow subscribers lag beyond this.
const EVENT_CAPACITY: usize = 256;

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

// =============================================================================
// Collaborators
// =============================================================================

/// External services the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn VideoSource>,
    pub preloader: Arc<dyn CoverPreloader>,
    pub surface: Arc<dyn PlaybackSurface>,
    pub engagement: Arc<dyn EngagementSink>,
}

impl Collaborators {
    /// Collaborators with only a source; everything else is a no-op.
    #[must_use]
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self {
            source,
            preloader: Arc::new(NoopPreloader),
            surface: Arc::new(DetachedSurface),
            engagement: Arc::new(SilentSink),
        }
    }

    #[must_use]
    pub fn with_preloader(mut self, preloader: Arc<dyn CoverPreloader>) -> Self {
        self.preloader = preloader;
        self
    }

    #[must_use]
    pub fn with_surface(mut self, surface: Arc<dyn PlaybackSurface>) -> Self {
        self.surface = surface;
        self
    }

    #[must_use]
    pub fn with_engagement(mut self, engagement: Arc<dyn EngagementSink>) -> Self {
        self.engagement = engagement;
        self
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of the engine state after the last processed command.
#[derive(Debug, Clone, Default)]
pub struct EngineSnapshot {
    pub feed: Arc<[VideoItem]>,
    pub feed_revision: u64,
    pub active_index: usize,
    pub pagination: PaginationFlags,
    pub status: FeedStatus,
    pub controls_visible: bool,
    pub render_window: Vec<usize>,
    pub navigation: NavigationInfo,
    pub muted: bool,
    pub playback_rate: PlaybackRate,
}

impl EngineSnapshot {
    fn capture(engine: &FeedEngine, previous: &EngineSnapshot) -> Self {
        let feed_revision = engine.feed().revision();
        let feed = if feed_revision == previous.feed_revision && !previous.feed.is_empty() {
            Arc::clone(&previous.feed)
        } else {
            Arc::from(engine.feed().items())
        };
        Self {
            feed,
            feed_revision,
            active_index: engine.active_index(),
            pagination: engine.pagination_flags(),
            status: engine.status().clone(),
            controls_visible: engine.controls_visible(),
            render_window: engine.render_window(),
            navigation: engine.navigation_info(),
            muted: engine.muted(),
            playback_rate: engine.playback_rate(),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

enum Command {
    Message(Message),
    Input {
        event: InputEvent,
        reply: Option<oneshot::Sender<bool>>,
    },
    RateToggle,
    Settle(oneshot::Sender<()>),
    Stop(oneshot::Sender<()>),
}

// =============================================================================
// EngineHandle
// =============================================================================

/// Handle to a running feed engine.
///
/// Dropping the handle aborts the engine task and its timers; use
/// [`stop`](Self::stop) for an orderly shutdown.
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<EngineSnapshot>,
    events: broadcast::Sender<FeedEvent>,
    task: AbortHandle,
}

impl EngineHandle {
    /// Spawns an engine with an in-memory alert ledger.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(config: EngineConfig, collaborators: Collaborators) -> Self {
        let ledger = AlertLedger::in_memory(config.alert_cooldown);
        Self::spawn_with_ledger(config, collaborators, ledger)
    }

    /// Spawns an engine whose alert cooldown is tracked by `ledger`.
    #[must_use]
    pub fn spawn_with_ledger(
        config: EngineConfig,
        collaborators: Collaborators,
        ledger: AlertLedger,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let startup_alert_chance = config.startup_alert_chance;
        let engine = FeedEngine::new(config);
        let initial = EngineSnapshot::capture(&engine, &EngineSnapshot::default());
        let (snapshot_tx, snapshot) = watch::channel(initial);

        let actor = Actor {
            engine,
            collaborators,
            ledger,
            startup_alert_chance,
            commands: commands.clone(),
            events: events.clone(),
            snapshot: snapshot_tx,
            auto_hide_timer: ScheduledTask::new(),
            rate_timer: ScheduledTask::new(),
        };
        let task = tokio::spawn(actor.run(receiver)).abort_handle();

        Self {
            commands,
            snapshot,
            events,
            task,
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Starts the feed for `query`, optionally opening on `deep_link`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQuery`] for a blank query, [`Error::EngineStopped`]
    /// after shutdown.
    pub fn initialize(&self, query: &str, deep_link: Option<VideoId>) -> Result<()> {
        let query =
            FeedQuery::parse(query).ok_or_else(|| Error::InvalidQuery(query.to_string()))?;
        self.send(Command::Message(Message::Initialize { query, deep_link }))
    }

    /// Forwards a navigation intent from an on-screen control.
    pub fn on_gesture(&self, intent: NavIntent) -> Result<()> {
        self.send(Command::Message(Message::Intent(intent)))
    }

    pub fn on_keyboard(&self, key: Key) -> Result<()> {
        self.send(Command::Input {
            event: InputEvent::Key(key),
            reply: None,
        })
    }

    /// Forwards raw input. Resolves to true when the host must suppress its
    /// default scrolling for this event.
    pub async fn on_input(&self, event: InputEvent) -> Result<bool> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Input {
            event,
            reply: Some(reply),
        })?;
        response.await.map_err(|_| Error::EngineStopped)
    }

    pub fn on_pointer_activity(&self) -> Result<()> {
        self.send(Command::Message(Message::PointerActivity))
    }

    pub fn on_rate_toggle_request(&self) -> Result<()> {
        self.send(Command::RateToggle)
    }

    pub fn on_mute_toggle_request(&self) -> Result<()> {
        self.send(Command::Message(Message::MuteToggleRequested))
    }

    pub fn on_settings_change(&self, settings: FeedSettings) -> Result<()> {
        self.send(Command::Message(Message::SettingsChanged(settings)))
    }

    pub fn on_playback_progress(&self, index: usize, seconds: f64) -> Result<()> {
        self.send(Command::Message(Message::PlaybackProgress { index, seconds }))
    }

    /// Resolves once every command sent before it has been processed.
    pub async fn settle(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.send(Command::Settle(reply))?;
        done.await.map_err(|_| Error::EngineStopped)
    }

    /// Stops the engine: timers are cancelled, in-flight fetches are
    /// discarded and later calls fail with [`Error::EngineStopped`].
    pub async fn stop(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.send(Command::Stop(reply))?;
        done.await.map_err(|_| Error::EngineStopped)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::EngineStopped)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Receives every [`FeedEvent`] emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// A watch receiver over the engine snapshots.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn current_feed_list(&self) -> Arc<[VideoItem]> {
        Arc::clone(&self.snapshot.borrow().feed)
    }

    #[must_use]
    pub fn current_active_index(&self) -> usize {
        self.snapshot.borrow().active_index
    }

    #[must_use]
    pub fn current_pagination_flags(&self) -> PaginationFlags {
        self.snapshot.borrow().pagination
    }

    #[must_use]
    pub fn current_status(&self) -> FeedStatus {
        self.snapshot.borrow().status.clone()
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.snapshot.borrow().controls_visible
    }

    /// Indices that should currently be mounted.
    #[must_use]
    pub fn render_window(&self) -> Vec<usize> {
        self.snapshot.borrow().render_window.clone()
    }

    #[must_use]
    pub fn navigation_info(&self) -> NavigationInfo {
        self.snapshot.borrow().navigation
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.snapshot.borrow().muted
    }

    #[must_use]
    pub fn playback_rate(&self) -> PlaybackRate {
        self.snapshot.borrow().playback_rate
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("stopped", &self.commands.is_closed())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Actor
// =============================================================================

struct Actor {
    engine: FeedEngine,
    collaborators: Collaborators,
    ledger: AlertLedger,
    startup_alert_chance: f64,
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<FeedEvent>,
    snapshot: watch::Sender<EngineSnapshot>,
    auto_hide_timer: ScheduledTask,
    rate_timer: ScheduledTask,
}

impl Actor {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        let effects = self.engine.start(now());
        self.execute(effects);
        self.offer_startup_alert();
        self.publish();

        while let Some(command) = receiver.recv().await {
            match command {
                Command::Message(msg) => {
                    let effects = self.engine.handle(msg, now());
                    self.execute(effects);
                }
                Command::Input { event, reply } => {
                    let effects = self.engine.handle(Message::Input(event), now());
                    let suppress = effects.contains(&Effect::SuppressDefault);
                    self.execute(effects);
                    if let Some(reply) = reply {
                        let _ = reply.send(suppress);
                    }
                }
                Command::RateToggle => {
                    let captured = self.collaborators.surface.snapshot();
                    let effects = self
                        .engine
                        .handle(Message::RateToggleRequested(captured), now());
                    self.execute(effects);
                }
                Command::Settle(reply) => {
                    let _ = reply.send(());
                }
                Command::Stop(reply) => {
                    let effects = self.engine.stop();
                    self.execute(effects);
                    self.publish();
                    let _ = reply.send(());
                    break;
                }
            }
            self.publish();
        }
        tracing::debug!("feed engine task finished");
    }

    fn publish(&self) {
        self.snapshot.send_modify(|snapshot| {
            *snapshot = EngineSnapshot::capture(&self.engine, snapshot);
        });
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(ticket) => self.spawn_fetch(ticket),
                Effect::WarmCover { index, url } => self.spawn_warm(index, url),
                Effect::ArmAutoHide {
                    deadline,
                    generation,
                } => {
                    let commands = self.commands.clone();
                    self.auto_hide_timer.schedule(deadline, move || {
                        let _ = commands.send(Command::Message(Message::AutoHideElapsed {
                            generation,
                        }));
                    });
                }
                Effect::CancelAutoHide => self.auto_hide_timer.cancel(),
                Effect::ArmRateDebounce {
                    deadline,
                    generation,
                } => {
                    let commands = self.commands.clone();
                    self.rate_timer.schedule(deadline, move || {
                        let _ = commands.send(Command::Message(Message::RateDebounceElapsed {
                            generation,
                        }));
                    });
                }
                Effect::CancelRateDebounce => self.rate_timer.cancel(),
                Effect::ApplyRate(pending) => {
                    rate::reconcile(
                        self.collaborators.surface.as_ref(),
                        &pending,
                        self.engine.rate_drift_tolerance_secs(),
                    );
                }
                Effect::ApplyMute(muted) => self.collaborators.surface.set_muted(muted),
                Effect::EngagementMilestone { count } => {
                    if let Claim::Granted { save } = self.ledger.try_claim(Utc::now()) {
                        persist(save);
                        tracing::info!(count, "engagement milestone delivered");
                        self.collaborators.engagement.milestone_reached(count);
                    }
                }
                Effect::SuppressDefault => {}
                Effect::Emit(event) => {
                    // No subscribers is fine.
                    let _ = self.events.send(event);
                }
            }
        }
    }

    fn offer_startup_alert(&mut self) {
        let roll = rand::random::<f64>();
        let claim = self
            .ledger
            .try_claim_startup(Utc::now(), roll, self.startup_alert_chance);
        if let Claim::Granted { save } = claim {
            persist(save);
            tracing::info!("startup engagement alert delivered");
            self.collaborators.engagement.startup_alert();
        }
    }

    fn spawn_fetch(&self, ticket: crate::feed::FetchTicket) {
        tracing::debug!(
            query = %ticket.query,
            cursor = %ticket.cursor,
            kind = ?ticket.kind,
            "fetching page"
        );
        let request = self
            .collaborators
            .source
            .fetch_page(&ticket.query, &ticket.cursor);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = request.await;
            let _ = commands.send(Command::Message(Message::FetchCompleted { ticket, result }));
        });
    }

    fn spawn_warm(&self, index: usize, url: String) {
        tracing::trace!(index, %url, "warming cover");
        let warm = self.collaborators.preloader.warm(&url);
        tokio::spawn(async move {
            if let Err(err) = warm.await {
                tracing::debug!(index, %url, error = %err, "cover warm-up failed");
            }
        });
    }
}

/// Writes the alert timestamp on the blocking pool, off the actor task.
fn persist(save: Option<StateSave>) {
    if let Some(save) = save {
        tokio::task::spawn_blocking(move || save.run());
    }
}
