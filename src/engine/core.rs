// SPDX-License-Identifier: MPL-2.0
//! Synchronous feed engine.
//!
//! [`FeedEngine`] composes the feed sub-components and maps every incoming
//! [`Message`] to a list of [`Effect`]s. It never performs I/O, never spawns
//! and never reads the clock: the runtime does all of that and feeds results
//! back as messages. This keeps every ordering question answerable with
//! plain unit tests.

use crate::application::port::SourceError;
use crate::config::{
    Config, DEFAULT_ALERT_COOLDOWN, DEFAULT_ENGAGEMENT_INTERVAL, DEFAULT_PREFETCH_DISTANCE,
    DEFAULT_PRELOAD_RADIUS, DEFAULT_RATE_DEBOUNCE, DEFAULT_RATE_DRIFT_TOLERANCE_SECS,
};
use crate::domain::feed::{FeedList, FeedQuery, NavigationInfo, Page, PaginationFlags};
use crate::domain::video::{PlaybackRate, PlaybackSnapshot, VideoId, VideoItem};
use crate::engine::events::{FeedEvent, FeedStatus};
use crate::feed::{
    AutoHideSettings, AutoHideTimer, AutoHideUpdate, EngagementTracker, FeedWindow, FetchOutcome,
    FetchTicket, FirstPageOutcome, GestureConfig, GestureEffect, GestureRecognizer, InputEvent,
    NavIntent, NavigationController, PaginationController, PendingRate, RateController,
    TimerCommand, Transition,
};
use std::time::{Duration, Instant};

/// Settings that can change while the engine runs.
pub type FeedSettings = AutoHideSettings;

// =============================================================================
// Configuration
// =============================================================================

/// Everything the engine needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub auto_hide: AutoHideSettings,
    pub muted: bool,
    pub playback_rate: PlaybackRate,
    pub preload_radius: usize,
    pub prefetch_distance: usize,
    pub rate_debounce: Duration,
    pub rate_drift_tolerance_secs: f64,
    pub engagement_interval: u64,
    pub alert_cooldown: Duration,
    /// Probability that an engine start offers an engagement alert.
    pub startup_alert_chance: f64,
    /// Base URL for host-relative media URLs of fetched items.
    pub media_base_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EngineConfig {
    /// Builds the engine configuration from user preferences.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            gesture: GestureConfig::default(),
            auto_hide: config.auto_hide_settings(),
            muted: config.muted(),
            playback_rate: config.playback_rate(),
            preload_radius: DEFAULT_PRELOAD_RADIUS,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            rate_debounce: DEFAULT_RATE_DEBOUNCE,
            rate_drift_tolerance_secs: DEFAULT_RATE_DRIFT_TOLERANCE_SECS,
            engagement_interval: DEFAULT_ENGAGEMENT_INTERVAL,
            alert_cooldown: DEFAULT_ALERT_COOLDOWN,
            startup_alert_chance: config.startup_alert_chance(),
            media_base_url: config
                .feed
                .media_base_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

// =============================================================================
// Messages and Effects
// =============================================================================

/// Inputs of the engine, from the presentation layer or from the runtime.
#[derive(Debug, Clone)]
pub enum Message {
    /// Start (or restart) the feed for a query.
    Initialize {
        query: FeedQuery,
        deep_link: Option<VideoId>,
    },
    /// Raw pointer, touch or key input.
    Input(InputEvent),
    /// A ready-made intent (navigation buttons).
    Intent(NavIntent),
    /// Activity that only keeps the controls visible.
    PointerActivity,
    /// The rate button was pressed; carries the surface state at that moment.
    RateToggleRequested(Option<PlaybackSnapshot>),
    RateDebounceElapsed { generation: u64 },
    MuteToggleRequested,
    SettingsChanged(FeedSettings),
    PlaybackProgress { index: usize, seconds: f64 },
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Page, SourceError>,
    },
    AutoHideElapsed { generation: u64 },
}

/// Side effects requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchTicket),
    /// Warm the cover image of `index`.
    WarmCover { index: usize, url: String },
    ArmAutoHide { deadline: Instant, generation: u64 },
    CancelAutoHide,
    ArmRateDebounce { deadline: Instant, generation: u64 },
    CancelRateDebounce,
    ApplyRate(PendingRate),
    ApplyMute(bool),
    /// A swipe milestone; subject to the alert cooldown.
    EngagementMilestone { count: u64 },
    /// The input was a tracked move; the host must not scroll.
    SuppressDefault,
    Emit(FeedEvent),
}

// =============================================================================
// FeedEngine
// =============================================================================

/// The feed state machine.
#[derive(Debug)]
pub struct FeedEngine {
    media_base_url: Option<String>,
    feed: FeedList,
    status: FeedStatus,
    gesture: GestureRecognizer,
    navigation: NavigationController,
    window: FeedWindow,
    pagination: PaginationController,
    auto_hide: AutoHideTimer,
    rate: RateController,
    engagement: EngagementTracker,
    stopped: bool,
}

impl FeedEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            feed: FeedList::new(),
            status: FeedStatus::Idle,
            gesture: GestureRecognizer::new(config.gesture),
            navigation: NavigationController::new(config.muted, config.playback_rate),
            window: FeedWindow::new(config.preload_radius),
            pagination: PaginationController::new(config.prefetch_distance),
            auto_hide: AutoHideTimer::new(config.auto_hide),
            rate: RateController::new(config.rate_debounce, config.rate_drift_tolerance_secs),
            engagement: EngagementTracker::new(config.engagement_interval),
            media_base_url: config.media_base_url,
            stopped: false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn feed(&self) -> &FeedList {
        &self.feed
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.navigation.active_index()
    }

    #[must_use]
    pub fn active_item(&self) -> Option<&VideoItem> {
        self.feed.get(self.active_index())
    }

    #[must_use]
    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    #[must_use]
    pub fn pagination_flags(&self) -> PaginationFlags {
        self.pagination
            .flags(self.navigation.active_index(), self.feed.len())
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.auto_hide.is_visible()
    }

    #[must_use]
    pub fn render_window(&self) -> Vec<usize> {
        self.window
            .render_window(self.navigation.active_index(), self.feed.len())
    }

    #[must_use]
    pub fn navigation_info(&self) -> NavigationInfo {
        self.navigation.navigation_info(self.feed.len())
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.navigation.muted()
    }

    #[must_use]
    pub fn playback_rate(&self) -> PlaybackRate {
        self.navigation.playback_rate()
    }

    /// Stored playback position of `index` in seconds.
    #[must_use]
    pub fn position(&self, index: usize) -> f64 {
        self.navigation.position(index)
    }

    #[must_use]
    pub fn rate_drift_tolerance_secs(&self) -> f64 {
        self.rate.drift_tolerance_secs()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Arms the initial auto-hide countdown.
    pub fn start(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        let update = self.auto_hide.start(now);
        Self::push_auto_hide(update, &mut effects);
        effects
    }

    /// Tears everything down. Later messages are ignored.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        self.stopped = true;
        self.pagination.invalidate();
        self.rate.cancel();
        self.gesture.reset();
        self.feed.clear();
        self.window.reset();

        let mut effects = vec![Effect::CancelRateDebounce];
        Self::push_auto_hide(self.auto_hide.shutdown(), &mut effects);
        tracing::debug!("feed engine stopped");
        effects
    }

    // -------------------------------------------------------------------------
    // Message handling
    // -------------------------------------------------------------------------

    /// Processes one message at `now`.
    pub fn handle(&mut self, msg: Message, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.stopped {
            tracing::trace!(?msg, "message after stop ignored");
            return effects;
        }

        match msg {
            Message::Initialize { query, deep_link } => {
                self.initialize(query, deep_link, &mut effects);
            }
            Message::Input(event) => {
                if event.is_activity() {
                    Self::push_auto_hide(self.auto_hide.interact(now), &mut effects);
                }
                match self.gesture.handle(event, now) {
                    GestureEffect::None => {}
                    GestureEffect::SuppressDefault => effects.push(Effect::SuppressDefault),
                    GestureEffect::Intent(intent) => self.apply_intent(intent, now, &mut effects),
                }
            }
            Message::Intent(intent) => {
                if let Some(intent) = self.gesture.admit(intent, now) {
                    self.apply_intent(intent, now, &mut effects);
                }
            }
            Message::PointerActivity => {
                Self::push_auto_hide(self.auto_hide.interact(now), &mut effects);
            }
            Message::RateToggleRequested(captured) => {
                if self.feed.is_empty() {
                    tracing::debug!("rate toggle ignored on empty feed");
                    return effects;
                }
                let toggle =
                    self.rate
                        .request_toggle(self.navigation.playback_rate(), captured, now);
                self.navigation.set_playback_rate(toggle.rate);
                effects.push(Effect::Emit(FeedEvent::PlaybackRateChanged(toggle.rate)));
                effects.push(Effect::ArmRateDebounce {
                    deadline: toggle.deadline,
                    generation: toggle.generation,
                });
            }
            Message::RateDebounceElapsed { generation } => {
                if let Some(pending) = self.rate.expire(generation) {
                    effects.push(Effect::ApplyRate(pending));
                }
            }
            Message::MuteToggleRequested => {
                let muted = self.navigation.toggle_muted();
                tracing::debug!(muted, "mute toggled");
                effects.push(Effect::ApplyMute(muted));
                effects.push(Effect::Emit(FeedEvent::MuteChanged(muted)));
            }
            Message::SettingsChanged(settings) => {
                let update = self.auto_hide.apply_settings(settings, now);
                Self::push_auto_hide(update, &mut effects);
            }
            Message::PlaybackProgress { index, seconds } => {
                if index < self.feed.len() {
                    self.navigation.record_position(index, seconds);
                }
            }
            Message::FetchCompleted { ticket, result } => {
                self.complete_fetch(&ticket, result, &mut effects);
            }
            Message::AutoHideElapsed { generation } => {
                Self::push_auto_hide(self.auto_hide.expire(generation), &mut effects);
            }
        }
        effects
    }

    fn initialize(
        &mut self,
        query: FeedQuery,
        deep_link: Option<VideoId>,
        effects: &mut Vec<Effect>,
    ) {
        tracing::info!(%query, deep_link = ?deep_link, "initializing feed");
        self.window.reset();
        self.navigation.reset(deep_link);
        let ticket = self
            .pagination
            .begin_first_page(query.clone(), &mut self.feed);

        self.set_status(FeedStatus::Loading, effects);
        effects.push(Effect::Emit(FeedEvent::FeedReset { query }));
        effects.push(Effect::Emit(FeedEvent::PaginationChanged(
            self.pagination_flags(),
        )));
        effects.push(Effect::Fetch(ticket));
    }

    fn apply_intent(&mut self, intent: NavIntent, now: Instant, effects: &mut Vec<Effect>) {
        Self::push_auto_hide(self.auto_hide.interact(now), effects);
        if let Some(transition) = self.navigation.navigate(intent, self.feed.len()) {
            self.on_transition(transition, effects);
        }
    }

    fn on_transition(&mut self, transition: Transition, effects: &mut Vec<Effect>) {
        // A captured position belongs to the video being left; apply the rate
        // as is and never reconcile it against the next one.
        if let Some(pending) = self.rate.flush() {
            effects.push(Effect::CancelRateDebounce);
            effects.push(Effect::ApplyRate(pending));
        }
        effects.push(Effect::Emit(FeedEvent::ActiveIndexChanged {
            from: transition.from,
            to: transition.to,
        }));
        self.warm_around_active(effects);
        if let Some(count) = self.engagement.record(&transition) {
            tracing::debug!(count, "engagement milestone reached");
            effects.push(Effect::EngagementMilestone { count });
        }
        self.maybe_fetch_next(effects);
    }

    fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page, SourceError>,
        effects: &mut Vec<Effect>,
    ) {
        let result = result.map(|page| self.resolve_urls(page));
        let outcome = self.pagination.complete(ticket, result, &mut self.feed);

        match outcome {
            FetchOutcome::Stale => {}
            FetchOutcome::FirstPage(FirstPageOutcome::Loaded { len }) => {
                tracing::info!(len, "first page loaded");
                effects.push(Effect::Emit(FeedEvent::FeedChanged { len, added: len }));
                self.set_status(FeedStatus::Ready, effects);
                match self.navigation.resolve_initial(&self.feed) {
                    Some(transition) => self.on_transition(transition, effects),
                    None => self.warm_around_active(effects),
                }
            }
            FetchOutcome::FirstPage(FirstPageOutcome::NoResults) => {
                tracing::info!(query = %ticket.query, "no videos found");
                effects.push(Effect::Emit(FeedEvent::FeedChanged { len: 0, added: 0 }));
                self.set_status(FeedStatus::NoResults, effects);
            }
            FetchOutcome::FirstPage(FirstPageOutcome::Failed(err)) => {
                self.set_status(FeedStatus::Failed(err), effects);
            }
            FetchOutcome::NextPage { added } => {
                tracing::debug!(added, len = self.feed.len(), "next page merged");
                if added > 0 {
                    effects.push(Effect::Emit(FeedEvent::FeedChanged {
                        len: self.feed.len(),
                        added,
                    }));
                }
                match self.navigation.on_page_merged(&self.feed) {
                    Some(transition) => self.on_transition(transition, effects),
                    None => self.warm_around_active(effects),
                }
            }
            FetchOutcome::NextPageFailed(_) => {}
        }

        self.maybe_fetch_next(effects);
        effects.push(Effect::Emit(FeedEvent::PaginationChanged(
            self.pagination_flags(),
        )));
    }

    fn maybe_fetch_next(&mut self, effects: &mut Vec<Effect>) {
        let active = self.navigation.active_index();
        if !self.pagination.should_fetch_next(active, self.feed.len()) {
            return;
        }
        if let Some(ticket) = self.pagination.begin_next_page() {
            effects.push(Effect::Fetch(ticket));
            effects.push(Effect::Emit(FeedEvent::PaginationChanged(
                self.pagination_flags(),
            )));
        }
    }

    fn warm_around_active(&mut self, effects: &mut Vec<Effect>) {
        let active = self.navigation.active_index();
        for index in self.window.mark_around(active, self.feed.len()) {
            if let Some(item) = self.feed.get(index) {
                if !item.cover_url.is_empty() {
                    effects.push(Effect::WarmCover {
                        index,
                        url: item.cover_url.clone(),
                    });
                }
            }
        }
    }

    fn resolve_urls(&self, mut page: Page) -> Page {
        if let Some(base) = self.media_base_url.as_deref() {
            page.items = page
                .items
                .into_iter()
                .map(|item| item.with_base_url(base))
                .collect();
        }
        page
    }

    fn set_status(&mut self, status: FeedStatus, effects: &mut Vec<Effect>) {
        if self.status != status {
            self.status = status.clone();
            effects.push(Effect::Emit(FeedEvent::StatusChanged(status)));
        }
    }

    fn push_auto_hide(update: AutoHideUpdate, effects: &mut Vec<Effect>) {
        if let Some(visible) = update.visibility {
            effects.push(Effect::Emit(FeedEvent::ControlsVisibilityChanged(visible)));
        }
        match update.timer {
            TimerCommand::Unchanged => {}
            TimerCommand::Arm {
                deadline,
                generation,
            } => effects.push(Effect::ArmAutoHide {
                deadline,
                generation,
            }),
            TimerCommand::Cancel => effects.push(Effect::CancelAutoHide),
        }
    }
}
