// SPDX-License-Identifier: MPL-2.0
//! End-to-end behavior of the feed engine on a paused tokio clock.

mod common;

use std::sync::Arc;

use common::{advance, drain, spawn, videos, CountingSink, RecordingSurface, ScriptedSource};
use tempfile::tempdir;
use veilfeed::application::port::SourceError;
use veilfeed::domain::error::FeedError;
use veilfeed::domain::feed::{Cursor, Page};
use veilfeed::domain::ui::AutoHideDelay;
use veilfeed::domain::video::{PlaybackSnapshot, VideoId};
use veilfeed::engine::{Collaborators, EngineConfig, EngineHandle, FeedEvent, FeedStatus};
use veilfeed::feed::{AlertLedger, AutoHideSettings, InputEvent, Key, NavIntent, SwipeDirection};
use veilfeed::persisted_state::AppState;
use veilfeed::Error;

const COOLDOWN_MS: u64 = 301;

fn next() -> NavIntent {
    NavIntent::swipe(SwipeDirection::Up)
}

fn previous() -> NavIntent {
    NavIntent::swipe(SwipeDirection::Down)
}

/// Source whose first page of `@creator` holds ten videos and points at "10".
fn ten_then_more() -> Arc<ScriptedSource> {
    let source = ScriptedSource::new();
    source.respond(
        "@creator",
        "0",
        Ok(Page::with_next(videos("creator", 0..10), Cursor::new("10"))),
    );
    source.respond("@creator", "10", Ok(Page::last(videos("creator", 10..15))));
    source
}

async fn swipe_to(handle: &EngineHandle, index: usize) {
    while handle.current_active_index() < index {
        handle.on_gesture(next()).expect("engine running");
        advance(handle, COOLDOWN_MS).await;
    }
}

async fn loaded(source: Arc<ScriptedSource>) -> EngineHandle {
    let handle = spawn(source);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;
    handle
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test(start_paused = true)]
async fn first_page_populates_feed() {
    let handle = loaded(ten_then_more()).await;

    assert_eq!(handle.current_status(), FeedStatus::Ready);
    assert_eq!(handle.current_feed_list().len(), 10);
    assert_eq!(handle.current_active_index(), 0);
    assert_eq!(handle.render_window(), vec![0, 1, 2]);

    let nav = handle.navigation_info();
    assert!(!nav.has_previous);
    assert!(nav.has_next);
    assert_eq!(nav.total, 10);
}

#[tokio::test(start_paused = true)]
async fn query_is_normalized_before_fetching() {
    let source = ten_then_more();
    let handle = spawn(Arc::clone(&source));
    handle.initialize("  @creator ", None).expect("valid query");
    drain(&handle).await;

    assert_eq!(
        source.calls(),
        vec![("@creator".to_string(), "0".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn blank_query_is_rejected() {
    let handle = spawn(ScriptedSource::new());
    assert!(matches!(
        handle.initialize("  @ ", None),
        Err(Error::InvalidQuery(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn empty_first_page_reports_no_results() {
    let handle = loaded(ScriptedSource::new()).await;

    assert_eq!(handle.current_status(), FeedStatus::NoResults);
    assert!(handle.current_feed_list().is_empty());
    assert!(!handle.current_pagination_flags().has_more);
}

#[tokio::test(start_paused = true)]
async fn first_page_failure_is_user_visible() {
    let source = ScriptedSource::new();
    source.respond("@creator", "0", Err(SourceError::RateLimited));
    let handle = loaded(source).await;

    assert_eq!(
        handle.current_status(),
        FeedStatus::Failed(FeedError::RateLimited)
    );
    assert!(handle.current_feed_list().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deep_link_opens_on_matching_video() {
    let handle = spawn(ten_then_more());
    handle
        .initialize("creator", Some(VideoId::from("creator-4")))
        .expect("valid query");
    drain(&handle).await;

    assert_eq!(handle.current_active_index(), 4);
    assert_eq!(handle.render_window(), vec![2, 3, 4, 5, 6]);
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test(start_paused = true)]
async fn next_page_is_fetched_once_at_index_eight() {
    let source = ten_then_more();
    let handle = loaded(Arc::clone(&source)).await;

    swipe_to(&handle, 7).await;
    assert_eq!(source.cursors(), vec!["0"]);

    swipe_to(&handle, 8).await;
    assert_eq!(source.cursors(), vec!["0", "10"]);
    assert_eq!(handle.current_feed_list().len(), 15);

    swipe_to(&handle, 9).await;
    assert_eq!(source.cursors(), vec!["0", "10"]);
}

#[tokio::test(start_paused = true)]
async fn no_concurrent_fetch_while_one_is_in_flight() {
    let source = ten_then_more();
    source.hold("@creator", "10");
    let handle = loaded(Arc::clone(&source)).await;

    swipe_to(&handle, 8).await;
    let flags = handle.current_pagination_flags();
    assert!(flags.is_fetching);
    assert!(flags.show_loading_more);

    swipe_to(&handle, 9).await;
    assert_eq!(source.cursors(), vec!["0", "10"]);

    source.release("@creator", "10");
    drain(&handle).await;
    assert_eq!(handle.current_feed_list().len(), 15);
    assert!(!handle.current_pagination_flags().is_fetching);
}

#[tokio::test(start_paused = true)]
async fn failed_next_page_stops_pagination_silently() {
    let source = ScriptedSource::new();
    source.respond(
        "@creator",
        "0",
        Ok(Page::with_next(videos("creator", 0..10), Cursor::new("10"))),
    );
    source.respond(
        "@creator",
        "10",
        Err(SourceError::Network("connection reset".into())),
    );
    let handle = loaded(Arc::clone(&source)).await;

    swipe_to(&handle, 9).await;

    assert_eq!(source.cursors(), vec!["0", "10"]);
    assert_eq!(handle.current_status(), FeedStatus::Ready);
    assert_eq!(handle.current_feed_list().len(), 10);
    assert!(!handle.current_pagination_flags().has_more);
}

#[tokio::test(start_paused = true)]
async fn duplicate_page_with_same_cursor_is_not_refetched() {
    let source = ScriptedSource::new();
    source.respond(
        "@creator",
        "0",
        Ok(Page::with_next(videos("creator", 0..2), Cursor::new("3"))),
    );
    source.respond(
        "@creator",
        "3",
        Ok(Page::with_next(videos("creator", 0..2), Cursor::new("3"))),
    );
    let handle = loaded(Arc::clone(&source)).await;
    for _ in 0..5 {
        drain(&handle).await;
    }

    assert_eq!(source.cursors(), vec!["0", "3"]);
    assert_eq!(handle.current_feed_list().len(), 2);
    let flags = handle.current_pagination_flags();
    assert!(!flags.has_more);
    assert!(!flags.is_fetching);
}

#[tokio::test(start_paused = true)]
async fn response_for_superseded_query_is_discarded() {
    let source = ten_then_more();
    source.hold("@creator", "0");
    source.respond("@other", "0", Ok(Page::last(videos("other", 0..3))));
    let handle = spawn(Arc::clone(&source));

    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;
    handle.initialize("other", None).expect("valid query");
    drain(&handle).await;

    source.release("@creator", "0");
    drain(&handle).await;

    let feed = handle.current_feed_list();
    assert_eq!(feed.len(), 3);
    assert!(feed.iter().all(|item| item.author.handle == "other"));
    assert_eq!(handle.current_status(), FeedStatus::Ready);
}

// =============================================================================
// Gestures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn intents_inside_cooldown_are_dropped() {
    let handle = loaded(ten_then_more()).await;

    handle.on_gesture(next()).expect("engine running");
    advance(&handle, 100).await;
    handle.on_gesture(next()).expect("engine running");
    drain(&handle).await;
    assert_eq!(handle.current_active_index(), 1);

    advance(&handle, 250).await;
    handle.on_gesture(next()).expect("engine running");
    drain(&handle).await;
    assert_eq!(handle.current_active_index(), 2);
}

#[tokio::test(start_paused = true)]
async fn no_wraparound_at_either_end() {
    let source = ScriptedSource::new();
    source.respond("@creator", "0", Ok(Page::last(videos("creator", 0..2))));
    let handle = loaded(source).await;

    handle.on_gesture(previous()).expect("engine running");
    advance(&handle, COOLDOWN_MS).await;
    assert_eq!(handle.current_active_index(), 0);

    swipe_to(&handle, 1).await;
    handle.on_gesture(next()).expect("engine running");
    advance(&handle, COOLDOWN_MS).await;
    assert_eq!(handle.current_active_index(), 1);
    assert!(!handle.navigation_info().has_next);
}

#[tokio::test(start_paused = true)]
async fn drag_suppresses_default_and_navigates() {
    let handle = loaded(ten_then_more()).await;

    assert!(!handle
        .on_input(InputEvent::PointerDown { y: 400.0 })
        .await
        .expect("engine running"));
    assert!(handle
        .on_input(InputEvent::PointerMove { y: 300.0 })
        .await
        .expect("engine running"));
    assert!(!handle
        .on_input(InputEvent::PointerUp)
        .await
        .expect("engine running"));

    drain(&handle).await;
    assert_eq!(handle.current_active_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn arrow_keys_navigate() {
    let handle = loaded(ten_then_more()).await;

    handle.on_keyboard(Key::ArrowDown).expect("engine running");
    advance(&handle, COOLDOWN_MS).await;
    assert_eq!(handle.current_active_index(), 1);

    handle.on_keyboard(Key::ArrowUp).expect("engine running");
    advance(&handle, COOLDOWN_MS).await;
    assert_eq!(handle.current_active_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn transitions_are_broadcast() {
    let handle = loaded(ten_then_more()).await;
    let mut events = handle.subscribe();

    swipe_to(&handle, 1).await;

    let mut saw_transition = false;
    while let Ok(event) = events.try_recv() {
        if event == (FeedEvent::ActiveIndexChanged { from: 0, to: 1 }) {
            saw_transition = true;
        }
    }
    assert!(saw_transition);
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test(start_paused = true)]
async fn rate_toggles_coalesce_and_restore_position() {
    let surface = RecordingSurface::playing_at(12.0);
    let collaborators =
        Collaborators::new(ten_then_more()).with_surface(surface.clone());
    let handle = EngineHandle::spawn(EngineConfig::default(), collaborators);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    handle.on_rate_toggle_request().expect("engine running");
    advance(&handle, 20).await;
    handle.on_rate_toggle_request().expect("engine running");
    advance(&handle, 20).await;
    handle.on_rate_toggle_request().expect("engine running");
    drain(&handle).await;
    assert_eq!(handle.playback_rate().value(), 0.5);

    advance(&handle, 40).await;
    assert!(surface.rates().is_empty());

    advance(&handle, 20).await;
    assert_eq!(surface.rates(), vec![0.5]);
    assert_eq!(surface.seeks(), vec![12.0]);
    assert_eq!(surface.resumes(), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_change_pending_during_swipe_is_not_reconciled_on_new_video() {
    let surface = RecordingSurface::playing_at(42.0);
    let collaborators =
        Collaborators::new(ten_then_more()).with_surface(surface.clone());
    let handle = EngineHandle::spawn(EngineConfig::default(), collaborators);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    handle.on_rate_toggle_request().expect("engine running");
    handle.on_gesture(next()).expect("engine running");
    drain(&handle).await;
    assert_eq!(handle.current_active_index(), 1);
    assert_eq!(surface.rates(), vec![1.5]);

    surface.set_snapshot(PlaybackSnapshot::playing(0.0));
    advance(&handle, 60).await;

    assert!(surface.seeks().is_empty());
    assert_eq!(surface.resumes(), 0);
    assert_eq!(surface.rates(), vec![1.5]);
    assert_eq!(handle.playback_rate().value(), 1.5);
}

#[tokio::test(start_paused = true)]
async fn mute_toggled_before_keyboard_navigation_carries_over() {
    let surface = Arc::new(RecordingSurface::default());
    let collaborators =
        Collaborators::new(ten_then_more()).with_surface(surface.clone());
    let handle = EngineHandle::spawn(EngineConfig::default(), collaborators);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    handle.on_mute_toggle_request().expect("engine running");
    handle.on_keyboard(Key::ArrowDown).expect("engine running");
    drain(&handle).await;

    assert_eq!(handle.current_active_index(), 1);
    assert!(!handle.muted());
    assert_eq!(surface.muted(), vec![false]);
    assert!(surface.rates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mute_is_shared_and_forwarded() {
    let surface = Arc::new(RecordingSurface::default());
    let collaborators =
        Collaborators::new(ten_then_more()).with_surface(surface.clone());
    let handle = EngineHandle::spawn(EngineConfig::default(), collaborators);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;
    assert!(handle.muted());

    handle.on_mute_toggle_request().expect("engine running");
    swipe_to(&handle, 2).await;

    assert!(!handle.muted());
    assert_eq!(surface.muted(), vec![false]);
}

// =============================================================================
// Auto-hide
// =============================================================================

#[tokio::test(start_paused = true)]
async fn controls_hide_after_delay_and_reappear_on_activity() {
    let mut config = EngineConfig::default();
    config.auto_hide = AutoHideSettings {
        enabled: true,
        delay: AutoHideDelay::new(3),
    };
    let handle = EngineHandle::spawn(config, Collaborators::new(ten_then_more()));
    drain(&handle).await;
    assert!(handle.controls_visible());

    advance(&handle, 2_900).await;
    assert!(handle.controls_visible());

    advance(&handle, 150).await;
    assert!(!handle.controls_visible());

    advance(&handle, 50).await;
    handle.on_pointer_activity().expect("engine running");
    drain(&handle).await;
    assert!(handle.controls_visible());

    advance(&handle, 3_050).await;
    assert!(!handle.controls_visible());
}

#[tokio::test(start_paused = true)]
async fn disabling_auto_hide_keeps_controls_visible() {
    let handle = spawn(ten_then_more());
    drain(&handle).await;

    handle
        .on_settings_change(AutoHideSettings {
            enabled: true,
            delay: AutoHideDelay::new(1),
        })
        .expect("engine running");
    advance(&handle, 1_050).await;
    assert!(!handle.controls_visible());

    handle
        .on_settings_change(AutoHideSettings::default())
        .expect("engine running");
    drain(&handle).await;
    assert!(handle.controls_visible());

    advance(&handle, 10_000).await;
    assert!(handle.controls_visible());
}

// =============================================================================
// Engagement
// =============================================================================

/// Engine reporting to a counting sink. The startup alert never fires.
fn engaged(source: Arc<ScriptedSource>) -> (EngineHandle, Arc<CountingSink>) {
    engaged_with(source, 0.0)
}

fn engaged_with(
    source: Arc<ScriptedSource>,
    startup_alert_chance: f64,
) -> (EngineHandle, Arc<CountingSink>) {
    let sink = Arc::new(CountingSink::default());
    let collaborators = Collaborators::new(source).with_engagement(sink.clone());
    let config = EngineConfig {
        startup_alert_chance,
        ..EngineConfig::default()
    };
    let handle = EngineHandle::spawn(config, collaborators);
    (handle, sink)
}

fn long_feed() -> Arc<ScriptedSource> {
    let source = ScriptedSource::new();
    source.respond("@creator", "0", Ok(Page::last(videos("creator", 0..30))));
    source
}

#[tokio::test(start_paused = true)]
async fn tenth_swipe_raises_one_milestone() {
    let (handle, sink) = engaged(long_feed());
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    swipe_to(&handle, 9).await;
    assert!(sink.milestones().is_empty());

    swipe_to(&handle, 10).await;
    assert_eq!(sink.milestones(), vec![10]);
}

#[tokio::test(start_paused = true)]
async fn keyboard_navigation_raises_no_milestone() {
    let (handle, sink) = engaged(long_feed());
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    for _ in 0..10 {
        handle.on_keyboard(Key::ArrowDown).expect("engine running");
        advance(&handle, COOLDOWN_MS).await;
    }

    assert_eq!(handle.current_active_index(), 10);
    assert!(sink.milestones().is_empty());
}

#[tokio::test(start_paused = true)]
async fn second_milestone_within_cooldown_is_suppressed() {
    let (handle, sink) = engaged(long_feed());
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    swipe_to(&handle, 20).await;
    assert_eq!(sink.milestones(), vec![10]);
}

#[tokio::test(start_paused = true)]
async fn certain_startup_alert_is_delivered_and_starts_cooldown() {
    let (handle, sink) = engaged_with(long_feed(), 1.0);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;
    assert_eq!(sink.startup_alerts(), 1);

    swipe_to(&handle, 10).await;
    assert!(sink.milestones().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_chance_startup_alert_never_fires() {
    let (handle, sink) = engaged_with(long_feed(), 0.0);
    drain(&handle).await;
    assert_eq!(sink.startup_alerts(), 0);
}

#[tokio::test]
async fn milestone_timestamp_is_persisted_off_the_actor() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let base = Some(dir.path().to_path_buf());
    let config = EngineConfig {
        engagement_interval: 1,
        startup_alert_chance: 0.0,
        ..EngineConfig::default()
    };
    let (ledger, warning) = AlertLedger::on_disk(base.clone(), config.alert_cooldown);
    assert!(warning.is_none());

    let sink = Arc::new(CountingSink::default());
    let collaborators = Collaborators::new(long_feed()).with_engagement(sink.clone());
    let handle = EngineHandle::spawn_with_ledger(config, collaborators, ledger);
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    handle.on_gesture(next()).expect("engine running");
    drain(&handle).await;
    assert_eq!(sink.milestones(), vec![1]);

    let mut persisted = None;
    for _ in 0..200 {
        let (state, _) = AppState::load_from(base.clone());
        if state.last_alert_shown.is_some() {
            persisted = state.last_alert_shown;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(persisted.is_some());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn stopped_engine_rejects_commands() {
    let handle = loaded(ten_then_more()).await;

    handle.stop().await.expect("first stop succeeds");

    assert!(handle.current_feed_list().is_empty());
    assert!(matches!(handle.on_gesture(next()), Err(Error::EngineStopped)));
    assert!(matches!(
        handle.initialize("creator", None),
        Err(Error::EngineStopped)
    ));
    assert!(matches!(handle.settle().await, Err(Error::EngineStopped)));
}

#[tokio::test(start_paused = true)]
async fn late_fetch_after_stop_is_ignored() {
    let source = ten_then_more();
    source.hold("@creator", "0");
    let handle = spawn(Arc::clone(&source));
    handle.initialize("creator", None).expect("valid query");
    drain(&handle).await;

    handle.stop().await.expect("stop succeeds");
    source.release("@creator", "0");
    tokio::task::yield_now().await;

    assert!(handle.current_feed_list().is_empty());
}
