// SPDX-License-Identifier: MPL-2.0
//! Command-line driver for the feed engine.
//!
//! Loads a TOML fixture as an in-memory source, then reads one command per
//! line from stdin and prints the events the engine emits.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use veilfeed::application::port::EngagementSink;
use veilfeed::engine::{Collaborators, EngineConfig, EngineHandle, FeedEvent};
use veilfeed::feed::{AlertLedger, Key, NavIntent, SwipeDirection};
use veilfeed::infrastructure::MemorySource;
use veilfeed::{config, paths};

/// Environment variable holding tracing directives.
const ENV_LOG: &str = "VEILFEED_LOG";

const HELP: &str = "\
veilfeed - short-video feed engine driver

USAGE:
  veilfeed --fixture <FILE> --query <HANDLE> [OPTIONS]

OPTIONS:
  --fixture <FILE>     TOML file with [[videos]] entries
  --query <HANDLE>     account handle to open (leading @ optional)
  --video <ID>         open the feed on this video
  --config-dir <DIR>   directory holding settings.toml
  --data-dir <DIR>     directory holding state.cbor
  -h, --help           print this help

COMMANDS (stdin):
  up | down            swipe to the next | previous video
  key-up | key-down    arrow keys
  rate                 cycle the playback rate
  mute                 toggle mute
  status               print the current state
  quit                 stop the engine and exit

Logging is controlled by VEILFEED_LOG (default: info).
";

struct Args {
    fixture: PathBuf,
    query: String,
    video: Option<String>,
    config_dir: Option<String>,
    data_dir: Option<String>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let parsed = Args {
        fixture: args.value_from_str("--fixture")?,
        query: args.value_from_str("--query")?,
        video: args.opt_value_from_str("--video")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unexpected arguments");
    }
    Ok(Some(parsed))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Prints milestones instead of showing a banner.
struct StdoutSink;

impl EngagementSink for StdoutSink {
    fn milestone_reached(&self, count: u64) {
        println!("milestone: {count} swipes, thanks for watching");
    }

    fn startup_alert(&self) {
        println!("welcome back, thanks for watching");
    }
}

fn print_status(handle: &EngineHandle) {
    let snapshot = handle.snapshot();
    let title = snapshot
        .feed
        .get(snapshot.active_index)
        .map_or("-", |item| item.title.as_str());
    println!(
        "status={:?} video={}/{} title={title:?} rate={} muted={} window={:?} more={}",
        snapshot.status,
        snapshot.navigation.active_index + usize::from(snapshot.navigation.total > 0),
        snapshot.navigation.total,
        snapshot.playback_rate,
        snapshot.muted,
        snapshot.render_window,
        snapshot.pagination.has_more,
    );
}

async fn print_events(mut events: broadcast::Receiver<FeedEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => println!("event: {event:?}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let Some(args) = parse_args()? else {
        print!("{HELP}");
        return Ok(());
    };
    paths::init_cli_overrides(args.data_dir, args.config_dir);

    let (settings, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!(warning = %warning, "using default settings");
    }
    let engine_config = EngineConfig::from_config(&settings);

    let source = MemorySource::load(&args.fixture)?;
    tracing::info!(videos = source.len(), page_size = source.page_size(), "fixture loaded");

    let (ledger, warning) = AlertLedger::on_disk(None, engine_config.alert_cooldown);
    if let Some(warning) = warning {
        tracing::warn!(warning = %warning, "starting without alert history");
    }

    let collaborators =
        Collaborators::new(Arc::new(source)).with_engagement(Arc::new(StdoutSink));
    let handle = EngineHandle::spawn_with_ledger(engine_config, collaborators, ledger);
    let printer = tokio::spawn(print_events(handle.subscribe()));

    handle.initialize(&args.query, args.video.map(Into::into))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "up" => handle.on_gesture(NavIntent::swipe(SwipeDirection::Up))?,
            "down" => handle.on_gesture(NavIntent::swipe(SwipeDirection::Down))?,
            "key-up" => handle.on_keyboard(Key::ArrowUp)?,
            "key-down" => handle.on_keyboard(Key::ArrowDown)?,
            "rate" => handle.on_rate_toggle_request()?,
            "mute" => handle.on_mute_toggle_request()?,
            "status" => {
                handle.settle().await?;
                print_status(&handle);
            }
            "quit" => break,
            other => println!("unknown command {other:?}, try --help"),
        }
    }

    handle.stop().await?;
    drop(handle);
    printer.abort();
    Ok(())
}
