// SPDX-License-Identifier: MPL-2.0
//! This module handles user preferences stored in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[controls]` - Overlay controls auto-hide
//! - `[playback]` - Shared mute state and playback rate
//! - `[feed]` - Media URL resolution and the startup alert draw
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` CLI argument or `VEILFEED_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use veilfeed::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.controls.auto_hide_enabled = Some(true);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::ui::AutoHideDelay;
use crate::domain::video::PlaybackRate;
use crate::error::{Error, Result};
use crate::feed::AutoHideSettings;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Overlay controls settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlsConfig {
    /// Hide controls after a period without interaction.
    #[serde(
        default = "default_auto_hide_enabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_hide_enabled: Option<bool>,

    /// Inactivity delay before hiding (seconds, 1–30).
    #[serde(
        default = "default_auto_hide_delay_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_hide_delay_secs: Option<u32>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            auto_hide_enabled: default_auto_hide_enabled(),
            auto_hide_delay_secs: default_auto_hide_delay_secs(),
        }
    }
}

/// Playback settings shared by every video of the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Whether videos start muted.
    #[serde(default = "default_muted", skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    /// Initial playback rate (0.25 to 4.0).
    #[serde(
        default = "default_playback_rate",
        skip_serializing_if = "Option::is_none"
    )]
    pub playback_rate: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            muted: default_muted(),
            playback_rate: default_playback_rate(),
        }
    }
}

/// Feed source settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeedConfig {
    /// Base URL prepended to host-relative media URLs (`/video/...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_base_url: Option<String>,

    /// Probability (0.0–1.0) that starting the engine offers an engagement
    /// alert, still subject to the alert cooldown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_alert_chance: Option<f64>,
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl Config {
    /// Auto-hide settings with out-of-range values clamped.
    #[must_use]
    pub fn auto_hide_settings(&self) -> AutoHideSettings {
        AutoHideSettings {
            enabled: self
                .controls
                .auto_hide_enabled
                .unwrap_or(DEFAULT_AUTO_HIDE_ENABLED),
            delay: AutoHideDelay::new(
                self.controls
                    .auto_hide_delay_secs
                    .unwrap_or(DEFAULT_AUTO_HIDE_DELAY_SECS),
            ),
        }
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.playback.muted.unwrap_or(DEFAULT_MUTED)
    }

    #[must_use]
    pub fn playback_rate(&self) -> PlaybackRate {
        self.playback
            .playback_rate
            .map_or_else(PlaybackRate::default, PlaybackRate::new)
    }

    /// Startup alert probability clamped to 0.0–1.0.
    #[must_use]
    pub fn startup_alert_chance(&self) -> f64 {
        match self.feed.startup_alert_chance {
            Some(chance) if chance.is_finite() => chance.clamp(0.0, 1.0),
            _ => DEFAULT_STARTUP_ALERT_CHANCE,
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_auto_hide_enabled() -> Option<bool> {
    Some(DEFAULT_AUTO_HIDE_ENABLED)
}

fn default_auto_hide_delay_secs() -> Option<u32> {
    Some(DEFAULT_AUTO_HIDE_DELAY_SECS)
}

fn default_muted() -> Option<bool> {
    Some(DEFAULT_MUTED)
}

fn default_playback_rate() -> Option<f64> {
    Some(PLAYBACK_RATE_CYCLE[0])
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load / Save
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default settings");
            (
                Config::default(),
                Some("notification-config-load-error".to_string()),
            )
        }
    }
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match get_config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config("no config directory available".to_string())),
    }
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
