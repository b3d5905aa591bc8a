// SPDX-License-Identifier: MPL-2.0
//! Application state persistence using CBOR format.
//!
//! This module handles state that must survive restarts but is not
//! user-configurable (unlike preferences in `settings.toml`). Today that is
//! only the time the last engagement alert was shown.
//!
//! Load and save never fail: problems are reported as notification keys and
//! the caller carries on with defaults.
//!
//! # Path Resolution
//!
//! 1. Use `load_from()`/`save_to()` with explicit directory override
//! 2. Set `VEILFEED_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

/// Application state that persists across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// When the engagement alert was last delivered.
    #[serde(default)]
    pub last_alert_shown: Option<DateTime<Utc>>,
}

impl AppState {
    /// Loads state from the default location.
    ///
    /// Returns default state and a warning key if the file exists but
    /// cannot be read.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads state from `base_dir`, or the default location when `None`.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => (state, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "state file unreadable");
                    (
                        Self::default(),
                        Some("notification-state-parse-error".to_string()),
                    )
                }
            },
            Err(_) => (
                Self::default(),
                Some("notification-state-read-error".to_string()),
            ),
        }
    }

    /// Saves state to the default location. Returns a warning key on failure.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves state under `base_dir`, or the default location when `None`.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                if ciborium::into_writer(self, BufWriter::new(file)).is_err() {
                    return Some("notification-state-write-error".to_string());
                }
                None
            }
            Err(_) => Some("notification-state-create-error".to_string()),
        }
    }

    /// Returns true if more than `cooldown` has passed since the last alert.
    ///
    /// A timestamp in the future (clock moved backwards) counts as expired.
    #[must_use]
    pub fn alert_cooldown_elapsed(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        let Some(last) = self.last_alert_shown else {
            return true;
        };
        match (now - last).to_std() {
            Ok(elapsed) => elapsed > cooldown,
            Err(_) => true,
        }
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }
}
