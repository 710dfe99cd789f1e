// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - UI language
//! - `[source]` - Instance, start video and listing filters
//! - `[playback]` - Autostart, mute, gesture window and buffering limits
//! - `[gestures]` - Hold and swipe recognition
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` on the command line
//! 3. Set `ICED_STORIES_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_stories::app::config;
//!
//! let (mut config, _warning) = config::load();
//! config.source.instance = Some("https://tube.example".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::application::interaction::SurfaceSettings;
use crate::application::playback::ControllerSettings;
use crate::domain::story::{MaxDuration, PageCount};
use crate::error::{Error, Result};
use crate::infrastructure::peertube::SourceSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Where stories are listed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Instance base URL, e.g. `https://tube.example`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Search term, watch URL or account handle of the first story.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_video: Option<String>,

    /// Number of channel videos fetched.
    #[serde(default = "default_page_count", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    /// Videos longer than this are skipped.
    #[serde(
        default = "default_max_duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_duration_secs: Option<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            instance: None,
            start_video: None,
            page_count: default_page_count(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}

/// Playback behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Start each story without waiting for a gesture.
    #[serde(default = "default_autostart", skip_serializing_if = "Option::is_none")]
    pub autostart: Option<bool>,

    #[serde(default = "default_start_muted", skip_serializing_if = "Option::is_none")]
    pub start_muted: Option<bool>,

    /// Interval after a gesture during which playback starts immediately.
    #[serde(
        default = "default_gesture_window_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub gesture_window_ms: Option<u64>,

    #[serde(
        default = "default_play_retry_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub play_retry_delay_ms: Option<u64>,

    /// Forward buffer of the adaptive engine.
    #[serde(
        default = "default_max_buffer_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_buffer_secs: Option<u32>,

    /// Memory ceiling of a single adaptive download.
    #[serde(
        default = "default_max_buffer_mb",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_buffer_mb: Option<u32>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autostart: default_autostart(),
            start_muted: default_start_muted(),
            gesture_window_ms: default_gesture_window_ms(),
            play_retry_delay_ms: default_play_retry_delay_ms(),
            max_buffer_secs: default_max_buffer_secs(),
            max_buffer_mb: default_max_buffer_mb(),
        }
    }
}

/// Gesture recognition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GesturesConfig {
    #[serde(
        default = "default_hold_confirm_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub hold_confirm_ms: Option<u64>,

    #[serde(
        default = "default_swipe_threshold_px",
        skip_serializing_if = "Option::is_none"
    )]
    pub swipe_threshold_px: Option<f32>,

    #[serde(
        default = "default_swipe_with_mouse",
        skip_serializing_if = "Option::is_none"
    )]
    pub swipe_with_mouse: Option<bool>,
}

impl Default for GesturesConfig {
    fn default() -> Self {
        Self {
            hold_confirm_ms: default_hold_confirm_ms(),
            swipe_threshold_px: default_swipe_threshold_px(),
            swipe_with_mouse: default_swipe_with_mouse(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub gestures: GesturesConfig,
}

impl Config {
    /// Resolves the story source. Returns `None` while no instance is set.
    #[must_use]
    pub fn source_settings(&self) -> Option<SourceSettings> {
        let instance = self
            .source
            .instance
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some(SourceSettings {
            instance: instance.to_string(),
            start_reference: self.source.start_video.clone().unwrap_or_default(),
            page_count: PageCount::new(self.source.page_count.unwrap_or(DEFAULT_PAGE_COUNT)),
            max_duration: MaxDuration::new(
                self.source
                    .max_duration_secs
                    .unwrap_or(DEFAULT_MAX_DURATION_SECS),
            ),
        })
    }

    /// Playback controller tuning, clamped to the supported ranges.
    #[must_use]
    pub fn controller_settings(&self) -> ControllerSettings {
        let playback = &self.playback;
        let gesture_window = playback
            .gesture_window_ms
            .unwrap_or(DEFAULT_GESTURE_WINDOW_MS)
            .clamp(MIN_GESTURE_WINDOW_MS, MAX_GESTURE_WINDOW_MS);
        let retry_delay = playback
            .play_retry_delay_ms
            .unwrap_or(DEFAULT_PLAY_RETRY_DELAY_MS)
            .clamp(MIN_PLAY_RETRY_DELAY_MS, MAX_PLAY_RETRY_DELAY_MS);
        let buffer_secs = playback
            .max_buffer_secs
            .unwrap_or(DEFAULT_MAX_BUFFER_SECS)
            .clamp(MIN_MAX_BUFFER_SECS, MAX_MAX_BUFFER_SECS);
        let buffer_mb = playback
            .max_buffer_mb
            .unwrap_or(DEFAULT_MAX_BUFFER_MB)
            .clamp(MIN_MAX_BUFFER_MB, MAX_MAX_BUFFER_MB);

        ControllerSettings {
            gesture_window: Duration::from_millis(gesture_window),
            retry_delay: Duration::from_millis(retry_delay),
            start_level: 0,
            max_forward_buffer: Duration::from_secs(u64::from(buffer_secs)),
            max_buffer_bytes: buffer_mb as usize * 1000 * 1000,
        }
    }

    /// Interaction surface tuning, clamped to the supported ranges.
    #[must_use]
    pub fn surface_settings(&self) -> SurfaceSettings {
        let gestures = &self.gestures;
        SurfaceSettings {
            hold_confirm: Duration::from_millis(
                gestures
                    .hold_confirm_ms
                    .unwrap_or(DEFAULT_HOLD_CONFIRM_MS)
                    .clamp(MIN_HOLD_CONFIRM_MS, MAX_HOLD_CONFIRM_MS),
            ),
            swipe_threshold: gestures
                .swipe_threshold_px
                .unwrap_or(DEFAULT_SWIPE_THRESHOLD_PX)
                .clamp(MIN_SWIPE_THRESHOLD_PX, MAX_SWIPE_THRESHOLD_PX),
            swipe_with_mouse: gestures
                .swipe_with_mouse
                .unwrap_or(DEFAULT_SWIPE_WITH_MOUSE),
            ..SurfaceSettings::default()
        }
    }

    #[must_use]
    pub fn autostart(&self) -> bool {
        self.playback.autostart.unwrap_or(DEFAULT_AUTOSTART)
    }

    #[must_use]
    pub fn start_muted(&self) -> bool {
        self.playback.start_muted.unwrap_or(DEFAULT_START_MUTED)
    }
}

fn default_page_count() -> Option<u32> {
    Some(DEFAULT_PAGE_COUNT)
}

fn default_max_duration_secs() -> Option<u32> {
    Some(DEFAULT_MAX_DURATION_SECS)
}

fn default_autostart() -> Option<bool> {
    Some(DEFAULT_AUTOSTART)
}

fn default_start_muted() -> Option<bool> {
    Some(DEFAULT_START_MUTED)
}

fn default_gesture_window_ms() -> Option<u64> {
    Some(DEFAULT_GESTURE_WINDOW_MS)
}

fn default_play_retry_delay_ms() -> Option<u64> {
    Some(DEFAULT_PLAY_RETRY_DELAY_MS)
}

fn default_max_buffer_secs() -> Option<u32> {
    Some(DEFAULT_MAX_BUFFER_SECS)
}

fn default_max_buffer_mb() -> Option<u32> {
    Some(DEFAULT_MAX_BUFFER_MB)
}

fn default_hold_confirm_ms() -> Option<u64> {
    Some(DEFAULT_HOLD_CONFIRM_MS)
}

fn default_swipe_threshold_px() -> Option<f32> {
    Some(DEFAULT_SWIPE_THRESHOLD_PX)
}

fn default_swipe_with_mouse() -> Option<bool> {
    Some(DEFAULT_SWIPE_WITH_MOUSE)
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
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
