// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Source**: Listing size and duration filter
//! - **Playback**: Autostart, mute and gesture window
//! - **Buffering**: Adaptive engine limits
//! - **Gestures**: Hold and swipe recognition

pub use crate::domain::story::newtypes::listing_bounds::{
    DEFAULT_MAX_DURATION_SECS, DEFAULT_PAGE_COUNT, MAX_MAX_DURATION_SECS, MAX_PAGE_COUNT,
    MIN_MAX_DURATION_SECS, MIN_PAGE_COUNT,
};

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Stories start without waiting for a gesture.
pub const DEFAULT_AUTOSTART: bool = true;

/// Stories start muted.
pub const DEFAULT_START_MUTED: bool = true;

/// How long after a gesture playback may start immediately (milliseconds).
pub const DEFAULT_GESTURE_WINDOW_MS: u64 = 1500;

pub const MIN_GESTURE_WINDOW_MS: u64 = 100;

pub const MAX_GESTURE_WINDOW_MS: u64 = 10_000;

/// Delay before the single retry of a refused play request (milliseconds).
pub const DEFAULT_PLAY_RETRY_DELAY_MS: u64 = 100;

pub const MIN_PLAY_RETRY_DELAY_MS: u64 = 10;

pub const MAX_PLAY_RETRY_DELAY_MS: u64 = 5_000;

// ==========================================================================
// Buffering Defaults
// ==========================================================================

/// Forward buffer of the adaptive engine (seconds).
pub const DEFAULT_MAX_BUFFER_SECS: u32 = 30;

pub const MIN_MAX_BUFFER_SECS: u32 = 5;

pub const MAX_MAX_BUFFER_SECS: u32 = 300;

/// Memory ceiling of a single adaptive download (megabytes).
pub const DEFAULT_MAX_BUFFER_MB: u32 = 20;

pub const MIN_MAX_BUFFER_MB: u32 = 1;

pub const MAX_MAX_BUFFER_MB: u32 = 256;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Press duration after which a press is a hold, not a tap (milliseconds).
pub const DEFAULT_HOLD_CONFIRM_MS: u64 = 600;

pub const MIN_HOLD_CONFIRM_MS: u64 = 150;

pub const MAX_HOLD_CONFIRM_MS: u64 = 3_000;

/// Horizontal travel that turns a press into a swipe (logical pixels).
pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;

pub const MIN_SWIPE_THRESHOLD_PX: f32 = 10.0;

pub const MAX_SWIPE_THRESHOLD_PX: f32 = 400.0;

/// Mouse drags count as swipes.
pub const DEFAULT_SWIPE_WITH_MOUSE: bool = true;

// ==========================================================================
// Compile-time validation
// ==========================================================================

const _: () = {
    assert!(MIN_PAGE_COUNT <= DEFAULT_PAGE_COUNT);
    assert!(DEFAULT_PAGE_COUNT <= MAX_PAGE_COUNT);

    assert!(MIN_MAX_DURATION_SECS <= DEFAULT_MAX_DURATION_SECS);
    assert!(DEFAULT_MAX_DURATION_SECS <= MAX_MAX_DURATION_SECS);

    assert!(MIN_GESTURE_WINDOW_MS <= DEFAULT_GESTURE_WINDOW_MS);
    assert!(DEFAULT_GESTURE_WINDOW_MS <= MAX_GESTURE_WINDOW_MS);

    assert!(MIN_PLAY_RETRY_DELAY_MS <= DEFAULT_PLAY_RETRY_DELAY_MS);
    assert!(DEFAULT_PLAY_RETRY_DELAY_MS <= MAX_PLAY_RETRY_DELAY_MS);
    // The retry has to land inside the gesture window.
    assert!(DEFAULT_PLAY_RETRY_DELAY_MS < DEFAULT_GESTURE_WINDOW_MS);

    assert!(MIN_MAX_BUFFER_SECS <= DEFAULT_MAX_BUFFER_SECS);
    assert!(DEFAULT_MAX_BUFFER_SECS <= MAX_MAX_BUFFER_SECS);

    assert!(MIN_MAX_BUFFER_MB <= DEFAULT_MAX_BUFFER_MB);
    assert!(DEFAULT_MAX_BUFFER_MB <= MAX_MAX_BUFFER_MB);

    assert!(MIN_HOLD_CONFIRM_MS <= DEFAULT_HOLD_CONFIRM_MS);
    assert!(DEFAULT_HOLD_CONFIRM_MS <= MAX_HOLD_CONFIRM_MS);

    assert!(MIN_SWIPE_THRESHOLD_PX <= DEFAULT_SWIPE_THRESHOLD_PX);
    assert!(DEFAULT_SWIPE_THRESHOLD_PX <= MAX_SWIPE_THRESHOLD_PX);
};
