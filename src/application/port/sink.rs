// SPDX-License-Identifier: MPL-2.0
//! Media sink port.
//!
//! A sink renders exactly one source at a time. Commands are synchronous
//! and cheap; lifecycle changes are reported later as [`SinkEvent`]s.

use std::fmt;

/// Why a play request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRejected {
    /// No source is set.
    NoSource,
    /// The sink is not in a state that allows playback yet.
    NotAllowed,
    /// The request was overtaken by a source change or a stopped worker.
    Interrupted,
}

impl fmt::Display for PlayRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayRejected::NoSource => write!(f, "no source"),
            PlayRejected::NotAllowed => write!(f, "not allowed"),
            PlayRejected::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Lifecycle events raised by a sink for its current source.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Stream headers are known.
    Loaded,
    /// Enough data is available to start.
    CanPlay,
    Playing,
    /// Playback stalled waiting for data.
    Waiting,
    Ended,
    Error(String),
}

/// Port for the surface that decodes and presents media.
pub trait MediaSink {
    /// Replaces the current source. Playback stops until `play()` is called.
    fn set_source(&mut self, url: &str);

    /// Drops the current source and releases decoding resources.
    fn clear_source(&mut self);

    fn source(&self) -> Option<&str>;

    /// Requests playback.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayRejected`] reason when the sink refuses to start.
    fn play(&mut self) -> Result<(), PlayRejected>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    fn is_muted(&self) -> bool;

    /// Applies the mute flag to the live output without touching the source.
    fn set_muted(&mut self, muted: bool);

    /// Returns true if the sink can open adaptive manifests directly.
    fn supports_native_manifest(&self) -> bool;
}
