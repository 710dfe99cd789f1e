// SPDX-License-Identifier: MPL-2.0
//! Playback failures reported by the session controller.

use std::fmt;

/// Failures that end playback of a single story item.
///
/// None of these are fatal to the story sequence: the shell answers every
/// one of them by advancing to the next item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The item carries neither a usable manifest nor a progressive file.
    NoPlayableSource,

    /// The adaptive engine failed and no progressive fallback was available.
    EngineFatal(String),

    /// The media sink reported an unrecoverable error.
    SinkFailure(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NoPlayableSource => write!(f, "No playable source"),
            PlaybackError::EngineFatal(reason) => write!(f, "Adaptive engine fatal: {reason}"),
            PlaybackError::SinkFailure(reason) => write!(f, "Media sink error: {reason}"),
        }
    }
}

impl std::error::Error for PlaybackError {}
