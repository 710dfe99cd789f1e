// SPDX-License-Identifier: MPL-2.0
//! Session identity and lifecycle.

use std::fmt;

/// Generation number of a playback session.
///
/// Every bind produces a fresh id; events and timers tagged with an older id
/// belong to an abandoned item and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of one playback session.
///
/// `Idle → Attaching → {Ready, NoSource} → Playing ⇄ Buffering → {Ended, Fatal}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing bound.
    #[default]
    Idle,
    /// Source chosen, waiting for the sink to report readiness.
    Attaching,
    /// The sink can play; playback may still be blocked.
    Ready,
    /// The item had no usable source.
    NoSource,
    Playing,
    /// Playback stalled waiting for data.
    Buffering,
    /// Natural completion.
    Ended,
    /// Unrecoverable failure, fallbacks exhausted.
    Fatal,
}

impl SessionState {
    /// Returns true once the session can no longer produce playback.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::NoSource | Self::Ended | Self::Fatal)
    }

    /// Returns true while frames are flowing or about to flow.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Buffering)
    }
}
