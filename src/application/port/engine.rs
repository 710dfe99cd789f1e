// SPDX-License-Identifier: MPL-2.0
//! Adaptive streaming engine port.
//!
//! An engine turns an adaptive manifest into a concrete stream for the sink.
//! It is created per session, attached to the sink, fed a manifest URL and
//! destroyed on teardown. Everything it learns comes back as
//! [`EngineEvent`]s tagged with its [`SessionId`].

use super::sink::MediaSink;
use crate::domain::playback::SessionId;
use std::time::Duration;

/// Startup tuning handed to every engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Bandwidth estimate used before any measurement, in bits per second.
    pub start_bandwidth_bps: f64,
    /// Rendition probed first (0 = lowest bitrate).
    pub start_level: usize,
    /// Upper bound on media fetched ahead of the playhead.
    pub max_forward_buffer: Duration,
    /// Upper bound on bytes held for any single download.
    pub max_buffer_bytes: usize,
}

/// Telemetry moments that carry a bandwidth estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryKind {
    ManifestLoaded,
    LevelSwitched { level: usize },
    FragmentLoaded,
}

/// Events raised by an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A measurement moment, with the engine's current estimate if known.
    Telemetry {
        kind: TelemetryKind,
        bandwidth_bps: Option<f64>,
    },
    /// The stream the sink should open.
    MediaSource { url: String },
    /// The engine gave up on this manifest.
    Fatal { reason: String },
}

/// One adaptive pipeline bound to one session.
pub trait AdaptiveEngine: Send {
    /// Takes ownership of `sink` for this session.
    fn attach(&mut self, sink: &mut dyn MediaSink);

    /// Starts loading the manifest.
    fn load(&mut self, manifest_url: &str);

    /// Stops all work and detaches. No events are delivered afterwards.
    fn destroy(&mut self);
}

/// Creates engines for sessions.
pub trait EngineFactory {
    /// Returns true if engines can currently be created.
    fn is_supported(&self) -> bool;

    fn create(&mut self, session: SessionId, config: EngineConfig) -> Box<dyn AdaptiveEngine>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn AdaptiveEngine) {}
    fn _assert_factory_object_safe(_: &dyn EngineFactory) {}

    #[test]
    fn telemetry_kinds_compare_by_level() {
        assert_ne!(
            TelemetryKind::LevelSwitched { level: 0 },
            TelemetryKind::LevelSwitched { level: 1 }
        );
    }
}
