// SPDX-License-Identifier: MPL-2.0
//! [`MediaSink`] implementation driven by the FFmpeg subscription.

use super::decoder::StreamCommand;
use super::subscription::SinkCommandSender;
use crate::application::port::{MediaSink, PlayRejected};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Playback position shared with the decode loop (f64 bits).
#[derive(Debug, Clone, Default)]
pub struct SharedPosition(Arc<AtomicU64>);

impl SharedPosition {
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, secs: f64) {
        self.0.store(secs.to_bits(), Ordering::Relaxed);
    }
}

/// Sink state owned by the application.
///
/// The decode worker is reached through a command sender that the playback
/// subscription hands over with [`FfmpegSink::connect`]. Until then `play()`
/// is refused with [`PlayRejected::NotAllowed`].
#[derive(Debug)]
pub struct FfmpegSink {
    source: Option<String>,
    generation: u64,
    commands: Option<SinkCommandSender>,
    paused: bool,
    muted: bool,
    position: SharedPosition,
}

impl Default for FfmpegSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            generation: 0,
            commands: None,
            paused: true,
            muted: false,
            position: SharedPosition::default(),
        }
    }

    /// Identifies the current source; changes on every source change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if messages tagged with `generation` belong to the
    /// current source.
    #[must_use]
    pub fn accepts(&self, generation: u64) -> bool {
        self.source.is_some() && generation == self.generation
    }

    /// Wires the decode worker for `generation`. Stale handshakes are ignored.
    pub fn connect(&mut self, generation: u64, commands: SinkCommandSender) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.commands = Some(commands);
        true
    }

    /// Position handle for the decode worker.
    #[must_use]
    pub fn position(&self) -> SharedPosition {
        self.position.clone()
    }

    fn reset(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(StreamCommand::Stop);
        }
        self.generation = self.generation.wrapping_add(1);
        self.paused = true;
        self.position = SharedPosition::default();
    }
}

impl MediaSink for FfmpegSink {
    fn set_source(&mut self, url: &str) {
        self.reset();
        self.source = Some(url.to_string());
    }

    fn clear_source(&mut self) {
        self.reset();
        self.source = None;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        if self.source.is_none() {
            return Err(PlayRejected::NoSource);
        }
        let Some(commands) = &self.commands else {
            return Err(PlayRejected::NotAllowed);
        };
        commands
            .send(StreamCommand::Play)
            .map_err(|_| PlayRejected::Interrupted)?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        if let Some(commands) = &self.commands {
            let _ = commands.send(StreamCommand::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position.get()
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn supports_native_manifest(&self) -> bool {
        true
    }
}
