// SPDX-License-Identifier: MPL-2.0
//! Session controller.

use super::attempts::{PlayAttempts, Readiness, Rejection};
use super::bandwidth::BandwidthHistory;
use crate::application::gesture::{GestureLedger, DEFAULT_GESTURE_WINDOW};
use crate::application::port::{
    AdaptiveEngine, EngineConfig, EngineEvent, EngineFactory, KeyValueStore, MediaSink,
    SinkEvent,
};
use crate::domain::error::PlaybackError;
use crate::domain::playback::{
    select_source, SessionId, SessionState, SourceCapabilities, SourcePlan,
};
use crate::domain::story::PlayableItem;
use std::time::Duration;

/// Tuning knobs resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// How long after a gesture playback may start immediately.
    pub gesture_window: Duration,
    /// Delay before the single retry of a refused play request.
    pub retry_delay: Duration,
    /// Rendition probed first by adaptive engines.
    pub start_level: usize,
    pub max_forward_buffer: Duration,
    pub max_buffer_bytes: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            gesture_window: DEFAULT_GESTURE_WINDOW,
            retry_delay: Duration::from_millis(100),
            start_level: 0,
            max_forward_buffer: Duration::from_secs(30),
            max_buffer_bytes: 20 * 1000 * 1000,
        }
    }
}

/// Follow-ups the caller has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call [`SessionController::retry_elapsed`] after `delay`.
    ScheduleRetry { session: SessionId, delay: Duration },
    /// The first frame of the session is on screen.
    Started { session: SessionId },
    /// The item played to completion.
    Ended { session: SessionId },
    /// The item cannot be played; advance past it.
    Fatal {
        session: SessionId,
        error: PlaybackError,
    },
}

/// Result of a successful [`SessionController::bind`].
#[derive(Debug)]
pub struct Binding {
    pub session: SessionId,
    pub effects: Vec<Effect>,
}

struct Session {
    id: SessionId,
    item_id: u64,
    plan: SourcePlan,
    /// Progressive URL kept for a manifest-based plan.
    fallback: Option<String>,
    engine: Option<Box<dyn AdaptiveEngine>>,
    attempts: PlayAttempts,
    started_reported: bool,
    terminal_reported: bool,
}

/// Owns the binding between the current item and the media sink.
pub struct SessionController<S, F, K> {
    sink: S,
    engines: F,
    bandwidth: BandwidthHistory<K>,
    ledger: GestureLedger,
    settings: ControllerSettings,
    session: Option<Session>,
    state: SessionState,
    last_id: SessionId,
    /// A press is holding playback; attempts wait for its release.
    held: bool,
}

impl<S, F, K> SessionController<S, F, K>
where
    S: MediaSink,
    F: EngineFactory,
    K: KeyValueStore,
{
    pub fn new(
        sink: S,
        engines: F,
        bandwidth: BandwidthHistory<K>,
        ledger: GestureLedger,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            sink,
            engines,
            bandwidth,
            ledger,
            settings,
            session: None,
            state: SessionState::Idle,
            last_id: SessionId::default(),
            held: false,
        }
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Binds `item` to the sink, replacing whatever was bound before.
    ///
    /// The previous session is torn down first, so at no point do two
    /// engines hold the sink.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NoPlayableSource`] when the item has no
    /// source this platform can use. The sink is left empty.
    pub fn bind(
        &mut self,
        item: &PlayableItem,
        muted: bool,
        auto_start: bool,
    ) -> Result<Binding, PlaybackError> {
        self.teardown();

        let id = self.last_id.next();
        self.last_id = id;
        self.sink.set_muted(muted);

        let caps = SourceCapabilities {
            adaptive_engine: self.engines.is_supported(),
            native_manifest: self.sink.supports_native_manifest(),
        };
        let plan = match select_source(caps, item.manifest(), item.progressive()) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(item = item.id, session = %id, "no playable source");
                self.state = SessionState::NoSource;
                return Err(err);
            }
        };
        tracing::debug!(item = item.id, session = %id, plan = ?plan, "source selected");

        let fallback = match plan {
            SourcePlan::Progressive { .. } => None,
            _ => item.progressive().map(str::to_string),
        };

        let engine = match &plan {
            SourcePlan::Adaptive { manifest } => {
                let config = EngineConfig {
                    start_bandwidth_bps: self.bandwidth.seed_bps(),
                    start_level: self.settings.start_level,
                    max_forward_buffer: self.settings.max_forward_buffer,
                    max_buffer_bytes: self.settings.max_buffer_bytes,
                };
                let mut engine = self.engines.create(id, config);
                engine.attach(&mut self.sink);
                engine.load(manifest);
                Some(engine)
            }
            SourcePlan::NativeManifest { manifest } => {
                self.sink.set_source(manifest);
                None
            }
            SourcePlan::Progressive { url } => {
                self.sink.set_source(url);
                None
            }
        };

        self.session = Some(Session {
            id,
            item_id: item.id,
            plan,
            fallback,
            engine,
            attempts: PlayAttempts::new(),
            started_reported: false,
            terminal_reported: false,
        });
        self.state = SessionState::Attaching;

        let mut effects = Vec::new();
        if auto_start || self.ledger.is_within_window(self.settings.gesture_window) {
            effects.extend(self.attempt_play());
        }
        Ok(Binding {
            session: id,
            effects,
        })
    }

    /// Releases the current session: engine destroyed, sink emptied.
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(mut engine) = session.engine.take() {
                engine.destroy();
            }
            self.sink.pause();
            self.sink.clear_source();
            tracing::debug!(item = session.item_id, session = %session.id, "session torn down");
        }
        self.state = SessionState::Idle;
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Routes a sink lifecycle event into the current session.
    pub fn handle_sink_event(&mut self, event: SinkEvent) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match event {
            SinkEvent::Loaded => {
                if session.attempts.on_readiness(Readiness::Loaded) {
                    return self.attempt_play();
                }
            }
            SinkEvent::CanPlay => {
                if self.state == SessionState::Attaching {
                    self.state = SessionState::Ready;
                }
                if session.attempts.on_readiness(Readiness::CanPlay) {
                    return self.attempt_play();
                }
            }
            SinkEvent::Playing => {
                if self.state.is_terminal() {
                    return Vec::new();
                }
                self.state = SessionState::Playing;
                session.attempts.on_started();
                if !session.started_reported {
                    session.started_reported = true;
                    tracing::info!(item = session.item_id, session = %session.id, "playback started");
                    return vec![Effect::Started {
                        session: session.id,
                    }];
                }
            }
            SinkEvent::Waiting => {
                if self.state == SessionState::Playing {
                    self.state = SessionState::Buffering;
                }
            }
            SinkEvent::Ended => {
                if !session.terminal_reported {
                    session.terminal_reported = true;
                    self.state = SessionState::Ended;
                    return vec![Effect::Ended {
                        session: session.id,
                    }];
                }
            }
            SinkEvent::Error(reason) => {
                tracing::warn!(item = session.item_id, session = %session.id, %reason, "sink error");
                if session.fallback.is_some() {
                    return self.switch_to_fallback();
                }
                return self.fail(PlaybackError::SinkFailure(reason));
            }
        }
        Vec::new()
    }

    /// Routes an engine event. Events from older sessions are dropped.
    pub fn handle_engine_event(&mut self, from: SessionId, event: EngineEvent) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.id != from || session.engine.is_none() {
            tracing::debug!(session = %from, "stale engine event dropped");
            return Vec::new();
        }
        match event {
            EngineEvent::Telemetry {
                kind,
                bandwidth_bps,
            } => {
                if let Some(bps) = bandwidth_bps {
                    tracing::debug!(?kind, bps, "engine telemetry");
                    self.bandwidth.record(bps);
                }
                Vec::new()
            }
            EngineEvent::MediaSource { url } => {
                self.sink.set_source(&url);
                Vec::new()
            }
            EngineEvent::Fatal { reason } => {
                tracing::warn!(item = session.item_id, session = %session.id, %reason, "adaptive engine fatal");
                if let Some(mut engine) = session.engine.take() {
                    engine.destroy();
                }
                if session.fallback.is_some() {
                    self.switch_to_fallback()
                } else {
                    self.fail(PlaybackError::EngineFatal(reason))
                }
            }
        }
    }

    /// Fires the armed retry of `session`.
    pub fn retry_elapsed(&mut self, session: SessionId) -> Vec<Effect> {
        let due = match self.session.as_mut() {
            Some(current) if current.id == session => current.attempts.on_retry_elapsed(),
            _ => false,
        };
        if due {
            self.attempt_play()
        } else {
            Vec::new()
        }
    }

    // =========================================================================
    // Live controls
    // =========================================================================

    /// Applies mute to the sink only; the source is left alone.
    pub fn set_muted(&mut self, muted: bool) {
        self.sink.set_muted(muted);
    }

    /// Pauses the live sink for a press. Until [`resume`](Self::resume),
    /// no play attempt reaches the sink.
    pub fn pause(&mut self) {
        self.held = true;
        if self.session.is_some() && !self.sink.is_paused() {
            self.sink.pause();
        }
    }

    /// Releases a press. A session that has not started yet makes its
    /// pending attempt now; a started one resumes the sink.
    pub fn resume(&mut self) -> Vec<Effect> {
        self.held = false;
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        if self.state.is_terminal() {
            return Vec::new();
        }
        if session.attempts.is_pending() {
            return self.attempt_play();
        }
        if self.sink.is_paused() {
            if let Err(reason) = self.sink.play() {
                tracing::debug!(%reason, "resume refused");
            }
        }
        Vec::new()
    }

    /// Current playback position in seconds.
    pub fn current_time(&self) -> f64 {
        self.sink.current_time()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the bound session, if any.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Source plan of the bound session.
    pub fn plan(&self) -> Option<&SourcePlan> {
        self.session.as_ref().map(|s| &s.plan)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn engines_mut(&mut self) -> &mut F {
        &mut self.engines
    }

    pub fn ledger(&self) -> &GestureLedger {
        &self.ledger
    }

    pub fn bandwidth(&self) -> &BandwidthHistory<K> {
        &self.bandwidth
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn attempt_play(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if !session.attempts.is_pending() {
            return Vec::new();
        }
        if self.held {
            tracing::debug!(item = session.item_id, session = %session.id, "play deferred until release");
            return Vec::new();
        }
        match self.sink.play() {
            Ok(()) => {
                tracing::debug!(item = session.item_id, session = %session.id, "play accepted");
                session.attempts.on_started();
                Vec::new()
            }
            Err(reason) => {
                tracing::debug!(item = session.item_id, session = %session.id, %reason, "play refused");
                match session.attempts.on_rejected() {
                    Rejection::ScheduleRetry => vec![Effect::ScheduleRetry {
                        session: session.id,
                        delay: self.settings.retry_delay,
                    }],
                    Rejection::AwaitReadiness => Vec::new(),
                    Rejection::GaveUp => {
                        tracing::warn!(item = session.item_id, session = %session.id, "giving up on starting playback");
                        Vec::new()
                    }
                }
            }
        }
    }

    fn switch_to_fallback(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(url) = session.fallback.take() else {
            return Vec::new();
        };
        if let Some(mut engine) = session.engine.take() {
            engine.destroy();
        }
        tracing::info!(item = session.item_id, session = %session.id, "falling back to progressive source");
        self.sink.set_source(&url);
        session.plan = SourcePlan::Progressive { url };
        session.attempts.reset();
        self.state = SessionState::Attaching;
        self.attempt_play()
    }

    fn fail(&mut self, error: PlaybackError) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if let Some(mut engine) = session.engine.take() {
            engine.destroy();
        }
        if session.terminal_reported {
            return Vec::new();
        }
        session.terminal_reported = true;
        self.state = SessionState::Fatal;
        vec![Effect::Fatal {
            session: session.id,
            error,
        }]
    }
}
