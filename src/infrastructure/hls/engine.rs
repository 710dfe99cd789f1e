// SPDX-License-Identifier: MPL-2.0
//! [`AdaptiveEngine`] front-end for the HLS worker.
//!
//! Engines are cheap handles: they only forward `Load`/`Destroy` commands to
//! the worker subscription, which performs the network work and reports
//! back per session.

use crate::application::port::{AdaptiveEngine, EngineConfig, EngineFactory, MediaSink};
use crate::domain::playback::SessionId;
use tokio::sync::mpsc;

/// Commands understood by the HLS worker.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load {
        session: SessionId,
        url: String,
        config: EngineConfig,
    },
    Destroy {
        session: SessionId,
    },
}

/// Cloneable sender to the HLS worker.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<EngineCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, command: EngineCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("HLS worker is not running");
        }
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Hands out [`HlsEngine`]s once the worker is connected.
#[derive(Debug, Default)]
pub struct HlsEngineFactory {
    worker: Option<EngineHandle>,
}

impl HlsEngineFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the running worker.
    pub fn connect(&mut self, worker: EngineHandle) {
        self.worker = Some(worker);
    }
}

impl EngineFactory for HlsEngineFactory {
    fn is_supported(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.tx.is_closed())
    }

    fn create(&mut self, session: SessionId, config: EngineConfig) -> Box<dyn AdaptiveEngine> {
        Box::new(HlsEngine {
            session,
            config,
            worker: self.worker.clone(),
            loaded: false,
            destroyed: false,
        })
    }
}

/// One adaptive pipeline, identified by its session.
#[derive(Debug)]
pub struct HlsEngine {
    session: SessionId,
    config: EngineConfig,
    worker: Option<EngineHandle>,
    loaded: bool,
    destroyed: bool,
}

impl AdaptiveEngine for HlsEngine {
    fn attach(&mut self, sink: &mut dyn MediaSink) {
        // The sink stays empty until the worker picks a rendition.
        if sink.source().is_some() {
            sink.clear_source();
        }
    }

    fn load(&mut self, manifest_url: &str) {
        if self.destroyed {
            return;
        }
        let Some(worker) = &self.worker else {
            tracing::warn!(session = %self.session, "load without HLS worker");
            return;
        };
        worker.send(EngineCommand::Load {
            session: self.session,
            url: manifest_url.to_string(),
            config: self.config,
        });
        self.loaded = true;
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if self.loaded {
            if let Some(worker) = &self.worker {
                worker.send(EngineCommand::Destroy {
                    session: self.session,
                });
            }
        }
    }
}

impl Drop for HlsEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> EngineConfig {
        EngineConfig {
            start_bandwidth_bps: 500_000.0,
            start_level: 0,
            max_forward_buffer: Duration::from_secs(30),
            max_buffer_bytes: 20_000_000,
        }
    }

    fn connected() -> (HlsEngineFactory, mpsc::UnboundedReceiver<EngineCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut factory = HlsEngineFactory::new();
        factory.connect(EngineHandle::new(tx));
        (factory, rx)
    }

    #[test]
    fn unsupported_until_worker_connects() {
        let factory = HlsEngineFactory::new();
        assert!(!factory.is_supported());
        let (factory, _rx) = connected();
        assert!(factory.is_supported());
    }

    #[test]
    fn closed_worker_is_not_supported() {
        let (factory, rx) = connected();
        drop(rx);
        assert!(!factory.is_supported());
    }

    #[test]
    fn load_then_destroy_sends_both_commands_once() {
        let (mut factory, mut rx) = connected();
        let session = SessionId::new(3);
        let mut engine = factory.create(session, config());

        engine.load("https://tube.example/master.m3u8");
        engine.destroy();
        engine.destroy();
        drop(engine);

        assert!(matches!(
            rx.try_recv(),
            Ok(EngineCommand::Load { session: s, .. }) if s == session
        ));
        assert_eq!(rx.try_recv().ok(), Some(EngineCommand::Destroy { session }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_a_loaded_engine_destroys_it() {
        let (mut factory, mut rx) = connected();
        let session = SessionId::new(9);
        {
            let mut engine = factory.create(session, config());
            engine.load("https://tube.example/master.m3u8");
        }
        let _load = rx.try_recv();
        assert_eq!(rx.try_recv().ok(), Some(EngineCommand::Destroy { session }));
    }

    #[test]
    fn load_after_destroy_is_ignored() {
        let (mut factory, mut rx) = connected();
        let mut engine = factory.create(SessionId::new(1), config());
        engine.destroy();
        engine.load("https://tube.example/master.m3u8");
        assert!(rx.try_recv().is_err());
    }
}
