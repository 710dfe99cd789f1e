// SPDX-License-Identifier: MPL-2.0
//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use iced_stories::application::gesture::GestureLedger;
use iced_stories::application::playback::{
    BandwidthHistory, ControllerSettings, SessionController, SessionId,
};
use iced_stories::application::port::{
    AdaptiveEngine, EngineConfig, EngineFactory, ManualClock, MediaSink, MemoryStore,
    PlayRejected, VideoCatalog,
};
use iced_stories::domain::error::CatalogError;
use iced_stories::domain::story::{PlayableItem, StartVideo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sink command, in the order it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    SetSource(String),
    ClearSource,
    Play,
    Pause,
    SetMuted(bool),
}

/// Sink that records every command and refuses a configurable number of
/// play requests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    pub refusals: u32,
    pub native_manifest: bool,
    source: Option<String>,
    paused: bool,
    muted: bool,
}

impl RecordingSink {
    pub fn play_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == SinkCall::Play).count()
    }

    pub fn sources_set(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::SetSource(_)))
            .count()
    }
}

impl MediaSink for RecordingSink {
    fn set_source(&mut self, url: &str) {
        self.calls.push(SinkCall::SetSource(url.to_string()));
        self.source = Some(url.to_string());
        self.paused = true;
    }

    fn clear_source(&mut self) {
        self.calls.push(SinkCall::ClearSource);
        self.source = None;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        self.calls.push(SinkCall::Play);
        if self.source.is_none() {
            return Err(PlayRejected::NoSource);
        }
        if self.refusals > 0 {
            self.refusals -= 1;
            return Err(PlayRejected::NotAllowed);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(SinkCall::Pause);
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(SinkCall::SetMuted(muted));
        self.muted = muted;
    }

    fn supports_native_manifest(&self) -> bool {
        self.native_manifest
    }
}

/// Counts engines attached at the same time, and the peak of that count.
#[derive(Debug, Default)]
pub struct EngineLog {
    attached: AtomicUsize,
    peak: AtomicUsize,
    pub created: Mutex<Vec<(SessionId, EngineConfig)>>,
    pub loaded: Mutex<Vec<String>>,
}

impl EngineLog {
    pub fn attached(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct FakeEngine {
    log: Arc<EngineLog>,
    attached: bool,
}

impl AdaptiveEngine for FakeEngine {
    fn attach(&mut self, _sink: &mut dyn MediaSink) {
        if !self.attached {
            self.attached = true;
            let now = self.log.attached.fetch_add(1, Ordering::SeqCst) + 1;
            self.log.peak.fetch_max(now, Ordering::SeqCst);
        }
    }

    fn load(&mut self, manifest_url: &str) {
        if let Ok(mut loaded) = self.log.loaded.lock() {
            loaded.push(manifest_url.to_string());
        }
    }

    fn destroy(&mut self) {
        if std::mem::take(&mut self.attached) {
            self.log.attached.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

pub struct FakeEngines {
    pub log: Arc<EngineLog>,
    pub supported: bool,
}

impl EngineFactory for FakeEngines {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(&mut self, session: SessionId, config: EngineConfig) -> Box<dyn AdaptiveEngine> {
        if let Ok(mut created) = self.log.created.lock() {
            created.push((session, config));
        }
        Box::new(FakeEngine {
            log: Arc::clone(&self.log),
            attached: false,
        })
    }
}

pub type TestController = SessionController<RecordingSink, FakeEngines, MemoryStore>;

/// Controller wired to fakes, plus handles to observe them.
pub struct Harness {
    pub controller: TestController,
    pub engines: Arc<EngineLog>,
    pub clock: ManualClock,
}

pub fn harness(engine_supported: bool) -> Harness {
    harness_with_store(engine_supported, MemoryStore::new())
}

pub fn harness_with_store(engine_supported: bool, store: MemoryStore) -> Harness {
    let clock = ManualClock::new();
    let ledger = GestureLedger::new(Arc::new(clock.clone()));
    let engines = Arc::new(EngineLog::default());
    let controller = SessionController::new(
        RecordingSink::default(),
        FakeEngines {
            log: Arc::clone(&engines),
            supported: engine_supported,
        },
        BandwidthHistory::new(store),
        ledger,
        ControllerSettings::default(),
    );
    Harness {
        controller,
        engines,
        clock,
    }
}

pub fn item(id: u64, manifest: Option<&str>, progressive: Option<&str>) -> PlayableItem {
    PlayableItem {
        id,
        content_id: format!("uuid-{id}"),
        title: format!("Story {id}"),
        author: "alice".into(),
        author_url: Some("https://tube.example/a/alice".into()),
        host: "tube.example".into(),
        thumbnail_url: None,
        duration_secs: 12.0,
        manifest_url: manifest.map(str::to_string),
        progressive_url: progressive.map(str::to_string),
        page_url: format!("https://tube.example/w/uuid-{id}"),
    }
}

pub fn items(count: u64) -> Vec<PlayableItem> {
    (1..=count)
        .map(|id| item(id, None, Some(&format!("https://cdn.example/{id}.mp4"))))
        .collect()
}

/// Catalog serving canned answers.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    pub start: Result<StartVideo, CatalogError>,
    pub listing: Result<Vec<PlayableItem>, CatalogError>,
    pub listed_with: Arc<Mutex<Option<(Option<u64>, Option<String>)>>>,
}

impl StaticCatalog {
    pub fn new(start: StartVideo, listing: Vec<PlayableItem>) -> Self {
        Self {
            start: Ok(start),
            listing: Ok(listing),
            listed_with: Arc::new(Mutex::new(None)),
        }
    }

    pub fn listed_with(&self) -> Option<(Option<u64>, Option<String>)> {
        self.listed_with.lock().ok().and_then(|guard| guard.clone())
    }
}

impl VideoCatalog for StaticCatalog {
    async fn resolve_start_video(&self) -> Result<StartVideo, CatalogError> {
        self.start.clone()
    }

    async fn fetch_channel_videos(
        &self,
        channel_id: Option<u64>,
        account_name: Option<&str>,
    ) -> Result<Vec<PlayableItem>, CatalogError> {
        if let Ok(mut listed) = self.listed_with.lock() {
            *listed = Some((channel_id, account_name.map(str::to_string)));
        }
        self.listing.clone()
    }
}

pub fn start_video(channel_id: Option<u64>, account_name: Option<&str>) -> StartVideo {
    StartVideo {
        video_id: 42,
        content_id: "uuid-42".into(),
        channel_id,
        account_name: account_name.map(str::to_string),
    }
}
