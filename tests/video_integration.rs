// SPDX-License-Identifier: MPL-2.0
//! Integration tests of the session controller driving the FFmpeg sink and
//! the HLS engine front-end, without a running decoder or network worker.

mod common;

use common::item;
use iced_stories::application::gesture::GestureLedger;
use iced_stories::application::playback::{
    BandwidthHistory, ControllerSettings, Effect, SessionController, SourcePlan,
};
use iced_stories::application::port::{
    EngineEvent, ManualClock, MediaSink, MemoryStore, SinkEvent,
};
use iced_stories::infrastructure::ffmpeg::FfmpegSink;
use iced_stories::infrastructure::hls::{EngineCommand, EngineHandle, HlsEngineFactory};
use std::sync::Arc;
use tokio::sync::mpsc;

const MANIFEST: &str = "https://tube.example/static/streaming-playlists/hls/a/master.m3u8";
const PROGRESSIVE: &str = "https://tube.example/static/web-videos/a-720.mp4";

type Controller = SessionController<FfmpegSink, HlsEngineFactory, MemoryStore>;

fn controller() -> Controller {
    SessionController::new(
        FfmpegSink::new(),
        HlsEngineFactory::new(),
        BandwidthHistory::new(MemoryStore::new()),
        GestureLedger::new(Arc::new(ManualClock::new())),
        ControllerSettings::default(),
    )
}

fn connect_worker(c: &mut Controller) -> mpsc::UnboundedReceiver<EngineCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    c.engines_mut().connect(EngineHandle::new(tx));
    rx
}

#[test]
fn manifest_goes_to_ffmpeg_until_the_worker_is_ready() {
    let mut c = controller();
    let binding = c
        .bind(&item(1, Some(MANIFEST), Some(PROGRESSIVE)), true, true)
        .unwrap();
    assert!(matches!(c.plan(), Some(SourcePlan::NativeManifest { .. })));
    assert_eq!(c.sink().source(), Some(MANIFEST));

    // The decoder has not connected yet, so the first attempt is refused.
    assert!(matches!(
        binding.effects.as_slice(),
        [Effect::ScheduleRetry { .. }]
    ));
}

#[test]
fn connected_worker_receives_load_and_destroy_in_order() {
    let mut c = controller();
    let mut rx = connect_worker(&mut c);

    let first = c
        .bind(&item(1, Some(MANIFEST), Some(PROGRESSIVE)), true, false)
        .unwrap();
    assert!(matches!(c.plan(), Some(SourcePlan::Adaptive { .. })));
    assert_eq!(c.sink().source(), None);

    let second = c.bind(&item(2, Some(MANIFEST), None), true, false).unwrap();

    match rx.try_recv() {
        Ok(EngineCommand::Load { session, url, .. }) => {
            assert_eq!(session, first.session);
            assert_eq!(url, MANIFEST);
        }
        other => panic!("expected first load, got {other:?}"),
    }
    assert_eq!(
        rx.try_recv().ok(),
        Some(EngineCommand::Destroy {
            session: first.session
        })
    );
    assert!(matches!(
        rx.try_recv(),
        Ok(EngineCommand::Load { session, .. }) if session == second.session
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn rendition_choice_reaches_the_sink() {
    let mut c = controller();
    let _rx = connect_worker(&mut c);
    let binding = c.bind(&item(3, Some(MANIFEST), None), true, false).unwrap();
    let before = c.sink().generation();

    c.handle_engine_event(
        binding.session,
        EngineEvent::MediaSource {
            url: "https://tube.example/hls/a/480.m3u8".into(),
        },
    );
    assert_eq!(c.sink().source(), Some("https://tube.example/hls/a/480.m3u8"));
    assert_ne!(c.sink().generation(), before);
}

#[test]
fn engine_fatal_destroys_and_falls_back_to_progressive() {
    let mut c = controller();
    let mut rx = connect_worker(&mut c);
    let binding = c
        .bind(&item(4, Some(MANIFEST), Some(PROGRESSIVE)), true, false)
        .unwrap();
    let _load = rx.try_recv();

    let effects = c.handle_engine_event(
        binding.session,
        EngineEvent::Fatal {
            reason: "manifest unreachable".into(),
        },
    );
    assert!(effects
        .iter()
        .all(|effect| !matches!(effect, Effect::Fatal { .. })));
    assert_eq!(
        rx.try_recv().ok(),
        Some(EngineCommand::Destroy {
            session: binding.session
        })
    );
    assert_eq!(c.sink().source(), Some(PROGRESSIVE));
}

#[test]
fn stopped_worker_falls_back_to_native_manifest() {
    let mut c = controller();
    let rx = connect_worker(&mut c);
    drop(rx);

    c.bind(&item(5, Some(MANIFEST), None), true, false).unwrap();
    assert!(matches!(c.plan(), Some(SourcePlan::NativeManifest { .. })));
}

#[test]
fn stale_sink_generation_is_not_accepted() {
    let mut c = controller();
    c.bind(&item(6, None, Some(PROGRESSIVE)), true, false).unwrap();
    let old = c.sink().generation();
    c.bind(&item(7, None, Some(PROGRESSIVE)), true, false).unwrap();

    assert!(!c.sink().accepts(old));
    assert!(c.sink().accepts(c.sink().generation()));

    c.teardown();
    assert!(!c.sink().accepts(c.sink().generation()));
    assert!(c.handle_sink_event(SinkEvent::Ended).is_empty());
}
