// SPDX-License-Identifier: MPL-2.0
mod common;

use approx::assert_relative_eq;
use common::{harness, harness_with_store, item, SinkCall};
use iced_stories::application::playback::{
    Effect, SessionState, SourcePlan, BANDWIDTH_KEY, DEFAULT_SEED_BPS,
};
use iced_stories::application::port::{
    EngineEvent, KeyValueStore, MediaSink, MemoryStore, SinkEvent, TelemetryKind,
};
use iced_stories::domain::error::PlaybackError;

const MANIFEST: &str = "https://tube.example/hls/master.m3u8";
const PROGRESSIVE: &str = "https://tube.example/web-videos/clip-720.mp4";

#[test]
fn rapid_navigation_never_attaches_two_engines() {
    let mut h = harness(true);
    for id in 0..12 {
        let story = if id % 3 == 2 {
            item(id, None, Some(PROGRESSIVE))
        } else {
            item(id, Some(MANIFEST), Some(PROGRESSIVE))
        };
        h.controller.bind(&story, true, false).unwrap();
        assert!(h.engines.attached() <= 1);
    }
    assert_eq!(h.engines.peak(), 1);

    h.controller.teardown();
    assert_eq!(h.engines.attached(), 0);
    assert_eq!(h.controller.sink().source(), None);
    assert_eq!(h.controller.state(), SessionState::Idle);
}

#[test]
fn source_preference_follows_platform_capabilities() {
    let story = item(1, Some(MANIFEST), Some(PROGRESSIVE));

    let mut adaptive = harness(true);
    adaptive.controller.bind(&story, true, false).unwrap();
    assert!(matches!(
        adaptive.controller.plan(),
        Some(SourcePlan::Adaptive { .. })
    ));
    assert_eq!(adaptive.engines.loaded.lock().unwrap().as_slice(), [MANIFEST]);

    let mut native = harness(false);
    native.controller.sink_mut().native_manifest = true;
    native.controller.bind(&story, true, false).unwrap();
    assert_eq!(native.controller.sink().source(), Some(MANIFEST));
    assert_eq!(native.engines.peak(), 0);

    let mut plain = harness(false);
    plain.controller.bind(&story, true, false).unwrap();
    assert_eq!(plain.controller.sink().source(), Some(PROGRESSIVE));
}

#[test]
fn native_manifest_error_falls_back_then_fails_once() {
    let mut h = harness(false);
    h.controller.sink_mut().native_manifest = true;
    let binding = h
        .controller
        .bind(&item(3, Some(MANIFEST), Some(PROGRESSIVE)), true, false)
        .unwrap();

    let effects = h
        .controller
        .handle_sink_event(SinkEvent::Error("demuxer".into()));
    assert!(effects.is_empty());
    assert_eq!(h.controller.sink().source(), Some(PROGRESSIVE));

    let effects = h
        .controller
        .handle_sink_event(SinkEvent::Error("decoder".into()));
    assert_eq!(effects.len(), 1);
    assert!(matches!(
        &effects[0],
        Effect::Fatal { session, error: PlaybackError::SinkFailure(_) } if *session == binding.session
    ));

    assert!(h
        .controller
        .handle_sink_event(SinkEvent::Error("again".into()))
        .is_empty());
    assert!(h.controller.handle_sink_event(SinkEvent::Ended).is_empty());
}

#[test]
fn engine_fatal_after_fallback_is_not_reported() {
    let mut h = harness(true);
    let binding = h
        .controller
        .bind(&item(4, Some(MANIFEST), Some(PROGRESSIVE)), true, false)
        .unwrap();
    let effects = h.controller.handle_engine_event(
        binding.session,
        EngineEvent::Fatal {
            reason: "levelLoadError".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(h.engines.attached(), 0);
    assert!(matches!(
        h.controller.plan(),
        Some(SourcePlan::Progressive { .. })
    ));

    // The destroyed engine may still have events in flight.
    let late = h.controller.handle_engine_event(
        binding.session,
        EngineEvent::Fatal {
            reason: "late".into(),
        },
    );
    assert!(late.is_empty());
}

#[test]
fn mute_changes_never_reload_the_source() {
    let mut h = harness(false);
    h.controller
        .bind(&item(5, None, Some(PROGRESSIVE)), true, true)
        .unwrap();
    let sources = h.controller.sink().sources_set();

    for muted in [false, true, false, true] {
        h.controller.set_muted(muted);
    }

    let sink = h.controller.sink();
    assert_eq!(sink.sources_set(), sources);
    assert!(!sink.calls.contains(&SinkCall::ClearSource));
    assert!(sink.is_muted());
}

#[test]
fn refused_start_is_bounded() {
    let mut h = harness(false);
    h.controller.sink_mut().refusals = u32::MAX;
    let binding = h
        .controller
        .bind(&item(6, None, Some(PROGRESSIVE)), true, true)
        .unwrap();
    assert!(matches!(
        binding.effects.as_slice(),
        [Effect::ScheduleRetry { .. }]
    ));

    assert!(h.controller.retry_elapsed(binding.session).is_empty());
    assert!(h.controller.handle_sink_event(SinkEvent::Loaded).is_empty());
    assert!(h.controller.handle_sink_event(SinkEvent::CanPlay).is_empty());
    assert_eq!(h.controller.sink().play_count(), 4);

    // Nothing left to spend: repeated readiness and stray timers are no-ops.
    h.controller.handle_sink_event(SinkEvent::CanPlay);
    h.controller.retry_elapsed(binding.session);
    assert_eq!(h.controller.sink().play_count(), 4);
    assert_eq!(h.controller.state(), SessionState::Ready);
}

#[test]
fn retry_timer_of_previous_session_is_ignored() {
    let mut h = harness(false);
    h.controller.sink_mut().refusals = 1;
    let first = h
        .controller
        .bind(&item(7, None, Some(PROGRESSIVE)), true, true)
        .unwrap();
    assert!(!first.effects.is_empty());

    h.controller
        .bind(&item(8, None, Some(PROGRESSIVE)), true, false)
        .unwrap();
    let plays = h.controller.sink().play_count();
    assert!(h.controller.retry_elapsed(first.session).is_empty());
    assert_eq!(h.controller.sink().play_count(), plays);
}

#[test]
fn held_press_defers_readiness_attempts() {
    let mut h = harness(false);
    h.controller.sink_mut().refusals = 1;
    let binding = h
        .controller
        .bind(&item(20, None, Some(PROGRESSIVE)), true, true)
        .unwrap();
    assert!(matches!(
        binding.effects.as_slice(),
        [Effect::ScheduleRetry { .. }]
    ));

    h.controller.pause();
    assert!(h.controller.handle_sink_event(SinkEvent::Loaded).is_empty());
    assert!(h.controller.handle_sink_event(SinkEvent::CanPlay).is_empty());
    assert_eq!(h.controller.sink().play_count(), 1);
    assert!(h.controller.sink().is_paused());

    // Releasing makes the attempt that was held back.
    assert!(h.controller.resume().is_empty());
    assert_eq!(h.controller.sink().play_count(), 2);
    assert!(!h.controller.sink().is_paused());
}

#[test]
fn held_press_defers_the_armed_retry() {
    let mut h = harness(false);
    h.controller.sink_mut().refusals = 1;
    let binding = h
        .controller
        .bind(&item(21, None, Some(PROGRESSIVE)), true, true)
        .unwrap();

    h.controller.pause();
    assert!(h.controller.retry_elapsed(binding.session).is_empty());
    assert_eq!(h.controller.sink().play_count(), 1);
    assert!(h.controller.sink().is_paused());

    h.controller.resume();
    assert_eq!(h.controller.sink().play_count(), 2);
    assert!(!h.controller.sink().is_paused());
    assert_eq!(h.controller.handle_sink_event(SinkEvent::Playing).len(), 1);
}

#[test]
fn bind_during_a_press_waits_for_release() {
    let mut h = harness(false);
    h.controller.pause();
    let binding = h
        .controller
        .bind(&item(22, None, Some(PROGRESSIVE)), true, true)
        .unwrap();
    assert!(binding.effects.is_empty());
    assert_eq!(h.controller.sink().play_count(), 0);

    h.controller.resume();
    assert_eq!(h.controller.sink().play_count(), 1);
}

#[test]
fn recent_gesture_starts_playback_without_autostart() {
    let mut h = harness(false);
    h.controller.ledger().mark();
    h.clock.advance_ms(1400);
    h.controller
        .bind(&item(9, None, Some(PROGRESSIVE)), false, false)
        .unwrap();
    assert_eq!(h.controller.sink().play_count(), 1);

    h.clock.advance_ms(1600);
    h.controller
        .bind(&item(10, None, Some(PROGRESSIVE)), false, false)
        .unwrap();
    assert_eq!(h.controller.sink().play_count(), 1);
}

#[test]
fn started_and_ended_are_reported_once_per_session() {
    let mut h = harness(false);
    let binding = h
        .controller
        .bind(&item(11, None, Some(PROGRESSIVE)), true, true)
        .unwrap();

    let started = h.controller.handle_sink_event(SinkEvent::Playing);
    assert_eq!(
        started,
        vec![Effect::Started {
            session: binding.session
        }]
    );
    h.controller.handle_sink_event(SinkEvent::Waiting);
    assert!(h.controller.handle_sink_event(SinkEvent::Playing).is_empty());

    assert_eq!(h.controller.handle_sink_event(SinkEvent::Ended).len(), 1);
    assert!(h
        .controller
        .handle_sink_event(SinkEvent::Error("after end".into()))
        .is_empty());
}

#[test]
fn bandwidth_estimate_seeds_the_next_engine() {
    let mut store = MemoryStore::new();
    store.set(BANDWIDTH_KEY, "1800".into());
    let mut h = harness_with_store(true, store);

    let first = h
        .controller
        .bind(&item(12, Some(MANIFEST), None), true, false)
        .unwrap();
    h.controller.handle_engine_event(
        first.session,
        EngineEvent::Telemetry {
            kind: TelemetryKind::ManifestLoaded,
            bandwidth_bps: Some(2_400_000.0),
        },
    );
    h.controller.handle_engine_event(
        first.session,
        EngineEvent::Telemetry {
            kind: TelemetryKind::FragmentLoaded,
            bandwidth_bps: None,
        },
    );
    h.controller
        .bind(&item(13, Some(MANIFEST), None), true, false)
        .unwrap();

    let created = h.engines.created.lock().unwrap();
    assert_eq!(created.len(), 2);
    assert_relative_eq!(created[0].1.start_bandwidth_bps, 1_800_000.0);
    assert_relative_eq!(created[1].1.start_bandwidth_bps, 2_400_000.0);
    assert_eq!(created[0].1.start_level, 0);
}

#[test]
fn unusable_store_value_falls_back_to_default_seed() {
    let mut store = MemoryStore::new();
    store.set(BANDWIDTH_KEY, "fast".into());
    let h = harness_with_store(true, store);
    assert_relative_eq!(h.controller.bandwidth().seed_bps(), DEFAULT_SEED_BPS);
}

#[test]
fn item_without_sources_leaves_sink_empty() {
    let mut h = harness(true);
    h.controller
        .bind(&item(14, None, Some(PROGRESSIVE)), true, false)
        .unwrap();
    let err = h
        .controller
        .bind(&item(15, Some("  "), None), true, true)
        .unwrap_err();
    assert_eq!(err, PlaybackError::NoPlayableSource);
    assert_eq!(h.controller.sink().source(), None);
    assert_eq!(h.controller.state(), SessionState::NoSource);
}
