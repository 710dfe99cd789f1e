// SPDX-License-Identifier: MPL-2.0
//! Background worker that resolves HLS manifests into a concrete rendition.
//!
//! The worker lives in a long-running subscription. Each `Load` spawns a
//! task that fetches the master playlist, probes a few fragments of the
//! start level to refine the bandwidth estimate, then picks the rendition
//! the sink should open. `Destroy` aborts the task, and events of sessions
//! that are no longer live are dropped before they reach the application.

use super::engine::{EngineCommand, EngineHandle};
use super::playlist::{self, Playlist, Segment};
use crate::application::port::{EngineConfig, EngineEvent, TelemetryKind};
use crate::domain::playback::SessionId;
use crate::infrastructure::http::{self, Download};
use iced::futures::SinkExt;
use iced::stream;
use reqwest::Url;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Share of the estimate a rendition may use.
const HEADROOM: f64 = 0.7;
/// Fragments downloaded to measure throughput.
const PROBE_FRAGMENTS: usize = 2;
/// Weight of a new sample in the moving average.
const EWMA_WEIGHT: f64 = 0.5;
/// Downloads smaller than this are dominated by latency and not sampled.
const MIN_SAMPLE_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HlsWorkerId;

/// Messages emitted by the HLS worker subscription.
#[derive(Debug, Clone)]
pub enum HlsMessage {
    /// The worker accepts commands.
    Ready(EngineHandle),
    Event {
        session: SessionId,
        event: EngineEvent,
    },
}

/// Exponentially weighted bandwidth estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthEstimator {
    estimate_bps: f64,
}

impl BandwidthEstimator {
    #[must_use]
    pub fn new(seed_bps: f64) -> Self {
        Self {
            estimate_bps: seed_bps,
        }
    }

    #[must_use]
    pub fn estimate(&self) -> f64 {
        self.estimate_bps
    }

    /// Folds a completed download into the estimate.
    pub fn sample(&mut self, download: &Download) {
        if download.bytes.len() < MIN_SAMPLE_BYTES {
            return;
        }
        if let Some(bps) = download.throughput_bps() {
            self.estimate_bps = EWMA_WEIGHT * bps + (1.0 - EWMA_WEIGHT) * self.estimate_bps;
        }
    }
}

/// Creates the long-running worker subscription.
pub fn hls_worker() -> iced::Subscription<HlsMessage> {
    iced::Subscription::run_with_id(
        HlsWorkerId,
        stream::channel(100, |mut output| async move {
            let client = match http::client() {
                Ok(client) => client,
                Err(e) => {
                    tracing::error!(error = %e, "HLS worker cannot build an HTTP client");
                    std::future::pending::<()>().await;
                    return;
                }
            };

            let (command_tx, mut command_rx) = mpsc::unbounded_channel();
            let (event_tx, mut event_rx) = mpsc::unbounded_channel::<(SessionId, EngineEvent)>();
            let mut live: HashMap<SessionId, JoinHandle<()>> = HashMap::new();

            let _ = output
                .send(HlsMessage::Ready(EngineHandle::new(command_tx)))
                .await;

            loop {
                tokio::select! {
                    command = command_rx.recv() => match command {
                        Some(EngineCommand::Load { session, url, config }) => {
                            tracing::debug!(session = %session, url = %url, "HLS load");
                            let task = tokio::spawn(drive(
                                client.clone(),
                                session,
                                url,
                                config,
                                event_tx.clone(),
                            ));
                            if let Some(previous) = live.insert(session, task) {
                                previous.abort();
                            }
                        }
                        Some(EngineCommand::Destroy { session }) => {
                            if let Some(task) = live.remove(&session) {
                                task.abort();
                            }
                        }
                        None => break,
                    },

                    Some((session, event)) = event_rx.recv() => {
                        if live.contains_key(&session) {
                            let _ = output.send(HlsMessage::Event { session, event }).await;
                        }
                    }
                }
            }

            for (_, task) in live.drain() {
                task.abort();
            }
            std::future::pending::<()>().await;
        }),
    )
}

async fn drive(
    client: reqwest::Client,
    session: SessionId,
    url: String,
    config: EngineConfig,
    events: mpsc::UnboundedSender<(SessionId, EngineEvent)>,
) {
    let emit = |event: EngineEvent| {
        let _ = events.send((session, event));
    };

    match resolve(&client, &url, config, &emit).await {
        Ok(media_url) => emit(EngineEvent::MediaSource { url: media_url }),
        Err(reason) => {
            tracing::warn!(session = %session, %reason, "HLS manifest failed");
            emit(EngineEvent::Fatal { reason });
        }
    }
}

/// Returns the URL of the rendition to play.
async fn resolve(
    client: &reqwest::Client,
    manifest_url: &str,
    config: EngineConfig,
    emit: &impl Fn(EngineEvent),
) -> Result<String, String> {
    let mut estimator = BandwidthEstimator::new(config.start_bandwidth_bps);
    let base = Url::parse(manifest_url).map_err(|e| format!("invalid manifest URL: {e}"))?;

    let master = fetch_playlist(client, &base, config.max_buffer_bytes).await?;
    estimator.sample(&master.0);
    telemetry(emit, TelemetryKind::ManifestLoaded, &estimator);

    let variants = match master.1 {
        Playlist::Master(variants) if !variants.is_empty() => variants,
        // A media playlist is its own single rendition.
        _ => return Ok(base.to_string()),
    };

    let probe_level = config.start_level.min(variants.len() - 1);
    let probe_url = base
        .join(&variants[probe_level].uri)
        .map_err(|e| format!("invalid variant URI: {e}"))?;
    match fetch_playlist(client, &probe_url, config.max_buffer_bytes).await {
        Ok((download, Playlist::Media(segments))) => {
            estimator.sample(&download);
            probe_fragments(client, &probe_url, &segments, config, &mut estimator, emit).await;
        }
        Ok(_) => {}
        Err(reason) => tracing::debug!(%reason, "probe playlist unavailable"),
    }

    let level = playlist::pick_level(&variants, estimator.estimate(), HEADROOM);
    telemetry(emit, TelemetryKind::LevelSwitched { level }, &estimator);
    base.join(&variants[level].uri)
        .map(|url| url.to_string())
        .map_err(|e| format!("invalid variant URI: {e}"))
}

async fn probe_fragments(
    client: &reqwest::Client,
    playlist_url: &Url,
    segments: &[Segment],
    config: EngineConfig,
    estimator: &mut BandwidthEstimator,
    emit: &impl Fn(EngineEvent),
) {
    let budget = config.max_forward_buffer.as_secs_f64();
    let mut buffered = 0.0;

    for segment in segments.iter().take(PROBE_FRAGMENTS) {
        if buffered + segment.duration_secs > budget {
            break;
        }
        let Ok(url) = playlist_url.join(&segment.uri) else {
            continue;
        };
        let mut request = client.get(url);
        if let Some(range) = segment.range {
            request = request.header(reqwest::header::RANGE, range.header_value());
        }

        let started = Instant::now();
        let download = match request.send().await {
            Ok(response) if response.status().is_success() => {
                http::read_capped(response, config.max_buffer_bytes, started).await
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "fragment probe refused");
                break;
            }
            Err(e) => Err(e),
        };
        match download {
            Ok(download) => {
                estimator.sample(&download);
                buffered += segment.duration_secs;
                telemetry(emit, TelemetryKind::FragmentLoaded, estimator);
            }
            Err(e) => {
                tracing::debug!(error = %e, "fragment probe failed");
                break;
            }
        }
    }
}

async fn fetch_playlist(
    client: &reqwest::Client,
    url: &Url,
    cap: usize,
) -> Result<(Download, Playlist), String> {
    let started = Instant::now();
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| format!("manifest request failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("HTTP {} for {url}", response.status().as_u16()));
    }

    let download = http::read_capped(response, cap, started)
        .await
        .map_err(|e| format!("manifest read failed: {e}"))?;
    if download.truncated {
        return Err(format!("manifest larger than {cap} bytes"));
    }

    let text = String::from_utf8_lossy(&download.bytes);
    let parsed = playlist::parse(&text).map_err(|e| e.to_string())?;
    Ok((download, parsed))
}

fn telemetry(emit: &impl Fn(EngineEvent), kind: TelemetryKind, estimator: &BandwidthEstimator) {
    emit(EngineEvent::Telemetry {
        kind,
        bandwidth_bps: Some(estimator.estimate()),
    });
}
