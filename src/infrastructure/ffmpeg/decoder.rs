// SPDX-License-Identifier: MPL-2.0
//! Blocking FFmpeg decode loop for a single media URL.
//!
//! The loop opens the URL, decodes the first frame as a poster, reports that
//! playback can start, then waits for commands. Frames are paced by their
//! presentation timestamps against a wall clock that is rebased on every
//! resume and after any stall longer than [`STALL_REBASE`].

use super::sink::SharedPosition;
use crate::application::port::SinkEvent;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Lateness after which the pacing clock restarts from the current frame.
const STALL_REBASE: Duration = Duration::from_millis(250);

/// Sleep between command polls while paused.
const PAUSED_POLL: Duration = Duration::from_millis(10);

/// A decoded video frame ready for display.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba_data: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

impl DecodedFrame {
    /// Returns the total size in bytes.
    #[cfg(test)]
    fn size_bytes(&self) -> usize {
        self.rgba_data.len()
    }
}

/// Commands accepted by the decode loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCommand {
    Play,
    Pause,
    Stop,
}

/// Events produced by the decode loop.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Lifecycle(SinkEvent),
    Frame(DecodedFrame),
}

/// Handle on a decode loop running in a blocking thread.
pub struct StreamDecoder {
    command_tx: mpsc::UnboundedSender<StreamCommand>,
    event_rx: mpsc::Receiver<StreamEvent>,
}

impl StreamDecoder {
    /// Spawns a decode loop for `url`. The position is written to
    /// `position` as frames are presented.
    pub fn spawn(url: String, position: SharedPosition) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        // Two frames of backpressure keep memory flat on slow consumers.
        let (event_tx, event_rx) = mpsc::channel(2);

        tokio::task::spawn_blocking(move || {
            let failure_tx = event_tx.clone();
            if let Err(e) = decode_loop(&url, command_rx, event_tx, &position) {
                tracing::warn!(url = %url, error = %e, "decoder stopped");
                let _ = failure_tx.blocking_send(StreamEvent::Lifecycle(SinkEvent::Error(
                    e.to_string(),
                )));
            }
        });

        Self {
            command_tx,
            event_rx,
        }
    }

    /// Sends a command to the decode loop.
    pub fn send_command(&self, command: StreamCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Decoder task is not running".into()))
    }

    /// Receives the next event. Returns `None` once the loop has exited.
    pub async fn recv_event(&mut self) -> Option<StreamEvent> {
        self.event_rx.recv().await
    }
}

/// Wall-clock pacing anchored on one frame.
#[derive(Debug, Default)]
struct Pacer {
    anchor: Option<(Instant, f64)>,
}

impl Pacer {
    fn reset(&mut self) {
        self.anchor = None;
    }

    /// Returns how long to wait before presenting a frame at `pts`.
    fn delay_for(&mut self, pts: f64, now: Instant) -> Duration {
        let Some((start, first_pts)) = self.anchor else {
            self.anchor = Some((now, pts));
            return Duration::ZERO;
        };
        let offset = Duration::from_secs_f64((pts - first_pts).max(0.0));
        let target = start + offset;
        if target > now {
            return target - now;
        }
        if now - target > STALL_REBASE {
            self.anchor = Some((now, pts));
        }
        Duration::ZERO
    }
}

struct Pipeline {
    input: ffmpeg_next::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    time_base: f64,
    width: u32,
    height: u32,
}

impl Pipeline {
    fn open(url: &str) -> Result<Self> {
        let input = ffmpeg_next::format::input(&url)
            .map_err(|e| Error::Io(format!("Failed to open media: {e}")))?;

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| Error::Io("No video stream found".to_string()))?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let time_base = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| Error::Io(format!("Failed to create codec context: {e}")))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| Error::Io(format!("Failed to create video decoder: {e}")))?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| Error::Io(format!("Failed to create scaler: {e}")))?;

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler,
            time_base,
            width,
            height,
        })
    }

    /// Decodes the next frame. `Ok(None)` means end of stream.
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>> {
        let mut decoded = ffmpeg_next::frame::Video::empty();
        let mut received = false;
        for (stream, packet) in self.input.packets() {
            if stream.index() != self.stream_index {
                continue;
            }
            if let Err(e) = self.decoder.send_packet(&packet) {
                tracing::debug!(error = %e, "dropping undecodable packet");
                continue;
            }
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                received = true;
                break;
            }
        }

        // Drain frames still held by the decoder.
        if !received {
            received =
                self.decoder.send_eof().is_ok() && self.decoder.receive_frame(&mut decoded).is_ok();
        }

        if received {
            self.convert(&decoded).map(Some)
        } else {
            Ok(None)
        }
    }

    fn convert(&mut self, decoded: &ffmpeg_next::frame::Video) -> Result<DecodedFrame> {
        let mut rgba = ffmpeg_next::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgba)
            .map_err(|e| Error::Io(format!("Scaling failed: {e}")))?;

        let pts_secs = decoded
            .timestamp()
            .map_or(0.0, |pts| pts as f64 * self.time_base);

        Ok(DecodedFrame {
            rgba_data: Arc::new(extract_rgba_data(&rgba)),
            width: self.width,
            height: self.height,
            pts_secs,
        })
    }
}

fn decode_loop(
    url: &str,
    mut command_rx: mpsc::UnboundedReceiver<StreamCommand>,
    event_tx: mpsc::Sender<StreamEvent>,
    position: &SharedPosition,
) -> Result<()> {
    super::init_ffmpeg()?;

    let mut pipeline = Pipeline::open(url)?;
    tracing::debug!(
        url,
        width = pipeline.width,
        height = pipeline.height,
        "media opened"
    );
    if event_tx
        .blocking_send(StreamEvent::Lifecycle(SinkEvent::Loaded))
        .is_err()
    {
        return Ok(());
    }

    // Poster frame; the stream origin is its timestamp.
    let origin = match pipeline.next_frame()? {
        Some(frame) => {
            let origin = frame.pts_secs;
            position.set(0.0);
            if event_tx.blocking_send(StreamEvent::Frame(frame)).is_err() {
                return Ok(());
            }
            origin
        }
        None => return Err(Error::Io("Media has no decodable frames".into())),
    };
    if event_tx
        .blocking_send(StreamEvent::Lifecycle(SinkEvent::CanPlay))
        .is_err()
    {
        return Ok(());
    }

    let mut playing = false;
    let mut finished = false;
    let mut pacer = Pacer::default();

    loop {
        match command_rx.try_recv() {
            Ok(StreamCommand::Play) if !finished => {
                if !playing {
                    playing = true;
                    pacer.reset();
                    let _ = event_tx.blocking_send(StreamEvent::Lifecycle(SinkEvent::Playing));
                }
            }
            Ok(StreamCommand::Play) => {}
            Ok(StreamCommand::Pause) => {
                playing = false;
            }
            Ok(StreamCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => break,
            Err(mpsc::error::TryRecvError::Empty) => {}
        }

        if !playing {
            std::thread::sleep(PAUSED_POLL);
            continue;
        }

        let Some(frame) = pipeline.next_frame()? else {
            playing = false;
            finished = true;
            let _ = event_tx.blocking_send(StreamEvent::Lifecycle(SinkEvent::Ended));
            continue;
        };

        let wait = pacer.delay_for(frame.pts_secs, Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }

        position.set((frame.pts_secs - origin).max(0.0));
        if event_tx.blocking_send(StreamEvent::Frame(frame)).is_err() {
            break;
        }
    }

    Ok(())
}

/// Extracts RGBA data from a decoded frame, handling stride correctly.
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row_start = y * stride;
        rgba_bytes.extend_from_slice(&data[row_start..row_start + width * 4]);
    }
    rgba_bytes
}
