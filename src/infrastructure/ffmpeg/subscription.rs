// SPDX-License-Identifier: MPL-2.0
//! Iced subscription hosting the decode worker of the current source.
//!
//! Each sink generation gets its own subscription id, so a source change
//! tears the previous worker down and starts a fresh one. The subscription
//! also watches for stalls: when playback is running and no frame arrives
//! within [`STALL_TIMEOUT`] it reports [`SinkEvent::Waiting`], and reports
//! [`SinkEvent::Playing`] again once frames resume.

use super::decoder::{DecodedFrame, StreamCommand, StreamDecoder, StreamEvent};
use super::sink::SharedPosition;
use crate::application::port::SinkEvent;
use iced::futures::SinkExt;
use iced::stream;
use std::time::Duration;
use tokio::sync::mpsc;

const STALL_TIMEOUT: Duration = Duration::from_millis(750);

/// Subscription id for one sink generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SinkPlaybackId(u64);

/// Handle for sending commands to the decode worker.
#[derive(Clone)]
pub struct SinkCommandSender {
    tx: mpsc::UnboundedSender<StreamCommand>,
}

impl SinkCommandSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<StreamCommand>) -> Self {
        Self { tx }
    }

    pub(crate) fn send(&self, command: StreamCommand) -> Result<(), String> {
        self.tx
            .send(command)
            .map_err(|_| "Decoder not running".to_string())
    }
}

impl std::fmt::Debug for SinkCommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkCommandSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Messages emitted by the playback subscription.
#[derive(Debug, Clone)]
pub enum SinkMessage {
    /// The worker is running and accepts commands.
    Connected {
        generation: u64,
        commands: SinkCommandSender,
    },
    Lifecycle {
        generation: u64,
        event: SinkEvent,
    },
    Frame {
        generation: u64,
        frame: DecodedFrame,
    },
}

impl SinkMessage {
    /// Sink generation the message belongs to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            SinkMessage::Connected { generation, .. }
            | SinkMessage::Lifecycle { generation, .. }
            | SinkMessage::Frame { generation, .. } => *generation,
        }
    }
}

/// Creates the playback subscription for `url` at sink `generation`.
pub fn sink_playback(
    generation: u64,
    url: String,
    position: SharedPosition,
) -> iced::Subscription<SinkMessage> {
    iced::Subscription::run_with_id(
        SinkPlaybackId(generation),
        stream::channel(100, move |mut output| async move {
            let (command_tx, mut command_rx) = mpsc::unbounded_channel();
            let mut decoder = StreamDecoder::spawn(url, position);

            let _ = output
                .send(SinkMessage::Connected {
                    generation,
                    commands: SinkCommandSender::new(command_tx),
                })
                .await;

            let mut playing = false;
            let mut stalled = false;

            loop {
                tokio::select! {
                    command = command_rx.recv() => {
                        let Some(command) = command else {
                            let _ = decoder.send_command(StreamCommand::Stop);
                            break;
                        };
                        match command {
                            StreamCommand::Play => playing = true,
                            StreamCommand::Pause | StreamCommand::Stop => {
                                playing = false;
                                stalled = false;
                            }
                        }
                        if decoder.send_command(command).is_err() || command == StreamCommand::Stop {
                            break;
                        }
                    }

                    event = decoder.recv_event() => {
                        let Some(event) = event else {
                            break;
                        };
                        let message = match event {
                            StreamEvent::Frame(frame) => {
                                if stalled {
                                    stalled = false;
                                    let _ = output
                                        .send(SinkMessage::Lifecycle {
                                            generation,
                                            event: SinkEvent::Playing,
                                        })
                                        .await;
                                }
                                SinkMessage::Frame { generation, frame }
                            }
                            StreamEvent::Lifecycle(event) => {
                                match event {
                                    SinkEvent::Playing => playing = true,
                                    SinkEvent::Ended | SinkEvent::Error(_) => {
                                        playing = false;
                                        stalled = false;
                                    }
                                    _ => {}
                                }
                                SinkMessage::Lifecycle { generation, event }
                            }
                        };
                        let _ = output.send(message).await;
                    }

                    () = tokio::time::sleep(STALL_TIMEOUT), if playing && !stalled => {
                        stalled = true;
                        tracing::debug!(generation, "playback stalled");
                        let _ = output
                            .send(SinkMessage::Lifecycle {
                                generation,
                                event: SinkEvent::Waiting,
                            })
                            .await;
                    }
                }
            }

            std::future::pending::<()>().await;
        }),
    )
}
