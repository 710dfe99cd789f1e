// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed media sink.
//!
//! The sink itself ([`FfmpegSink`]) is a plain state holder living in the
//! application state. Decoding happens on a blocking worker owned by an Iced
//! subscription ([`sink_playback`]), which hands a command sender back to the
//! sink once it is running. Every source change bumps the sink generation so
//! that the subscription is recreated and stale events can be discarded.

mod decoder;
mod sink;
mod subscription;

pub use decoder::DecodedFrame;
pub use sink::{FfmpegSink, SharedPosition};
pub use subscription::{sink_playback, SinkCommandSender, SinkMessage};

use crate::error::{Error, Result};
use std::sync::Once;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once per process and lowers its log level to errors.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
        ffmpeg_next::format::network::init();
    });

    init_result
}
