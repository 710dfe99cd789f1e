// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external dependencies like `FFmpeg`,
//! the PeerTube REST API and HTTP.
//!
//! # Available Adapters
//!
//! - [`ffmpeg`]: Media sink decoding via `FFmpeg` (implements [`MediaSink`])
//! - [`hls`]: Adaptive HLS engine (implements [`EngineFactory`])
//! - [`peertube`]: Story listing (implements [`VideoCatalog`])
//! - [`http`]: Shared client and capped downloads
//!
//! [`MediaSink`]: crate::application::port::MediaSink
//! [`EngineFactory`]: crate::application::port::EngineFactory
//! [`VideoCatalog`]: crate::application::port::VideoCatalog

pub mod ffmpeg;
pub mod hls;
pub mod http;
pub mod peertube;

pub use ffmpeg::FfmpegSink;
pub use hls::HlsEngineFactory;
pub use peertube::PeerTubeCatalog;
