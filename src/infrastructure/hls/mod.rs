// SPDX-License-Identifier: MPL-2.0
//! HLS adaptive engine.
//!
//! [`HlsEngineFactory`] implements the engine port for the session
//! controller; the actual manifest work runs in [`hls_worker`], an Iced
//! subscription that reports [`HlsMessage`]s back to the shell.

mod engine;
pub mod playlist;
mod worker;

pub use engine::{EngineCommand, EngineHandle, HlsEngine, HlsEngineFactory};
pub use worker::{hls_worker, BandwidthEstimator, HlsMessage};
