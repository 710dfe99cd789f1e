// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`catalog`]: Remote video resolution and listing
//! - [`clock`]: Monotonic time source
//! - [`engine`]: Adaptive streaming engine lifecycle and telemetry
//! - [`sink`]: Media sink (play, pause, mute, lifecycle events)
//! - [`storage`]: Small persisted key/value store
//!
//! # Design Notes
//!
//! - All traits use domain types only (no Iced handles, no `FFmpeg` types)
//! - Sink and engine methods never block: work happens on background tasks
//!   and comes back as events routed by the shell
//! - Only [`catalog::VideoCatalog`] returns futures; callers wrap them in `Task`

pub mod catalog;
pub mod clock;
pub mod engine;
pub mod sink;
pub mod storage;

// Re-export main types for convenience
pub use catalog::VideoCatalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{AdaptiveEngine, EngineConfig, EngineEvent, EngineFactory, TelemetryKind};
pub use sink::{MediaSink, PlayRejected, SinkEvent};
pub use storage::{KeyValueStore, MemoryStore};
