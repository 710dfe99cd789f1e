// SPDX-License-Identifier: MPL-2.0
//! Playback session types.
//!
//! This module defines the session lifecycle and the pure source-selection
//! rule used when an item is bound to the media sink.

mod session;
mod source;

pub use session::{SessionId, SessionState};
pub use source::{select_source, SourceCapabilities, SourcePlan};
