// SPDX-License-Identifier: MPL-2.0
//! Playback session control.
//!
//! The [`SessionController`] binds one story item at a time to the media
//! sink. It picks the stream source, runs the adaptive engine when one is
//! used, retries refused play requests within a bounded budget and reports
//! the end of each item through [`Effect`]s the shell turns into tasks.

mod attempts;
mod bandwidth;
mod controller;

pub use attempts::{PlayAttempts, Readiness, Rejection};
pub use bandwidth::{BandwidthHistory, BANDWIDTH_KEY, DEFAULT_SEED_BPS};
pub use controller::{Binding, ControllerSettings, Effect, SessionController};
pub use crate::domain::playback::{
    select_source, SessionId, SessionState, SourceCapabilities, SourcePlan,
};
