// SPDX-License-Identifier: MPL-2.0
//! `iced_stories` plays the latest short videos of a PeerTube channel as a
//! full-screen, auto-advancing story sequence, built with the Iced GUI
//! framework.
//!
//! - [`domain`]: story items, playback session states, hit-test tags
//! - [`application`]: gesture ledger, session controller, interaction
//!   surface, progress renderer, story sequence, and the ports they use
//! - [`infrastructure`]: PeerTube catalog, HLS engine, FFmpeg sink
//! - [`app`]: the Iced shell, configuration and persisted state
//! - [`ui`]: overlay widgets and styles

#![doc(html_root_url = "https://docs.rs/iced_stories/0.1.0")]

pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ui;
