// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core story types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`error`]: Domain error types ([`PlaybackError`](error::PlaybackError),
//!   [`CatalogError`](error::CatalogError))
//! - [`playback`]: Session identity and lifecycle ([`SessionId`](playback::SessionId),
//!   [`SessionState`](playback::SessionState)) and source selection
//!   ([`select_source`](playback::select_source))
//! - [`story`]: Story items ([`PlayableItem`](story::PlayableItem)), bounded
//!   settings ([`PageCount`](story::PageCount), [`MaxDuration`](story::MaxDuration))
//!   and the control-exclusion predicate ([`ancestor_or_self_has`](story::ancestor_or_self_has))

pub mod error;
pub mod playback;
pub mod story;
