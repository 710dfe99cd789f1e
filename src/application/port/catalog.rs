// SPDX-License-Identifier: MPL-2.0
//! Video catalog port.
//!
//! The catalog is the only network-facing collaborator of the story
//! sequence. It is consulted once per sequence load.

use crate::domain::error::CatalogError;
use crate::domain::story::{PlayableItem, StartVideo};
use std::future::Future;

/// Finds the start video and lists its siblings.
pub trait VideoCatalog: Send + Sync {
    /// Resolves the configured start reference.
    ///
    /// Implementations try every lookup strategy they know before failing
    /// with [`CatalogError::Resolution`].
    fn resolve_start_video(&self)
        -> impl Future<Output = Result<StartVideo, CatalogError>> + Send;

    /// Lists playable videos of a channel (or account), newest first.
    ///
    /// Items whose detail lookup fails are left out. Items longer than the
    /// configured maximum duration are filtered.
    fn fetch_channel_videos(
        &self,
        channel_id: Option<u64>,
        account_name: Option<&str>,
    ) -> impl Future<Output = Result<Vec<PlayableItem>, CatalogError>> + Send;
}
