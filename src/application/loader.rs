// SPDX-License-Identifier: MPL-2.0
//! Initial sequence load.

use crate::application::port::VideoCatalog;
use crate::domain::error::CatalogError;
use crate::domain::story::PlayableItem;

/// Resolves the start video and lists its channel.
///
/// # Errors
///
/// Returns the catalog error when the start video cannot be resolved, when
/// it belongs to neither a channel nor an account, or when the listing
/// itself fails.
pub async fn load_sequence<C>(catalog: &C) -> Result<Vec<PlayableItem>, CatalogError>
where
    C: VideoCatalog,
{
    let start = catalog.resolve_start_video().await?;
    tracing::debug!(
        video = start.video_id,
        channel = ?start.channel_id,
        account = ?start.account_name,
        "start video resolved"
    );

    if start.channel_id.is_none() && start.account_name.is_none() {
        return Err(CatalogError::Resolution(format!(
            "video {} has no channel",
            start.video_id
        )));
    }

    let items = catalog
        .fetch_channel_videos(start.channel_id, start.account_name.as_deref())
        .await?;
    tracing::info!(count = items.len(), "story sequence loaded");
    Ok(items)
}
