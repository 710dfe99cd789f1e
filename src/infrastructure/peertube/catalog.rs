// SPDX-License-Identifier: MPL-2.0
//! [`VideoCatalog`] backed by a PeerTube instance.

use super::dto::{Page, VideoDetails, VideoSummary};
use crate::application::port::VideoCatalog;
use crate::domain::error::CatalogError;
use crate::domain::story::{MaxDuration, PageCount, PlayableItem, StartVideo};
use futures_util::future::join_all;
use serde::de::DeserializeOwned;

const FALLBACK_AUTHOR: &str = "author";

/// Where stories come from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Instance base URL, e.g. `https://tube.example`.
    pub instance: String,
    /// Search term, watch URL or account handle of the first story.
    pub start_reference: String,
    pub page_count: PageCount,
    pub max_duration: MaxDuration,
}

/// URL building for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base: String,
    host: String,
}

impl Site {
    #[must_use]
    pub fn new(instance: &str) -> Self {
        let base = instance.trim().trim_end_matches('/').to_string();
        let host = base
            .strip_prefix("https://")
            .or_else(|| base.strip_prefix("http://"))
            .unwrap_or(&base)
            .to_string();
        Self { base, host }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    #[must_use]
    pub fn thumbnail_url(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("https://{}{}", self.host, p))
    }

    #[must_use]
    pub fn page_url(&self, uuid: &str) -> String {
        format!("{}/w/{}", self.base, uuid)
    }
}

/// Short video id from a watch URL (`/w/<id>` or `/videos/watch/<id>`).
#[must_use]
pub fn short_id(reference: &str) -> Option<&str> {
    let rest = reference
        .split_once("/w/")
        .or_else(|| reference.split_once("/videos/watch/"))
        .map(|(_, rest)| rest)?;
    let id = rest.split(['?', '#', '/']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Account handle from `/a/<name>`, `/accounts/<name>` or an `@name` token.
#[must_use]
pub fn account_handle(reference: &str) -> Option<&str> {
    let from_path = reference
        .split_once("/a/")
        .or_else(|| reference.split_once("/accounts/"))
        .map(|(_, rest)| rest.split(['?', '#', '/']).next().unwrap_or_default());
    let handle = from_path.or_else(|| {
        reference
            .split_whitespace()
            .find(|token| token.starts_with('@'))
            .map(|token| token.trim_start_matches('@'))
    })?;
    (!handle.is_empty()).then_some(handle)
}

/// Merges a listing entry with its details into a story item.
///
/// Returns `None` when the entry has no content id or is too long.
#[must_use]
pub fn build_item(
    site: &Site,
    max_duration: MaxDuration,
    summary: &VideoSummary,
    details: &VideoDetails,
) -> Option<PlayableItem> {
    let uuid = summary
        .uuid
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| details.uuid.clone());
    if uuid.is_empty() {
        return None;
    }

    let duration = summary.duration.or(details.duration).unwrap_or(0.0);
    let duration = if duration.is_finite() { duration } else { 0.0 };
    if !max_duration.admits(duration) {
        return None;
    }

    let title = summary
        .name
        .clone()
        .or_else(|| summary.title.clone())
        .or_else(|| details.name.clone())
        .or_else(|| details.title.clone())
        .unwrap_or_default();

    let author = details
        .account
        .as_ref()
        .and_then(|a| a.name.clone())
        .or_else(|| summary.account.as_ref().and_then(|a| a.name.clone()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());

    let thumbnail_path = summary
        .thumbnail_path
        .as_deref()
        .or(details.thumbnail_path.as_deref());

    Some(PlayableItem {
        id: summary.id,
        page_url: site.page_url(&uuid),
        content_id: uuid,
        title,
        author,
        author_url: details.account.as_ref().and_then(|a| a.url.clone()),
        host: site.host().to_string(),
        thumbnail_url: site.thumbnail_url(thumbnail_path),
        duration_secs: duration,
        manifest_url: details.manifest_url().map(str::to_string),
        progressive_url: details.progressive_url().map(str::to_string),
    })
}

/// PeerTube REST client.
#[derive(Debug, Clone)]
pub struct PeerTubeCatalog {
    client: reqwest::Client,
    site: Site,
    settings: SourceSettings,
}

impl PeerTubeCatalog {
    #[must_use]
    pub fn new(client: reqwest::Client, settings: SourceSettings) -> Self {
        Self {
            client,
            site: Site::new(&settings.instance),
            settings,
        }
    }

    #[must_use]
    pub fn site(&self) -> &Site {
        &self.site
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn video_details(&self, id: &str) -> Result<VideoDetails, CatalogError> {
        self.get_json(&self.site.api(&format!("/api/v1/videos/{id}")), &[])
            .await
    }

    async fn search(&self, reference: &str) -> Result<Option<StartVideo>, CatalogError> {
        let page: Page<VideoSummary> = self
            .get_json(
                &self.site.api("/api/v1/search/videos"),
                &[("search", reference)],
            )
            .await?;
        Ok(page.data.into_iter().next().and_then(|hit| {
            let uuid = hit.uuid.clone()?;
            Some(StartVideo {
                video_id: hit.id,
                content_id: uuid,
                channel_id: hit.channel_id(),
                account_name: hit.account.and_then(|a| a.name),
            })
        }))
    }

    async fn latest_of_account(&self, account: &str) -> Result<Option<StartVideo>, CatalogError> {
        let page: Page<VideoSummary> = self
            .get_json(
                &self.site.api(&format!("/api/v1/accounts/{account}/videos")),
                &[("sort", "-publishedAt"), ("count", "1")],
            )
            .await?;
        Ok(page.data.into_iter().next().map(|hit| StartVideo {
            video_id: hit.id,
            content_id: hit.uuid.clone().unwrap_or_default(),
            channel_id: hit.channel_id(),
            account_name: Some(account.to_string()),
        }))
    }
}

impl VideoCatalog for PeerTubeCatalog {
    async fn resolve_start_video(&self) -> Result<StartVideo, CatalogError> {
        let reference = self.settings.start_reference.trim();
        if reference.is_empty() {
            return Err(CatalogError::InvalidStartReference(
                "no start video configured".into(),
            ));
        }

        let mut last_error = None;

        match self.search(reference).await {
            Ok(Some(found)) => return Ok(found),
            Ok(None) => tracing::debug!(reference, "search returned no match"),
            Err(e) => {
                tracing::debug!(reference, error = %e, "search failed");
                last_error = Some(e);
            }
        }

        let short = short_id(reference);
        if let Some(id) = short {
            match self.video_details(id).await {
                Ok(details) => {
                    return Ok(StartVideo {
                        video_id: details.id,
                        channel_id: details.channel_id(),
                        account_name: details.account.as_ref().and_then(|a| a.name.clone()),
                        content_id: details.uuid,
                    });
                }
                Err(e) => {
                    tracing::debug!(reference, error = %e, "direct lookup failed");
                    last_error = Some(e);
                }
            }
        }

        let account = account_handle(reference);
        if let Some(account) = account {
            match self.latest_of_account(account).await {
                Ok(Some(found)) => return Ok(found),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(reference, error = %e, "account fallback failed");
                    last_error = Some(e);
                }
            }
        }

        Err(resolution_failure(reference, last_error))
    }

    async fn fetch_channel_videos(
        &self,
        channel_id: Option<u64>,
        account_name: Option<&str>,
    ) -> Result<Vec<PlayableItem>, CatalogError> {
        let path = match (channel_id, account_name) {
            (Some(id), _) => format!("/api/v1/video-channels/{id}/videos"),
            (None, Some(account)) => format!("/api/v1/accounts/{account}/videos"),
            (None, None) => {
                return Err(CatalogError::Resolution(
                    "neither channel nor account to list".into(),
                ))
            }
        };
        let count = self.settings.page_count.value().to_string();
        let page: Page<VideoSummary> = self
            .get_json(
                &self.site.api(&path),
                &[("sort", "-publishedAt"), ("count", count.as_str())],
            )
            .await?;

        let details = join_all(
            page.data
                .iter()
                .map(|summary| self.video_details_by_id(summary.id)),
        )
        .await;

        let mut items = Vec::with_capacity(page.data.len());
        for (summary, details) in page.data.iter().zip(details) {
            match details {
                Ok(details) => {
                    if let Some(item) =
                        build_item(&self.site, self.settings.max_duration, summary, &details)
                    {
                        items.push(item);
                    }
                }
                Err(e) => {
                    tracing::warn!(video = summary.id, error = %e, "video details unavailable, skipped");
                }
            }
        }
        Ok(items)
    }
}

impl PeerTubeCatalog {
    async fn video_details_by_id(&self, id: u64) -> Result<VideoDetails, CatalogError> {
        self.video_details(&id.to_string()).await
    }
}

/// Folds the last fallback error into the resolution failure, keeping its
/// message.
fn resolution_failure(reference: &str, last_error: Option<CatalogError>) -> CatalogError {
    match last_error {
        Some(CatalogError::Resolution(message)) => CatalogError::Resolution(message),
        Some(cause) => CatalogError::Resolution(format!("no video matches {reference}: {cause}")),
        None => CatalogError::Resolution(format!("no video matches {reference}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::peertube::dto::{AccountRef, StreamingPlaylist};

    fn summary(id: u64, duration: f64) -> VideoSummary {
        VideoSummary {
            id,
            uuid: Some(format!("uuid-{id}")),
            name: Some(format!("clip {id}")),
            title: None,
            duration: Some(duration),
            thumbnail_path: Some(format!("/lazy-static/thumbnails/{id}.jpg")),
            channel: None,
            video_channel: None,
            account: Some(AccountRef {
                name: Some("listing-name".into()),
                url: None,
            }),
        }
    }

    fn details(id: u64) -> VideoDetails {
        VideoDetails {
            id,
            uuid: format!("uuid-{id}"),
            name: Some("detail title".into()),
            title: None,
            duration: Some(30.0),
            thumbnail_path: None,
            account: Some(AccountRef {
                name: Some("alice".into()),
                url: Some("https://tube.example/a/alice".into()),
            }),
            channel: None,
            video_channel: None,
            files: Vec::new(),
            streaming_playlists: vec![StreamingPlaylist {
                playlist_url: Some(format!("https://tube.example/hls/{id}/master.m3u8")),
                files: Vec::new(),
            }],
        }
    }

    #[test]
    fn site_strips_scheme_and_trailing_slash() {
        let site = Site::new("https://tube.example/");
        assert_eq!(site.host(), "tube.example");
        assert_eq!(site.api("/api/v1/videos/1"), "https://tube.example/api/v1/videos/1");
        assert_eq!(site.page_url("abc"), "https://tube.example/w/abc");
        assert_eq!(
            site.thumbnail_url(Some("/t.jpg")).as_deref(),
            Some("https://tube.example/t.jpg")
        );
        assert_eq!(site.thumbnail_url(Some("")), None);
    }

    #[test]
    fn short_id_from_watch_urls() {
        assert_eq!(short_id("https://tube.example/w/kkGMgK9?start=3"), Some("kkGMgK9"));
        assert_eq!(short_id("https://tube.example/videos/watch/abc#x"), Some("abc"));
        assert_eq!(short_id("morning walk"), None);
        assert_eq!(short_id("https://tube.example/w/"), None);
    }

    #[test]
    fn account_handle_from_paths_and_tokens() {
        assert_eq!(account_handle("https://tube.example/a/alice/videos"), Some("alice"));
        assert_eq!(account_handle("latest from @bob@tube.example"), Some("bob@tube.example"));
        assert_eq!(account_handle("no handle here"), None);
    }

    #[test]
    fn build_item_prefers_listing_fields_and_detail_account() {
        let site = Site::new("https://tube.example");
        let item = build_item(&site, MaxDuration::default(), &summary(5, 20.0), &details(5)).unwrap();
        assert_eq!(item.title, "clip 5");
        assert_eq!(item.author, "alice");
        assert_eq!(item.author_url.as_deref(), Some("https://tube.example/a/alice"));
        assert_eq!(item.page_url, "https://tube.example/w/uuid-5");
        assert_eq!(
            item.thumbnail_url.as_deref(),
            Some("https://tube.example/lazy-static/thumbnails/5.jpg")
        );
        assert!(item.manifest_url.is_some());
        assert_eq!(item.progressive_url, None);
    }

    #[test]
    fn build_item_filters_long_videos() {
        let site = Site::new("https://tube.example");
        let max = MaxDuration::new(60);
        assert!(build_item(&site, max, &summary(1, 60.0), &details(1)).is_some());
        assert!(build_item(&site, max, &summary(2, 61.0), &details(2)).is_none());
    }

    #[test]
    fn exhausted_fallbacks_always_fail_as_resolution() {
        let network = resolution_failure("morning walk", Some(CatalogError::Network("dns".into())));
        match network {
            CatalogError::Resolution(message) => {
                assert!(message.contains("morning walk"));
                assert!(message.contains("dns"));
            }
            other => panic!("expected resolution error, got {other:?}"),
        }

        let http = resolution_failure(
            "https://tube.example/w/abc",
            Some(CatalogError::Http {
                status: 503,
                url: "https://tube.example/api/v1/videos/abc".into(),
            }),
        );
        assert!(matches!(http, CatalogError::Resolution(ref m) if m.contains("503")));

        assert_eq!(
            resolution_failure("morning walk", None),
            CatalogError::Resolution("no video matches morning walk".into())
        );
    }

    #[test]
    fn build_item_falls_back_to_placeholder_author() {
        let site = Site::new("https://tube.example");
        let mut listing = summary(3, 10.0);
        listing.account = None;
        let mut detail = details(3);
        detail.account = None;
        let item = build_item(&site, MaxDuration::default(), &listing, &detail).unwrap();
        assert_eq!(item.author, "author");
        assert_eq!(item.author_handle(), "@author@tube.example");
    }
}
