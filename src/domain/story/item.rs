// SPDX-License-Identifier: MPL-2.0
//! Story items and the resolved start video.

/// One playable story, as listed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableItem {
    /// Numeric video id on the host.
    pub id: u64,
    /// Stable content id (UUID) used for the canonical page URL.
    pub content_id: String,
    pub title: String,
    /// Display name of the uploading account.
    pub author: String,
    /// Profile URL of the uploading account, if the host reported one.
    pub author_url: Option<String>,
    /// Host label, e.g. `tube.example`.
    pub host: String,
    pub thumbnail_url: Option<String>,
    /// Duration in seconds as reported by the host.
    pub duration_secs: f64,
    /// Adaptive (HLS) master playlist.
    pub manifest_url: Option<String>,
    /// Single-bitrate file playable by direct URL.
    pub progressive_url: Option<String>,
    /// Canonical watch page.
    pub page_url: String,
}

impl PlayableItem {
    /// Returns the `@author@host` handle shown in the overlay.
    ///
    /// Labels that already carry a host part are returned unchanged.
    #[must_use]
    pub fn author_handle(&self) -> String {
        if self.author.contains('@') {
            if self.author.starts_with('@') {
                self.author.clone()
            } else {
                format!("@{}", self.author)
            }
        } else if self.host.is_empty() {
            format!("@{}", self.author)
        } else {
            format!("@{}@{}", self.author, self.host)
        }
    }

    /// Returns the manifest URL, treating empty strings as absent.
    #[must_use]
    pub fn manifest(&self) -> Option<&str> {
        non_empty(self.manifest_url.as_deref())
    }

    /// Returns the progressive URL, treating empty strings as absent.
    #[must_use]
    pub fn progressive(&self) -> Option<&str> {
        non_empty(self.progressive_url.as_deref())
    }

    /// Returns true if at least one source URL is present.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.manifest().is_some() || self.progressive().is_some()
    }
}

fn non_empty(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.trim().is_empty())
}

/// The video a story sequence starts from, plus where its siblings live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartVideo {
    pub video_id: u64,
    pub content_id: String,
    /// Channel to list, when the host reported one.
    pub channel_id: Option<u64>,
    /// Account to list when no channel is known.
    pub account_name: Option<String>,
}
