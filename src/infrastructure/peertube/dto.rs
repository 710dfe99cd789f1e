// SPDX-License-Identifier: MPL-2.0
//! Wire shapes of the PeerTube REST API.
//!
//! Every field the viewer does not strictly need is optional so that
//! instances running older or newer API versions still decode.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Entry of a search result or listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: u64,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub video_channel: Option<ChannelRef>,
    #[serde(default)]
    pub account: Option<AccountRef>,
}

impl VideoSummary {
    /// Channel id from whichever field the endpoint filled.
    #[must_use]
    pub fn channel_id(&self) -> Option<u64> {
        self.channel
            .as_ref()
            .or(self.video_channel.as_ref())
            .map(|c| c.id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFile {
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPlaylist {
    #[serde(default)]
    pub playlist_url: Option<String>,
    #[serde(default)]
    pub files: Vec<VideoFile>,
}

/// `GET /api/v1/videos/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: u64,
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub video_channel: Option<ChannelRef>,
    #[serde(default)]
    pub files: Vec<VideoFile>,
    #[serde(default)]
    pub streaming_playlists: Vec<StreamingPlaylist>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl VideoDetails {
    #[must_use]
    pub fn channel_id(&self) -> Option<u64> {
        self.channel
            .as_ref()
            .or(self.video_channel.as_ref())
            .map(|c| c.id)
    }

    /// First streaming playlist URL.
    #[must_use]
    pub fn manifest_url(&self) -> Option<&str> {
        self.streaming_playlists
            .iter()
            .find_map(|p| non_blank(p.playlist_url.as_ref()))
    }

    /// First web video file, else the first file of a streaming playlist.
    #[must_use]
    pub fn progressive_url(&self) -> Option<&str> {
        self.files
            .iter()
            .find_map(|f| non_blank(f.file_url.as_ref()))
            .or_else(|| {
                self.streaming_playlists
                    .iter()
                    .flat_map(|p| p.files.iter())
                    .find_map(|f| non_blank(f.file_url.as_ref()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS: &str = r#"{
        "id": 42,
        "uuid": "9c9de5e8-0a1b-4d5e-9f00-5a3f2d1c0b7a",
        "shortUUID": "kkGMgK9ZtnKfYAgnEtQxbv",
        "name": "Morning walk",
        "duration": 37,
        "thumbnailPath": "/lazy-static/thumbnails/abc.jpg",
        "account": { "name": "alice", "url": "https://tube.example/accounts/alice" },
        "channel": { "id": 7, "name": "alice_channel" },
        "files": [],
        "streamingPlaylists": [{
            "playlistUrl": "https://tube.example/static/streaming-playlists/hls/abc/master.m3u8",
            "files": [{ "fileUrl": "https://tube.example/static/streaming-playlists/hls/abc/720.mp4" }]
        }]
    }"#;

    #[test]
    fn details_decode_and_expose_sources() {
        let details: VideoDetails = serde_json::from_str(DETAILS).unwrap();
        assert_eq!(details.channel_id(), Some(7));
        assert!(details.manifest_url().unwrap().ends_with("master.m3u8"));
        // No web video file, so the HLS file is used.
        assert!(details.progressive_url().unwrap().ends_with("720.mp4"));
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let page: Page<VideoSummary> =
            serde_json::from_str(r#"{ "total": 1, "data": [{ "id": 3 }] }"#).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].channel_id(), None);
    }

    #[test]
    fn missing_data_defaults_to_empty_page() {
        let page: Page<VideoSummary> = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn blank_file_urls_are_skipped() {
        let details: VideoDetails = serde_json::from_str(
            r#"{ "id": 1, "uuid": "u", "files": [{ "fileUrl": " " }, { "fileUrl": "https://x/1.mp4" }] }"#,
        )
        .unwrap();
        assert_eq!(details.progressive_url(), Some("https://x/1.mp4"));
        assert_eq!(details.manifest_url(), None);
    }
}
