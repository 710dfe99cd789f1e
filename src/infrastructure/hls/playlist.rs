// SPDX-License-Identifier: MPL-2.0
//! M3U8 reading on top of `hls_m3u8`.
//!
//! Only what rendition selection and bandwidth probing need is kept:
//! variants of a master playlist and segments (with byte ranges) of a media
//! playlist.

use hls_m3u8::{tags::VariantStream as HlsVariantStream, MasterPlaylist, MediaPlaylist};
use std::fmt;

/// One rendition of a master playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Peak bits per second.
    pub bandwidth: u64,
    pub resolution: Option<(u32, u32)>,
    /// URI as written, relative to the playlist.
    pub uri: String,
}

/// A byte range inside a segment resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub length: u64,
    pub offset: u64,
}

impl ByteRange {
    /// Value for an HTTP `Range` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        let last = self.offset + self.length.saturating_sub(1);
        format!("bytes={}-{}", self.offset, last)
    }
}

/// One media segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub duration_secs: f64,
    pub uri: String,
    pub range: Option<ByteRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Playlist {
    /// Variants sorted by ascending bandwidth.
    Master(Vec<Variant>),
    Media(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    Master(String),
    Media(String),
}

impl fmt::Display for PlaylistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistError::Master(msg) => write!(f, "invalid master playlist: {msg}"),
            PlaylistError::Media(msg) => write!(f, "invalid media playlist: {msg}"),
        }
    }
}

impl std::error::Error for PlaylistError {}

/// Parses a master or media playlist.
///
/// Text carrying `#EXT-X-STREAM-INF` is read as a master playlist; anything
/// else as a media playlist.
pub fn parse(text: &str) -> Result<Playlist, PlaylistError> {
    if text.contains("#EXT-X-STREAM-INF") {
        parse_master(text).map(Playlist::Master)
    } else {
        parse_media(text).map(Playlist::Media)
    }
}

fn parse_master(text: &str) -> Result<Vec<Variant>, PlaylistError> {
    let master =
        MasterPlaylist::try_from(text).map_err(|e| PlaylistError::Master(e.to_string()))?;

    let mut variants: Vec<Variant> = master
        .variant_streams
        .iter()
        .filter_map(|stream| match stream {
            HlsVariantStream::ExtXStreamInf {
                uri, stream_data, ..
            } => Some(Variant {
                bandwidth: stream_data.bandwidth(),
                resolution: stream_data.resolution().and_then(|r| {
                    Some((u32::try_from(r.width()).ok()?, u32::try_from(r.height()).ok()?))
                }),
                uri: uri.to_string(),
            }),
            // Trick-play renditions are never played.
            HlsVariantStream::ExtXIFrame { .. } => None,
        })
        .collect();

    variants.sort_by_key(|v| v.bandwidth);
    Ok(variants)
}

fn parse_media(text: &str) -> Result<Vec<Segment>, PlaylistError> {
    let media = MediaPlaylist::try_from(text).map_err(|e| PlaylistError::Media(e.to_string()))?;

    let mut next_offset = 0u64;
    let segments = media
        .segments
        .iter()
        .map(|(_, segment)| {
            let range = segment.byte_range.as_ref().map(|range| {
                let end = range.end() as u64;
                // A range without offset continues the previous one.
                let offset = range.start().map_or(next_offset, |start| start as u64);
                let length = match range.start() {
                    Some(start) => end.saturating_sub(start as u64),
                    None => end,
                };
                next_offset = offset + length;
                ByteRange { length, offset }
            });
            Segment {
                duration_secs: segment.duration.duration().as_secs_f64(),
                uri: segment.uri().to_string(),
                range,
            }
        })
        .collect();

    Ok(segments)
}

/// Index of the highest variant whose bandwidth fits `headroom` of the
/// estimate, or the lowest variant when none fits.
#[must_use]
pub fn pick_level(variants: &[Variant], estimate_bps: f64, headroom: f64) -> usize {
    let budget = estimate_bps * headroom;
    variants
        .iter()
        .rposition(|v| (v.bandwidth as f64) <= budget)
        .unwrap_or(0)
}
