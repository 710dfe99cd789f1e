// SPDX-License-Identifier: MPL-2.0
//! Shared HTTP plumbing for the catalog and the adaptive engine.

use futures_util::StreamExt;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("IcedStories/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Builds the HTTP client used by every remote adapter.
pub fn client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// A body read with [`read_capped`].
#[derive(Debug)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub elapsed: Duration,
    /// True if the body was cut at the cap.
    pub truncated: bool,
}

impl Download {
    /// Observed throughput in bits per second, if measurable.
    #[must_use]
    pub fn throughput_bps(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 || self.bytes.is_empty() {
            return None;
        }
        Some(self.bytes.len() as f64 * 8.0 / secs)
    }
}

/// Reads at most `cap` bytes of the response body.
///
/// `started` is the instant the request was sent, so the measurement
/// includes time to first byte.
pub async fn read_capped(
    response: reqwest::Response,
    cap: usize,
    started: Instant,
) -> reqwest::Result<Download> {
    let mut bytes = Vec::new();
    let mut truncated = false;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = cap.saturating_sub(bytes.len());
        if chunk.len() > room {
            bytes.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(Download {
        bytes,
        elapsed: started.elapsed(),
        truncated,
    })
}

/// Thumbnails larger than this are not shown.
pub const MAX_POSTER_BYTES: usize = 4 * 1024 * 1024;

/// Downloads a poster image.
///
/// # Errors
///
/// Fails on transport errors, non-success statuses and bodies larger than
/// [`MAX_POSTER_BYTES`].
pub async fn fetch_poster(client: reqwest::Client, url: String) -> crate::error::Result<Vec<u8>> {
    let started = Instant::now();
    let response = client.get(&url).send().await?.error_for_status()?;
    let download = read_capped(response, MAX_POSTER_BYTES, started).await?;
    if download.truncated {
        return Err(crate::error::Error::Network(format!(
            "poster larger than {MAX_POSTER_BYTES} bytes: {url}"
        )));
    }
    Ok(download.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_is_bits_per_second() {
        let download = Download {
            bytes: vec![0; 125_000],
            elapsed: Duration::from_secs(1),
            truncated: false,
        };
        assert_eq!(download.throughput_bps(), Some(1_000_000.0));
    }

    #[test]
    fn empty_or_instant_downloads_have_no_throughput() {
        let empty = Download {
            bytes: Vec::new(),
            elapsed: Duration::from_secs(1),
            truncated: false,
        };
        assert_eq!(empty.throughput_bps(), None);

        let instant = Download {
            bytes: vec![1],
            elapsed: Duration::ZERO,
            truncated: false,
        };
        assert_eq!(instant.throughput_bps(), None);
    }

    #[test]
    fn client_builds() {
        assert!(client().is_ok());
    }
}
