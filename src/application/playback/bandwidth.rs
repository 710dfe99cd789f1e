// SPDX-License-Identifier: MPL-2.0
//! Persisted bandwidth history.
//!
//! The last estimate reported by an adaptive engine is kept across items
//! (and runs) so the next engine does not start from a cold guess.

use crate::application::port::KeyValueStore;

/// Store key holding the last estimate, in kilobits per second.
pub const BANDWIDTH_KEY: &str = "hls:lastBwKbps";

/// Seed used when nothing was recorded yet, in bits per second.
pub const DEFAULT_SEED_BPS: f64 = 500_000.0;

/// Reads and writes the bandwidth estimate in a [`KeyValueStore`].
#[derive(Debug)]
pub struct BandwidthHistory<K> {
    store: K,
}

impl<K: KeyValueStore> BandwidthHistory<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Returns the seed for the next engine, in bits per second.
    pub fn seed_bps(&self) -> f64 {
        self.store
            .get(BANDWIDTH_KEY)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|kbps| kbps.is_finite() && *kbps > 0.0)
            .map_or(DEFAULT_SEED_BPS, |kbps| kbps * 1000.0)
    }

    /// Overwrites the stored estimate. Non-positive or non-finite values
    /// are ignored.
    pub fn record(&mut self, bps: f64) {
        if !bps.is_finite() || bps <= 0.0 {
            return;
        }
        let kbps = (bps / 1000.0).round();
        tracing::debug!(kbps, "bandwidth estimate recorded");
        self.store.set(BANDWIDTH_KEY, format!("{kbps:.0}"));
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}
