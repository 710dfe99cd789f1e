// SPDX-License-Identifier: MPL-2.0
//! Segmented story progress.
//!
//! One segment per item: earlier items are full, later ones empty, and the
//! current one follows the live playback clock. Sampling is owned by the
//! current item: it restarts when the item or its duration changes and
//! stops on teardown.

/// Fraction of `duration` covered by `time`, in `0.0..=1.0`.
///
/// Non-positive or non-finite durations yield `0.0`.
#[must_use]
pub fn progress_ratio(time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    (time / duration).clamp(0.0, 1.0)
}

/// Fill of `segment` when `current` is the active item at `ratio`.
#[must_use]
pub fn segment_fill(segment: usize, current: usize, ratio: f64) -> f64 {
    use std::cmp::Ordering;
    match segment.cmp(&current) {
        Ordering::Less => 1.0,
        Ordering::Equal => ratio.clamp(0.0, 1.0),
        Ordering::Greater => 0.0,
    }
}

/// Sampling state for the active segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressRenderer {
    index: usize,
    duration: f64,
    ratio: f64,
    running: bool,
    generation: u64,
}

impl ProgressRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts sampling for `index`. A change of index or duration restarts
    /// the loop from zero; repeating the same call keeps the current ratio.
    pub fn start(&mut self, index: usize, duration: f64) {
        let same = self.running
            && self.index == index
            && self.duration.to_bits() == duration.to_bits();
        if same {
            return;
        }
        self.index = index;
        self.duration = duration;
        self.ratio = 0.0;
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Stops sampling. Later samples are ignored until the next `start`.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Takes one sample of the live clock.
    pub fn sample(&mut self, current_time: f64) {
        if self.running {
            self.ratio = progress_ratio(current_time, self.duration);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Identifies the current sampling loop.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Fills for `count` segments.
    #[must_use]
    pub fn fills(&self, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| segment_fill(i, self.index, self.ratio))
            .collect()
    }
}
