// SPDX-License-Identifier: MPL-2.0
//! Gesture ledger.
//!
//! Records when the user last interacted in a way that entitles the app to
//! start playback right away. Every clone shares the same record, so the
//! interaction surface writes it and the session controller reads it.

use crate::application::port::Clock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default compliance window after a qualifying interaction.
pub const DEFAULT_GESTURE_WINDOW: Duration = Duration::from_millis(1500);

/// Sentinel for "no interaction recorded yet".
const NEVER: u64 = u64::MAX;

/// Shared timestamp of the last qualifying interaction.
#[derive(Clone)]
pub struct GestureLedger {
    clock: Arc<dyn Clock>,
    last_us: Arc<AtomicU64>,
}

impl GestureLedger {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_us: Arc::new(AtomicU64::new(NEVER)),
        }
    }

    /// Records an interaction at the current instant.
    pub fn mark(&self) {
        self.last_us.store(self.now_us(), Ordering::Relaxed);
    }

    /// Returns true if less than `window` elapsed since the last [`mark`](Self::mark).
    #[must_use]
    pub fn is_within_window(&self, window: Duration) -> bool {
        let last = self.last_us.load(Ordering::Relaxed);
        if last == NEVER {
            return false;
        }
        let elapsed = self.now_us().saturating_sub(last);
        u128::from(elapsed) < window.as_micros()
    }

    /// Returns the clock the ledger reads.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[allow(clippy::cast_possible_truncation)] // u64 micros cover ~584k years of uptime
    fn now_us(&self) -> u64 {
        self.clock.now().as_micros() as u64
    }
}

impl fmt::Debug for GestureLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.last_us.load(Ordering::Relaxed);
        f.debug_struct("GestureLedger")
            .field("last_us", &(last != NEVER).then_some(last))
            .finish_non_exhaustive()
    }
}
