// SPDX-License-Identifier: MPL-2.0
//! Bounded listing settings.
//!
//! These wrappers keep catalog parameters in the range the host accepts,
//! so callers never clamp by hand.

/// Listing bounds.
pub mod listing_bounds {
    /// Minimum number of videos requested per listing.
    pub const MIN_PAGE_COUNT: u32 = 1;
    /// Maximum number of videos requested per listing (host limit).
    pub const MAX_PAGE_COUNT: u32 = 100;
    /// Default number of videos requested per listing.
    pub const DEFAULT_PAGE_COUNT: u32 = 20;
    /// Minimum accepted maximum duration in seconds.
    pub const MIN_MAX_DURATION_SECS: u32 = 1;
    /// Upper bound for the maximum duration in seconds (one hour).
    pub const MAX_MAX_DURATION_SECS: u32 = 3600;
    /// Default maximum duration in seconds.
    pub const DEFAULT_MAX_DURATION_SECS: u32 = 120;
}

// =============================================================================
// PageCount
// =============================================================================

/// Number of videos fetched from a channel, guaranteed to be within 1–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCount(u32);

impl PageCount {
    /// Creates a new page count, clamping to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(
            listing_bounds::MIN_PAGE_COUNT,
            listing_bounds::MAX_PAGE_COUNT,
        ))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for PageCount {
    fn default() -> Self {
        Self(listing_bounds::DEFAULT_PAGE_COUNT)
    }
}

// =============================================================================
// MaxDuration
// =============================================================================

/// Longest video admitted into a story sequence, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDuration(u32);

impl MaxDuration {
    /// Creates a new maximum duration, clamping to the valid range.
    #[must_use]
    pub fn new(secs: u32) -> Self {
        Self(secs.clamp(
            listing_bounds::MIN_MAX_DURATION_SECS,
            listing_bounds::MAX_MAX_DURATION_SECS,
        ))
    }

    #[must_use]
    pub fn secs(self) -> u32 {
        self.0
    }

    /// Returns true if a video of `duration_secs` is short enough.
    #[must_use]
    pub fn admits(self, duration_secs: f64) -> bool {
        duration_secs <= f64::from(self.0)
    }
}

impl Default for MaxDuration {
    fn default() -> Self {
        Self(listing_bounds::DEFAULT_MAX_DURATION_SECS)
    }
}
