// SPDX-License-Identifier: MPL-2.0
//! Bounded play-attempt policy.
//!
//! A session attempts playback immediately (when allowed), once more after
//! a short delay if that is refused, and once per readiness transition of
//! the sink. When every attempt has been spent without success the policy
//! gives up quietly.

/// Readiness transitions that warrant a new attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Loaded,
    CanPlay,
}

/// What to do after a refused attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Arm the single delayed retry.
    ScheduleRetry,
    /// Nothing to do until the sink reports readiness.
    AwaitReadiness,
    /// Every attempt is spent.
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Pending,
    Started,
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RetrySlot {
    #[default]
    Available,
    Scheduled,
    Spent,
}

/// Attempt bookkeeping for one source of one session.
#[derive(Debug, Clone, Default)]
pub struct PlayAttempts {
    phase: Phase,
    retry: RetrySlot,
    loaded_seen: bool,
    can_play_seen: bool,
}

impl PlayAttempts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while playback has neither started nor been given up.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    #[cfg(test)]
    fn has_started(&self) -> bool {
        self.phase == Phase::Started
    }

    #[cfg(test)]
    fn gave_up(&self) -> bool {
        self.phase == Phase::GaveUp
    }

    /// Returns true if the delayed retry is armed.
    #[cfg(test)]
    fn retry_scheduled(&self) -> bool {
        self.retry == RetrySlot::Scheduled
    }

    /// Records a readiness transition. Returns true if an attempt should be
    /// made now; each transition counts once per source.
    pub fn on_readiness(&mut self, readiness: Readiness) -> bool {
        let seen = match readiness {
            Readiness::Loaded => &mut self.loaded_seen,
            Readiness::CanPlay => &mut self.can_play_seen,
        };
        if *seen {
            return false;
        }
        *seen = true;
        self.is_pending()
    }

    /// Records a refused attempt and decides the follow-up.
    pub fn on_rejected(&mut self) -> Rejection {
        if !self.is_pending() {
            return Rejection::AwaitReadiness;
        }
        match self.retry {
            RetrySlot::Available => {
                self.retry = RetrySlot::Scheduled;
                Rejection::ScheduleRetry
            }
            // An armed retry will make the next attempt itself.
            RetrySlot::Scheduled => Rejection::AwaitReadiness,
            RetrySlot::Spent if self.loaded_seen && self.can_play_seen => {
                self.phase = Phase::GaveUp;
                Rejection::GaveUp
            }
            RetrySlot::Spent => Rejection::AwaitReadiness,
        }
    }

    /// Consumes the armed retry. Returns true if an attempt should be made.
    pub fn on_retry_elapsed(&mut self) -> bool {
        if self.retry != RetrySlot::Scheduled {
            return false;
        }
        self.retry = RetrySlot::Spent;
        self.is_pending()
    }

    /// Records a successful start.
    pub fn on_started(&mut self) {
        self.phase = Phase::Started;
    }

    /// Starts over for a replacement source.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
