// SPDX-License-Identifier: MPL-2.0
//! Story sequence store.
//!
//! Holds the ordered items, the current index, the mute preference and the
//! outcome of the single initial load. Navigation never wraps: moving past
//! the last item reports [`Advance::EndOfSequence`] so the shell can close
//! out instead of replaying the last story forever.

use crate::domain::error::CatalogError;
use crate::domain::story::PlayableItem;

/// Outcome of [`StorySequence::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The index moved to the given position.
    Moved(usize),
    /// There is nothing after the current item.
    EndOfSequence,
}

/// Proof that a load was started; required to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Navigation snapshot for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceInfo {
    pub current_index: Option<usize>,
    pub total_count: usize,
    pub at_first: bool,
    pub at_last: bool,
}

/// Ordered story items plus navigation state.
#[derive(Debug, Clone)]
pub struct StorySequence {
    items: Vec<PlayableItem>,
    index: usize,
    muted: bool,
    loading: bool,
    error: Option<CatalogError>,
    issued: u64,
    alive: bool,
}

impl Default for StorySequence {
    fn default() -> Self {
        Self::new()
    }
}

impl StorySequence {
    /// Creates an empty, muted sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            muted: true,
            loading: false,
            error: None,
            issued: 0,
            alive: true,
        }
    }

    /// Creates a sequence with `muted` as the initial mute preference.
    #[must_use]
    pub fn with_muted(muted: bool) -> Self {
        Self {
            muted,
            ..Self::new()
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Starts the initial load. Returns `None` if a load was already started
    /// or the store is closed.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.issued > 0 || !self.alive {
            return None;
        }
        self.issued += 1;
        self.loading = true;
        self.error = None;
        Some(LoadTicket(self.issued))
    }

    /// Applies the result of the load identified by `ticket`.
    ///
    /// Returns false (and changes nothing) when the store was closed in the
    /// meantime or the ticket is not the current one.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<PlayableItem>, CatalogError>,
    ) -> bool {
        if !self.alive || ticket.0 != self.issued {
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.index = 0;
                self.error = None;
            }
            Err(err) => {
                self.items.clear();
                self.index = 0;
                tracing::warn!(error = %err, "story sequence load failed");
                self.error = Some(err);
            }
        }
        true
    }

    /// Marks the store as torn down. Pending load results are discarded.
    pub fn close(&mut self) {
        self.alive = false;
        self.loading = false;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Moves to the next item, or reports the end of the sequence.
    pub fn next(&mut self) -> Advance {
        if self.index + 1 < self.items.len() {
            self.index += 1;
            Advance::Moved(self.index)
        } else {
            Advance::EndOfSequence
        }
    }

    /// Moves to the previous item, stopping at the first one.
    pub fn prev(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    /// Returns to the first item, e.g. to replay a finished sequence.
    pub fn rewind(&mut self) -> usize {
        self.index = 0;
        self.index
    }

    /// Flips the mute preference and returns the new value.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn current(&self) -> Option<&PlayableItem> {
        self.items.get(self.index)
    }

    #[must_use]
    pub fn items(&self) -> &[PlayableItem] {
        &self.items
    }

    /// Current index. Meaningless while the sequence is empty.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn info(&self) -> SequenceInfo {
        if self.items.is_empty() {
            return SequenceInfo::default();
        }
        SequenceInfo {
            current_index: Some(self.index),
            total_count: self.items.len(),
            at_first: self.index == 0,
            at_last: self.index + 1 == self.items.len(),
        }
    }
}
