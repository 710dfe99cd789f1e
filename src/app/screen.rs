// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration for the story shell.

use crate::domain::error::CatalogError;

/// What the window shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// No instance configured; nothing to load.
    Unconfigured,
    Loading,
    /// The channel has no video short enough.
    Empty,
    Stories,
    /// `next()` went past the last story.
    Finished,
    /// Every story failed to play.
    NoPlayable,
    LoadFailed(CatalogError),
}

impl Screen {
    /// Whether pointer and keyboard input drive the stories.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Screen::Stories)
    }
}
