// SPDX-License-Identifier: MPL-2.0
//! User interface components, following the Elm-style "state down,
//! messages up" pattern.
//!
//! - [`story`] - Story overlay, surrounding screens, pointer translation
//! - [`notifications`] - Toast notifications
//! - [`widgets`] - Canvas widgets (spinner, progress segments)
//! - [`styles`] - Button and overlay styles
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod design_tokens;
pub mod notifications;
pub mod story;
pub mod styles;
pub mod widgets;
