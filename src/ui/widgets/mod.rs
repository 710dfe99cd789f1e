// SPDX-License-Identifier: MPL-2.0
//! Canvas widgets of the story overlay.

pub mod animated_spinner;
pub mod progress_segments;

pub use animated_spinner::AnimatedSpinner;
pub use progress_segments::ProgressSegments;
