// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module contains the application layer of the Clean Architecture:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`gesture`]: Shared record of the last qualifying user interaction
//! - [`playback`]: Session controller binding items to the media sink
//! - [`interaction`]: Tap, hold and swipe recognition
//! - [`progress`]: Segmented progress sampling
//! - [`sequence`]: Ordered story items and navigation
//! - [`loader`]: One-shot sequence load through the catalog
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services
//!
//! # Example
//!
//! ```ignore
//! use iced_stories::application::playback::SessionController;
//! use iced_stories::application::sequence::StorySequence;
//!
//! let mut sequence = StorySequence::new();
//! if let Some(item) = sequence.current() {
//!     controller.bind(item, sequence.is_muted(), false)?;
//! }
//! ```

pub mod gesture;
pub mod interaction;
pub mod loader;
pub mod playback;
pub mod port;
pub mod progress;
pub mod sequence;
