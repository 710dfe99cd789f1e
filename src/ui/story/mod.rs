// SPDX-License-Identifier: MPL-2.0
//! Story screen: the overlay over the current video, plus the screens shown
//! around the sequence (loading, finished, failures).

mod overlay;
pub mod pointer;
pub mod screens;

pub use overlay::mute_label_key;
pub use pointer::PointerTracker;

use crate::domain::story::PlayableItem;
use crate::i18n::fluent::I18n;
use iced::widget::image;
use iced::Element;

/// Control buttons on the overlay. Presses on them never reach the
/// interaction surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ToggleMute,
    CopyLink,
    Restart,
}

/// Everything the overlay needs to render the current story.
pub struct StoryView<'a> {
    pub i18n: &'a I18n,
    pub item: &'a PlayableItem,
    pub index: usize,
    pub count: usize,
    /// One fill ratio per story.
    pub fills: Vec<f64>,
    pub muted: bool,
    /// First `Playing` seen for this story.
    pub started: bool,
    /// Held by a press.
    pub paused: bool,
    pub frame: Option<&'a image::Handle>,
    pub poster: Option<&'a image::Handle>,
    pub spinner_rotation: f32,
}

pub fn view<'a>(story: &StoryView<'a>) -> Element<'a, Message> {
    overlay::view(story)
}
