// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::{Message, Screen};
use crate::application::sequence::StorySequence;
use crate::i18n::fluent::I18n;
use crate::ui::notifications::{self, Toast};
use crate::ui::story::{self, screens, StoryView};
use iced::widget::{image, Stack};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: &'a Screen,
    pub sequence: &'a StorySequence,
    pub fills: Vec<f64>,
    pub started: bool,
    pub paused: bool,
    pub frame: Option<&'a image::Handle>,
    pub poster: Option<&'a image::Handle>,
    pub spinner_rotation: f32,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current screen with the toasts on top.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let content: Element<'_, story::Message> = match ctx.screen {
        Screen::Unconfigured => screens::notice(i18n, "story-no-instance"),
        Screen::Loading => screens::loading(i18n, ctx.spinner_rotation),
        Screen::Empty => screens::notice(i18n, "story-empty"),
        Screen::Finished => screens::finished(i18n),
        Screen::NoPlayable => screens::notice(i18n, "story-no-playable"),
        Screen::LoadFailed(err) => screens::notice(i18n, err.i18n_key()),
        Screen::Stories => match ctx.sequence.current() {
            Some(item) => story::view(&StoryView {
                i18n,
                item,
                index: ctx.sequence.index(),
                count: ctx.sequence.len(),
                fills: ctx.fills,
                muted: ctx.sequence.is_muted(),
                started: ctx.started,
                paused: ctx.paused,
                frame: ctx.frame,
                poster: ctx.poster,
                spinner_rotation: ctx.spinner_rotation,
            }),
            None => screens::loading(i18n, ctx.spinner_rotation),
        },
    };

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(content.map(Message::Story))
        .push(Toast::view_overlay(ctx.notifications, i18n).map(Message::Notification))
        .into()
}
