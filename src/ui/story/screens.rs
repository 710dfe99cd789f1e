// SPDX-License-Identifier: MPL-2.0
//! Full-window screens around the story sequence: loading, notices and the
//! finished screen.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::AnimatedSpinner;
use iced::widget::{button, Column, Container, Text};
use iced::{alignment, Element, Length};

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::XL)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(styles::overlay::backdrop)
        .into()
}

/// Spinner shown while the channel listing is fetched.
pub fn loading(i18n: &I18n, rotation: f32) -> Element<'_, Message> {
    let content = Column::new()
        .spacing(spacing::MD)
        .align_x(alignment::Horizontal::Center)
        .push(AnimatedSpinner::new(palette::WHITE, rotation).into_element())
        .push(
            Text::new(i18n.tr("story-loading"))
                .size(typography::BODY)
                .color(palette::GRAY_200),
        );
    centered(content)
}

/// A single translated line, used for empty, failed and unconfigured states.
pub fn notice<'a>(i18n: &'a I18n, key: &str) -> Element<'a, Message> {
    centered(
        Text::new(i18n.tr(key))
            .size(typography::TITLE_SM)
            .color(palette::GRAY_200)
            .align_x(alignment::Horizontal::Center),
    )
}

pub fn finished(i18n: &I18n) -> Element<'_, Message> {
    let restart = button(Text::new(i18n.tr("story-restart")).size(typography::BODY))
        .padding([spacing::SM, spacing::LG])
        .style(styles::button::primary)
        .on_press(Message::Restart);

    let content = Column::new()
        .spacing(spacing::LG)
        .align_x(alignment::Horizontal::Center)
        .push(
            Text::new(i18n.tr("story-finished-title"))
                .size(typography::TITLE_LG)
                .color(palette::WHITE),
        )
        .push(restart);
    centered(content)
}
