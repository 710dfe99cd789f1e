// SPDX-License-Identifier: MPL-2.0
//! The story itself: current frame (or poster) with the overlay on top.
//!
//! Layers, bottom to top: media, header with progress and controls, center
//! indicator (spinner until playback starts, "paused" while held).

use super::{Message, StoryView};
use crate::ui::design_tokens::{opacity, palette, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::{AnimatedSpinner, ProgressSegments};
use iced::widget::{button, image, Column, Container, Row, Space, Stack, Text};
use iced::{alignment, Color, ContentFit, Element, Length};

/// i18n key of the mute control for the current mute flag.
#[must_use]
pub fn mute_label_key(muted: bool) -> &'static str {
    if muted {
        "story-unmute"
    } else {
        "story-mute"
    }
}

fn media<'a>(view: &StoryView<'a>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match view.frame.or(view.poster) {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => Space::new().into(),
    };
    Container::new(picture)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(styles::overlay::backdrop)
        .into()
}

fn control<'a>(label: String, message: Message) -> Element<'a, Message> {
    button(Text::new(label).size(typography::CAPTION))
        .on_press(message)
        .height(Length::Fixed(sizing::CONTROL_BUTTON))
        .padding([spacing::XS, spacing::SM])
        .style(styles::button::control)
        .into()
}

fn header<'a>(view: &StoryView<'a>) -> Element<'a, Message> {
    let i18n = view.i18n;
    let item = view.item;

    let caption = Color {
        a: opacity::OVERLAY_HOVER,
        ..palette::WHITE
    };
    let labels = Column::new()
        .spacing(spacing::XXS)
        .push(
            Text::new(item.title.clone())
                .size(typography::TITLE_SM)
                .color(palette::WHITE),
        )
        .push(
            Text::new(item.author_handle())
                .size(typography::CAPTION)
                .color(caption),
        );

    let position = i18n.tr_with_args(
        "story-position",
        &[
            ("current", &(view.index + 1).to_string()),
            ("total", &view.count.to_string()),
        ],
    );

    let mut controls = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(position).size(typography::CAPTION).color(caption))
        .push(control(
            i18n.tr(mute_label_key(view.muted)),
            Message::ToggleMute,
        ));
    if !item.page_url.is_empty() {
        controls = controls.push(control(i18n.tr("story-copy-link"), Message::CopyLink));
    }

    let info = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(Container::new(labels).width(Length::Fill))
        .push(controls);

    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(ProgressSegments::new(view.fills.clone()).into_element())
            .push(info),
    )
    .width(Length::Fill)
    .padding(spacing::SM)
    .style(styles::overlay::header)
    .into()
}

fn indicator<'a>(view: &StoryView<'a>) -> Option<Element<'a, Message>> {
    let content: Element<'a, Message> = if !view.started {
        AnimatedSpinner::new(palette::WHITE, view.spinner_rotation).into_element()
    } else if view.paused {
        Container::new(
            Text::new(view.i18n.tr("story-paused"))
                .size(typography::BODY)
                .color(palette::WHITE),
        )
        .padding([spacing::XS, spacing::MD])
        .style(styles::overlay::indicator(palette::PRIMARY_400))
        .into()
    } else {
        return None;
    };

    Some(
        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .into(),
    )
}

pub fn view<'a>(view: &StoryView<'a>) -> Element<'a, Message> {
    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(media(view))
        .push(
            Column::new()
                .width(Length::Fill)
                .height(Length::Fill)
                .push(header(view)),
        );
    if let Some(indicator) = indicator(view) {
        layers = layers.push(indicator);
    }
    layers.into()
}
