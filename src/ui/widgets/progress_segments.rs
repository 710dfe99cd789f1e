// SPDX-License-Identifier: MPL-2.0
//! Segmented story progress bar.
//!
//! One segment per story. Fills come from the progress renderer and are
//! drawn as-is; this widget only lays them out.

use crate::ui::design_tokens::{opacity, palette::WHITE, sizing};
use iced::widget::canvas::{self, Canvas, Frame, Geometry};
use iced::{mouse, Color, Length, Point, Rectangle, Renderer, Size, Theme};

pub struct ProgressSegments {
    fills: Vec<f64>,
    gap: f32,
}

impl ProgressSegments {
    #[must_use]
    pub fn new(fills: Vec<f64>) -> Self {
        Self {
            fills,
            gap: sizing::PROGRESS_GAP,
        }
    }

    pub fn into_element<'a, Message: 'a>(self) -> iced::Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fixed(sizing::PROGRESS_HEIGHT))
            .into()
    }
}

/// Horizontal span `(x, width)` of every segment across `width`.
#[must_use]
pub fn segment_spans(count: usize, width: f32, gap: f32) -> Vec<(f32, f32)> {
    if count == 0 || width <= 0.0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let count_f = count as f32;
    let total_gap = gap * (count_f - 1.0);
    let segment = ((width - total_gap) / count_f).max(1.0);
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f32 * (segment + gap);
            (x, segment)
        })
        .collect()
}

impl<Message> canvas::Program<Message> for ProgressSegments {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let height = bounds.height;
        let track = Color {
            a: opacity::TRACK,
            ..WHITE
        };

        for ((x, width), fill) in segment_spans(self.fills.len(), bounds.width, self.gap)
            .into_iter()
            .zip(&self.fills)
        {
            frame.fill_rectangle(Point::new(x, 0.0), Size::new(width, height), track);
            #[allow(clippy::cast_possible_truncation)]
            let filled = width * fill.clamp(0.0, 1.0) as f32;
            if filled > 0.0 {
                frame.fill_rectangle(Point::new(x, 0.0), Size::new(filled, height), WHITE);
            }
        }

        vec![frame.into_geometry()]
    }
}
