// SPDX-License-Identifier: MPL-2.0
//! Integration tests to validate style and design token coherence.

#[cfg(test)]
mod tests {
    use iced::widget::{button as button_widget, container};
    use iced::{Background, Theme};
    use iced_stories::ui::design_tokens::{opacity, palette, sizing, spacing};
    use iced_stories::ui::notifications::Severity;
    use iced_stories::ui::styles::{button, overlay};

    #[test]
    fn all_styles_are_callable() {
        let theme = Theme::Dark;

        let _ = button::primary(&theme, button_widget::Status::Active);
        let _ = button::control(&theme, button_widget::Status::Pressed);
        let _ = overlay::header(&theme);
        let _ = overlay::backdrop(&theme);
        let _ = overlay::indicator(palette::PRIMARY_500)(&theme);
    }

    #[test]
    fn backdrop_is_opaque_black() {
        let style: container::Style = overlay::backdrop(&Theme::Dark);
        assert_eq!(
            style.background,
            Some(Background::Color(palette::BLACK))
        );
    }

    #[test]
    fn overlay_layers_are_ordered_by_opacity() {
        assert!(opacity::OVERLAY_SUBTLE < opacity::OVERLAY_MEDIUM);
        assert!(opacity::OVERLAY_MEDIUM < opacity::OVERLAY_STRONG);
        assert!(opacity::OVERLAY_STRONG < opacity::OVERLAY_HOVER);
    }

    #[test]
    fn controls_fit_the_minimum_window() {
        // Mute and copy-link sit side by side in the header.
        let header = 2.0 * sizing::CONTROL_BUTTON + 3.0 * spacing::XS;
        assert!(header < 280.0);
        assert!(sizing::TOAST_WIDTH <= 320.0);
    }

    #[test]
    fn severities_use_distinct_accents() {
        let colors = [
            Severity::Success.color(),
            Severity::Warning.color(),
            Severity::Error.color(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
