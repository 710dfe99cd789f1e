// SPDX-License-Identifier: MPL-2.0
//! Subscriptions of the story shell.
//!
//! Native events are routed to the interaction surface only while stories
//! are on screen. The decode worker exists only while the sink has a source,
//! so tearing a session down also ends its worker.

use super::{Controller, Message};
use crate::application::port::MediaSink;
use crate::infrastructure::ffmpeg::sink_playback;
use crate::infrastructure::hls::hls_worker;
use iced::{event, keyboard, mouse, time, window, Event, Subscription};
use std::time::Duration;

const ANIMATION_INTERVAL: Duration = Duration::from_millis(16);
const NOTIFICATION_INTERVAL: Duration = Duration::from_millis(100);

fn route_story_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    let captured = status == event::Status::Captured;
    match event {
        Event::Window(window::Event::Resized(size) | window::Event::Opened { size, .. }) => {
            Some(Message::WindowResized(size))
        }
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) if !captured => {
            Some(Message::KeyPressed(key))
        }
        pointer @ (Event::Mouse(
            mouse::Event::CursorMoved { .. }
            | mouse::Event::CursorLeft
            | mouse::Event::ButtonPressed(_)
            | mouse::Event::ButtonReleased(_),
        )
        | Event::Touch(_)) => Some(Message::Pointer {
            event: pointer,
            captured,
        }),
        _ => None,
    }
}

fn route_window_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::Resized(size) | window::Event::Opened { size, .. }) => {
            Some(Message::WindowResized(size))
        }
        _ => None,
    }
}

/// Creates the native event subscription.
///
/// Pointer events keep flowing while a control is pressed; the `captured`
/// flag tells the surface to leave them alone.
pub fn create_event_subscription(interactive: bool) -> Subscription<Message> {
    if interactive {
        event::listen_with(route_story_event)
    } else {
        event::listen_with(route_window_event)
    }
}

/// Creates the worker subscriptions: the HLS engine worker (always) and the
/// decoder of the current sink source.
pub fn create_worker_subscription(controller: &Controller) -> Subscription<Message> {
    let hls = hls_worker().map(Message::Hls);
    let sink = controller.sink();
    let decoder = match sink.source() {
        Some(url) => sink_playback(sink.generation(), url.to_string(), sink.position())
            .map(Message::Sink),
        None => Subscription::none(),
    };
    Subscription::batch([hls, decoder])
}

/// Creates the animation loop for the progress bar and spinner.
///
/// The loop is keyed by the progress generation, so a new story restarts it
/// and frames of the previous story can be told apart.
pub fn create_animation_subscription(active: bool, generation: u64) -> Subscription<Message> {
    if active {
        time::every(ANIMATION_INTERVAL)
            .with(generation)
            .map(|(generation, at)| Message::AnimationFrame { generation, at })
    } else {
        Subscription::none()
    }
}

/// Creates the notification auto-dismiss tick.
pub fn create_notification_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(NOTIFICATION_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{touch, Point, Size};

    fn window_id() -> window::Id {
        window::Id::unique()
    }

    #[test]
    fn captured_press_is_flagged() {
        let press = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        let message = route_story_event(press, event::Status::Captured, window_id());
        assert!(matches!(message, Some(Message::Pointer { captured: true, .. })));
    }

    #[test]
    fn touch_reaches_the_surface() {
        let touch = Event::Touch(touch::Event::FingerPressed {
            id: touch::Finger(0),
            position: Point::new(1.0, 1.0),
        });
        let message = route_story_event(touch, event::Status::Ignored, window_id());
        assert!(matches!(message, Some(Message::Pointer { captured: false, .. })));
    }

    #[test]
    fn resize_is_routed_on_every_screen() {
        let resize = Event::Window(window::Event::Resized(Size::new(400.0, 700.0)));
        assert!(matches!(
            route_window_event(resize.clone(), event::Status::Ignored, window_id()),
            Some(Message::WindowResized(_))
        ));
        assert!(matches!(
            route_story_event(resize, event::Status::Ignored, window_id()),
            Some(Message::WindowResized(_))
        ));
    }

    #[test]
    fn pointer_is_ignored_outside_stories() {
        let press = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        assert!(route_window_event(press, event::Status::Ignored, window_id()).is_none());
    }
}
