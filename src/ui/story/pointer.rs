// SPDX-License-Identifier: MPL-2.0
//! Translation of window events into interaction surface input.
//!
//! Mouse buttons carry no position, so the last cursor position is tracked.
//! Touch contacts are counted so that a second finger is seen as
//! multi-contact. Only the first finger down moves and ends a press.
//!
//! Story controls are buttons. Iced marks the events they consume as
//! captured, which is how a press reveals the control tag on its hit chain.

use crate::application::interaction::{PointerInput, PointerKind, Position};
use crate::domain::story::{Capability, HitChain};
use iced::{mouse, touch, Event, Point};
use std::collections::HashSet;

/// Hit chain of a press: the target, the overlay, the story surface.
///
/// Iced does not expose the widget tree to event listeners, so a capture
/// by a widget is the only evidence of what lies under the pointer. That
/// capture tags the target; the overlay and the surface never carry a tag,
/// so the chain carries [`Capability::Control`] exactly when the event was
/// captured.
#[must_use]
pub fn hit_chain(captured_by_widget: bool) -> HitChain {
    let target: &[Capability] = if captured_by_widget {
        &[Capability::Control]
    } else {
        &[]
    };
    HitChain::new().push(target).push(&[]).push(&[])
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Position,
    fingers: HashSet<touch::Finger>,
    primary: Option<touch::Finger>,
}

fn position(point: Point) -> Position {
    Position::new(point.x, point.y)
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingers currently down.
    #[must_use]
    pub fn contacts(&self) -> usize {
        self.fingers.len()
    }

    /// Converts a raw event. `captured` is true if a widget consumed it.
    pub fn translate(&mut self, event: &Event, captured: bool) -> Option<PointerInput> {
        match event {
            Event::Mouse(mouse::Event::CursorMoved { position: point }) => {
                self.cursor = position(*point);
                Some(PointerInput::Move {
                    kind: PointerKind::Mouse,
                    position: self.cursor,
                })
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                Some(PointerInput::Down {
                    kind: PointerKind::Mouse,
                    position: self.cursor,
                    contacts: 1,
                    on_control: hit_chain(captured).has(Capability::Control),
                })
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(PointerInput::Up {
                    kind: PointerKind::Mouse,
                    position: self.cursor,
                })
            }
            Event::Mouse(mouse::Event::CursorLeft) => Some(PointerInput::Cancel {
                kind: PointerKind::Mouse,
            }),
            Event::Touch(touch::Event::FingerPressed { id, position: point }) => {
                if self.fingers.is_empty() {
                    self.primary = Some(*id);
                }
                self.fingers.insert(*id);
                Some(PointerInput::Down {
                    kind: PointerKind::Touch,
                    position: position(*point),
                    contacts: self.fingers.len(),
                    on_control: hit_chain(captured).has(Capability::Control),
                })
            }
            Event::Touch(touch::Event::FingerMoved { id, position: point }) => {
                (self.primary == Some(*id)).then(|| PointerInput::Move {
                    kind: PointerKind::Touch,
                    position: position(*point),
                })
            }
            Event::Touch(touch::Event::FingerLifted { id, position: point }) => {
                self.fingers.remove(id);
                self.release_primary(*id).then(|| PointerInput::Up {
                    kind: PointerKind::Touch,
                    position: position(*point),
                })
            }
            Event::Touch(touch::Event::FingerLost { id, .. }) => {
                self.fingers.remove(id);
                self.release_primary(*id).then_some(PointerInput::Cancel {
                    kind: PointerKind::Touch,
                })
            }
            _ => None,
        }
    }

    fn release_primary(&mut self, id: touch::Finger) -> bool {
        if self.primary == Some(id) {
            self.primary = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finger_down(id: u64, x: f32) -> Event {
        Event::Touch(touch::Event::FingerPressed {
            id: touch::Finger(id),
            position: Point::new(x, 10.0),
        })
    }

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        tracker.translate(
            &Event::Mouse(mouse::Event::CursorMoved {
                position: Point::new(120.0, 40.0),
            }),
            false,
        );
        let input = tracker.translate(
            &Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            false,
        );
        assert_eq!(
            input,
            Some(PointerInput::Down {
                kind: PointerKind::Mouse,
                position: Position::new(120.0, 40.0),
                contacts: 1,
                on_control: false,
            })
        );
    }

    #[test]
    fn captured_press_is_a_control_press() {
        let mut tracker = PointerTracker::new();
        let input = tracker.translate(
            &Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            true,
        );
        assert!(matches!(input, Some(PointerInput::Down { on_control: true, .. })));
        assert!(hit_chain(true).has(Capability::Control));
        assert!(!hit_chain(false).has(Capability::Control));
    }

    #[test]
    fn only_the_target_level_is_ever_tagged() {
        assert_eq!(hit_chain(false), HitChain::new().push(&[]).push(&[]).push(&[]));
        assert_eq!(
            hit_chain(true),
            HitChain::control().push(&[]).push(&[])
        );
    }

    #[test]
    fn second_finger_reports_two_contacts() {
        let mut tracker = PointerTracker::new();
        tracker.translate(&finger_down(1, 10.0), false);
        let input = tracker.translate(&finger_down(2, 50.0), false);
        assert!(matches!(input, Some(PointerInput::Down { contacts: 2, .. })));

        tracker.translate(
            &Event::Touch(touch::Event::FingerLifted {
                id: touch::Finger(1),
                position: Point::new(10.0, 10.0),
            }),
            false,
        );
        assert_eq!(tracker.contacts(), 1);
    }

    #[test]
    fn only_the_first_finger_ends_the_press() {
        let mut tracker = PointerTracker::new();
        tracker.translate(&finger_down(1, 10.0), false);
        tracker.translate(&finger_down(2, 50.0), false);
        let lifted_second = tracker.translate(
            &Event::Touch(touch::Event::FingerLifted {
                id: touch::Finger(2),
                position: Point::new(50.0, 10.0),
            }),
            false,
        );
        assert_eq!(lifted_second, None);

        let lifted_first = tracker.translate(
            &Event::Touch(touch::Event::FingerLifted {
                id: touch::Finger(1),
                position: Point::new(10.0, 10.0),
            }),
            false,
        );
        assert!(matches!(lifted_first, Some(PointerInput::Up { .. })));
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut tracker = PointerTracker::new();
        let input = tracker.translate(
            &Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)),
            false,
        );
        assert_eq!(input, None);
    }
}
