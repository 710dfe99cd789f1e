// SPDX-License-Identifier: MPL-2.0
//! Story interaction surface.
//!
//! Turns raw pointer and touch input into story actions:
//!
//! - a press pauses playback at once
//! - a release before the hold threshold is a tap: resume, then navigate
//!   by screen half (left = previous, right = next)
//! - a press held past the threshold is a hold: playback stays paused and
//!   the release does not navigate
//! - a horizontal drag past the swipe threshold is a swipe: left = next,
//!   right = previous; it cancels the hold timer and wins over the tap
//!
//! Presses on control elements, extra touch contacts and mouse events
//! emulated right after a touch are ignored.

use crate::application::gesture::GestureLedger;
use crate::application::port::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Source of pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Identifies one press, so late hold timers can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PressId(u64);

/// Position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input delivered to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down {
        kind: PointerKind,
        position: Position,
        /// Simultaneous touch contacts, including this one.
        contacts: usize,
        /// The press landed on (or inside) a control element.
        on_control: bool,
    },
    Move {
        kind: PointerKind,
        position: Position,
    },
    Up {
        kind: PointerKind,
        position: Position,
    },
    /// The pointer left the surface or the platform cancelled the touch.
    Cancel { kind: PointerKind },
    /// The hold timer scheduled for `press` fired.
    HoldElapsed { press: PressId },
}

/// Story navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Actions the shell carries out, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceAction {
    Pause,
    Resume,
    Navigate(Direction),
    /// Deliver [`PointerInput::HoldElapsed`] for `press` after `delay`.
    ScheduleHold { press: PressId, delay: Duration },
    /// Drop the pending hold timer.
    CancelHold,
    /// The press became a hold.
    HoldConfirmed,
}

/// Gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    pub hold_confirm: Duration,
    pub swipe_threshold: f32,
    /// Recognize swipes made by dragging the mouse.
    pub swipe_with_mouse: bool,
    /// Window after a touch ends during which mouse input is dropped.
    pub touch_guard: Duration,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            hold_confirm: Duration::from_millis(600),
            swipe_threshold: 50.0,
            swipe_with_mouse: true,
            touch_guard: Duration::from_millis(80),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    id: PressId,
    kind: PointerKind,
    started_at: Duration,
    origin: Position,
    hold_confirmed: bool,
    swiped: bool,
}

/// Gesture state machine for the story surface.
pub struct InteractionSurface {
    clock: Arc<dyn Clock>,
    ledger: GestureLedger,
    settings: SurfaceSettings,
    width: f32,
    press: Option<Press>,
    last_press: u64,
    touch_guard_until: Option<Duration>,
}

impl InteractionSurface {
    #[must_use]
    pub fn new(ledger: GestureLedger, settings: SurfaceSettings) -> Self {
        Self {
            clock: Arc::clone(ledger.clock()),
            ledger,
            settings,
            width: 0.0,
            press: None,
            last_press: 0,
            touch_guard_until: None,
        }
    }

    /// Updates the surface width used to split tap zones.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    /// Returns true while a press is in progress and confirmed as a hold.
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.press.is_some_and(|p| p.hold_confirmed)
    }

    /// Returns true while a press is in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Feeds one input and returns the resulting actions.
    pub fn handle(&mut self, input: PointerInput) -> Vec<SurfaceAction> {
        let now = self.clock.now();
        match input {
            PointerInput::Down {
                kind,
                position,
                contacts,
                on_control,
            } => self.press_start(now, kind, position, contacts, on_control),
            PointerInput::Move { kind, position } => self.moved(kind, position),
            PointerInput::Up { kind, position } => self.release(now, kind, position),
            PointerInput::Cancel { kind } => self.cancel(now, kind),
            PointerInput::HoldElapsed { press } => self.hold_elapsed(press),
        }
    }

    fn press_start(
        &mut self,
        now: Duration,
        kind: PointerKind,
        position: Position,
        contacts: usize,
        on_control: bool,
    ) -> Vec<SurfaceAction> {
        if kind == PointerKind::Touch && contacts > 1 {
            return Vec::new();
        }
        if kind == PointerKind::Mouse && self.in_touch_guard(now) {
            return Vec::new();
        }
        if on_control || self.press.is_some() {
            return Vec::new();
        }

        self.last_press = self.last_press.wrapping_add(1);
        let id = PressId(self.last_press);
        self.press = Some(Press {
            id,
            kind,
            started_at: now,
            origin: position,
            hold_confirmed: false,
            swiped: false,
        });
        self.ledger.mark();
        vec![
            SurfaceAction::Pause,
            SurfaceAction::ScheduleHold {
                press: id,
                delay: self.settings.hold_confirm,
            },
        ]
    }

    fn moved(&mut self, kind: PointerKind, position: Position) -> Vec<SurfaceAction> {
        let swipes = self.swipes_enabled(kind);
        let threshold = self.settings.swipe_threshold;
        let Some(press) = self.press.as_mut().filter(|p| p.kind == kind) else {
            return Vec::new();
        };
        if press.swiped || !swipes {
            return Vec::new();
        }
        if is_swipe(press.origin, position, threshold) {
            press.swiped = true;
            return vec![SurfaceAction::CancelHold];
        }
        Vec::new()
    }

    fn release(&mut self, now: Duration, kind: PointerKind, position: Position) -> Vec<SurfaceAction> {
        if self.press.is_some_and(|p| p.kind != kind) {
            return Vec::new();
        }
        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        if kind == PointerKind::Touch {
            self.touch_guard_until = Some(now + self.settings.touch_guard);
        }

        let swiped = press.swiped
            || (self.swipes_enabled(kind)
                && is_swipe(press.origin, position, self.settings.swipe_threshold));
        if swiped {
            let direction = if position.x < press.origin.x {
                Direction::Next
            } else {
                Direction::Previous
            };
            self.ledger.mark();
            return vec![
                SurfaceAction::CancelHold,
                SurfaceAction::Resume,
                SurfaceAction::Navigate(direction),
            ];
        }

        let elapsed = now.saturating_sub(press.started_at);
        if !press.hold_confirmed && elapsed < self.settings.hold_confirm {
            let direction = if press.origin.x < self.width / 2.0 {
                Direction::Previous
            } else {
                Direction::Next
            };
            self.ledger.mark();
            vec![
                SurfaceAction::CancelHold,
                SurfaceAction::Resume,
                SurfaceAction::Navigate(direction),
            ]
        } else {
            // Hold released: stay paused, no navigation for this gesture.
            vec![SurfaceAction::CancelHold]
        }
    }

    fn cancel(&mut self, now: Duration, kind: PointerKind) -> Vec<SurfaceAction> {
        if self.press.is_some_and(|p| p.kind != kind) {
            return Vec::new();
        }
        let Some(_press) = self.press.take() else {
            return Vec::new();
        };
        if kind == PointerKind::Touch {
            self.touch_guard_until = Some(now + self.settings.touch_guard);
        }
        vec![SurfaceAction::CancelHold, SurfaceAction::Resume]
    }

    fn hold_elapsed(&mut self, id: PressId) -> Vec<SurfaceAction> {
        match self.press.as_mut() {
            Some(press) if press.id == id && !press.swiped && !press.hold_confirmed => {
                press.hold_confirmed = true;
                vec![SurfaceAction::HoldConfirmed]
            }
            _ => Vec::new(),
        }
    }

    fn swipes_enabled(&self, kind: PointerKind) -> bool {
        kind == PointerKind::Touch || self.settings.swipe_with_mouse
    }

    fn in_touch_guard(&self, now: Duration) -> bool {
        self.touch_guard_until.is_some_and(|until| now < until)
    }
}

fn is_swipe(origin: Position, position: Position, threshold: f32) -> bool {
    let dx = position.x - origin.x;
    let dy = position.y - origin.y;
    dx.abs() >= threshold && dx.abs() > dy.abs()
}
