use std::time::{Duration, Instant};

use iced::keyboard::{key::Named, Key};
use iced::{Point, Vector};

/// Two presses closer than this are a double click.
const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Weight of the newest sample in the smoothed drag velocity.
const VELOCITY_SMOOTHING: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPage,
    PrevPage,
    RotateClockwise,
    RotateCounterClockwise,
    FitZoom,
    CoverZoom,
    ZoomIn,
    ZoomOut,
    ToggleInfo,
}

pub fn key_action(key: &Key) -> Option<Action> {
    match key.as_ref() {
        Key::Named(Named::Escape) => Some(Action::Quit),
        Key::Named(Named::ArrowRight) => Some(Action::NextPage),
        Key::Named(Named::ArrowLeft) => Some(Action::PrevPage),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "d" => Some(Action::NextPage),
            "a" => Some(Action::PrevPage),
            "q" => Some(Action::RotateCounterClockwise),
            "e" => Some(Action::RotateClockwise),
            "w" => Some(Action::FitZoom),
            "s" => Some(Action::CoverZoom),
            "+" | "=" => Some(Action::ZoomIn),
            "-" => Some(Action::ZoomOut),
            "i" => Some(Action::ToggleInfo),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    DragStart,
    DoubleClick,
}

#[derive(Debug, Clone, Copy)]
struct DragTrack {
    last_at: Instant,
    /// Horizontal velocity in pixels per millisecond.
    velocity: f64,
}

/// Turns raw cursor events into drag deltas, release velocity and double
/// clicks.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Point>,
    drag: Option<DragTrack>,
    last_press: Option<Instant>,
}

impl PointerTracker {
    pub fn pressed(&mut self, now: Instant) -> Press {
        let double = self
            .last_press
            .is_some_and(|last| now.saturating_duration_since(last) < DOUBLE_CLICK);
        if double {
            self.last_press = None;
            self.drag = None;
            return Press::DoubleClick;
        }
        self.last_press = Some(now);
        self.drag = Some(DragTrack {
            last_at: now,
            velocity: 0.0,
        });
        Press::DragStart
    }

    /// Record a cursor move. Returns the motion while a drag is held.
    pub fn moved(&mut self, position: Point, now: Instant) -> Option<Vector> {
        let previous = self.cursor.replace(position);
        let drag = self.drag.as_mut()?;
        let delta = position - previous?;

        let elapsed_ms = now.saturating_duration_since(drag.last_at).as_secs_f64() * 1000.0;
        if elapsed_ms > 0.0 {
            let sample = f64::from(delta.x) / elapsed_ms;
            drag.velocity = VELOCITY_SMOOTHING * sample + (1.0 - VELOCITY_SMOOTHING) * drag.velocity;
        }
        drag.last_at = now;
        Some(delta)
    }

    /// End the drag, returning its horizontal release velocity.
    pub fn released(&mut self) -> Option<f64> {
        self.drag.take().map(|drag| drag.velocity)
    }
}
