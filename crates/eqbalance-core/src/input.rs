//! Pointer input filtering.
//!
//! Hosts may forward every pointer event they see. Only the primary (left)
//! button drives gestures; [`InputState`] turns the raw stream into gesture
//! input and drops everything else.

use crate::element::ElementId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// `element` is the host handle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        element: ElementId,
        position: Point,
        button: MouseButton,
    },
    Drag {
        element: ElementId,
        position: Point,
    },
    Up {
        element: ElementId,
        position: Point,
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn element(&self) -> ElementId {
        match *self {
            Self::Down { element, .. } | Self::Drag { element, .. } | Self::Up { element, .. } => element,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            Self::Down { position, .. } | Self::Drag { position, .. } | Self::Up { position, .. } => {
                position
            }
        }
    }
}

/// A pointer event that drives the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    Press { element: ElementId, position: Point },
    Drag { element: ElementId, position: Point },
    Release { element: ElementId, position: Point },
}

/// Tracks pressed buttons and the current drag.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    /// Whether the primary button is held.
    pub is_dragging: bool,
    /// Where the current drag started.
    pub drag_start: Option<Point>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event, returning the gesture input it produces.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<GestureInput> {
        self.pointer_position = event.position();
        match event {
            PointerEvent::Down {
                element,
                position,
                button,
            } => {
                self.pressed_buttons.insert(button);
                if button != MouseButton::Left || self.is_dragging {
                    return None;
                }
                self.is_dragging = true;
                self.drag_start = Some(position);
                Some(GestureInput::Press { element, position })
            }
            PointerEvent::Drag { element, position } => self
                .is_dragging
                .then_some(GestureInput::Drag { element, position }),
            PointerEvent::Up {
                element,
                position,
                button,
            } => {
                self.pressed_buttons.remove(&button);
                if button != MouseButton::Left || !self.is_dragging {
                    return None;
                }
                self.is_dragging = false;
                self.drag_start = None;
                Some(GestureInput::Release { element, position })
            }
        }
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Get the drag delta from start position, if dragging.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_left_button_drives_gesture() {
        let mut input = InputState::new();
        let element = Uuid::new_v4();

        let press = input.handle_pointer_event(PointerEvent::Down {
            element,
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert_eq!(
            press,
            Some(GestureInput::Press {
                element,
                position: Point::new(100.0, 100.0)
            })
        );
        assert!(input.is_button_pressed(MouseButton::Left));

        let drag = input.handle_pointer_event(PointerEvent::Drag {
            element,
            position: Point::new(150.0, 120.0),
        });
        assert!(matches!(drag, Some(GestureInput::Drag { .. })));
        let delta = input.drag_delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);

        let release = input.handle_pointer_event(PointerEvent::Up {
            element,
            position: Point::new(150.0, 120.0),
            button: MouseButton::Left,
        });
        assert!(matches!(release, Some(GestureInput::Release { .. })));
        assert!(!input.is_dragging);
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut input = InputState::new();
        let element = Uuid::new_v4();

        let press = input.handle_pointer_event(PointerEvent::Down {
            element,
            position: Point::ZERO,
            button: MouseButton::Right,
        });
        assert!(press.is_none());
        assert!(input.is_button_pressed(MouseButton::Right));

        // Moving without the primary button held is a hover, not a drag.
        let drag = input.handle_pointer_event(PointerEvent::Drag {
            element,
            position: Point::new(5.0, 5.0),
        });
        assert!(drag.is_none());

        let release = input.handle_pointer_event(PointerEvent::Up {
            element,
            position: Point::ZERO,
            button: MouseButton::Right,
        });
        assert!(release.is_none());
    }

    #[test]
    fn test_pointer_event_serde() {
        let event = PointerEvent::Drag {
            element: Uuid::new_v4(),
            position: Point::new(1.0, 2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.position(), Point::new(1.0, 2.0));
    }
}
