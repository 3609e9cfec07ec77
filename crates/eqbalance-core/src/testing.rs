//! Test doubles for the visual element capability.

use crate::element::{ElementContent, ElementFactory, ElementId, VisualElement};
use kurbo::{Point, Size};
use peniko::Color;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

/// Width of one character in the mock font.
pub const CHAR_WIDTH: f64 = 10.0;
/// Height of every mock element.
pub const LINE_HEIGHT: f64 = 20.0;

/// Observable state of a mock element.
#[derive(Debug, Clone)]
pub struct MockState {
    pub text: String,
    pub position: Point,
    pub active: bool,
    pub alpha: f64,
    pub highlighted: bool,
    pub destroyed: bool,
    pub child: ElementId,
}

type Shared = Rc<RefCell<HashMap<ElementId, MockState>>>;

/// Factory whose elements measure `CHAR_WIDTH` per character and record every
/// call in a shared table the test can inspect.
#[derive(Clone, Default)]
pub struct MockFactory {
    states: Shared,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: ElementId) -> MockState {
        self.states.borrow()[&id].clone()
    }

    pub fn text(&self, id: ElementId) -> String {
        self.state(id).text
    }

    /// A host-side handle that belongs to element `id` without being it.
    pub fn child_handle(&self, id: ElementId) -> ElementId {
        self.state(id).child
    }
}

impl ElementFactory for MockFactory {
    fn create(&mut self, id: ElementId, content: &ElementContent) -> Box<dyn VisualElement> {
        self.states.borrow_mut().insert(
            id,
            MockState {
                text: content.to_string(),
                position: Point::ZERO,
                active: true,
                alpha: 1.0,
                highlighted: false,
                destroyed: false,
                child: Uuid::new_v4(),
            },
        );
        Box::new(MockElement {
            id,
            states: self.states.clone(),
        })
    }
}

struct MockElement {
    id: ElementId,
    states: Shared,
}

impl MockElement {
    fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut states = self.states.borrow_mut();
        let state = states.get_mut(&self.id).expect("mock element state");
        f(state)
    }
}

impl VisualElement for MockElement {
    fn bounds(&self) -> Size {
        self.with(|s| Size::new(s.text.chars().count().max(1) as f64 * CHAR_WIDTH, LINE_HEIGHT))
    }

    fn position(&self) -> Point {
        self.with(|s| s.position)
    }

    fn set_position(&mut self, position: Point) {
        self.with(|s| s.position = position);
    }

    fn set_active(&mut self, active: bool) {
        self.with(|s| s.active = active);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.with(|s| s.alpha = alpha);
    }

    fn set_background_highlight(&mut self, color: Option<Color>) {
        self.with(|s| s.highlighted = color.is_some());
    }

    fn contains(&self, handle: ElementId) -> bool {
        self.with(|s| s.child == handle)
    }

    fn set_content(&mut self, content: &ElementContent) {
        let text = content.to_string();
        self.with(|s| s.text = text);
    }

    fn destroy(&mut self) {
        self.with(|s| s.destroyed = true);
    }
}
