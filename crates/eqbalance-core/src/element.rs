//! Visual element capability.
//!
//! The core never draws or measures anything itself. Every on-screen piece of
//! the equation (a constant, a coefficient, a variable symbol, the equals
//! glyph, the insertion cursor) is a host-provided [`VisualElement`] created
//! through an [`ElementFactory`] and owned by the [`Scene`].

use crate::term::ValueText;
use kurbo::{Point, Rect, Size};
use peniko::Color;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for visual elements. Hosts report pointer events with it.
pub type ElementId = Uuid;

/// What an element displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    /// A constant or a variable coefficient.
    Value(ValueText),
    /// A variable symbol.
    Symbol(String),
    /// The equals glyph at the pivot.
    Equals,
    /// The insertion cursor.
    Cursor,
}

impl fmt::Display for ElementContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementContent::Value(text) => write!(f, "{text}"),
            ElementContent::Symbol(name) => f.write_str(name),
            ElementContent::Equals => f.write_str(" = "),
            ElementContent::Cursor => f.write_str("|"),
        }
    }
}

/// A host-side visual element.
///
/// Positions are element centres in equation space; the equals glyph sits at
/// the origin.
pub trait VisualElement {
    /// Measured size of the element's current content.
    fn bounds(&self) -> Size;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    fn set_active(&mut self, active: bool);

    /// Text opacity in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f64);

    fn set_background_highlight(&mut self, color: Option<Color>);

    /// Whether `handle` is this element or one of its host-side parts.
    fn contains(&self, handle: ElementId) -> bool;

    /// Replace the displayed content. Implementations re-measure `bounds`.
    fn set_content(&mut self, content: &ElementContent);

    fn destroy(&mut self);

    /// Axis-aligned rectangle around the current position.
    fn rect(&self) -> Rect {
        Rect::from_center_size(self.position(), self.bounds())
    }
}

/// Creates host elements on demand.
pub trait ElementFactory {
    fn create(&mut self, id: ElementId, content: &ElementContent) -> Box<dyn VisualElement>;
}

/// Owns every live visual element.
pub struct Scene {
    elements: HashMap<ElementId, Box<dyn VisualElement>>,
    factory: Box<dyn ElementFactory>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl Scene {
    /// Create an empty scene backed by `factory`.
    pub fn new(factory: Box<dyn ElementFactory>) -> Self {
        Self {
            elements: HashMap::new(),
            factory,
        }
    }

    /// Ask the host for a new element showing `content`.
    pub fn spawn(&mut self, content: &ElementContent) -> ElementId {
        let id = Uuid::new_v4();
        let element = self.factory.create(id, content);
        self.elements.insert(id, element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&dyn VisualElement> {
        self.elements.get(&id).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut (dyn VisualElement + 'static)> {
        self.elements.get_mut(&id).map(|e| e.as_mut())
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Map a host handle to the element that owns it.
    pub fn resolve(&self, handle: ElementId) -> Option<ElementId> {
        if self.elements.contains_key(&handle) {
            return Some(handle);
        }
        self.elements
            .iter()
            .find(|(_, element)| element.contains(handle))
            .map(|(&id, _)| id)
    }

    pub fn position(&self, id: ElementId) -> Option<Point> {
        self.get(id).map(|e| e.position())
    }

    pub fn bounds(&self, id: ElementId) -> Size {
        self.get(id).map(|e| e.bounds()).unwrap_or(Size::ZERO)
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|e| e.rect())
    }

    pub fn set_position(&mut self, id: ElementId, position: Point) {
        if let Some(element) = self.get_mut(id) {
            element.set_position(position);
        }
    }

    pub fn set_alpha(&mut self, id: ElementId, alpha: f64) {
        if let Some(element) = self.get_mut(id) {
            element.set_alpha(alpha.clamp(0.0, 1.0));
        }
    }

    pub fn set_active(&mut self, id: ElementId, active: bool) {
        if let Some(element) = self.get_mut(id) {
            element.set_active(active);
        }
    }

    pub fn set_highlight(&mut self, id: ElementId, color: Option<Color>) {
        if let Some(element) = self.get_mut(id) {
            element.set_background_highlight(color);
        }
    }

    pub fn set_content(&mut self, id: ElementId, content: &ElementContent) {
        if let Some(element) = self.get_mut(id) {
            element.set_content(content);
        }
    }

    /// Destroy an element and forget it.
    pub fn destroy(&mut self, id: ElementId) {
        if let Some(mut element) = self.elements.remove(&id) {
            element.set_active(false);
            element.destroy();
        }
    }

    /// Destroy every element.
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.destroy(id);
        }
    }

    /// Identifiers of every live element, in no particular order.
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFactory;

    #[test]
    fn test_spawn_and_resolve() {
        let factory = MockFactory::new();
        let mut scene = Scene::new(Box::new(factory.clone()));

        let id = scene.spawn(&ElementContent::Symbol("x".to_string()));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.resolve(id), Some(id));
        assert_eq!(scene.resolve(Uuid::new_v4()), None);

        let child = factory.child_handle(id);
        assert_eq!(scene.resolve(child), Some(id));
    }

    #[test]
    fn test_rect_is_centered() {
        let factory = MockFactory::new();
        let mut scene = Scene::new(Box::new(factory));
        let id = scene.spawn(&ElementContent::Symbol("x".to_string()));
        scene.set_position(id, Point::new(100.0, 0.0));

        let rect = scene.rect(id).unwrap();
        let size = scene.bounds(id);
        assert!((rect.center().x - 100.0).abs() < f64::EPSILON);
        assert!((rect.width() - size.width).abs() < f64::EPSILON);
    }

    #[test]
    fn test_destroy_deactivates() {
        let factory = MockFactory::new();
        let mut scene = Scene::new(Box::new(factory.clone()));
        let id = scene.spawn(&ElementContent::Equals);

        scene.destroy(id);
        assert!(scene.is_empty());
        let state = factory.state(id);
        assert!(state.destroyed);
        assert!(!state.active);
    }

    #[test]
    fn test_content_display() {
        assert_eq!(ElementContent::Equals.to_string(), " = ");
        assert_eq!(ElementContent::Cursor.to_string(), "|");
        assert_eq!(ElementContent::Symbol("y".into()).to_string(), "y");
    }
}
