//! Blinking insertion cursor.

use crate::element::{ElementId, Scene};
use kurbo::Point;

/// Insertion caret shown at the nearest drop slot while a term is dragged.
#[derive(Debug, Clone)]
pub struct Cursor {
    element: ElementId,
    visible: bool,
    lit: bool,
    elapsed: f64,
    on_time: f64,
    off_time: f64,
    position: Option<Point>,
}

impl Cursor {
    /// Create a hidden cursor backed by `element`.
    pub fn new(element: ElementId, on_time: f64, off_time: f64) -> Self {
        Self {
            element,
            visible: false,
            lit: false,
            elapsed: 0.0,
            on_time,
            off_time,
            position: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the caret is in the lit half of its blink cycle.
    pub fn is_lit(&self) -> bool {
        self.visible && self.lit
    }

    pub fn position(&self) -> Option<Point> {
        self.position.filter(|_| self.visible)
    }

    /// Show the cursor at `position`. Moving a visible cursor does not restart
    /// its blink cycle.
    pub fn show(&mut self, scene: &mut Scene, position: Point) {
        if !self.visible {
            self.visible = true;
            self.lit = true;
            self.elapsed = 0.0;
            scene.set_active(self.element, true);
            scene.set_alpha(self.element, 1.0);
        }
        if self.position != Some(position) {
            self.position = Some(position);
            scene.set_position(self.element, position);
        }
    }

    pub fn hide(&mut self, scene: &mut Scene) {
        if self.visible {
            self.visible = false;
            self.position = None;
            scene.set_active(self.element, false);
        }
    }

    /// Advance the blink cycle.
    pub fn tick(&mut self, scene: &mut Scene, dt: f64) {
        if !self.visible {
            return;
        }
        self.elapsed += dt.max(0.0);
        loop {
            let phase = if self.lit { self.on_time } else { self.off_time };
            if self.elapsed < phase {
                break;
            }
            self.elapsed -= phase;
            self.lit = !self.lit;
        }
        scene.set_alpha(self.element, if self.lit { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementContent;
    use crate::testing::MockFactory;

    fn setup() -> (MockFactory, Scene, Cursor) {
        let factory = MockFactory::new();
        let mut scene = Scene::new(Box::new(factory.clone()));
        let element = scene.spawn(&ElementContent::Cursor);
        scene.set_active(element, false);
        (factory, scene, Cursor::new(element, 0.6, 0.5))
    }

    #[test]
    fn test_blink_cycle() {
        let (factory, mut scene, mut cursor) = setup();
        cursor.show(&mut scene, Point::new(15.0, 0.0));
        assert!(factory.state(cursor.element()).active);
        assert!(cursor.is_lit());

        cursor.tick(&mut scene, 0.5);
        assert!(cursor.is_lit());
        cursor.tick(&mut scene, 0.2);
        assert!(!cursor.is_lit());
        assert!(factory.state(cursor.element()).alpha.abs() < f64::EPSILON);

        cursor.tick(&mut scene, 0.5);
        assert!(cursor.is_lit());
        assert!((factory.state(cursor.element()).alpha - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hide() {
        let (factory, mut scene, mut cursor) = setup();
        cursor.show(&mut scene, Point::new(-15.0, 0.0));
        assert_eq!(cursor.position(), Some(Point::new(-15.0, 0.0)));
        assert_eq!(factory.state(cursor.element()).position, Point::new(-15.0, 0.0));

        cursor.hide(&mut scene);
        assert!(!cursor.is_visible());
        assert!(cursor.position().is_none());
        assert!(!factory.state(cursor.element()).active);

        // Ticking a hidden cursor does nothing.
        cursor.tick(&mut scene, 10.0);
        assert!(!cursor.is_lit());
    }
}
