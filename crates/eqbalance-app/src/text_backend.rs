//! Monospace text backend for the visual element capability.
//!
//! Every element is a run of fixed-width cells. The backend keeps the state
//! of all elements in a shared table so the app can draw the scene as plain
//! text rows.

use eqbalance_core::{ElementContent, ElementFactory, ElementId, VisualElement};
use kurbo::{Point, Size};
use peniko::Color;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Width of one character cell.
pub const CELL_WIDTH: f64 = 8.0;
/// Height of one text row.
pub const ROW_HEIGHT: f64 = 16.0;
/// Elements with a lower alpha are not drawn.
const VISIBLE_ALPHA: f64 = 0.5;

#[derive(Debug, Clone)]
struct TextCell {
    text: String,
    position: Point,
    active: bool,
    alpha: f64,
    highlight: bool,
}

type Cells = Rc<RefCell<HashMap<ElementId, TextCell>>>;

/// Creates [`TextElement`]s and renders them.
#[derive(Clone, Default)]
pub struct TextFactory {
    cells: Cells,
}

impl TextFactory {
    /// Create a new factory with no elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements that have not been destroyed.
    pub fn live_elements(&self) -> usize {
        self.cells.borrow().len()
    }

    /// Text currently shown by an element.
    pub fn text(&self, id: ElementId) -> Option<String> {
        self.cells.borrow().get(&id).map(|c| c.text.clone())
    }

    /// Draw all visible elements as text rows, top to bottom.
    ///
    /// Columns are relative to the equals glyph at x = 0. Highlighted
    /// elements are wrapped in brackets.
    pub fn render(&self) -> Vec<String> {
        let cells = self.cells.borrow();
        let mut visible: Vec<(i64, i64, String)> = cells
            .values()
            .filter(|c| c.active && c.alpha >= VISIBLE_ALPHA && !c.text.is_empty())
            .map(|c| {
                let width = c.text.chars().count() as f64 * CELL_WIDTH;
                let column = ((c.position.x - width / 2.0) / CELL_WIDTH + 1e-6).floor() as i64;
                let row = (c.position.y / ROW_HEIGHT).round() as i64;
                let text = if c.highlight {
                    format!("[{}]", c.text.trim())
                } else {
                    c.text.clone()
                };
                (row, column, text)
            })
            .collect();
        if visible.is_empty() {
            return Vec::new();
        }
        visible.sort();

        let origin = visible.iter().map(|(_, col, _)| *col).min().unwrap_or(0);
        let mut rows: Vec<(i64, Vec<char>)> = Vec::new();
        for (row, column, text) in visible {
            if rows.last().is_none_or(|(r, _)| *r != row) {
                rows.push((row, Vec::new()));
            }
            let Some((_, line)) = rows.last_mut() else {
                continue;
            };
            let start = (column - origin).max(0) as usize;
            for (i, ch) in text.chars().enumerate() {
                let at = start + i;
                if line.len() <= at {
                    line.resize(at + 1, ' ');
                }
                line[at] = ch;
            }
        }
        rows.into_iter()
            .map(|(_, line)| line.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}

impl ElementFactory for TextFactory {
    fn create(&mut self, id: ElementId, content: &ElementContent) -> Box<dyn VisualElement> {
        self.cells.borrow_mut().insert(
            id,
            TextCell {
                text: content.to_string(),
                position: Point::ZERO,
                active: true,
                alpha: 1.0,
                highlight: false,
            },
        );
        Box::new(TextElement {
            id,
            cells: self.cells.clone(),
            size: measure(&content.to_string()),
        })
    }
}

fn measure(text: &str) -> Size {
    Size::new(text.chars().count().max(1) as f64 * CELL_WIDTH, ROW_HEIGHT)
}

/// One element of the text backend.
pub struct TextElement {
    id: ElementId,
    cells: Cells,
    size: Size,
}

impl TextElement {
    fn update(&self, f: impl FnOnce(&mut TextCell)) {
        if let Some(cell) = self.cells.borrow_mut().get_mut(&self.id) {
            f(cell);
        }
    }
}

impl VisualElement for TextElement {
    fn bounds(&self) -> Size {
        self.size
    }

    fn position(&self) -> Point {
        self.cells
            .borrow()
            .get(&self.id)
            .map(|c| c.position)
            .unwrap_or(Point::ZERO)
    }

    fn set_position(&mut self, position: Point) {
        self.update(|c| c.position = position);
    }

    fn set_active(&mut self, active: bool) {
        self.update(|c| c.active = active);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.update(|c| c.alpha = alpha);
    }

    fn set_background_highlight(&mut self, color: Option<Color>) {
        self.update(|c| c.highlight = color.is_some());
    }

    fn contains(&self, handle: ElementId) -> bool {
        handle == self.id
    }

    fn set_content(&mut self, content: &ElementContent) {
        let text = content.to_string();
        self.size = measure(&text);
        self.update(|c| c.text = text);
    }

    fn destroy(&mut self) {
        self.cells.borrow_mut().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqbalance_core::{EquationConfig, Equation, Fraction, Term};

    #[test]
    fn test_measures_cells() {
        let mut factory = TextFactory::new();
        let id = uuid_like();
        let mut element = factory.create(id, &ElementContent::Equals);
        assert!((element.bounds().width - 3.0 * CELL_WIDTH).abs() < f64::EPSILON);

        element.set_content(&ElementContent::Symbol("x".into()));
        assert!((element.bounds().width - CELL_WIDTH).abs() < f64::EPSILON);
        assert_eq!(factory.text(id).as_deref(), Some("x"));

        element.destroy();
        assert_eq!(factory.live_elements(), 0);
    }

    #[test]
    fn test_renders_equation_row() {
        let factory = TextFactory::new();
        let mut equation = Equation::new(Box::new(factory.clone()), EquationConfig::default()).unwrap();
        equation.spawn_terms(
            vec![
                Term::variable("x", Fraction::from_integer(3)),
                Term::constant(Fraction::from_integer(2)),
            ],
            vec![Term::constant(Fraction::from_integer(-5))],
        );

        assert_eq!(factory.render(), vec!["3x + 2 = -5".to_string()]);
    }

    fn uuid_like() -> ElementId {
        ElementId::from_u128(0x1234)
    }
}
