//! Gesture scripts.
//!
//! A script is a JSON document listing pointer actions:
//!
//! ```json
//! {
//!   "equation": {
//!     "lhs": [{ "variable": "x", "value": { "num": 3, "den": 1 } }],
//!     "rhs": [{ "value": { "num": 6, "den": 1 } }]
//!   },
//!   "steps": [
//!     { "action": "press", "side": "lhs", "term": 0 },
//!     { "action": "drag_to", "x": 40.0, "y": -60.0 },
//!     { "action": "wait", "seconds": 0.1 },
//!     { "action": "release" },
//!     { "action": "print" }
//!   ]
//! }
//! ```
//!
//! Every step is followed by one frame tick.

use crate::error::{AppError, AppResult};
use eqbalance_core::{ElementId, Equation, EquationSpec, MouseButton, PointerEvent, Side};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default frame duration in seconds.
pub const FRAME_TIME: f64 = 1.0 / 60.0;

/// Ticks run after the last step so animations come to rest.
const SETTLE_FRAMES: usize = 600;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Press on an element of the `term`-th term of `side`.
    /// `part` 0 is the value element, 1 the variable symbol.
    Press {
        side: Side,
        term: usize,
        #[serde(default)]
        part: usize,
    },
    /// Move the pointer to an absolute position.
    DragTo { x: f64, y: f64 },
    /// Move the pointer onto the value element of a term.
    DragOver { side: Side, term: usize },
    Release,
    /// Run frames for a while.
    Wait { seconds: f64 },
    /// Draw the equation.
    Print,
}

/// A scripted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Equation to start from. A random one is generated when absent.
    pub equation: Option<EquationSpec>,
    /// Seconds per frame.
    pub frame_time: f64,
    pub steps: Vec<Step>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            equation: None,
            frame_time: FRAME_TIME,
            steps: Vec::new(),
        }
    }
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let script: Script = serde_json::from_str(json)?;
        if !(script.frame_time > 0.0) || !script.frame_time.is_finite() {
            return Err(AppError::Script(format!(
                "frame_time must be positive, got {}",
                script.frame_time
            )));
        }
        Ok(script)
    }

    /// Run every step against `equation`. `print` is called for each
    /// [`Step::Print`].
    pub fn run(&self, equation: &mut Equation, mut print: impl FnMut(&Equation) -> AppResult<()>) -> AppResult<()> {
        let mut pointer = Pointer::default();
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("step {index}: {step:?}");
            match step {
                Step::Press { side, term, part } => {
                    let element = element_of(equation, *side, *term, *part)?;
                    let position = center_of(equation, element)?;
                    pointer = Pointer {
                        element: Some(element),
                        position,
                    };
                    let started = equation.handle_pointer_event(PointerEvent::Down {
                        element,
                        position,
                        button: MouseButton::Left,
                    });
                    if !started {
                        log::warn!("step {index}: press did not start a gesture");
                    }
                }
                Step::DragTo { x, y } => {
                    pointer.position = Point::new(*x, *y);
                    pointer.drag(equation);
                }
                Step::DragOver { side, term } => {
                    let target = element_of(equation, *side, *term, 0)?;
                    pointer.position = center_of(equation, target)?;
                    pointer.drag(equation);
                }
                Step::Release => {
                    if let Some(element) = pointer.element.take() {
                        equation.handle_pointer_event(PointerEvent::Up {
                            element,
                            position: pointer.position,
                            button: MouseButton::Left,
                        });
                    } else {
                        log::warn!("step {index}: release without a press");
                    }
                }
                Step::Wait { seconds } => {
                    let frames = (seconds.max(0.0) / self.frame_time).ceil() as usize;
                    for _ in 0..frames {
                        equation.tick(self.frame_time);
                    }
                }
                Step::Print => {
                    settle(equation, self.frame_time);
                    print(equation)?;
                }
            }
            equation.tick(self.frame_time);
        }
        settle(equation, self.frame_time);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Pointer {
    element: Option<ElementId>,
    position: Point,
}

impl Pointer {
    fn drag(&self, equation: &mut Equation) {
        if let Some(element) = self.element {
            equation.handle_pointer_event(PointerEvent::Drag {
                element,
                position: self.position,
            });
        }
    }
}

/// Tick until animations stop, bounded so a script always terminates.
fn settle(equation: &mut Equation, frame_time: f64) {
    for _ in 0..SETTLE_FRAMES {
        if !equation.is_animating() {
            break;
        }
        equation.tick(frame_time);
    }
}

fn element_of(equation: &Equation, side: Side, term: usize, part: usize) -> AppResult<ElementId> {
    let id = equation
        .terms_on(side)
        .get(term)
        .map(|t| t.id())
        .ok_or_else(|| AppError::Script(format!("no term {term} on {side:?}")))?;
    equation
        .elements_of(id)
        .get(part)
        .copied()
        .ok_or_else(|| AppError::Script(format!("term {term} on {side:?} has no part {part}")))
}

fn center_of(equation: &Equation, element: ElementId) -> AppResult<Point> {
    equation
        .element(element)
        .map(|e| e.position())
        .ok_or_else(|| AppError::Script(format!("element {element} is not in the scene")))
}
