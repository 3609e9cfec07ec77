//! EqBalance Core Library
//!
//! Interaction core of an equation balancing manipulator: exact fractions,
//! terms, two-sided layout, overlap hit testing, the drag gesture state
//! machine and the snapshot history. Rendering is delegated to the host
//! through the [`VisualElement`] capability.

pub mod board;
pub mod config;
pub mod cursor;
pub mod element;
pub mod equation;
pub mod fraction;
pub mod generate;
pub mod gesture;
pub mod history;
pub mod input;
pub mod layout;
pub mod overlap;
pub mod snapshot;
pub mod term;
pub mod tween;

#[cfg(test)]
mod testing;

pub use board::Board;
pub use config::{ConfigError, ConfigResult, EquationConfig, LayoutSettings, ValueRange};
pub use element::{ElementContent, ElementFactory, ElementId, Scene, VisualElement};
pub use equation::Equation;
pub use fraction::{Fraction, FractionError, FractionResult};
pub use generate::{EquationError, EquationResult, EquationSpec, TermSpec, generate};
pub use gesture::{GesturePhase, MoveKind, Mover};
pub use history::{History, MAX_HISTORY_DEPTH};
pub use input::{GestureInput, InputState, MouseButton, PointerEvent};
pub use layout::{CursorSlot, Layout};
pub use snapshot::{Side, Snapshot, TermState};
pub use term::{SignGlyph, Term, TermId, TermKind, ValueText};
