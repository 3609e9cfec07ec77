//! The equation controller: the host-facing API.

use crate::board::Board;
use crate::config::EquationConfig;
use crate::element::{ElementFactory, ElementId, VisualElement};
use crate::generate::{EquationResult, EquationSpec, generate};
use crate::gesture::{GesturePhase, Mover};
use crate::input::{GestureInput, InputState, PointerEvent};
use crate::layout::CursorSlot;
use crate::snapshot::Side;
use crate::term::{Term, TermId};
use kurbo::Point;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fmt;

/// An interactive equation.
///
/// The host forwards pointer events and calls [`Equation::tick`] once per
/// frame. Every state change happens inside those calls.
#[derive(Debug)]
pub struct Equation {
    board: Board,
    config: EquationConfig,
    gesture: Option<Mover>,
    input: InputState,
    rng: SmallRng,
}

impl Equation {
    /// Create an empty equation whose elements are produced by `factory`.
    pub fn new(factory: Box<dyn ElementFactory>, config: EquationConfig) -> EquationResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self {
            board: Board::new(factory, config.layout.clone()),
            config,
            gesture: None,
            input: InputState::new(),
            rng,
        })
    }

    /// Generate and display a random equation.
    ///
    /// A seed different from the current one reseeds the generator, so the
    /// same config spawns the same sequence of equations.
    pub fn spawn_equation(&mut self, config: &EquationConfig) -> EquationResult<()> {
        config.validate()?;
        if let Some(seed) = config.seed.filter(|&seed| self.config.seed != Some(seed)) {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        let spec = generate(config, &mut self.rng)?;
        self.config = config.clone();
        self.board.set_settings(config.layout.clone());
        self.spawn_spec(&spec);
        Ok(())
    }

    /// Display a fixed equation.
    pub fn spawn_spec(&mut self, spec: &EquationSpec) {
        let lhs = spec.lhs.iter().map(|t| t.to_term()).collect();
        let rhs = spec.rhs.iter().map(|t| t.to_term()).collect();
        self.spawn_terms(lhs, rhs);
    }

    /// Display the given terms. An empty side gets a zero constant.
    pub fn spawn_terms(&mut self, lhs: Vec<Term>, rhs: Vec<Term>) {
        self.gesture = None;
        self.input = InputState::new();
        self.board.populate(lhs, rhs);
        log::info!("spawned {self}");
    }

    /// Remove the equation.
    pub fn clear(&mut self) {
        self.gesture = None;
        self.input = InputState::new();
        self.board.clear();
    }

    /// Start a gesture on `element`. Returns false if a gesture is already
    /// active or the element is not part of a term.
    pub fn pointer_down(&mut self, element: ElementId, position: Point) -> bool {
        if self.gesture.is_some() {
            log::warn!("pointer down ignored: a gesture is already active");
            return false;
        }
        self.board.finish_tween();
        match Mover::begin(&self.board, element, position, self.config.lock_variable_terms) {
            Some(mover) => {
                self.gesture = Some(mover);
                true
            }
            None => {
                log::debug!("pointer down on {element} hit no term");
                false
            }
        }
    }

    /// Move the active gesture. Returns false if there is none.
    pub fn pointer_drag(&mut self, _element: ElementId, position: Point) -> bool {
        match self.gesture.as_mut() {
            Some(mover) => {
                mover.drag(&mut self.board, position);
                true
            }
            None => false,
        }
    }

    /// Release the active gesture. Returns false if there is none.
    pub fn pointer_up(&mut self, _element: ElementId, position: Point) -> bool {
        let Some(mut mover) = self.gesture.take() else {
            return false;
        };
        mover.drag(&mut self.board, position);
        if mover.release(&mut self.board) {
            log::info!("equation is now {self}");
        }
        log::debug!("gesture ended: {}", mover.phase());
        true
    }

    /// Feed a raw pointer event. Only the primary button drives gestures.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match self.input.handle_pointer_event(event) {
            Some(GestureInput::Press { element, position }) => self.pointer_down(element, position),
            Some(GestureInput::Drag { element, position }) => self.pointer_drag(element, position),
            Some(GestureInput::Release { element, position }) => self.pointer_up(element, position),
            None => false,
        }
    }

    /// Advance the gesture by at most one transition, then the animations.
    pub fn tick(&mut self, dt: f64) {
        if let Some(mover) = self.gesture.as_mut() {
            mover.tick(&mut self.board);
        }
        self.board.tick(dt);
    }

    pub fn config(&self) -> &EquationConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn gesture(&self) -> Option<&Mover> {
        self.gesture.as_ref()
    }

    /// Phase of the active gesture.
    pub fn phase(&self) -> Option<GesturePhase> {
        self.gesture.as_ref().map(|m| m.phase())
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.board.term(id)
    }

    /// Terms of the live equation on one side, left to right.
    pub fn terms_on(&self, side: Side) -> Vec<&Term> {
        self.board
            .live()
            .groups_on(side)
            .iter()
            .filter_map(|g| self.board.term(g.term))
            .collect()
    }

    pub fn terms_lhs(&self) -> Vec<&Term> {
        self.terms_on(Side::Lhs)
    }

    pub fn terms_rhs(&self) -> Vec<&Term> {
        self.terms_on(Side::Rhs)
    }

    /// Elements of a term in the live equation, value element first.
    pub fn elements_of(&self, term: TermId) -> Vec<ElementId> {
        self.board
            .live()
            .states_of(term)
            .iter()
            .map(|s| s.element)
            .collect()
    }

    pub fn history_depth(&self) -> usize {
        self.board.history().depth()
    }

    pub fn cursor_slots(&self) -> &[CursorSlot] {
        &self.board.layout().cursor_slots
    }

    pub fn element(&self, id: ElementId) -> Option<&dyn VisualElement> {
        self.board.scene().get(id)
    }

    pub fn is_animating(&self) -> bool {
        self.board.is_animating()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.board.render_text())
    }
}
