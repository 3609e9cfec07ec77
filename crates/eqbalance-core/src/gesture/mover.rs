//! The drag gesture state machine.

use super::state::{GesturePhase, MoveKind};
use crate::board::Board;
use crate::element::ElementId;
use crate::fraction::Fraction;
use crate::layout::CursorSlot;
use crate::overlap;
use crate::snapshot::{Side, TermState};
use crate::term::{Term, TermId};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashSet;

/// One drag interaction, from pointer-down to pointer-up.
#[derive(Debug, Clone)]
pub struct Mover {
    term: TermId,
    grabbed: ElementId,
    kind: MoveKind,
    /// Whether the whole term travels (and may merge into other terms).
    additive: bool,
    /// States lifted out of the equation when the term separates.
    lifted: Vec<TermState>,
    /// Carried elements and their offset from the grabbed element.
    carried: Vec<(ElementId, Vec2)>,
    /// Grabbed element position minus pointer position.
    pointer_offset: Vec2,
    pointer: Point,
    origin: Side,
    /// Grabbed element position at pointer-down.
    grab_point: Point,
    /// Equation body at pointer-down.
    body: Rect,
    /// Term value at pointer-down.
    original: Fraction,
    /// Value displayed while dragging: negated on the opposite side.
    signed: Fraction,
    /// Signed value the current merge preview was computed from.
    previewed: Fraction,
    slot: Option<CursorSlot>,
    phase: GesturePhase,
}

impl Mover {
    /// Start a gesture on the element identified by `handle`.
    ///
    /// Returns `None` when the handle does not belong to a term of the live
    /// equation (the equals glyph, the cursor, a dissolving element).
    pub fn begin(board: &Board, handle: ElementId, pointer: Point, lock_variable_terms: bool) -> Option<Self> {
        let element = board.scene().resolve(handle)?;
        let state = *board.live().state_of(element)?;
        let term = board.term(state.term)?;
        let group = board.live().states_of(state.term);

        let kind = if term.is_constant() {
            MoveKind::Constant
        } else if group.first().map(|s| s.element) == Some(element) {
            MoveKind::Coefficient
        } else {
            MoveKind::Symbol
        };
        let origin = state.side();
        let additive = lock_variable_terms || term.is_constant() || origin == Side::Rhs;
        let lifted = if additive { group } else { vec![state] };

        let grab_point = board.scene().position(element).unwrap_or(state.typeset);
        let carried = lifted
            .iter()
            .map(|s| {
                let at = board.scene().position(s.element).unwrap_or(s.typeset);
                (s.element, at - grab_point)
            })
            .collect();

        log::debug!(
            "grabbed {:?} of term {} ({}), additive: {}",
            kind,
            state.term,
            term.value(),
            additive
        );
        Some(Self {
            term: state.term,
            grabbed: element,
            kind,
            additive,
            lifted,
            carried,
            pointer_offset: grab_point - pointer,
            pointer,
            origin,
            grab_point,
            body: board.body_rect(),
            original: term.value(),
            signed: term.value(),
            previewed: term.value(),
            slot: None,
            phase: GesturePhase::InitialTouch,
        })
    }

    pub fn term(&self) -> TermId {
        self.term
    }

    pub fn grabbed(&self) -> ElementId {
        self.grabbed
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn is_additive(&self) -> bool {
        self.additive
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn origin(&self) -> Side {
        self.origin
    }

    /// Value the dragged term currently displays.
    pub fn signed_value(&self) -> Fraction {
        self.signed
    }

    /// Drop slot the cursor currently marks.
    pub fn slot(&self) -> Option<CursorSlot> {
        self.slot
    }

    /// Where the grabbed element is, following the pointer.
    pub fn grabbed_position(&self) -> Point {
        self.pointer + self.pointer_offset
    }

    /// Side of the equals sign the grabbed element is currently on.
    pub fn current_side(&self) -> Side {
        Side::of(self.grabbed_position().x)
    }

    fn carried_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.carried.iter().map(|(id, _)| *id)
    }

    fn mover_rect(&self, board: &Board) -> Rect {
        board
            .elements_rect(self.carried_ids())
            .unwrap_or_else(|| Rect::from_center_size(self.grabbed_position(), Size::ZERO))
    }

    fn grabbed_rect(&self, board: &Board) -> Rect {
        board
            .scene()
            .rect(self.grabbed)
            .unwrap_or_else(|| Rect::from_center_size(self.grabbed_position(), Size::ZERO))
    }

    /// Follow the pointer.
    pub fn drag(&mut self, board: &mut Board, pointer: Point) {
        if self.phase.is_terminal() {
            return;
        }
        self.pointer = pointer;
        let base = self.grabbed_position();
        for &(element, offset) in &self.carried {
            board.scene_mut().set_position(element, base + offset);
        }
    }

    /// Run at most one state transition.
    pub fn tick(&mut self, board: &mut Board) {
        match self.phase {
            GesturePhase::InitialTouch => {
                if !overlap::overlaps(self.grabbed_rect(board), self.body) {
                    self.separate(board);
                }
            }
            GesturePhase::Separated => {
                self.update_signed(board);
                match self.find_target(board) {
                    Some(target) => self.enter_merge(board, target),
                    None => self.update_cursor(board),
                }
            }
            GesturePhase::MergeCandidate { target, original } => {
                self.update_signed(board);
                if self.find_target(board) != Some(target) {
                    self.leave_merge(board, target, original);
                } else if self.signed != self.previewed && self.preview(board, target, original) {
                    board.relayout();
                }
            }
            GesturePhase::TouchAborted | GesturePhase::Committed | GesturePhase::MergeCommitted => {}
        }
    }

    /// Finish the gesture. Returns true if the committed equation changed.
    pub fn release(&mut self, board: &mut Board) -> bool {
        match self.phase {
            GesturePhase::InitialTouch => {
                self.phase = GesturePhase::TouchAborted;
                log::debug!("touch aborted");
                board.relayout();
                false
            }
            GesturePhase::Separated => self.commit_drop(board),
            GesturePhase::MergeCandidate { target, original } => {
                self.commit_merge(board, target, original)
            }
            phase => {
                log::warn!("release ignored: gesture already {phase}");
                false
            }
        }
    }

    fn separate(&mut self, board: &mut Board) {
        let lifted: HashSet<ElementId> = self.lifted.iter().map(|s| s.element).collect();
        let mut working = board.live().clone();
        working.extract(|s| lifted.contains(&s.element));
        if working.groups_on(self.origin).is_empty() {
            let at = Point::new(self.grab_point.x, 0.0);
            let placeholder = board.spawn_term(Term::constant(Fraction::ZERO), at);
            working.insert_run(&placeholder);
        }
        board.history_mut().push_working(working);
        board.relayout();
        self.phase = GesturePhase::Separated;
        log::debug!("term {} separated", self.term);

        self.update_signed(board);
        self.update_cursor(board);
    }

    fn find_target(&self, board: &Board) -> Option<TermId> {
        let term = board.term(self.term)?;
        overlap::resolve(
            self.mover_rect(board),
            term,
            self.additive,
            board.live(),
            board.terms(),
            board.scene(),
        )
    }

    /// Recompute the signed value from the current side and display it.
    fn update_signed(&mut self, board: &mut Board) {
        if !self.additive {
            return;
        }
        self.signed = if self.current_side() == self.origin {
            self.original
        } else {
            -self.original
        };
        let stale = board.term(self.term).is_some_and(|t| t.shown() != self.signed);
        if stale {
            if let Some(value_element) = self.lifted.first().map(|s| s.element) {
                board.show_value(self.term, value_element, self.signed);
            }
        }
    }

    fn update_cursor(&mut self, board: &mut Board) {
        if !self.additive {
            return;
        }
        self.slot = board
            .layout()
            .nearest_slot(self.grabbed_position(), self.current_side());
        if let Some(slot) = self.slot {
            let (cursor, scene) = board.cursor_and_scene();
            cursor.show(scene, slot.position);
        }
    }

    /// Set the target's previewed value. Detached moves leave it untouched.
    fn preview(&mut self, board: &mut Board, target: TermId, original: Fraction) -> bool {
        if self.additive {
            let merged = match original.checked_add(self.signed) {
                Ok(merged) => merged,
                Err(err) => {
                    log::warn!("cannot merge into term {target}: {err}");
                    return false;
                }
            };
            if let Some(term) = board.term_mut(target) {
                term.set_value(merged);
            }
        }
        self.previewed = self.signed;
        true
    }

    fn set_carried_alpha(&self, board: &mut Board, alpha: f64) {
        for element in self.carried_ids() {
            board.scene_mut().set_alpha(element, alpha);
        }
    }

    fn enter_merge(&mut self, board: &mut Board, target: TermId) {
        let Some(original) = board.term(target).map(|t| t.value()) else {
            return;
        };
        if !self.preview(board, target, original) {
            self.update_cursor(board);
            return;
        }
        board.highlight_term(target, true);
        let alpha = board.settings().merge_alpha;
        self.set_carried_alpha(board, alpha);
        let (cursor, scene) = board.cursor_and_scene();
        cursor.hide(scene);
        self.slot = None;
        board.relayout();
        self.phase = GesturePhase::MergeCandidate { target, original };
        log::debug!("hovering term {target}");
    }

    fn leave_merge(&mut self, board: &mut Board, target: TermId, original: Fraction) {
        if let Some(term) = board.term_mut(target) {
            term.set_value(original);
        }
        board.highlight_term(target, false);
        self.set_carried_alpha(board, 1.0);
        board.relayout();
        self.phase = GesturePhase::Separated;
        log::debug!("left term {target}");
        self.update_cursor(board);
    }

    fn commit_drop(&mut self, board: &mut Board) -> bool {
        self.update_signed(board);
        let side = self.current_side();
        let slot = board.layout().nearest_slot(self.grabbed_position(), side);
        let (cursor, scene) = board.cursor_and_scene();
        cursor.hide(scene);
        self.phase = GesturePhase::Committed;

        let Some(mut working) = board.history_mut().pop_working() else {
            log::warn!("drop without a working snapshot");
            board.relayout();
            return false;
        };
        if !self.additive {
            log::debug!("detached element rejoined term {}", self.term);
            board.relayout();
            return false;
        }

        if let Some(term) = board.term_mut(self.term) {
            term.set_value(self.signed);
        }
        let x = drop_x(slot.map(|s| s.position.x), side);
        let run: Vec<TermState> = self
            .lifted
            .iter()
            .map(|s| TermState::new(s.term, s.element, Point::new(x, 0.0)))
            .collect();
        working.insert_run(&run);
        board.commit(working);
        true
    }

    fn commit_merge(&mut self, board: &mut Board, target: TermId, original: Fraction) -> bool {
        self.update_signed(board);
        if self.signed != self.previewed {
            self.preview(board, target, original);
        }
        board.highlight_term(target, false);
        self.phase = GesturePhase::MergeCommitted;

        let Some(working) = board.history_mut().pop_working() else {
            log::warn!("merge without a working snapshot");
            board.relayout();
            return false;
        };
        if !self.additive {
            self.set_carried_alpha(board, 1.0);
            log::debug!("detached element rejoined term {}", self.term);
            board.relayout();
            return false;
        }

        let alpha = board.settings().merge_alpha;
        board.dissolve(self.lifted.iter().copied(), alpha);
        board.commit(working);
        true
    }
}

/// Insertion x for a drop on `side`, strictly on that side of the pivot.
fn drop_x(slot_x: Option<f64>, side: Side) -> f64 {
    let x = slot_x.unwrap_or(0.0);
    match side {
        Side::Lhs => x.min(-f64::EPSILON),
        Side::Rhs => x.max(f64::EPSILON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutSettings;
    use crate::testing::MockFactory;

    fn int(n: i64) -> Fraction {
        Fraction::from_integer(n)
    }

    fn board_with(lhs: Vec<Term>, rhs: Vec<Term>) -> Board {
        let mut board = Board::new(Box::new(MockFactory::new()), LayoutSettings::default());
        board.populate(lhs, rhs);
        board
    }

    fn element_of(board: &Board, term: TermId, index: usize) -> ElementId {
        board.live().states_of(term)[index].element
    }

    #[test]
    fn test_move_kinds() {
        let x = Term::variable("x", int(3));
        let c = Term::constant(int(2));
        let (x_id, c_id) = (x.id(), c.id());
        let board = board_with(vec![x], vec![c]);

        let coef = element_of(&board, x_id, 0);
        let symbol = element_of(&board, x_id, 1);
        let constant = element_of(&board, c_id, 0);

        let m = Mover::begin(&board, coef, Point::ZERO, true).unwrap();
        assert_eq!(m.kind(), MoveKind::Coefficient);
        let m = Mover::begin(&board, symbol, Point::ZERO, true).unwrap();
        assert_eq!(m.kind(), MoveKind::Symbol);
        let m = Mover::begin(&board, constant, Point::ZERO, true).unwrap();
        assert_eq!(m.kind(), MoveKind::Constant);
        assert!(Mover::begin(&board, board.glyph(), Point::ZERO, true).is_none());
    }

    #[test]
    fn test_additive_predicate() {
        let lx = Term::variable("x", int(3));
        let rx = Term::variable("x", int(-2));
        let (lx_id, rx_id) = (lx.id(), rx.id());
        let board = board_with(vec![lx], vec![rx]);

        let left_coef = element_of(&board, lx_id, 0);
        let right_coef = element_of(&board, rx_id, 0);

        assert!(Mover::begin(&board, left_coef, Point::ZERO, true).unwrap().is_additive());
        assert!(!Mover::begin(&board, left_coef, Point::ZERO, false).unwrap().is_additive());
        assert!(Mover::begin(&board, right_coef, Point::ZERO, false).unwrap().is_additive());
    }

    #[test]
    fn test_pointer_offset_is_kept() {
        let c = Term::constant(int(5));
        let c_id = c.id();
        let mut board = board_with(vec![c], vec![Term::constant(int(1))]);
        let element = element_of(&board, c_id, 0);
        let start = board.scene().position(element).unwrap();

        let mut mover = Mover::begin(&board, element, start + Vec2::new(3.0, 2.0), true).unwrap();
        mover.drag(&mut board, start + Vec2::new(13.0, 42.0));
        let moved = board.scene().position(element).unwrap();
        assert!((moved.x - (start.x + 10.0)).abs() < 1e-9);
        assert!((moved.y - (start.y + 40.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drop_x_stays_on_side() {
        assert!(drop_x(Some(-0.0), Side::Lhs) < 0.0);
        assert!(drop_x(None, Side::Rhs) > 0.0);
        assert!((drop_x(Some(15.0), Side::Rhs) - 15.0).abs() < f64::EPSILON);
    }
}
