//! Equation snapshots: ordered term states split at the pivot.

use crate::element::ElementId;
use crate::term::TermId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Side of the equals sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Lhs,
    Rhs,
}

impl Side {
    /// Side of an x coordinate relative to the pivot.
    pub fn of(x: f64) -> Self {
        if x < 0.0 { Side::Lhs } else { Side::Rhs }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Lhs => Side::Rhs,
            Side::Rhs => Side::Lhs,
        }
    }

    /// -1 for the left side, +1 for the right.
    pub fn direction(self) -> f64 {
        match self {
            Side::Lhs => -1.0,
            Side::Rhs => 1.0,
        }
    }
}

/// One visual element of a term at its typeset position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermState {
    pub term: TermId,
    pub element: ElementId,
    pub typeset: Point,
}

impl TermState {
    pub fn new(term: TermId, element: ElementId, typeset: Point) -> Self {
        Self {
            term,
            element,
            typeset,
        }
    }

    pub fn side(&self) -> Side {
        Side::of(self.typeset.x)
    }
}

/// Consecutive states of one term inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGroup {
    pub term: TermId,
    /// Index range into [`Snapshot::states`].
    pub range: Range<usize>,
}

/// A complete, displayable equation configuration ordered left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    states: Vec<TermState>,
}

impl Snapshot {
    pub const EMPTY: Snapshot = Snapshot { states: Vec::new() };

    pub fn new(states: Vec<TermState>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[TermState] {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut [TermState] {
        &mut self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Group consecutive states that share a term.
    pub fn groups(&self) -> Vec<TermGroup> {
        let mut groups: Vec<TermGroup> = Vec::new();
        for (i, state) in self.states.iter().enumerate() {
            match groups.last_mut() {
                Some(group) if group.term == state.term => group.range.end = i + 1,
                _ => groups.push(TermGroup {
                    term: state.term,
                    range: i..i + 1,
                }),
            }
        }
        groups
    }

    /// Side of a group, judged by its first state.
    pub fn group_side(&self, group: &TermGroup) -> Side {
        self.states[group.range.start].side()
    }

    /// Number of term groups on the left-hand side.
    pub fn pivot(&self) -> usize {
        self.groups()
            .iter()
            .filter(|g| self.group_side(g) == Side::Lhs)
            .count()
    }

    /// Groups on one side, left to right.
    pub fn groups_on(&self, side: Side) -> Vec<TermGroup> {
        self.groups()
            .into_iter()
            .filter(|g| self.group_side(g) == side)
            .collect()
    }

    pub fn contains_term(&self, term: TermId) -> bool {
        self.states.iter().any(|s| s.term == term)
    }

    pub fn contains_element(&self, element: ElementId) -> bool {
        self.states.iter().any(|s| s.element == element)
    }

    pub fn state_of(&self, element: ElementId) -> Option<&TermState> {
        self.states.iter().find(|s| s.element == element)
    }

    /// All states of one term, in order.
    pub fn states_of(&self, term: TermId) -> Vec<TermState> {
        self.states
            .iter()
            .filter(|s| s.term == term)
            .copied()
            .collect()
    }

    /// Distinct terms in left-to-right order.
    pub fn terms(&self) -> Vec<TermId> {
        self.groups().into_iter().map(|g| g.term).collect()
    }

    /// Remove and return every state matching `pred`.
    pub fn extract(&mut self, mut pred: impl FnMut(&TermState) -> bool) -> Vec<TermState> {
        let mut removed = Vec::new();
        self.states.retain(|s| {
            if pred(s) {
                removed.push(*s);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Insert a run of states so that x order is preserved. The run stays
    /// contiguous; it goes before the first state strictly to its right.
    pub fn insert_run(&mut self, run: &[TermState]) {
        let Some(first) = run.first() else {
            return;
        };
        let at = self
            .states
            .iter()
            .position(|s| s.typeset.x > first.typeset.x)
            .unwrap_or(self.states.len());
        self.states.splice(at..at, run.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn state(term: TermId, x: f64) -> TermState {
        TermState::new(term, Uuid::new_v4(), Point::new(x, 0.0))
    }

    #[test]
    fn test_groups_and_pivot() {
        let a = Uuid::new_v4();
        let x = Uuid::new_v4();
        let b = Uuid::new_v4();
        let snap = Snapshot::new(vec![
            state(a, -60.0),
            state(x, -30.0),
            state(x, -20.0),
            state(b, 40.0),
        ]);

        let groups = snap.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].range, 1..3);
        assert_eq!(snap.pivot(), 2);
        assert_eq!(snap.groups_on(Side::Rhs).len(), 1);
        assert_eq!(snap.terms(), vec![a, x, b]);
    }

    #[test]
    fn test_extract() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut snap = Snapshot::new(vec![state(a, -10.0), state(b, 10.0), state(b, 20.0)]);

        let removed = snap.extract(|s| s.term == b);
        assert_eq!(removed.len(), 2);
        assert_eq!(snap.len(), 1);
        assert!(!snap.contains_term(b));
    }

    #[test]
    fn test_insert_run_preserves_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let x = Uuid::new_v4();
        let mut snap = Snapshot::new(vec![state(a, -30.0), state(b, 30.0)]);

        let run = [state(x, -10.0), state(x, -10.0)];
        snap.insert_run(&run);

        assert_eq!(snap.terms(), vec![a, x, b]);
        assert_eq!(snap.states()[1].element, run[0].element);
        assert_eq!(snap.states()[2].element, run[1].element);
    }

    #[test]
    fn test_side_of() {
        assert_eq!(Side::of(-0.5), Side::Lhs);
        assert_eq!(Side::of(0.5), Side::Rhs);
        assert_eq!(Side::Lhs.opposite(), Side::Rhs);
        assert!((Side::Lhs.direction() + 1.0).abs() < f64::EPSILON);
    }
}
