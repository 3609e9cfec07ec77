//! Overlap-area hit testing for merge targets.

use crate::element::{ElementId, Scene};
use crate::snapshot::Snapshot;
use crate::term::{Term, TermId};
use kurbo::Rect;
use std::collections::HashMap;

/// A live element that could receive the dragged term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub term: TermId,
    pub element: ElementId,
    pub rect: Rect,
}

/// Intersection area of two axis-aligned rectangles (zero when disjoint).
pub fn overlap_area(a: Rect, b: Rect) -> f64 {
    let w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
    let h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
    w * h
}

/// Whether two rectangles share a positive area.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    overlap_area(a, b) > 0.0
}

/// Pick the candidate with the strictly largest positive overlap.
///
/// Ties keep the first candidate encountered.
pub fn max_overlap(mover: Rect, candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_area = 0.0;
    for candidate in candidates {
        let area = overlap_area(mover, candidate.rect);
        if area > best_area {
            best_area = area;
            best = Some(candidate);
        }
    }
    best
}

/// Whether `target` may receive `dragged`.
///
/// A whole-term (additive) drag merges into a different term of compatible
/// kind. A detached coefficient can only return to its own term.
pub fn is_eligible(dragged: &Term, target: &Term, additive: bool) -> bool {
    if additive {
        target.id() != dragged.id() && dragged.can_merge_with(target, true)
    } else {
        target.id() == dragged.id()
    }
}

/// Find the merge target for a dragged element among the live snapshot.
pub fn resolve(
    mover: Rect,
    dragged: &Term,
    additive: bool,
    snapshot: &Snapshot,
    terms: &HashMap<TermId, Term>,
    scene: &Scene,
) -> Option<TermId> {
    let candidates = snapshot.states().iter().filter_map(|state| {
        let target = terms.get(&state.term)?;
        if !is_eligible(dragged, target, additive) {
            return None;
        }
        Some(Candidate {
            term: state.term,
            element: state.element,
            rect: scene.rect(state.element)?,
        })
    });
    max_overlap(mover, candidates).map(|c| c.term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fraction::Fraction;
    use uuid::Uuid;

    fn candidate(rect: Rect) -> Candidate {
        Candidate {
            term: Uuid::new_v4(),
            element: Uuid::new_v4(),
            rect,
        }
    }

    #[test]
    fn test_overlap_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!((overlap_area(a, b) - 25.0).abs() < f64::EPSILON);
        assert!(overlap_area(a, Rect::new(20.0, 0.0, 30.0, 10.0)).abs() < f64::EPSILON);
        // Touching edges do not overlap.
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn test_picks_largest_area() {
        let mover = Rect::new(0.0, 0.0, 10.0, 1.0);
        let small = candidate(Rect::new(7.0, 0.0, 20.0, 1.0)); // area 3
        let large = candidate(Rect::new(-10.0, 0.0, 5.0, 1.0)); // area 5

        let best = max_overlap(mover, [small, large]).unwrap();
        assert_eq!(best.term, large.term);
    }

    #[test]
    fn test_no_overlap_returns_none() {
        let mover = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far = candidate(Rect::new(50.0, 50.0, 60.0, 60.0));
        assert!(max_overlap(mover, [far]).is_none());
        assert!(max_overlap(mover, Vec::<Candidate>::new()).is_none());
    }

    #[test]
    fn test_tie_keeps_first() {
        let mover = Rect::new(0.0, 0.0, 10.0, 10.0);
        let first = candidate(Rect::new(-5.0, 0.0, 5.0, 10.0));
        let second = candidate(Rect::new(5.0, 0.0, 15.0, 10.0));
        let best = max_overlap(mover, [first, second]).unwrap();
        assert_eq!(best.term, first.term);
    }

    #[test]
    fn test_eligibility() {
        let c = Term::constant(Fraction::ONE);
        let other = Term::constant(Fraction::ONE);
        let x = Term::variable("x", Fraction::ONE);
        let x2 = Term::variable("x", Fraction::ONE);

        assert!(is_eligible(&c, &other, true));
        assert!(!is_eligible(&c, &c, true));
        assert!(!is_eligible(&c, &x, true));
        assert!(is_eligible(&x, &x2, true));
        // Detached coefficient only returns home.
        assert!(!is_eligible(&x, &x2, false));
        assert!(is_eligible(&x, &x, false));
    }
}
