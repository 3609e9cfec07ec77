//! Two-sided typesetting of an equation snapshot.
//!
//! Term groups are packed outward from the equals glyph: left-hand groups
//! toward negative x, right-hand groups toward positive x. Every element's
//! typeset position is the running offset plus half its width, so the result
//! only depends on the order of the snapshot and the measured bounds.

use crate::element::{ElementContent, ElementId, Scene};
use crate::fraction::Fraction;
use crate::snapshot::{Side, Snapshot, TermGroup, TermState};
use crate::term::{Term, TermId};
use kurbo::Point;
use std::collections::{HashMap, HashSet};

/// A discrete drop position between two adjacent term groups, or between the
/// equals glyph and the innermost group of a side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSlot {
    pub position: Point,
    pub side: Side,
}

/// Result of a layout pass.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Target position for every element, including the equals glyph.
    pub targets: Vec<(ElementId, Point)>,
    /// Candidate drop positions ordered left to right.
    pub cursor_slots: Vec<CursorSlot>,
    /// Left edge of the equation.
    pub left: f64,
    /// Right edge of the equation.
    pub right: f64,
}

impl Layout {
    /// Nearest slot to `point` on the given side.
    pub fn nearest_slot(&self, point: Point, side: Side) -> Option<CursorSlot> {
        nearest_slot(&self.cursor_slots, point, side)
    }
}

/// Nearest slot to `point` among the slots on `side`.
pub fn nearest_slot(slots: &[CursorSlot], point: Point, side: Side) -> Option<CursorSlot> {
    slots
        .iter()
        .filter(|slot| slot.side == side)
        .min_by(|a, b| {
            a.position
                .distance(point)
                .total_cmp(&b.position.distance(point))
        })
        .copied()
}

/// Content of the `index`-th element of a term group for a given value.
pub fn element_content(term: &Term, index: usize, value: Fraction) -> ElementContent {
    match term.symbol() {
        Some(name) if index > 0 => ElementContent::Symbol(name.to_string()),
        _ => ElementContent::Value(term.value_text(value)),
    }
}

/// Typeset `snapshot` in place and return the element targets and cursor
/// slots.
///
/// # Panics
///
/// Panics if either side of the snapshot has no term group. Merge and cleanup
/// always leave at least one group per side.
pub fn typeset(
    snapshot: &mut Snapshot,
    terms: &mut HashMap<TermId, Term>,
    scene: &mut Scene,
    glyph: ElementId,
) -> Layout {
    let groups = snapshot.groups();
    let pivot = snapshot.pivot();
    assert!(
        pivot >= 1 && groups.len() > pivot,
        "equation side left without terms ({} of {} groups on the left)",
        pivot,
        groups.len()
    );

    let final_widths = refresh_text(snapshot, &groups, pivot, terms, scene);
    let width_of = |scene: &Scene, element: ElementId| {
        final_widths
            .get(&element)
            .copied()
            .unwrap_or_else(|| scene.bounds(element).width)
    };

    let half_glyph = scene.bounds(glyph).width / 2.0;
    let mut layout = Layout {
        targets: vec![(glyph, Point::ZERO)],
        ..Layout::default()
    };

    // Left side, innermost group first.
    let mut running = half_glyph;
    layout.cursor_slots.push(CursorSlot {
        position: Point::new(-running, 0.0),
        side: Side::Lhs,
    });
    for (i, group) in groups[..pivot].iter().enumerate().rev() {
        for index in group.range.clone().rev() {
            let width = width_of(&*scene, snapshot.states()[index].element);
            place(snapshot, index, -(running + width / 2.0), &mut layout);
            running += width;
        }
        if i > 0 {
            layout.cursor_slots.push(CursorSlot {
                position: Point::new(-running, 0.0),
                side: Side::Lhs,
            });
        }
    }
    layout.left = -running;

    // Right side, innermost group first.
    running = half_glyph;
    layout.cursor_slots.push(CursorSlot {
        position: Point::new(running, 0.0),
        side: Side::Rhs,
    });
    let right_groups = &groups[pivot..];
    for (i, group) in right_groups.iter().enumerate() {
        for index in group.range.clone() {
            let width = width_of(&*scene, snapshot.states()[index].element);
            place(snapshot, index, running + width / 2.0, &mut layout);
            running += width;
        }
        if i + 1 < right_groups.len() {
            layout.cursor_slots.push(CursorSlot {
                position: Point::new(running, 0.0),
                side: Side::Rhs,
            });
        }
    }
    layout.right = running;

    layout
        .cursor_slots
        .sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    log::debug!(
        "typeset {} groups ({} left), {} cursor slots",
        groups.len(),
        pivot,
        layout.cursor_slots.len()
    );
    layout
}

fn place(snapshot: &mut Snapshot, index: usize, x: f64, layout: &mut Layout) {
    let state = &mut snapshot.states_mut()[index];
    state.typeset = Point::new(x, 0.0);
    layout.targets.push((state.element, state.typeset));
}

/// Recompute implicit signs and re-render value elements whose text changed.
///
/// Elements keep displaying the term's `shown` value; the value track of the
/// interpolation walks it to the final one. Widths of the final text are
/// measured up front and returned so the layout settles where the animation
/// ends.
fn refresh_text(
    snapshot: &Snapshot,
    groups: &[TermGroup],
    pivot: usize,
    terms: &mut HashMap<TermId, Term>,
    scene: &mut Scene,
) -> HashMap<ElementId, f64> {
    let mut final_widths = HashMap::new();
    for (i, group) in groups.iter().enumerate() {
        let Some(term) = terms.get_mut(&group.term) else {
            continue;
        };
        // A group missing an element has its value element lifted away.
        if group.range.len() < term.element_count() {
            continue;
        }
        let flag_changed = term.set_hide_sign(i == 0 || i == pivot);
        let element = snapshot.states()[group.range.start].element;
        if term.shown() != term.value() {
            scene.set_content(element, &element_content(term, 0, term.value()));
            final_widths.insert(element, scene.bounds(element).width);
            scene.set_content(element, &element_content(term, 0, term.shown()));
        } else if flag_changed {
            scene.set_content(element, &element_content(term, 0, term.shown()));
        }
    }
    final_widths
}

/// Remove zero-valued term groups after a commit.
///
/// A side made only of zero groups keeps the one nearest the pivot (the last
/// on the left, the first on the right). Returns the removed states.
pub fn clean_zero_groups(snapshot: &mut Snapshot, terms: &HashMap<TermId, Term>) -> Vec<TermState> {
    let is_zero = |term: &TermId| terms.get(term).is_some_and(|t| t.value().is_zero());
    let mut doomed: HashSet<TermId> = HashSet::new();

    for side in [Side::Lhs, Side::Rhs] {
        let groups = snapshot.groups_on(side);
        let zeros: Vec<TermId> = groups
            .iter()
            .map(|g| g.term)
            .filter(|t| is_zero(t))
            .collect();
        let keep = if zeros.len() == groups.len() {
            match side {
                Side::Lhs => zeros.last().copied(),
                Side::Rhs => zeros.first().copied(),
            }
        } else {
            None
        };
        doomed.extend(zeros.into_iter().filter(|t| Some(*t) != keep));
    }

    if doomed.is_empty() {
        return Vec::new();
    }
    log::debug!("removing {} zero-valued term groups", doomed.len());
    snapshot.extract(|s| doomed.contains(&s.term))
}

/// Sides of `snapshot` that have no term group.
pub fn empty_sides(snapshot: &Snapshot) -> Vec<Side> {
    [Side::Lhs, Side::Rhs]
        .into_iter()
        .filter(|&side| snapshot.groups_on(side).is_empty())
        .collect()
}
