//! Equation board: the terms, their elements, the history and the running
//! interpolation.
//!
//! The board is the part of the controller that the gesture state machine
//! mutates. It knows how to spawn term elements, re-typeset the live snapshot,
//! commit a snapshot and advance animations, but has no notion of pointers.

use crate::config::LayoutSettings;
use crate::cursor::Cursor;
use crate::element::{ElementContent, ElementFactory, ElementId, Scene};
use crate::fraction::Fraction;
use crate::history::History;
use crate::layout::{self, Layout};
use crate::snapshot::{Snapshot, TermState};
use crate::term::{Term, TermId};
use crate::tween::{FadeTrack, Interpolation, PositionTrack, ValueTrack};
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};

/// A state removed from the equation that is fading out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dissolving {
    pub state: TermState,
    /// Current text alpha.
    pub alpha: f64,
}

/// Terms, elements and history of one equation.
#[derive(Debug)]
pub struct Board {
    terms: HashMap<TermId, Term>,
    scene: Scene,
    history: History,
    dissolving: Vec<Dissolving>,
    tween: Option<Interpolation>,
    cursor: Cursor,
    glyph: ElementId,
    layout: Layout,
    settings: LayoutSettings,
}

impl Board {
    /// Create an empty board. The equals glyph and the cursor are spawned
    /// immediately; the cursor starts hidden.
    pub fn new(factory: Box<dyn ElementFactory>, settings: LayoutSettings) -> Self {
        let mut scene = Scene::new(factory);
        let glyph = scene.spawn(&ElementContent::Equals);
        scene.set_position(glyph, Point::ZERO);
        let cursor_element = scene.spawn(&ElementContent::Cursor);
        scene.set_active(cursor_element, false);
        let cursor = Cursor::new(cursor_element, settings.cursor_on_time, settings.cursor_off_time);
        Self {
            terms: HashMap::new(),
            scene,
            history: History::default(),
            dissolving: Vec::new(),
            tween: None,
            cursor,
            glyph,
            layout: Layout::default(),
            settings,
        }
    }

    pub fn terms(&self) -> &HashMap<TermId, Term> {
        &self.terms
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.get(&id)
    }

    pub fn term_mut(&mut self, id: TermId) -> Option<&mut Term> {
        self.terms.get_mut(&id)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// The live snapshot.
    pub fn live(&self) -> &Snapshot {
        self.history.live()
    }

    pub fn glyph(&self) -> ElementId {
        self.glyph
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The cursor together with the scene that displays it.
    pub fn cursor_and_scene(&mut self) -> (&mut Cursor, &mut Scene) {
        (&mut self.cursor, &mut self.scene)
    }

    /// Result of the most recent layout pass.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: LayoutSettings) {
        self.cursor = Cursor::new(
            self.cursor.element(),
            settings.cursor_on_time,
            settings.cursor_off_time,
        );
        self.settings = settings;
    }

    pub fn dissolving(&self) -> &[Dissolving] {
        &self.dissolving
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Register `term` and spawn its elements at `at`. Returns its states,
    /// typeset at `at`.
    pub fn spawn_term(&mut self, term: Term, at: Point) -> Vec<TermState> {
        let states: Vec<TermState> = (0..term.element_count())
            .map(|index| {
                let element = self
                    .scene
                    .spawn(&layout::element_content(&term, index, term.value()));
                self.scene.set_position(element, at);
                TermState::new(term.id(), element, at)
            })
            .collect();
        log::debug!("spawned term {} = {}", term.id(), term.value());
        self.terms.insert(term.id(), term);
        states
    }

    /// Replace everything with a new committed equation and snap it into place.
    pub fn populate(&mut self, lhs: Vec<Term>, rhs: Vec<Term>) {
        self.clear();
        let mut states = Vec::new();
        let n_left = lhs.len();
        for (i, term) in lhs.into_iter().enumerate() {
            let x = -((n_left - i) as f64);
            states.extend(self.spawn_term(term, Point::new(x, 0.0)));
        }
        for (i, term) in rhs.into_iter().enumerate() {
            states.extend(self.spawn_term(term, Point::new((i + 1) as f64, 0.0)));
        }
        let mut snapshot = Snapshot::new(states);
        self.fill_empty_sides(&mut snapshot);
        self.history = History::new(snapshot);
        self.relayout();
        self.finish_tween();
        log::info!("equation ready with {} terms", self.terms.len());
    }

    /// Destroy every term element and forget all state. The equals glyph and
    /// the cursor survive.
    pub fn clear(&mut self) {
        self.tween = None;
        let (cursor, scene) = self.cursor_and_scene();
        cursor.hide(scene);
        let keep = [self.glyph, self.cursor.element()];
        for id in self.scene.ids() {
            if !keep.contains(&id) {
                self.scene.destroy(id);
            }
        }
        self.terms.clear();
        self.dissolving.clear();
        self.history.clear();
        self.layout = Layout::default();
    }

    /// Union of every live element rect at its typeset position, plus the
    /// equals glyph.
    pub fn body_rect(&self) -> Rect {
        let glyph = Rect::from_center_size(Point::ZERO, self.scene.bounds(self.glyph));
        self.live().states().iter().fold(glyph, |body, state| {
            body.union(Rect::from_center_size(
                state.typeset,
                self.scene.bounds(state.element),
            ))
        })
    }

    /// Rect spanning the given elements at their current positions.
    pub fn elements_rect(&self, elements: impl IntoIterator<Item = ElementId>) -> Option<Rect> {
        elements
            .into_iter()
            .filter_map(|id| self.scene.rect(id))
            .reduce(|a, b| a.union(b))
    }

    /// Render `value` on a term's value element without touching its stored
    /// value.
    pub fn show_value(&mut self, term_id: TermId, element: ElementId, value: Fraction) {
        if let Some(term) = self.terms.get_mut(&term_id) {
            term.set_shown(value);
            self.scene
                .set_content(element, &layout::element_content(term, 0, value));
        }
    }

    /// Highlight every live element of a term.
    pub fn highlight_term(&mut self, term: TermId, on: bool) {
        let color = on.then(|| self.settings.highlight_color());
        for state in self.live().states_of(term) {
            self.scene.set_highlight(state.element, color);
        }
    }

    /// Queue states to fade out and be destroyed when the next interpolation
    /// completes.
    pub fn dissolve(&mut self, states: impl IntoIterator<Item = TermState>, alpha: f64) {
        for state in states {
            self.scene.set_highlight(state.element, None);
            self.dissolving.push(Dissolving { state, alpha });
        }
    }

    /// Clean zero groups out of `snapshot`, make it the only history entry and
    /// re-typeset.
    pub fn commit(&mut self, mut snapshot: Snapshot) {
        let removed = layout::clean_zero_groups(&mut snapshot, &self.terms);
        self.dissolve(removed, 1.0);
        self.fill_empty_sides(&mut snapshot);
        self.history.commit(snapshot);
        log::info!("committed {}", self.render_text());
        self.relayout();
    }

    fn fill_empty_sides(&mut self, snapshot: &mut Snapshot) {
        for side in layout::empty_sides(snapshot) {
            let at = Point::new(side.direction(), 0.0);
            let states = self.spawn_term(Term::constant(Fraction::ZERO), at);
            snapshot.insert_run(&states);
        }
    }

    /// Re-typeset the live snapshot and start an interpolation toward it.
    ///
    /// Any running interpolation is dropped where it stands; elements start
    /// from their current position, values from what is currently shown.
    pub fn relayout(&mut self) {
        let Some(snapshot) = self.history.live_mut() else {
            return;
        };
        let layout = layout::typeset(snapshot, &mut self.terms, &mut self.scene, self.glyph);

        let mut tween = Interpolation::new(self.settings.tween_duration);
        for &(element, to) in &layout.targets {
            let from = self.scene.position(element).unwrap_or(to);
            tween.positions.push(PositionTrack { element, from, to });
        }
        for term_id in snapshot.terms() {
            if let Some(term) = self.terms.get(&term_id) {
                if term.shown() != term.value() {
                    tween.values.push(ValueTrack {
                        term: term_id,
                        from: term.shown(),
                        to: term.value(),
                    });
                }
            }
        }
        for dissolving in &self.dissolving {
            tween.fades.push(FadeTrack {
                element: dissolving.state.element,
                from: dissolving.alpha,
                to: 0.0,
            });
        }

        if let Some(running) = self.tween.as_ref().filter(|t| !t.is_finished()) {
            log::debug!(
                "layout restarted at {:.3}s of {:.3}s",
                running.elapsed(),
                running.duration()
            );
        }
        self.layout = layout;
        self.tween = Some(tween);
    }

    /// Advance animations by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let (cursor, scene) = self.cursor_and_scene();
        cursor.tick(scene, dt);

        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        let t = tween.advance(dt);
        self.apply_tween(t);
        if t >= 1.0 {
            self.settle();
        }
    }

    /// Jump the running interpolation to its end.
    pub fn finish_tween(&mut self) {
        if let Some(tween) = self.tween.as_mut() {
            tween.finish();
            self.apply_tween(1.0);
            self.settle();
        }
    }

    fn apply_tween(&mut self, t: f64) {
        let Some(tween) = self.tween.as_ref() else {
            return;
        };
        for track in &tween.positions {
            self.scene.set_position(track.element, track.at(t));
        }
        for track in &tween.values {
            let value = track.at(t);
            let states = self.history.live().states_of(track.term);
            let element = states.first().map(|s| s.element);
            if let (Some(term), Some(element)) = (self.terms.get_mut(&track.term), element) {
                if states.len() == term.element_count() && term.shown() != value {
                    term.set_shown(value);
                    self.scene
                        .set_content(element, &layout::element_content(term, 0, value));
                }
            }
        }
        for track in &tween.fades {
            let alpha = track.at(t);
            self.scene.set_alpha(track.element, alpha);
            if let Some(d) = self
                .dissolving
                .iter_mut()
                .find(|d| d.state.element == track.element)
            {
                d.alpha = alpha;
            }
        }
    }

    /// Finish the interpolation: destroy dissolved elements and forget terms
    /// that no longer appear anywhere.
    fn settle(&mut self) {
        self.tween = None;
        let dissolved: Vec<Dissolving> = self.dissolving.drain(..).collect();
        if dissolved.is_empty() {
            return;
        }
        let mut orphans = HashSet::new();
        for d in &dissolved {
            self.scene.destroy(d.state.element);
            orphans.insert(d.state.term);
        }
        let referenced: HashSet<TermId> = self
            .history
            .committed()
            .into_iter()
            .chain(std::iter::once(self.history.live()))
            .flat_map(|s| s.terms())
            .collect();
        for term in orphans.difference(&referenced) {
            self.terms.remove(term);
        }
        log::debug!("dissolved {} elements", dissolved.len());
    }

    /// Plain-text rendering of the live equation, such as `3x + 2 = -5`.
    pub fn render_text(&self) -> String {
        let snapshot = self.live();
        let pivot = snapshot.pivot();
        let mut out = String::new();
        for (i, group) in snapshot.groups().iter().enumerate() {
            if i == pivot {
                out.push_str(&ElementContent::Equals.to_string());
            }
            let Some(term) = self.terms.get(&group.term) else {
                continue;
            };
            out.push_str(&term.value_text(term.value()).to_string());
            if let Some(name) = term.symbol() {
                out.push_str(name);
            }
        }
        out
    }
}
