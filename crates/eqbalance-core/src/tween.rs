//! Resumable interpolation record advanced once per tick.
//!
//! A layout pass produces one [`Interpolation`] that carries every element
//! from where it is now to where it was typeset, rolls displayed values over
//! to their new numbers, and fades dissolving elements out. Starting a new
//! layout replaces the record; nothing is queued.

use crate::element::ElementId;
use crate::fraction::Fraction;
use crate::term::TermId;
use kurbo::Point;

/// Moves one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionTrack {
    pub element: ElementId,
    pub from: Point,
    pub to: Point,
}

/// Rolls the displayed value of one term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTrack {
    pub term: TermId,
    pub from: Fraction,
    pub to: Fraction,
}

/// Fades one element's text alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTrack {
    pub element: ElementId,
    pub from: f64,
    pub to: f64,
}

/// A bounded-duration interpolation in progress.
#[derive(Debug, Clone, Default)]
pub struct Interpolation {
    pub positions: Vec<PositionTrack>,
    pub values: Vec<ValueTrack>,
    pub fades: Vec<FadeTrack>,
    elapsed: f64,
    duration: f64,
}

impl Interpolation {
    /// Create an empty interpolation lasting `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Progress in `[0, 1]`. A zero duration is complete immediately.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt` seconds and return the new progress.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.elapsed += dt.max(0.0);
        self.progress()
    }

    /// Jump to the end.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.values.is_empty() && self.fades.is_empty()
    }
}

impl PositionTrack {
    pub fn at(&self, t: f64) -> Point {
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, t.max(0.0))
    }
}

impl ValueTrack {
    pub fn at(&self, t: f64) -> Fraction {
        Fraction::lerp(self.from, self.to, t)
    }
}

impl FadeTrack {
    pub fn at(&self, t: f64) -> f64 {
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * t.max(0.0)
    }
}
