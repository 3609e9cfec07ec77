//! Term data model and sign display policy.

use crate::fraction::Fraction;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for terms.
pub type TermId = Uuid;

/// The kind of a term. The set is closed: a term is either a constant or a
/// coefficient times a named variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    Constant,
    Variable { name: String },
}

/// A single addend of the equation.
///
/// Identity is fixed at creation; the value changes as terms are merged or
/// carried across the equals sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub(crate) id: TermId,
    kind: TermKind,
    /// Constant value or variable coefficient.
    value: Fraction,
    /// Value currently displayed by the term's elements.
    #[serde(skip)]
    shown: Fraction,
    /// Implicit "+" for the first term group on a side.
    hide_sign: bool,
    /// Render a coefficient of magnitude one as a bare sign.
    hide_coefficient_one: bool,
}

impl Term {
    /// Create a constant term.
    pub fn constant(value: Fraction) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TermKind::Constant,
            value,
            shown: value,
            hide_sign: false,
            hide_coefficient_one: false,
        }
    }

    /// Create a variable term with the given coefficient.
    pub fn variable(name: impl Into<String>, coefficient: Fraction) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TermKind::Variable { name: name.into() },
            value: coefficient,
            shown: coefficient,
            hide_sign: false,
            hide_coefficient_one: true,
        }
    }

    /// Create a term of the given kind.
    pub fn new(kind: TermKind, value: Fraction) -> Self {
        match kind {
            TermKind::Constant => Self::constant(value),
            TermKind::Variable { name } => Self::variable(name, value),
        }
    }

    pub fn id(&self) -> TermId {
        self.id
    }

    pub fn kind(&self) -> &TermKind {
        &self.kind
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, TermKind::Constant)
    }

    pub fn is_variable(&self) -> bool {
        !self.is_constant()
    }

    /// Variable name, if this is a variable term.
    pub fn symbol(&self) -> Option<&str> {
        match &self.kind {
            TermKind::Constant => None,
            TermKind::Variable { name } => Some(name),
        }
    }

    pub fn value(&self) -> Fraction {
        self.value
    }

    pub fn set_value(&mut self, value: Fraction) {
        self.value = value;
    }

    /// Value currently displayed on screen (may lag `value` while animating).
    pub fn shown(&self) -> Fraction {
        self.shown
    }

    pub(crate) fn set_shown(&mut self, shown: Fraction) {
        self.shown = shown;
    }

    pub fn hide_sign(&self) -> bool {
        self.hide_sign
    }

    /// Set the implicit-sign flag. Returns true if it changed.
    pub fn set_hide_sign(&mut self, hide: bool) -> bool {
        let changed = self.hide_sign != hide;
        self.hide_sign = hide;
        changed
    }

    pub fn hide_coefficient_one(&self) -> bool {
        self.hide_coefficient_one
    }

    pub fn set_hide_coefficient_one(&mut self, hide: bool) {
        self.hide_coefficient_one = hide;
    }

    /// Number of visual elements this term owns.
    pub fn element_count(&self) -> usize {
        match self.kind {
            TermKind::Constant => 1,
            TermKind::Variable { .. } => 2,
        }
    }

    /// Whether a term dragged as `self` may merge into `target`.
    ///
    /// Constants always combine; variables only with the same symbol and only
    /// while the whole term is being carried.
    pub fn can_merge_with(&self, target: &Term, additive: bool) -> bool {
        match (&self.kind, &target.kind) {
            (TermKind::Constant, TermKind::Constant) => true,
            (TermKind::Variable { name: a }, TermKind::Variable { name: b }) => additive && a == b,
            _ => false,
        }
    }

    /// Text for an arbitrary value under this term's display flags.
    pub fn value_text(&self, value: Fraction) -> ValueText {
        let sign = match (value.is_negative(), self.hide_sign) {
            (false, false) => SignGlyph::Plus,
            (false, true) => SignGlyph::Hidden,
            (true, false) => SignGlyph::Minus,
            (true, true) => SignGlyph::LeadingMinus,
        };
        let magnitude = value.abs();
        let hide_one = self.is_variable() && self.hide_coefficient_one && magnitude == 1;
        ValueText {
            sign,
            magnitude: if hide_one { None } else { Some(magnitude) },
        }
    }

    /// Text for the value currently shown.
    pub fn shown_text(&self) -> ValueText {
        self.value_text(self.shown)
    }
}

/// Sign rendering for a value element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignGlyph {
    /// Leading non-negative term: no sign at all.
    Hidden,
    /// " + " between terms.
    Plus,
    /// " - " between terms.
    Minus,
    /// "-" on a leading negative term.
    LeadingMinus,
}

impl SignGlyph {
    pub fn as_str(self) -> &'static str {
        match self {
            SignGlyph::Hidden => "",
            SignGlyph::Plus => " + ",
            SignGlyph::Minus => " - ",
            SignGlyph::LeadingMinus => "-",
        }
    }
}

/// What a constant or coefficient element displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueText {
    pub sign: SignGlyph,
    /// Absolute value, or `None` when a unit coefficient is hidden.
    pub magnitude: Option<Fraction>,
}

impl fmt::Display for ValueText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign.as_str())?;
        if let Some(magnitude) = self.magnitude {
            write!(f, "{magnitude}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_sign_policy() {
        let mut t = Term::constant(frac(3, 1));
        assert_eq!(t.value_text(frac(3, 1)).to_string(), " + 3");
        assert_eq!(t.value_text(frac(-3, 1)).to_string(), " - 3");

        t.set_hide_sign(true);
        assert_eq!(t.value_text(frac(3, 1)).to_string(), "3");
        assert_eq!(t.value_text(frac(-3, 4)).to_string(), "-3/4");
        assert_eq!(t.value_text(Fraction::ZERO).to_string(), "0");
    }

    #[test]
    fn test_hide_coefficient_one() {
        let mut x = Term::variable("x", frac(1, 1));
        assert_eq!(x.shown_text().magnitude, None);
        assert_eq!(x.value_text(frac(-1, 1)).to_string(), " - ");

        x.set_hide_coefficient_one(false);
        assert_eq!(x.shown_text().to_string(), " + 1");

        // Constants never hide their digit.
        let c = Term::constant(frac(1, 1));
        assert_eq!(c.shown_text().magnitude, Some(frac(1, 1)));
    }

    #[test]
    fn test_set_hide_sign_reports_change() {
        let mut t = Term::constant(frac(2, 1));
        assert!(t.set_hide_sign(true));
        assert!(!t.set_hide_sign(true));
        assert!(t.hide_sign());
    }

    #[test]
    fn test_merge_rule() {
        let c1 = Term::constant(frac(1, 1));
        let c2 = Term::constant(frac(2, 1));
        let x1 = Term::variable("x", frac(2, 1));
        let x2 = Term::variable("x", frac(-1, 3));
        let y = Term::variable("y", frac(1, 1));

        assert!(c1.can_merge_with(&c2, false));
        assert!(c1.can_merge_with(&c2, true));
        assert!(x1.can_merge_with(&x2, true));
        assert!(!x1.can_merge_with(&x2, false));
        assert!(!x1.can_merge_with(&y, true));
        assert!(!c1.can_merge_with(&x1, true));
        assert!(!x1.can_merge_with(&c1, true));
    }

    #[test]
    fn test_element_count() {
        assert_eq!(Term::constant(Fraction::ONE).element_count(), 1);
        assert_eq!(Term::variable("x", Fraction::ONE).element_count(), 2);
        assert_eq!(Term::new(TermKind::Constant, Fraction::ONE).symbol(), None);
    }
}
