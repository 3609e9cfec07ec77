//! Random equation generation.

use crate::config::{ConfigError, EquationConfig};
use crate::fraction::{Fraction, FractionError};
use crate::term::Term;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building an equation.
#[derive(Debug, Error)]
pub enum EquationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Arithmetic error: {0}")]
    Fraction(#[from] FractionError),
}

/// Result type for equation construction.
pub type EquationResult<T> = Result<T, EquationError>;

/// Description of one term before it is placed in an equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSpec {
    /// Variable name, or `None` for a constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    pub value: Fraction,
}

impl TermSpec {
    pub fn constant(value: Fraction) -> Self {
        Self {
            variable: None,
            value,
        }
    }

    pub fn variable(name: impl Into<String>, coefficient: Fraction) -> Self {
        Self {
            variable: Some(name.into()),
            value: coefficient,
        }
    }

    /// Build a fresh term with a new identity.
    pub fn to_term(&self) -> Term {
        match &self.variable {
            Some(name) => Term::variable(name.clone(), self.value),
            None => Term::constant(self.value),
        }
    }
}

/// Both sides of an equation, left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationSpec {
    pub lhs: Vec<TermSpec>,
    pub rhs: Vec<TermSpec>,
}

impl EquationSpec {
    pub fn len(&self) -> usize {
        self.lhs.len() + self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty() && self.rhs.is_empty()
    }
}

/// Generate a random linear equation.
///
/// The left side gets between `min_left_terms` and `max_left_terms` terms, the
/// right side at least one. At least one term is a variable and at least one
/// is a constant. No generated value is zero.
pub fn generate<R: Rng + ?Sized>(config: &EquationConfig, rng: &mut R) -> EquationResult<EquationSpec> {
    config.validate()?;

    let max_left = config.max_left_terms.min(config.max_total_terms - 1);
    let min_left = config.min_left_terms.min(max_left);
    let n_left = rng.random_range(min_left..=max_left);
    let extra_min = if n_left > 1 { 1 } else { 2 };
    let n_total = (n_left + rng.random_range(extra_min..=4)).min(config.max_total_terms);
    let n_variables = rng.random_range(1..n_total);

    let mut spec = EquationSpec::default();
    let mut remaining_variables = n_variables;
    for i in 0..n_total {
        let remaining_terms = n_total - i;
        let is_variable = rng.random_bool(remaining_variables as f64 / remaining_terms as f64);
        let value = random_value(config, rng)?;
        let term = if is_variable {
            remaining_variables -= 1;
            TermSpec::variable(config.variable.clone(), value)
        } else {
            TermSpec::constant(value)
        };
        if i < n_left {
            spec.lhs.push(term);
        } else {
            spec.rhs.push(term);
        }
    }

    log::debug!(
        "generated {} + {} terms ({} variable)",
        spec.lhs.len(),
        spec.rhs.len(),
        n_variables
    );
    Ok(spec)
}

fn random_value<R: Rng + ?Sized>(config: &EquationConfig, rng: &mut R) -> EquationResult<Fraction> {
    let range = config.coefficient_range;
    let num = loop {
        let n = rng.random_range(range.min..=range.max);
        if n != 0 {
            break n;
        }
    };
    let den = if rng.random_bool(config.fraction_probability) {
        let range = config.denominator_range;
        rng.random_range(range.min..=range.max)
    } else {
        1
    };
    Ok(Fraction::new(num, den)?)
}
