//! Equation generation and presentation settings.

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid range for {name}: {min}..={max}")]
    InvalidRange { name: &'static str, min: i64, max: i64 },
    #[error("Invalid term count: {0}")]
    TermCount(String),
    #[error("Invalid setting: {0}")]
    Setting(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
}

impl ValueRange {
    /// Create a new inclusive range.
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    fn check(&self, name: &'static str) -> ConfigResult<()> {
        if self.is_empty() {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Animation and presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Seconds for a layout, merge or rebound animation.
    pub tween_duration: f64,
    /// Text alpha of a dragged term while it previews a merge.
    pub merge_alpha: f64,
    /// Background highlight of a merge target, RGBA.
    pub highlight_rgba: [u8; 4],
    /// Seconds the insertion cursor stays lit.
    pub cursor_on_time: f64,
    /// Seconds the insertion cursor stays dark.
    pub cursor_off_time: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            tween_duration: 0.25,
            merge_alpha: 0.35,
            highlight_rgba: [255, 255, 255, 26],
            cursor_on_time: 0.6,
            cursor_off_time: 0.5,
        }
    }
}

impl LayoutSettings {
    pub fn highlight_color(&self) -> Color {
        let [r, g, b, a] = self.highlight_rgba;
        Color::from_rgba8(r, g, b, a)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.tween_duration.is_nan() || self.tween_duration < 0.0 {
            return Err(ConfigError::Setting(format!(
                "tween_duration must be non-negative, got {}",
                self.tween_duration
            )));
        }
        if !(0.0..=1.0).contains(&self.merge_alpha) {
            return Err(ConfigError::Setting(format!(
                "merge_alpha must be within [0, 1], got {}",
                self.merge_alpha
            )));
        }
        if !(self.cursor_on_time > 0.0 && self.cursor_off_time > 0.0) {
            return Err(ConfigError::Setting(
                "cursor blink times must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for generating and manipulating an equation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquationConfig {
    pub min_left_terms: usize,
    pub max_left_terms: usize,
    /// Upper bound on the number of terms across both sides.
    pub max_total_terms: usize,
    /// Numerators are drawn from this range, excluding zero.
    pub coefficient_range: ValueRange,
    /// Denominators used when a term is generated as a proper fraction.
    pub denominator_range: ValueRange,
    /// Probability that a generated value is a fraction rather than an integer.
    pub fraction_probability: f64,
    /// Name of the unknown.
    pub variable: String,
    /// Always carry a variable's symbol together with its coefficient.
    pub lock_variable_terms: bool,
    /// Seed for reproducible generation. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub layout: LayoutSettings,
}

impl Default for EquationConfig {
    fn default() -> Self {
        Self {
            min_left_terms: 1,
            max_left_terms: 4,
            max_total_terms: 8,
            coefficient_range: ValueRange::new(-20, 19),
            denominator_range: ValueRange::new(2, 5),
            fraction_probability: 0.5,
            variable: "x".to_string(),
            lock_variable_terms: true,
            seed: None,
            layout: LayoutSettings::default(),
        }
    }
}

impl EquationConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that generation can succeed with these settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_left_terms == 0 {
            return Err(ConfigError::TermCount(
                "min_left_terms must be at least 1".to_string(),
            ));
        }
        if self.min_left_terms > self.max_left_terms {
            return Err(ConfigError::TermCount(format!(
                "min_left_terms {} exceeds max_left_terms {}",
                self.min_left_terms, self.max_left_terms
            )));
        }
        if self.max_total_terms < 2 || self.max_total_terms <= self.min_left_terms {
            return Err(ConfigError::TermCount(format!(
                "max_total_terms {} leaves no room for a right-hand side",
                self.max_total_terms
            )));
        }
        self.coefficient_range.check("coefficient_range")?;
        if self.coefficient_range.min == 0 && self.coefficient_range.max == 0 {
            return Err(ConfigError::InvalidRange {
                name: "coefficient_range",
                min: 0,
                max: 0,
            });
        }
        self.denominator_range.check("denominator_range")?;
        if !(0.0..=1.0).contains(&self.fraction_probability) {
            return Err(ConfigError::Setting(format!(
                "fraction_probability must be within [0, 1], got {}",
                self.fraction_probability
            )));
        }
        if self.variable.trim().is_empty() {
            return Err(ConfigError::Setting("variable name is empty".to_string()));
        }
        self.layout.validate()
    }
}
