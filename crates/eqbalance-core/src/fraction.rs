//! Exact rational arithmetic.
//!
//! A [`Fraction`] keeps its sign on the numerator and always has a positive
//! denominator. Intermediate products are computed in `i128`, so comparisons
//! never overflow and arithmetic only fails when a reduced result no longer
//! fits in `i64`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Fraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionError {
    #[error("Division by zero")]
    DivideByZero,
    #[error("Fraction overflow")]
    Overflow,
    #[error("Invalid fraction: {0}")]
    Parse(String),
}

/// Result type for fraction operations.
pub type FractionResult<T> = Result<T, FractionError>;

/// A rational number `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawFraction", into = "RawFraction")]
pub struct Fraction {
    num: i64,
    den: i64,
}

#[derive(Serialize, Deserialize)]
struct RawFraction {
    num: i64,
    den: i64,
}

impl TryFrom<RawFraction> for Fraction {
    type Error = FractionError;

    fn try_from(raw: RawFraction) -> FractionResult<Self> {
        Fraction::new(raw.num, raw.den)
    }
}

impl From<Fraction> for RawFraction {
    fn from(f: Fraction) -> Self {
        Self { num: f.num, den: f.den }
    }
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Create a reduced fraction.
    pub fn new(num: i64, den: i64) -> FractionResult<Self> {
        Self::from_wide(num as i128, den as i128)
    }

    /// Create a fraction with a positive denominator but without reducing it.
    pub fn new_unreduced(num: i64, den: i64) -> FractionResult<Self> {
        if den == 0 {
            return Err(FractionError::DivideByZero);
        }
        if den < 0 {
            let num = num.checked_neg().ok_or(FractionError::Overflow)?;
            let den = den.checked_neg().ok_or(FractionError::Overflow)?;
            return Ok(Self { num, den });
        }
        Ok(Self { num, den })
    }

    /// Create a whole number.
    pub const fn from_integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    fn from_wide(num: i128, den: i128) -> FractionResult<Self> {
        if den == 0 {
            return Err(FractionError::DivideByZero);
        }
        let (mut num, mut den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        if g > 1 {
            num /= g as i128;
            den /= g as i128;
        }
        let num = i64::try_from(num).map_err(|_| FractionError::Overflow)?;
        let den = i64::try_from(den).map_err(|_| FractionError::Overflow)?;
        Ok(Self { num, den })
    }

    /// Numerator (carries the sign).
    pub fn num(&self) -> i64 {
        self.num
    }

    /// Denominator (always positive).
    pub fn den(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn is_integer(&self) -> bool {
        self.num % self.den == 0
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i64 {
        self.num.signum()
    }

    /// Reduced copy of this fraction.
    pub fn reduced(&self) -> Self {
        // Reducing never grows either component.
        Self::from_wide(self.num as i128, self.den as i128).unwrap_or(*self)
    }

    pub fn abs(&self) -> Self {
        match self.checked_abs() {
            Ok(f) => f,
            Err(e) => panic!("fraction abs: {e}"),
        }
    }

    pub fn checked_abs(&self) -> FractionResult<Self> {
        Ok(Self {
            num: self.num.checked_abs().ok_or(FractionError::Overflow)?,
            den: self.den,
        })
    }

    pub fn checked_neg(&self) -> FractionResult<Self> {
        Ok(Self {
            num: self.num.checked_neg().ok_or(FractionError::Overflow)?,
            den: self.den,
        })
    }

    pub fn checked_add(&self, other: Self) -> FractionResult<Self> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d + c * b, b * d)
    }

    pub fn checked_sub(&self, other: Self) -> FractionResult<Self> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d - c * b, b * d)
    }

    pub fn checked_mul(&self, other: Self) -> FractionResult<Self> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * c, b * d)
    }

    /// Divide, failing with [`FractionError::DivideByZero`] when `other` is zero.
    pub fn checked_div(&self, other: Self) -> FractionResult<Self> {
        let (a, b, c, d) = self.wide(other);
        Self::from_wide(a * d, b * c)
    }

    /// Remainder of the cross-multiplied numerators, truncated toward zero.
    pub fn checked_rem(&self, other: Self) -> FractionResult<Self> {
        let (a, b, c, d) = self.wide(other);
        if c == 0 {
            return Err(FractionError::DivideByZero);
        }
        Self::from_wide((a * d) % (c * b), b * d)
    }

    /// Integer power. Negative exponents invert the fraction.
    pub fn checked_pow(&self, exp: i32) -> FractionResult<Self> {
        let base = if exp < 0 {
            Self::ONE.checked_div(*self)?
        } else {
            *self
        };
        let e = exp.unsigned_abs();
        let num = (base.num as i128)
            .checked_pow(e)
            .ok_or(FractionError::Overflow)?;
        let den = (base.den as i128)
            .checked_pow(e)
            .ok_or(FractionError::Overflow)?;
        Self::from_wide(num, den)
    }

    pub fn pow(&self, exp: i32) -> Self {
        match self.checked_pow(exp) {
            Ok(f) => f,
            Err(e) => panic!("fraction pow failed: {e}"),
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Interpolate between two fractions on their common-denominator grid.
    ///
    /// `t` is clamped to `[0, 1]`; `t == 1` returns `to` exactly.
    pub fn lerp(from: Self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return to;
        }
        let grid = lcm(from.den as i128, to.den as i128);
        let a = from.num as i128 * (grid / from.den as i128);
        let b = to.num as i128 * (grid / to.den as i128);
        let step = (a as f64 + (b - a) as f64 * t).round() as i128;
        Self::from_wide(step, grid).unwrap_or(to)
    }

    fn wide(&self, other: Self) -> (i128, i128, i128, i128) {
        (
            self.num as i128,
            self.den as i128,
            other.num as i128,
            other.den as i128,
        )
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: i128, b: i128) -> i128 {
    let g = gcd(a.unsigned_abs(), b.unsigned_abs()) as i128;
    if g == 0 { 1 } else { a / g * b }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Both denominators are positive, so cross-multiplying keeps the order.
        let (a, b, c, d) = self.wide(*other);
        (a * d).cmp(&(c * b))
    }
}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let r = self.reduced();
        r.num.hash(state);
        r.den.hash(state);
    }
}

impl PartialEq<i64> for Fraction {
    fn eq(&self, other: &i64) -> bool {
        *self == Fraction::from_integer(*other)
    }
}

impl PartialOrd<i64> for Fraction {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Fraction::from_integer(*other)))
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        match self.checked_neg() {
            Ok(f) => f,
            Err(e) => panic!("fraction neg: {e}"),
        }
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: Fraction) -> Fraction {
                match self.$checked(rhs) {
                    Ok(f) => f,
                    Err(e) => panic!("fraction {}: {e}", stringify!($method)),
                }
            }
        }

        impl $trait<i64> for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: i64) -> Fraction {
                $trait::$method(self, Fraction::from_integer(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, checked_add);
impl_binary_op!(Sub, sub, checked_sub);
impl_binary_op!(Mul, mul, checked_mul);
impl_binary_op!(Div, div, checked_div);
impl_binary_op!(Rem, rem, checked_rem);

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Fraction) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fraction {
    fn sub_assign(&mut self, rhs: Fraction) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> FractionResult<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| FractionError::Parse(s.to_string()))
        };
        match s.split_once('/') {
            Some((num, den)) => Fraction::new(parse(num)?, parse(den)?),
            None => Ok(Fraction::from_integer(parse(s)?)),
        }
    }
}
