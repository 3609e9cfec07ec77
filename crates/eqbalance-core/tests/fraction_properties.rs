//! Property-based invariant tests for `Fraction`.
//!
//! 1. Construction always yields a positive denominator in lowest terms
//! 2. Addition and subtraction undo each other
//! 3. Multiplication and division by a non-zero value undo each other
//! 4. Ordering agrees with cross-multiplication
//! 5. Display output parses back to the same value
//! 6. `lerp` hits both endpoints exactly

use eqbalance_core::Fraction;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn fraction_strategy() -> impl Strategy<Value = Fraction> {
    (-10_000i64..10_000, 1i64..1_000).prop_map(|(n, d)| Fraction::new(n, d).unwrap())
}

fn nonzero_fraction_strategy() -> impl Strategy<Value = Fraction> {
    fraction_strategy().prop_filter("non-zero", |f| !f.is_zero())
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalized_form(n in -1_000_000i64..1_000_000, d in -1_000i64..1_000) {
        prop_assume!(d != 0);
        let f = Fraction::new(n, d).unwrap();
        prop_assert!(f.den() > 0);
        prop_assert_eq!(gcd(f.num(), f.den()), 1);
        prop_assert_eq!(f.num() as i128 * d as i128, n as i128 * f.den() as i128);
    }

    #[test]
    fn add_sub_roundtrip(a in fraction_strategy(), b in fraction_strategy()) {
        prop_assert_eq!((a + b) - b, a);
        prop_assert_eq!(a - a, Fraction::ZERO);
    }

    #[test]
    fn mul_div_roundtrip(a in fraction_strategy(), b in nonzero_fraction_strategy()) {
        prop_assert_eq!((a * b) / b, a);
    }

    #[test]
    fn ordering_matches_cross_multiplication(a in fraction_strategy(), b in fraction_strategy()) {
        let lhs = a.num() as i128 * b.den() as i128;
        let rhs = b.num() as i128 * a.den() as i128;
        prop_assert_eq!(a.cmp(&b), lhs.cmp(&rhs));
    }

    #[test]
    fn display_parses_back(a in fraction_strategy()) {
        let parsed: Fraction = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    #[test]
    fn lerp_endpoints(a in fraction_strategy(), b in fraction_strategy()) {
        prop_assert_eq!(Fraction::lerp(a, b, 0.0), a);
        prop_assert_eq!(Fraction::lerp(a, b, 1.0), b);
    }
}
