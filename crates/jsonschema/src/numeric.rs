//! Numeric keyword helpers: `multipleOf`, `minimum`/`maximum` and their
//! `exclusive*` counterparts.
//!
//! The syntax tree stores every number as `f64` (see
//! [`jsonschema_document::NodePayload::Number`]), so unlike a
//! `serde_json::Number`-preserving validator there is no separate u64/i64
//! path to dispatch on here; comparisons are plain `f64` arithmetic.
use fraction::{BigFraction, BigUint};

/// Whether `value` is a multiple of `divisor`, per the `multipleOf` keyword.
///
/// Takes the cheap remainder path when it isn't poisoned by floating-point
/// drift, and falls back to exact rational arithmetic (mirroring the
/// fraction-denominator check the validator's integer-based cousin uses)
/// when the naive remainder is ambiguous.
#[must_use]
pub fn is_multiple_of(value: f64, divisor: f64) -> bool {
    if value.fract() == 0. && divisor.fract() == 0. {
        return value % divisor == 0.;
    }
    let remainder = (value / divisor) % 1.;
    if remainder.is_nan() {
        let fraction = BigFraction::from(value) / BigFraction::from(divisor);
        fraction.denom().map_or(true, |denom| denom == &BigUint::from(1_u8))
    } else {
        remainder.abs() < f64::EPSILON
    }
}

/// A `minimum`/`maximum` bound together with whether it excludes the limit
/// itself. Resolves the draft-4 vs draft-6+ `exclusiveMinimum`/
/// `exclusiveMaximum` duality: a boolean sibling of `minimum`/`maximum`
/// modifies that bound's exclusivity, while a numeric `exclusiveMinimum`/
/// `exclusiveMaximum` is an independent bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub limit: f64,
    pub exclusive: bool,
}

impl Bound {
    #[must_use]
    pub fn satisfied_as_lower(&self, value: f64) -> bool {
        if self.exclusive {
            value > self.limit
        } else {
            value >= self.limit
        }
    }

    #[must_use]
    pub fn satisfied_as_upper(&self, value: f64) -> bool {
        if self.exclusive {
            value < self.limit
        } else {
            value <= self.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4.0, 2.0, true)]
    #[test_case(4.0, 1.0, true)]
    #[test_case(3.0, 1.5, true)]
    #[test_case(4.5, 1.5, true)]
    #[test_case(4.5, 1.0, false)]
    fn multiple_of_matches_teacher_cases(value: f64, divisor: f64, expected: bool) {
        assert_eq!(is_multiple_of(value, divisor), expected);
    }

    #[test]
    fn non_exclusive_lower_bound_accepts_the_limit_itself() {
        let bound = Bound { limit: 5.0, exclusive: false };
        assert!(bound.satisfied_as_lower(5.0));
    }

    #[test]
    fn exclusive_lower_bound_rejects_the_limit_itself() {
        let bound = Bound { limit: 5.0, exclusive: true };
        assert!(!bound.satisfied_as_lower(5.0));
        assert!(bound.satisfied_as_lower(5.1));
    }

    #[test]
    fn exclusive_upper_bound_rejects_the_limit_itself() {
        let bound = Bound { limit: 5.0, exclusive: true };
        assert!(!bound.satisfied_as_upper(5.0));
        assert!(bound.satisfied_as_upper(4.9));
    }
}
