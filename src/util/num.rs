use std::cmp::Ordering;

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Widens an integer to a float the way host arithmetic does.
///
/// Integers beyond `2^53` round to the nearest representable float.
///
/// ## Example
/// ```
/// use cove::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(-7), -7.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Converts an `f64` to `i64`, truncating toward zero.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` for NaN and infinities and
/// `RuntimeError::Overflow` for values outside the `i64` range.
///
/// ## Example
/// ```
/// use cove::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-2.9, 1, 1).unwrap(), -2);
/// assert!(matches!(f64_to_i64_checked(1e20, 1, 1),
///                  Err(RuntimeError::Overflow { line: 1, column: 1 })));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize, column: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("cannot convert {value} to int"),
                                                   line,
                                                   column });
    }
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(RuntimeError::Overflow { line, column });
    }
    Ok(truncated as i64)
}

/// Orders an integer against a float without rounding the integer.
///
/// Returns `None` when `b` is NaN.
///
/// ## Example
/// ```
/// use std::cmp::Ordering;
///
/// use cove::util::num::cmp_i64_f64;
///
/// assert_eq!(cmp_i64_f64(9_007_199_254_740_993, 9_007_199_254_740_992.0), Some(Ordering::Greater));
/// assert_eq!(cmp_i64_f64(-1, -0.5), Some(Ordering::Less));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn cmp_i64_f64(a: i64, b: f64) -> Option<Ordering> {
    if b.is_nan() {
        return None;
    }
    // i64::MIN as f64 is exactly -2^63; every f64 at or past 2^63 exceeds i64::MAX.
    if b >= -(i64::MIN as f64) {
        return Some(Ordering::Less);
    }
    if b < i64::MIN as f64 {
        return Some(Ordering::Greater);
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(b - whole)),
        ordering => Some(ordering),
    }
}

/// Converts a length or count to `i64`.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the value does not fit.
pub fn usize_to_i64_checked(value: usize, line: usize, column: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { line, column })
}

/// Integer division rounding toward negative infinity.
///
/// Returns `None` when `b` is zero or the quotient overflows (`i64::MIN // -1`).
///
/// ## Example
/// ```
/// use cove::util::num::floor_div_i64;
///
/// assert_eq!(floor_div_i64(7, 2), Some(3));
/// assert_eq!(floor_div_i64(-7, 2), Some(-4));
/// assert_eq!(floor_div_i64(7, 0), None);
/// ```
#[must_use]
pub const fn floor_div_i64(a: i64, b: i64) -> Option<i64> {
    let Some(quotient) = a.checked_div(b) else {
        return None;
    };
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Integer remainder taking the sign of the divisor, matching
/// [`floor_div_i64`] so that `floor_div(a, b) * b + floor_mod(a, b) == a`.
///
/// Returns `None` when `b` is zero.
///
/// ## Example
/// ```
/// use cove::util::num::floor_mod_i64;
///
/// assert_eq!(floor_mod_i64(-7, 2), Some(1));
/// assert_eq!(floor_mod_i64(7, -2), Some(-1));
/// ```
#[must_use]
pub const fn floor_mod_i64(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    // checked_rem only fails for i64::MIN % -1, whose remainder is 0.
    let remainder = match a.checked_rem(b) {
        Some(remainder) => remainder,
        None => 0,
    };
    if remainder != 0 && (remainder < 0) != (b < 0) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

/// Float division rounding toward negative infinity. `b` must not be zero.
#[must_use]
pub fn floor_div_f64(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

/// Float remainder taking the sign of the divisor. `b` must not be zero.
///
/// ## Example
/// ```
/// use cove::util::num::floor_mod_f64;
///
/// assert_eq!(floor_mod_f64(-7.5, 2.0), 0.5);
/// assert_eq!(floor_mod_f64(7.5, -2.0), -0.5);
/// ```
#[must_use]
pub fn floor_mod_f64(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
        remainder + b
    } else {
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_identity_holds() {
        for a in -9..=9 {
            for b in [-4, -3, -1, 1, 2, 5] {
                let q = floor_div_i64(a, b).unwrap();
                let r = floor_mod_i64(a, b).unwrap();
                assert_eq!(q * b + r, a, "{a} // {b}");
                assert!(r == 0 || (r < 0) == (b < 0));
            }
        }
    }

    #[test]
    fn overflow_and_zero_divisors() {
        assert_eq!(floor_div_i64(i64::MIN, -1), None);
        assert_eq!(floor_mod_i64(i64::MIN, -1), Some(0));
        assert_eq!(floor_mod_i64(3, 0), None);
        assert_eq!(floor_div_i64(i64::MIN, 1), Some(i64::MIN));
    }

    #[test]
    fn float_conversion_bounds() {
        assert_eq!(f64_to_i64_checked(3.99, 1, 2), Ok(3));
        assert!(matches!(f64_to_i64_checked(f64::NAN, 1, 2),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(f64_to_i64_checked(9.3e18, 1, 2), Err(RuntimeError::Overflow { .. })));
        assert_eq!(usize_to_i64_checked(12, 1, 1), Ok(12));
    }

    #[test]
    fn integer_float_ordering_is_exact() {
        assert_eq!(cmp_i64_f64(2, 2.0), Some(Ordering::Equal));
        assert_eq!(cmp_i64_f64(9_007_199_254_740_993, 9_007_199_254_740_992.0), Some(Ordering::Greater));
        assert_eq!(cmp_i64_f64(3, 3.5), Some(Ordering::Less));
        assert_eq!(cmp_i64_f64(-3, -3.5), Some(Ordering::Greater));
        assert_eq!(cmp_i64_f64(i64::MAX, 9.223_372_036_854_775_808e18), Some(Ordering::Less));
        assert_eq!(cmp_i64_f64(i64::MIN, -9.223_372_036_854_775_808e18), Some(Ordering::Equal));
        assert_eq!(cmp_i64_f64(i64::MIN, f64::NEG_INFINITY), Some(Ordering::Greater));
        assert_eq!(cmp_i64_f64(0, f64::NAN), None);
    }
}
