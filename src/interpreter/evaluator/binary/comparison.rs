use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{binary::scalar::unsupported, core::EvalResult},
        value::core::Value,
    },
    util::num::cmp_i64_f64,
};

/// Structural equality with numeric widening.
///
/// Integers and floats compare by exact numeric value, so `1 == 1.0` but
/// `2^53 + 1 != 2^53` written as a float. Values of otherwise different types
/// are never equal.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            cmp_i64_f64(*a, *b) == Some(Ordering::Equal)
        },
        _ => false,
    }
}

/// Evaluates a comparison of the form `Value <Operator> Value`.
///
/// Equality accepts any operands (see [`values_equal`]). Ordering is defined
/// for numbers, with mixed integer and float operands compared exactly, and
/// for two strings, compared lexicographically.
///
/// # Example
/// ```
/// use cove::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::comparison::eval_comparison, value::core::Value},
/// };
///
/// let result = eval_comparison(BinaryOperator::Less, &Value::Integer(3), &Value::Float(3.5), 1, 1);
/// assert_eq!(result.unwrap(), Value::Bool(true));
/// ```
pub fn eval_comparison(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize,
                       column: usize)
                       -> EvalResult<Value> {
    let ordering = match op {
        BinaryOperator::Equal => return Ok(Value::Bool(values_equal(left, right))),
        BinaryOperator::NotEqual => return Ok(Value::Bool(!values_equal(left, right))),
        _ => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => cmp_i64_f64(*a, *b),
            (Value::Float(a), Value::Integer(b)) => cmp_i64_f64(*b, *a).map(Ordering::reverse),
            _ => return Err(unsupported(op, left, right, line, column)),
        },
    };

    // NaN compares false against everything.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };

    Ok(Value::Bool(match op {
                       BinaryOperator::Less => ordering == Ordering::Less,
                       BinaryOperator::Greater => ordering == Ordering::Greater,
                       BinaryOperator::LessEqual => ordering != Ordering::Greater,
                       BinaryOperator::GreaterEqual => ordering != Ordering::Less,
                       _ => return Err(unsupported(op, left, right, line, column)),
                   }))
}
