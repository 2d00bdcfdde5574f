use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{floor_div_f64, floor_div_i64, floor_mod_f64, floor_mod_i64},
};

/// Evaluates an arithmetic operation.
///
/// - Two integers use checked integer arithmetic, except for `/` which always
///   produces a float.
/// - An integer mixed with a float is widened to a float.
/// - `+` on two strings concatenates them.
///
/// Division, floor division and modulo by zero fail, as does integer
/// overflow.
///
/// # Example
/// ```
/// use cove::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::scalar::eval_scalar_op, value::core::Value},
/// };
///
/// let x = Value::Integer(7);
/// let y = Value::Integer(2);
///
/// assert_eq!(eval_scalar_op(BinaryOperator::Div, &x, &y, 1, 1).unwrap(), Value::Float(3.5));
/// assert_eq!(eval_scalar_op(BinaryOperator::Mod, &Value::Integer(-7), &y, 1, 1).unwrap(),
///            Value::Integer(1));
/// ```
pub fn eval_scalar_op(op: BinaryOperator,
                      left: &Value,
                      right: &Value,
                      line: usize,
                      column: usize)
                      -> EvalResult<Value> {
    use BinaryOperator::{Add, Div, FloorDiv, Mod, Mul, Sub};
    use Value::{Float, Integer, Str};

    match (left, right) {
        (Str(a), Str(b)) if op == Add => Ok(Str(format!("{a}{b}"))),
        (Integer(a), Integer(b)) if op != Div => {
            let (a, b) = (*a, *b);
            let result = match op {
                Add => a.checked_add(b),
                Sub => a.checked_sub(b),
                Mul => a.checked_mul(b),
                FloorDiv | Mod => {
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero { line, column });
                    }
                    if op == FloorDiv { floor_div_i64(a, b) } else { floor_mod_i64(a, b) }
                },
                _ => return Err(unsupported(op, left, right, line, column)),
            };
            result.map(Integer)
                  .ok_or(RuntimeError::Overflow { line, column })
        },
        _ => {
            let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                return Err(unsupported(op, left, right, line, column));
            };
            if matches!(op, Div | FloorDiv | Mod) && b == 0.0 {
                return Err(RuntimeError::DivisionByZero { line, column });
            }
            Ok(Float(match op {
                         Add => a + b,
                         Sub => a - b,
                         Mul => a * b,
                         Div => a / b,
                         FloorDiv => floor_div_f64(a, b),
                         Mod => floor_mod_f64(a, b),
                         _ => return Err(unsupported(op, left, right, line, column)),
                     }))
        },
    }
}

/// Error for an operator applied to operand types it does not support.
pub(crate) fn unsupported(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize,
                          column: usize)
                          -> RuntimeError {
    RuntimeError::TypeError { details: format!("cannot apply '{op}' to {} and {}",
                                               left.type_name(),
                                               right.type_name()),
                              line,
                              column }
}
