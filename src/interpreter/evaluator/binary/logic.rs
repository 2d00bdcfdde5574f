use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{binary::scalar::unsupported, core::EvalResult},
        value::core::Value,
    },
};

/// Evaluates a logical operation between two boolean values.
///
/// Both operands must be booleans; there is no implicit truthiness.
///
/// # Example
/// ```
/// use cove::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::logic::eval_logic, value::core::Value},
/// };
///
/// let result = eval_logic(BinaryOperator::Or, &Value::Bool(false), &Value::Bool(true), 1, 1);
/// assert_eq!(result.unwrap(), Value::Bool(true));
/// ```
pub fn eval_logic(op: BinaryOperator,
                  left: &Value,
                  right: &Value,
                  line: usize,
                  column: usize)
                  -> EvalResult<Value> {
    let context = format!("operand of '{op}'");
    let a = left.as_bool(&context, line, column)?;
    let b = right.as_bool(&context, line, column)?;

    match op {
        BinaryOperator::And => Ok(Value::Bool(a && b)),
        BinaryOperator::Or => Ok(Value::Bool(a || b)),
        _ => Err(unsupported(op, left, right, line, column)),
    }
}
