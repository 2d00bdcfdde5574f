use std::io::Write;

use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        lexer::Token,
        value::core::Value,
    },
};

/// Applies a unary operator to a value.
///
/// `+` and `-` accept integers and floats; negating `i64::MIN` overflows.
/// `not` accepts booleans only.
///
/// # Example
/// ```
/// use cove::{
///     ast::UnaryOperator,
///     interpreter::{evaluator::unary::eval_unary, value::core::Value},
/// };
///
/// assert_eq!(eval_unary(UnaryOperator::Negate, &Value::Integer(4), 1, 1).unwrap(),
///            Value::Integer(-4));
/// assert!(eval_unary(UnaryOperator::Not, &Value::Integer(4), 1, 1).is_err());
/// ```
pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize, column: usize) -> EvalResult<Value> {
    match (op, value) {
        (UnaryOperator::Plus, Value::Integer(_) | Value::Float(_)) => Ok(value.clone()),
        (UnaryOperator::Negate, Value::Integer(n)) => {
            n.checked_neg()
             .map(Value::Integer)
             .ok_or(RuntimeError::Overflow { line, column })
        },
        (UnaryOperator::Negate, Value::Float(r)) => Ok(Value::Float(-r)),
        (UnaryOperator::Not, value) => Ok(Value::Bool(!value.as_bool("operand of 'not'", line, column)?)),
        (op, value) => {
            Err(RuntimeError::TypeError { details: format!("cannot apply unary '{}' to {}",
                                                           op.to_string().trim_end(),
                                                           value.type_name()),
                                          line,
                                          column })
        },
    }
}

impl<W: Write> Interpreter<W> {
    /// Evaluates the operand, then applies the operator.
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                expr: &Expr,
                                token: &Token)
                                -> EvalResult<Value> {
        let value = self.eval_value(expr)?;
        eval_unary(op, &value, token.line, token.column)
    }
}
