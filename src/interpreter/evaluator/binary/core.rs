use std::io::Write;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::{
            binary::{comparison::eval_comparison, logic::eval_logic, scalar::eval_scalar_op},
            core::{EvalResult, Interpreter},
        },
        lexer::Token,
        value::core::Value,
    },
};

/// Evaluates a binary operation between two values.
///
/// Arithmetic operators go to [`eval_scalar_op`], comparisons to
/// [`eval_comparison`] and logical operators to [`eval_logic`]. Logical
/// operators evaluated through this function do not short-circuit, since
/// both operands are already values.
///
/// # Parameters
/// - `op`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
/// - `line`, `column`: Position for error reporting.
///
/// # Example
/// ```
/// use cove::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::eval_binary, value::core::Value},
/// };
///
/// let result = eval_binary(BinaryOperator::FloorDiv, &Value::Integer(-7), &Value::Integer(2), 1, 1);
/// assert_eq!(result.unwrap(), Value::Integer(-4));
/// ```
pub fn eval_binary(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   line: usize,
                   column: usize)
                   -> EvalResult<Value> {
    use BinaryOperator::{
        Add, And, Div, Equal, FloorDiv, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
        NotEqual, Or, Sub,
    };

    match op {
        Add | Sub | Mul | Div | FloorDiv | Mod => eval_scalar_op(op, left, right, line, column),
        Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
            eval_comparison(op, left, right, line, column)
        },
        And | Or => eval_logic(op, left, right, line, column),
    }
}

impl<W: Write> Interpreter<W> {
    /// Evaluates a binary expression.
    ///
    /// `and` and `or` evaluate their right operand only when the left one
    /// does not decide the result; every other operator evaluates both
    /// operands left to right.
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 token: &Token)
                                 -> EvalResult<Value> {
        let left = self.eval_value(left)?;

        let short_circuit = match op {
            BinaryOperator::And => Some(false),
            BinaryOperator::Or => Some(true),
            _ => None,
        };
        if let Some(decisive) = short_circuit {
            let context = format!("left operand of '{op}'");
            if left.as_bool(&context, token.line, token.column)? == decisive {
                return Ok(Value::Bool(decisive));
            }
        }

        let right = self.eval_value(right)?;
        eval_binary(op, &left, &right, token.line, token.column)
    }
}
