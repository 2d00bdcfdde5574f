use std::io::Write;

use crate::{
    ast::{Expr, StatementList, VarDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter, coerce},
            stack::FrameKind,
        },
        lexer::Token,
        value::core::Value,
    },
};

/// Half-open integer range with a non-zero step.
///
/// Iteration stops at `end` (exclusive) or when the next value would
/// overflow.
///
/// # Example
/// ```
/// use cove::interpreter::evaluator::for_loop::IntRange;
///
/// let up: Vec<i64> = IntRange::new(0, 10, 3).unwrap().collect();
/// assert_eq!(up, [0, 3, 6, 9]);
///
/// let down: Vec<i64> = IntRange::new(5, 0, -2).unwrap().collect();
/// assert_eq!(down, [5, 3, 1]);
///
/// assert!(IntRange::new(0, 1, 0).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct IntRange {
    next: Option<i64>,
    end:  i64,
    step: i64,
}

impl IntRange {
    /// Creates the range `start : end : step`, or `None` for a zero step.
    #[must_use]
    pub const fn new(start: i64, end: i64, step: i64) -> Option<Self> {
        if step == 0 {
            return None;
        }
        Some(Self { next: Some(start),
                    end,
                    step })
    }
}

impl Iterator for IntRange {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        let in_range = if self.step > 0 {
            current < self.end
        } else {
            current > self.end
        };
        if !in_range {
            self.next = None;
            return None;
        }
        self.next = current.checked_add(self.step);
        Some(current)
    }
}

/// The values a `for` loop visits.
enum LoopValues {
    Range(IntRange),
    Chars(std::vec::IntoIter<char>),
}

impl Iterator for LoopValues {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Self::Range(range) => range.next().map(Value::Integer),
            Self::Chars(chars) => chars.next().map(|c| Value::Str(c.to_string())),
        }
    }
}

impl<W: Write> Interpreter<W> {
    /// Executes a `for` loop.
    ///
    /// The iterable is evaluated once, before the loop frame exists. A
    /// single `for` frame then holds the loop variable for the whole loop;
    /// the variable is rebound before each iteration.
    ///
    /// Two iterables are supported:
    ///
    /// 1. **Range:** `for var(int) i in start:end:step { body }` visits
    ///    integers from `start` up to (or, for a negative step, down to) the
    ///    exclusive `end`.
    ///
    /// 2. **String:** `for var(str) c in text { body }` visits every
    ///    character as a one-character string.
    pub(crate) fn exec_for(&mut self,
                           variable: &VarDecl,
                           iterable: &Expr,
                           body: &StatementList,
                           token: &Token)
                           -> EvalResult<Flow> {
        let Some(declarator) = variable.variables.first() else {
            return Err(RuntimeError::InvalidRange { details: "a for loop needs a loop variable".to_string(),
                                                    line:    token.line,
                                                    column:  token.column, });
        };
        let values = self.eval_iterable(iterable)?;
        let ty = variable.var_type.name;

        self.in_frame("for", FrameKind::For, |this| {
                for value in values {
                    let value = coerce(&declarator.name, ty, value, &declarator.token)?;
                    this.stack.declare(&declarator.name, Some(ty), Some(value));

                    match this.exec_statements(body)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {},
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Normal)
            })
    }

    fn eval_iterable(&mut self, iterable: &Expr) -> EvalResult<LoopValues> {
        if let Expr::Range { start,
                             end,
                             step,
                             token, } = iterable
        {
            let start = self.eval_bound(start, "range start")?;
            let end = self.eval_bound(end, "range end")?;
            let step = match step {
                Some(step) => self.eval_bound(step, "range step")?,
                None => 1,
            };
            let range = IntRange::new(start, end, step).ok_or_else(|| {
                            RuntimeError::InvalidRange { details: "step must not be zero".to_string(),
                                                         line:    token.line,
                                                         column:  token.column, }
                        })?;
            return Ok(LoopValues::Range(range));
        }

        let (line, column) = iterable.position();
        match self.eval_value(iterable)? {
            Value::Str(text) => {
                let chars: Vec<char> = text.chars().collect();
                Ok(LoopValues::Chars(chars.into_iter()))
            },
            other => Err(RuntimeError::TypeError { details: format!("cannot iterate over {}",
                                                                    other.type_name()),
                                                   line,
                                                   column }),
        }
    }

    fn eval_bound(&mut self, expr: &Expr, context: &str) -> EvalResult<i64> {
        let (line, column) = expr.position();
        self.eval_value(expr)?.as_integer(context, line, column)
    }
}
