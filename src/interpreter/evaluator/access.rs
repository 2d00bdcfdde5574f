use std::io::Write;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        lexer::Token,
        value::core::Value,
    },
    util::num::usize_to_i64_checked,
};

/// Returns the character at `index`, counting from the end for negative
/// indices.
///
/// # Errors
/// Returns `RuntimeError::IndexOutOfBounds` when the index falls outside the
/// string.
///
/// # Example
/// ```
/// use cove::interpreter::evaluator::access::index_str;
///
/// assert_eq!(index_str("hello", 1, 1, 1).unwrap(), "e");
/// assert_eq!(index_str("hello", -1, 1, 1).unwrap(), "o");
/// assert!(index_str("hello", 5, 1, 1).is_err());
/// ```
pub fn index_str(text: &str, index: i64, line: usize, column: usize) -> EvalResult<String> {
    let len = text.chars().count();
    let signed_len = usize_to_i64_checked(len, line, column)?;
    let position = if index < 0 { index + signed_len } else { index };

    usize::try_from(position).ok()
                             .and_then(|position| text.chars().nth(position))
                             .map(String::from)
                             .ok_or(RuntimeError::IndexOutOfBounds { len,
                                                                     index,
                                                                     line,
                                                                     column })
}

/// Returns the characters from `start` up to the exclusive `end`.
///
/// Negative bounds count from the end, and bounds outside the string are
/// clamped to it, so slicing never fails.
///
/// # Example
/// ```
/// use cove::interpreter::evaluator::access::slice_str;
///
/// assert_eq!(slice_str("hello", 1, 3), "el");
/// assert_eq!(slice_str("hello", -3, 100), "llo");
/// assert_eq!(slice_str("hello", 4, 2), "");
/// ```
#[must_use]
pub fn slice_str(text: &str, start: i64, end: i64) -> String {
    let len = text.chars().count();
    let clamp = |bound: i64| -> usize {
        let bound = if bound < 0 {
            bound.saturating_add(i64::try_from(len).unwrap_or(i64::MAX))
        } else {
            bound
        };
        usize::try_from(bound.max(0)).map_or(len, |bound| bound.min(len))
    };

    let (start, end) = (clamp(start), clamp(end));
    if start >= end {
        return String::new();
    }
    text.chars().skip(start).take(end - start).collect()
}

impl<W: Write> Interpreter<W> {
    /// Evaluates `s[i]` or `s[i:j]`.
    ///
    /// The accessed value must be a string and the bounds integers.
    pub(crate) fn eval_access(&mut self,
                              accessor: &Expr,
                              start: &Expr,
                              end: Option<&Expr>,
                              token: &Token)
                              -> EvalResult<Value> {
        let text = match self.eval_value(accessor)? {
            Value::Str(text) => text,
            other => {
                return Err(RuntimeError::TypeError { details: format!("cannot index into {}",
                                                                      other.type_name()),
                                                     line:    token.line,
                                                     column:  token.column, });
            },
        };

        let (line, column) = start.position();
        let start = self.eval_value(start)?.as_integer("index", line, column)?;

        match end {
            None => Ok(Value::Str(index_str(&text, start, token.line, token.column)?)),
            Some(end) => {
                let (line, column) = end.position();
                let end = self.eval_value(end)?.as_integer("slice end", line, column)?;
                Ok(Value::Str(slice_str(&text, start, end)))
            },
        }
    }
}
