use std::io::Write;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{f64_to_i64_checked, i64_to_f64, usize_to_i64_checked},
};

/// Prints its arguments separated by spaces and followed by a newline.
///
/// Accepts any number of arguments, including none.
///
/// # Example
/// ```
/// use cove::interpreter::{evaluator::function::builtin::print, value::core::Value};
///
/// let mut output = Vec::new();
/// let result = print(&mut output, &[Value::Integer(42), Value::from("apples")], 1, 1).unwrap();
///
/// assert_eq!(result, None);
/// assert_eq!(output, b"42 apples\n");
/// ```
pub fn print(output: &mut dyn Write,
             args: &[Value],
             line: usize,
             column: usize)
             -> EvalResult<Option<Value>> {
    let text = args.iter()
                   .map(ToString::to_string)
                   .collect::<Vec<_>>()
                   .join(" ");

    writeln!(output, "{text}").map_err(|error| RuntimeError::Output { details: error.to_string(),
                                                                     line,
                                                                     column })?;
    Ok(None)
}

/// Fails with `RuntimeError::AssertionFailed` unless its argument is `true`.
pub fn assert(_: &mut dyn Write,
              args: &[Value],
              line: usize,
              column: usize)
              -> EvalResult<Option<Value>> {
    if single("assert", args, line, column)?.as_bool("assert argument", line, column)? {
        Ok(None)
    } else {
        Err(RuntimeError::AssertionFailed { line, column })
    }
}

/// Number of characters in a string.
///
/// # Example
/// ```
/// use cove::interpreter::{evaluator::function::builtin::len, value::core::Value};
///
/// let result = len(&mut std::io::sink(), &[Value::from("héllo")], 1, 1).unwrap();
/// assert_eq!(result, Some(Value::Integer(5)));
/// ```
pub fn len(_: &mut dyn Write,
           args: &[Value],
           line: usize,
           column: usize)
           -> EvalResult<Option<Value>> {
    match single("len", args, line, column)? {
        Value::Str(text) => {
            Ok(Some(Value::Integer(usize_to_i64_checked(text.chars().count(), line, column)?)))
        },
        other => Err(invalid_argument("len", other, line, column)),
    }
}

/// Converts any value to its printed form.
pub fn to_str(_: &mut dyn Write,
              args: &[Value],
              line: usize,
              column: usize)
              -> EvalResult<Option<Value>> {
    Ok(Some(Value::Str(single("str", args, line, column)?.to_string())))
}

/// Converts a value to an integer.
///
/// Floats are truncated toward zero, booleans become `0` or `1`, and strings
/// are parsed after trimming surrounding whitespace.
///
/// # Example
/// ```
/// use cove::interpreter::{evaluator::function::builtin::to_int, value::core::Value};
///
/// let mut sink = std::io::sink();
/// assert_eq!(to_int(&mut sink, &[Value::Float(-3.7)], 1, 1).unwrap(), Some(Value::Integer(-3)));
/// assert_eq!(to_int(&mut sink, &[Value::from(" 12 ")], 1, 1).unwrap(), Some(Value::Integer(12)));
/// assert!(to_int(&mut sink, &[Value::from("1.5")], 1, 1).is_err());
/// ```
pub fn to_int(_: &mut dyn Write,
              args: &[Value],
              line: usize,
              column: usize)
              -> EvalResult<Option<Value>> {
    let value = single("int", args, line, column)?;
    let n = match value {
        Value::Integer(n) => *n,
        Value::Float(r) => f64_to_i64_checked(*r, line, column)?,
        Value::Bool(b) => i64::from(*b),
        Value::Str(text) => text.trim()
                                .parse()
                                .map_err(|_| invalid_argument("int", value, line, column))?,
    };
    Ok(Some(Value::Integer(n)))
}

/// Converts a value to a float.
///
/// Integers widen, booleans become `0.0` or `1.0`, and strings are parsed
/// after trimming surrounding whitespace.
pub fn to_float(_: &mut dyn Write,
                args: &[Value],
                line: usize,
                column: usize)
                -> EvalResult<Option<Value>> {
    let value = single("float", args, line, column)?;
    let r = match value {
        Value::Integer(n) => i64_to_f64(*n),
        Value::Float(r) => *r,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Str(text) => text.trim()
                                .parse()
                                .map_err(|_| invalid_argument("float", value, line, column))?,
    };
    Ok(Some(Value::Float(r)))
}

/// Returns the only argument of a one-argument built-in.
fn single<'a>(function: &str, args: &'a [Value], line: usize, column: usize) -> EvalResult<&'a Value> {
    match args {
        [value] => Ok(value),
        _ => Err(RuntimeError::ArgumentCountMismatch { name: function.to_string(),
                                                       expected: "1".to_string(),
                                                       found: args.len(),
                                                       line,
                                                       column }),
    }
}

fn invalid_argument(function: &str, value: &Value, line: usize, column: usize) -> RuntimeError {
    let shown = match value {
        Value::Str(text) => format!("{text:?}"),
        other => other.to_string(),
    };
    RuntimeError::InvalidArgument { details: format!("{function}() cannot take {} {shown}",
                                                     value.type_name()),
                                    line,
                                    column }
}
