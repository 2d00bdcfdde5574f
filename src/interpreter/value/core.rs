use crate::{
    ast::{LiteralValue, TypeName},
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::i64_to_f64,
};

/// Represents a runtime value in the interpreter.
///
/// Values live in the bindings of stack frames and are produced by
/// expressions, built-ins and function returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison and logical operators and required by the
    /// conditions of `if` and `while`.
    Bool(bool),
    /// An immutable string.
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Float(r) => Self::Float(*r),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Str(s) => Self::Str(s.clone()),
        }
    }
}

impl Value {
    /// The type this value belongs to.
    #[must_use]
    pub const fn type_name(&self) -> TypeName {
        match self {
            Self::Integer(_) => TypeName::Int,
            Self::Float(_) => TypeName::Float,
            Self::Bool(_) => TypeName::Bool,
            Self::Str(_) => TypeName::Str,
        }
    }

    /// Converts the value to `bool`, or returns an error if not boolean.
    ///
    /// Used for conditions and logical operators; there is no implicit
    /// truthiness.
    ///
    /// # Example
    /// ```
    /// use cove::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool("condition", 1, 1), Ok(true));
    /// assert!(Value::Integer(1).as_bool("condition", 1, 1).is_err());
    /// ```
    pub fn as_bool(&self, context: &str, line: usize, column: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::TypeError { details: format!("{context} must be bool, found {}",
                                                                    other.type_name()),
                                                   line,
                                                   column }),
        }
    }

    /// Converts the value to `i64`, or returns an error if not an integer.
    pub fn as_integer(&self, context: &str, line: usize, column: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(RuntimeError::TypeError { details: format!("{context} must be int, found {}",
                                                                    other.type_name()),
                                                   line,
                                                   column }),
        }
    }

    /// Returns the numeric value as `f64`, widening integers.
    ///
    /// Returns `None` for booleans and strings.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(i64_to_f64(*n)),
            Self::Float(r) => Some(*r),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// Adapts the value to a declared type.
    ///
    /// A value of the declared type is kept as is and an integer widens to a
    /// float; anything else is rejected with `None`.
    ///
    /// # Example
    /// ```
    /// use cove::{ast::TypeName, interpreter::value::core::Value};
    ///
    /// assert_eq!(Value::Integer(2).coerce_to(TypeName::Float), Some(Value::Float(2.0)));
    /// assert_eq!(Value::Float(2.0).coerce_to(TypeName::Int), None);
    /// ```
    #[must_use]
    pub fn coerce_to(self, ty: TypeName) -> Option<Self> {
        match (self, ty) {
            (Self::Integer(n), TypeName::Float) => Some(Self::Float(i64_to_f64(n))),
            (value, ty) if value.type_name() == ty => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            // Debug keeps the fractional part of whole numbers: `2.0`, not `2`.
            Self::Float(r) => write!(f, "{r:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}
