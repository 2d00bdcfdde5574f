/// Operator dispatch and short-circuit evaluation.
pub mod core;
/// Arithmetic on integers, floats and strings.
///
/// Checked integer arithmetic, true division, floor division and floor
/// modulo, plus string concatenation.
pub mod scalar;
/// Equality and ordering comparisons.
pub mod comparison;
/// Logical `and` and `or` on booleans.
pub mod logic;

pub use self::core::eval_binary;
