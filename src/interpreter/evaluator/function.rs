/// Built-in function implementations.
///
/// Output, assertions, string length and the conversions between value
/// types.
pub mod builtin;
/// Function call evaluation.
///
/// Resolves user-defined functions through the stack, falls back to the
/// built-in table, binds parameters and runs the body in a function frame.
pub mod core;
