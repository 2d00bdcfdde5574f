/// Numeric conversion and rounding helpers.
///
/// Conversions between `i64`, `usize` and `f64` that report out of range
/// values instead of wrapping, and floor division with the matching modulo.
pub mod num;
