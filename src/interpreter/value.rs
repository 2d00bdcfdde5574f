/// Runtime values.
///
/// Defines the `Value` enum with its conversions, truthiness checks and the
/// type compatibility rule used by typed bindings.
pub mod core;
