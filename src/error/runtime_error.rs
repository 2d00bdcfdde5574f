/// Represents all errors that can occur during evaluation and runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// A variable was read before any value was bound to it.
    #[error("Error on line {line}, column {column}: Variable '{name}' is not bound to a value.")]
    UnboundVariable {
        /// The name of the variable.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Called a function that is not in scope.
    #[error("Error on line {line}, column {column}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// An operator was applied to operands it does not support.
    #[error("Error on line {line}, column {column}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A value does not fit the declared type of the binding it is stored in.
    #[error("Error on line {line}, column {column}: Cannot store a {found} value in '{name}' of type {expected}.")]
    TypeMismatch {
        /// The binding name.
        name:     String,
        /// The declared type.
        expected: String,
        /// The type of the offending value.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Error on line {line}, column {column}: Function '{name}' expects {expected} argument(s), but {found} were given.")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// The accepted argument count.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// An expression that produces no value was used as a value.
    #[error("Error on line {line}, column {column}: Value missing.")]
    MissingValue {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A value-returning function finished without `return`.
    #[error("Error on line {line}, column {column}: Function '{name}' ended without returning a value.")]
    MissingReturnValue {
        /// The function name.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Arithmetic operation overflowed.
    #[error("Error on line {line}, column {column}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Attempted division or modulo by zero.
    #[error("Error on line {line}, column {column}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Tried to index a string outside its bounds.
    #[error("Error on line {line}, column {column}: Index out of bounds. Length is {len}, but found {index} instead.")]
    IndexOutOfBounds {
        /// The length of the indexed string.
        len:    usize,
        /// The index that was actually requested.
        index:  i64,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A range has a zero step.
    #[error("Error on line {line}, column {column}: Invalid range: {details}.")]
    InvalidRange {
        /// Details describing why the range is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// An argument was invalid for a built-in function.
    #[error("Error on line {line}, column {column}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// An `assert` call received `false`.
    #[error("Error on line {line}, column {column}: Assertion failed.")]
    AssertionFailed {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Function calls nested deeper than the configured limit.
    #[error("Error on line {line}, column {column}: Maximum call depth of {limit} exceeded.")]
    RecursionLimit {
        /// The configured maximum call depth.
        limit:  usize,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Writing program output failed.
    #[error("Error on line {line}, column {column}: Failed to write output: {details}.")]
    Output {
        /// The underlying I/O error message.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
}
