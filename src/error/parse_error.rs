/// Represents all errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found a token that does not fit the grammar at this point.
    #[error("Error on line {line}, column {column}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// Description of what the grammar expected.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Reached the end of input in the middle of a construct.
    #[error("Error on line {line}, column {column}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// Description of what the grammar expected.
        expected: String,
        /// The source line where the input ended.
        line:     usize,
        /// The source column where the input ended.
        column:   usize,
    },
    /// The left-hand side of an assignment is not a variable.
    #[error("Error on line {line}, column {column}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `for` loop declares more than one variable or initializes it.
    #[error("Error on line {line}, column {column}: A for loop declares exactly one uninitialized variable.")]
    InvalidLoopVariable {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Blocks, groupings, calls or prefix operators are nested too deeply.
    #[error("Error on line {line}, column {column}: Nesting deeper than {limit} levels.")]
    NestingTooDeep {
        /// The deepest nesting the parser accepts.
        limit:  usize,
        /// The source line of the construct that exceeded the limit.
        line:   usize,
        /// The source column of the construct that exceeded the limit.
        column: usize,
    },
}
