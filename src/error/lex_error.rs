/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// No token rule matches the character at this position.
    #[error("Error on line {line}, column {column}: Unexpected character '{character}'.")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line:      usize,
        /// The source column where the error occurred.
        column:    usize,
    },
    /// A string literal is missing its closing quote.
    #[error("Error on line {line}, column {column}: Unterminated string literal.")]
    UnterminatedString {
        /// The source line of the opening quote.
        line:   usize,
        /// The source column of the opening quote.
        column: usize,
    },
    /// A `/*` comment is never closed.
    #[error("Error on line {line}, column {column}: Unterminated comment.")]
    UnterminatedComment {
        /// The source line of the opening `/*`.
        line:   usize,
        /// The source column of the opening `/*`.
        column: usize,
    },
    /// An integer literal does not fit into a 64-bit signed integer.
    #[error("Error on line {line}, column {column}: Integer literal {literal} is too large.")]
    IntegerTooLarge {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A float literal is too large to be represented as a finite `f64`.
    #[error("Error on line {line}, column {column}: Float literal {literal} is too large.")]
    FloatTooLarge {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
}
