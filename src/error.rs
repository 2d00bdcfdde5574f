/// Lexing errors.
///
/// Raised by the tokenizer when no token rule matches the input, when a
/// string literal or comment is left open, or when an integer literal does not
/// fit into 64 bits.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// the token stream. Parse errors name the expected construct and the token
/// actually found.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include things like division by zero, type mismatches,
/// unbound variables or out of range string indices.
pub mod runtime_error;
/// Semantic errors.
///
/// Raised by the scope checker before execution: undeclared and redeclared
/// names, misplaced `break`, `continue` and `return`, and call arity mismatches.
pub mod semantic_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use semantic_error::SemanticError;

/// Any failure of the four pipeline stages.
///
/// Each stage fails fast with its own error type; this wrapper lets the
/// [`run`](crate::run) entry point and the command line report whichever stage
/// failed first.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tokenizer rejected the source text.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The parser rejected the token stream.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The scope checker rejected the program.
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    /// Execution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
