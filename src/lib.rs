//! # cove
//!
//! cove is a small statically scoped scripting language written in Rust.
//! Source text goes through four stages: the tokenizer, the parser, the scope
//! checker and the tree-walking interpreter. Each stage fails fast with its own
//! error type carrying a 1-based line and column.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{self, Write};

use tracing::debug;

use crate::{
    ast::Program,
    interpreter::{
        analyzer::analyze,
        evaluator::{Interpreter, InterpreterOptions},
        lexer::tokenize,
        parser::parse,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression trees built by the parser,
/// checked by the analyzer and executed by the evaluator, and prints them back
/// as source text.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches the originating token to nodes for error reporting.
pub mod ast;
/// Provides error types for every stage.
///
/// Each stage has its own error enum; [`Error`](error::Error) wraps whichever
/// stage failed first.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, analyzer,
///   evaluator).
/// - Attaches line and column numbers to every error.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together the tokenizer, parser, analyzer, evaluator and
/// runtime values.
///
/// # Responsibilities
/// - Coordinates the four stages.
/// - Provides entry points for each stage on its own.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Floor division and modulo for integers and floats.
pub mod util;

pub use crate::error::Error;

/// Tokenizes, parses and checks `source` without running it.
///
/// # Examples
/// ```
/// use cove::{check, error::{Error, SemanticError}};
///
/// assert!(check("var(int) a = 1; print(a);").is_ok());
/// assert!(matches!(check("print(b);"),
///                  Err(Error::Semantic(SemanticError::UndeclaredVariable { .. }))));
/// ```
pub fn check(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized");
    let program = parse(&tokens)?;
    debug!(statements = program.body.statements.len(), "parsed");
    analyze(&program)?;
    debug!("analyzed");
    Ok(program)
}

/// Runs `source` through all four stages, printing to standard output.
///
/// # Examples
/// ```
/// use cove::run;
///
/// assert!(run("var(int) x = 1 + 2; assert(x == 3);").is_ok());
/// assert!(run("var(int) x = 1 // 0;").is_err());
/// ```
pub fn run(source: &str) -> Result<(), Error> {
    run_with_output(source, io::stdout().lock(), InterpreterOptions::default()).map(|_| ())
}

/// Runs `source`, sending `print` output to `output`.
///
/// The writer is handed back on success so callers can inspect what the
/// program printed.
///
/// # Examples
/// ```
/// use cove::{interpreter::evaluator::InterpreterOptions, run_with_output};
///
/// let output = run_with_output("for var(int) i in 0:3 { print(i); }",
///                              Vec::new(),
///                              InterpreterOptions::default()).unwrap();
/// assert_eq!(output, b"0\n1\n2\n");
/// ```
pub fn run_with_output<W: Write>(source: &str,
                                 output: W,
                                 options: InterpreterOptions)
                                 -> Result<W, Error> {
    let program = check(source)?;
    let mut interpreter = Interpreter::with_options(output, options);
    interpreter.run(&program)?;
    Ok(interpreter.into_output())
}
