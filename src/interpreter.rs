/// The analyzer module checks scoping rules before a program runs.
///
/// It walks the syntax tree once, keeping a tree of symbol tables rooted at
/// the built-ins, and rejects programs that use undeclared names, redeclare a
/// name in the same scope, place `break`, `continue` or `return` where they
/// cannot apply, or call a function with the wrong number of arguments.
///
/// # Responsibilities
/// - Builds one scope per function body, branch and loop body.
/// - Resolves every variable and function reference lexically.
/// - Reports the first violation with its source position.
pub mod analyzer;
/// The evaluator module executes a checked program.
///
/// The evaluator walks the syntax tree, keeps variables in a stack of frames,
/// evaluates expressions and writes `print` output to an injected writer.
///
/// # Responsibilities
/// - Executes statements and reports `break`, `continue` and `return` as
///   control outcomes.
/// - Pushes and pops one frame per program, taken branch, loop iteration and
///   call.
/// - Reports runtime errors such as division by zero or type mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// carrying its kind, literal text and 1-based position. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Decodes numeric and string literals and skips comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser consumes the token stream produced by the lexer and constructs
/// a [`Program`](crate::ast::Program) by recursive descent.
///
/// # Responsibilities
/// - Converts tokens into expressions and statements.
/// - Encodes operator precedence and associativity in the grammar.
/// - Reports the first syntax error with the expected construct.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum: integers, floats, booleans and strings.
/// - Converts literals into values and values into their declared types.
pub mod value;
