/// Binary operator parsing.
///
/// One function per precedence level, from logical OR down to
/// multiplication, each left-associative.
pub mod binary;
/// Block parsing.
///
/// Parses brace-delimited statement lists used by conditionals, loops and
/// function bodies.
pub mod block;
/// Parser entry points.
///
/// Contains the program and expression entry points, the conditional parser
/// and the range parser shared by `for` loops.
pub mod core;
/// Statement parsing.
///
/// Declarations, assignments, loops, jumps, function declarations and
/// expression statements.
pub mod statement;
/// Unary and primary expression parsing.
///
/// Prefix operators, literals, identifiers, calls, grouping and postfix
/// indexing or slicing.
pub mod unary;
/// Shared parsing helpers.
///
/// Token expectations, error construction and comma-separated lists.
pub mod utils;

pub use self::{
    core::{ParseResult, parse},
    utils::MAX_NESTING_DEPTH,
};
