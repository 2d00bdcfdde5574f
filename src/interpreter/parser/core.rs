use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{Expr, Program, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_logical_or,
            block::{parse_block, parse_statement_list},
            utils::{NestingGuard, advance, eat, expect},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream into a [`Program`].
///
/// The stream must end with the end-of-input sentinel produced by
/// [`tokenize`](crate::interpreter::lexer::tokenize); every token before it has
/// to belong to a statement.
///
/// # Errors
/// Returns the first `ParseError` encountered.
///
/// # Example
/// ```
/// use cove::interpreter::{lexer::tokenize, parser::parse};
///
/// let tokens = tokenize("var(int) a = 1, b = 2; a += b;").unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(program.body.statements.len(), 2);
/// ```
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let body = parse_statement_list(&mut iter, &TokenKind::Eof)?;
    expect(&mut iter, &TokenKind::Eof, "end of input")?;

    debug!(statements = body.statements.len(), "parsed program");
    Ok(Program { body })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    parse_logical_or(tokens)
}

/// Parses an expression that may be a range.
///
/// Ranges only appear where an iterable is expected, so the `:` separators are
/// not part of the general expression grammar.
///
/// Grammar: `range := expression (":" expression (":" expression)?)?`
pub fn parse_range_or_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let start = parse_expression(tokens)?;

    let Some(Token { kind: TokenKind::Colon,
                     .. }) = tokens.peek()
    else {
        return Ok(start);
    };
    let token = advance(tokens, "':'")?.clone();
    let end = parse_expression(tokens)?;
    let step = if eat(tokens, &TokenKind::Colon) {
        Some(Box::new(parse_expression(tokens)?))
    } else {
        None
    };

    Ok(Expr::Range { start: Box::new(start),
                     end: Box::new(end),
                     step,
                     token })
}

/// Parses an `if` statement with any number of `elseif` branches and an
/// optional `else`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     elseif <condition> { ... }
///     else { ... }
/// ```
/// Conditions are ordinary expressions, so the customary parentheses are just
/// grouping.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the `if` keyword.
///
/// # Returns
/// A `Statement::Conditional` with its branches in source order.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, &TokenKind::If, "'if'")?.clone();

    let mut branches = vec![(parse_expression(tokens)?, parse_block(tokens)?)];
    while eat(tokens, &TokenKind::Elseif) {
        branches.push((parse_expression(tokens)?, parse_block(tokens)?));
    }

    let else_body = if eat(tokens, &TokenKind::Else) {
        Some(parse_block(tokens)?)
    } else {
        None
    };

    Ok(Statement::Conditional { branches,
                                else_body,
                                token })
}
