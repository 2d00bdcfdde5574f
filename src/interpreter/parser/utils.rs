use std::{cell::Cell, iter::Peekable};

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Deepest nesting of blocks, expressions and prefix operators the parser
/// accepts.
///
/// Later stages walk the tree recursively, so this also bounds their depth.
pub const MAX_NESTING_DEPTH: usize = 64;

thread_local! {
    static NESTING_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// One level of parser recursion, released when dropped.
pub(crate) struct NestingGuard;

impl NestingGuard {
    /// Enters a nested construct starting at the next token.
    ///
    /// # Errors
    /// Returns `ParseError::NestingTooDeep` once the depth passes
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn enter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Self>
        where I: Iterator<Item = &'a Token>
    {
        let depth = NESTING_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            depth.set(next);
            next
        });
        // Dropping the guard on the error path restores the depth.
        let guard = Self;
        if depth > MAX_NESTING_DEPTH {
            let (line, column) = tokens.peek().map_or((0, 0), |token| (token.line, token.column));
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH,
                                                    line,
                                                    column });
        }
        Ok(guard)
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Builds the error for a token that does not fit the grammar.
///
/// Reaching the end-of-input sentinel is reported as
/// [`ParseError::UnexpectedEndOfInput`] rather than as an unexpected token.
pub(crate) fn unexpected(token: &Token, expected: &str) -> ParseError {
    if token.kind == TokenKind::Eof {
        ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                           line:     token.line,
                                           column:   token.column, }
    } else {
        ParseError::UnexpectedToken { expected: expected.to_string(),
                                      found:    token.kind.describe(),
                                      line:     token.line,
                                      column:   token.column, }
    }
}

/// Error for a stream that ends without the end-of-input sentinel.
pub(crate) fn exhausted(expected: &str) -> ParseError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                       line:     0,
                                       column:   0, }
}

/// Returns the kind of the next token without consuming it.
pub(crate) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> Option<&'a TokenKind>
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map(|token| &token.kind)
}

/// Consumes the next token and returns it.
///
/// # Errors
/// Returns a `ParseError` if the stream is exhausted.
pub(crate) fn advance<'a, I>(tokens: &mut Peekable<I>, expected: &str) -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next().ok_or_else(|| exhausted(expected))
}

/// Consumes the next token if it is of the given kind.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `kind`: The required token kind. Only payload-free kinds make sense here.
/// - `expected`: Description used in the error message.
///
/// # Returns
/// The consumed token.
///
/// # Errors
/// Returns a `ParseError` naming `expected` and the token actually found.
pub(crate) fn expect<'a, I>(tokens: &mut Peekable<I>,
                            kind: &TokenKind,
                            expected: &str)
                            -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match tokens.peek() {
        Some(token) if token.kind == *kind => advance(tokens, expected),
        Some(token) => Err(unexpected(token, expected)),
        None => Err(exhausted(expected)),
    }
}

/// Consumes the next token if it is of the given kind and reports whether it
/// did.
pub(crate) fn eat<'a, I>(tokens: &mut Peekable<I>, kind: &TokenKind) -> bool
    where I: Iterator<Item = &'a Token>
{
    if tokens.peek().is_some_and(|token| token.kind == *kind) {
        tokens.next();
        return true;
    }
    false
}

/// Parses a plain identifier and returns its name and token.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(crate) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                      -> ParseResult<(String, &'a Token)>
    where I: Iterator<Item = &'a Token>
{
    match tokens.peek() {
        Some(Token { kind: TokenKind::Identifier(name),
                     .. }) => {
            let name = name.clone();
            Ok((name, advance(tokens, "identifier")?))
        },
        Some(token) => Err(unexpected(token, "identifier")),
        None => Err(exhausted("identifier")),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// An immediately encountered closing token produces an empty list. The
/// closing token is consumed.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or anything other than a
/// comma or the closing token follows an item.
pub(crate) fn parse_comma_separated<'a, I, T>(tokens: &mut Peekable<I>,
                                              parse_item: impl Fn(&mut Peekable<I>)
                                                                  -> ParseResult<T>,
                                              closing: &TokenKind)
                                              -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    if eat(tokens, closing) {
        return Ok(items);
    }
    let expected = format!("',' or '{}'", closing.symbol());
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some(Token { kind: TokenKind::Comma,
                         .. }) => {
                tokens.next();
            },
            Some(token) if token.kind == *closing => {
                tokens.next();
                break;
            },
            Some(token) => return Err(unexpected(token, &expected)),
            None => return Err(exhausted(&expected)),
        }
    }
    Ok(items)
}
