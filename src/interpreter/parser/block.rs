use std::iter::Peekable;

use crate::{
    ast::StatementList,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, statement::parse_statement, utils::{NestingGuard, expect}},
    },
};

/// Parses a block delimited by braces.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The statements of the block in source order.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<StatementList>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = NestingGuard::enter(tokens)?;
    expect(tokens, &TokenKind::LBrace, "'{'")?;
    let body = parse_statement_list(tokens, &TokenKind::RBrace)?;
    expect(tokens, &TokenKind::RBrace, "'}'")?;
    Ok(body)
}

/// Parses statements until `closing` (or the end of input) is next.
///
/// The closing token is left in the stream for the caller to consume, so the
/// same routine serves both block bodies and the program itself.
pub fn parse_statement_list<'a, I>(tokens: &mut Peekable<I>,
                                   closing: &TokenKind)
                                   -> ParseResult<StatementList>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    while let Some(token) = tokens.peek().copied() {
        if token.kind == *closing || token.kind == TokenKind::Eof {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    Ok(StatementList { statements })
}
