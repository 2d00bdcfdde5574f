use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{NestingGuard, advance, eat, exhausted, expect, parse_comma_separated, unexpected},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `+`   (numeric identity)
/// - `-`   (numeric negation)
/// - `not` (logical not)
///
/// Unary operators are right-associative, so an input like `not -x` is parsed
/// as `not (-x)`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("+" | "-" | "not") unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let op = match tokens.peek().map(|token| &token.kind) {
        Some(TokenKind::Plus) => Some(UnaryOperator::Plus),
        Some(TokenKind::Minus) => Some(UnaryOperator::Negate),
        Some(TokenKind::Not) => Some(UnaryOperator::Not),
        _ => None,
    };

    if let Some(op) = op {
        let _nesting = NestingGuard::enter(tokens)?;
        let token = advance(tokens, "unary operator")?.clone();
        let expr = parse_unary(tokens)?;
        Ok(Expr::UnaryOp { op,
                           expr: Box::new(expr),
                           token })
    } else {
        let primary = parse_primary(tokens)?;
        parse_postfix(tokens, primary)
    }
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar:
/// - integer, float, boolean and string literals
/// - identifiers
/// - function calls, including the conversions `str(..)`, `int(..)` and
///   `float(..)` whose names are type keywords
/// - parenthesized expressions
///
/// Grammar:
/// ```text
///     primary := literal
///              | identifier ("(" arguments ")")?
///              | ("str" | "int" | "float" | "bool") "(" arguments ")"
///              | "(" expression ")"
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token: &'a Token = tokens.peek().copied().ok_or_else(|| exhausted("expression"))?;

    match &token.kind {
        TokenKind::Integer(_) | TokenKind::Float(_) | TokenKind::Bool(_) | TokenKind::Str(_) => {
            parse_literal(tokens)
        },
        TokenKind::Identifier(_) => parse_identifier_or_call(tokens),
        kind if kind.is_type_keyword() => parse_conversion_call(tokens),
        TokenKind::LParen => parse_grouping(tokens),
        _ => Err(unexpected(token, "expression")),
    }
}

/// Parses postfix indexing and slicing applied to an expression.
///
/// Multiple accesses can be chained, e.g. `s[1:4][0]`.
///
/// Grammar:
/// ```text
///     postfix := primary ("[" expression (":" expression)? "]")*
/// ```
pub(crate) fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    while tokens.peek().is_some_and(|token| token.kind == TokenKind::LBracket) {
        let token = advance(tokens, "'['")?.clone();
        let start = parse_expression(tokens)?;
        let end = if eat(tokens, &TokenKind::Colon) {
            Some(Box::new(parse_expression(tokens)?))
        } else {
            None
        };
        expect(tokens, &TokenKind::RBracket, "']'")?;

        expr = Expr::Access { accessor: Box::new(expr),
                              start: Box::new(start),
                              end,
                              token };
    }
    Ok(expr)
}

fn parse_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = advance(tokens, "literal")?;
    let value = match &token.kind {
        TokenKind::Integer(value) => LiteralValue::Integer(*value),
        TokenKind::Float(value) => LiteralValue::Float(*value),
        TokenKind::Bool(value) => LiteralValue::Bool(*value),
        TokenKind::Str(value) => LiteralValue::Str(value.clone()),
        _ => return Err(unexpected(token, "literal")),
    };
    Ok(Expr::Literal { value,
                       token: token.clone() })
}

/// Parses an identifier, which becomes a function call when followed by `(`.
fn parse_identifier_or_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = advance(tokens, "identifier")?;
    let TokenKind::Identifier(name) = &token.kind else {
        return Err(unexpected(token, "identifier"));
    };

    if eat(tokens, &TokenKind::LParen) {
        let arguments = parse_comma_separated(tokens, parse_expression, &TokenKind::RParen)?;
        Ok(Expr::FunctionCall { name: name.clone(),
                                arguments,
                                is_statement: false,
                                token: token.clone() })
    } else {
        Ok(Expr::Variable { name:  name.clone(),
                            token: token.clone(), })
    }
}

/// Parses `str(x)`, `int(x)`, `float(x)` or `bool(x)`.
///
/// The type keyword doubles as the function name; whether such a built-in
/// exists is decided by the analyzer.
fn parse_conversion_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = advance(tokens, "type name")?;
    expect(tokens, &TokenKind::LParen, "'(' after type name")?;
    let arguments = parse_comma_separated(tokens, parse_expression, &TokenKind::RParen)?;

    Ok(Expr::FunctionCall { name: token.kind.symbol().to_string(),
                            arguments,
                            is_statement: false,
                            token: token.clone() })
}

/// Parses a parenthesized expression. Parentheses leave no trace in the AST.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LParen, "'('")?;
    let expr = parse_expression(tokens)?;
    expect(tokens, &TokenKind::RParen, "')'")?;
    Ok(expr)
}
