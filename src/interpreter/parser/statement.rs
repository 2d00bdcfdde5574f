use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{
        AssignOperator, BinaryOperator, Declarator, Expr, FunctionDecl, FunctionParam, ReturnType,
        Statement, TypeName, VarDecl, VarType,
    },
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression, parse_if, parse_range_or_expression},
            utils::{
                advance, eat, exhausted, expect, parse_comma_separated, parse_identifier,
                peek_kind, unexpected,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - an empty statement (`;`),
/// - a variable declaration,
/// - a conditional, `while` or `for` loop,
/// - `break`, `continue` or `return`,
/// - a function declaration,
/// - an assignment,
/// - an expression used as a statement.
///
/// The leading keyword selects the construct. An identifier followed by an
/// assignment operator is an assignment; anything else is parsed as an
/// expression statement.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token: &'a Token = tokens.peek().copied().ok_or_else(|| exhausted("statement"))?;

    match token.kind {
        TokenKind::Semicolon => {
            tokens.next();
            Ok(Statement::Empty)
        },
        TokenKind::Var => {
            let declaration = parse_variable_declaration(tokens)?;
            expect(tokens, &TokenKind::Semicolon, "';'")?;
            Ok(Statement::VariableDeclaration(declaration))
        },
        TokenKind::If => parse_if(tokens),
        TokenKind::While => parse_while(tokens),
        TokenKind::For => parse_for(tokens),
        TokenKind::Break => {
            tokens.next();
            expect(tokens, &TokenKind::Semicolon, "';'")?;
            Ok(Statement::Break { token: token.clone() })
        },
        TokenKind::Continue => {
            tokens.next();
            expect(tokens, &TokenKind::Semicolon, "';'")?;
            Ok(Statement::Continue { token: token.clone() })
        },
        TokenKind::Return => parse_return(tokens),
        TokenKind::Func => parse_function_declaration(tokens),
        _ => {
            if let Some(statement) = parse_assignment(tokens)? {
                return Ok(statement);
            }
            parse_expression_statement(tokens)
        },
    }
}

/// Maps an assignment token to its operator.
///
/// Compound forms carry the arithmetic operator they combine with.
pub(crate) const fn token_to_assign_operator(token: &TokenKind) -> Option<AssignOperator> {
    match token {
        TokenKind::Assign => Some(AssignOperator::Assign),
        TokenKind::PlusAssign => Some(AssignOperator::Compound(BinaryOperator::Add)),
        TokenKind::MinusAssign => Some(AssignOperator::Compound(BinaryOperator::Sub)),
        TokenKind::StarAssign => Some(AssignOperator::Compound(BinaryOperator::Mul)),
        TokenKind::SlashAssign => Some(AssignOperator::Compound(BinaryOperator::Div)),
        TokenKind::DoubleSlashAssign => Some(AssignOperator::Compound(BinaryOperator::FloorDiv)),
        TokenKind::PercentAssign => Some(AssignOperator::Compound(BinaryOperator::Mod)),
        _ => None,
    }
}

/// Parses a type keyword usable in `var(...)`.
fn parse_type_name<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(TypeName, &'a Token)>
    where I: Iterator<Item = &'a Token>
{
    let token = advance(tokens, "type name")?;
    let name = match token.kind {
        TokenKind::IntType => TypeName::Int,
        TokenKind::FloatType => TypeName::Float,
        TokenKind::BoolType => TypeName::Bool,
        TokenKind::StrType => TypeName::Str,
        _ => return Err(unexpected(token, "type name")),
    };
    Ok((name, token))
}

/// Parses a variable type annotation.
///
/// Grammar: `var_type := "var" "(" type ")"`
fn parse_var_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VarType>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, &TokenKind::Var, "'var'")?;
    expect(tokens, &TokenKind::LParen, "'('")?;
    let (name, token) = parse_type_name(tokens)?;
    expect(tokens, &TokenKind::RParen, "')'")?;
    Ok(VarType { name,
                 token: token.clone() })
}

/// Parses a return type annotation.
///
/// Grammar: `return_type := "func" "(" (type | "void") ")"`
fn parse_return_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ReturnType>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, &TokenKind::Func, "'func'")?;
    expect(tokens, &TokenKind::LParen, "'('")?;
    let return_type = if peek_kind(tokens) == Some(&TokenKind::Void) {
        let token = advance(tokens, "'void'")?;
        ReturnType { name:  None,
                     token: token.clone(), }
    } else {
        let (name, token) = parse_type_name(tokens)?;
        ReturnType { name:  Some(name),
                     token: token.clone(), }
    };
    expect(tokens, &TokenKind::RParen, "')'")?;
    Ok(return_type)
}

/// Parses a variable declaration without its terminating `;`.
///
/// Syntax:
/// ```text
///     var(int) a = 1, b;
/// ```
///
/// Grammar:
/// ```text
///     declaration := var_type declarator ("," declarator)*
///     declarator  := identifier ("=" expression)?
/// ```
fn parse_variable_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VarDecl>
    where I: Iterator<Item = &'a Token> + Clone
{
    let var_type = parse_var_type(tokens)?;

    let mut variables = Vec::new();
    loop {
        let (name, token) = parse_identifier(tokens)?;
        let initializer = if eat(tokens, &TokenKind::Assign) {
            Some(parse_expression(tokens)?)
        } else {
            None
        };
        variables.push(Declarator { name,
                                    initializer,
                                    token: token.clone() });
        if !eat(tokens, &TokenKind::Comma) {
            break;
        }
    }

    Ok(VarDecl { var_type,
                 variables })
}

/// Parses a `while` loop.
///
/// Grammar: `while := "while" expression block`
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, &TokenKind::While, "'while'")?.clone();
    let condition = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Statement::While { condition,
                          body,
                          token })
}

/// Parses a `for` loop.
///
/// The loop header declares exactly one variable without an initializer; the
/// iterable is a range or any expression producing a string.
///
/// Grammar: `for := "for" var_type identifier "in" range block`
///
/// # Errors
/// Returns [`ParseError::InvalidLoopVariable`] when the header declares more
/// than one variable or initializes it.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, &TokenKind::For, "'for'")?.clone();
    let variable = parse_variable_declaration(tokens)?;

    if let [declarator] = variable.variables.as_slice()
       && declarator.initializer.is_some()
    {
        return Err(ParseError::InvalidLoopVariable { line:   declarator.token.line,
                                                     column: declarator.token.column, });
    }
    if variable.variables.len() != 1 {
        return Err(ParseError::InvalidLoopVariable { line:   token.line,
                                                     column: token.column, });
    }

    expect(tokens, &TokenKind::In, "'in'")?;
    let iterable = parse_range_or_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Statement::For { variable,
                        iterable,
                        body,
                        token })
}

/// Parses `return;` or `return <expr>;`.
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, &TokenKind::Return, "'return'")?.clone();
    let value = if eat(tokens, &TokenKind::Semicolon) {
        None
    } else {
        let value = parse_expression(tokens)?;
        expect(tokens, &TokenKind::Semicolon, "';'")?;
        Some(value)
    };

    Ok(Statement::Return { value, token })
}

/// Parses a function declaration.
///
/// Syntax:
/// ```text
///     func(int) add(var(int) x, var(int) y = 1) { return x + y; }
/// ```
///
/// Grammar:
/// ```text
///     function  := return_type identifier "(" (parameter ("," parameter)*)? ")" block
///     parameter := var_type identifier ("=" expression)?
/// ```
fn parse_function_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let return_type = parse_return_type(tokens)?;
    let (name, token) = parse_identifier(tokens)?;
    expect(tokens, &TokenKind::LParen, "'('")?;
    let params = parse_comma_separated(tokens, parse_parameter, &TokenKind::RParen)?;
    let body = parse_block(tokens)?;

    Ok(Statement::Function(Rc::new(FunctionDecl { return_type,
                                                  name,
                                                  params,
                                                  body,
                                                  token: token.clone() })))
}

fn parse_parameter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionParam>
    where I: Iterator<Item = &'a Token> + Clone
{
    let var_type = parse_var_type(tokens)?;
    let (name, token) = parse_identifier(tokens)?;
    let default = if eat(tokens, &TokenKind::Assign) {
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    Ok(FunctionParam { var_type,
                       name,
                       default,
                       token: token.clone() })
}

/// Parses an assignment if the upcoming tokens form one.
///
/// Uses a cloned iterator to look two tokens ahead without consuming input:
/// an identifier followed by `=` or a compound assignment operator.
///
/// # Returns
/// - `Ok(Some(statement))` if an assignment was parsed,
/// - `Ok(None)` if the input is not an assignment.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();
    let Some(Token { kind: TokenKind::Identifier(target),
                     .. }) = lookahead.next()
    else {
        return Ok(None);
    };
    let Some(op) = lookahead.next()
                            .and_then(|token| token_to_assign_operator(&token.kind))
    else {
        return Ok(None);
    };

    let token = advance(tokens, "identifier")?.clone();
    tokens.next();
    let value = parse_expression(tokens)?;
    expect(tokens, &TokenKind::Semicolon, "';'")?;

    Ok(Some(Statement::Assignment { target: target.clone(),
                                    op,
                                    value,
                                    token }))
}

/// Parses an expression used as a statement.
///
/// A function call in this position is flagged as a statement call.
///
/// # Errors
/// Returns [`ParseError::InvalidAssignmentTarget`] if an assignment operator
/// follows an expression that is not a plain variable, e.g. `s[0] = 1;`.
fn parse_expression_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let expr = parse_expression(tokens)?;

    if peek_kind(tokens).and_then(token_to_assign_operator).is_some() {
        let (line, column) = expr.position();
        return Err(ParseError::InvalidAssignmentTarget { line, column });
    }
    expect(tokens, &TokenKind::Semicolon, "';'")?;

    let expr = match expr {
        Expr::FunctionCall { name,
                             arguments,
                             token,
                             .. } => Expr::FunctionCall { name,
                                                          arguments,
                                                          is_statement: true,
                                                          token },
        other => other,
    };
    Ok(Statement::Expression(expr))
}
