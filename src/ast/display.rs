use std::fmt::{self, Display, Formatter};

use crate::ast::{
    Expr, FunctionDecl, LiteralValue, Program, ReturnType, Statement, StatementList, VarDecl,
};

const INDENT: &str = "    ";

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => {
                let text = v.to_string();
                if text.contains('.') {
                    write!(f, "{text}")
                } else {
                    write!(f, "{text}.0")
                }
            },
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\0' => f.write_str("\\0")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            },
        }
    }
}

/// Binding strength of an expression as an operand.
const fn strength(expr: &Expr) -> u8 {
    match expr {
        Expr::Range { .. } => 0,
        Expr::BinaryOp { op, .. } => op.precedence(),
        Expr::UnaryOp { .. } => 7,
        Expr::Literal { .. } | Expr::Variable { .. } | Expr::FunctionCall { .. } | Expr::Access { .. } => 8,
    }
}

fn operand(f: &mut Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Prints the expression with the fewest parentheses that parse back to the
/// same tree.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => f.write_str(name),
            Self::UnaryOp { op, expr, .. } => {
                write!(f, "{op}")?;
                operand(f, expr, strength(expr) < 7)
            },
            Self::BinaryOp { left, op, right, .. } => {
                let precedence = op.precedence();
                operand(f, left, strength(left) < precedence)?;
                write!(f, " {op} ")?;
                // operators are left-associative
                operand(f, right, strength(right) <= precedence)
            },
            Self::FunctionCall { name, arguments, .. } => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(")")
            },
            Self::Access { accessor,
                           start,
                           end,
                           .. } => {
                operand(f, accessor, strength(accessor) < 8)?;
                match end {
                    Some(end) => write!(f, "[{start}:{end}]"),
                    None => write!(f, "[{start}]"),
                }
            },
            Self::Range { start, end, step, .. } => {
                write!(f, "{start}:{end}")?;
                match step {
                    Some(step) => write!(f, ":{step}"),
                    None => Ok(()),
                }
            },
        }
    }
}

impl Display for ReturnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "func({name})"),
            None => f.write_str("func(void)"),
        }
    }
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "var({}) ", self.var_type.name)?;
        for (i, declarator) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&declarator.name)?;
            if let Some(initializer) = &declarator.initializer {
                write!(f, " = {initializer}")?;
            }
        }
        Ok(())
    }
}

fn write_block(f: &mut Formatter<'_>, list: &StatementList, depth: usize) -> fmt::Result {
    f.write_str("{\n")?;
    write_list(f, list, depth + 1)?;
    write!(f, "{}}}", INDENT.repeat(depth))
}

fn write_list(f: &mut Formatter<'_>, list: &StatementList, depth: usize) -> fmt::Result {
    for statement in &list.statements {
        f.write_str(&INDENT.repeat(depth))?;
        write_statement(f, statement, depth)?;
        f.write_str("\n")?;
    }
    Ok(())
}

fn write_function(f: &mut Formatter<'_>, function: &FunctionDecl, depth: usize) -> fmt::Result {
    write!(f, "{} {}(", function.return_type, function.name)?;
    for (i, param) in function.params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "var({}) {}", param.var_type.name, param.name)?;
        if let Some(default) = &param.default {
            write!(f, " = {default}")?;
        }
    }
    f.write_str(") ")?;
    write_block(f, &function.body, depth)
}

fn write_statement(f: &mut Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    match statement {
        Statement::Empty => f.write_str(";"),
        Statement::VariableDeclaration(declaration) => write!(f, "{declaration};"),
        Statement::Assignment { target, op, value, .. } => write!(f, "{target} {op} {value};"),
        Statement::Conditional { branches,
                                 else_body,
                                 .. } => {
            for (i, (condition, body)) in branches.iter().enumerate() {
                let keyword = if i == 0 { "if" } else { " elseif" };
                write!(f, "{keyword} {condition} ")?;
                write_block(f, body, depth)?;
            }
            if let Some(body) = else_body {
                f.write_str(" else ")?;
                write_block(f, body, depth)?;
            }
            Ok(())
        },
        Statement::While { condition, body, .. } => {
            write!(f, "while {condition} ")?;
            write_block(f, body, depth)
        },
        Statement::For { variable,
                         iterable,
                         body,
                         .. } => {
            write!(f, "for {variable} in {iterable} ")?;
            write_block(f, body, depth)
        },
        Statement::Break { .. } => f.write_str("break;"),
        Statement::Continue { .. } => f.write_str("continue;"),
        Statement::Return { value: Some(value), .. } => write!(f, "return {value};"),
        Statement::Return { value: None, .. } => f.write_str("return;"),
        Statement::Function(function) => write_function(f, function, depth),
        Statement::Expression(expr) => write!(f, "{expr};"),
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl Display for StatementList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_list(f, self, 0)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::interpreter::{lexer::tokenize, parser::parse};

    fn print(source: &str) -> String {
        parse(&tokenize(source).unwrap()).unwrap().to_string()
    }

    #[test]
    fn parentheses_follow_precedence() {
        assert_eq!(print("x = (1 + 2) * 3;"), "x = (1 + 2) * 3;\n");
        assert_eq!(print("x = 1 + (2 * 3);"), "x = 1 + 2 * 3;\n");
        assert_eq!(print("x = 1 - (2 - 3);"), "x = 1 - (2 - 3);\n");
        assert_eq!(print("x = (1 - 2) - 3;"), "x = 1 - 2 - 3;\n");
        assert_eq!(print("x = -(a + b) * not (c or d);"), "x = -(a + b) * not (c or d);\n");
        assert_eq!(print("x = (s)[1:len(s)];"), "x = s[1:len(s)];\n");
    }

    #[test]
    fn literals_print_as_source() {
        assert_eq!(print("x = 2.; y = \"a\\\"b\\n\"; z = true;"),
                   "x = 2.0;\ny = \"a\\\"b\\n\";\nz = true;\n");
    }

    #[test]
    fn statements_are_indented() {
        let source = "func(int) f(var(int) n, var(int) step = 2) { if n < 0 { return 0; } elseif n == 0 { ; } else { n -= step; } return n; }
                      for var(int) i in 0:10:2 { while true { break; } continue; }";
        let expected = "\
func(int) f(var(int) n, var(int) step = 2) {
    if n < 0 {
        return 0;
    } elseif n == 0 {
        ;
    } else {
        n -= step;
    }
    return n;
}
for var(int) i in 0:10:2 {
    while true {
        break;
    }
    continue;
}
";
        assert_eq!(print(source), expected);
    }

    #[test]
    fn printing_reaches_a_fixpoint() {
        let source = "var(float) a = 1.5, b; var(str) s = \"tab\\there\";
                      func(void) show(var(str) text = s[0] + s[-1]) { print(text, len(text)); return; }
                      b = -a // 2 % 3 + (a - 1) / float(2);
                      if not (a > b and b >= 0.) or a != 1.5 { show(); } else { show(str(a)[0:2]); }";
        let once = print(source);
        assert_eq!(print(&once), once);
    }
}
