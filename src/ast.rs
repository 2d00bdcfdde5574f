use std::rc::Rc;

use crate::interpreter::lexer::Token;

/// Source printer.
///
/// `Display` for programs, statements and expressions prints source text that
/// parses back to the same tree.
mod display;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A string literal with escapes decoded.
    Str(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Every variant keeps the token it originates from so later stages can point
/// at the source when they fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// The literal token.
        token: Token,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name:  String,
        /// The identifier token.
        token: Token,
    },
    /// A unary operation (e.g. negation).
    UnaryOp {
        /// The unary operator to apply.
        op:    UnaryOperator,
        /// The operand expression.
        expr:  Box<Self>,
        /// The operator token.
        token: Token,
    },
    /// A binary operation (addition, comparison, logic, ...).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// The operator token.
        token: Token,
    },
    /// Function call expression (e.g. `add(1, 2)`).
    FunctionCall {
        /// Name of the function being called.
        name:         String,
        /// Arguments to the function.
        arguments:    Vec<Self>,
        /// Whether the call stands alone as a statement.
        is_statement: bool,
        /// The function name token.
        token:        Token,
    },
    /// Indexing (`s[i]`) or slicing (`s[i:j]`).
    Access {
        /// The expression being accessed.
        accessor: Box<Self>,
        /// The index, or the start of the slice.
        start:    Box<Self>,
        /// The exclusive end of the slice, if this is a slice.
        end:      Option<Box<Self>>,
        /// The `[` token.
        token:    Token,
    },
    /// Half-open integer range `start : end : step`.
    Range {
        /// First value of the range.
        start: Box<Self>,
        /// Exclusive upper bound.
        end:   Box<Self>,
        /// Step between values; `1` when absent.
        step:  Option<Box<Self>>,
        /// The first `:` token.
        token: Token,
    },
}

impl Expr {
    /// Gets the token this expression originates from.
    ///
    /// ## Example
    /// ```
    /// use cove::{ast::Expr, interpreter::lexer::{Token, TokenKind}};
    ///
    /// let token = Token::new(TokenKind::Identifier("x".into()), "x", 5, 3);
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             token };
    ///
    /// assert_eq!(expr.token().line, 5);
    /// ```
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::Literal { token, .. }
            | Self::Variable { token, .. }
            | Self::UnaryOp { token, .. }
            | Self::BinaryOp { token, .. }
            | Self::FunctionCall { token, .. }
            | Self::Access { token, .. }
            | Self::Range { token, .. } => token,
        }
    }

    /// Line and column of the originating token.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        let token = self.token();
        (token.line, token.column)
    }
}

/// Type names usable in variable annotations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `str`
    Str,
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "str",
        };
        write!(f, "{name}")
    }
}

/// Variable type annotation, e.g. `var(int)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarType {
    /// The annotated type.
    pub name:  TypeName,
    /// The type keyword token.
    pub token: Token,
}

/// Function return type annotation, e.g. `func(void)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnType {
    /// The returned type, or `None` for `void`.
    pub name:  Option<TypeName>,
    /// The type keyword token.
    pub token: Token,
}

impl ReturnType {
    /// Returns `true` for `void` functions.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.name.is_none()
    }
}

/// One variable of a declaration, optionally initialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// The declared name.
    pub name:        String,
    /// The initial value, if any.
    pub initializer: Option<Expr>,
    /// The identifier token.
    pub token:       Token,
}

/// A variable declaration: `var(int) a = 1, b;`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// The shared type annotation.
    pub var_type:  VarType,
    /// The declared variables in source order.
    pub variables: Vec<Declarator>,
}

/// A function parameter: `var(int) x = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParam {
    /// The parameter type annotation.
    pub var_type: VarType,
    /// The parameter name.
    pub name:     String,
    /// Value used when the caller omits the argument.
    pub default:  Option<Expr>,
    /// The identifier token.
    pub token:    Token,
}

/// Represents a user-defined function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The declared return type.
    pub return_type: ReturnType,
    /// The name of the function.
    pub name:        String,
    /// The parameters in declaration order.
    pub params:      Vec<FunctionParam>,
    /// The statements executed when the function is called.
    pub body:        StatementList,
    /// The function name token.
    pub token:       Token,
}

impl FunctionDecl {
    /// Number of parameters a call must supply.
    #[must_use]
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }
}

/// Assignment operator: plain `=` or a compound arithmetic form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignOperator {
    /// `=`
    Assign,
    /// `+=`, `-=`, `*=`, `/=`, `//=` or `%=`, carrying the arithmetic operator.
    Compound(BinaryOperator),
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A lone `;`.
    Empty,
    /// A typed variable declaration.
    VariableDeclaration(VarDecl),
    /// Assignment to an existing variable.
    Assignment {
        /// The name of the variable.
        target: String,
        /// Plain or compound operator.
        op:     AssignOperator,
        /// The assigned (or combined) value.
        value:  Expr,
        /// The target identifier token.
        token:  Token,
    },
    /// `if` / `elseif` / `else` chain.
    Conditional {
        /// `(condition, body)` pairs in source order.
        branches:  Vec<(Expr, StatementList)>,
        /// The `else` body, if present.
        else_body: Option<StatementList>,
        /// The `if` token.
        token:     Token,
    },
    /// `while` loop.
    While {
        /// Evaluated before every iteration.
        condition: Expr,
        /// The loop body.
        body:      StatementList,
        /// The `while` token.
        token:     Token,
    },
    /// `for` loop over a range or a string.
    For {
        /// Declaration of the loop variable.
        variable: VarDecl,
        /// The range or collection iterated over.
        iterable: Expr,
        /// The loop body.
        body:     StatementList,
        /// The `for` token.
        token:    Token,
    },
    /// `break;`
    Break {
        /// The keyword token.
        token: Token,
    },
    /// `continue;`
    Continue {
        /// The keyword token.
        token: Token,
    },
    /// `return;` or `return <expr>;`.
    Return {
        /// The returned expression, if any.
        value: Option<Expr>,
        /// The keyword token.
        token: Token,
    },
    /// A user-defined function declaration.
    Function(Rc<FunctionDecl>),
    /// A standalone expression evaluated for its effect.
    Expression(Expr),
}

/// An ordered sequence of statements, e.g. a block body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementList {
    /// The statements in source order.
    pub statements: Vec<Statement>,
}

/// A whole parsed source unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The top-level statements.
    pub body: StatementList,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// True division (`/`)
    Div,
    /// Floor division (`//`)
    FloorDiv,
    /// Modulo (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

impl BinaryOperator {
    /// Binding strength used by the printer; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equal | Self::NotEqual => 3,
            Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => 6,
        }
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Numeric identity (`+x`).
    Plus,
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`not x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, FloorDiv, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Or, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            FloorDiv => "//",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "not "),
        }
    }
}

impl std::fmt::Display for AssignOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assign => write!(f, "="),
            Self::Compound(op) => write!(f, "{op}="),
        }
    }
}
