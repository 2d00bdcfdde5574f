use tracing::{debug, trace};

use crate::{
    ast::{Expr, FunctionDecl, Program, Statement, StatementList, VarDecl},
    error::SemanticError,
    interpreter::analyzer::symbol_table::{ScopeTree, Symbol, SymbolKind},
};

/// Result type used by the semantic analyzer.
pub type AnalyzeResult<T> = Result<T, SemanticError>;

/// Checks the scoping rules of a whole program.
///
/// # Errors
/// Returns the first [`SemanticError`] found in source order.
///
/// # Example
/// ```
/// use cove::interpreter::{analyzer::analyze, lexer::tokenize, parser::parse};
///
/// let program = parse(&tokenize("if (1 < 2) { var(int) x = 5; } print(x);").unwrap()).unwrap();
/// assert!(analyze(&program).is_err());
/// ```
pub fn analyze(program: &Program) -> AnalyzeResult<()> {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_program(program)?;
    debug!(scopes = analyzer.scopes().scopes().len(), "analyzed program");
    Ok(())
}

/// The function whose body is being analyzed.
#[derive(Debug, Clone)]
struct FunctionContext {
    name:    String,
    is_void: bool,
}

/// Single-pass scope checker.
///
/// Walks the AST once, opening a scope for the program, every function body,
/// every conditional branch and every loop. The scope tree is kept after the
/// traversal and can be inspected through [`Analyzer::scopes`].
#[derive(Debug, Default)]
pub struct Analyzer {
    scopes:     ScopeTree,
    loop_depth: usize,
    function:   Option<FunctionContext>,
    block_id:   usize,
}

impl Analyzer {
    /// Creates an analyzer whose only scope is the root `builtins` scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scopes created so far.
    #[must_use]
    pub const fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Analyzes a program inside a fresh `global` scope.
    ///
    /// # Errors
    /// Returns the first [`SemanticError`] found.
    pub fn analyze_program(&mut self, program: &Program) -> AnalyzeResult<()> {
        self.enter_scope("global");
        let result = self.analyze_statements(&program.body);
        self.exit_scope();
        result
    }

    fn enter_scope(&mut self, name: impl Into<String>) {
        let index = self.scopes.enter(name);
        let scope = self.scopes.current();
        trace!(index, name = %scope.name, level = scope.level, "enter scope");
    }

    fn exit_scope(&mut self) {
        let scope = self.scopes.current();
        trace!(name = %scope.name, level = scope.level, symbols = scope.symbols.len(), "exit scope");
        self.scopes.exit();
    }

    /// Runs `f` inside a new scope for a conditional branch or loop.
    ///
    /// The scope gets a unique name such as `while#4`, also recorded as a
    /// block marker in the enclosing scope.
    fn in_block<F>(&mut self, keyword: &str, f: F) -> AnalyzeResult<()>
        where F: FnOnce(&mut Self) -> AnalyzeResult<()>
    {
        self.block_id += 1;
        let name = format!("{keyword}#{}", self.block_id);
        self.scopes.insert(Symbol { name: name.clone(),
                                    kind: SymbolKind::Block, });
        self.enter_scope(name);
        let result = f(self);
        self.exit_scope();
        result
    }

    fn in_loop<F>(&mut self, keyword: &str, f: F) -> AnalyzeResult<()>
        where F: FnOnce(&mut Self) -> AnalyzeResult<()>
    {
        self.in_block(keyword, |this| {
                this.loop_depth += 1;
                let result = f(this);
                this.loop_depth -= 1;
                result
            })
    }

    fn declare(&mut self, symbol: Symbol, line: usize, column: usize) -> AnalyzeResult<()> {
        let name = symbol.name.clone();
        if self.scopes.insert(symbol) {
            Ok(())
        } else {
            Err(SemanticError::Redeclaration { name, line, column })
        }
    }

    fn analyze_statements(&mut self, list: &StatementList) -> AnalyzeResult<()> {
        list.statements
            .iter()
            .try_for_each(|statement| self.analyze_statement(statement))
    }

    /// Applies the scoping rule of one statement.
    ///
    /// # Errors
    /// Returns the first [`SemanticError`] found in the statement.
    pub fn analyze_statement(&mut self, statement: &Statement) -> AnalyzeResult<()> {
        match statement {
            Statement::Empty => Ok(()),
            Statement::VariableDeclaration(declaration) => self.analyze_declaration(declaration),
            Statement::Assignment { target,
                                    value,
                                    token,
                                    .. } => {
                self.analyze_expression(value)?;
                self.check_variable(target, token.line, token.column)
            },
            Statement::Conditional { branches,
                                     else_body,
                                     .. } => {
                for (index, (condition, body)) in branches.iter().enumerate() {
                    self.analyze_expression(condition)?;
                    let keyword = if index == 0 { "if" } else { "elseif" };
                    self.in_block(keyword, |this| this.analyze_statements(body))?;
                }
                match else_body {
                    Some(body) => self.in_block("else", |this| this.analyze_statements(body)),
                    None => Ok(()),
                }
            },
            Statement::While { condition, body, .. } => {
                self.analyze_expression(condition)?;
                self.in_loop("while", |this| this.analyze_statements(body))
            },
            Statement::For { variable,
                             iterable,
                             body,
                             .. } => {
                self.analyze_expression(iterable)?;
                self.in_loop("for", |this| {
                        this.analyze_declaration(variable)?;
                        this.analyze_statements(body)
                    })
            },
            Statement::Break { token } => self.check_in_loop("break", token.line, token.column),
            Statement::Continue { token } => {
                self.check_in_loop("continue", token.line, token.column)
            },
            Statement::Return { value, token } => {
                let Some(function) = &self.function else {
                    return Err(SemanticError::ReturnOutsideFunction { line:   token.line,
                                                                      column: token.column, });
                };
                match (value, function.is_void) {
                    (None, false) => {
                        Err(SemanticError::MissingReturnValue { function: function.name.clone(),
                                                                line:     token.line,
                                                                column:   token.column, })
                    },
                    (Some(_), true) => {
                        Err(SemanticError::UnexpectedReturnValue { function: function.name.clone(),
                                                                   line:     token.line,
                                                                   column:   token.column, })
                    },
                    (Some(value), false) => self.analyze_expression(value),
                    (None, true) => Ok(()),
                }
            },
            Statement::Function(declaration) => self.analyze_function(declaration),
            Statement::Expression(expr) => self.analyze_expression(expr),
        }
    }

    /// Analyzes each initializer before binding its name, so
    /// `var(int) a = a;` refers to an outer `a`.
    fn analyze_declaration(&mut self, declaration: &VarDecl) -> AnalyzeResult<()> {
        for declarator in &declaration.variables {
            if let Some(initializer) = &declarator.initializer {
                self.analyze_expression(initializer)?;
            }
            self.declare(Symbol::variable(&declarator.name, declaration.var_type.name),
                         declarator.token.line,
                         declarator.token.column)?;
        }
        Ok(())
    }

    fn analyze_function(&mut self, declaration: &FunctionDecl) -> AnalyzeResult<()> {
        let mut seen_default = false;
        for param in &declaration.params {
            if param.default.is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(SemanticError::RequiredAfterDefault { name:   param.name.clone(),
                                                                 line:   param.token.line,
                                                                 column: param.token.column, });
            }
        }

        self.declare(Symbol::function(&declaration.name,
                                      declaration.return_type.name,
                                      declaration.required_params(),
                                      Some(declaration.params.len())),
                     declaration.token.line,
                     declaration.token.column)?;

        let context = FunctionContext { name:    declaration.name.clone(),
                                        is_void: declaration.return_type.is_void(), };
        let outer_function = self.function.replace(context);
        let outer_loop_depth = std::mem::take(&mut self.loop_depth);
        self.enter_scope(declaration.name.clone());

        let result = self.analyze_function_body(declaration);

        self.exit_scope();
        self.loop_depth = outer_loop_depth;
        self.function = outer_function;
        result
    }

    fn analyze_function_body(&mut self, declaration: &FunctionDecl) -> AnalyzeResult<()> {
        for param in &declaration.params {
            if let Some(default) = &param.default {
                self.analyze_expression(default)?;
            }
            self.declare(Symbol::variable(&param.name, param.var_type.name),
                         param.token.line,
                         param.token.column)?;
        }
        self.analyze_statements(&declaration.body)
    }

    fn check_in_loop(&self, keyword: &'static str, line: usize, column: usize) -> AnalyzeResult<()> {
        if self.loop_depth == 0 {
            return Err(SemanticError::OutsideLoop { keyword,
                                                    line,
                                                    column });
        }
        Ok(())
    }

    /// Checks that `name` refers to a declared variable.
    fn check_variable(&self, name: &str, line: usize, column: usize) -> AnalyzeResult<()> {
        match self.scopes.lookup(name).map(|symbol| &symbol.kind) {
            Some(SymbolKind::Variable { .. }) => Ok(()),
            Some(SymbolKind::Function { .. } | SymbolKind::BuiltinType | SymbolKind::Block) => {
                Err(SemanticError::NotAVariable { name: name.to_string(),
                                                  line,
                                                  column })
            },
            None => Err(SemanticError::UndeclaredVariable { name: name.to_string(),
                                                            line,
                                                            column }),
        }
    }

    /// Applies the scoping rule of one expression.
    ///
    /// # Errors
    /// Returns the first [`SemanticError`] found in the expression.
    pub fn analyze_expression(&mut self, expr: &Expr) -> AnalyzeResult<()> {
        match expr {
            Expr::Literal { .. } => Ok(()),
            Expr::Variable { name, token } => self.check_variable(name, token.line, token.column),
            Expr::UnaryOp { expr, .. } => self.analyze_expression(expr),
            Expr::BinaryOp { left, right, .. } => {
                self.analyze_expression(left)?;
                self.analyze_expression(right)
            },
            Expr::FunctionCall { name,
                                 arguments,
                                 token,
                                 .. } => {
                self.check_call(name, arguments.len(), token.line, token.column)?;
                arguments.iter().try_for_each(|argument| self.analyze_expression(argument))
            },
            Expr::Access { accessor,
                           start,
                           end,
                           .. } => {
                self.analyze_expression(accessor)?;
                self.analyze_expression(start)?;
                match end {
                    Some(end) => self.analyze_expression(end),
                    None => Ok(()),
                }
            },
            Expr::Range { start, end, step, .. } => {
                self.analyze_expression(start)?;
                self.analyze_expression(end)?;
                match step {
                    Some(step) => self.analyze_expression(step),
                    None => Ok(()),
                }
            },
        }
    }

    fn check_call(&self,
                  name: &str,
                  found: usize,
                  line: usize,
                  column: usize)
                  -> AnalyzeResult<()> {
        let Some(symbol) = self.scopes.lookup(name) else {
            return Err(SemanticError::UndeclaredVariable { name: name.to_string(),
                                                           line,
                                                           column });
        };
        let SymbolKind::Function { required, total, .. } = symbol.kind else {
            return Err(SemanticError::NotCallable { name: name.to_string(),
                                                    line,
                                                    column });
        };

        if found < required || total.is_some_and(|total| found > total) {
            return Err(SemanticError::ArgumentCountMismatch { name: name.to_string(),
                                                              expected: symbol.arity()
                                                                              .unwrap_or_default(),
                                                              found,
                                                              line,
                                                              column });
        }
        Ok(())
    }
}
