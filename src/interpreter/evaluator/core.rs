use std::{
    collections::HashMap,
    io::{self, Write},
    rc::Rc,
};

use tracing::debug;

use crate::{
    ast::{AssignOperator, Expr, Program, Statement, StatementList, TypeName, VarDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::eval_binary,
            stack::{Binding, FrameKind, ProgramStack},
        },
        lexer::Token,
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default bound on nested function calls.
///
/// Deep enough for ordinary recursion while staying within a 2 MiB thread
/// stack in unoptimized builds.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// How a statement finished.
///
/// `Break` and `Continue` travel up to the innermost loop, `Return` up to the
/// innermost function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `break` is unwinding to its loop.
    Break,
    /// A `continue` is unwinding to its loop.
    Continue,
    /// A `return` is unwinding to its call, with the returned value if any.
    Return(Option<Value>),
}

/// Tunable limits of an [`Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Maximum number of nested function calls before
    /// [`RuntimeError::RecursionLimit`] is raised.
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

/// Runs a program on standard output with default options.
///
/// # Errors
/// Returns the first [`RuntimeError`] raised by the program.
pub fn interpret(program: &Program) -> EvalResult<()> {
    Interpreter::new(io::stdout().lock()).run(program)
}

/// Tree-walking evaluator.
///
/// The interpreter owns the [`ProgramStack`] and the writer `print` sends its
/// output to. Running a program pushes the `global` frame, executes the
/// top-level statements and pops it again; the final global bindings stay
/// available through [`Interpreter::globals`].
///
/// ## Usage
/// ```
/// use cove::interpreter::{evaluator::Interpreter, lexer::tokenize, parser::parse, value::core::Value};
///
/// let program = parse(&tokenize("var(int) a = 1, b = 2; a += b; print(a);").unwrap()).unwrap();
/// let mut interpreter = Interpreter::new(Vec::new());
/// interpreter.run(&program).unwrap();
///
/// assert_eq!(interpreter.global("a"), Some(&Value::Integer(3)));
/// assert_eq!(interpreter.output(), b"3\n");
/// ```
pub struct Interpreter<W: Write> {
    pub(crate) stack:      ProgramStack,
    pub(crate) output:     W,
    pub(crate) options:    InterpreterOptions,
    pub(crate) call_depth: usize,
    globals:               HashMap<String, Binding>,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing program output to `output`.
    #[must_use]
    pub fn new(output: W) -> Self {
        Self::with_options(output, InterpreterOptions::default())
    }

    /// Creates an interpreter with explicit limits.
    #[must_use]
    pub fn with_options(output: W, options: InterpreterOptions) -> Self {
        Self { stack: ProgramStack::new(),
               output,
               options,
               call_depth: 0,
               globals: HashMap::new() }
    }

    /// Executes a program from start to end.
    ///
    /// The stack holds exactly the `global` frame while top-level statements
    /// run and is empty again afterwards, also when execution fails.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised by the program.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        self.stack.push("global", FrameKind::Global);
        let result = self.exec_statements(&program.body);
        if let Some(frame) = self.stack.pop() {
            self.globals = frame.bindings;
        }

        debug!(ok = result.is_ok(), "program finished");
        result.map(|_| ())
    }

    /// The runtime stack.
    #[must_use]
    pub const fn stack(&self) -> &ProgramStack {
        &self.stack
    }

    /// Global bindings as they were when the last run finished.
    #[must_use]
    pub const fn globals(&self) -> &HashMap<String, Binding> {
        &self.globals
    }

    /// Final value of a global variable.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals
            .get(name)
            .and_then(|binding| binding.value.as_ref())
    }

    /// The writer program output goes to.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Consumes the interpreter and returns its writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs `f` inside a new frame nested in the current top frame.
    ///
    /// The frame is popped on every exit path, including errors.
    pub(crate) fn in_frame<T, F>(&mut self, name: &str, kind: FrameKind, f: F) -> EvalResult<T>
        where F: FnOnce(&mut Self) -> EvalResult<T>
    {
        self.stack.push(name, kind);
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Executes statements in order until one of them does not finish
    /// normally.
    pub fn exec_statements(&mut self, list: &StatementList) -> EvalResult<Flow> {
        for statement in &list.statements {
            let flow = self.exec_statement(statement)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// How the statement finished; `break`, `continue` and `return` are
    /// reported as [`Flow`] values rather than errors.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Empty => Ok(Flow::Normal),
            Statement::VariableDeclaration(declaration) => {
                self.exec_declaration(declaration)?;
                Ok(Flow::Normal)
            },
            Statement::Assignment { target,
                                    op,
                                    value,
                                    token, } => {
                self.exec_assignment(target, *op, value, token)?;
                Ok(Flow::Normal)
            },
            Statement::Conditional { branches,
                                     else_body,
                                     .. } => self.exec_conditional(branches, else_body.as_ref()),
            Statement::While { condition, body, .. } => self.exec_while(condition, body),
            Statement::For { variable,
                             iterable,
                             body,
                             token, } => self.exec_for(variable, iterable, body, token),
            Statement::Break { .. } => Ok(Flow::Break),
            Statement::Continue { .. } => Ok(Flow::Continue),
            Statement::Return { value, .. } => {
                let value = value.as_ref()
                                 .map(|expr| self.eval_value(expr))
                                 .transpose()?;
                Ok(Flow::Return(value))
            },
            Statement::Function(declaration) => {
                self.stack.declare_function(Rc::clone(declaration));
                Ok(Flow::Normal)
            },
            Statement::Expression(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
        }
    }

    /// Binds every declarator in the top frame, left to right.
    ///
    /// A declarator without initializer is bound but holds no value yet.
    fn exec_declaration(&mut self, declaration: &VarDecl) -> EvalResult<()> {
        let ty = declaration.var_type.name;
        for declarator in &declaration.variables {
            let value = match &declarator.initializer {
                Some(initializer) => {
                    let value = self.eval_value(initializer)?;
                    Some(coerce(&declarator.name, ty, value, &declarator.token)?)
                },
                None => None,
            };
            self.stack.declare(&declarator.name, Some(ty), value);
        }
        Ok(())
    }

    /// Plain assignment stores the value; compound assignment loads the
    /// target, combines and stores the result.
    fn exec_assignment(&mut self,
                       target: &str,
                       op: AssignOperator,
                       value: &Expr,
                       token: &Token)
                       -> EvalResult<()> {
        let value = self.eval_value(value)?;
        let value = match op {
            AssignOperator::Assign => value,
            AssignOperator::Compound(op) => {
                let current = self.load(target, token)?;
                eval_binary(op, &current, &value, token.line, token.column)?
            },
        };
        self.store(target, value, token)
    }

    /// Reads the current value of a variable.
    pub(crate) fn load(&self, name: &str, token: &Token) -> EvalResult<Value> {
        self.stack
            .get(name)
            .and_then(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UnboundVariable { name:   name.to_string(),
                                                           line:   token.line,
                                                           column: token.column, })
    }

    /// Writes a variable, checking the type of its nearest binding.
    pub(crate) fn store(&mut self, name: &str, value: Value, token: &Token) -> EvalResult<()> {
        let value = match self.stack.get(name).and_then(|binding| binding.ty) {
            Some(ty) => coerce(name, ty, value, token)?,
            None => value,
        };
        self.stack.set(name, value);
        Ok(())
    }

    /// Evaluates an expression.
    ///
    /// # Returns
    /// `Some(Value)` for expressions that produce a value, or `None` for calls
    /// of `void` functions.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Literal { value, .. } => Ok(Some(value.into())),
            Expr::Variable { name, token } => self.load(name, token).map(Some),
            Expr::UnaryOp { op, expr, token } => self.eval_unary_op(*op, expr, token).map(Some),
            Expr::BinaryOp { left,
                             op,
                             right,
                             token, } => self.eval_binary_op(left, *op, right, token).map(Some),
            Expr::FunctionCall { name,
                                 arguments,
                                 token,
                                 .. } => self.eval_function_call(name, arguments, token),
            Expr::Access { accessor,
                           start,
                           end,
                           token, } => {
                self.eval_access(accessor, start, end.as_deref(), token).map(Some)
            },
            Expr::Range { token, .. } => {
                Err(RuntimeError::TypeError { details: "a range can only be iterated by a for loop".to_string(),
                                              line:    token.line,
                                              column:  token.column, })
            },
        }
    }

    /// Evaluates an expression that must produce a value.
    pub(crate) fn eval_value(&mut self, expr: &Expr) -> EvalResult<Value> {
        let (line, column) = expr.position();
        self.eval(expr)?
            .ok_or(RuntimeError::MissingValue { line, column })
    }
}

/// Fits `value` to the declared type `ty` of binding `name`.
pub(crate) fn coerce(name: &str, ty: TypeName, value: Value, token: &Token) -> EvalResult<Value> {
    let found = value.type_name();
    value.coerce_to(ty)
         .ok_or_else(|| RuntimeError::TypeMismatch { name:     name.to_string(),
                                                     expected: ty.to_string(),
                                                     found:    found.to_string(),
                                                     line:     token.line,
                                                     column:   token.column, })
}
