use std::io::Write;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter, coerce},
            function::builtin,
        },
        lexer::Token,
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the program output, the evaluated arguments and the
/// position of the call. It returns `None` when it produces no value.
type BuiltinFn = fn(&mut dyn Write, &[Value], usize, usize) -> EvalResult<Option<Value>>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `Variadic` accepts any number of arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    Variadic,
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the accepted argument count,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of the functions every program can call.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"  => { arity: Arity::Variadic, func: builtin::print },
    "assert" => { arity: Arity::Exact(1), func: builtin::assert },
    "len"    => { arity: Arity::Exact(1), func: builtin::len },
    "str"    => { arity: Arity::Exact(1), func: builtin::to_str },
    "int"    => { arity: Arity::Exact(1), func: builtin::to_int },
    "float"  => { arity: Arity::Exact(1), func: builtin::to_float },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::Variadic => true,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::Variadic => "any number of".to_string(),
        }
    }
}

impl<W: Write> Interpreter<W> {
    /// Evaluates a function call.
    ///
    /// Arguments are evaluated left to right in the caller's frame. The name
    /// is resolved through the stack first, so user-defined functions shadow
    /// the built-ins of the same name.
    ///
    /// # Returns
    /// The returned value, or `None` for `void` functions and for built-ins
    /// producing nothing.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     arguments: &[Expr],
                                     token: &Token)
                                     -> EvalResult<Option<Value>> {
        let args = arguments.iter()
                            .map(|argument| self.eval_value(argument))
                            .collect::<EvalResult<Vec<_>>>()?;

        if let Some((outer, declaration)) = self.stack.find_function(name) {
            return self.call_user_defined_function(&declaration, outer, args, token);
        }

        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == name) {
            if !builtin.arity.check(args.len()) {
                return Err(RuntimeError::ArgumentCountMismatch { name:     name.to_string(),
                                                                 expected: builtin.arity
                                                                                  .describe(),
                                                                 found:    args.len(),
                                                                 line:     token.line,
                                                                 column:   token.column, });
            }
            return (builtin.func)(&mut self.output, &args, token.line, token.column);
        }

        Err(RuntimeError::UnknownFunction { name:   name.to_string(),
                                            line:   token.line,
                                            column: token.column, })
    }

    /// Executes a user-defined function.
    ///
    /// A `function` frame is pushed whose outer frame is the frame the
    /// function was declared in, so the body sees the declaring scope and not
    /// the caller's. Parameters are bound left to right; omitted trailing
    /// parameters take their default, evaluated inside the new frame where
    /// earlier parameters are already bound.
    ///
    /// # Errors
    /// - Wrong number of arguments.
    /// - Call depth above [`InterpreterOptions::max_call_depth`].
    /// - A non-void function finishing without `return`.
    ///
    /// [`InterpreterOptions::max_call_depth`]: crate::interpreter::evaluator::core::InterpreterOptions::max_call_depth
    fn call_user_defined_function(&mut self,
                                  declaration: &FunctionDecl,
                                  outer: usize,
                                  args: Vec<Value>,
                                  token: &Token)
                                  -> EvalResult<Option<Value>> {
        let total = declaration.params.len();
        let required = declaration.required_params();
        if args.len() < required || args.len() > total {
            let expected = if required == total {
                total.to_string()
            } else {
                format!("{required} to {total}")
            };
            return Err(RuntimeError::ArgumentCountMismatch { name: declaration.name.clone(),
                                                             expected,
                                                             found: args.len(),
                                                             line: token.line,
                                                             column: token.column });
        }

        if self.call_depth >= self.options.max_call_depth {
            return Err(RuntimeError::RecursionLimit { limit:  self.options.max_call_depth,
                                                      line:   token.line,
                                                      column: token.column, });
        }

        self.call_depth += 1;
        self.stack.push_function(declaration.name.as_str(), outer);
        trace!(function = %declaration.name, depth = self.call_depth, "call");

        let result = self.run_function_body(declaration, args, token);

        self.stack.pop();
        self.call_depth -= 1;
        result
    }

    fn run_function_body(&mut self,
                         declaration: &FunctionDecl,
                         args: Vec<Value>,
                         token: &Token)
                         -> EvalResult<Option<Value>> {
        let mut args = args.into_iter();
        for param in &declaration.params {
            let value = match (args.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.eval_value(default)?,
                (None, None) => {
                    return Err(RuntimeError::MissingValue { line:   token.line,
                                                            column: token.column, });
                },
            };
            let value = coerce(&param.name, param.var_type.name, value, &param.token)?;
            self.stack.declare(&param.name, Some(param.var_type.name), Some(value));
        }

        let returned = match self.exec_statements(&declaration.body)? {
            Flow::Return(value) => value,
            Flow::Normal | Flow::Break | Flow::Continue => None,
        };

        match (declaration.return_type.name, returned) {
            (None, _) => Ok(None),
            (Some(ty), Some(value)) => {
                coerce(&declaration.name, ty, value, &declaration.token).map(Some)
            },
            (Some(_), None) => {
                Err(RuntimeError::MissingReturnValue { name:   declaration.name.clone(),
                                                       line:   token.line,
                                                       column: token.column, })
            },
        }
    }
}
