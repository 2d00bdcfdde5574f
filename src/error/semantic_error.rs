/// Represents all errors the scope checker can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// A name is used without being declared in any enclosing scope.
    #[error("Error on line {line}, column {column}: Undeclared variable '{name}'.")]
    UndeclaredVariable {
        /// The name of the variable.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A name is declared twice in the same scope.
    #[error("Error on line {line}, column {column}: '{name}' is already declared in this scope.")]
    Redeclaration {
        /// The name being redeclared.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A call passes too few or too many arguments.
    #[error("Error on line {line}, column {column}: Function '{name}' expects {expected} argument(s), but {found} were given.")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// The accepted argument count, e.g. `2` or `1 to 3`.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Something that is not a function is called.
    #[error("Error on line {line}, column {column}: '{name}' is not a function.")]
    NotCallable {
        /// The name being called.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A function name is used as a value or assigned to.
    #[error("Error on line {line}, column {column}: Function '{name}' cannot be used as a variable.")]
    NotAVariable {
        /// The function name.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A parameter without a default follows one with a default.
    #[error("Error on line {line}, column {column}: Parameter '{name}' without a default follows a parameter with a default.")]
    RequiredAfterDefault {
        /// The offending parameter.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// `break` or `continue` outside of a loop body.
    #[error("Error on line {line}, column {column}: '{keyword}' outside of a loop.")]
    OutsideLoop {
        /// `break` or `continue`.
        keyword: &'static str,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// `return` outside of a function body.
    #[error("Error on line {line}, column {column}: 'return' outside of a function.")]
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A bare `return;` inside a function that returns a value.
    #[error("Error on line {line}, column {column}: Function '{function}' must return a value.")]
    MissingReturnValue {
        /// The enclosing function.
        function: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// `return <expr>;` inside a void function.
    #[error("Error on line {line}, column {column}: Void function '{function}' cannot return a value.")]
    UnexpectedReturnValue {
        /// The enclosing function.
        function: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
}
