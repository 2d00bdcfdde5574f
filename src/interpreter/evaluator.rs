/// String indexing and slicing.
///
/// Resolves negative indices from the end and clamps slice bounds.
pub mod access;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, comparisons and logical operators, including the
/// short-circuit evaluation of `and` and `or`.
pub mod binary;

/// Conditionals and `while` loops.
///
/// Chooses branches, re-evaluates loop conditions and turns `break` and
/// `continue` outcomes into loop control.
pub mod control;

/// Core evaluation logic and interpreter state.
///
/// Contains the [`Interpreter`], its options, the [`Flow`] outcome of
/// statements, declarations, assignments and expression dispatch.
pub mod core;

/// Evaluation of `for` loops.
///
/// Builds integer ranges and string iterations and binds the loop variable
/// in the loop's frame.
pub mod for_loop;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;

/// The runtime scope chain.
///
/// Frames pushed for the program, branches, loops and calls, linked to their
/// outer frame by index.
pub mod stack;

/// Unary operator evaluation logic.
///
/// Implements numeric identity, arithmetic negation and logical `not`.
pub mod unary;

pub use self::core::{
    DEFAULT_MAX_CALL_DEPTH, EvalResult, Flow, Interpreter, InterpreterOptions, interpret,
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{stack::FrameKind, *};
    use crate::{
        error::RuntimeError,
        interpreter::{analyzer::analyze, lexer::tokenize, parser::parse, value::core::Value},
    };

    fn run_with(source: &str, options: InterpreterOptions) -> (Interpreter<Vec<u8>>, EvalResult<()>) {
        let program = parse(&tokenize(source).expect("source should tokenize")).expect("source should parse");
        analyze(&program).expect("source should analyze");
        let mut interpreter = Interpreter::with_options(Vec::new(), options);
        let result = interpreter.run(&program);
        (interpreter, result)
    }

    fn run(source: &str) -> Interpreter<Vec<u8>> {
        let (interpreter, result) = run_with(source, InterpreterOptions::default());
        result.expect("program should run");
        interpreter
    }

    fn output(interpreter: &Interpreter<Vec<u8>>) -> String {
        String::from_utf8_lossy(interpreter.output()).into_owned()
    }

    #[test]
    fn false_while_pushes_no_frame() {
        let interpreter = run("while (false) { }");
        assert_eq!(interpreter.stack().pushed(FrameKind::While), 0);
        assert_eq!(interpreter.stack().pushed(FrameKind::Global), 1);
        assert!(interpreter.stack().is_empty());
    }

    #[test]
    fn one_while_frame_per_iteration_and_one_for_frame_per_loop() {
        let interpreter = run("var(int) n = 3; while n > 0 { n -= 1; } for var(int) i in 0:5 { }");
        assert_eq!(interpreter.stack().pushed(FrameKind::While), 3);
        assert_eq!(interpreter.stack().pushed(FrameKind::For), 1);
    }

    #[test]
    fn only_the_taken_branch_pushes_a_frame() {
        let interpreter = run("var(int) a = 4; var(str) r;
                               if a < 3 { r = \"small\"; } elseif a < 5 { r = \"medium\"; } else { r = \"large\"; }");
        assert_eq!(interpreter.global("r"), Some(&Value::from("medium")));
        assert_eq!(interpreter.stack().pushed(FrameKind::Conditional), 1);

        let interpreter = run("if false { }");
        assert_eq!(interpreter.stack().pushed(FrameKind::Conditional), 0);
    }

    #[test]
    fn frames_unwind_on_error() {
        let source = "func(int) f(var(int) d) { while true { for var(int) i in 0:1 { return 1 // d; } } return 0; }
                      print(f(0));";
        let (interpreter, result) = run_with(source, InterpreterOptions::default());
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
        assert!(interpreter.stack().is_empty());
    }

    #[test]
    fn break_and_continue_affect_only_the_innermost_loop() {
        let source = "var(int) outer = 0, inner = 0;
                      for var(int) i in 0:3 {
                          outer += 1;
                          for var(int) j in 0:10 {
                              if j == 2 { break; }
                              if j == 0 { continue; }
                              inner += 1;
                          }
                      }";
        let interpreter = run(source);
        assert_eq!(interpreter.global("outer"), Some(&Value::Integer(3)));
        assert_eq!(interpreter.global("inner"), Some(&Value::Integer(3)));
    }

    #[test]
    fn return_unwinds_through_loops() {
        let interpreter = run("func(int) first_even(var(int) from) {
                                   for var(int) i in from:100 { if i % 2 == 0 { return i; } }
                                   return -1;
                               }
                               var(int) e = first_even(7);");
        assert_eq!(interpreter.global("e"), Some(&Value::Integer(8)));
        assert_eq!(interpreter.stack().pushed(FrameKind::Function), 1);
    }

    #[test]
    fn defaults_are_evaluated_in_the_call_frame() {
        let interpreter = run("func(int) add(var(int) x, var(int) y = x * 10) { return x + y; }
                               var(int) a = add(2), b = add(2, 3);");
        assert_eq!(interpreter.global("a"), Some(&Value::Integer(22)));
        assert_eq!(interpreter.global("b"), Some(&Value::Integer(5)));
    }

    #[test]
    fn functions_see_their_declaring_scope_not_the_caller() {
        let source = "var(int) x = 1;
                      func(int) get() { return x; }
                      func(int) shadow() { var(int) x = 99; return get(); }
                      var(int) seen = shadow();";
        let interpreter = run(source);
        assert_eq!(interpreter.global("seen"), Some(&Value::Integer(1)));
    }

    #[test]
    fn assignment_updates_the_nearest_binding() {
        let interpreter = run("var(int) total = 0; for var(int) i in 0:4 { total += i; }");
        assert_eq!(interpreter.global("total"), Some(&Value::Integer(6)));
        assert_eq!(interpreter.global("i"), None);
    }

    #[test]
    fn recursion_is_bounded() {
        let source = "func(int) down(var(int) n) { return down(n + 1); } down(0);";
        let (interpreter, result) = run_with(source, InterpreterOptions { max_call_depth: 16 });
        assert!(matches!(result, Err(RuntimeError::RecursionLimit { limit: 16, .. })));
        assert!(interpreter.stack().is_empty());
    }

    #[test]
    fn typed_bindings_widen_ints_and_reject_mismatches() {
        let interpreter = run("var(float) f = 2; f += 1;");
        assert_eq!(interpreter.global("f"), Some(&Value::Float(3.0)));

        let (_, result) = run_with("var(int) i = 1; i /= 2;", InterpreterOptions::default());
        assert!(matches!(result, Err(RuntimeError::TypeMismatch { ref expected, ref found, .. })
                         if expected == "int" && found == "float"));
    }

    #[test]
    fn unassigned_variables_are_unbound() {
        let (_, result) = run_with("var(str) s; print(s);", InterpreterOptions::default());
        assert_eq!(result,
                   Err(RuntimeError::UnboundVariable { name:   "s".to_string(),
                                                       line:   1,
                                                       column: 19, }));
    }

    #[test]
    fn non_void_function_must_return() {
        let (_, result) = run_with("func(int) f(var(bool) b) { if b { return 1; } } f(false);",
                                   InterpreterOptions::default());
        assert!(matches!(result, Err(RuntimeError::MissingReturnValue { ref name, .. }) if name == "f"));
    }

    #[test]
    fn print_writes_to_the_injected_writer() {
        let interpreter = run("print(1, 2.5, true, \"x\"); print(); print(7 / 2, 4 / 2);");
        assert_eq!(output(&interpreter), "1 2.5 true x\n\n3.5 2.0\n");
    }

    #[test]
    fn void_results_cannot_be_used_as_values() {
        let (_, result) = run_with("func(void) f() { } var(int) a = f();", InterpreterOptions::default());
        assert!(matches!(result, Err(RuntimeError::MissingValue { .. })));
    }
}
