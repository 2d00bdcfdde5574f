use std::{fs, thread};

use cove::{
    Error,
    error::{ParseError, RuntimeError, SemanticError},
    interpreter::{
        analyzer::Analyzer,
        evaluator::{
            DEFAULT_MAX_CALL_DEPTH, Interpreter, InterpreterOptions, function::core::BUILTIN_FUNCTIONS,
            stack::FrameKind,
        },
        lexer::{TokenKind, tokenize},
        parser::{MAX_NESTING_DEPTH, parse},
        value::core::Value,
    },
    run_with_output,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

fn output_of(src: &str) -> Result<String, Error> {
    let output = run_with_output(src, Vec::new(), InterpreterOptions::default())?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn assert_success(src: &str) {
    if let Err(e) = output_of(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) -> Error {
    match output_of(src) {
        Ok(_) => panic!("Script succeeded but was expected to fail\n{src}"),
        Err(e) => e,
    }
}

fn interpreter_after(src: &str) -> Interpreter<Vec<u8>> {
    let program = parse(&tokenize(src).expect("lexes")).expect("parses");
    Analyzer::new().analyze_program(&program).expect("analyzes");
    let mut interpreter = Interpreter::new(Vec::new());
    interpreter.run(&program).expect("runs");
    interpreter
}

#[test]
fn programs_directory_scripts_pass() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "co"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = output_of(&content) {
            panic!("Script {path:?} failed:\nError: {e}");
        }
    }

    assert!(count > 0, "No scripts found in tests/programs");
}

#[test]
fn compound_assignment_scenario() {
    let interpreter = interpreter_after("var(int) a = 1, b = 2; a += b;");
    assert_eq!(interpreter.global("a"), Some(&Value::Integer(3)));
    assert_eq!(interpreter.global("b"), Some(&Value::Integer(2)));
}

#[test]
fn compound_assignments() {
    assert_success("var(int) x = 2; x += 3; assert(x == 5);");
    assert_success("var(int) x = 7; x -= 2; assert(x == 5);");
    assert_success("var(int) x = 4; x *= 2; assert(x == 8);");
    assert_success("var(float) x = 9; x /= 2; assert(x == 4.5);");
    assert_success("var(int) x = 9; x //= 2; assert(x == 4);");
    assert_success("var(int) x = 9; x %= 4; assert(x == 1);");
    assert_success("var(str) s = \"ab\"; s += \"c\"; assert(s == \"abc\");");
}

#[test]
fn branch_locals_do_not_leak() {
    let error = assert_failure("if (1 < 2) { var(int) x = 5; } print(x);");
    assert!(matches!(error,
                     Error::Semantic(SemanticError::UndeclaredVariable { ref name, line: 1, column: 38 })
                     if name == "x"));
}

#[test]
fn undeclared_names_fail_analysis() {
    assert!(matches!(assert_failure("assert(foo == 1);"),
                     Error::Semantic(SemanticError::UndeclaredVariable { .. })));
    assert!(matches!(assert_failure("foo = 1;"),
                     Error::Semantic(SemanticError::UndeclaredVariable { .. })));
    assert!(matches!(assert_failure("foo(1);"),
                     Error::Semantic(SemanticError::UndeclaredVariable { .. })));
    assert_success("var(int) foo = 1; assert(foo == 1);");
}

#[test]
fn default_parameter_is_bound_in_call_frame() {
    assert_success("func(int) add(var(int) x, var(int) y = 1) { return x + y; }
                    assert(add(1) == 2);
                    assert(add(1, 5) == 6);");
    assert_success("var(int) y = 100;
                    func(int) pick(var(int) y = 7) { return y; }
                    assert(pick() == 7);
                    assert(y == 100);");
}

#[test]
fn string_literal_keeps_escaped_newline() {
    let tokens = tokenize(r#""a\nb""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::Eof);
    assert_eq!(output_of(r#"print("a\nb");"#).unwrap(), "a\nb\n");
}

#[test]
fn false_while_pushes_no_frames() {
    let interpreter = interpreter_after("while (false) { }");
    assert_eq!(interpreter.stack().pushed(FrameKind::While), 0);
    assert!(interpreter.stack().is_empty());
}

#[test]
fn range_iteration_counts() {
    for (start, end) in [(0, 1), (0, 10), (-5, 3), (7, 8)] {
        let src = format!("var(int) n = 0; for var(int) i in {start}:{end} {{ n += 1; }} print(n);");
        assert_eq!(output_of(&src).unwrap(), format!("{}\n", end - start));
    }
    for (start, end, step) in [(0, 10, 3), (0, 9, 3), (-4, 4, 5), (1, 2, 10)] {
        let src = format!("var(int) n = 0; for var(int) i in {start}:{end}:{step} {{ n += 1; }} print(n);");
        let expected = (end - start + step - 1) / step;
        assert_eq!(output_of(&src).unwrap(), format!("{expected}\n"));
    }
    assert_eq!(output_of("for var(int) i in 5:0:-2 { print(i); }").unwrap(), "5\n3\n1\n");
    assert_eq!(output_of("var(int) n = 0; for var(int) i in 3:3 { n += 1; } print(n);").unwrap(),
               "0\n");
}

#[test]
fn zero_step_is_an_invalid_range() {
    assert!(matches!(assert_failure("for var(int) i in 0:10:0 { }"),
                     Error::Runtime(RuntimeError::InvalidRange { .. })));
}

#[test]
fn floor_division_identity() {
    for a in [-7, -6, -1, 0, 1, 6, 7, 13] {
        for b in [-3, -2, 1, 2, 5] {
            let src = format!("var(int) a = {a}, b = {b}; assert((a // b) * b + (a % b) == a);");
            assert_success(&src);
        }
    }
    assert_eq!(output_of("print(-7 // 2, -7 % 2, 7 % -2);").unwrap(), "-4 1 -1\n");
}

#[test]
fn break_and_continue_target_the_innermost_loop() {
    let src = "var(str) trace = \"\";
               for var(int) i in 0:3 {
                   var(int) j = 0;
                   while true {
                       j += 1;
                       if j == 2 { continue; }
                       if j > 3 { break; }
                       trace += str(j);
                   }
                   trace += \"|\";
               }
               print(trace);";
    assert_eq!(output_of(src).unwrap(), "13|13|13|\n");
}

#[test]
fn logical_and_comparisons() {
    assert_success("assert(2 < 3);");
    assert_success("assert(3 > 2);");
    assert_success("assert(2 <= 2);");
    assert_success("assert(3 >= 3);");
    assert_success("assert(2 != 3);");
    assert_success("assert(2 == 2.0);");
    assert_success("assert(9007199254740993 != 9007199254740992.0);");
    assert_success("assert(9007199254740992 == 9007199254740992.0);");
    assert_success("assert(9007199254740993 > 9007199254740992.0);");
    assert_success("assert(-1 < -0.5 and 3.5 > 3);");
    assert_success("assert(not false);");
    assert_success("assert(\"abc\" < \"abd\");");
    assert_success("assert(true or 1 // 0 == 0);");
    assert_success("assert(not (false and 1 // 0 == 0));");
}

#[test]
fn strings_index_slice_and_iterate() {
    assert_success("var(str) s = \"hello\";
                    assert(s[1] == \"e\");
                    assert(s[-1] == \"o\");
                    assert(s[1:3] == \"el\");
                    assert(s[3:100] == \"lo\");
                    assert(len(s) == 5);");
    assert_eq!(output_of("for var(str) c in \"abc\" { print(c); }").unwrap(), "a\nb\nc\n");
    assert!(matches!(assert_failure("print(\"abc\"[3]);"),
                     Error::Runtime(RuntimeError::IndexOutOfBounds { len: 3, index: 3, .. })));
}

#[test]
fn conversions() {
    assert_success("assert(int(\"42\") == 42);");
    assert_success("assert(int(-2.9) == -2);");
    assert_success("assert(float(1) == 1.0);");
    assert_success("assert(str(1.5) + str(2) == \"1.52\");");
    assert!(matches!(assert_failure("print(int(\"x\"));"),
                     Error::Runtime(RuntimeError::InvalidArgument { .. })));
}

#[test]
fn recursion() {
    assert_success("func(int) fib(var(int) n) { if n < 2 { return n; } return fib(n - 1) + fib(n - 2); }
                    assert(fib(15) == 610);");

    let error = run_with_output("func(void) forever() { forever(); } forever();",
                                Vec::new(),
                                InterpreterOptions { max_call_depth: 20 }).unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::RecursionLimit { limit: 20, .. })));
}

/// Runs a script with default options on a thread with a 2 MiB stack.
fn output_on_small_stack(src: String) -> Result<String, Error> {
    thread::Builder::new().stack_size(2 * 1024 * 1024)
                          .spawn(move || output_of(&src))
                          .expect("thread spawns")
                          .join()
                          .expect("script does not overflow the stack")
}

#[test]
fn default_call_depth_fits_a_small_stack() {
    let depth = |n: usize| {
        format!("func(int) d(var(int) n) {{ if n == 0 {{ return 0; }} return d(n - 1) + 1; }}
                 assert(d({n}) == {n});")
    };

    assert_eq!(output_on_small_stack(depth(DEFAULT_MAX_CALL_DEPTH - 1)).unwrap(), "");
    assert!(matches!(output_on_small_stack(depth(DEFAULT_MAX_CALL_DEPTH)),
                     Err(Error::Runtime(RuntimeError::RecursionLimit { limit: DEFAULT_MAX_CALL_DEPTH, .. }))));
    assert!(matches!(output_on_small_stack(depth(10 * DEFAULT_MAX_CALL_DEPTH)),
                     Err(Error::Runtime(RuntimeError::RecursionLimit { .. }))));
}

#[test]
fn deep_nesting_fails_without_overflowing() {
    let grouped = format!("var(int) x = {}1{};", "(".repeat(20_000), ")".repeat(20_000));
    assert!(matches!(output_on_small_stack(grouped),
                     Err(Error::Parse(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH, .. }))));

    let limit = MAX_NESTING_DEPTH - 2;
    let nested = format!("var(int) x = {}1{}; assert(x == 1);", "(".repeat(limit), ")".repeat(limit));
    assert_eq!(output_on_small_stack(nested).unwrap(), "");
}

#[test]
fn user_functions_shadow_builtins() {
    assert_success("func(int) len(var(str) s) { return 42; } assert(len(\"a\") == 42);");
}

#[test]
fn every_builtin_is_known_to_the_analyzer() {
    let analyzer = Analyzer::new();
    let root = &analyzer.scopes().scopes()[0];
    assert_eq!(root.name, "builtins");
    for name in BUILTIN_FUNCTIONS {
        assert!(root.symbols.contains_key(*name), "{name} is missing from the root scope");
    }
}

#[test]
fn jumps_outside_their_construct_fail() {
    assert!(matches!(assert_failure("break;"),
                     Error::Semantic(SemanticError::OutsideLoop { keyword: "break", .. })));
    assert!(matches!(assert_failure("while true { func(void) f() { continue; } }"),
                     Error::Semantic(SemanticError::OutsideLoop { keyword: "continue", .. })));
    assert!(matches!(assert_failure("return 1;"),
                     Error::Semantic(SemanticError::ReturnOutsideFunction { .. })));
}

#[test]
fn arity_is_checked_before_running() {
    let error = assert_failure("print(\"started\"); func(int) f(var(int) x, var(int) y) { return x + y; } f(3);");
    assert!(matches!(error,
                     Error::Semantic(SemanticError::ArgumentCountMismatch { found: 1, ref expected, .. })
                     if expected == "2"));
}

#[test]
fn runtime_errors() {
    assert!(matches!(assert_failure("var(int) x = 1 // 0;"),
                     Error::Runtime(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(assert_failure("var(int) x = 9223372036854775807; x += 1;"),
                     Error::Runtime(RuntimeError::Overflow { .. })));
    assert!(matches!(assert_failure("var(int) x = \"one\";"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(assert_failure("if 1 { }"), Error::Runtime(RuntimeError::TypeError { .. })));
    assert!(matches!(assert_failure("assert(1 > 2);"),
                     Error::Runtime(RuntimeError::AssertionFailed { line: 1, column: 1 })));
}

#[test]
fn unicode_identifiers() {
    assert_eq!(output_of("var(int) größe = 3; func(int) doppelt(var(int) n) { return 2 * n; } print(doppelt(größe));")
                   .unwrap(),
               "6\n");
}

#[test]
fn error_messages_carry_positions() {
    assert_eq!(assert_failure("var(int) a;\n  a = 1 $ 2;").to_string(),
               "Error on line 2, column 9: Unexpected character '$'.");
    assert_eq!(assert_failure("print(y);").to_string(),
               "Error on line 1, column 7: Undeclared variable 'y'.");
    assert_eq!(assert_failure(&format!("var(float) f = 1{}.0;", "0".repeat(400))).to_string(),
               format!("Error on line 1, column 16: Float literal 1{}.0 is too large.", "0".repeat(400)));
}
