/// The traversal applying the scoping rules.
///
/// Declarations, uses, calls, jumps and returns are checked in one pass over
/// the program.
pub mod core;
/// Static scopes and their symbols.
///
/// An index-based tree of scopes rooted at the built-in scope.
pub mod symbol_table;

pub use self::core::{AnalyzeResult, Analyzer, analyze};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::SemanticError,
        interpreter::{lexer::tokenize, parser::parse},
    };

    fn check(source: &str) -> AnalyzeResult<()> {
        let tokens = tokenize(source).expect("source should tokenize");
        analyze(&parse(&tokens).expect("source should parse"))
    }

    #[test]
    fn declared_names_analyze() {
        let source = "var(int) a = 1, b = 2; a += b;
                      func(int) add(var(int) x, var(int) y = a) { return x + y; }
                      print(add(a), str(len(\"abc\")));";
        assert_eq!(check(source), Ok(()));
    }

    #[test]
    fn undeclared_names_fail() {
        assert_eq!(check("print(x);"),
                   Err(SemanticError::UndeclaredVariable { name:   "x".to_string(),
                                                           line:   1,
                                                           column: 7, }));
        assert!(matches!(check("y = 1;"), Err(SemanticError::UndeclaredVariable { .. })));
        assert!(matches!(check("missing();"), Err(SemanticError::UndeclaredVariable { .. })));
    }

    #[test]
    fn branch_locals_do_not_leak() {
        let result = check("if (1 < 2) { var(int) x = 5; } print(x);");
        assert!(matches!(result, Err(SemanticError::UndeclaredVariable { ref name, .. }) if name == "x"));
        assert!(check("for var(int) i in 0:3 { } print(i);").is_err());
        assert!(check("while false { var(int) w; } w = 1;").is_err());
    }

    #[test]
    fn initializers_see_the_outer_binding() {
        assert!(matches!(check("var(int) a = a;"),
                         Err(SemanticError::UndeclaredVariable { .. })));
        assert_eq!(check("var(int) a = 1; while true { var(int) a = a + 1; break; }"),
                   Ok(()));
    }

    #[test]
    fn redeclaration_in_the_same_scope_fails() {
        assert!(matches!(check("var(int) a; var(str) a;"),
                         Err(SemanticError::Redeclaration { .. })));
        assert!(matches!(check("var(int) a, a;"), Err(SemanticError::Redeclaration { .. })));
        assert!(matches!(check("func(void) f() { } func(void) f() { }"),
                         Err(SemanticError::Redeclaration { .. })));
        assert!(matches!(check("func(void) f(var(int) x, var(int) x) { }"),
                         Err(SemanticError::Redeclaration { .. })));
        assert!(matches!(check("func(void) f(var(int) x) { var(int) x; }"),
                         Err(SemanticError::Redeclaration { .. })));
        assert_eq!(check("var(int) print = 1;"), Ok(()));
    }

    #[test]
    fn call_arity_is_checked() {
        let declaration = "func(int) f(var(int) a, var(int) b = 2) { return a + b; }";
        assert_eq!(check(&format!("{declaration} f(1); f(1, 2);")), Ok(()));
        assert_eq!(check(&format!("{declaration} f();")),
                   Err(SemanticError::ArgumentCountMismatch { name:     "f".to_string(),
                                                              expected: "1 to 2".to_string(),
                                                              found:    0,
                                                              line:     1,
                                                              column:   59, }));
        assert!(matches!(check("len(\"a\", \"b\");"),
                         Err(SemanticError::ArgumentCountMismatch { .. })));
        assert_eq!(check("print(); print(1, 2, 3);"), Ok(()));
    }

    #[test]
    fn functions_and_variables_are_not_interchangeable() {
        assert!(matches!(check("var(int) a = 1; a();"), Err(SemanticError::NotCallable { .. })));
        assert!(matches!(check("func(void) f() { } var(int) a = f;"),
                         Err(SemanticError::NotAVariable { .. })));
        assert!(matches!(check("func(void) f() { } f = 1;"),
                         Err(SemanticError::NotAVariable { .. })));
    }

    #[test]
    fn recursion_and_defaults() {
        assert_eq!(check("func(int) fact(var(int) n) { if n < 2 { return 1; } return n * fact(n - 1); }"),
                   Ok(()));
        assert!(matches!(check("func(void) f(var(int) a = 1, var(int) b) { }"),
                         Err(SemanticError::RequiredAfterDefault { ref name, .. }) if name == "b"));
        assert_eq!(check("func(int) f(var(int) a, var(int) b = a * 2) { return b; }"), Ok(()));
    }

    #[test]
    fn jumps_need_a_loop_and_functions_reset_nesting() {
        assert!(matches!(check("break;"),
                         Err(SemanticError::OutsideLoop { keyword: "break", .. })));
        assert!(matches!(check("if true { continue; }"),
                         Err(SemanticError::OutsideLoop { keyword: "continue", .. })));
        assert_eq!(check("while true { if true { break; } continue; }"), Ok(()));
        assert!(matches!(check("while true { func(void) f() { break; } }"),
                         Err(SemanticError::OutsideLoop { .. })));
    }

    #[test]
    fn return_must_match_the_function() {
        assert!(matches!(check("return;"), Err(SemanticError::ReturnOutsideFunction { .. })));
        assert!(matches!(check("func(int) f() { return; }"),
                         Err(SemanticError::MissingReturnValue { .. })));
        assert!(matches!(check("func(void) f() { return 1; }"),
                         Err(SemanticError::UnexpectedReturnValue { .. })));
        assert_eq!(check("func(void) f() { while true { return; } }"), Ok(()));
    }

    #[test]
    fn scopes_form_a_tree_under_the_builtins() {
        let tokens = tokenize("if true { } else { } while false { } func(void) f() { }").unwrap();
        let program = parse(&tokens).unwrap();
        let mut analyzer = Analyzer::new();
        analyzer.analyze_program(&program).unwrap();

        let scopes = analyzer.scopes().scopes();
        let names: Vec<_> = scopes.iter().map(|s| (s.name.as_str(), s.level, s.outer)).collect();
        assert_eq!(names,
                   [("builtins", 0, None),
                    ("global", 1, Some(0)),
                    ("if#1", 2, Some(1)),
                    ("else#2", 2, Some(1)),
                    ("while#3", 2, Some(1)),
                    ("f", 2, Some(1))]);
        assert!(scopes[1].symbols.contains_key("while#3"));
        assert_eq!(analyzer.scopes().current().name, "builtins");
    }
}
