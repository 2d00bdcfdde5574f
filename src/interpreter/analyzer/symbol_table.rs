use std::collections::HashMap;

use crate::ast::TypeName;

/// What a name in a scope stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// A type or control keyword seeded into the root scope.
    BuiltinType,
    /// A declared variable or parameter.
    Variable {
        /// The declared type.
        ty: TypeName,
    },
    /// A user-defined or built-in function.
    Function {
        /// The return type, `None` for `void`.
        return_type: Option<TypeName>,
        /// Number of parameters without a default.
        required:    usize,
        /// Total number of parameters, `None` for variadic built-ins.
        total:       Option<usize>,
    },
    /// Marker for a conditional branch, `while` or `for` scope opened here.
    Block,
}

/// A named entry of a [`ScopeSymbolTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The name the symbol is bound to.
    pub name: String,
    /// What the name stands for.
    pub kind: SymbolKind,
}

impl Symbol {
    /// Creates a variable symbol.
    #[must_use]
    pub fn variable(name: impl Into<String>, ty: TypeName) -> Self {
        Self { name: name.into(),
               kind: SymbolKind::Variable { ty } }
    }

    /// Creates a function symbol.
    #[must_use]
    pub fn function(name: impl Into<String>,
                    return_type: Option<TypeName>,
                    required: usize,
                    total: Option<usize>)
                    -> Self {
        Self { name: name.into(),
               kind: SymbolKind::Function { return_type,
                                            required,
                                            total } }
    }

    /// Describes the accepted argument count of a function symbol, e.g. `2`,
    /// `1 to 3` or `any number of`.
    #[must_use]
    pub fn arity(&self) -> Option<String> {
        match self.kind {
            SymbolKind::Function { required, total, .. } => Some(match total {
                None if required == 0 => "any number of".to_string(),
                None => format!("at least {required}"),
                Some(total) if total == required => total.to_string(),
                Some(total) => format!("{required} to {total}"),
            }),
            SymbolKind::BuiltinType | SymbolKind::Variable { .. } | SymbolKind::Block => None,
        }
    }
}

/// One static scope: the names declared directly in a program region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSymbolTable {
    /// Scope name: `builtins`, `global`, a function name or `while#3`.
    pub name:    String,
    /// Nesting depth; the root scope has level 0.
    pub level:   usize,
    /// Index of the enclosing scope in the owning [`ScopeTree`].
    pub outer:   Option<usize>,
    /// Names declared in this scope.
    pub symbols: HashMap<String, Symbol>,
}

/// Arena holding every scope created during analysis.
///
/// Scopes refer to their parents by index, so the tree survives the
/// traversal and can be inspected afterwards.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes:  Vec<ScopeSymbolTable>,
    current: usize,
}

/// Names seeded into the root scope as [`SymbolKind::BuiltinType`].
pub const BUILTIN_TYPES: [&str; 10] =
    ["int", "float", "bool", "str", "void", "if", "elseif", "else", "while", "for"];

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates the tree with the root `builtins` scope as the current scope.
    ///
    /// The root holds the type and control keywords and the built-in
    /// functions; programs start in a `global` scope entered below it.
    #[must_use]
    pub fn new() -> Self {
        let mut root = ScopeSymbolTable { name:    "builtins".to_string(),
                                          level:   0,
                                          outer:   None,
                                          symbols: HashMap::new(), };

        for name in BUILTIN_TYPES {
            root.symbols.insert(name.to_string(),
                                Symbol { name: name.to_string(),
                                         kind: SymbolKind::BuiltinType, });
        }
        for symbol in builtin_functions() {
            root.symbols.insert(symbol.name.clone(), symbol);
        }

        Self { scopes:  vec![root],
               current: 0, }
    }

    /// Opens a scope nested in the current one and makes it current.
    ///
    /// Returns the index of the new scope.
    pub fn enter(&mut self, name: impl Into<String>) -> usize {
        let level = self.scopes[self.current].level + 1;
        self.scopes.push(ScopeSymbolTable { name: name.into(),
                                            level,
                                            outer: Some(self.current),
                                            symbols: HashMap::new() });
        self.current = self.scopes.len() - 1;
        self.current
    }

    /// Returns to the enclosing scope. The root scope is never left.
    pub fn exit(&mut self) {
        if let Some(outer) = self.scopes[self.current].outer {
            self.current = outer;
        }
    }

    /// The scope declarations currently go into.
    #[must_use]
    pub fn current(&self) -> &ScopeSymbolTable {
        &self.scopes[self.current]
    }

    /// All scopes in creation order; index 0 is the root.
    #[must_use]
    pub fn scopes(&self) -> &[ScopeSymbolTable] {
        &self.scopes
    }

    /// Binds a symbol in the current scope.
    ///
    /// Returns `false` and leaves the scope unchanged if the name is already
    /// bound there.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let symbols = &mut self.scopes[self.current].symbols;
        if symbols.contains_key(&symbol.name) {
            return false;
        }
        symbols.insert(symbol.name.clone(), symbol);
        true
    }

    /// Looks a name up in the current scope only.
    #[must_use]
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current].symbols.get(name)
    }

    /// Looks a name up in the current scope, then in each enclosing scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut index = Some(self.current);
        while let Some(scope) = index.map(|i| &self.scopes[i]) {
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            index = scope.outer;
        }
        None
    }
}

/// Signatures of the functions every program can call.
fn builtin_functions() -> [Symbol; 6] {
    [Symbol::function("print", None, 0, None),
     Symbol::function("assert", None, 1, Some(1)),
     Symbol::function("len", Some(TypeName::Int), 1, Some(1)),
     Symbol::function("str", Some(TypeName::Str), 1, Some(1)),
     Symbol::function("int", Some(TypeName::Int), 1, Some(1)),
     Symbol::function("float", Some(TypeName::Float), 1, Some(1))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward_and_shadowing_is_local() {
        let mut tree = ScopeTree::new();
        tree.enter("global");
        assert!(tree.insert(Symbol::variable("x", TypeName::Int)));
        tree.enter("while#1");
        assert!(tree.insert(Symbol::variable("x", TypeName::Str)));

        assert_eq!(tree.lookup("x").map(|s| &s.kind),
                   Some(&SymbolKind::Variable { ty: TypeName::Str }));
        assert_eq!(tree.current().level, 2);

        tree.exit();
        assert_eq!(tree.lookup("x").map(|s| &s.kind),
                   Some(&SymbolKind::Variable { ty: TypeName::Int }));
        assert!(tree.lookup("print").is_some());
        assert!(tree.lookup("missing").is_none());
    }

    #[test]
    fn insert_rejects_names_bound_in_the_same_scope() {
        let mut tree = ScopeTree::new();
        tree.enter("global");
        assert!(tree.insert(Symbol::variable("a", TypeName::Int)));
        assert!(!tree.insert(Symbol::function("a", None, 0, Some(0))));
        assert!(tree.lookup_local("print").is_none());
    }

    #[test]
    fn root_scope_is_never_left() {
        let mut tree = ScopeTree::new();
        tree.exit();
        assert_eq!(tree.current().name, "builtins");
        assert_eq!(tree.current().level, 0);
        assert!(tree.lookup("int").is_some());
    }

    #[test]
    fn arity_descriptions() {
        assert_eq!(Symbol::function("f", None, 2, Some(2)).arity().as_deref(), Some("2"));
        assert_eq!(Symbol::function("f", None, 1, Some(3)).arity().as_deref(), Some("1 to 3"));
        assert_eq!(Symbol::function("f", None, 0, None).arity().as_deref(),
                   Some("any number of"));
        assert_eq!(Symbol::variable("x", TypeName::Int).arity(), None);
    }
}
