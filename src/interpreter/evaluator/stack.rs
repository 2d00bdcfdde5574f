use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{
    ast::{FunctionDecl, TypeName},
    interpreter::value::core::Value,
};

/// The construct a frame was pushed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// The program's outermost frame.
    Global,
    /// The body of a taken `if`, `elseif` or `else` branch.
    Conditional,
    /// One iteration of a `while` body.
    While,
    /// A whole `for` loop, holding the loop variable.
    For,
    /// A function call.
    Function,
}

/// A variable slot: its declared type and current value.
///
/// `value` stays `None` from a bare declaration until the first assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The declared type, `None` for bindings created by assignment alone.
    pub ty:    Option<TypeName>,
    /// The current value.
    pub value: Option<Value>,
}

/// A runtime scope.
#[derive(Debug, Clone)]
pub struct StackFrame {
    /// Frame name: `global`, the function name or the construct keyword.
    pub name:      String,
    /// The construct the frame belongs to.
    pub kind:      FrameKind,
    /// Nesting depth; the global frame has level 1.
    pub level:     usize,
    /// Index of the frame names are resolved in after this one.
    pub outer:     Option<usize>,
    /// Variables declared in this frame.
    pub bindings:  HashMap<String, Binding>,
    /// Functions declared in this frame.
    pub functions: HashMap<String, Rc<FunctionDecl>>,
}

/// The chain of live frames.
///
/// Frames are stored by position and link to their outer frame by index.
/// Because frames are popped in reverse order of pushing, an outer index
/// always points below the frame holding it.
#[derive(Debug, Default)]
pub struct ProgramStack {
    frames: Vec<StackFrame>,
    pushed: HashMap<FrameKind, usize>,
}

impl ProgramStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame nested in the current top frame.
    ///
    /// Returns the index of the new frame.
    pub fn push(&mut self, name: impl Into<String>, kind: FrameKind) -> usize {
        let outer = self.frames.len().checked_sub(1);
        self.push_frame(name.into(), kind, outer)
    }

    /// Pushes a function frame resolving names through `outer`, the frame
    /// the function was declared in.
    pub fn push_function(&mut self, name: impl Into<String>, outer: usize) -> usize {
        self.push_frame(name.into(), FrameKind::Function, Some(outer))
    }

    fn push_frame(&mut self, name: String, kind: FrameKind, outer: Option<usize>) -> usize {
        let level = outer.and_then(|index| self.frames.get(index))
                         .map_or(1, |frame| frame.level + 1);
        trace!(name = %name, ?kind, level, depth = self.frames.len() + 1, "push frame");

        *self.pushed.entry(kind).or_default() += 1;
        self.frames.push(StackFrame { name,
                                      kind,
                                      level,
                                      outer,
                                      bindings: HashMap::new(),
                                      functions: HashMap::new() });
        self.frames.len() - 1
    }

    /// Removes and returns the top frame.
    pub fn pop(&mut self) -> Option<StackFrame> {
        let frame = self.frames.pop()?;
        trace!(name = %frame.name, kind = ?frame.kind, level = frame.level,
               depth = self.frames.len(), "pop frame");
        Some(frame)
    }

    /// The top frame.
    #[must_use]
    pub fn peek(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Number of live frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` when no frame is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// How many frames of `kind` have been pushed since the stack was created.
    #[must_use]
    pub fn pushed(&self, kind: FrameKind) -> usize {
        self.pushed.get(&kind).copied().unwrap_or_default()
    }

    /// Indices of the frames visible from the top, innermost first.
    fn chain(&self) -> impl Iterator<Item = usize> + '_ {
        let top = self.frames.len().checked_sub(1);
        std::iter::successors(top, |&index| self.frames[index].outer)
    }

    /// Index of the nearest frame binding `name`.
    fn resolve(&self, name: &str) -> Option<usize> {
        self.chain()
            .find(|&index| self.frames[index].bindings.contains_key(name))
    }

    /// Finds the nearest binding of `name`, walking outward from the top.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.resolve(name)
            .and_then(|index| self.frames[index].bindings.get(name))
    }

    /// Stores `value` in the nearest binding of `name`, or creates an untyped
    /// binding in the top frame if there is none.
    pub fn set(&mut self, name: &str, value: Value) {
        let index = self.resolve(name)
                        .or_else(|| self.frames.len().checked_sub(1));
        let Some(frame) = index.and_then(|index| self.frames.get_mut(index)) else {
            return;
        };
        match frame.bindings.get_mut(name) {
            Some(binding) => binding.value = Some(value),
            None => {
                frame.bindings.insert(name.to_string(),
                                      Binding { ty:    None,
                                                value: Some(value), });
            },
        }
    }

    /// Binds `name` in the top frame, replacing any binding of the same name
    /// in that frame.
    pub fn declare(&mut self, name: &str, ty: Option<TypeName>, value: Option<Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.to_string(), Binding { ty, value });
        }
    }

    /// Registers a function in the top frame.
    pub fn declare_function(&mut self, declaration: Rc<FunctionDecl>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.functions
                 .insert(declaration.name.clone(), declaration);
        }
    }

    /// Finds the nearest function named `name` together with the index of
    /// the frame it was declared in.
    #[must_use]
    pub fn find_function(&self, name: &str) -> Option<(usize, Rc<FunctionDecl>)> {
        self.chain().find_map(|index| {
                        self.frames[index].functions
                                          .get(name)
                                          .map(|declaration| (index, Rc::clone(declaration)))
                    })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_and_outer_links() {
        let mut stack = ProgramStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.push("global", FrameKind::Global), 0);
        assert_eq!(stack.push("while", FrameKind::While), 1);

        let top = stack.peek().unwrap();
        assert_eq!((top.level, top.outer), (2, Some(0)));

        assert_eq!(stack.push_function("f", 0), 2);
        let top = stack.peek().unwrap();
        assert_eq!((top.kind, top.level, top.outer), (FrameKind::Function, 2, Some(0)));
        assert_eq!(stack.pushed(FrameKind::While), 1);
        assert_eq!(stack.pushed(FrameKind::For), 0);
    }

    #[test]
    fn set_updates_the_nearest_binding() {
        let mut stack = ProgramStack::new();
        stack.push("global", FrameKind::Global);
        stack.declare("x", Some(TypeName::Int), Some(Value::Integer(1)));
        stack.push("if", FrameKind::Conditional);

        stack.set("x", Value::Integer(2));
        stack.set("y", Value::Integer(3));
        assert!(stack.peek().unwrap().bindings.contains_key("y"));
        assert!(!stack.peek().unwrap().bindings.contains_key("x"));

        stack.pop();
        assert_eq!(stack.get("x").and_then(|b| b.value.clone()), Some(Value::Integer(2)));
        assert_eq!(stack.get("y"), None);
    }

    #[test]
    fn function_frames_skip_the_caller() {
        let mut stack = ProgramStack::new();
        stack.push("global", FrameKind::Global);
        stack.declare("g", None, Some(Value::Integer(0)));
        stack.push("while", FrameKind::While);
        stack.declare("local", None, Some(Value::Integer(1)));
        stack.push_function("f", 0);

        assert!(stack.get("g").is_some());
        assert!(stack.get("local").is_none());
    }

    #[test]
    fn declare_shadows_outer_bindings() {
        let mut stack = ProgramStack::new();
        stack.push("global", FrameKind::Global);
        stack.declare("x", Some(TypeName::Int), Some(Value::Integer(1)));
        stack.push("for", FrameKind::For);
        stack.declare("x", Some(TypeName::Str), None);

        assert_eq!(stack.get("x").map(|b| b.ty), Some(Some(TypeName::Str)));
        stack.pop();
        assert_eq!(stack.get("x").map(|b| b.ty), Some(Some(TypeName::Int)));
    }
}
