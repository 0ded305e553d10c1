use scribble_core::error::{ErrorCode, Fault};
use scribble_core::value::Value;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub constant: bool,
}

type Scope = HashMap<String, Binding>;

#[derive(Debug, Default)]
struct Frame {
    scopes: Vec<Scope>,
}

impl Frame {
    fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }
}

/// Binding environment threaded through evaluation.
///
/// The first scope of the first frame is the root (global) scope shared by
/// every module. A function call pushes a frame; code running in it sees the
/// frame's own scopes and then the root scope, never the caller's locals.
#[derive(Debug)]
pub struct InterpreterContext {
    frames: Vec<Frame>,
    modules: BTreeSet<String>,
}

impl Default for InterpreterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterContext {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
            modules: BTreeSet::new(),
        }
    }

    fn frame(&self) -> &Frame {
        let last = self.frames.len() - 1;
        &self.frames[last]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Binds `name` in the innermost scope. Shadowing an outer scope is
    /// allowed; a second binding in the same scope is not.
    pub fn declare(&mut self, name: &str, value: Value, constant: bool) -> Result<(), Fault> {
        let frame = self.frame_mut();
        let last = frame.scopes.len() - 1;
        let scope = &mut frame.scopes[last];
        if scope.contains_key(name) {
            return Err(Fault::new(
                ErrorCode::AlreadyDeclaredVariable,
                format!("'{name}' is already declared in this scope"),
            ));
        }
        scope.insert(name.to_string(), Binding { value, constant });
        Ok(())
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.frame()
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.global_binding(name))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.binding(name).map(|binding| binding.value.clone())
    }

    pub fn global_binding(&self, name: &str) -> Option<&Binding> {
        self.frames[0].scopes[0].get(name)
    }

    /// Rebinds an existing name, innermost scope first.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Fault> {
        let index = self.frames.len() - 1;
        let binding = {
            let (globals, current) = self.frames.split_at_mut(index);
            let frame = &mut current[0];
            let local = frame
                .scopes
                .iter_mut()
                .rev()
                .find_map(|scope| scope.get_mut(name));
            match local {
                Some(binding) => Some(binding),
                None => globals
                    .first_mut()
                    .and_then(|root| root.scopes[0].get_mut(name)),
            }
        };
        match binding {
            Some(binding) if binding.constant => Err(Fault::new(
                ErrorCode::CannotAssignToConstant,
                format!("cannot assign to constant '{name}'"),
            )),
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => Err(Fault::new(
                ErrorCode::UndeclaredVariable,
                format!("'{name}' is not declared"),
            )),
        }
    }

    pub fn push_scope(&mut self) {
        self.frame_mut().scopes.push(Scope::new());
    }

    /// The bottom scope of a frame stays in place.
    pub fn pop_scope(&mut self) {
        let frame = self.frame_mut();
        if frame.scopes.len() > 1 {
            frame.scopes.pop();
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    /// The global frame stays in place.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn call_depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Records that `module` ran; false when it already had.
    pub fn mark_evaluated(&mut self, module: &str) -> bool {
        self.modules.insert(module.to_string())
    }

    pub fn is_evaluated(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Global bindings sorted by name.
    pub fn globals(&self) -> Vec<(&str, &Binding)> {
        let mut globals: Vec<_> = self.frames[0].scopes[0]
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
            .collect();
        globals.sort_by(|a, b| a.0.cmp(b.0));
        globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut ctx = InterpreterContext::new();
        ctx.declare("x", Value::int(1), false).unwrap();
        let err = ctx.declare("x", Value::int(2), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyDeclaredVariable);
    }

    #[test]
    fn child_scope_shadows_and_unwinds() {
        let mut ctx = InterpreterContext::new();
        ctx.declare("x", Value::int(1), false).unwrap();
        ctx.push_scope();
        ctx.declare("x", Value::int(2), false).unwrap();
        assert_eq!(ctx.get("x"), Some(Value::int(2)));
        ctx.pop_scope();
        assert_eq!(ctx.get("x"), Some(Value::int(1)));
    }

    #[test]
    fn set_walks_outward() {
        let mut ctx = InterpreterContext::new();
        ctx.declare("x", Value::int(1), false).unwrap();
        ctx.push_scope();
        ctx.set("x", Value::int(5)).unwrap();
        ctx.pop_scope();
        assert_eq!(ctx.get("x"), Some(Value::int(5)));
    }

    #[test]
    fn frames_hide_caller_locals_but_not_globals() {
        let mut ctx = InterpreterContext::new();
        ctx.declare("global", Value::int(1), false).unwrap();
        ctx.push_scope();
        ctx.declare("local", Value::int(2), false).unwrap();
        ctx.push_frame();
        assert_eq!(ctx.get("global"), Some(Value::int(1)));
        assert_eq!(ctx.get("local"), None);
        ctx.set("global", Value::int(7)).unwrap();
        assert_eq!(
            ctx.set("local", Value::Null).unwrap_err().code,
            ErrorCode::UndeclaredVariable
        );
        ctx.pop_frame();
        assert_eq!(ctx.get("local"), Some(Value::int(2)));
        assert_eq!(ctx.get("global"), Some(Value::int(7)));
    }

    #[test]
    fn constants_reject_assignment() {
        let mut ctx = InterpreterContext::new();
        ctx.declare("pi", Value::Float(3.14), true).unwrap();
        let err = ctx.set("pi", Value::Float(3.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotAssignToConstant);
    }

    #[test]
    fn root_scope_survives_pops() {
        let mut ctx = InterpreterContext::new();
        ctx.pop_scope();
        ctx.pop_frame();
        ctx.declare("x", Value::Null, false).unwrap();
        assert_eq!(ctx.call_depth(), 0);
        assert_eq!(ctx.globals().len(), 1);
    }
}
