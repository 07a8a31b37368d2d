use drop_bomb::DropBomb;
use std::collections::HashMap;

/// Whether a name has been declared but not yet finished resolving its
/// initializer (`Uninitialized`), or is ready to be referenced
/// (`Initialized`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::resolver) enum BindingStatus {
    Uninitialized,
    Initialized,
}

/// The stack of lexical scopes the resolver walks while traversing the
/// AST. The global scope is implicit: an empty stack means we are at the
/// top level, where declarations are deliberately left untracked.
#[derive(Debug, Default)]
pub(in crate::resolver) struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self) -> ScopeGuard {
        self.scopes.push(Scope::default());
        ScopeGuard(DropBomb::new("You forgot to close a scope"))
    }

    pub fn exit_scope(&mut self, mut guard: ScopeGuard) {
        guard.0.defuse();
        self.scopes.pop();
    }

    /// Add `name` to the innermost scope, marked as uninitialized.
    /// Returns `false` if the scope already had a binding for `name`.
    /// A no-op at the global scope, where redeclaration is legal.
    pub fn declare(&mut self, name: &str) -> bool {
        match self.scopes.last_mut() {
            None => true,
            Some(scope) => scope
                .bindings
                .insert(name.to_owned(), BindingStatus::Uninitialized)
                .is_none(),
        }
    }

    /// Mark `name` as fully initialized in the innermost scope.
    pub fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope
                .bindings
                .insert(name.to_owned(), BindingStatus::Initialized);
        }
    }

    /// The number of scopes between the innermost one and the scope that
    /// binds `name` - i.e. the number of environment hops the interpreter
    /// will have to make at runtime. `None` means the name is global.
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .enumerate()
            .find_map(|(depth, scope)| scope.bindings.contains_key(name).then_some(depth))
    }

    /// Is `name` sitting in the innermost scope, declared but with its
    /// initializer still unresolved?
    pub fn is_in_own_initializer(&self, name: &str) -> bool {
        self.scopes
            .last()
            .and_then(|scope| scope.bindings.get(name))
            .map_or(false, |status| status == &BindingStatus::Uninitialized)
    }
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, BindingStatus>,
}

/// `ScopeGuard` ensures, at runtime, that we never leave a scope unclosed.
/// The resolver code has no way to defuse the drop bomb (the field is private outside of
/// this module) - the resolver is forced to call [`ScopeStack::exit_scope`], which gives us
/// a chance to pop the currently active scope.
#[must_use = "Nested scopes must be closed!"]
pub(in crate::resolver) struct ScopeGuard(DropBomb);
