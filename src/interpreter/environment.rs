use crate::interpreter::lox_value::LoxValue;
use crate::interpreter::tree_walker::RuntimeError;
use crate::scanner::Token;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single lexical scope: a mapping from names to values, plus a link to
/// the enclosing scope. Environments are shared (`Rc<RefCell<_>>`) because
/// closures keep their defining scope alive beyond its block.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, LoxValue>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub(in crate::interpreter) fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Binding a name that already exists in this scope overwrites it -
    /// shadowing only happens across scopes, never within one.
    pub(in crate::interpreter) fn define(&mut self, name: String, value: LoxValue) {
        self.values.insert(name, value);
    }

    pub(in crate::interpreter) fn get(&self, name: &Token) -> Result<LoxValue, RuntimeError> {
        if let Some(value) = self.values.get(name.lexeme()) {
            return Ok(value.clone());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Assignment never creates a binding: reaching the global scope
    /// without finding the name is a runtime error.
    pub(in crate::interpreter) fn assign(
        &mut self,
        name: &Token,
        value: LoxValue,
    ) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name.lexeme()) {
            *slot = value;
            return Ok(());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Read `name` from the environment exactly `distance` hops up the
    /// enclosing chain. The resolver guarantees both that the chain is
    /// deep enough and that the name is bound there.
    pub(in crate::interpreter) fn get_at(
        environment: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
    ) -> Option<LoxValue> {
        Self::ancestor(environment, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
    }

    pub(in crate::interpreter) fn assign_at(
        environment: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: LoxValue,
    ) {
        Self::ancestor(environment, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme().to_owned(), value);
    }

    fn ancestor(environment: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = Rc::clone(environment);
        for _ in 0..distance {
            let enclosing = environment
                .borrow()
                .enclosing
                .clone()
                .expect("The environment chain is shallower than a resolved depth. This is an interpreter bug.");
            environment = enclosing;
        }
        environment
    }
}
