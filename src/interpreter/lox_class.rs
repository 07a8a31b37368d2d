use crate::interpreter::lox_value::{LoxFunction, LoxValue};
use crate::interpreter::tree_walker::RuntimeError;
use crate::scanner::Token;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The class holds the behaviour, its instances hold the state.
pub(in crate::interpreter) struct LoxClass {
    pub(in crate::interpreter) name: String,
    pub(in crate::interpreter) superclass: Option<Rc<LoxClass>>,
    pub(in crate::interpreter) methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    /// Walk the inheritance chain upwards; the first definition of `name`
    /// encountered wins.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }
}

impl Display for LoxClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Debug for LoxClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

pub(in crate::interpreter) struct LoxInstance {
    class: Rc<LoxClass>,
    fields: HashMap<String, LoxValue>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    /// Read a property: fields shadow methods, and methods come out bound
    /// to this instance.
    ///
    /// Takes the `Rc` handle rather than `&self` because a looked-up
    /// method captures the instance.
    pub fn get(instance: &Rc<RefCell<Self>>, name: &Token) -> Result<LoxValue, RuntimeError> {
        if let Some(field) = instance.borrow().fields.get(name.lexeme()).cloned() {
            return Ok(field);
        }
        let method = instance.borrow().class.find_method(name.lexeme());
        match method {
            Some(method) => Ok(LoxValue::Function(Rc::new(
                method.bind(LoxValue::Instance(Rc::clone(instance))),
            ))),
            None => Err(RuntimeError::undefined_property(name)),
        }
    }

    /// Fields spring into existence on first assignment - there is no
    /// need to check whether the key is already present.
    pub fn set(&mut self, name: &Token, value: LoxValue) {
        self.fields.insert(name.lexeme().to_owned(), value);
    }
}

impl Display for LoxInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

// Manual, shallow `Debug`: a field may point back at the instance itself.
impl std::fmt::Debug for LoxInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} instance>", self.class.name)
    }
}
