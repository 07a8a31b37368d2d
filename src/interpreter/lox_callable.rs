use crate::interpreter::environment::Environment;
use crate::interpreter::lox_class::{LoxClass, LoxInstance};
use crate::interpreter::lox_value::{LoxFunction, LoxValue, NativeFunction};
use crate::interpreter::tree_walker::RuntimeErrorOrReturn;
use crate::interpreter::{Interpreter, RuntimeError};
use std::cell::RefCell;
use std::iter::zip;
use std::rc::Rc;

pub(in crate::interpreter) trait LoxCallable {
    fn arity(&self) -> u8;
    fn call(
        &self,
        interpreter: &mut Interpreter<'_>,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError>;
}

impl LoxCallable for LoxFunction {
    fn arity(&self) -> u8 {
        // Safe because the parser enforces that we do not have more than 255 parameters
        self.declaration.parameters.len() as u8
    }

    fn call(
        &self,
        interpreter: &mut Interpreter<'_>,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError> {
        // The new environment hangs off the function's captured closure,
        // not off the caller's environment - that is what makes scoping
        // lexical. Each call gets a fresh one, otherwise recursion (and
        // per-call closure state) would break.
        let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &self.closure,
        ))));
        for (parameter, argument) in zip(self.declaration.parameters.iter(), arguments) {
            environment
                .borrow_mut()
                .define(parameter.lexeme().to_owned(), argument);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    Ok(self.bound_this())
                } else {
                    Ok(LoxValue::Nil)
                }
            }
            // A `return` unwinds through any number of nested blocks up
            // to the function boundary - here.
            Err(RuntimeErrorOrReturn::Return(value)) => {
                if self.is_initializer {
                    Ok(self.bound_this())
                } else {
                    Ok(value.0)
                }
            }
            Err(RuntimeErrorOrReturn::RuntimeError(e)) => Err(e),
        }
    }
}

impl LoxCallable for NativeFunction {
    fn arity(&self) -> u8 {
        self.arity
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter<'_>,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError> {
        (self.function)(&arguments)
    }
}

/// Calling a class constructs an instance of it.
impl LoxCallable for Rc<LoxClass> {
    fn arity(&self) -> u8 {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    fn call(
        &self,
        interpreter: &mut Interpreter<'_>,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError> {
        let instance = Rc::new(RefCell::new(LoxInstance::new(Rc::clone(self))));
        if let Some(initializer) = self.find_method("init") {
            initializer
                .bind(LoxValue::Instance(Rc::clone(&instance)))
                .call(interpreter, arguments)?;
        }
        Ok(LoxValue::Instance(instance))
    }
}
