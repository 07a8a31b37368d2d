use crate::interpreter::environment::Environment;
use crate::interpreter::lox_callable::LoxCallable;
use crate::interpreter::lox_class::{LoxClass, LoxInstance};
use crate::interpreter::lox_value::{LoxFunction, LoxValue, NativeFunction};
use crate::parser::ast::{
    BlockStatement, ClassDeclarationStatement, Expression, ExpressionStatement, ExprId,
    IfElseStatement, LiteralExpression, PrintStatement, ReturnStatement, Statement,
    VariableDeclarationStatement, WhileStatement,
};
use crate::parser::{ParseError, Parser};
use crate::resolver::{Bindings, ResolveError, Resolver};
use crate::scanner::{Scanner, Token, TokenDiscriminant};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Interpreter<'a> {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    /// The resolver's side-table, accumulated across runs so that REPL
    /// closures from earlier lines keep working.
    bindings: Bindings,
    output_stream: Box<dyn Write + 'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new<OutputStream>(output: OutputStream) -> Self
    where
        OutputStream: Write + 'a,
    {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define(
            "clock".to_owned(),
            LoxValue::NativeFunction(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                function: clock,
            })),
        );
        Self {
            environment: Rc::clone(&globals),
            globals,
            bindings: HashMap::new(),
            output_stream: Box::new(output),
        }
    }

    /// Scan, parse, resolve and then execute a Lox source file.
    ///
    /// Each phase runs only if the previous one reported no errors;
    /// all the errors of the failing phase are returned together.
    pub fn execute_raw(&mut self, source: &str) -> Result<(), ExecuteRawError> {
        let statements =
            Parser::parse(Scanner::new(source)).map_err(ExecuteRawError::ParserError)?;
        let bindings = Resolver::new()
            .resolve(&statements)
            .map_err(ExecuteRawError::NameResolutionError)?;
        self.bindings.extend(bindings);
        self.batch_execute(&statements)
            .map_err(ExecuteRawError::RuntimeError)
    }

    /// Execute a series of statements.
    /// It exits as soon as a runtime error is encountered.
    pub fn batch_execute(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    /// Execute a single Lox statement.
    pub fn execute(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        self._execute(statement).map_err(|e| match e {
            RuntimeErrorOrReturn::RuntimeError(e) => e,
            // The resolver rejects top-level `return`s, so a `Return`
            // signal should never bubble up this far.
            RuntimeErrorOrReturn::Return(_) => RuntimeError::unexpected_return(),
        })
    }

    fn _execute(&mut self, s: &Statement) -> Result<(), RuntimeErrorOrReturn> {
        match s {
            Statement::Expression(ExpressionStatement(e)) => {
                self.eval(e)?;
            }
            Statement::Print(PrintStatement(e)) => {
                let value = self.eval(e)?;
                writeln!(self.output_stream, "{value}").map_err(RuntimeError::from)?;
                self.output_stream.flush().map_err(RuntimeError::from)?;
            }
            Statement::VariableDeclaration(VariableDeclarationStatement {
                initializer,
                identifier,
            }) => {
                let value = if let Some(initializer) = initializer {
                    self.eval(initializer)?
                } else {
                    LoxValue::Nil
                };
                self.environment
                    .borrow_mut()
                    .define(identifier.lexeme().to_owned(), value);
            }
            Statement::FunctionDeclaration(declaration) => {
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(
                    declaration.name.lexeme().to_owned(),
                    LoxValue::Function(Rc::new(function)),
                );
            }
            Statement::ClassDeclaration(c) => self.execute_class_declaration(c)?,
            Statement::Block(BlockStatement(statements)) => {
                let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));
                self.execute_block(statements, environment)?;
            }
            Statement::IfElse(IfElseStatement {
                condition,
                if_branch,
                else_branch,
            }) => {
                if self.eval(condition)?.is_truthy() {
                    self._execute(if_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self._execute(else_branch)?;
                }
            }
            Statement::While(WhileStatement { condition, body }) => {
                while self.eval(condition)?.is_truthy() {
                    self._execute(body)?;
                }
            }
            Statement::Return(ReturnStatement { value, .. }) => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => LoxValue::Nil,
                };
                return Err(Return(value).into());
            }
        }
        Ok(())
    }

    /// Run `statements` with `environment` installed as the current one.
    /// The previous environment is restored on every exit path - normal
    /// completion, runtime error or `return` unwind.
    pub(in crate::interpreter) fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), RuntimeErrorOrReturn> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let outcome = statements
            .iter()
            .try_for_each(|statement| self._execute(statement));
        self.environment = previous;
        outcome
    }

    fn execute_class_declaration(
        &mut self,
        c: &ClassDeclarationStatement,
    ) -> Result<(), RuntimeErrorOrReturn> {
        let superclass = match &c.superclass {
            Some(superclass) => {
                let value = self.look_up_variable(&superclass.identifier, superclass.id)?;
                match value {
                    LoxValue::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError::superclass_must_be_class(
                            &superclass.identifier,
                        )
                        .into())
                    }
                }
            }
            None => None,
        };

        // Two-step binding, so that the methods' closures can already see
        // the class name.
        self.environment
            .borrow_mut()
            .define(c.name.lexeme().to_owned(), LoxValue::Nil);

        // Methods of a subclass close over an extra environment holding
        // `super`, mirroring the scope the resolver wrapped around them.
        let method_closure = match &superclass {
            Some(superclass) => {
                let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));
                environment
                    .borrow_mut()
                    .define("super".to_owned(), LoxValue::Class(Rc::clone(superclass)));
                environment
            }
            None => Rc::clone(&self.environment),
        };

        let methods = c
            .methods
            .iter()
            .map(|method| {
                let is_initializer = method.name.lexeme() == "init";
                let function = LoxFunction::new(
                    Rc::clone(method),
                    Rc::clone(&method_closure),
                    is_initializer,
                );
                (method.name.lexeme().to_owned(), Rc::new(function))
            })
            .collect();

        let class = LoxClass {
            name: c.name.lexeme().to_owned(),
            superclass,
            methods,
        };
        self.environment
            .borrow_mut()
            .assign(&c.name, LoxValue::Class(Rc::new(class)))?;
        Ok(())
    }

    fn eval(&mut self, e: &Expression) -> Result<LoxValue, RuntimeErrorOrReturn> {
        match e {
            Expression::Binary(b) => {
                let left = self.eval(&b.left)?;
                let right = self.eval(&b.right)?;
                match b.operator.discriminant() {
                    TokenDiscriminant::Minus => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Number(l - r)
                        })?)
                    }
                    TokenDiscriminant::Plus => match (left, right) {
                        (LoxValue::Number(l), LoxValue::Number(r)) => Ok(LoxValue::Number(l + r)),
                        (LoxValue::String(l), LoxValue::String(r)) => Ok(LoxValue::String(l + &r)),
                        (_, _) => Err(RuntimeError::new(
                            &b.operator,
                            "Operands must be two numbers or two strings.",
                        )
                        .into()),
                    },
                    // Division by zero is not trapped: Lox numbers are
                    // IEEE-754 doubles, `1/0` is `inf` and `0/0` is `NaN`.
                    TokenDiscriminant::Slash => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Number(l / r)
                        })?)
                    }
                    TokenDiscriminant::Star => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Number(l * r)
                        })?)
                    }
                    TokenDiscriminant::Greater => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Boolean(l > r)
                        })?)
                    }
                    TokenDiscriminant::GreaterEqual => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Boolean(l >= r)
                        })?)
                    }
                    TokenDiscriminant::Less => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Boolean(l < r)
                        })?)
                    }
                    TokenDiscriminant::LessEqual => {
                        Ok(num_op(left, right, &b.operator, |l, r| {
                            LoxValue::Boolean(l <= r)
                        })?)
                    }
                    TokenDiscriminant::EqualEqual => Ok(LoxValue::Boolean(left.is_equal(&right))),
                    TokenDiscriminant::BangEqual => Ok(LoxValue::Boolean(!left.is_equal(&right))),
                    _ => Err(RuntimeError::new(
                        &b.operator,
                        "It is not a valid binary operator.",
                    )
                    .into()),
                }
            }
            Expression::Logical(l) => {
                let left = self.eval(&l.left)?;
                // The left operand decides whether the right one runs at
                // all; whichever operand wins is returned untouched, not
                // coerced to a boolean.
                match l.operator.discriminant() {
                    TokenDiscriminant::Or if left.is_truthy() => Ok(left),
                    TokenDiscriminant::And if !left.is_truthy() => Ok(left),
                    _ => self.eval(&l.right),
                }
            }
            Expression::Unary(u) => {
                let value = self.eval(&u.operand)?;
                match u.operator.discriminant() {
                    TokenDiscriminant::Minus => match value {
                        LoxValue::Number(n) => Ok(LoxValue::Number(-n)),
                        _ => Err(RuntimeError::new(&u.operator, "Operand must be a number.").into()),
                    },
                    TokenDiscriminant::Bang => Ok(LoxValue::Boolean(!value.is_truthy())),
                    _ => Err(RuntimeError::new(
                        &u.operator,
                        "`!` and `-` are the only valid unary operators.",
                    )
                    .into()),
                }
            }
            Expression::Literal(l) => match l {
                LiteralExpression::Boolean(b) => Ok(LoxValue::Boolean(*b)),
                LiteralExpression::Nil => Ok(LoxValue::Nil),
                LiteralExpression::String(s) => Ok(LoxValue::String(s.clone())),
                LiteralExpression::Number(n) => Ok(LoxValue::Number(*n)),
            },
            Expression::Grouping(g) => self.eval(&g.0),
            Expression::VariableReference(v) => {
                Ok(self.look_up_variable(&v.identifier, v.id)?)
            }
            Expression::VariableAssignment(a) => {
                let value = self.eval(&a.value)?;
                match self.bindings.get(&a.id) {
                    Some(distance) => Environment::assign_at(
                        &self.environment,
                        *distance,
                        &a.identifier,
                        value.clone(),
                    ),
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(&a.identifier, value.clone())?,
                }
                Ok(value)
            }
            Expression::Call(c) => {
                let callee = self.eval(&c.callee)?;
                let mut arguments = Vec::with_capacity(c.arguments.len());
                for argument in &c.arguments {
                    arguments.push(self.eval(argument)?);
                }
                let line = c.closing_parenthesis.line();
                match &callee {
                    LoxValue::Function(function) => self.invoke(function.as_ref(), arguments, line),
                    LoxValue::NativeFunction(native) => {
                        self.invoke(native.as_ref(), arguments, line)
                    }
                    LoxValue::Class(class) => self.invoke(class, arguments, line),
                    _ => Err(RuntimeError::not_callable(line).into()),
                }
            }
            Expression::Get(g) => {
                let object = self.eval(&g.object)?;
                match object {
                    LoxValue::Instance(instance) => Ok(LoxInstance::get(&instance, &g.name)?),
                    _ => Err(RuntimeError::only_instances_have_fields(&g.name).into()),
                }
            }
            Expression::Set(s) => {
                let object = self.eval(&s.object)?;
                match object {
                    LoxValue::Instance(instance) => {
                        let value = self.eval(&s.value)?;
                        instance.borrow_mut().set(&s.name, value.clone());
                        Ok(value)
                    }
                    _ => Err(RuntimeError::only_instances_have_fields(&s.name).into()),
                }
            }
            Expression::This(t) => Ok(self.look_up_variable(&t.keyword, t.id)?),
            Expression::Super(s) => {
                let distance = *self
                    .bindings
                    .get(&s.id)
                    .expect("A `super` expression was not resolved. This is an interpreter bug.");
                let superclass = Environment::get_at(&self.environment, distance, "super")
                    .expect("`super` is missing from its environment. This is an interpreter bug.");
                // The instance `super.m` must be bound to sits one
                // environment below the one holding `super`.
                let object = Environment::get_at(&self.environment, distance - 1, "this")
                    .expect("`this` is missing from its environment. This is an interpreter bug.");
                let superclass = match superclass {
                    LoxValue::Class(superclass) => superclass,
                    _ => {
                        return Err(
                            RuntimeError::new(&s.keyword, "Superclass must be a class.").into()
                        )
                    }
                };
                match superclass.find_method(s.method.lexeme()) {
                    Some(method) => Ok(LoxValue::Function(Rc::new(method.bind(object)))),
                    None => Err(RuntimeError::undefined_property(&s.method).into()),
                }
            }
        }
    }

    /// Variables with a recorded depth are read from the environment that
    /// many hops up the chain; everything else lives in the globals.
    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<LoxValue, RuntimeError> {
        match self.bindings.get(&id) {
            Some(distance) => {
                Ok(Environment::get_at(&self.environment, *distance, name.lexeme())
                    .expect("A resolved variable is missing from its environment. This is an interpreter bug."))
            }
            None => self.globals.borrow().get(name),
        }
    }

    fn invoke(
        &mut self,
        callable: &dyn LoxCallable,
        arguments: Vec<LoxValue>,
        line: u64,
    ) -> Result<LoxValue, RuntimeErrorOrReturn> {
        // This is fine since the parser rejects more than 255 arguments
        let n_arguments = arguments.len() as u8;
        if callable.arity() != n_arguments {
            return Err(RuntimeError::arity_mismatch(callable.arity(), n_arguments, line).into());
        }
        Ok(callable.call(self, arguments)?)
    }
}

/// Wall-clock seconds since the Unix epoch, as a Lox number.
fn clock(_arguments: &[LoxValue]) -> Result<LoxValue, RuntimeError> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default();
    Ok(LoxValue::Number(seconds))
}

/// Short-hand for evaluating numerical operations.
fn num_op<F>(
    left: LoxValue,
    right: LoxValue,
    operator: &Token,
    operation: F,
) -> Result<LoxValue, RuntimeError>
where
    F: Fn(f64, f64) -> LoxValue,
{
    match (left, right) {
        (LoxValue::Number(l), LoxValue::Number(r)) => Ok(operation(l, r)),
        (_, _) => Err(RuntimeError::operands_must_be_numbers(operator)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecuteRawError {
    #[error("{}", display_errors(.0))]
    ParserError(Vec<ParseError>),
    #[error("{}", display_errors(.0))]
    NameResolutionError(Vec<ResolveError>),
    #[error(transparent)]
    RuntimeError(RuntimeError),
}

fn display_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
pub(in crate::interpreter) enum RuntimeErrorOrReturn {
    #[error(transparent)]
    RuntimeError(#[from] RuntimeError),
    #[error(transparent)]
    Return(#[from] Return),
}

/// The non-local control transfer a `return` statement performs. It rides
/// the error channel up to the enclosing function boundary, but it is not
/// an error and must never be reported as one.
#[derive(Debug, thiserror::Error)]
#[error("An early return was encountered")]
pub(in crate::interpreter) struct Return(pub(in crate::interpreter) LoxValue);

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("{message}\n[line {line}]")]
    Evaluation { line: u64, message: String },
    #[error("Failed to write to the output stream.\n{0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub(in crate::interpreter) fn new(t: &Token, message: impl Into<String>) -> Self {
        Self::Evaluation {
            line: t.line(),
            message: message.into(),
        }
    }

    pub(in crate::interpreter) fn operands_must_be_numbers(operator: &Token) -> Self {
        Self::new(operator, "Operands must be numbers.")
    }

    pub(in crate::interpreter) fn undefined_variable(name: &Token) -> Self {
        Self::new(name, format!("Undefined variable '{}'.", name.lexeme()))
    }

    pub(in crate::interpreter) fn undefined_property(name: &Token) -> Self {
        Self::new(name, format!("Undefined property '{}'.", name.lexeme()))
    }

    pub(in crate::interpreter) fn only_instances_have_fields(name: &Token) -> Self {
        Self::new(name, "Only instances have fields.")
    }

    pub(in crate::interpreter) fn superclass_must_be_class(name: &Token) -> Self {
        Self::new(name, "Superclass must be a class.")
    }

    pub(in crate::interpreter) fn arity_mismatch(expected: u8, found: u8, line: u64) -> Self {
        Self::Evaluation {
            line,
            message: format!("Expected {expected} arguments but got {found}."),
        }
    }

    pub(in crate::interpreter) fn not_callable(line: u64) -> Self {
        Self::Evaluation {
            line,
            message: "Can only call functions and classes.".into(),
        }
    }

    fn unexpected_return() -> Self {
        Self::Evaluation {
            line: 0,
            message: "`return` was used in an illegal position.".into(),
        }
    }
}
