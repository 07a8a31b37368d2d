use crate::parser::ast::{
    ClassDeclarationStatement, Expression, ExprId, FunctionDeclarationStatement, Statement,
    VariableReferenceExpression,
};
use crate::resolver::scope::ScopeStack;
use crate::scanner::Token;
use std::collections::HashMap;

/// The side-table produced by resolution: for every variable-like
/// expression that refers to a *local* binding, the number of environment
/// hops between the expression's scope and the scope that binds the name.
/// Expressions missing from the table refer to globals.
pub type Bindings = HashMap<ExprId, usize>;

/// What kind of function body the resolver is currently inside of.
/// It gates the `return` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

/// Ditto, for class bodies. It gates `this` and `super`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("[line {line}] Error at '{lexeme}': {message}")]
pub struct ResolveError {
    line: u64,
    lexeme: String,
    message: String,
}

impl ResolveError {
    fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            line: token.line(),
            lexeme: token.lexeme().to_owned(),
            message: message.into(),
        }
    }
}

pub struct Resolver {
    scopes: ScopeStack,
    bindings: Bindings,
    errors: Vec<ResolveError>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            bindings: Bindings::new(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Walk the program and bind every local variable use to its lexical
    /// depth. Errors do not stop the walk - they are collected and, if
    /// any occurred, returned together.
    pub fn resolve(mut self, statements: &[Statement]) -> Result<Bindings, Vec<ResolveError>> {
        self.resolve_statements(statements);
        if self.errors.is_empty() {
            Ok(self.bindings)
        } else {
            Err(self.errors)
        }
    }

    fn resolve_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Expression(e) => self.resolve_expression(&e.0),
            Statement::Print(p) => self.resolve_expression(&p.0),
            Statement::VariableDeclaration(v) => {
                self.declare(&v.identifier);
                if let Some(initializer) = &v.initializer {
                    self.resolve_expression(initializer);
                }
                self.scopes.define(v.identifier.lexeme());
            }
            Statement::FunctionDeclaration(f) => {
                // The function name is usable inside the function's own
                // body - that is what makes recursion work.
                self.declare(&f.name);
                self.scopes.define(f.name.lexeme());
                self.resolve_function(f, FunctionType::Function);
            }
            Statement::ClassDeclaration(c) => self.resolve_class(c),
            Statement::Block(b) => {
                let guard = self.scopes.enter_scope();
                self.resolve_statements(&b.0);
                self.scopes.exit_scope(guard);
            }
            Statement::IfElse(ifelse) => {
                self.resolve_expression(&ifelse.condition);
                self.resolve_statement(&ifelse.if_branch);
                if let Some(else_branch) = &ifelse.else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Statement::While(w) => {
                self.resolve_expression(&w.condition);
                self.resolve_statement(&w.body);
            }
            Statement::Return(r) => {
                if self.current_function == FunctionType::None {
                    self.errors.push(ResolveError::new(
                        &r.keyword,
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(value) = &r.value {
                    if self.current_function == FunctionType::Initializer {
                        self.errors.push(ResolveError::new(
                            &r.keyword,
                            "Can't return a value from an initializer.",
                        ));
                    }
                    self.resolve_expression(value);
                }
            }
        }
    }

    fn resolve_class(&mut self, c: &ClassDeclarationStatement) {
        let enclosing_class = std::mem::replace(&mut self.current_class, ClassType::Class);
        self.declare(&c.name);
        self.scopes.define(c.name.lexeme());

        let super_guard = match &c.superclass {
            Some(superclass) => {
                if superclass.identifier.lexeme() == c.name.lexeme() {
                    self.errors.push(ResolveError::new(
                        &superclass.identifier,
                        "A class can't inherit from itself.",
                    ));
                }
                self.resolve_variable_reference(superclass);
                self.current_class = ClassType::Subclass;
                // Methods of a subclass resolve `super` through a
                // dedicated scope wrapped around the whole class body.
                let guard = self.scopes.enter_scope();
                self.scopes.define("super");
                Some(guard)
            }
            None => None,
        };

        let this_guard = self.scopes.enter_scope();
        self.scopes.define("this");
        for method in &c.methods {
            let ty = if method.name.lexeme() == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, ty);
        }
        self.scopes.exit_scope(this_guard);

        if let Some(guard) = super_guard {
            self.scopes.exit_scope(guard);
        }
        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, declaration: &FunctionDeclarationStatement, ty: FunctionType) {
        let enclosing_function = std::mem::replace(&mut self.current_function, ty);
        let guard = self.scopes.enter_scope();
        for parameter in &declaration.parameters {
            self.declare(parameter);
            // Parameters are bound when the function is called - they can
            // never be observed uninitialized.
            self.scopes.define(parameter.lexeme());
        }
        self.resolve_statements(&declaration.body);
        self.scopes.exit_scope(guard);
        self.current_function = enclosing_function;
    }

    fn resolve_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Binary(b) => {
                self.resolve_expression(&b.left);
                self.resolve_expression(&b.right);
            }
            Expression::Logical(l) => {
                self.resolve_expression(&l.left);
                self.resolve_expression(&l.right);
            }
            Expression::Unary(u) => self.resolve_expression(&u.operand),
            Expression::Literal(_) => {}
            Expression::Grouping(g) => self.resolve_expression(&g.0),
            Expression::VariableReference(v) => self.resolve_variable_reference(v),
            Expression::VariableAssignment(a) => {
                self.resolve_expression(&a.value);
                self.resolve_local(a.id, a.identifier.lexeme());
            }
            Expression::Call(c) => {
                self.resolve_expression(&c.callee);
                for argument in &c.arguments {
                    self.resolve_expression(argument);
                }
            }
            Expression::Get(g) => {
                // Properties are looked up dynamically - only the object
                // expression needs resolving.
                self.resolve_expression(&g.object);
            }
            Expression::Set(s) => {
                self.resolve_expression(&s.value);
                self.resolve_expression(&s.object);
            }
            Expression::This(t) => {
                if self.current_class == ClassType::None {
                    self.errors.push(ResolveError::new(
                        &t.keyword,
                        "Can't use 'this' outside of a class.",
                    ));
                    return;
                }
                self.resolve_local(t.id, "this");
            }
            Expression::Super(s) => match self.current_class {
                ClassType::None => {
                    self.errors.push(ResolveError::new(
                        &s.keyword,
                        "Can't use 'super' outside of a class.",
                    ));
                }
                ClassType::Class => {
                    self.errors.push(ResolveError::new(
                        &s.keyword,
                        "Can't use 'super' in a class with no superclass.",
                    ));
                }
                ClassType::Subclass => self.resolve_local(s.id, "super"),
            },
        }
    }

    fn resolve_variable_reference(&mut self, v: &VariableReferenceExpression) {
        if self.scopes.is_in_own_initializer(v.identifier.lexeme()) {
            self.errors.push(ResolveError::new(
                &v.identifier,
                "Can't read local variable in its own initializer.",
            ));
        }
        self.resolve_local(v.id, v.identifier.lexeme());
    }

    fn resolve_local(&mut self, id: ExprId, name: &str) {
        if let Some(depth) = self.scopes.depth_of(name) {
            self.bindings.insert(id, depth);
        }
        // Not found in any local scope: assume the name is global and let
        // the interpreter look it up there at runtime.
    }

    fn declare(&mut self, name: &Token) {
        if !self.scopes.declare(name.lexeme()) {
            self.errors.push(ResolveError::new(
                name,
                "Already a variable with this name in this scope.",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bindings, ResolveError, Resolver};
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve(source: &str) -> Result<Bindings, Vec<ResolveError>> {
        let statements = Parser::parse(Scanner::new(source)).expect("Failed to parse");
        Resolver::new().resolve(&statements)
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        match resolve(source) {
            Ok(_) => panic!("Expected the source code to fail resolution"),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn a_local_variable_cannot_appear_in_its_own_initializer() {
        let errors = resolve_errors("{ var a = 1; { var a = a; } }");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn at_the_global_scope_self_reference_is_not_a_resolve_error() {
        // `var a = a;` at the top level fails at runtime instead, with an
        // undefined variable error.
        assert!(resolve("var a = a;").is_ok());
    }

    #[test]
    fn duplicate_declarations_are_rejected_in_local_scopes_only() {
        let errors = resolve_errors("fun clash() { var a = 1; var a = 2; }");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
        assert!(resolve("var a = 1; var a = 2;").is_ok());
    }

    #[test]
    fn returning_at_the_top_level_is_an_error() {
        let errors = resolve_errors("return 1;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn an_initializer_can_return_but_not_return_a_value() {
        let errors = resolve_errors("class A { init() { return 1; } }");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
        assert!(resolve("class A { init() { return; } }").is_ok());
    }

    #[test]
    fn this_is_rejected_outside_of_a_class() {
        let errors = resolve_errors("print this;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        let errors = resolve_errors("fun f() { return this; }");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn super_is_rejected_outside_of_a_subclass() {
        let errors = resolve_errors("print super.m;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        let errors = resolve_errors("class A { m() { return super.m(); } }");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn a_class_cannot_inherit_from_itself() {
        let errors = resolve_errors("class A < A {}");
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn depths_count_the_environment_hops_to_the_binding_scope() {
        // The reference to `a` sits one block below its declaration; the
        // reference to `b` sits in the same block that declares it.
        let bindings = resolve("{ var a = 1; { var b = a; b = 2; } }").unwrap();
        let mut depths: Vec<usize> = bindings.values().copied().collect();
        depths.sort_unstable();
        // `a` read at depth 1, `b` assigned at depth 0.
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn global_references_are_left_out_of_the_side_table() {
        let bindings = resolve("var a = 1; print a;").unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn resolving_the_same_ast_twice_yields_the_same_bindings() {
        let source = "{ var a = 1; fun f(b) { return a + b; } }";
        let statements = Parser::parse(Scanner::new(source)).expect("Failed to parse");
        let first = Resolver::new().resolve(&statements).unwrap();
        let second = Resolver::new().resolve(&statements).unwrap();
        assert_eq!(first, second);
    }
}
