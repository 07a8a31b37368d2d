pub mod ast;

use crate::parser::ast::{
    BlockStatement, CallExpression, ClassDeclarationStatement, ExpressionStatement,
    FunctionDeclarationStatement, GetExpression, IfElseStatement, PrintStatement, ReturnStatement,
    SetExpression, Statement, SuperExpression, VariableAssignmentExpression,
    VariableDeclarationStatement, VariableReferenceExpression, WhileStatement,
};
use crate::scanner::{Token, TokenDiscriminant, TokenType};
use ast::{Expression, LiteralExpression};
use std::fmt::Write;
use std::iter::Peekable;
use std::rc::Rc;

#[derive(PartialEq, Eq, Copy, Clone)]
enum ParsingMode {
    ErrorRecovery,
    Normal,
}

/// A syntax error, pinned to the token where parsing tripped.
///
/// `location` is `None` for errors inherited from the scanner, which have
/// no meaningful "at" clause.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[line {line}] Error{}: {message}", .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default())]
pub struct ParseError {
    line: u64,
    location: Option<String>,
    message: String,
}

impl ParseError {
    /// Did the parser trip because it ran out of input? The REPL uses
    /// this to tell an unfinished statement apart from a malformed one.
    pub fn is_at_end(&self) -> bool {
        self.location.as_deref() == Some("end")
    }
}

pub struct Parser<TokenIter>
where
    TokenIter: Iterator<Item = Token>,
{
    tokens: Peekable<Source<TokenIter>>,
    mode: ParsingMode,
    errors: Vec<ParseError>,
    last_line: u64,
}

impl<TokenIter> Parser<TokenIter>
where
    TokenIter: Iterator<Item = Token>,
{
    pub fn parse(tokens: TokenIter) -> Result<Vec<Statement>, Vec<ParseError>> {
        let mut parser = Self {
            tokens: Source(tokens).peekable(),
            mode: ParsingMode::Normal,
            errors: vec![],
            last_line: 1,
        };

        let mut statements = vec![];
        while !parser.is_at_end() {
            match parser.declaration() {
                Some(statement) => statements.push(statement),
                None => parser.synchronize(),
            }
        }
        if parser.errors.is_empty() {
            Ok(statements)
        } else {
            Err(parser.errors)
        }
    }

    fn declaration(&mut self) -> Option<Statement> {
        if self.advance_on_match(&[TokenDiscriminant::Class]).is_some() {
            self.class_declaration().map(Statement::ClassDeclaration)
        } else if self.advance_on_match(&[TokenDiscriminant::Fun]).is_some() {
            self.function("function").map(Statement::FunctionDeclaration)
        } else if self.advance_on_match(&[TokenDiscriminant::Var]).is_some() {
            let identifier = self.expect(TokenDiscriminant::Identifier, "Expect variable name.")?;
            let mut initializer = None;
            if self.advance_on_match(&[TokenDiscriminant::Equal]).is_some() {
                initializer = Some(self.expression()?);
            }
            self.expect(
                TokenDiscriminant::Semicolon,
                "Expect ';' after variable declaration.",
            )?;
            Some(Statement::VariableDeclaration(
                VariableDeclarationStatement {
                    initializer,
                    identifier,
                },
            ))
        } else {
            self.statement()
        }
    }

    fn class_declaration(&mut self) -> Option<ClassDeclarationStatement> {
        let name = self.expect(TokenDiscriminant::Identifier, "Expect class name.")?;
        let superclass = if self.advance_on_match(&[TokenDiscriminant::Less]).is_some() {
            let identifier =
                self.expect(TokenDiscriminant::Identifier, "Expect superclass name.")?;
            Some(VariableReferenceExpression::new(identifier))
        } else {
            None
        };
        self.expect(TokenDiscriminant::LeftBrace, "Expect '{' before class body.")?;
        let mut methods = vec![];
        loop {
            if self.is_at_end() || self.check(TokenDiscriminant::RightBrace) {
                break;
            }
            methods.push(self.function("method")?);
        }
        self.expect(TokenDiscriminant::RightBrace, "Expect '}' after class body.")?;
        Some(ClassDeclarationStatement {
            name,
            superclass,
            methods,
        })
    }

    fn function(&mut self, kind: &str) -> Option<Rc<FunctionDeclarationStatement>> {
        let name = self.expect(TokenDiscriminant::Identifier, &format!("Expect {kind} name."))?;
        self.expect(
            TokenDiscriminant::LeftParen,
            &format!("Expect '(' after {kind} name."),
        )?;

        // Function parameters
        let mut parameters = vec![];
        if !self.check(TokenDiscriminant::RightParen) {
            loop {
                if parameters.len() >= 255 {
                    self.report_error_at_upcoming("Can't have more than 255 parameters.");
                }
                parameters
                    .push(self.expect(TokenDiscriminant::Identifier, "Expect parameter name.")?);
                if self.advance_on_match(&[TokenDiscriminant::Comma]).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenDiscriminant::RightParen, "Expect ')' after parameters.")?;

        // Body
        self.expect(
            TokenDiscriminant::LeftBrace,
            &format!("Expect '{{' before {kind} body."),
        )?;
        let body = self.block_statement()?;

        Some(Rc::new(FunctionDeclarationStatement {
            name,
            parameters,
            body: body.0,
        }))
    }

    fn statement(&mut self) -> Option<Statement> {
        if self.advance_on_match(&[TokenDiscriminant::Print]).is_some() {
            self.print_statement().map(Statement::Print)
        } else if let Some(keyword) = self.advance_on_match(&[TokenDiscriminant::Return]) {
            self.return_statement(keyword).map(Statement::Return)
        } else if self.advance_on_match(&[TokenDiscriminant::While]).is_some() {
            self.while_statement().map(Statement::While)
        } else if self.advance_on_match(&[TokenDiscriminant::For]).is_some() {
            self.for_statement()
        } else if self.advance_on_match(&[TokenDiscriminant::If]).is_some() {
            self.if_else_statement().map(Statement::IfElse)
        } else if self
            .advance_on_match(&[TokenDiscriminant::LeftBrace])
            .is_some()
        {
            self.block_statement().map(Statement::Block)
        } else {
            self.expression_statement().map(Statement::Expression)
        }
    }

    fn for_statement(&mut self) -> Option<Statement> {
        self.expect(TokenDiscriminant::LeftParen, "Expect '(' after 'for'.")?;
        let initializer = if self
            .advance_on_match(&[TokenDiscriminant::Semicolon])
            .is_some()
        {
            None
        } else if self.check(TokenDiscriminant::Var) {
            Some(self.declaration()?)
        } else {
            Some(Statement::Expression(self.expression_statement()?))
        };
        let condition = if self.check(TokenDiscriminant::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(
            TokenDiscriminant::Semicolon,
            "Expect ';' after loop condition.",
        )?;
        let increment = if self.check(TokenDiscriminant::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(
            TokenDiscriminant::RightParen,
            "Expect ')' after for clauses.",
        )?;
        let mut body = self.statement()?;

        // De-sugaring the for loop into an equivalent while loop
        if let Some(increment) = increment {
            body = Statement::Block(BlockStatement(vec![
                body,
                Statement::Expression(ExpressionStatement(increment)),
            ]))
        }

        body = Statement::While(WhileStatement {
            condition: condition.unwrap_or_else(|| Expression::boolean(true)),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Statement::Block(BlockStatement(vec![initializer, body]))
        }

        Some(body)
    }

    fn block_statement(&mut self) -> Option<BlockStatement> {
        let mut statements = vec![];

        loop {
            if self.is_at_end() || self.check(TokenDiscriminant::RightBrace) {
                break;
            }
            match self.declaration() {
                Some(statement) => statements.push(statement),
                None => self.synchronize(),
            }
        }
        self.expect(TokenDiscriminant::RightBrace, "Expect '}' after block.")?;
        Some(BlockStatement(statements))
    }

    fn while_statement(&mut self) -> Option<WhileStatement> {
        self.expect(TokenDiscriminant::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.expect(TokenDiscriminant::RightParen, "Expect ')' after condition.")?;
        let body = self.statement()?;
        Some(WhileStatement {
            condition,
            body: Box::new(body),
        })
    }

    fn if_else_statement(&mut self) -> Option<IfElseStatement> {
        self.expect(TokenDiscriminant::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.expect(
            TokenDiscriminant::RightParen,
            "Expect ')' after if condition.",
        )?;
        let if_branch = self.statement()?;
        let mut else_branch = None;
        if self.advance_on_match(&[TokenDiscriminant::Else]).is_some() {
            else_branch = Some(Box::new(self.statement()?));
        }
        Some(IfElseStatement {
            condition,
            if_branch: Box::new(if_branch),
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Option<PrintStatement> {
        let expr = self.expression()?;
        self.expect(TokenDiscriminant::Semicolon, "Expect ';' after value.")?;
        Some(PrintStatement(expr))
    }

    fn return_statement(&mut self, keyword: Token) -> Option<ReturnStatement> {
        let value = if self.check(TokenDiscriminant::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(
            TokenDiscriminant::Semicolon,
            "Expect ';' after return value.",
        )?;
        Some(ReturnStatement { keyword, value })
    }

    fn expression_statement(&mut self) -> Option<ExpressionStatement> {
        let expr = self.expression()?;
        self.expect(TokenDiscriminant::Semicolon, "Expect ';' after expression.")?;
        Some(ExpressionStatement(expr))
    }

    fn expression(&mut self) -> Option<Expression> {
        self.assignment()
    }

    fn assignment(&mut self) -> Option<Expression> {
        let expr = self.or()?;

        if let Some(equals) = self.advance_on_match(&[TokenDiscriminant::Equal]) {
            let value = self.assignment()?;
            match expr {
                Expression::VariableReference(variable) => {
                    Some(Expression::variable_assignment(variable.identifier, value))
                }
                Expression::Get(get) => Some(Expression::set(*get.object, get.name, value)),
                _ => {
                    // Non-fatal: the error is reported, but parsing resumes
                    // right where it stands.
                    self.report_error_at(&equals, "Invalid assignment target.");
                    Some(expr)
                }
            }
        } else {
            Some(expr)
        }
    }

    fn or(&mut self) -> Option<Expression> {
        let mut expr = self.and()?;

        while let Some(operator) = self.advance_on_match(&[TokenDiscriminant::Or]) {
            expr = Expression::logical(expr, operator, self.and()?);
        }
        Some(expr)
    }

    fn and(&mut self) -> Option<Expression> {
        let mut expr = self.equality()?;

        while let Some(operator) = self.advance_on_match(&[TokenDiscriminant::And]) {
            expr = Expression::logical(expr, operator, self.equality()?);
        }
        Some(expr)
    }

    fn equality(&mut self) -> Option<Expression> {
        let mut expr = self.comparison()?;

        while let Some(operator) =
            self.advance_on_match(&[TokenDiscriminant::EqualEqual, TokenDiscriminant::BangEqual])
        {
            expr = Expression::binary(expr, operator, self.comparison()?);
        }
        Some(expr)
    }

    fn comparison(&mut self) -> Option<Expression> {
        let mut expr = self.term()?;

        while let Some(operator) = self.advance_on_match(&[
            TokenDiscriminant::Greater,
            TokenDiscriminant::GreaterEqual,
            TokenDiscriminant::Less,
            TokenDiscriminant::LessEqual,
        ]) {
            expr = Expression::binary(expr, operator, self.term()?);
        }
        Some(expr)
    }

    fn term(&mut self) -> Option<Expression> {
        let mut expr = self.factor()?;

        while let Some(operator) =
            self.advance_on_match(&[TokenDiscriminant::Minus, TokenDiscriminant::Plus])
        {
            expr = Expression::binary(expr, operator, self.factor()?);
        }
        Some(expr)
    }

    fn factor(&mut self) -> Option<Expression> {
        let mut expr = self.unary()?;

        while let Some(operator) =
            self.advance_on_match(&[TokenDiscriminant::Slash, TokenDiscriminant::Star])
        {
            expr = Expression::binary(expr, operator, self.unary()?);
        }
        Some(expr)
    }

    fn unary(&mut self) -> Option<Expression> {
        if let Some(operator) =
            self.advance_on_match(&[TokenDiscriminant::Bang, TokenDiscriminant::Minus])
        {
            Some(Expression::unary(operator, self.unary()?))
        } else {
            self.call()
        }
    }

    fn call(&mut self) -> Option<Expression> {
        let mut expr = self.primary()?;

        loop {
            if self
                .advance_on_match(&[TokenDiscriminant::LeftParen])
                .is_some()
            {
                expr = self.finish_call(expr)?;
            } else if self.advance_on_match(&[TokenDiscriminant::Dot]).is_some() {
                let name = self.expect(
                    TokenDiscriminant::Identifier,
                    "Expect property name after '.'.",
                )?;
                expr = Expression::get(expr, name);
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn finish_call(&mut self, callee: Expression) -> Option<Expression> {
        let mut arguments = vec![];
        if !self.check(TokenDiscriminant::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    self.report_error_at_upcoming("Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if self.advance_on_match(&[TokenDiscriminant::Comma]).is_none() {
                    break;
                }
            }
        }
        let closing_parenthesis =
            self.expect(TokenDiscriminant::RightParen, "Expect ')' after arguments.")?;
        Some(Expression::call(callee, closing_parenthesis, arguments))
    }

    fn primary(&mut self) -> Option<Expression> {
        if self.advance_on_match(&[TokenDiscriminant::True]).is_some() {
            Some(Expression::boolean(true))
        } else if self.advance_on_match(&[TokenDiscriminant::False]).is_some() {
            Some(Expression::boolean(false))
        } else if self.advance_on_match(&[TokenDiscriminant::Nil]).is_some() {
            Some(Expression::nil())
        } else if let Some(t) = self.advance_on_match(&[TokenDiscriminant::Number]) {
            Some(Expression::number(t.ty().number()?))
        } else if let Some(t) = self.advance_on_match(&[TokenDiscriminant::String]) {
            Some(Expression::string(t.ty().string()?.to_owned()))
        } else if let Some(t) = self.advance_on_match(&[TokenDiscriminant::Identifier]) {
            Some(Expression::variable_reference(t))
        } else if let Some(keyword) = self.advance_on_match(&[TokenDiscriminant::This]) {
            Some(Expression::this(keyword))
        } else if let Some(keyword) = self.advance_on_match(&[TokenDiscriminant::Super]) {
            self.expect(TokenDiscriminant::Dot, "Expect '.' after 'super'.")?;
            let method = self.expect(
                TokenDiscriminant::Identifier,
                "Expect superclass method name.",
            )?;
            Some(Expression::super_access(keyword, method))
        } else if self
            .advance_on_match(&[TokenDiscriminant::LeftParen])
            .is_some()
        {
            let expr = self.expression()?;
            self.expect(
                TokenDiscriminant::RightParen,
                "Expect ')' after expression.",
            )?;
            Some(Expression::grouping(expr))
        } else {
            self.record_error("Expect expression.");
            None
        }
    }

    fn advance_on_match(&mut self, token_types: &[TokenDiscriminant]) -> Option<Token> {
        let upcoming = self.peek()?;
        if token_types.contains(&upcoming.discriminant()) {
            return self.advance();
        }
        None
    }

    fn check(&mut self, token_type: TokenDiscriminant) -> bool {
        self.peek()
            .map_or(false, |t| t.discriminant() == token_type)
    }

    fn expect(&mut self, token_type: TokenDiscriminant, message: &str) -> Option<Token> {
        let t = self.advance_on_match(&[token_type]);
        if t.is_none() {
            self.record_error(message);
        }
        t
    }

    /// Record an error at the upcoming token and switch to error recovery:
    /// the parser stops consuming tokens until [`Self::synchronize`] is
    /// called at the next statement boundary.
    fn record_error(&mut self, message: &str) {
        if self.mode != ParsingMode::Normal {
            return;
        }
        self.mode = ParsingMode::ErrorRecovery;
        let error = match self.tokens.peek() {
            Some(t) => match t.ty() {
                // Scan errors travel as tokens - surface the scanner's own
                // message rather than whatever the parser was expecting.
                TokenType::SyntaxError {
                    message: scan_message,
                } => ParseError {
                    line: t.line(),
                    location: None,
                    message: (*scan_message).into(),
                },
                TokenType::Eof => ParseError {
                    line: t.line(),
                    location: Some("end".into()),
                    message: message.into(),
                },
                _ => ParseError {
                    line: t.line(),
                    location: Some(format!("'{}'", t.lexeme())),
                    message: message.into(),
                },
            },
            None => ParseError {
                line: self.last_line,
                location: Some("end".into()),
                message: message.into(),
            },
        };
        self.errors.push(error);
    }

    /// Record an error without abandoning the current production.
    fn report_error_at(&mut self, token: &Token, message: &str) {
        self.errors.push(ParseError {
            line: token.line(),
            location: Some(format!("'{}'", token.lexeme())),
            message: message.into(),
        });
    }

    fn report_error_at_upcoming(&mut self, message: &str) {
        if let Some(token) = self.tokens.peek() {
            let token = token.clone();
            self.report_error_at(&token, message);
        }
    }

    /// Discard tokens until the next statement boundary - right after a
    /// `;`, or right before a keyword that can start a statement.
    fn synchronize(&mut self) {
        self.mode = ParsingMode::Normal;
        while let Some(upcoming) = self.tokens.peek() {
            match upcoming.discriminant() {
                TokenDiscriminant::Eof
                | TokenDiscriminant::Class
                | TokenDiscriminant::Fun
                | TokenDiscriminant::Var
                | TokenDiscriminant::For
                | TokenDiscriminant::If
                | TokenDiscriminant::While
                | TokenDiscriminant::Print
                | TokenDiscriminant::Return => break,
                TokenDiscriminant::Semicolon => {
                    self.tokens.next();
                    break;
                }
                _ => {
                    self.tokens.next();
                }
            }
        }
    }

    fn advance(&mut self) -> Option<Token> {
        if self.mode == ParsingMode::Normal {
            let token = self.tokens.next();
            if let Some(t) = &token {
                self.last_line = t.line();
            }
            token
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.mode == ParsingMode::Normal {
            self.tokens.peek()
        } else {
            None
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.tokens
            .peek()
            .map_or(true, |t| t.discriminant() == TokenDiscriminant::Eof)
    }
}

/// Our parser does not care about trivia tokens.
/// We give `Source` to our parser instead of the raw token stream: `Source` wraps the underlying
/// token stream and makes sure to skip all trivia tokens, making them invisible to the parser.
struct Source<TokenIter>(TokenIter)
where
    TokenIter: Iterator<Item = Token>;

impl<TokenIter> Iterator for Source<TokenIter>
where
    TokenIter: Iterator<Item = Token>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next() {
                None => break None,
                Some(t) if t.discriminant() == TokenDiscriminant::Trivia => continue,
                Some(t) => break Some(t),
            }
        }
    }
}

#[allow(unused)]
pub fn display_ast(s: &Statement) -> Result<String, std::fmt::Error> {
    let mut buffer = String::new();
    _display_statement(&mut buffer, s, 0)?;
    Ok(buffer)
}

fn _display_statement(w: &mut impl Write, s: &Statement, depth: u8) -> Result<(), std::fmt::Error> {
    write!(w, "{}", " ".repeat(depth as usize))?;
    match s {
        Statement::Expression(ExpressionStatement(e)) => {
            writeln!(w, "Expression")?;
            _display_expression(w, e, depth + 1)?;
        }
        Statement::Print(PrintStatement(e)) => {
            writeln!(w, "Print")?;
            _display_expression(w, e, depth + 1)?;
        }
        Statement::VariableDeclaration(VariableDeclarationStatement {
            initializer,
            identifier,
        }) => {
            writeln!(w, "Variable Declaration")?;
            _display_token(w, identifier, depth + 1)?;
            if let Some(e) = initializer {
                _display_expression(w, e, depth + 1)?;
            }
        }
        Statement::Block(BlockStatement(statements)) => {
            writeln!(w, "Block")?;
            for statement in statements {
                _display_statement(w, statement, depth + 1)?;
            }
        }
        Statement::IfElse(IfElseStatement {
            condition,
            if_branch,
            else_branch,
        }) => {
            writeln!(w, "IfElse")?;
            _display_expression(w, condition, depth + 1)?;
            _display_statement(w, if_branch, depth + 1)?;
            if let Some(else_branch) = else_branch {
                _display_statement(w, else_branch, depth + 1)?;
            }
        }
        Statement::While(WhileStatement { condition, body }) => {
            writeln!(w, "While")?;
            _display_expression(w, condition, depth + 1)?;
            _display_statement(w, body, depth + 1)?;
        }
        Statement::FunctionDeclaration(declaration) => {
            writeln!(w, "Function Declaration")?;
            _display_function_parts(w, declaration, depth + 1)?;
        }
        Statement::ClassDeclaration(ClassDeclarationStatement {
            name,
            superclass,
            methods,
        }) => {
            writeln!(w, "Class Declaration")?;
            _display_token(w, name, depth + 1)?;
            if let Some(superclass) = superclass {
                _display_string(w, "Superclass", depth + 1)?;
                _display_token(w, &superclass.identifier, depth + 2)?;
            }
            for method in methods {
                _display_string(w, "Function Declaration", depth + 1)?;
                _display_function_parts(w, method, depth + 2)?;
            }
        }
        Statement::Return(ReturnStatement { value, .. }) => {
            writeln!(w, "Return")?;
            if let Some(value) = value {
                _display_expression(w, value, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn _display_function_parts(
    w: &mut impl Write,
    f: &FunctionDeclarationStatement,
    depth: u8,
) -> Result<(), std::fmt::Error> {
    _display_token(w, &f.name, depth)?;
    _display_string(w, "Parameters", depth)?;
    for parameter in &f.parameters {
        _display_token(w, parameter, depth + 1)?;
    }
    _display_string(w, "Body", depth)?;
    for s in &f.body {
        _display_statement(w, s, depth + 1)?;
    }
    Ok(())
}

fn _display_expression(
    w: &mut impl Write,
    e: &Expression,
    depth: u8,
) -> Result<(), std::fmt::Error> {
    write!(w, "{}", " ".repeat(depth as usize))?;
    match e {
        Expression::Binary(b) => {
            writeln!(w, "Binary")?;
            _display_expression(w, &b.left, depth + 1)?;
            _display_token(w, &b.operator, depth + 1)?;
            _display_expression(w, &b.right, depth + 1)?;
        }
        Expression::Logical(l) => {
            writeln!(w, "Logical")?;
            _display_expression(w, &l.left, depth + 1)?;
            _display_token(w, &l.operator, depth + 1)?;
            _display_expression(w, &l.right, depth + 1)?;
        }
        Expression::Unary(u) => {
            writeln!(w, "Unary")?;
            _display_token(w, &u.operator, depth + 1)?;
            _display_expression(w, &u.operand, depth + 1)?;
        }
        Expression::Literal(l) => {
            writeln!(w, "Literal")?;
            let rendering = match l {
                LiteralExpression::Boolean(b) => format!("Boolean {b}"),
                LiteralExpression::Nil => "Nil".to_string(),
                LiteralExpression::String(s) => format!("String \"{s}\""),
                LiteralExpression::Number(n) => format!("Number {n}"),
            };
            _display_string(w, &rendering, depth + 1)?;
        }
        Expression::Grouping(g) => {
            writeln!(w, "Grouping")?;
            _display_expression(w, &g.0, depth + 1)?;
        }
        Expression::VariableReference(VariableReferenceExpression { identifier, .. }) => {
            writeln!(w, "Variable Reference")?;
            _display_token(w, identifier, depth + 1)?;
        }
        Expression::VariableAssignment(VariableAssignmentExpression {
            identifier, value, ..
        }) => {
            writeln!(w, "Variable Assignment")?;
            _display_token(w, identifier, depth + 1)?;
            _display_expression(w, value, depth + 1)?;
        }
        Expression::Call(CallExpression {
            callee, arguments, ..
        }) => {
            writeln!(w, "Call")?;
            _display_expression(w, callee, depth + 1)?;
            _display_string(w, "Arguments", depth + 1)?;
            for argument in arguments {
                _display_expression(w, argument, depth + 2)?;
            }
        }
        Expression::Get(GetExpression { object, name }) => {
            writeln!(w, "Get")?;
            _display_expression(w, object, depth + 1)?;
            _display_token(w, name, depth + 1)?;
        }
        Expression::Set(SetExpression {
            object,
            name,
            value,
        }) => {
            writeln!(w, "Set")?;
            _display_expression(w, object, depth + 1)?;
            _display_token(w, name, depth + 1)?;
            _display_expression(w, value, depth + 1)?;
        }
        Expression::This(_) => {
            writeln!(w, "This")?;
        }
        Expression::Super(SuperExpression { method, .. }) => {
            writeln!(w, "Super")?;
            _display_token(w, method, depth + 1)?;
        }
    }
    Ok(())
}

fn _display_token(w: &mut impl Write, t: &Token, depth: u8) -> std::fmt::Result {
    write!(w, "{}", " ".repeat(depth as usize))?;
    write!(w, "{:?}", t.discriminant())?;
    match t.ty() {
        TokenType::String(s) => writeln!(w, " \"{}\"", s)?,
        TokenType::Number(n) => writeln!(w, " {}", n)?,
        TokenType::Identifier => writeln!(w, " {}", t.lexeme())?,
        _ => writeln!(w)?,
    }
    Ok(())
}

fn _display_string(w: &mut impl Write, s: &str, depth: u8) -> std::fmt::Result {
    write!(w, "{}", " ".repeat(depth as usize))?;
    writeln!(w, "{}", s)?;
    Ok(())
}
