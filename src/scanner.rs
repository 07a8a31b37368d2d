use multipeek::{multipeek, MultiPeek};
use std::collections::HashMap;
use std::fmt::Formatter;
use std::str::{Chars, FromStr};
use strum_macros::EnumDiscriminants;

pub struct Scanner<'a> {
    source: MultiPeek<Chars<'a>>,
    current_token_buffer: Vec<char>,
    current_line: u64,
    reached_eof: bool,
    keywords: HashMap<&'static str, TokenType>,
}

impl<'a> std::iter::Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.scan_token() {
            return Some(token);
        }
        if self.reached_eof {
            None
        } else {
            self.reached_eof = true;
            Some(Token {
                ty: TokenType::Eof,
                lexeme: String::new(),
                line: self.current_line,
            })
        }
    }
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let keywords = HashMap::from_iter([
            ("and", TokenType::And),
            ("class", TokenType::Class),
            ("else", TokenType::Else),
            ("false", TokenType::False),
            ("for", TokenType::For),
            ("fun", TokenType::Fun),
            ("if", TokenType::If),
            ("nil", TokenType::Nil),
            ("or", TokenType::Or),
            ("print", TokenType::Print),
            ("return", TokenType::Return),
            ("super", TokenType::Super),
            ("this", TokenType::This),
            ("true", TokenType::True),
            ("var", TokenType::Var),
            ("while", TokenType::While),
        ]);
        Self {
            source: multipeek(source.chars()),
            current_token_buffer: Vec::new(),
            current_line: 1,
            reached_eof: false,
            keywords,
        }
    }

    fn scan_token(&mut self) -> Option<Token> {
        let c = self.advance()?;
        let token = match c {
            '(' => self.finalize_current_token(TokenType::LeftParen),
            ')' => self.finalize_current_token(TokenType::RightParen),
            '{' => self.finalize_current_token(TokenType::LeftBrace),
            '}' => self.finalize_current_token(TokenType::RightBrace),
            ',' => self.finalize_current_token(TokenType::Comma),
            '.' => self.finalize_current_token(TokenType::Dot),
            '-' => self.finalize_current_token(TokenType::Minus),
            '+' => self.finalize_current_token(TokenType::Plus),
            ';' => self.finalize_current_token(TokenType::Semicolon),
            '*' => self.finalize_current_token(TokenType::Star),
            '!' => {
                if self.advance_on_match('=') {
                    self.finalize_current_token(TokenType::BangEqual)
                } else {
                    self.finalize_current_token(TokenType::Bang)
                }
            }
            '=' => {
                if self.advance_on_match('=') {
                    self.finalize_current_token(TokenType::EqualEqual)
                } else {
                    self.finalize_current_token(TokenType::Equal)
                }
            }
            '<' => {
                if self.advance_on_match('=') {
                    self.finalize_current_token(TokenType::LessEqual)
                } else {
                    self.finalize_current_token(TokenType::Less)
                }
            }
            '>' => {
                if self.advance_on_match('=') {
                    self.finalize_current_token(TokenType::GreaterEqual)
                } else {
                    self.finalize_current_token(TokenType::Greater)
                }
            }
            '/' => {
                if self.advance_on_match('/') {
                    // Eat the entire comment, until we encounter a line break
                    self.advance_until('\n');
                    // Empty the token buffer - we don't care about comments.
                    self.current_token_buffer.clear();
                    self.scan_token()?
                } else {
                    self.finalize_current_token(TokenType::Slash)
                }
            }
            '"' => {
                self.advance_until('"');
                if self.is_at_end() {
                    return Some(self.finalize_error_token("Unterminated string."));
                }
                // Eat the closing `"`
                self.advance();
                let lexeme = self.finalize_buffer_into_lexeme();
                // Escape sequences are not decoded - the string's value is
                // the source slice between the quotes, verbatim.
                let literal = lexeme.trim_matches('"').to_string();
                Token {
                    ty: TokenType::String(literal),
                    lexeme,
                    line: self.current_line,
                }
            }
            d if d.is_ascii_digit() => {
                self.advance_while_true(|c| c.is_ascii_digit());
                // A fractional part requires a digit after the `.`, hence
                // the second character of lookahead.
                if self.peek() == Some(&'.')
                    && self.peek_next().map_or(false, |c| c.is_ascii_digit())
                {
                    // Consume `.`
                    self.advance();
                    self.advance_while_true(|c| c.is_ascii_digit());
                }
                let lexeme = self.finalize_buffer_into_lexeme();
                match f64::from_str(&lexeme) {
                    Ok(f) => Token {
                        ty: TokenType::Number(f),
                        lexeme,
                        line: self.current_line,
                    },
                    Err(_) => self.finalize_error_token("Failed to parse number."),
                }
            }
            c => {
                if Self::is_alpha(&c) {
                    self.advance_while_true(|c| Self::is_alpha(c) || c.is_ascii_digit());
                    let lexeme = self.finalize_buffer_into_lexeme();
                    let ty = self
                        .keywords
                        .get(lexeme.as_str())
                        .cloned()
                        .unwrap_or(TokenType::Identifier);
                    Token {
                        ty,
                        lexeme,
                        line: self.current_line,
                    }
                } else if Self::is_trivia(&c) {
                    self.advance_while_true(Self::is_trivia);
                    self.finalize_current_token(TokenType::Trivia)
                } else {
                    self.finalize_error_token("Unexpected character.")
                }
            }
        };
        Some(token)
    }

    fn is_alpha(c: &char) -> bool {
        c.is_ascii_alphabetic() || c == &'_'
    }

    fn finalize_error_token(&mut self, message: &'static str) -> Token {
        self.finalize_current_token(TokenType::SyntaxError { message })
    }

    fn finalize_current_token(&mut self, ty: TokenType) -> Token {
        let lexeme = self.finalize_buffer_into_lexeme();
        Token {
            ty,
            lexeme,
            line: self.current_line,
        }
    }

    fn finalize_buffer_into_lexeme(&mut self) -> String {
        String::from_iter(self.current_token_buffer.drain(..))
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.source.next()?;
        if char == '\n' {
            self.current_line += 1;
        }
        self.current_token_buffer.push(char);
        Some(char)
    }

    // "Trivia" tokens are tokens that do not alter the functional interpretation
    // of the code we are scanning.
    // For lox, we are talking about whitespace, tabs and new lines.
    fn is_trivia(c: &char) -> bool {
        matches!(c, ' ' | '\r' | '\t' | '\n')
    }

    fn advance_on_match(&mut self, c: char) -> bool {
        if self.peek() == Some(&c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_until(&mut self, c: char) {
        self.advance_while_true(|ch| ch != &c)
    }

    fn advance_while_true<F>(&mut self, f: F)
    where
        F: Fn(&char) -> bool,
    {
        loop {
            let should_advance = self.peek().map_or(false, &f);
            if should_advance {
                self.advance();
                continue;
            }
            break;
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.source.peek()
    }

    fn peek_next(&mut self) -> Option<&char> {
        self.source.peek_nth(1)
    }

    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    ty: TokenType,
    lexeme: String,
    line: u64,
}

impl Token {
    pub fn ty(&self) -> &TokenType {
        &self.ty
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn discriminant(&self) -> TokenDiscriminant {
        TokenDiscriminant::from(&self.ty)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {:?} {}", self.line, self.discriminant(), self.lexeme)
    }
}

#[derive(Debug, Clone, EnumDiscriminants)]
#[strum_discriminants(name(TokenDiscriminant))]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String(String),
    Number(f64),

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    // Tokens that do not affect the functional meaning of
    // the scanned code - whitespace, new lines, comments, etc.
    Trivia,

    // Special token to signal that we encountered a token
    // that we couldn't successfully scan. The parser surfaces
    // the attached message as a parse error.
    SyntaxError { message: &'static str },

    // Sentinel emitted once, after the source is exhausted.
    Eof,
}

impl TokenType {
    pub fn number(&self) -> Option<f64> {
        if let Self::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn string(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}
