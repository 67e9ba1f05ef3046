//! Lexer (tokenizer) for matrix-language source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Spaces, tabs and newlines are discarded, and `#` starts a comment running to
//! the end of the line.
//!
//! Lexing is fail-soft: an unrecognized character is recorded as a [`LexError`],
//! skipped, and tokenization carries on. The stream always ends with
//! [`TokenKind::Eof`].

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Classified token kinds.
///
/// Literal and identifier variants carry their value; everything else is
/// fully described by the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),

    // Identifiers
    Ident(String),

    // Keywords
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,
    Zeros,
    Ones,
    Eye,
    Print,

    // Elementwise operators
    DotPlus,  // .+
    DotMinus, // .-
    DotStar,  // .*
    DotSlash, // ./

    // Compound assignment
    PlusEq,  // +=
    MinusEq, // -=
    StarEq,  // *=
    SlashEq, // /=

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Le,    // <=
    Ge,    // >=
    Lt,    // <
    Gt,    // >

    // Single-character literals
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Apostrophe,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,

    // End of input
    Eof,
}

impl TokenKind {
    /// Upper-case kind name used in syntax error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::IntLiteral(_) => "INTNUM",
            TokenKind::FloatLiteral(_) => "FLOAT",
            TokenKind::StringLiteral(_) => "STRING",
            TokenKind::Ident(_) => "ID",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::For => "FOR",
            TokenKind::While => "WHILE",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Return => "RETURN",
            TokenKind::Zeros => "ZEROS",
            TokenKind::Ones => "ONES",
            TokenKind::Eye => "EYE",
            TokenKind::Print => "PRINT",
            TokenKind::DotPlus => "DOTADD",
            TokenKind::DotMinus => "DOTSUB",
            TokenKind::DotStar => "DOTMUL",
            TokenKind::DotSlash => "DOTDIV",
            TokenKind::PlusEq => "ADDASSIGN",
            TokenKind::MinusEq => "SUBASSIGN",
            TokenKind::StarEq => "MULASSIGN",
            TokenKind::SlashEq => "DIVASSIGN",
            TokenKind::EqEq => "EQ",
            TokenKind::NotEq => "NEQ",
            TokenKind::Le => "LEQ",
            TokenKind::Ge => "GEQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "TIMES",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Eq => "ASSIGN",
            TokenKind::Apostrophe => "TRANSPOSE",
            TokenKind::Colon => "COLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Eof => "EOF",
        }
    }

    /// The literal text of the token as it would appear in source.
    pub fn literal(&self) -> String {
        match self {
            TokenKind::IntLiteral(n) => n.to_string(),
            TokenKind::FloatLiteral(x) => format!("{:?}", x),
            TokenKind::StringLiteral(s) => format!("\"{}\"", s),
            TokenKind::Ident(s) => s.clone(),
            TokenKind::If => "if".to_string(),
            TokenKind::Else => "else".to_string(),
            TokenKind::For => "for".to_string(),
            TokenKind::While => "while".to_string(),
            TokenKind::Break => "break".to_string(),
            TokenKind::Continue => "continue".to_string(),
            TokenKind::Return => "return".to_string(),
            TokenKind::Zeros => "zeros".to_string(),
            TokenKind::Ones => "ones".to_string(),
            TokenKind::Eye => "eye".to_string(),
            TokenKind::Print => "print".to_string(),
            TokenKind::DotPlus => ".+".to_string(),
            TokenKind::DotMinus => ".-".to_string(),
            TokenKind::DotStar => ".*".to_string(),
            TokenKind::DotSlash => "./".to_string(),
            TokenKind::PlusEq => "+=".to_string(),
            TokenKind::MinusEq => "-=".to_string(),
            TokenKind::StarEq => "*=".to_string(),
            TokenKind::SlashEq => "/=".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Ge => ">=".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Eq => "=".to_string(),
            TokenKind::Apostrophe => "'".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBrace => "{".to_string(),
            TokenKind::RBrace => "}".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Semicolon => ";".to_string(),
            TokenKind::Eof => String::new(),
        }
    }

    fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            "zeros" => TokenKind::Zeros,
            "ones" => TokenKind::Ones,
            "eye" => TokenKind::Eye,
            "print" => TokenKind::Print,
            _ => return None,
        };
        Some(kind)
    }
}

/// One lexical unit with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Token { kind, location }
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.kind, TokenKind::Eof) {
            write!(f, "end of input")
        } else {
            write!(f, "{} '{}'", self.kind.name(), self.kind.literal())
        }
    }
}

/// A recovered lexing problem. Never aborts tokenization.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {location}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for matrix-language source code.
///
/// Besides [`Lexer::tokenize`], the lexer is an [`Iterator`] over tokens that
/// yields [`TokenKind::Eof`] exactly once and then stops. [`Lexer::reset`]
/// rewinds it to the start of the input.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    line_start: usize,
    finished: bool,
    errors: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            line_start: 0,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input, from the beginning.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.reset();
        let tokens: Vec<Token> = self.by_ref().collect();
        debug!(
            tokens = tokens.len(),
            errors = self.errors.len(),
            "tokenized source"
        );
        tokens
    }

    /// Rewind to the start of the input and forget recorded errors.
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.line_start = 0;
        self.finished = false;
        self.errors.clear();
    }

    /// Errors recovered from so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Get next token, skipping anything that cannot start one.
    fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            let loc = self.current_location();
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, loc);
            };

            let kind = match ch {
                '"' => self.string_literal(loc),
                '0'..='9' => Some(self.number_literal(ch, loc)),
                '.' => self.dot_operator_or_float(),
                'a'..='z' | 'A'..='Z' | '_' => Some(self.identifier_or_keyword(ch)),
                '+' => Some(self.with_assign(TokenKind::PlusEq, TokenKind::Plus)),
                '-' => Some(self.with_assign(TokenKind::MinusEq, TokenKind::Minus)),
                '*' => Some(self.with_assign(TokenKind::StarEq, TokenKind::Star)),
                '/' => Some(self.with_assign(TokenKind::SlashEq, TokenKind::Slash)),
                '=' => Some(self.with_assign(TokenKind::EqEq, TokenKind::Eq)),
                '<' => Some(self.with_assign(TokenKind::Le, TokenKind::Lt)),
                '>' => Some(self.with_assign(TokenKind::Ge, TokenKind::Gt)),
                '!' if self.peek() == Some('=') => {
                    self.advance();
                    Some(TokenKind::NotEq)
                }
                '\'' => Some(TokenKind::Apostrophe),
                ':' => Some(TokenKind::Colon),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                '[' => Some(TokenKind::LBracket),
                ']' => Some(TokenKind::RBracket),
                ',' => Some(TokenKind::Comma),
                ';' => Some(TokenKind::Semicolon),
                _ => None,
            };

            match kind {
                Some(kind) => return Token::new(kind, loc),
                None => {
                    // String literals report their own failure and rewind.
                    if ch != '"' {
                        self.report(format!("Illegal character '{}'", ch), loc);
                    }
                }
            }
        }
    }

    fn report(&mut self, message: String, location: SourceLocation) {
        warn!(%location, %message, "lexical error");
        self.errors.push(LexError { message, location });
    }

    /// `op=` if the next character is `=`, otherwise the plain operator.
    fn with_assign(&mut self, compound: TokenKind, plain: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            compound
        } else {
            plain
        }
    }

    /// Parse string literal. The opening quote has been consumed.
    ///
    /// On failure only the opening quote is skipped; the rest of the line is
    /// lexed normally.
    fn string_literal(&mut self, loc: SourceLocation) -> Option<TokenKind> {
        let start = self.position;
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return Some(TokenKind::StringLiteral(string));
                }
                '\n' => break,
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        self.position = start;
        self.report("Unterminated string literal".to_string(), loc);
        None
    }

    /// Parse numeric literal: `\d+`, `\d+\.\d*` with optional exponent.
    ///
    /// A digit run followed by `.` is always a float, so `2.*a` is `2.` `*` `a`.
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> TokenKind {
        let mut num_str = String::new();
        num_str.push(first_digit);
        self.take_digits(&mut num_str);

        if self.peek() == Some('.') {
            num_str.push('.');
            self.advance();
            self.take_digits(&mut num_str);
            self.take_exponent(&mut num_str);
            return TokenKind::FloatLiteral(num_str.parse().unwrap_or(f64::INFINITY));
        }

        match num_str.parse::<i64>() {
            Ok(value) => TokenKind::IntLiteral(value),
            Err(_) => {
                self.report(format!("Integer literal out of range: {}", num_str), loc);
                TokenKind::IntLiteral(i64::MAX)
            }
        }
    }

    /// A leading `.`: either an elementwise operator or a float like `.5`.
    fn dot_operator_or_float(&mut self) -> Option<TokenKind> {
        let kind = match self.peek() {
            Some('+') => TokenKind::DotPlus,
            Some('-') => TokenKind::DotMinus,
            Some('*') => TokenKind::DotStar,
            Some('/') => TokenKind::DotSlash,
            Some(c) if c.is_ascii_digit() => {
                let mut num_str = String::from("0.");
                self.take_digits(&mut num_str);
                self.take_exponent(&mut num_str);
                return Some(TokenKind::FloatLiteral(num_str.parse().unwrap_or(f64::INFINITY)));
            }
            _ => return None,
        };
        self.advance();
        Some(kind)
    }

    fn take_digits(&mut self, buf: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                buf.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume `e[+-]?\d+` if (and only if) it is complete.
    fn take_exponent(&mut self, buf: &mut String) {
        if !matches!(self.peek(), Some('e') | Some('E')) {
            return;
        }
        let sign = matches!(self.peek_ahead(1), Some('+') | Some('-'));
        let digit_at = if sign { 2 } else { 1 };
        if !self.peek_ahead(digit_at).is_some_and(|c| c.is_ascii_digit()) {
            return;
        }
        for _ in 0..digit_at {
            if let Some(ch) = self.advance() {
                buf.push(ch);
            }
        }
        self.take_digits(buf);
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::keyword(&ident).unwrap_or(TokenKind::Ident(ident))
    }

    /// Skip whitespace and `#` line comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character, tracking line starts
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.line_start = self.position;
        }

        Some(ch)
    }

    /// Column is the distance from the most recent newline, 1-based.
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.position - self.line_start + 1)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token.kind, TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}
