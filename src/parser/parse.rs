//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: Parsing statements, blocks and control flow
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! # Failure
//!
//! Parsing is fail-fast: the first unexpected token (or premature end of input)
//! aborts with a [`ParseError`] and no partial tree is returned.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Syntax error at {location}: unexpected {kind} '{literal}' ({expected})")]
    UnexpectedToken {
        kind: &'static str,
        literal: String,
        expected: String,
        location: SourceLocation,
    },

    #[error("Unexpected end of input ({expected})")]
    UnexpectedEof {
        expected: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. } => location,
            ParseError::UnexpectedEof { location, .. } => location,
        }
    }
}

/// Recursive descent parser for the matrix language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    lex_errors: Vec<LexError>,
}

impl Parser {
    /// Lex `source` and prepare to parse it. Lexing problems are recovered
    /// from and kept in [`Parser::lex_errors`].
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        let lex_errors = lexer.take_errors();
        Self::with_tokens(tokens, lex_errors)
    }

    /// Parse an existing token stream. A missing trailing [`TokenKind::Eof`]
    /// is supplied.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::with_tokens(tokens, Vec::new())
    }

    fn with_tokens(mut tokens: Vec<Token>, lex_errors: Vec<LexError>) -> Self {
        if !tokens.last().is_some_and(|t| matches!(t.kind, TokenKind::Eof)) {
            let loc = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, loc));
        }
        Self {
            tokens,
            position: 0,
            lex_errors,
        }
    }

    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    pub fn take_lex_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.lex_errors)
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let location = self.current_location();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        debug!(statements = statements.len(), "parsed program");
        Ok(Program {
            body: Block {
                statements,
                location,
            },
        })
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// Build the error for the token under the cursor.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        let expected = expected.into();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::UnexpectedEof {
                expected,
                location: token.location,
            }
        } else {
            ParseError::UnexpectedToken {
                kind: token.kind.name(),
                literal: token.kind.literal(),
                expected,
                location: token.location,
            }
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LParen, &format!("expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RParen, &format!("expected ')' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<(String, SourceLocation), ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            let loc = self.current_location();
            self.advance();
            Ok((name, loc))
        } else {
            Err(self.unexpected(format!("expected identifier {ctx}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_program() {
        let mut parser = Parser::new("  # nothing here\n");
        let program = parser.parse_program().unwrap();

        assert!(program.body.statements.is_empty());
    }

    #[test]
    fn test_parse_assignments() {
        let source = "a = 1; b = 2.5, c = \"s\";";
        let mut parser = Parser::new(source);
        let program = parser.parse_program().unwrap();

        assert_eq!(program.body.statements.len(), 3);
        match &program.body.statements[1] {
            AstNode::Assignment {
                target, op, value, ..
            } => {
                assert_eq!(target.name, "b");
                assert_eq!(*op, AssignOp::Assign);
                assert_eq!(**value, AstNode::FloatLiteral(2.5, SourceLocation::new(1, 12)));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_paren_reports_token() {
        let mut parser = Parser::new("if (x > 0 { y = 1; }");
        let err = parser.parse_program().unwrap_err();

        match &err {
            ParseError::UnexpectedToken {
                kind,
                literal,
                location,
                ..
            } => {
                assert_eq!(*kind, "LBRACE");
                assert_eq!(literal, "{");
                assert_eq!(*location, SourceLocation::new(1, 11));
            }
            other => panic!("Expected unexpected-token error, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Syntax error at line 1, column 11"));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let mut parser = Parser::new("a = ");
        let err = parser.parse_program().unwrap_err();

        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
        assert!(err.to_string().starts_with("Unexpected end of input"));
    }

    #[test]
    fn test_from_tokens_supplies_eof() {
        let tokens = vec![
            Token::new(TokenKind::Break, SourceLocation::new(1, 1)),
            Token::new(TokenKind::Semicolon, SourceLocation::new(1, 6)),
        ];
        let mut parser = Parser::from_tokens(tokens);
        let program = parser.parse_program().unwrap();

        assert_eq!(program.body.statements.len(), 1);
    }

    #[test]
    fn test_lex_errors_are_kept() {
        let parser = Parser::new("a = 1 @;");

        assert_eq!(parser.lex_errors().len(), 1);
    }
}
