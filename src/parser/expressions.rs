//! Expression parsing implementation
//!
//! One method per precedence level, lowest binding first:
//!
//! | Level          | Operators                 | Associativity |
//! |----------------|---------------------------|---------------|
//! | equality       | `==` `!=`                 | left          |
//! | relational     | `<` `>` `<=` `>=`         | left          |
//! | additive       | `+` `-` `.+` `.-`         | left          |
//! | multiplicative | `*` `/` `.*` `./`         | left          |
//! | unary          | prefix `-`                | right         |
//! | postfix        | transpose `'`             | left          |
//!
//! Primaries are literals, (indexed) identifiers, parenthesized expressions,
//! matrix literals `[1, 2; 3, 4]` and the `zeros`/`ones`/`eye` builtins.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_equality()
    }

    /// Whether the current token can begin an expression
    pub(crate) fn starts_expression(&self) -> bool {
        can_start_expression(&self.peek().kind)
    }

    /// Parse the payload of `print`/`return`: `expr (',' expr)*`.
    ///
    /// A comma that is not followed by an expression is left in place, where
    /// it terminates the instruction.
    pub(crate) fn parse_value_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut values = vec![self.parse_expression()?];

        while self.check(&TokenKind::Comma)
            && self
                .peek_ahead(1)
                .is_some_and(|next| can_start_expression(&next.kind))
        {
            self.advance();
            values.push(self.parse_expression()?);
        }

        Ok(values)
    }

    /// Parse `expr (',' expr)*` where every comma must be followed by an expression
    fn parse_expression_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut values = vec![self.parse_expression()?];

        while self.match_token(&TokenKind::Comma) {
            values.push(self.parse_expression()?);
        }

        Ok(values)
    }

    /// Parse `ID` or `ID '[' expr (',' expr)* ']'`
    pub(crate) fn parse_identifier_ref(&mut self) -> Result<Identifier, ParseError> {
        let (name, loc) = self.expect_identifier("in variable reference")?;
        let mut ident = Identifier::new(name, loc);

        if self.match_token(&TokenKind::LBracket) {
            ident.indices = self.parse_expression_list()?;
            self.expect_token(&TokenKind::RBracket, "expected ']' after indices")?;
        }

        Ok(ident)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::EqEq) {
                CmpOp::Eq
            } else if self.match_token(&TokenKind::NotEq) {
                CmpOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_relational()?);
            left = AstNode::Comparison {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Lt) {
                CmpOp::Lt
            } else if self.match_token(&TokenKind::Le) {
                CmpOp::Le
            } else if self.match_token(&TokenKind::Gt) {
                CmpOp::Gt
            } else if self.match_token(&TokenKind::Ge) {
                CmpOp::Ge
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = AstNode::Comparison {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ - .+ .-)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Plus) {
                BinOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinOp::Sub
            } else if self.match_token(&TokenKind::DotPlus) {
                BinOp::DotAdd
            } else if self.match_token(&TokenKind::DotMinus) {
                BinOp::DotSub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / .* ./)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Star) {
                BinOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinOp::Div
            } else if self.match_token(&TokenKind::DotStar) {
                BinOp::DotMul
            } else if self.match_token(&TokenKind::DotSlash) {
                BinOp::DotDiv
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary negation
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if self.match_token(&TokenKind::Minus) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(AstNode::UnaryOp {
                op: UnOp::Neg,
                operand,
                location: loc,
            });
        }

        self.parse_postfix()
    }

    /// Parse postfix transpose, which binds to the operand on its left
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            if self.match_token(&TokenKind::Apostrophe) {
                expr = AstNode::UnaryOp {
                    op: UnOp::Transpose,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse primary (literals, variables, matrices, builtins, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        match self.peek().kind.clone() {
            TokenKind::IntLiteral(n) => {
                self.advance();
                Ok(AstNode::IntLiteral(n, loc))
            }
            TokenKind::FloatLiteral(x) => {
                self.advance();
                Ok(AstNode::FloatLiteral(x, loc))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(AstNode::StringLiteral(s, loc))
            }
            TokenKind::Ident(_) => Ok(AstNode::Variable(self.parse_identifier_ref()?)),
            TokenKind::Zeros => self.parse_builtin(Builtin::Zeros),
            TokenKind::Ones => self.parse_builtin(Builtin::Ones),
            TokenKind::Eye => self.parse_builtin(Builtin::Eye),
            TokenKind::LBracket => self.parse_matrix(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    /// Parse `zeros(...)`, `ones(...)` or `eye(...)`
    fn parse_builtin(&mut self, builtin: Builtin) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume the builtin keyword

        self.expect_lparen(&format!("after '{}'", builtin.name()))?;
        let args = self.parse_expression_list()?;
        self.expect_rparen(&format!("after '{}' dimensions", builtin.name()))?;

        Ok(AstNode::MatrixBuiltin {
            builtin,
            args,
            location: loc,
        })
    }

    /// Parse matrix literal: `[row; row; ...]` with an optional trailing `;`
    fn parse_matrix(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume '['

        let mut rows = Vec::new();
        loop {
            rows.push(self.parse_expression_list()?);

            if !self.match_token(&TokenKind::Semicolon) || self.check(&TokenKind::RBracket) {
                break;
            }
        }

        self.expect_token(&TokenKind::RBracket, "expected ']' after matrix rows")?;

        Ok(AstNode::Matrix {
            rows,
            location: loc,
        })
    }
}

fn can_start_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntLiteral(_)
            | TokenKind::FloatLiteral(_)
            | TokenKind::StringLiteral(_)
            | TokenKind::Ident(_)
            | TokenKind::Zeros
            | TokenKind::Ones
            | TokenKind::Eye
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Minus
    )
}
