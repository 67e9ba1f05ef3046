//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Assignments: `x = e;`, `x += e;`, `m[i, j] = e,`
//! - Simple instructions: `break;`, `continue;`, `return e;`, `print a, b;`
//! - Control flow: `if`/`else if`/`else`, `while`, `for i = a:b`
//! - Expression statements: `e;`
//!
//! # Grammar
//!
//! ```text
//! statement   ::= (assignment | instruction | expr) (';' | ',')
//!               | if_stmt | while_stmt | for_stmt
//! block       ::= '{' statement* '}' | statement
//! if_stmt     ::= 'if' '(' expr ')' block ('else' (if_stmt | block))?
//! while_stmt  ::= 'while' '(' expr ')' block
//! for_stmt    ::= 'for' ID '=' expr ':' expr block
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement();
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement();
        }

        if self.match_token(&TokenKind::Break) {
            return self.finish_instruction(InstructionKind::Break, Vec::new(), loc);
        }

        if self.match_token(&TokenKind::Continue) {
            return self.finish_instruction(InstructionKind::Continue, Vec::new(), loc);
        }

        if self.match_token(&TokenKind::Return) {
            let values = if self.starts_expression() {
                self.parse_value_list()?
            } else {
                Vec::new()
            };
            return self.finish_instruction(InstructionKind::Return, values, loc);
        }

        if self.match_token(&TokenKind::Print) {
            let values = self.parse_value_list()?;
            return self.finish_instruction(InstructionKind::Print, values, loc);
        }

        if let Some(assignment) = self.try_parse_assignment()? {
            self.expect_terminator("after assignment")?;
            return Ok(assignment);
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.expect_terminator("after expression")?;
        Ok(AstNode::ExpressionStatement {
            expr: Box::new(expr),
            location: loc,
        })
    }

    /// Parse a block: braces around zero or more statements, or one bare statement
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let location = self.current_location();

        if !self.match_token(&TokenKind::LBrace) {
            let statement = self.parse_statement()?;
            return Ok(Block {
                statements: vec![statement],
                location,
            });
        }

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect_token(&TokenKind::RBrace, "expected '}' after block")?;

        Ok(Block {
            statements,
            location,
        })
    }

    /// `;` or `,` ends assignments, instructions and expression statements
    fn expect_terminator(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Semicolon) || self.match_token(&TokenKind::Comma) {
            Ok(())
        } else {
            Err(self.unexpected(format!("expected ';' or ',' {ctx}")))
        }
    }

    fn finish_instruction(
        &mut self,
        kind: InstructionKind,
        values: Vec<AstNode>,
        location: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        self.expect_terminator(&format!("after '{}'", kind.name()))?;
        Ok(AstNode::Instruction {
            kind,
            values,
            location,
        })
    }

    /// Parse `target op value` if the statement starts with one.
    ///
    /// Backtracks when the identifier turns out to begin an expression.
    fn try_parse_assignment(&mut self) -> Result<Option<AstNode>, ParseError> {
        if !matches!(self.peek().kind, TokenKind::Ident(_)) {
            return Ok(None);
        }

        let saved_pos = self.position;
        let target = self.parse_identifier_ref()?;

        let loc = self.current_location();
        let op = match &self.peek().kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            _ => None,
        };
        let Some(op) = op else {
            self.position = saved_pos;
            return Ok(None);
        };
        self.advance();

        let value = Box::new(self.parse_expression()?);
        Ok(Some(AstNode::Assignment {
            target,
            op,
            value,
            location: loc,
        }))
    }

    /// Parse if statement, including any `else if` chain
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            if self.match_token(&TokenKind::If) {
                Some(ElseBranch::ElseIf(Box::new(self.parse_if_statement()?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(AstNode::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after while condition")?;

        let body = self.parse_block()?;

        Ok(AstNode::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse for statement: `for i = start:end block`
    fn parse_for_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        let (name, var_loc) = self.expect_identifier("after 'for'")?;
        self.expect_token(&TokenKind::Eq, "expected '=' after loop variable")?;
        let range = self.parse_range()?;
        let body = self.parse_block()?;

        Ok(AstNode::For {
            variable: Identifier::new(name, var_loc),
            range,
            body,
            location: loc,
        })
    }

    /// Parse range: `start:end`
    fn parse_range(&mut self) -> Result<RangeExpr, ParseError> {
        let start = Box::new(self.parse_expression()?);
        let loc = self.current_location();
        self.expect_token(&TokenKind::Colon, "expected ':' in range")?;
        let end = Box::new(self.parse_expression()?);

        Ok(RangeExpr {
            start,
            end,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse_program().unwrap()
    }

    #[test]
    fn test_compound_assignment() {
        let program = parse("x -= 2;");

        assert!(matches!(
            &program.body.statements[0],
            AstNode::Assignment { op: AssignOp::SubAssign, .. }
        ));
    }

    #[test]
    fn test_indexed_assignment_target() {
        let program = parse("m[1, 2] = 5;");

        match &program.body.statements[0] {
            AstNode::Assignment { target, .. } => {
                assert_eq!(target.name, "m");
                assert_eq!(target.indices.len(), 2);
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_statement_backtracks() {
        let program = parse("a + 1;");

        match &program.body.statements[0] {
            AstNode::ExpressionStatement { expr, .. } => {
                assert!(matches!(**expr, AstNode::BinaryOp { op: BinOp::Add, .. }));
            }
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain() {
        let program = parse("if (a < 1) x = 1; else if (a < 2) x = 2; else { x = 3; }");

        match &program.body.statements[0] {
            AstNode::If {
                else_branch: Some(ElseBranch::ElseIf(inner)),
                ..
            } => match &**inner {
                AstNode::If {
                    else_branch: Some(ElseBranch::Block(block)),
                    ..
                } => assert_eq!(block.statements.len(), 1),
                other => panic!("Expected nested if, got {:?}", other),
            },
            other => panic!("Expected if with else-if, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_block_and_bare_body() {
        let program = parse("while (1 < 2) {} for i = 1:10 print i;");

        match &program.body.statements[0] {
            AstNode::While { body, .. } => assert!(body.statements.is_empty()),
            other => panic!("Expected while, got {:?}", other),
        }
        match &program.body.statements[1] {
            AstNode::For { variable, body, .. } => {
                assert_eq!(variable.name, "i");
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_print_value_list_and_bare_return() {
        let program = parse("print a, b, \"c\"; return;");

        match &program.body.statements[0] {
            AstNode::Instruction { kind, values, .. } => {
                assert_eq!(*kind, InstructionKind::Print);
                assert_eq!(values.len(), 3);
            }
            other => panic!("Expected print, got {:?}", other),
        }
        match &program.body.statements[1] {
            AstNode::Instruction { kind, values, .. } => {
                assert_eq!(*kind, InstructionKind::Return);
                assert!(values.is_empty());
            }
            other => panic!("Expected return, got {:?}", other),
        }
    }

    #[test]
    fn test_comma_terminates_before_statement_keyword() {
        let program = parse("print a, break;");

        assert_eq!(program.body.statements.len(), 2);
    }

    #[test]
    fn test_missing_terminator_fails() {
        assert!(Parser::new("x = 1 y = 2;").parse_program().is_err());
    }
}
