//! Syntax tree dump
//!
//! Renders a [`Program`] as indented text, one node per line, each nesting
//! level prefixed with [`FILLER`]. The output depends only on the tree, so equal
//! trees always render identically.
//!
//! ```text
//! =
//! |  c
//! |  +
//! |  |  a
//! |  |  TRANSPOSE
//! |  |  |  b
//! ```

use crate::parser::ast::*;
use std::fmt::Write;

/// Prefix written once per indent level
pub const FILLER: &str = "|  ";

/// Render the whole program
pub fn render(program: &Program) -> String {
    let mut printer = TreePrinter::default();
    printer.block(&program.body, 0);
    printer.out
}

/// Render a single node at indent level 0
pub fn render_node(node: &AstNode) -> String {
    let mut printer = TreePrinter::default();
    printer.node(node, 0);
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
}

impl TreePrinter {
    fn line(&mut self, indent: usize, text: impl std::fmt::Display) {
        for _ in 0..indent {
            self.out.push_str(FILLER);
        }
        // Writing to a String cannot fail
        let _ = writeln!(self.out, "{}", text);
    }

    fn block(&mut self, block: &Block, indent: usize) {
        for statement in &block.statements {
            self.node(statement, indent);
        }
    }

    fn identifier(&mut self, ident: &Identifier, indent: usize) {
        if !ident.is_indexed() {
            self.line(indent, &ident.name);
            return;
        }

        self.line(indent, "REF");
        self.line(indent + 1, &ident.name);
        for index in &ident.indices {
            self.node(index, indent + 1);
        }
    }

    fn node(&mut self, node: &AstNode, indent: usize) {
        match node {
            AstNode::IntLiteral(n, _) => self.line(indent, n),
            AstNode::FloatLiteral(x, _) => self.line(indent, format!("{:?}", x)),
            AstNode::StringLiteral(s, _) => self.line(indent, format!("\"{}\"", s)),
            AstNode::Variable(ident) => self.identifier(ident, indent),

            AstNode::Matrix { rows, .. } => {
                self.line(indent, "MATRIX");
                for row in rows {
                    self.line(indent + 1, "VECTOR");
                    for element in row {
                        self.node(element, indent + 2);
                    }
                }
            }

            AstNode::BinaryOp {
                op, left, right, ..
            } => {
                self.line(indent, op.symbol());
                self.node(left, indent + 1);
                self.node(right, indent + 1);
            }

            AstNode::Comparison {
                op, left, right, ..
            } => {
                self.line(indent, op.symbol());
                self.node(left, indent + 1);
                self.node(right, indent + 1);
            }

            AstNode::UnaryOp { op, operand, .. } => {
                let label = match op {
                    UnOp::Neg => "-",
                    UnOp::Transpose => "TRANSPOSE",
                };
                self.line(indent, label);
                self.node(operand, indent + 1);
            }

            AstNode::MatrixBuiltin { builtin, args, .. } => {
                self.line(indent, builtin.name());
                for arg in args {
                    self.node(arg, indent + 1);
                }
            }

            AstNode::Assignment {
                target, op, value, ..
            } => {
                self.line(indent, op.symbol());
                self.identifier(target, indent + 1);
                self.node(value, indent + 1);
            }

            AstNode::Instruction { kind, values, .. } => {
                self.line(indent, kind.name().to_uppercase());
                for value in values {
                    self.node(value, indent + 1);
                }
            }

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.line(indent, "IF");
                self.node(condition, indent + 1);
                self.line(indent, "THEN");
                self.block(then_branch, indent + 1);
                match else_branch {
                    Some(ElseBranch::ElseIf(nested)) => {
                        self.line(indent, "ELSE");
                        self.node(nested, indent);
                    }
                    Some(ElseBranch::Block(block)) => {
                        self.line(indent, "ELSE");
                        self.block(block, indent + 1);
                    }
                    None => {}
                }
            }

            AstNode::While {
                condition, body, ..
            } => {
                self.line(indent, "WHILE");
                self.node(condition, indent + 1);
                self.block(body, indent + 1);
            }

            AstNode::For {
                variable,
                range,
                body,
                ..
            } => {
                self.line(indent, "FOR");
                self.identifier(variable, indent + 1);
                self.line(indent + 1, "RANGE");
                self.node(&range.start, indent + 2);
                self.node(&range.end, indent + 2);
                self.block(body, indent + 1);
            }

            AstNode::ExpressionStatement { expr, .. } => self.node(expr, indent),
        }
    }
}
