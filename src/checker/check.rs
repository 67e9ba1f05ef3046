//! Type checker coordinator and statement rules
//!
//! [`TypeChecker`] walks a [`Program`] once. It owns the scope stack, the loop
//! depth counter and the sink that receives diagnostics, so two checkers never
//! share state.
//!
//! # Statement Rules
//!
//! - `=` binds or rebinds the target to the value's type (possibly unresolved)
//! - `+= -= *= /=` require a bound target and apply [`combine`]
//! - `if`/`while` conditions must be `boolean`; bodies run in a nested scope
//! - `for` ranges must be `int:int`; the loop variable is bound to `int`
//! - `break`/`continue` need an enclosing loop
//! - `print`/`return` payloads must all have known types
//!
//! Expression rules live in `checker::expressions`.

use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use super::symbols::{ScopeStack, SymbolEntry, SymbolTable};
use super::types::{combine, Type};
use crate::parser::ast::*;
use tracing::debug;

/// Static analysis over one program
pub struct TypeChecker<S: DiagnosticSink = Vec<Diagnostic>> {
    pub(crate) scopes: ScopeStack,
    pub(crate) loop_depth: usize,
    sink: S,
    reported: usize,
}

impl TypeChecker<Vec<Diagnostic>> {
    /// Checker that collects diagnostics into a `Vec`
    pub fn new() -> Self {
        Self::with_sink(Vec::new())
    }
}

impl Default for TypeChecker<Vec<Diagnostic>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> TypeChecker<S> {
    pub fn with_sink(sink: S) -> Self {
        TypeChecker {
            scopes: ScopeStack::new(),
            loop_depth: 0,
            sink,
            reported: 0,
        }
    }

    /// Check every statement of `program`
    pub fn check_program(&mut self, program: &Program) {
        self.check_block(&program.body);
        debug!(diagnostics = self.reported, "type check finished");
    }

    /// Number of diagnostics reported so far
    pub fn diagnostic_count(&self) -> usize {
        self.reported
    }

    /// Current type of a variable in the innermost scope
    pub fn type_of(&self, name: &str) -> Option<Type> {
        self.scopes.get(name).and_then(|entry| entry.ty)
    }

    /// Finish checking, returning the sink and the top-level symbol table
    pub fn finish(self) -> (S, SymbolTable) {
        (self.sink, self.scopes.into_global())
    }

    pub(crate) fn report(&mut self, line: usize, kind: DiagnosticKind) {
        debug!(line, %kind, "diagnostic");
        self.reported += 1;
        self.sink.report(Diagnostic::new(line, kind));
    }

    fn check_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.check_statement(statement);
        }
    }

    /// Check `block` in a nested scope whose bindings flow back out
    fn check_scoped_block(&mut self, block: &Block) {
        self.scopes.push();
        self.check_block(block);
        self.scopes.pop();
    }

    fn check_loop_body(&mut self, body: &Block) {
        self.loop_depth += 1;
        self.check_scoped_block(body);
        self.loop_depth -= 1;
    }

    pub(crate) fn check_statement(&mut self, node: &AstNode) {
        match node {
            AstNode::Assignment {
                target,
                op,
                value,
                location,
            } => self.check_assignment(target, *op, value, location.line),

            AstNode::Instruction {
                kind,
                values,
                location,
            } => self.check_instruction(*kind, values, location.line),

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(condition);
                self.check_scoped_block(then_branch);
                match else_branch {
                    Some(ElseBranch::ElseIf(nested)) => self.check_statement(nested),
                    Some(ElseBranch::Block(block)) => self.check_scoped_block(block),
                    None => {}
                }
            }

            AstNode::While {
                condition, body, ..
            } => {
                self.check_condition(condition);
                self.check_loop_body(body);
            }

            AstNode::For {
                variable,
                range,
                body,
                ..
            } => {
                let counter = self.check_range(range).unwrap_or(Type::Int);
                self.scopes
                    .put(SymbolEntry::new(variable.name.clone(), Some(counter)));
                self.check_loop_body(body);
            }

            AstNode::ExpressionStatement { expr, .. } => {
                self.check_expression(expr);
            }

            // A bare expression where a statement is expected
            _ => {
                self.check_expression(node);
            }
        }
    }

    fn check_condition(&mut self, condition: &AstNode) {
        if self.check_expression(condition) != Some(Type::Boolean) {
            self.report(condition.line(), DiagnosticKind::NonBooleanCondition);
        }
    }

    /// Both bounds must be `int`; the range itself is `int`
    fn check_range(&mut self, range: &RangeExpr) -> Option<Type> {
        let start = self.check_expression(&range.start);
        let end = self.check_expression(&range.end);

        if start == Some(Type::Int) && end == Some(Type::Int) {
            Some(Type::Int)
        } else {
            self.report(range.location.line, DiagnosticKind::InvalidRange);
            None
        }
    }

    fn check_assignment(&mut self, target: &Identifier, op: AssignOp, value: &AstNode, line: usize) {
        let value_ty = self.check_expression(value);

        if target.is_indexed() {
            self.check_element_assignment(target, value_ty, line);
            return;
        }

        let Some(bin_op) = op.arithmetic() else {
            self.scopes
                .put(SymbolEntry::new(target.name.clone(), value_ty));
            return;
        };

        let Some(entry) = self.scopes.get(&target.name) else {
            self.report(
                line,
                DiagnosticKind::UndeclaredTarget {
                    name: target.name.clone(),
                },
            );
            return;
        };

        let (Some(old), Some(new)) = (entry.ty, value_ty) else {
            self.report(line, DiagnosticKind::UnknownAssignedValue);
            return;
        };

        match combine(bin_op, old, new) {
            Ok(ty) => self
                .scopes
                .put(SymbolEntry::new(target.name.clone(), Some(ty))),
            Err(kind) => self.report(line, kind),
        }
    }

    /// `m[i, j] op= value`: the target must exist and keeps its type
    fn check_element_assignment(&mut self, target: &Identifier, value_ty: Option<Type>, line: usize) {
        self.check_identifier(target);

        if value_ty.is_none() {
            self.report(line, DiagnosticKind::UnknownAssignedValue);
        }
    }

    fn check_instruction(&mut self, kind: InstructionKind, values: &[AstNode], line: usize) {
        if kind.requires_loop() && self.loop_depth == 0 {
            self.report(
                line,
                DiagnosticKind::OutsideLoop {
                    instruction: kind.name(),
                },
            );
        }

        for value in values {
            if self.check_expression(value).is_none() {
                self.report(
                    line,
                    DiagnosticKind::UnknownPayload {
                        instruction: kind.name(),
                    },
                );
                break;
            }
        }
    }
}
