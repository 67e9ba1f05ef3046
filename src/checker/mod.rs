//! Static type checker
//!
//! This module validates a parsed [`Program`](crate::parser::ast::Program):
//! - [`types`]: value types, matrix shapes and operand combination
//! - [`symbols`]: symbol table and scope stack
//! - [`diagnostics`]: reported issues and the sink that receives them
//! - [`check`] / [`expressions`]: the [`TypeChecker`] tree walk
//!
//! # Failure Model
//!
//! Checking never aborts. Each violation is reported where it is found and the
//! walk continues with an unknown type in place of the failed one.

pub mod check;
pub mod diagnostics;
pub mod expressions;
pub mod symbols;
pub mod types;

pub use check::TypeChecker;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use symbols::{ScopeStack, SymbolEntry, SymbolTable};
pub use types::{Dim, Shape, Type};
