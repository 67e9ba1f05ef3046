//! Semantic diagnostics
//!
//! Every rule violation found by the [`TypeChecker`](super::TypeChecker) becomes a
//! [`Diagnostic`]: a source line plus a [`DiagnosticKind`]. Diagnostics are never
//! fatal; they are handed to a [`DiagnosticSink`] and checking continues.
//!
//! All diagnostics share one severity. Cascades (an absent type causing further
//! reports in enclosing expressions) are kept, not deduplicated.

use super::types::{Shape, Type};
use thiserror::Error;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("Not existing variable: {name}")]
    UndefinedVariable { name: String },

    /// Compound assignment to a name that was never bound
    #[error("Variable does not exist: {name}")]
    UndeclaredTarget { name: String },

    #[error("Assigning to an unknown variable")]
    UnknownAssignedValue,

    #[error("Incompatible size for matrix")]
    RaggedMatrix,

    #[error("Wrong type in matrix")]
    MatrixElementType,

    #[error("Invalid dimension values")]
    InvalidDimension,

    #[error("Transpose operation with a non-matrix")]
    TransposeNonMatrix,

    #[error("Invalid arguments for negation")]
    InvalidNegation,

    #[error("Expression with an unknown variable")]
    UnknownOperand,

    #[error("Element-wise operation without a matrix")]
    ElementwiseWithoutMatrix,

    #[error("Element-wise with not a int or float")]
    ElementwiseNonScalar,

    #[error("Invalid dimensions for matrices ({left}) and ({right})")]
    DimensionMismatch { left: Shape, right: Shape },

    #[error("Binary operations with numerical value and matrix")]
    ScalarMatrixMix,

    #[error("Invalid operation: {left} {op} {right}")]
    InvalidOperation {
        op: &'static str,
        left: Type,
        right: Type,
    },

    #[error("Invalid range arguments")]
    InvalidRange,

    #[error("Condition is not a boolean")]
    NonBooleanCondition,

    #[error("Instruction outside a loop: {instruction}")]
    OutsideLoop { instruction: &'static str },

    #[error("{instruction} operation with unknown variable")]
    UnknownPayload { instruction: &'static str },

    #[error("Index must be an integer")]
    NonIntegerIndex,
}

/// A reported semantic issue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {kind}")]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Diagnostic { line, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Receiver of diagnostics as they are found
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let diag = Diagnostic::new(
            3,
            DiagnosticKind::UndefinedVariable {
                name: "x".to_string(),
            },
        );

        assert_eq!(diag.to_string(), "Line 3: Not existing variable: x");
        assert_eq!(diag.message(), "Not existing variable: x");
    }

    #[test]
    fn test_diagnostic_is_an_error() {
        let diag = Diagnostic::new(7, DiagnosticKind::InvalidRange);
        let err: &dyn std::error::Error = &diag;

        assert_eq!(err.to_string(), "Line 7: Invalid range arguments");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_instruction_messages() {
        let outside = DiagnosticKind::OutsideLoop {
            instruction: "continue",
        };
        let payload = DiagnosticKind::UnknownPayload {
            instruction: "print",
        };

        assert_eq!(outside.to_string(), "Instruction outside a loop: continue");
        assert_eq!(payload.to_string(), "print operation with unknown variable");
    }

    #[test]
    fn test_sink_through_reference() {
        fn emit(mut sink: impl DiagnosticSink) {
            sink.report(Diagnostic::new(1, DiagnosticKind::InvalidRange));
        }

        let mut collected: Vec<Diagnostic> = Vec::new();
        emit(&mut collected);

        assert_eq!(collected.len(), 1);
    }
}
