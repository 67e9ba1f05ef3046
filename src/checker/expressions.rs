//! Expression typing
//!
//! [`TypeChecker::check_expression`] returns the static type of an expression,
//! or `None` when it cannot be determined. A `None` operand is itself reported
//! by the enclosing node, so one bad variable can produce several diagnostics.

use super::check::TypeChecker;
use super::diagnostics::{DiagnosticKind, DiagnosticSink};
use super::types::{combine, Dim, Shape, Type};
use crate::parser::ast::*;

impl<S: DiagnosticSink> TypeChecker<S> {
    /// Type of `expr`, reporting every violation found inside it
    pub fn check_expression(&mut self, expr: &AstNode) -> Option<Type> {
        match expr {
            AstNode::IntLiteral(_, _) => Some(Type::Int),
            AstNode::FloatLiteral(_, _) => Some(Type::Float),
            AstNode::StringLiteral(_, _) => Some(Type::Str),

            AstNode::Variable(ident) => self.check_identifier(ident),

            AstNode::Matrix { rows, location } => self.check_matrix(rows, location.line),

            AstNode::MatrixBuiltin { args, location, .. } => {
                self.check_builtin(args, location.line)
            }

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left = self.check_expression(left);
                let right = self.check_expression(right);

                let (Some(left), Some(right)) = (left, right) else {
                    self.report(location.line, DiagnosticKind::UnknownOperand);
                    return None;
                };

                match combine(*op, left, right) {
                    Ok(ty) => Some(ty),
                    Err(kind) => {
                        self.report(location.line, kind);
                        None
                    }
                }
            }

            // Operands are checked for their own diagnostics only
            AstNode::Comparison { left, right, .. } => {
                self.check_expression(left);
                self.check_expression(right);
                Some(Type::Boolean)
            }

            AstNode::UnaryOp {
                op: UnOp::Transpose,
                operand,
                location,
            } => match self.check_expression(operand) {
                Some(Type::Matrix(shape)) => Some(Type::Matrix(shape.transpose())),
                _ => {
                    self.report(location.line, DiagnosticKind::TransposeNonMatrix);
                    None
                }
            },

            AstNode::UnaryOp {
                op: UnOp::Neg,
                operand,
                location,
            } => match self.check_expression(operand) {
                Some(ty) if ty.is_numeric() || ty.is_matrix() => Some(ty),
                _ => {
                    self.report(location.line, DiagnosticKind::InvalidNegation);
                    None
                }
            },

            AstNode::Assignment { .. }
            | AstNode::Instruction { .. }
            | AstNode::If { .. }
            | AstNode::While { .. }
            | AstNode::For { .. }
            | AstNode::ExpressionStatement { .. } => {
                self.check_statement(expr);
                None
            }
        }
    }

    /// Look up a (possibly indexed) variable; indices must be `int`
    pub(crate) fn check_identifier(&mut self, ident: &Identifier) -> Option<Type> {
        for index in &ident.indices {
            if let Some(ty) = self.check_expression(index) {
                if ty != Type::Int {
                    self.report(index.line(), DiagnosticKind::NonIntegerIndex);
                }
            }
        }

        match self.scopes.get(&ident.name) {
            Some(entry) => entry.ty,
            None => {
                self.report(
                    ident.location.line,
                    DiagnosticKind::UndefinedVariable {
                        name: ident.name.clone(),
                    },
                );
                None
            }
        }
    }

    /// Rows must agree in length and elements must be numeric.
    ///
    /// The shape is taken from the row count and the first row, even when
    /// diagnostics were reported.
    fn check_matrix(&mut self, rows: &[Vec<AstNode>], line: usize) -> Option<Type> {
        let cols = rows.first().map_or(0, Vec::len);

        if rows.iter().any(|row| row.len() != cols) {
            self.report(line, DiagnosticKind::RaggedMatrix);
        }

        for row in rows {
            let mut row_reported = false;
            for element in row {
                let numeric = self.check_expression(element).is_some_and(Type::is_numeric);
                if !numeric && !row_reported {
                    self.report(line, DiagnosticKind::MatrixElementType);
                    row_reported = true;
                }
            }
        }

        Some(Type::matrix(rows.len(), cols))
    }

    /// `zeros(n)` is `n×1`; `zeros(r, c, ...)` is `r×c`
    fn check_builtin(&mut self, args: &[AstNode], line: usize) -> Option<Type> {
        let mut all_int = true;
        for arg in args {
            if self.check_expression(arg) != Some(Type::Int) {
                all_int = false;
            }
        }

        if !all_int {
            self.report(line, DiagnosticKind::InvalidDimension);
            return None;
        }

        let mut dims = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                AstNode::IntLiteral(n, _) => match usize::try_from(*n) {
                    Ok(n) => dims.push(Dim::Known(n)),
                    Err(_) => {
                        self.report(line, DiagnosticKind::InvalidDimension);
                        return None;
                    }
                },
                // Any other int expression, sized at run time
                _ => dims.push(Dim::Unknown),
            }
        }

        match dims.as_slice() {
            [] => None,
            [n] => Some(Type::Matrix(Shape {
                rows: *n,
                cols: Dim::Known(1),
            })),
            [rows, cols, ..] => Some(Type::Matrix(Shape {
                rows: *rows,
                cols: *cols,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::check::TypeChecker;
    use crate::checker::diagnostics::Diagnostic;
    use crate::checker::symbols::SymbolTable;
    use crate::checker::types::{Dim, Shape, Type};
    use crate::parser::parse::Parser;

    fn check(source: &str) -> (Vec<String>, SymbolTable) {
        let program = Parser::new(source).parse_program().unwrap();
        let mut checker = TypeChecker::new();
        checker.check_program(&program);
        let (diagnostics, symbols) = checker.finish();
        (
            diagnostics.iter().map(Diagnostic::to_string).collect(),
            symbols,
        )
    }

    #[test]
    fn test_literal_types() {
        let (diags, symbols) = check("a = 1; b = 1.5; c = \"s\"; d = 1 < 2;");

        assert!(diags.is_empty());
        assert_eq!(symbols.type_of("a"), Some(Type::Int));
        assert_eq!(symbols.type_of("b"), Some(Type::Float));
        assert_eq!(symbols.type_of("c"), Some(Type::Str));
        assert_eq!(symbols.type_of("d"), Some(Type::Boolean));
    }

    #[test]
    fn test_unknown_variable() {
        let (diags, symbols) = check("a = b;");

        assert_eq!(diags, vec!["Line 1: Not existing variable: b"]);
        assert!(symbols.get("a").is_some());
    }

    #[test]
    fn test_matrix_literal_shape() {
        let (diags, symbols) = check("m = [1, 2.5, 3; 4, 5, 6];");

        assert!(diags.is_empty());
        assert_eq!(symbols.type_of("m"), Some(Type::matrix(2, 3)));
    }

    #[test]
    fn test_ragged_matrix_still_has_shape() {
        let (diags, symbols) = check("m = [1, 2; 3];");

        assert_eq!(diags, vec!["Line 1: Incompatible size for matrix"]);
        assert_eq!(symbols.type_of("m"), Some(Type::matrix(2, 2)));
    }

    #[test]
    fn test_matrix_element_types() {
        let (diags, _) = check("m = [1, \"x\", \"y\"; 2, 3, 4; [1], 5, 6];");

        assert_eq!(
            diags,
            vec!["Line 1: Wrong type in matrix", "Line 1: Wrong type in matrix"]
        );
    }

    #[test]
    fn test_builtin_shapes() {
        let (diags, symbols) = check("a = zeros(4); b = ones(2, 3); c = eye(10, 12);");

        assert!(diags.is_empty());
        assert_eq!(symbols.type_of("a"), Some(Type::matrix(4, 1)));
        assert_eq!(symbols.type_of("b"), Some(Type::matrix(2, 3)));
        assert_eq!(symbols.type_of("c"), Some(Type::matrix(10, 12)));
    }

    #[test]
    fn test_builtin_dimension_errors() {
        let (diags, symbols) = check("a = zeros(2.0); b = ones(\"2\", 2);");

        assert_eq!(
            diags,
            vec![
                "Line 1: Invalid dimension values",
                "Line 1: Invalid dimension values",
            ]
        );
        assert_eq!(symbols.type_of("a"), None);
        assert_eq!(symbols.type_of("b"), None);
    }

    #[test]
    fn test_builtin_sized_by_variable() {
        let source = "n = 3;\nb = ones(n);\nc = b';\nd = zeros(2, n) + ones(1, 4);";
        let (diags, symbols) = check(source);

        assert!(diags.is_empty(), "{:?}", diags);
        let column = Shape {
            rows: Dim::Unknown,
            cols: Dim::Known(1),
        };
        assert_eq!(symbols.type_of("b"), Some(Type::Matrix(column)));
        assert_eq!(symbols.type_of("c"), Some(Type::Matrix(column.transpose())));
        assert_eq!(symbols.type_of("d"), Some(Type::matrix(2, 4)));
    }

    #[test]
    fn test_transpose_swaps_shape() {
        let (diags, symbols) = check("a = ones(2, 5); b = a'; c = a'';");

        assert!(diags.is_empty());
        assert_eq!(symbols.type_of("b"), Some(Type::matrix(5, 2)));
        assert_eq!(symbols.type_of("c"), Some(Type::matrix(2, 5)));
    }

    #[test]
    fn test_transpose_of_scalar() {
        let (diags, _) = check("a = 3'; ");

        assert_eq!(diags, vec!["Line 1: Transpose operation with a non-matrix"]);
    }

    #[test]
    fn test_negation() {
        let (diags, symbols) = check("a = -2.0; b = -[1, 2]; c = -\"s\";");

        assert_eq!(diags, vec!["Line 1: Invalid arguments for negation"]);
        assert_eq!(symbols.type_of("a"), Some(Type::Float));
        assert_eq!(symbols.type_of("b"), Some(Type::matrix(1, 2)));
    }

    #[test]
    fn test_mismatch_cascades_into_parent() {
        let (diags, symbols) = check("a = zeros(2, 3);\nb = ones(3, 2);\nc = (a + b) * 2;");

        assert_eq!(
            diags,
            vec![
                "Line 3: Invalid dimensions for matrices (2x3) and (3x2)",
                "Line 3: Expression with an unknown variable",
            ]
        );
        assert_eq!(symbols.type_of("c"), None);
    }

    #[test]
    fn test_comparison_is_lenient() {
        // Mismatched operands still compare to boolean
        let (diags, symbols) = check("x = \"s\" == [1, 2];");

        assert!(diags.is_empty());
        assert_eq!(symbols.type_of("x"), Some(Type::Boolean));
    }

    #[test]
    fn test_comparison_operands_still_report() {
        let (diags, _) = check("if (missing > 1) print 1;");

        assert_eq!(diags, vec!["Line 1: Not existing variable: missing"]);
    }

    #[test]
    fn test_indexed_reference() {
        let (diags, symbols) = check("m = ones(3, 3); x = m[1, 2]; y = m[1.5, 0];");

        assert_eq!(diags, vec!["Line 1: Index must be an integer"]);
        assert_eq!(symbols.type_of("x"), Some(Type::matrix(3, 3)));
    }

    #[test]
    fn test_elementwise_without_matrix() {
        let (diags, _) = check("a = 1 .+ 2;");

        assert_eq!(diags, vec!["Line 1: Element-wise operation without a matrix"]);
    }

    #[test]
    fn test_scalar_matrix_arithmetic_is_rejected() {
        let (diags, _) = check("a = [1, 2] * 2;");

        assert_eq!(diags, vec!["Line 1: Binary operations with numerical value and matrix"]);
    }
}
