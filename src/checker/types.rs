//! Static types and the operand combination rules
//!
//! - [`Type`]: the five value types of the language
//! - [`Shape`]: rows × columns of a matrix type, each a [`Dim`]
//! - [`combine`]: result type of a binary operator, shared by binary
//!   expressions and compound assignments
//!
//! # Combination Rules
//!
//! | Left      | Right     | `+ - * /`                 | `.+ .- .* ./`  |
//! |-----------|-----------|---------------------------|----------------|
//! | int       | int       | int                       | error          |
//! | numeric   | float     | float                     | error          |
//! | matrix    | matrix    | broadcast shape or error  | error          |
//! | matrix    | numeric   | error                     | the matrix     |
//! | numeric   | matrix    | error                     | the matrix     |
//!
//! A `1×c` shape broadcasts against any `r×c` shape, in either position.
//! An unknown extent (`?`) matches any extent.

use super::diagnostics::DiagnosticKind;
use crate::parser::ast::BinOp;
use std::fmt;

/// One extent of a matrix type
///
/// Builtins sized by an `int` variable produce `Unknown` extents, which are
/// compatible with any other extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Known(usize),
    Unknown,
}

impl Dim {
    /// The more precise of two compatible extents
    fn unify(self, other: Dim) -> Option<Dim> {
        match (self, other) {
            (Dim::Known(a), Dim::Known(b)) if a != b => None,
            (Dim::Unknown, d) | (d, _) => Some(d),
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Known(n) => write!(f, "{}", n),
            Dim::Unknown => write!(f, "?"),
        }
    }
}

/// Dimensions of a matrix type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: Dim,
    pub cols: Dim,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Shape {
            rows: Dim::Known(rows),
            cols: Dim::Known(cols),
        }
    }

    pub fn transpose(self) -> Self {
        Shape {
            rows: self.cols,
            cols: self.rows,
        }
    }

    pub fn is_row_vector(self) -> bool {
        self.rows == Dim::Known(1)
    }

    /// Shape produced by adding/multiplying two matrices, if compatible
    pub fn broadcast(self, other: Shape) -> Option<Shape> {
        let cols = self.cols.unify(other.cols)?;
        if let Some(rows) = self.rows.unify(other.rows) {
            Some(Shape { rows, cols })
        } else if self.is_row_vector() {
            Some(Shape { rows: other.rows, cols })
        } else if other.is_row_vector() {
            Some(Shape { rows: self.rows, cols })
        } else {
            None
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Static type of an expression or variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Str,
    Boolean,
    Matrix(Shape),
}

impl Type {
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Type::Matrix(Shape::new(rows, cols))
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, Type::Matrix(_))
    }

    pub fn shape(self) -> Option<Shape> {
        match self {
            Type::Matrix(shape) => Some(shape),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Str => write!(f, "string"),
            Type::Boolean => write!(f, "boolean"),
            Type::Matrix(shape) => write!(f, "matrix({})", shape),
        }
    }
}

/// Result type of `left op right` for two known operand types
pub fn combine(op: BinOp, left: Type, right: Type) -> Result<Type, DiagnosticKind> {
    if op.is_elementwise() {
        return combine_elementwise(left, right);
    }

    match (left, right) {
        (Type::Int, Type::Int) => Ok(Type::Int),
        (l, r) if l.is_numeric() && r.is_numeric() => Ok(Type::Float),
        (Type::Matrix(l), Type::Matrix(r)) => l
            .broadcast(r)
            .map(Type::Matrix)
            .ok_or(DiagnosticKind::DimensionMismatch { left: l, right: r }),
        (l, r) if (l.is_matrix() && r.is_numeric()) || (l.is_numeric() && r.is_matrix()) => {
            Err(DiagnosticKind::ScalarMatrixMix)
        }
        (left, right) => Err(DiagnosticKind::InvalidOperation {
            op: op.symbol(),
            left,
            right,
        }),
    }
}

/// A matrix scaled by a number, in either order
fn combine_elementwise(left: Type, right: Type) -> Result<Type, DiagnosticKind> {
    match (left, right) {
        (Type::Matrix(_), Type::Matrix(_)) => Err(DiagnosticKind::ElementwiseNonScalar),
        (m @ Type::Matrix(_), s) | (s, m @ Type::Matrix(_)) => {
            if s.is_numeric() {
                Ok(m)
            } else {
                Err(DiagnosticKind::ElementwiseNonScalar)
            }
        }
        _ => Err(DiagnosticKind::ElementwiseWithoutMatrix),
    }
}
