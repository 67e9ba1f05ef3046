// AST (Abstract Syntax Tree) definitions for the matrix scripting language

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Arithmetic and elementwise binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    // Elementwise (matrix with scalar)
    DotAdd,
    DotSub,
    DotMul,
    DotDiv,
}

impl BinOp {
    pub fn is_elementwise(self) -> bool {
        matches!(self, BinOp::DotAdd | BinOp::DotSub | BinOp::DotMul | BinOp::DotDiv)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::DotAdd => ".+",
            BinOp::DotSub => ".-",
            BinOp::DotMul => ".*",
            BinOp::DotDiv => "./",
        }
    }
}

/// Relational and equality operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,       // -x
    Transpose, // x'
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    DivAssign, // /=
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }

    /// The arithmetic operator a compound assignment applies, `None` for `=`.
    pub fn arithmetic(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinOp::Add),
            AssignOp::SubAssign => Some(BinOp::Sub),
            AssignOp::MulAssign => Some(BinOp::Mul),
            AssignOp::DivAssign => Some(BinOp::Div),
        }
    }
}

/// Matrix construction builtins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Zeros,
    Ones,
    Eye,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Zeros => "zeros",
            Builtin::Ones => "ones",
            Builtin::Eye => "eye",
        }
    }
}

/// Simple (non-assignment, non-control-flow) instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Break,
    Continue,
    Return,
    Print,
}

impl InstructionKind {
    pub fn name(self) -> &'static str {
        match self {
            InstructionKind::Break => "break",
            InstructionKind::Continue => "continue",
            InstructionKind::Return => "return",
            InstructionKind::Print => "print",
        }
    }

    /// `break` and `continue` are only meaningful inside a loop body.
    pub fn requires_loop(self) -> bool {
        matches!(self, InstructionKind::Break | InstructionKind::Continue)
    }
}

/// A variable reference, optionally indexed: `a` or `a[i, j]`
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub indices: Vec<AstNode>,
    pub location: SourceLocation,
}

impl Identifier {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Identifier {
            name: name.into(),
            indices: Vec::new(),
            location,
        }
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

/// Ordered sequence of statements (brace-delimited or a single bare statement)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<AstNode>,
    pub location: SourceLocation,
}

/// Integer range `start:end` bound by a `for` loop
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub start: Box<AstNode>,
    pub end: Box<AstNode>,
    pub location: SourceLocation,
}

/// What follows the `else` keyword of a conditional
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    /// `else if (...) ...`, always an [`AstNode::If`]
    ElseIf(Box<AstNode>),
    Block(Block),
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Statements
    Assignment {
        target: Identifier,
        op: AssignOp,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    Instruction {
        kind: InstructionKind,
        values: Vec<AstNode>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Block,
        else_branch: Option<ElseBranch>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Block,
        location: SourceLocation,
    },
    For {
        variable: Identifier,
        range: RangeExpr,
        body: Block,
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    Variable(Identifier),
    Matrix {
        rows: Vec<Vec<AstNode>>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Comparison {
        op: CmpOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    MatrixBuiltin {
        builtin: Builtin,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::Assignment { location, .. } => location,
            AstNode::Instruction { location, .. } => location,
            AstNode::If { location, .. } => location,
            AstNode::While { location, .. } => location,
            AstNode::For { location, .. } => location,
            AstNode::ExpressionStatement { location, .. } => location,
            AstNode::IntLiteral(_, loc) => loc,
            AstNode::FloatLiteral(_, loc) => loc,
            AstNode::StringLiteral(_, loc) => loc,
            AstNode::Variable(ident) => &ident.location,
            AstNode::Matrix { location, .. } => location,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::Comparison { location, .. } => location,
            AstNode::UnaryOp { location, .. } => location,
            AstNode::MatrixBuiltin { location, .. } => location,
        }
    }

    /// Source line of the node's defining token
    pub fn line(&self) -> usize {
        self.location().line
    }
}

/// Whole compilation unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Block,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
