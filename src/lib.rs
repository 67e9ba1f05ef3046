//! # Introduction
//!
//! matcheck is the static front end of a small scripting language with
//! first-class matrices. It lexes and parses a program, then type checks it,
//! tracking matrix shapes through every expression. Nothing is executed.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → TypeChecker → Diagnostics
//!                                      ↓
//!                                SymbolTable
//! ```
//!
//! 1. [`parser`] tokenises the source and builds an AST. Bad characters are
//!    skipped and recorded; the first syntax error stops the pipeline.
//! 2. [`checker`] walks the AST once, inferring a [`checker::Type`] for every
//!    expression and reporting each violation as a [`checker::Diagnostic`].
//! 3. [`printer`] renders the AST as an indented text tree.
//! 4. [`ui`] is a ratatui viewer for all of the above; not part of the stable
//!    library API.
//!
//! ## Language
//!
//! ```text
//! a = [1, 2; 3, 4];       # matrix(2x2)
//! b = a';                 # transpose
//! c = a + b .* 2;         # element-wise scaling
//! for i = 1:10 {
//!     if (i == 5) break;
//!     print i, "step";
//! }
//! z = zeros(3, 3) + eye(3, 3);
//! ```
//!
//! ## Example
//!
//! ```
//! let analysis = matcheck::analyze("a = [1, 2, 3]; b = a .* 2;");
//! let checked = analysis.outcome.as_ref().expect("valid syntax");
//!
//! assert!(checked.diagnostics.is_empty());
//! assert_eq!(checked.symbols.type_of("b"), Some(matcheck::checker::Type::matrix(1, 3)));
//! ```

pub mod checker;
pub mod parser;
pub mod printer;
pub mod ui;

use checker::{Diagnostic, SymbolTable, TypeChecker};
use parser::ast::Program;
use parser::lexer::LexError;
use parser::parse::{ParseError, Parser};
use tracing::debug;

/// A program that parsed, with everything the checker found in it
#[derive(Debug, Clone)]
pub struct Checked {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
}

/// Result of running the whole pipeline over one source text
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Characters the lexer skipped, in source order
    pub lex_errors: Vec<LexError>,
    pub outcome: Result<Checked, ParseError>,
}

impl Analysis {
    /// No lexer errors, no syntax error and no diagnostics
    pub fn is_clean(&self) -> bool {
        self.lex_errors.is_empty()
            && self
                .outcome
                .as_ref()
                .is_ok_and(|checked| checked.diagnostics.is_empty())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match &self.outcome {
            Ok(checked) => &checked.diagnostics,
            Err(_) => &[],
        }
    }
}

/// Type check an already parsed program
pub fn check(program: &Program) -> (Vec<Diagnostic>, SymbolTable) {
    let mut checker = TypeChecker::new();
    checker.check_program(program);
    checker.finish()
}

/// Lex, parse and type check `source`
///
/// The checker only runs when parsing succeeds.
pub fn analyze(source: &str) -> Analysis {
    let mut parser = Parser::new(source);
    let parsed = parser.parse_program();
    let lex_errors = parser.take_lex_errors();

    let outcome = parsed.map(|program| {
        let (diagnostics, symbols) = check(&program);
        Checked {
            program,
            diagnostics,
            symbols,
        }
    });

    debug!(
        lex_errors = lex_errors.len(),
        parsed = outcome.is_ok(),
        diagnostics = outcome.as_ref().map_or(0, |c| c.diagnostics.len()),
        "analysis complete"
    );

    Analysis {
        lex_errors,
        outcome,
    }
}
