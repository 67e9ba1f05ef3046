//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility for maintainability.
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and problem markers
//! - [`tree`]: Syntax tree dump of the parsed program
//! - [`diagnostics`]: Lexer, syntax and type problems, one per row
//! - [`symbols`]: Variables and their inferred types
//! - [`status`]: Status bar with keybindings and the overall verdict
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*_pane()` function that takes the
//! frame, its area, the data to show, whether it is focused, and its scroll state.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod symbols;
pub mod tree;

// Re-export render functions for convenience
pub use diagnostics::{render_diagnostics_pane, Problem, ProblemKind};
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, Verdict};
pub use symbols::render_symbols_pane;
pub use tree::render_tree_pane;
