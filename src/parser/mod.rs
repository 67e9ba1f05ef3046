//! Matrix language parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, helpers and entry point (tokens → AST)
//! - [`statements`] / [`expressions`]: the grammar rules
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! - Values: integers, floats, strings, 2-D numeric matrices `[1, 2; 3, 4]`
//! - Builtins: `zeros`, `ones`, `eye`
//! - Statements: assignments (`=`, `+=`, `-=`, `*=`, `/=`), `print`, `return`,
//!   `break`, `continue`, `if`/`else`, `while`, `for i = a:b`
//! - Comments: `#` to end of line
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
