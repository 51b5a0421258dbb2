//! Soo source code parser
//!
//! This module transforms Soo source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`] and its [`SyntaxError`]
//! - [`ast`]: AST node definitions
//! - [`printer`]: Rendering trees back to source
//!
//! # Language
//!
//! - Types: `int`, `boolean`, class names
//! - A main class holding one statement, plus classes with single inheritance,
//!   fields and methods (one trailing `return` each)
//! - Statements: blocks, `if`/`else`, `while`, `System.out.println`, assignment
//! - Expressions: `&&`, `<`, `+`, `-`, `*`, `!`, method calls, `new C()`, `this`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser; operator precedence comes from the
//! nesting of the expression-level methods. No external parser generator
//! dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod printer;

mod declarations;
mod expressions;
mod statements;

pub use parse::{Parser, SyntaxError};
