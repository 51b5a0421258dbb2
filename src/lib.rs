//! # Introduction
//!
//! `sooc` is the front-end of a compiler for Soo, a small statically-typed
//! object language with single inheritance. It parses source into a tree and
//! folds constant sub-expressions; semantic analysis and code generation are
//! separate stages that consume the folded tree.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → ConstantFolder → folded AST → (semantic analysis)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST, or returns a
//!    [`parser::SyntaxError`].
//! 2. [`optimize`]: the constant-folding pass, producing a new tree.
//! 3. [`annotations`]: write-once side-table where semantic analysis records
//!    resolved types, keyed by the node ids the parser assigns.
//! 4. [`cli`]: argument handling for the `sooc` binary.

pub mod annotations;
pub mod cli;
pub mod optimize;
pub mod parser;
