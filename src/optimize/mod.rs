//! Tree-rewriting optimizations over the parsed AST
//!
//! - [`fold`]: single-pass constant folding ([`ConstantFolder`])
//!
//! Passes never mutate their input. Each returns a new tree, carrying over the
//! [`NodeId`](crate::parser::ast::NodeId)s of annotated nodes so the semantic
//! pass can key its side-table against the optimized tree.

pub mod fold;

pub use fold::ConstantFolder;

use crate::parser::ast::Program;

/// Fold constants in `program` with a fresh [`ConstantFolder`]
pub fn fold_program(program: &Program) -> Program {
    ConstantFolder::new().fold_program(program)
}
