//! Side-table for semantic annotations
//!
//! The parsed and folded trees are immutable. Information the semantic pass
//! computes for identifiers, calls and assignments is stored here instead,
//! keyed by the [`NodeId`] the parser gave the node. Every slot is write-once.

use crate::parser::ast::{NodeId, Type};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Resolved information for an `Id` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAnnotation {
    pub ty: Type,
    pub is_field: bool,
}

/// Resolved information for a `Call` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAnnotation {
    /// Static class of the receiver
    pub receiver_class: String,
    /// Declared parameter types of the resolved method
    pub param_types: Vec<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Id,
    Call,
    Assign,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("{kind:?} node {node} is already annotated")]
    AlreadyAnnotated { kind: SlotKind, node: NodeId },
}

/// Write-once annotation storage
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    ids: FxHashMap<NodeId, IdAnnotation>,
    calls: FxHashMap<NodeId, CallAnnotation>,
    assigns: FxHashMap<NodeId, Type>,
}

/// Insert `value` under `node` unless the slot is already filled
fn write_once<V>(
    map: &mut FxHashMap<NodeId, V>,
    kind: SlotKind,
    node: NodeId,
    value: V,
) -> Result<(), AnnotationError> {
    if map.contains_key(&node) {
        return Err(AnnotationError::AlreadyAnnotated { kind, node });
    }
    map.insert(node, value);
    Ok(())
}

impl Annotations {
    pub fn new() -> Self {
        Annotations::default()
    }

    pub fn annotate_id(
        &mut self,
        node: NodeId,
        annotation: IdAnnotation,
    ) -> Result<(), AnnotationError> {
        write_once(&mut self.ids, SlotKind::Id, node, annotation)
    }

    pub fn annotate_call(
        &mut self,
        node: NodeId,
        annotation: CallAnnotation,
    ) -> Result<(), AnnotationError> {
        write_once(&mut self.calls, SlotKind::Call, node, annotation)
    }

    /// Record the type of an assignment's target variable
    pub fn annotate_assign(&mut self, node: NodeId, ty: Type) -> Result<(), AnnotationError> {
        write_once(&mut self.assigns, SlotKind::Assign, node, ty)
    }

    pub fn id(&self, node: NodeId) -> Option<&IdAnnotation> {
        self.ids.get(&node)
    }

    pub fn call(&self, node: NodeId) -> Option<&CallAnnotation> {
        self.calls.get(&node)
    }

    pub fn assign(&self, node: NodeId) -> Option<&Type> {
        self.assigns.get(&node)
    }

    /// Total number of filled slots
    pub fn len(&self) -> usize {
        self.ids.len() + self.calls.len() + self.assigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
