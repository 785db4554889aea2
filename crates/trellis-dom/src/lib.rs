//! Document tree access for the trellis layout engine.
//!
//! Layout reads documents through one capability trait, [`LayoutNode`]:
//! tag name, attribute lookup, ordered children and text. Any host tree can
//! implement it. [`DomTree`] is the arena-backed tree this workspace ships
//! for tests and tooling.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.

mod node;
mod tree;

pub use node::{LayoutNode, NodeKind};
pub use tree::{AttributesMap, DomTree, ElementData, Node, NodeRef, NodeType};

use serde::Serialize;

/// A type-safe index identifying a node of the source document.
///
/// Layout boxes and computed-style maps refer back to their node through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node of a [`DomTree`] is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
