//! Arena-backed document tree.

use std::collections::HashMap;

use crate::{LayoutNode, NodeId, NodeKind};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// One arena slot.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node holds.
    pub node_type: NodeType,
    /// Parent, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document root.
    Document,
    /// An element.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// A comment. Never rendered.
    Comment(String),
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase local name.
    pub tag_name: String,
    /// Attribute list.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Element with the given tag and no attributes.
    pub fn new(tag_name: &str) -> Self {
        ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let _ = self
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

/// Arena-based document tree with O(1) node access.
///
/// All nodes live in one vector and refer to each other by [`NodeId`]. The
/// document node is always at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, the document included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the document node always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Unknown ids are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeType::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text content if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Handle implementing [`LayoutNode`] for `id`.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Handle for the document node.
    pub fn document(&self) -> NodeRef<'_> {
        self.node(NodeId::ROOT)
    }

    /// The first element child of the document, usually `<html>`.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed handle to one node of a [`DomTree`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl LayoutNode for NodeRef<'_> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        match self.tree.get(self.id).map(|n| &n.node_type) {
            Some(NodeType::Document) => NodeKind::Document,
            Some(NodeType::Element(_)) => NodeKind::Element,
            Some(NodeType::Text(_)) => NodeKind::Text,
            Some(NodeType::Comment(_)) | None => NodeKind::Other,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        self.tree.as_element(self.id).map(|e| e.tag_name.as_str())
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.tree
            .as_element(self.id)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| self.tree.node(id))
            .collect()
    }

    fn text(&self) -> Option<&str> {
        self.tree.as_text(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_traverse() {
        let mut tree = DomTree::new();
        let div = tree.append_element(
            NodeId::ROOT,
            ElementData::new("DIV").with_attr("class", "a  b"),
        );
        let _ = tree.append_text(div, "hello");

        let node = tree.node(div);
        assert_eq!(node.tag_name(), Some("div"));
        assert!(node.has_class("a"));
        assert!(node.has_class("b"));
        assert!(!node.has_class("c"));
        let children = node.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), NodeKind::Text);
        assert_eq!(children[0].text(), Some("hello"));
        assert_eq!(tree.parent(children[0].id()), Some(div));
        assert_eq!(tree.document_element(), Some(div));
    }

    #[test]
    fn test_append_child_ignores_unknown_ids() {
        let mut tree = DomTree::new();
        tree.append_child(NodeId::ROOT, NodeId(42));
        assert!(tree.children(NodeId::ROOT).is_empty());
        assert_eq!(tree.document().kind(), NodeKind::Document);
        assert_eq!(tree.document().attribute("id"), None);
    }
}
