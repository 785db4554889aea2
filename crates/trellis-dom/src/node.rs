//! The node capability trait.

use crate::NodeId;

/// Coarse classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document itself. Layout treats it as an anonymous root.
    Document,
    /// An element with a tag name and attributes.
    Element,
    /// A run of character data.
    Text,
    /// Anything else (comments, processing instructions). Never rendered.
    Other,
}

/// Read-only view of a document node.
///
/// Implementations are cheap handles (an index plus a tree reference), so the
/// trait requires `Copy` and hands children back by value.
pub trait LayoutNode: Copy {
    /// Stable identifier of this node within its document.
    fn id(&self) -> NodeId;

    /// What kind of node this is.
    fn kind(&self) -> NodeKind;

    /// Lowercase local name for elements, `None` otherwise.
    fn tag_name(&self) -> Option<&str>;

    /// Attribute value by name. Always `None` for non-elements.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Children in document order.
    fn children(&self) -> Vec<Self>;

    /// Character data for text nodes, `None` otherwise.
    fn text(&self) -> Option<&str>;

    /// True for element nodes.
    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    /// The `id` attribute.
    fn element_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }
}
