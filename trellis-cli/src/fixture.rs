//! JSON fixtures: a document, its style rules and a viewport.
//!
//! ```json
//! {
//!   "viewport": { "width": 400, "height": 300 },
//!   "rules": [{ "selector": ".a", "declarations": "color: red" }],
//!   "document": [
//!     { "tag": "div", "attributes": { "class": "a" }, "children": [{ "text": "Hi" }] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use trellis_css::{Origin, Size, StyleRuleStore};
use trellis_dom::{DomTree, ElementData, NodeId};

/// A parsed fixture file.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Viewport to lay out against, unless overridden on the command line.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    /// Style rules in source order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// Top-level nodes, appended under the document node.
    pub document: Vec<NodeSpec>,
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl From<Viewport> for Size {
    fn from(viewport: Viewport) -> Self {
        Size::new(viewport.width, viewport.height)
    }
}

/// One rule: selector list text plus a declaration block.
#[derive(Debug, Deserialize)]
pub struct RuleSpec {
    pub selector: String,
    pub declarations: String,
    /// `author` (default) or `inline`.
    #[serde(default)]
    pub origin: Option<String>,
}

/// A node of the fixture document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// Character data.
    Text { text: String },
    /// An element and its subtree.
    Element {
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl Fixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("fixture is not valid JSON of the expected shape")
    }

    /// Build the document tree.
    #[must_use]
    pub fn build_tree(&self) -> DomTree {
        let mut tree = DomTree::new();
        for node in &self.document {
            append_node(&mut tree, NodeId::ROOT, node);
        }
        tree
    }

    /// Build the author rule store. Default rules are added by the layout
    /// pass itself.
    pub fn build_store(&self) -> Result<StyleRuleStore> {
        let mut store = StyleRuleStore::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let origin = match rule.origin.as_deref() {
                None => Origin::Author,
                Some(name) => name
                    .parse::<Origin>()
                    .with_context(|| format!("rule {index} has unknown origin '{name}'"))?,
            };
            if origin == Origin::Default {
                anyhow::bail!("rule {index}: default-origin rules come from the built-in stylesheet");
            }
            if store.add(&rule.selector, &rule.declarations, origin) == 0 {
                log::warn!("rule {index} ('{}') matched no supported selector", rule.selector);
            }
        }
        Ok(store)
    }
}

fn append_node(tree: &mut DomTree, parent: NodeId, node: &NodeSpec) {
    match node {
        NodeSpec::Text { text } => {
            let _ = tree.append_text(parent, text);
        }
        NodeSpec::Element {
            tag,
            attributes,
            children,
        } => {
            let data = attributes
                .iter()
                .fold(ElementData::new(tag), |data, (name, value)| data.with_attr(name, value));
            let id = tree.append_element(parent, data);
            for child in children {
                append_node(tree, id, child);
            }
        }
    }
}
