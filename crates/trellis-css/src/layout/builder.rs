//! Box tree construction.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The display property, determines the type of box or boxes that are
//! generated for an element."
//!
//! The builder walks the node tree once, beside the computed-style map, and
//! produces boxes with zeroed metrics. After it runs every block container
//! holds either only block-level or only inline-level children.

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_common::Diagnostics;
use trellis_dom::{LayoutNode, NodeId, NodeKind};

use crate::style::ComputedStyle;

use super::inline::WhiteSpace;
use super::layout_box::{BoxSource, BoxType, LayoutBox};
use super::stacking::ZIndex;
use super::{DisplayValue, default_display_for_element};

/// Build the box tree for `root`.
///
/// A document node becomes an anonymous block holding its element
/// children; an element becomes its principal box. Returns `None` when the
/// root generates no box (`display: none`, or a text or comment node).
///
/// Elements missing from `styles` take their parent's inherited style.
pub fn build_box_tree<N: LayoutNode>(
    root: N,
    styles: &BTreeMap<NodeId, Arc<ComputedStyle>>,
    diagnostics: &mut Diagnostics,
) -> Option<LayoutBox> {
    let mut builder = Builder { styles, diagnostics };
    match root.kind() {
        // [§ 9.1.1 The viewport](https://www.w3.org/TR/CSS2/visuren.html#viewport)
        //
        // The Document node serves as the initial containing block and
        // establishes the root of the layout tree.
        NodeKind::Document => {
            let style = Arc::new(ComputedStyle::initial());
            let mut document = LayoutBox::new(BoxType::Block, BoxSource::Anonymous, Arc::clone(&style));
            for child in root.children().into_iter().filter(LayoutNode::is_element) {
                document.children.extend(builder.build_element(child, &style, true));
            }
            Some(document)
        }
        NodeKind::Element => {
            let style = Arc::new(ComputedStyle::initial());
            let mut boxes = builder.build_element(root, &style, true);
            match boxes.len() {
                0 => None,
                1 => boxes.pop(),
                // `display: contents` on the root promotes its children.
                _ => {
                    let mut wrapper = LayoutBox::new(BoxType::Block, BoxSource::Anonymous, style);
                    wrapper.children = boxes;
                    Some(wrapper)
                }
            }
        }
        NodeKind::Text | NodeKind::Other => None,
    }
}

struct Builder<'a> {
    styles: &'a BTreeMap<NodeId, Arc<ComputedStyle>>,
    diagnostics: &'a mut Diagnostics,
}

impl Builder<'_> {
    /// Boxes generated by one element: none, its principal box, or its
    /// children's boxes for `display: contents`.
    ///
    /// `blockify` is set for the root element and for flex and grid items.
    fn build_element<N: LayoutNode>(&mut self, node: N, parent_style: &Arc<ComputedStyle>, blockify: bool) -> Vec<LayoutBox> {
        let tag = node.tag_name().unwrap_or_default().to_ascii_lowercase();
        let style = self
            .styles
            .get(&node.id())
            .cloned()
            .unwrap_or_else(|| Arc::new(ComputedStyle::inherit_from(parent_style)));

        // [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
        //
        // Priority: the computed `display`, then the element's default.
        let display = match style.get("display") {
            Some(value) => DisplayValue::from_style(value, self.diagnostics),
            None => match default_display_for_element(&tag) {
                Some(display) => display,
                None => return Vec::new(),
            },
        };

        let box_type = match display.box_type() {
            // [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
            //
            // "The element and its descendants generate no boxes or text runs."
            None if display == DisplayValue::None => return Vec::new(),
            // [§ 2.5 display: contents](https://www.w3.org/TR/css-display-3/#valdef-display-contents)
            //
            // "The element itself does not generate any boxes, but its
            // children and pseudo-elements still generate boxes and text runs
            // as normal."
            None => return self.build_children(node, &style, blockify),
            Some(box_type) => box_type,
        };

        // [§ 2.7 Automatic Box Type Transformations](https://www.w3.org/TR/css-display-3/#transformations)
        //
        // "Some layout effects require blockification or inlinification of
        // the box type [...] The root element's display type is always
        // blockified. [...] children of flex and grid containers are
        // blockified."
        let (box_type, inline_level) = if blockify {
            let box_type = match box_type {
                BoxType::Inline | BoxType::InlineBlock => BoxType::Block,
                other => other,
            };
            (box_type, false)
        } else {
            (box_type, display.is_inline_level())
        };

        let mut layout_box = LayoutBox::new(
            box_type,
            BoxSource::Element {
                node: node.id(),
                tag,
            },
            Arc::clone(&style),
        );
        layout_box.inline_level = inline_level;
        layout_box.z_index = ZIndex::from_style(&style, self.diagnostics);

        let children_blockified = matches!(box_type, BoxType::FlexContainer | BoxType::GridContainer);
        let children = self.build_children(node, &style, children_blockified);
        layout_box.children = children;
        normalize_children(&mut layout_box);

        log::trace!(
            "built {} as {} with {} children",
            layout_box.describe(),
            layout_box.box_type,
            layout_box.children.len()
        );
        vec![layout_box]
    }

    fn build_children<N: LayoutNode>(&mut self, node: N, style: &Arc<ComputedStyle>, blockify: bool) -> Vec<LayoutBox> {
        let mut boxes = Vec::new();
        for child in node.children() {
            match child.kind() {
                NodeKind::Element => boxes.extend(self.build_element(child, style, blockify)),
                // [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
                //
                // "A text run is the most basic box generated."
                NodeKind::Text => {
                    let text = child.text().unwrap_or_default();
                    if text.is_empty() {
                        continue;
                    }
                    boxes.push(LayoutBox::new(
                        BoxType::Inline,
                        BoxSource::Text {
                            node: child.id(),
                            text: text.to_string(),
                        },
                        Arc::new(ComputedStyle::inherit_from(style)),
                    ));
                }
                NodeKind::Document | NodeKind::Other => {}
            }
        }
        boxes
    }
}

/// True for a text box holding only white space that its style collapses.
fn is_collapsible_whitespace(layout_box: &LayoutBox) -> bool {
    layout_box
        .text()
        .is_some_and(|text| text.trim().is_empty() && WhiteSpace::from_style(&layout_box.style).collapses_spaces())
}

/// Make the children of `parent` homogeneous.
fn normalize_children(parent: &mut LayoutBox) {
    match parent.box_type {
        // [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)
        //
        // "Each in-flow child of a flex container becomes a flex item, and
        // each contiguous sequence of child text runs is wrapped in an
        // anonymous block container flex item. However, if the entire
        // sequence of child text runs contains only white space [...] it is
        // instead not rendered."
        BoxType::FlexContainer | BoxType::GridContainer => wrap_inline_runs(parent),

        // [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
        //
        // "When an inline box contains an in-flow block-level box, the inline
        // box (and its inline ancestors within the same line box) are broken
        // around the block-level box."
        //
        // The inline box is turned into a block container instead of being
        // split.
        BoxType::Inline if parent.children.iter().any(|c| !c.inline_level) => {
            parent.box_type = BoxType::Block;
            parent.inline_level = false;
            wrap_inline_runs(parent);
        }
        BoxType::Inline => {}

        BoxType::Block | BoxType::InlineBlock => {
            let has_block = parent.children.iter().any(|c| !c.inline_level);
            if has_block {
                wrap_inline_runs(parent);
            } else if parent.children.iter().all(is_collapsible_whitespace) {
                parent.children.clear();
            }
        }
    }
}

/// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "When an inline box contains an in-flow block-level box [...] The line
/// boxes before the break and after the break are enclosed in anonymous
/// block boxes, and the block-level box becomes a sibling of those anonymous
/// boxes."
///
/// Runs made only of collapsible white space are dropped.
fn wrap_inline_runs(parent: &mut LayoutBox) {
    let mut new_children: Vec<LayoutBox> = Vec::new();
    let mut inline_run: Vec<LayoutBox> = Vec::new();

    for child in std::mem::take(&mut parent.children) {
        if child.inline_level {
            inline_run.push(child);
        } else {
            flush_run(&parent.style, &mut inline_run, &mut new_children);
            new_children.push(child);
        }
    }
    flush_run(&parent.style, &mut inline_run, &mut new_children);

    parent.children = new_children;
}

fn flush_run(parent_style: &ComputedStyle, inline_run: &mut Vec<LayoutBox>, out: &mut Vec<LayoutBox>) {
    if inline_run.is_empty() {
        return;
    }
    let run = std::mem::take(inline_run);
    if run.iter().all(is_collapsible_whitespace) {
        return;
    }
    let mut wrapper = LayoutBox::new(
        BoxType::Block,
        BoxSource::Anonymous,
        Arc::new(ComputedStyle::inherit_from(parent_style)),
    );
    wrapper.children = run;
    out.push(wrapper);
}

#[cfg(test)]
mod tests {
    use trellis_common::DiagnosticKind;
    use trellis_dom::{DomTree, ElementData};

    use super::*;

    /// Styles where only `display` (and `white-space`) come from the given
    /// per-node declarations.
    fn styles_for(tree: &DomTree, overrides: &[(NodeId, &str, &str)]) -> BTreeMap<NodeId, Arc<ComputedStyle>> {
        (0..tree.len())
            .map(NodeId)
            .filter(|id| tree.as_element(*id).is_some())
            .map(|id| {
                let mut style = ComputedStyle::initial();
                for (node, property, value) in overrides {
                    if *node == id {
                        style.set(property, value);
                    }
                }
                (id, Arc::new(style))
            })
            .collect()
    }

    fn build(tree: &DomTree, overrides: &[(NodeId, &str, &str)]) -> (Option<LayoutBox>, Diagnostics) {
        let styles = styles_for(tree, overrides);
        let mut diagnostics = Diagnostics::new();
        let root = build_box_tree(tree.document(), &styles, &mut diagnostics);
        (root, diagnostics)
    }

    fn shape(layout_box: &LayoutBox) -> String {
        let name = match &layout_box.source {
            BoxSource::Element { tag, .. } => tag.clone(),
            BoxSource::Text { text, .. } => format!("{:?}", text.trim()),
            BoxSource::Anonymous => "anon".to_string(),
        };
        if layout_box.children.is_empty() {
            name
        } else {
            let children: Vec<String> = layout_box.children.iter().map(shape).collect();
            format!("{name}({})", children.join(" "))
        }
    }

    #[test]
    fn test_document_root_and_default_display() {
        let mut tree = DomTree::new();
        let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
        let head = tree.append_element(html, ElementData::new("head"));
        let _ = tree.append_element(head, ElementData::new("title"));
        let body = tree.append_element(html, ElementData::new("body"));
        let p = tree.append_element(body, ElementData::new("p"));
        let _ = tree.append_text(p, "Hello");

        let (root, diagnostics) = build(&tree, &[]);
        let root = root.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(shape(&root), r#"anon(html(body(p("Hello"))))"#);
        assert_eq!(root.children[0].box_type, BoxType::Block);
    }

    #[test]
    fn test_display_none_prunes_subtree() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let hidden = tree.append_element(div, ElementData::new("section"));
        let _ = tree.append_element(hidden, ElementData::new("p"));
        let _ = tree.append_element(div, ElementData::new("p"));

        let (root, _) = build(&tree, &[(hidden, "display", "none")]);
        let root = root.unwrap();
        assert_eq!(shape(&root), "anon(div(p))");
        assert_eq!(root.count(), 3);
    }

    #[test]
    fn test_root_display_none_gives_no_tree() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let styles = styles_for(&tree, &[(div, "display", "none")]);
        let mut diagnostics = Diagnostics::new();
        assert!(build_box_tree(tree.node(div), &styles, &mut diagnostics).is_none());
    }

    #[test]
    fn test_mixed_content_gets_anonymous_blocks() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let _ = tree.append_text(div, "Some text ");
        let _ = tree.append_element(div, ElementData::new("p"));
        let _ = tree.append_text(div, "\n  ");
        let _ = tree.append_element(div, ElementData::new("p"));
        let span = tree.append_element(div, ElementData::new("span"));
        let _ = tree.append_text(span, "more");

        let (root, _) = build(&tree, &[]);
        assert_eq!(shape(&root.unwrap()), r#"anon(div(anon("Some text") p p anon(span("more"))))"#);
    }

    #[test]
    fn test_whitespace_only_block_content_is_dropped() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let _ = tree.append_text(div, "   ");
        let pre = tree.append_element(NodeId::ROOT, ElementData::new("pre"));
        let _ = tree.append_text(pre, "   ");

        let (root, _) = build(&tree, &[(pre, "white-space", "pre")]);
        let root = root.unwrap();
        assert!(root.children[0].children.is_empty());
        assert_eq!(root.children[1].children.len(), 1);
    }

    #[test]
    fn test_flex_items_are_blockified() {
        let mut tree = DomTree::new();
        let flex = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let span = tree.append_element(flex, ElementData::new("span"));
        let _ = tree.append_text(flex, "loose text");
        let _ = tree.append_text(flex, "  ");
        let _ = tree.append_text(span, "item");

        let (root, _) = build(&tree, &[(flex, "display", "flex")]);
        let root = root.unwrap();
        let container = &root.children[0];
        assert_eq!(container.box_type, BoxType::FlexContainer);
        assert_eq!(container.children[0].box_type, BoxType::Block);
        assert!(!container.children[0].inline_level);
        assert_eq!(shape(container), r#"div(span("item") anon("loose text" ""))"#);
    }

    #[test]
    fn test_display_contents_promotes_children() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let wrapper = tree.append_element(div, ElementData::new("section"));
        let _ = tree.append_element(wrapper, ElementData::new("p"));
        let _ = tree.append_element(wrapper, ElementData::new("p"));

        let (root, _) = build(&tree, &[(wrapper, "display", "contents")]);
        assert_eq!(shape(&root.unwrap()), "anon(div(p p))");
    }

    #[test]
    fn test_inline_containing_block_becomes_block() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let span = tree.append_element(div, ElementData::new("span"));
        let _ = tree.append_text(span, "before");
        let _ = tree.append_element(span, ElementData::new("p"));

        let (root, _) = build(&tree, &[]);
        let root = root.unwrap();
        let span_box = &root.children[0].children[0];
        assert_eq!(span_box.box_type, BoxType::Block);
        assert!(!span_box.inline_level);
        assert_eq!(shape(span_box), r#"span(anon("before") p)"#);
    }

    #[test]
    fn test_unknown_display_is_block_with_diagnostic() {
        let mut tree = DomTree::new();
        let span = tree.append_element(NodeId::ROOT, ElementData::new("span"));
        let inner = tree.append_element(span, ElementData::new("em"));

        let (root, diagnostics) = build(&tree, &[(inner, "display", "sideways")]);
        let root = root.unwrap();
        assert_eq!(root.children[0].children[0].box_type, BoxType::Block);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnknownDisplay).count(), 1);
    }

    #[test]
    fn test_inline_flex_stays_inline_level() {
        let mut tree = DomTree::new();
        let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
        let chip = tree.append_element(div, ElementData::new("span"));
        let _ = tree.append_text(div, "label");

        let (root, _) = build(&tree, &[(chip, "display", "inline-flex"), (chip, "z-index", "3")]);
        let root = root.unwrap();
        let chip_box = &root.children[0].children[0];
        assert_eq!(chip_box.box_type, BoxType::FlexContainer);
        assert!(chip_box.inline_level);
        assert_eq!(chip_box.z_index, ZIndex::Integer(3));
        assert!(root.children[0].establishes_inline_context());
    }
}
