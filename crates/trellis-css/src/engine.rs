//! The layout pipeline.
//!
//! Style rules → cascade → box tree → box model and formatting contexts →
//! relative offsets → stacking order. One call is one pass; nothing
//! survives between passes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_common::Diagnostics;
use trellis_dom::{LayoutNode, NodeId};

use crate::cascade::{Cascade, compute_styles};
use crate::layout::positioned::apply_relative_offsets;
use crate::layout::{
    ContainingBlock, LayoutBox, LayoutContext, Point, Rect, Size, SizeOverride, SpacingTable, TextMeasure,
    build_box_tree, finalize_stacking_order,
};
use crate::store::StyleRuleStore;
use crate::style::ComputedStyle;

/// Settings for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Initial containing block.
    pub viewport: Size,
    /// Font size `rem` units resolve against.
    pub root_font_size: f32,
    /// Extra spacing between block siblings.
    pub spacing: SpacingTable,
    /// Prepend the default stylesheet when the store has no default rules
    /// of its own. When false, default rules in the store are ignored.
    pub include_default_rules: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            viewport: Size::new(800.0, 600.0),
            root_font_size: 16.0,
            spacing: SpacingTable::new(),
            include_default_rules: true,
        }
    }
}

impl LayoutOptions {
    /// Default options with the given viewport.
    #[must_use]
    pub fn with_viewport(width: f32, height: f32) -> Self {
        LayoutOptions {
            viewport: Size::new(width, height),
            ..Self::default()
        }
    }
}

/// Everything a pass produces.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// The box tree. `None` only when the root generates no box.
    pub root: Option<LayoutBox>,
    /// Computed style of every element.
    pub styles: BTreeMap<NodeId, Arc<ComputedStyle>>,
    /// Recoverable problems found on the way.
    pub diagnostics: Diagnostics,
}

impl LayoutResult {
    /// The principal box generated by `node`, if any.
    #[must_use]
    pub fn box_for(&self, node: NodeId) -> Option<&LayoutBox> {
        self.root.as_ref()?.find_by_node(node)
    }
}

/// Run a full layout pass over `root`.
///
/// `root` may be a document node or an element. Layout starts from an
/// initial containing block the size of the viewport, definite in both
/// axes. The pass never fails; problems end up in
/// [`LayoutResult::diagnostics`].
pub fn layout_document<N: LayoutNode>(
    root: N,
    store: &StyleRuleStore,
    measurer: &dyn TextMeasure,
    options: &LayoutOptions,
) -> LayoutResult {
    let mut diagnostics = Diagnostics::new();

    // STEP 1: Cascade.
    let store = effective_store(store, options.include_default_rules);
    let cascade = Cascade::new(&store).with_root_font_size(f64::from(options.root_font_size));
    let styles = compute_styles(root, &cascade, &mut diagnostics);
    log::debug!("computed styles for {} elements", styles.len());

    // STEP 2: Box tree.
    let mut layout_root = build_box_tree(root, &styles, &mut diagnostics);

    if let Some(layout_root) = layout_root.as_mut() {
        // STEP 3: Box model and formatting contexts.
        //
        // [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
        //
        // "The containing block in which the root element lives is a
        // rectangle called the initial containing block. For continuous
        // media, it has the dimensions of the viewport and is anchored at
        // the canvas origin."
        let viewport = options.viewport;
        let mut ctx = LayoutContext::new(viewport, measurer, &options.spacing);
        ctx.root_font_size = options.root_font_size;
        let initial = ContainingBlock::definite(viewport.width, viewport.height);
        layout_root.layout(&initial, Point::default(), &mut ctx, SizeOverride::NONE);

        // STEP 4: Relative offsets.
        let initial_rect = Rect {
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
        };
        apply_relative_offsets(layout_root, initial_rect, &mut ctx);

        // STEP 5: Paint order.
        finalize_stacking_order(layout_root);

        diagnostics.merge(ctx.diagnostics);
        log::debug!(
            "laid out {} boxes, document height {}",
            layout_root.count(),
            layout_root.margin_box().height
        );
    }

    LayoutResult {
        root: layout_root,
        styles,
        diagnostics,
    }
}

/// The store the cascade actually runs over, after applying
/// `include_default_rules`.
fn effective_store(store: &StyleRuleStore, include_default_rules: bool) -> Cow<'_, StyleRuleStore> {
    let has_defaults = !store.default_rules().is_empty();
    if include_default_rules == has_defaults {
        return Cow::Borrowed(store);
    }
    let mut effective = if include_default_rules {
        StyleRuleStore::with_default_rules()
    } else {
        StyleRuleStore::new()
    };
    for rule in store.author_rules() {
        let _ = effective.add_rule(rule.selector.clone(), rule.declarations.clone(), rule.origin);
    }
    Cow::Owned(effective)
}

#[cfg(test)]
mod tests {
    use trellis_dom::{DomTree, ElementData};

    use super::*;
    use crate::layout::ApproximateTextMeasure;
    use crate::store::Origin;

    #[test]
    fn test_effective_store() {
        let mut author = StyleRuleStore::new();
        let _ = author.add("p", "color: red", Origin::Author);

        let with_defaults = effective_store(&author, true);
        assert!(matches!(with_defaults, Cow::Owned(_)));
        assert!(!with_defaults.default_rules().is_empty());
        assert_eq!(with_defaults.author_rules().len(), 1);

        assert!(matches!(effective_store(&author, false), Cow::Borrowed(_)));

        let full = StyleRuleStore::with_default_rules();
        assert!(effective_store(&full, false).is_empty());
    }

    #[test]
    fn test_pass_over_document() {
        let mut tree = DomTree::new();
        let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
        let div = tree.append_element(body, ElementData::new("div").with_attr("style", "height: 30px"));

        let result = layout_document(
            tree.document(),
            &StyleRuleStore::new(),
            &ApproximateTextMeasure,
            &LayoutOptions::with_viewport(400.0, 300.0),
        );
        assert!(result.diagnostics.is_empty());
        let div_box = result.box_for(div).unwrap();
        // body margin 8px from the default stylesheet, div margin 1em 0
        assert_eq!(div_box.metrics.content.x, 8.0);
        assert_eq!(div_box.metrics.content.width, 384.0);
        assert_eq!(div_box.metrics.content.y, 24.0);
        assert_eq!(result.styles.len(), 2);
    }
}
