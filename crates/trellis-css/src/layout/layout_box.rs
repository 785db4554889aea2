//! Layout Box
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The following sections describe the types of boxes that may be generated
//! in CSS 2.1. A box's type affects, in part, its behavior in the visual
//! formatting model."

use std::sync::Arc;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use trellis_dom::NodeId;

use crate::style::ComputedStyle;

use super::box_model::{BoxMetrics, Point, Rect};
use super::inline::TextFragment;
use super::resolve::resolve_box;
use super::stacking::ZIndex;
use super::values::AutoOr;
use super::{ContainingBlock, LayoutContext, SizeOverride, block, flex, grid, inline, intrinsic};

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The formatting behavior a box was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BoxType {
    /// Block container. Lays out either blocks or a run of inline content.
    Block,
    /// Inline box (or a text run). Fragmented across line boxes.
    Inline,
    /// [§ 10.3.9 'Inline-block', non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
    ///
    /// Atomic inline-level block container.
    InlineBlock,
    /// [§ 3 Flex Containers](https://www.w3.org/TR/css-flexbox-1/#flex-containers)
    FlexContainer,
    /// [§ 5 Grid Containers](https://www.w3.org/TR/css-grid-1/#grid-containers)
    GridContainer,
}

/// What generated a box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BoxSource {
    /// [§ 9.2 Principal box](https://www.w3.org/TR/css-display-3/#principal-box)
    ///
    /// "Most elements generate a single principal box."
    Element {
        /// The generating element.
        node: NodeId,
        /// Its lowercase tag name.
        tag: String,
    },
    /// [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
    ///
    /// "A text run is the most basic box generated."
    Text {
        /// The text node.
        node: NodeId,
        /// Its character data, unprocessed.
        text: String,
    },
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Inserted by the builder; no node of its own.
    Anonymous,
}

/// A node in the layout tree.
///
/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// "Each box is associated with its generating element."
///
/// The tree is rebuilt from scratch on every pass and handed out as a
/// snapshot. `metrics` are absolute coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutBox {
    /// Formatting behavior.
    pub box_type: BoxType,
    /// Generating node.
    pub source: BoxSource,
    /// Computed style, shared with the pass's style map. Text and anonymous
    /// boxes carry the inherited part of their parent's style.
    #[serde(skip)]
    pub style: Arc<ComputedStyle>,
    /// Used geometry.
    pub metrics: BoxMetrics,
    /// Specified `z-index`.
    pub z_index: ZIndex,
    /// Effective stack level after finalization.
    pub stack_level: i32,
    /// [§ 2.1 Outer display roles](https://www.w3.org/TR/css-display-3/#outer-role)
    ///
    /// Whether the box takes part in its parent's inline formatting context.
    pub inline_level: bool,
    /// Line fragments of a text box, in line order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<TextFragment>,
    /// Children, in paint order once stacking is finalized.
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    /// A box with zeroed metrics and no children.
    #[must_use]
    pub fn new(box_type: BoxType, source: BoxSource, style: Arc<ComputedStyle>) -> Self {
        let inline_level = matches!(box_type, BoxType::Inline | BoxType::InlineBlock);
        LayoutBox {
            box_type,
            source,
            style,
            metrics: BoxMetrics::default(),
            z_index: ZIndex::Auto,
            stack_level: 0,
            inline_level,
            fragments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name of the generating element.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match &self.source {
            BoxSource::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Generating node, for element and text boxes.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match &self.source {
            BoxSource::Element { node, .. } | BoxSource::Text { node, .. } => Some(*node),
            BoxSource::Anonymous => None,
        }
    }

    /// Character data of a text box.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.source {
            BoxSource::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// True for boxes generated by a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.source, BoxSource::Text { .. })
    }

    /// Inline boxes and text runs: fragmented by line layout rather than
    /// laid out as a unit.
    #[must_use]
    pub const fn is_inline_box(&self) -> bool {
        matches!(self.box_type, BoxType::Inline)
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "If all children are inline-level, the parent establishes an inline
    /// formatting context for its contents instead."
    #[must_use]
    pub fn establishes_inline_context(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(|c| c.inline_level)
    }

    /// Short description for log records.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.source {
            BoxSource::Element { node, tag } => format!("<{tag}> {node}"),
            BoxSource::Text { node, .. } => format!("text {node}"),
            BoxSource::Anonymous => format!("anonymous {}", self.box_type),
        }
    }

    /// Margin box in absolute coordinates.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.metrics.margin_box()
    }

    /// Move the box, its fragments and its whole subtree.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.metrics.content.x += dx;
        self.metrics.content.y += dy;
        for fragment in &mut self.fragments {
            fragment.rect.x += dx;
            fragment.rect.y += dy;
        }
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// First box (pre-order) generated by `node`.
    #[must_use]
    pub fn find_by_node(&self, node: NodeId) -> Option<&LayoutBox> {
        if self.node() == Some(node) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_node(node))
    }

    /// Every box generated by an element with this tag, in pre-order.
    #[must_use]
    pub fn find_all_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a LayoutBox> {
        let mut found = Vec::new();
        self.collect_by_tag(tag, &mut found);
        found
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a LayoutBox>) {
        if self.tag() == Some(tag) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_tag(tag, found);
        }
    }

    /// Number of boxes in this subtree, this one included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(LayoutBox::count).sum::<usize>()
    }

    /// Lay out this box with its margin box's top-left corner at `origin`.
    ///
    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "The following constraints must hold among the used values of the
    /// other properties:
    ///
    /// 'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right'
    /// = width of containing block"
    ///
    /// `overrides` are content sizes decided by the parent's formatting
    /// context (flex target sizes, stretched cross sizes, grid areas).
    pub fn layout(
        &mut self,
        cb: &ContainingBlock,
        origin: Point,
        ctx: &mut LayoutContext<'_>,
        overrides: SizeOverride,
    ) {
        log::trace!("layout {} at ({}, {})", self.describe(), origin.x, origin.y);

        if self.is_text() {
            inline::layout_lone_text(self, cb, origin, ctx);
            return;
        }

        // STEP 1: Resolve edges and specified sizes.
        let used = resolve_box(self, cb, ctx);
        let outer_horizontal = self.metrics.outer_horizontal();

        // STEP 2: Determine the content width.
        let width = if let Some(width) = overrides.width {
            width.max(0.0)
        } else {
            match used.width {
                AutoOr::Length(width) => used.clamp_width(width),
                // [§ 10.3.9 'Inline-block', non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
                //
                // "If 'width' is 'auto', the used value is the shrink-to-fit
                // width as for floating elements."
                AutoOr::Auto if self.inline_level => {
                    let available = (cb.width - outer_horizontal).max(0.0);
                    used.clamp_width(intrinsic::shrink_to_fit_width(self, available, ctx))
                }
                // "If 'width' is set to 'auto', any other 'auto' values become
                // '0' and 'width' follows from the resulting equality."
                AutoOr::Auto => used.clamp_width(cb.width - outer_horizontal),
            }
        };

        // STEP 3: Distribute the remaining space to auto margins.
        //
        // "If both 'margin-left' and 'margin-right' are 'auto', their used
        // values are equal. This horizontally centers the element with
        // respect to the edges of the containing block."
        if overrides.width.is_none() && !self.inline_level && !used.width.is_auto() {
            let remaining = cb.width - width - outer_horizontal;
            let auto = used.auto_margins;
            if remaining > 0.0 {
                match (auto.left, auto.right) {
                    (true, true) => {
                        self.metrics.margin.left = remaining / 2.0;
                        self.metrics.margin.right = remaining / 2.0;
                    }
                    (true, false) => self.metrics.margin.left = remaining,
                    (false, true) => self.metrics.margin.right = remaining,
                    (false, false) => {}
                }
            }
        }

        // STEP 4: Position the box.
        self.metrics.place_margin_box_at(origin);
        self.metrics.content.width = width;

        // STEP 5: Lay out the children inside the content box.
        let specified_height = overrides.height.or_else(|| used.height.length().map(|h| used.clamp_height(h)));
        self.metrics.content.height = specified_height.unwrap_or(0.0);
        let child_cb = ContainingBlock {
            width,
            height: specified_height.unwrap_or(0.0),
            width_definite: true,
            height_definite: specified_height.is_some(),
        };
        let content_height = match self.box_type {
            BoxType::FlexContainer => flex::layout_flex(self, &child_cb, ctx),
            BoxType::GridContainer => grid::layout_grid(self, &child_cb, ctx),
            _ if self.establishes_inline_context() => inline::layout_inline_content(self, &child_cb, ctx),
            _ => block::layout_block_children(self, &child_cb, ctx),
        };

        // STEP 6: Determine the content height.
        //
        // [§ 10.6.3 Block-level non-replaced elements in normal flow when
        // 'overflow' computes to 'visible'](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
        //
        // "If 'height' is 'auto', the height depends on whether the element
        // has any block-level children..."
        self.metrics.content.height = match overrides.height {
            Some(height) => height.max(0.0),
            None => match used.height {
                AutoOr::Length(height) => used.clamp_height(height),
                AutoOr::Auto => used.clamp_height(content_height),
            },
        };

        #[cfg(feature = "layout-trace")]
        log::trace!(
            "laid out {}: content={:?} padding={:?} border={:?} margin={:?}",
            self.describe(),
            self.metrics.content,
            self.metrics.padding,
            self.metrics.border,
            self.metrics.margin
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::inline::ApproximateTextMeasure;
    use crate::layout::{Size, SpacingTable};

    fn styled(box_type: BoxType, declarations: &[(&str, &str)]) -> LayoutBox {
        let mut style = ComputedStyle::initial();
        for (property, value) in declarations {
            style.set(property, value);
        }
        LayoutBox::new(box_type, BoxSource::Anonymous, Arc::new(style))
    }

    fn run(root: &mut LayoutBox, width: f32) {
        let measurer = ApproximateTextMeasure;
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(width, 600.0), &measurer, &spacing);
        root.layout(
            &ContainingBlock::definite(width, 600.0),
            Point::default(),
            &mut ctx,
            SizeOverride::NONE,
        );
    }

    #[test]
    fn test_auto_width_fills_containing_block() {
        let mut root = styled(BoxType::Block, &[("padding-left", "10px"), ("margin-right", "20px")]);
        run(&mut root, 400.0);
        assert_eq!(root.metrics.content.x, 10.0);
        assert_eq!(root.metrics.content.width, 370.0);
        assert_eq!(root.metrics.content.height, 0.0);
    }

    #[test]
    fn test_auto_margins_center() {
        let mut root = styled(
            BoxType::Block,
            &[("width", "200px"), ("margin-left", "auto"), ("margin-right", "auto")],
        );
        run(&mut root, 600.0);
        assert_eq!(root.metrics.margin.left, 200.0);
        assert_eq!(root.metrics.content.x, 200.0);
    }

    #[test]
    fn test_height_grows_with_block_children() {
        let mut root = styled(BoxType::Block, &[("padding-top", "5px")]);
        root.children.push(styled(BoxType::Block, &[("height", "30px")]));
        root.children.push(styled(BoxType::Block, &[("height", "20px"), ("margin-top", "10px")]));
        run(&mut root, 300.0);
        assert_eq!(root.children[0].metrics.content.y, 5.0);
        assert_eq!(root.children[1].metrics.content.y, 45.0);
        assert_eq!(root.metrics.content.height, 60.0);
    }

    #[test]
    fn test_overrides_win() {
        let mut root = styled(BoxType::Block, &[("width", "50px"), ("height", "10px")]);
        let measurer = ApproximateTextMeasure;
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(300.0, 300.0), &measurer, &spacing);
        root.layout(
            &ContainingBlock::definite(300.0, 300.0),
            Point::new(3.0, 4.0),
            &mut ctx,
            SizeOverride {
                width: Some(120.0),
                height: Some(40.0),
            },
        );
        assert_eq!(root.metrics.content, Rect { x: 3.0, y: 4.0, width: 120.0, height: 40.0 });
    }

    #[test]
    fn test_translate_moves_subtree() {
        let mut root = styled(BoxType::Block, &[]);
        root.children.push(styled(BoxType::Block, &[("height", "10px")]));
        run(&mut root, 100.0);
        root.translate(5.0, 7.0);
        assert_eq!(root.children[0].metrics.content.x, 5.0);
        assert_eq!(root.children[0].metrics.content.y, 7.0);
        assert_eq!(root.count(), 2);
    }
}
