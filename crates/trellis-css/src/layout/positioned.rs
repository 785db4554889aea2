//! CSS Positioned Layout.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! "In CSS 2, a box may be laid out according to three positioning schemes:
//!
//! 1. Normal flow. In CSS 2, normal flow includes block formatting of block-level
//!    boxes, inline formatting of inline-level boxes, and relative positioning of
//!    block-level and inline-level boxes. [...]"
//!
//! Only relative positioning is applied. Absolutely positioned, fixed and
//! sticky boxes stay where normal flow put them.

use strum_macros::{Display, EnumString};
use trellis_common::DiagnosticKind;

use super::box_model::Rect;
use super::layout_box::LayoutBox;
use super::resolve::keyword_property;
use super::values::Dimension;
use super::LayoutContext;

/// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
///
/// "The 'position' and 'float' properties determine which of the CSS 2
/// positioning algorithms is used to calculate the position of a box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
    /// Laid out in normal flow.
    Absolute,
    /// Laid out in normal flow.
    Fixed,
    /// Laid out in normal flow.
    Sticky,
}

/// [§ 9.3.2 Box offsets: 'top', 'right', 'bottom', 'left'](https://www.w3.org/TR/CSS2/visuren.html#position-props)
///
/// Used offsets in pixels; `None` is `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxOffsets {
    /// "how far the top margin edge of the box is offset below the top edge
    /// of the box's containing block"
    pub top: Option<f32>,
    /// "how far the right margin edge of the box is offset to the left of
    /// the right edge of the box's containing block"
    pub right: Option<f32>,
    /// "how far the bottom margin edge of the box is offset above the bottom
    /// edge of the box's containing block"
    pub bottom: Option<f32>,
    /// "how far the left margin edge of the box is offset to the right of
    /// the left edge of the box's containing block"
    pub left: Option<f32>,
}

impl BoxOffsets {
    /// Resolve the four offsets of `layout_box` against `containing_block`.
    ///
    /// "The offset is a percentage of the containing block's width (for
    /// 'left' or 'right') or height (for 'top' or 'bottom')."
    pub fn resolve(layout_box: &LayoutBox, containing_block: Rect, ctx: &mut LayoutContext<'_>) -> Self {
        let width = Some(containing_block.width);
        let height = Some(containing_block.height);
        BoxOffsets {
            top: offset_property(layout_box, "top", height, ctx),
            right: offset_property(layout_box, "right", width, ctx),
            bottom: offset_property(layout_box, "bottom", height, ctx),
            left: offset_property(layout_box, "left", width, ctx),
        }
    }

    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    ///
    /// The `(dx, dy)` translation these offsets give a relatively positioned
    /// box.
    #[must_use]
    pub fn relative_translation(&self) -> (f32, f32) {
        // "If both 'left' and 'right' are 'auto', the used values are both 0."
        //
        // "If 'left' is 'auto', its used value is minus the value of 'right'."
        //
        // "If neither 'left' nor 'right' is 'auto', the position is
        //  over-constrained, and one of them has to be ignored. If the
        //  'direction' property of the containing block is 'ltr', the value
        //  of 'left' wins and 'right' becomes -'left'."
        let dx = match (self.left, self.right) {
            (None, None) => 0.0,
            (Some(left), _) => left,
            (None, Some(right)) => -right,
        };

        // "If neither is 'auto', 'bottom' is ignored (i.e., the used value
        //  of 'bottom' will be minus the value of 'top')."
        let dy = match (self.top, self.bottom) {
            (None, None) => 0.0,
            (Some(top), _) => top,
            (None, Some(bottom)) => -bottom,
        };
        (dx, dy)
    }
}

fn offset_property(
    layout_box: &LayoutBox,
    property: &str,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> Option<f32> {
    let value = layout_box.style.get_or(property, "auto");
    let lengths = ctx.length_context(&layout_box.style);
    match Dimension::parse(value, &lengths) {
        Ok(dimension) => dimension.resolve(base).length(),
        Err(err) => {
            ctx.diagnostics
                .report(DiagnosticKind::MalformedValue, Some(property), value, err.to_string());
            None
        }
    }
}

/// Shift every `position: relative` box in the tree by its offsets.
///
/// Runs after layout. "Offsetting a box (B1) in this way has no effect on
/// the box (B2) that follows: B2 is given a position as if B1 were not
/// offset and B2 is not re-positioned after B1's offset is applied."
///
/// `containing_block` is the rectangle the root's offsets resolve against,
/// normally the viewport.
pub fn apply_relative_offsets(root: &mut LayoutBox, containing_block: Rect, ctx: &mut LayoutContext<'_>) {
    offset_box(root, containing_block, ctx);
}

fn offset_box(layout_box: &mut LayoutBox, containing_block: Rect, ctx: &mut LayoutContext<'_>) {
    if !layout_box.is_text() {
        let position: Position = keyword_property(&layout_box.style, "position", ctx);
        if position == Position::Relative {
            let (dx, dy) = BoxOffsets::resolve(layout_box, containing_block, ctx).relative_translation();
            log::trace!("relative offset {} by ({dx}, {dy})", layout_box.describe());
            layout_box.translate(dx, dy);
        }
    }
    let content = layout_box.metrics.content;
    for child in &mut layout_box.children {
        offset_box(child, content, ctx);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::inline::ApproximateTextMeasure;
    use crate::layout::layout_box::{BoxSource, BoxType};
    use crate::layout::{ContainingBlock, Point, Size, SizeOverride, SpacingTable};
    use crate::style::ComputedStyle;

    fn block_with(declarations: &[(&str, &str)]) -> LayoutBox {
        let mut style = ComputedStyle::initial();
        for (property, value) in declarations {
            style.set(property, value);
        }
        LayoutBox::new(BoxType::Block, BoxSource::Anonymous, Arc::new(style))
    }

    fn run(root: &mut LayoutBox) -> trellis_common::Diagnostics {
        let measurer = ApproximateTextMeasure;
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(400.0, 300.0), &measurer, &spacing);
        root.layout(
            &ContainingBlock::definite(400.0, 300.0),
            Point::default(),
            &mut ctx,
            SizeOverride::NONE,
        );
        let viewport = Rect {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 300.0,
        };
        apply_relative_offsets(root, viewport, &mut ctx);
        ctx.diagnostics
    }

    #[test]
    fn test_translation_rules() {
        let offsets = BoxOffsets {
            top: None,
            right: Some(5.0),
            bottom: Some(7.0),
            left: None,
        };
        assert_eq!(offsets.relative_translation(), (-5.0, -7.0));
        let both = BoxOffsets {
            top: Some(1.0),
            right: Some(5.0),
            bottom: Some(7.0),
            left: Some(2.0),
        };
        assert_eq!(both.relative_translation(), (2.0, 1.0));
        assert_eq!(BoxOffsets::default().relative_translation(), (0.0, 0.0));
    }

    #[test]
    fn test_relative_box_moves_with_subtree_only() {
        let mut root = block_with(&[("height", "200px")]);
        let mut moved = block_with(&[("position", "relative"), ("top", "10px"), ("left", "10%"), ("height", "20px")]);
        moved.children.push(block_with(&[("height", "5px")]));
        root.children.push(moved);
        root.children.push(block_with(&[("height", "20px")]));

        let diagnostics = run(&mut root);
        assert!(diagnostics.is_empty());
        let moved = &root.children[0];
        assert_eq!((moved.metrics.content.x, moved.metrics.content.y), (40.0, 10.0));
        assert_eq!(moved.children[0].metrics.content.y, 10.0);
        // the following sibling keeps its normal-flow position
        assert_eq!(root.children[1].metrics.content.y, 20.0);
    }

    #[test]
    fn test_static_boxes_ignore_offsets() {
        let mut root = block_with(&[]);
        root.children.push(block_with(&[("top", "50px")]));
        let _ = run(&mut root);
        assert_eq!(root.children[0].metrics.content.y, 0.0);
    }

    #[test]
    fn test_malformed_offset_is_reported() {
        let mut root = block_with(&[]);
        root.children.push(block_with(&[("position", "relative"), ("left", "far")]));
        let diagnostics = run(&mut root);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::MalformedValue).count(), 1);
        assert_eq!(root.children[0].metrics.content.x, 0.0);
    }
}
