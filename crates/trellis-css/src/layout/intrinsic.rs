//! Intrinsic sizes.
//!
//! [§ 5 Intrinsic Size Determination](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
//!
//! "The min-content size of a box in each axis is the size it would have if
//! it was a float given an auto size in that axis (and no minimum or maximum
//! size in that axis) and if its containing block was zero-sized in that
//! axis."
//!
//! "The max-content size of a box in each axis is the size it would have if
//! it was a float given an auto size in that axis (and no minimum or maximum
//! size in that axis), and if its containing block was infinitely-sized in
//! that axis."
//!
//! Widths only. Heights come from actually laying a box out.

use super::flex::FlexDirection;
use super::inline::text_content_widths;
use super::layout_box::{BoxType, LayoutBox};
use super::resolve::{resolve_edges, specified_size};
use super::LayoutContext;

/// Deeper trees than this contribute nothing further.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Min,
    Max,
}

/// Max-content width of the content box of `layout_box`.
pub(crate) fn max_content_width(layout_box: &LayoutBox, ctx: &mut LayoutContext<'_>) -> f32 {
    content_width(layout_box, Mode::Max, ctx, 0)
}

/// Min-content width of the content box of `layout_box`.
pub(crate) fn min_content_width(layout_box: &LayoutBox, ctx: &mut LayoutContext<'_>) -> f32 {
    content_width(layout_box, Mode::Min, ctx, 0)
}

/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// "the shrink-to-fit width is: min(max(preferred minimum width, available
/// width), preferred width)"
pub(crate) fn shrink_to_fit_width(layout_box: &LayoutBox, available: f32, ctx: &mut LayoutContext<'_>) -> f32 {
    let min = min_content_width(layout_box, ctx);
    let max = max_content_width(layout_box, ctx);
    max.min(min.max(available))
}

fn content_width(layout_box: &LayoutBox, mode: Mode, ctx: &mut LayoutContext<'_>, depth: usize) -> f32 {
    if depth > MAX_DEPTH {
        return 0.0;
    }
    if layout_box.is_text() {
        let (min, max) = text_content_widths(layout_box, ctx);
        return match mode {
            Mode::Min => min,
            Mode::Max => max,
        };
    }

    let children = &layout_box.children;
    match layout_box.box_type {
        BoxType::FlexContainer => {
            let direction: FlexDirection = layout_box
                .style
                .get_or("flex-direction", "row")
                .trim()
                .parse()
                .unwrap_or_default();
            let contributions: Vec<f32> = children
                .iter()
                .map(|c| outer_contribution(c, mode, ctx, depth + 1))
                .collect();
            if direction.is_row() {
                let gap = super::flex::main_gap(layout_box, direction, None, ctx);
                contributions.iter().sum::<f32>() + gap * children.len().saturating_sub(1) as f32
            } else {
                contributions.into_iter().fold(0.0, f32::max)
            }
        }
        _ if layout_box.is_inline_box() || layout_box.establishes_inline_context() => {
            let contributions = children.iter().map(|c| outer_contribution(c, mode, ctx, depth + 1));
            match mode {
                // Everything on one line.
                Mode::Max => contributions.sum(),
                // Every soft wrap opportunity taken.
                Mode::Min => contributions.fold(0.0, f32::max),
            }
        }
        // Grid columns are approximated by the widest item.
        _ => children
            .iter()
            .map(|c| outer_contribution(c, mode, ctx, depth + 1))
            .fold(0.0, f32::max),
    }
}

/// Width a child asks of its parent: its specified width, or its content
/// width, plus its horizontal margin, border and padding.
fn outer_contribution(child: &LayoutBox, mode: Mode, ctx: &mut LayoutContext<'_>, depth: usize) -> f32 {
    if child.is_text() {
        return content_width(child, mode, ctx, depth);
    }
    let edges = resolve_edges(&child.style, None, ctx);
    let inner = if child.is_inline_box() {
        None
    } else {
        specified_size(&child.style, "width", None, ctx)
    };
    let inner = inner.unwrap_or_else(|| content_width(child, mode, ctx, depth));
    (inner + edges.outer_horizontal()).max(0.0)
}
