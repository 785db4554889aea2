//! Block formatting context.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties."
//!
//! Margins do not collapse. The gap between two siblings is the sum of their
//! facing margins plus whatever the pass's [`SpacingTable`](super::SpacingTable)
//! adds for the pair of tags.

use super::box_model::Point;
use super::layout_box::LayoutBox;
use super::{ContainingBlock, LayoutContext, SizeOverride};

/// Stack the children of `parent` top to bottom inside its content box.
///
/// Returns the content height the children need: the lowest child
/// margin-box bottom minus the content top.
pub(crate) fn layout_block_children(
    parent: &mut LayoutBox,
    cb: &ContainingBlock,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let content = parent.metrics.content;
    let mut cursor_y = content.y;
    let mut lowest = content.y;
    let mut previous_tag: Option<String> = None;

    for (i, child) in parent.children.iter_mut().enumerate() {
        // STEP 1: Extra spacing for the (previous, current) tag pair.
        let spacing = if i == 0 {
            0.0
        } else {
            ctx.spacing.between(previous_tag.as_deref(), child.tag())
        };

        // STEP 2: "each box's left outer edge touches the left edge of the
        // containing block"
        child.layout(cb, Point::new(content.x, cursor_y + spacing), ctx, SizeOverride::NONE);

        // STEP 3: Advance past the child's margin box.
        let margin_box = child.margin_box();
        cursor_y = margin_box.bottom().max(cursor_y + spacing);
        lowest = lowest.max(margin_box.bottom());
        previous_tag = child.tag().map(str::to_string);
    }

    log::trace!(
        "block {} stacked {} children, content height {}",
        parent.describe(),
        parent.children.len(),
        lowest - content.y
    );
    (lowest - content.y).max(0.0)
}
