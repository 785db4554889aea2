//! CSS Flexbox Layout Algorithm.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Single-line flex layout:
//! - `flex-direction` (all four values) and `order`
//! - `flex-grow` / `flex-shrink` / `flex-basis` with the freeze loop (§ 9.7)
//! - `min-*` / `max-*` main size clamping
//! - `justify-content`, `align-items` / `align-self`
//! - `gap` along the main axis
//!
//! Not implemented: `flex-wrap` (items stay on one line), `align-content`,
//! baseline alignment (treated as `flex-start`) and auto margins.

use strum_macros::{Display, EnumString};

use super::box_model::Point;
use super::intrinsic;
use super::layout_box::LayoutBox;
use super::resolve::{gap_property, keyword_property, number_property, resolve_box};
use super::values::{AutoOr, Dimension};
use super::{ContainingBlock, LayoutContext, SizeOverride};

/// Violations smaller than this count as none.
const VIOLATION_EPSILON: f32 = 0.01;

/// [§ 5.1 Flex Flow Direction: the flex-direction property](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexDirection {
    /// "The flex container's main axis has the same orientation as the
    /// inline axis of the current writing mode."
    #[default]
    Row,
    /// "Same as row, except the main-start and main-end directions are
    /// swapped."
    RowReverse,
    /// "The flex container's main axis has the same orientation as the block
    /// axis of the current writing mode."
    Column,
    /// "Same as column, except the main-start and main-end directions are
    /// swapped."
    ColumnReverse,
}

impl FlexDirection {
    /// Main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    /// Items run from main-end to main-start.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

/// [§ 8.2 Axis Alignment: the justify-content property](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum JustifyContent {
    /// "Flex items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// "Flex items are packed toward the end of the line."
    FlexEnd,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are evenly distributed in the line."
    SpaceBetween,
    /// "Flex items are evenly distributed in the line, with half-size spaces
    /// on either end."
    SpaceAround,
    /// Equal spaces between items and at both ends.
    SpaceEvenly,
    /// Same as `flex-start`.
    Start,
    /// Same as `flex-end`.
    End,
    /// Same as `flex-start`.
    Normal,
}

/// [§ 8.3 Cross-axis Alignment: the align-items and align-self properties](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignItems {
    /// "If the cross size property of the flex item computes to auto, and
    /// neither of the cross-axis margins are auto, the flex item is
    /// stretched."
    #[default]
    Stretch,
    /// "The cross-start margin edge of the flex item is placed flush with the
    /// cross-start edge of the line."
    FlexStart,
    /// "The cross-end margin edge of the flex item is placed flush with the
    /// cross-end edge of the line."
    FlexEnd,
    /// "The flex item's margin box is centered in the cross axis within the
    /// line."
    Center,
    /// Laid out as `flex-start`.
    Baseline,
    /// Same as `flex-start`.
    Start,
    /// Same as `flex-end`.
    End,
    /// Same as `stretch`.
    Normal,
}

impl AlignItems {
    /// Offset of an item's cross-start margin edge inside a line with `free`
    /// unused cross space.
    const fn offset(self, free: f32) -> f32 {
        match self {
            AlignItems::FlexEnd | AlignItems::End => free,
            AlignItems::Center => free / 2.0,
            _ => 0.0,
        }
    }

    const fn stretches(self) -> bool {
        matches!(self, AlignItems::Stretch | AlignItems::Normal)
    }
}

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
#[derive(Debug, Clone)]
struct FlexItem {
    /// Index into `container.children`.
    index: usize,
    /// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// The flex base size.
    base_size: f32,
    /// [§ 9.2 step 3E](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// The flex base size clamped by the min and max main sizes.
    hypothetical_size: f32,
    /// flex-grow factor.
    grow: f32,
    /// flex-shrink factor.
    shrink: f32,
    /// Used min main size (content box).
    min_main: f32,
    /// Used max main size (content box).
    max_main: Option<f32>,
    /// The resolved target main size after § 9.7.
    target_size: f32,
    /// Whether this item is frozen during the § 9.7 loop.
    frozen: bool,
    /// Margin + border + padding on the main axis.
    outer_main: f32,
    /// Whether the item's cross size is `auto`.
    auto_cross: bool,
    /// `align-self`, with `auto` replaced by the container's `align-items`.
    align: AlignItems,
}

impl FlexItem {
    fn clamp(&self, size: f32) -> f32 {
        let size = self.max_main.map_or(size, |max| size.min(max));
        size.max(self.min_main).max(0.0)
    }
}

/// Gap between adjacent items along the main axis.
///
/// [§ 10.1 Row and Column Gutters](https://www.w3.org/TR/css-align-3/#gaps)
pub(crate) fn main_gap(
    container: &LayoutBox,
    direction: FlexDirection,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let property = if direction.is_row() { "column-gap" } else { "row-gap" };
    gap_property(&container.style, property, base, ctx)
}

/// Main entry point for flex layout.
///
/// [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
///
/// The container's own box is already resolved and positioned; `cb` is its
/// content box. Returns the content height the items need.
pub(crate) fn layout_flex(container: &mut LayoutBox, cb: &ContainingBlock, ctx: &mut LayoutContext<'_>) -> f32 {
    let content = container.metrics.content;
    let direction: FlexDirection = keyword_property(&container.style, "flex-direction", ctx);
    let justify: JustifyContent = keyword_property(&container.style, "justify-content", ctx);
    let align_items: AlignItems = keyword_property(&container.style, "align-items", ctx);
    let is_row = direction.is_row();
    let gap = main_gap(
        container,
        direction,
        if is_row { cb.width_base() } else { cb.height_base() },
        ctx,
    );

    // STEP 1: Order the items.
    //
    // [§ 5.4 Display Order: the order property](https://www.w3.org/TR/css-flexbox-1/#order-property)
    //
    // "Flex items are, by default, displayed and laid out in the same order
    // as they appear in the source document. The order property can be used
    // to change this ordering."
    let mut order: Vec<(i32, usize)> = container
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| (order_value(child, ctx), i))
        .collect();
    order.sort_by_key(|&(value, _)| value);

    // STEP 2 (§ 9.2 step 3): Determine flex base and hypothetical main sizes.
    let definite_main = if is_row { Some(cb.width) } else { cb.height_base() };
    let mut items: Vec<FlexItem> = Vec::with_capacity(order.len());
    for &(_, index) in &order {
        let child = &mut container.children[index];
        items.push(collect_item(child, index, is_row, align_items, cb, ctx));
    }

    // STEP 3 (§ 9.7): Resolve flexible lengths.
    let gaps = gap * items.len().saturating_sub(1) as f32;
    match definite_main {
        Some(main) => resolve_flexible_lengths(&mut items, main - gaps),
        None => {
            for item in &mut items {
                item.target_size = item.hypothetical_size;
            }
        }
    }
    let used_main: f32 = items.iter().map(|i| i.target_size + i.outer_main).sum::<f32>() + gaps;
    let main_size = definite_main.unwrap_or(used_main);
    log::debug!(
        "flex {}: main size {main_size}, used {used_main}, {} items",
        container.describe(),
        items.len()
    );

    // STEP 4 (§ 9.5): Hypothetical cross sizes.
    //
    // "Determine the hypothetical cross size of each item by performing
    // layout with the used main size and the available space, treating auto
    // as fit-content."
    let mut overrides = Vec::with_capacity(items.len());
    let mut outer_cross = Vec::with_capacity(items.len());
    for item in &items {
        let child = &mut container.children[item.index];
        let over = if is_row {
            SizeOverride::width(item.target_size)
        } else {
            let width = if item.auto_cross {
                let used = resolve_box(child, cb, ctx);
                let available = (cb.width - child.metrics.outer_horizontal()).max(0.0);
                if item.align.stretches() {
                    Some(used.clamp_width(available))
                } else {
                    Some(used.clamp_width(intrinsic::shrink_to_fit_width(child, available, ctx)))
                }
            } else {
                None
            };
            SizeOverride {
                width,
                height: Some(item.target_size),
            }
        };
        child.layout(cb, Point::default(), ctx, over);
        let margin_box = child.margin_box();
        outer_cross.push(if is_row { margin_box.height } else { margin_box.width });
        overrides.push(over);
    }

    // STEP 5 (§ 9.4 step 8): Line cross size.
    //
    // "If the flex container is single-line and has a definite cross size,
    // the cross size of the flex line is the flex container's inner cross
    // size. Otherwise, [...] the largest of the items' outer hypothetical
    // cross sizes."
    let line_cross = if is_row {
        cb.height_base()
            .unwrap_or_else(|| outer_cross.iter().copied().fold(0.0, f32::max))
    } else {
        cb.width
    };

    // STEP 6 (§ 8.2): Main-axis distribution.
    let free = (main_size - used_main).max(0.0);
    let (initial_offset, spacing) = compute_justify_offsets(justify, free, items.len());

    // STEP 7: Final layout of every item.
    let mut offset = initial_offset;
    for (n, item) in items.iter().enumerate() {
        let child = &mut container.children[item.index];
        let mut over = overrides[n];

        // [§ 9.4 step 11](https://www.w3.org/TR/css-flexbox-1/#algo-stretch)
        //
        // "If a flex item has align-self: stretch, its computed cross size
        // property is auto, and neither of its cross-axis margins are auto,
        // the used outer cross size is the used cross size of its flex line,
        // clamped according to the item's used min and max cross sizes."
        let mut cross = outer_cross[n];
        if is_row && item.align.stretches() && item.auto_cross {
            let used = resolve_box(child, cb, ctx);
            let inner = used.clamp_height(line_cross - child.metrics.outer_vertical());
            over.height = Some(inner);
            cross = inner + child.metrics.outer_vertical();
        }
        let cross_offset = item.align.offset(line_cross - cross);

        let outer_size = item.target_size + item.outer_main;
        let main_position = if direction.is_reverse() {
            main_size - offset - outer_size
        } else {
            offset
        };
        let origin = if is_row {
            Point::new(content.x + main_position, content.y + cross_offset)
        } else {
            Point::new(content.x + cross_offset, content.y + main_position)
        };
        child.layout(cb, origin, ctx, over);

        offset += outer_size + gap + spacing;
    }

    if is_row { line_cross } else { main_size }
}

fn order_value(child: &LayoutBox, ctx: &mut LayoutContext<'_>) -> i32 {
    let Some(value) = child.style.get("order") else {
        return 0;
    };
    value.trim().parse().unwrap_or_else(|_| {
        ctx.diagnostics.report(
            trellis_common::DiagnosticKind::MalformedValue,
            Some("order"),
            value,
            "order must be an integer",
        );
        0
    })
}

/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
fn collect_item(
    child: &mut LayoutBox,
    index: usize,
    is_row: bool,
    align_items: AlignItems,
    cb: &ContainingBlock,
    ctx: &mut LayoutContext<'_>,
) -> FlexItem {
    let used = resolve_box(child, cb, ctx);
    let metrics = child.metrics;
    let (outer_main, inner_main) = if is_row {
        (
            metrics.outer_horizontal(),
            metrics.padding.horizontal() + metrics.border.horizontal(),
        )
    } else {
        (
            metrics.outer_vertical(),
            metrics.padding.vertical() + metrics.border.vertical(),
        )
    };
    let main_base = if is_row { cb.width_base() } else { cb.height_base() };
    let (specified_main, min_main, max_main, specified_cross) = if is_row {
        (used.width, used.min_width, used.max_width, used.height)
    } else {
        (used.height, used.min_height, used.max_height, used.width)
    };

    // "Determine the flex base size:
    //   A. If the item has a definite used flex basis, that's the flex base size.
    //   [...]
    //   E. Otherwise, size the item into the available space using its used
    //      flex basis in place of its main size, treating a value of content
    //      as max-content."
    let style = std::sync::Arc::clone(&child.style);
    let basis_value = style.get_or("flex-basis", "auto");
    let lengths = ctx.length_context(&style);
    let basis = if basis_value.trim().eq_ignore_ascii_case("content") {
        AutoOr::Auto
    } else {
        match Dimension::parse(basis_value, &lengths) {
            Ok(dimension) => dimension.resolve(main_base),
            Err(err) => {
                ctx.diagnostics.report(
                    trellis_common::DiagnosticKind::MalformedValue,
                    Some("flex-basis"),
                    basis_value,
                    err.to_string(),
                );
                AutoOr::Auto
            }
        }
    };
    let border_box = style
        .get("box-sizing")
        .is_some_and(|v| v.eq_ignore_ascii_case("border-box"));
    let base_size = match (basis, specified_main) {
        (AutoOr::Length(length), _) if border_box => (length - inner_main).max(0.0),
        (AutoOr::Length(length), _) => length.max(0.0),
        // "flex-basis: auto [...] retrieves the value of the main size property"
        (AutoOr::Auto, AutoOr::Length(length)) => length,
        (AutoOr::Auto, AutoOr::Auto) if is_row => intrinsic::max_content_width(child, ctx),
        (AutoOr::Auto, AutoOr::Auto) => {
            child.layout(cb, Point::default(), ctx, SizeOverride::NONE);
            child.metrics.content.height
        }
    };

    let align_self = style.get_or("align-self", "auto");
    let align = if align_self.trim().eq_ignore_ascii_case("auto") {
        align_items
    } else {
        keyword_property(&style, "align-self", ctx)
    };

    let mut item = FlexItem {
        index,
        base_size,
        hypothetical_size: base_size,
        grow: number_property(&style, "flex-grow", 0.0, ctx),
        shrink: number_property(&style, "flex-shrink", 1.0, ctx),
        min_main,
        max_main,
        target_size: 0.0,
        frozen: false,
        outer_main,
        auto_cross: specified_cross.is_auto(),
        align,
    };
    item.hypothetical_size = item.clamp(base_size);
    log::trace!(
        "flex item {}: base {} hypothetical {} grow {} shrink {}",
        child.describe(),
        item.base_size,
        item.hypothetical_size,
        item.grow,
        item.shrink
    );
    item
}

/// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
///
/// Full iterative freeze-loop algorithm. `available_main` is the container's
/// inner main size minus the gaps.
fn resolve_flexible_lengths(items: &mut [FlexItem], available_main: f32) {
    if items.is_empty() {
        return;
    }

    // STEP 1: "Determine the used flex factor."
    //
    // "If the sum of the outer hypothetical main sizes of all items on the
    // line is less than the flex container's inner main size, use the flex
    // grow factor for the rest of this algorithm; otherwise, use the flex
    // shrink factor."
    let sum_outer_hypo: f32 = items
        .iter()
        .map(|item| item.hypothetical_size + item.outer_main)
        .sum();
    let growing = sum_outer_hypo < available_main;

    // STEP 2: "Size inflexible items."
    //
    // "Freeze, setting its target main size to its hypothetical main size…
    //   - any item that has a flex factor of zero
    //   - if using the flex grow factor: any item that has a flex base size
    //     greater than its hypothetical main size
    //   - if using the flex shrink factor: any item that has a flex base size
    //     less than its hypothetical main size"
    for item in items.iter_mut() {
        let factor = if growing { item.grow } else { item.shrink };
        let freeze = factor == 0.0
            || (growing && item.base_size > item.hypothetical_size)
            || (!growing && item.base_size < item.hypothetical_size);
        if freeze {
            item.frozen = true;
            item.target_size = item.hypothetical_size;
        }
    }

    // STEP 3: "Calculate initial free space."
    let occupied = |items: &[FlexItem]| -> f32 {
        items
            .iter()
            .map(|item| {
                let size = if item.frozen { item.target_size } else { item.base_size };
                size + item.outer_main
            })
            .sum()
    };
    let initial_free_space = available_main - occupied(items);

    // STEP 4: Loop until all items are frozen.
    loop {
        // 4a. "Check for flexible items. If all the flex items on the line
        //      are frozen, free space has been distributed; exit this loop."
        if items.iter().all(|item| item.frozen) {
            break;
        }

        // 4b. "Calculate the remaining free space as for initial free space,
        //      above."
        let remaining_free = available_main - occupied(items);

        // "If the sum of the unfrozen flex items' flex factors is less than
        //  one, multiply the initial free space by this sum. If the magnitude
        //  of this value is less than the magnitude of the remaining free
        //  space, use this as the remaining free space."
        let unfrozen_factor_sum: f32 = items
            .iter()
            .filter(|item| !item.frozen)
            .map(|item| if growing { item.grow } else { item.shrink })
            .sum();
        let free_space = if unfrozen_factor_sum < 1.0 && unfrozen_factor_sum > 0.0 {
            let scaled = initial_free_space * unfrozen_factor_sum;
            if scaled.abs() < remaining_free.abs() { scaled } else { remaining_free }
        } else {
            remaining_free
        };

        // 4c. Distribute free space.
        if growing {
            // "If using the flex grow factor: Find the ratio of the item's
            // flex grow factor to the sum of the flex grow factors of all
            // unfrozen items on the line. Set the item's target main size
            // to its flex base size plus a fraction of the remaining free
            // space proportional to the ratio."
            let grow_sum: f32 = items.iter().filter(|item| !item.frozen).map(|item| item.grow).sum();
            if grow_sum > 0.0 {
                for item in items.iter_mut().filter(|item| !item.frozen) {
                    let ratio = item.grow / grow_sum;
                    item.target_size = free_space.mul_add(ratio, item.base_size);
                }
            }
        } else {
            // "If using the flex shrink factor: For every unfrozen item on
            // the line, multiply its flex shrink factor by its inner flex
            // base size, and note this as its scaled flex shrink factor.
            // Find the ratio of the item's scaled flex shrink factor to the
            // sum of the scaled flex shrink factors of all unfrozen items on
            // the line. Set the item's target main size to its flex base size
            // minus a fraction of the absolute value of the remaining free
            // space proportional to the ratio."
            let scaled_shrink_sum: f32 = items
                .iter()
                .filter(|item| !item.frozen)
                .map(|item| item.shrink * item.base_size)
                .sum();
            for item in items.iter_mut().filter(|item| !item.frozen) {
                item.target_size = if scaled_shrink_sum > 0.0 {
                    let ratio = item.shrink * item.base_size / scaled_shrink_sum;
                    free_space.abs().mul_add(-ratio, item.base_size)
                } else {
                    item.base_size
                };
            }
        }

        // 4d. "Fix min/max violations. Clamp each non-frozen item's target
        //      main size by its used min and max main sizes and floor its
        //      content-box size at zero."
        let mut total_violation = 0.0_f32;
        let mut violations = vec![0.0_f32; items.len()];
        for (item, violation) in items.iter_mut().zip(violations.iter_mut()) {
            if item.frozen {
                continue;
            }
            let clamped = item.clamp(item.target_size);
            *violation = clamped - item.target_size;
            total_violation += *violation;
            item.target_size = clamped;
        }

        // 4e. "Freeze over-flexed items."
        //
        // "Zero: Freeze all items.
        //  Positive: Freeze all the items with min violations.
        //  Negative: Freeze all the items with max violations."
        for (item, violation) in items.iter_mut().zip(violations) {
            if item.frozen {
                continue;
            }
            item.frozen = if total_violation.abs() < VIOLATION_EPSILON {
                true
            } else if total_violation > 0.0 {
                violation > 0.0
            } else {
                violation < 0.0
            };
        }
    }
}

/// Compute justify-content alignment offsets.
///
/// [§ 8.2 Axis Alignment: the justify-content property](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(initial_offset, gap_between_items)`.
fn compute_justify_offsets(justify: JustifyContent, free_space: f32, item_count: usize) -> (f32, f32) {
    if item_count == 0 || free_space <= 0.0 {
        return (0.0, 0.0);
    }

    match justify {
        JustifyContent::FlexEnd | JustifyContent::End => (free_space, 0.0),
        JustifyContent::Center => (free_space / 2.0, 0.0),

        // "If the leftover free-space is negative or there is only a single
        // flex item on the line, this value is identical to flex-start."
        JustifyContent::SpaceBetween => {
            if item_count <= 1 {
                (0.0, 0.0)
            } else {
                (0.0, free_space / (item_count - 1) as f32)
            }
        }

        JustifyContent::SpaceAround => {
            let gap = free_space / item_count as f32;
            (gap / 2.0, gap)
        }

        JustifyContent::SpaceEvenly => {
            let gap = free_space / (item_count + 1) as f32;
            (gap, gap)
        }

        JustifyContent::FlexStart | JustifyContent::Start | JustifyContent::Normal => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::inline::ApproximateTextMeasure;
    use crate::layout::layout_box::{BoxSource, BoxType};
    use crate::layout::{Size, SpacingTable};
    use crate::style::ComputedStyle;

    fn styled(box_type: BoxType, declarations: &[(&str, &str)]) -> LayoutBox {
        let mut style = ComputedStyle::initial();
        for (property, value) in declarations {
            style.set(property, value);
        }
        LayoutBox::new(box_type, BoxSource::Anonymous, Arc::new(style))
    }

    fn flex(declarations: &[(&str, &str)], items: Vec<LayoutBox>) -> LayoutBox {
        let mut container = styled(BoxType::FlexContainer, declarations);
        container.children = items;
        container
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

    fn widths(container: &LayoutBox) -> Vec<f32> {
        container.children.iter().map(|c| c.metrics.content.width).collect()
    }

    #[test]
    fn test_grow_fills_container() {
        let mut root = flex(
            &[("column-gap", "10px")],
            vec![
                styled(BoxType::Block, &[("flex-basis", "50px"), ("flex-grow", "1")]),
                styled(BoxType::Block, &[("flex-basis", "50px"), ("flex-grow", "3")]),
            ],
        );
        run(&mut root, 410.0);
        // 300px free, split 1:3
        assert_eq!(widths(&root), vec![125.0, 275.0]);
        assert_eq!(root.children[1].metrics.content.x, 135.0);
    }

    #[test]
    fn test_shrink_is_weighted_by_base_size() {
        let mut root = flex(
            &[],
            vec![
                styled(BoxType::Block, &[("width", "300px")]),
                styled(BoxType::Block, &[("width", "100px")]),
            ],
        );
        run(&mut root, 200.0);
        // 200px overflow, scaled shrink factors 300:100
        assert_eq!(widths(&root), vec![150.0, 50.0]);
    }

    #[test]
    fn test_max_violation_freezes_and_redistributes() {
        let mut root = flex(
            &[],
            vec![
                styled(BoxType::Block, &[("flex-grow", "1"), ("flex-basis", "0px"), ("max-width", "50px")]),
                styled(BoxType::Block, &[("flex-grow", "1"), ("flex-basis", "0px")]),
            ],
        );
        run(&mut root, 300.0);
        assert_eq!(widths(&root), vec![50.0, 250.0]);
    }

    #[test]
    fn test_justify_content() {
        let items = || {
            vec![
                styled(BoxType::Block, &[("width", "20px")]),
                styled(BoxType::Block, &[("width", "20px")]),
            ]
        };
        let x = |justify: &str| {
            let mut root = flex(&[("justify-content", justify)], items());
            run(&mut root, 100.0);
            (root.children[0].metrics.content.x, root.children[1].metrics.content.x)
        };
        assert_eq!(x("flex-start"), (0.0, 20.0));
        assert_eq!(x("flex-end"), (60.0, 80.0));
        assert_eq!(x("center"), (30.0, 50.0));
        assert_eq!(x("space-between"), (0.0, 80.0));
        assert_eq!(x("space-around"), (15.0, 65.0));
        assert!((x("space-evenly").0 - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_row_reverse_and_order() {
        let mut root = flex(
            &[("flex-direction", "row-reverse")],
            vec![
                styled(BoxType::Block, &[("width", "10px"), ("order", "2")]),
                styled(BoxType::Block, &[("width", "20px")]),
            ],
        );
        run(&mut root, 100.0);
        // order puts the second child first, reversed from the right edge
        assert_eq!(root.children[1].metrics.content.x, 80.0);
        assert_eq!(root.children[0].metrics.content.x, 70.0);
    }

    #[test]
    fn test_cross_axis_alignment() {
        let mut root = flex(
            &[("height", "100px"), ("align-items", "center")],
            vec![
                styled(BoxType::Block, &[("width", "10px"), ("height", "20px")]),
                styled(BoxType::Block, &[("width", "10px"), ("align-self", "stretch")]),
                styled(BoxType::Block, &[("width", "10px"), ("height", "20px"), ("align-self", "flex-end")]),
            ],
        );
        run(&mut root, 100.0);
        assert_eq!(root.children[0].metrics.content.y, 40.0);
        assert_eq!(root.children[1].metrics.content.height, 100.0);
        assert_eq!(root.children[2].metrics.content.y, 80.0);
    }

    #[test]
    fn test_stretch_uses_tallest_item_without_definite_height() {
        let mut root = flex(
            &[],
            vec![
                styled(BoxType::Block, &[("width", "10px"), ("height", "45px")]),
                styled(BoxType::Block, &[("width", "10px")]),
            ],
        );
        run(&mut root, 100.0);
        assert_eq!(root.metrics.content.height, 45.0);
        assert_eq!(root.children[1].metrics.content.height, 45.0);
    }

    #[test]
    fn test_column_direction() {
        let mut root = flex(
            &[("flex-direction", "column"), ("row-gap", "5px")],
            vec![
                styled(BoxType::Block, &[("height", "30px")]),
                styled(BoxType::Block, &[("height", "20px"), ("align-self", "flex-start"), ("width", "40px")]),
            ],
        );
        run(&mut root, 200.0);
        assert_eq!(root.children[0].metrics.content.width, 200.0);
        assert_eq!(root.children[1].metrics.content.y, 35.0);
        assert_eq!(root.children[1].metrics.content.width, 40.0);
        assert_eq!(root.metrics.content.height, 55.0);
    }

    #[test]
    fn test_column_grow_with_definite_height() {
        let mut root = flex(
            &[("flex-direction", "column-reverse"), ("height", "100px")],
            vec![
                styled(BoxType::Block, &[("height", "20px")]),
                styled(BoxType::Block, &[("flex-grow", "1")]),
            ],
        );
        run(&mut root, 100.0);
        assert_eq!(root.children[0].metrics.content.y, 80.0);
        assert_eq!(root.children[1].metrics.content.height, 80.0);
        assert_eq!(root.children[1].metrics.content.y, 0.0);
    }
}
