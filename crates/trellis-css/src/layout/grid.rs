//! CSS Grid Layout Algorithm.
//!
//! [§ 12 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)
//!
//! Supported subset:
//! - `grid-template-columns` / `grid-template-rows` (px, %, fr, auto, repeat())
//! - `grid-auto-columns` / `grid-auto-rows` for implicit tracks
//! - `row-gap` / `column-gap`
//! - Line-based placement via `grid-{row,column}-{start,end}` (line numbers,
//!   negative lines, span). Items without a line start at line 1.
//!
//! Not implemented: auto-placement, grid-template-areas, named lines,
//! minmax(), auto-fill/auto-fit, alignment properties (items stretch).

use trellis_common::{DiagnosticKind, ValueError};

use super::box_model::Point;
use super::layout_box::LayoutBox;
use super::resolve::{gap_property, resolve_box};
use super::values::Dimension;
use super::{ContainingBlock, LayoutContext, SizeOverride};
use crate::style::LengthContext;
use crate::style::values::{parse_number, split_components, split_top_level};

/// Upper bound on `repeat()` counts and line numbers.
const MAX_TRACKS: usize = 1000;

/// [§ 7.2.1 Track Sizes](https://www.w3.org/TR/css-grid-1/#track-sizes)
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSize {
    /// A `<length-percentage>`. Percentages need a definite container size.
    Fixed(Dimension),
    /// "A flexible length or `<flex>` is a dimension with the fr unit, which
    /// represents a fraction of the leftover space in the grid container."
    Fr(f32),
    /// Shares whatever space fixed and flexible tracks leave.
    Auto,
}

impl TrackSize {
    fn parse(text: &str, lengths: &LengthContext) -> Result<Self, ValueError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("auto") {
            return Ok(TrackSize::Auto);
        }
        if let Some(number) = text
            .strip_suffix("fr")
            .or_else(|| text.strip_suffix("FR"))
        {
            let factor = parse_number(number).map_err(|_| ValueError::Track(text.to_string()))?;
            if factor < 0.0 {
                return Err(ValueError::Track(text.to_string()));
            }
            return Ok(TrackSize::Fr(factor as f32));
        }
        match Dimension::parse(text, lengths) {
            Ok(Dimension::Auto) => Ok(TrackSize::Auto),
            Ok(dimension) => Ok(TrackSize::Fixed(dimension)),
            Err(_) => Err(ValueError::Track(text.to_string())),
        }
    }
}

/// [§ 7.2 Explicit Track Sizing](https://www.w3.org/TR/css-grid-1/#track-sizing)
///
/// Parse a `grid-template-columns` / `grid-template-rows` value. `none`
/// gives an empty list.
///
/// # Errors
///
/// Returns [`ValueError::Track`] for anything outside the supported grammar.
pub fn parse_track_list(value: &str, lengths: &LengthContext) -> Result<Vec<TrackSize>, ValueError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValueError::Empty);
    }
    if value.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let mut tracks = Vec::new();
    for component in split_components(value) {
        // [§ 7.2.3 Repeating Rows and Columns](https://www.w3.org/TR/css-grid-1/#repeat-notation)
        //
        // "The repeat() notation represents a repeated fragment of the track
        // list, allowing a large number of columns or rows that exhibit a
        // recurring pattern to be written in a more compact form."
        let lower = component.to_ascii_lowercase();
        if let Some(inner) = lower.strip_prefix("repeat(").and_then(|s| s.strip_suffix(')')) {
            let parts = split_top_level(inner, ',');
            let [count, pattern] = parts[..] else {
                return Err(ValueError::Track(component.to_string()));
            };
            let count = count
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=MAX_TRACKS).contains(n))
                .ok_or_else(|| ValueError::Track(component.to_string()))?;
            let pattern = split_components(pattern)
                .into_iter()
                .map(|track| TrackSize::parse(track, lengths))
                .collect::<Result<Vec<_>, _>>()?;
            if pattern.is_empty() {
                return Err(ValueError::Track(component.to_string()));
            }
            for _ in 0..count {
                tracks.extend(pattern.iter().cloned());
            }
        } else {
            tracks.push(TrackSize::parse(component, lengths)?);
        }
    }
    Ok(tracks)
}

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// One `grid-row-start` / `grid-column-end` / ... value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLine {
    /// "The property contributes nothing to the grid item's placement."
    #[default]
    Auto,
    /// "Contributes the Nth grid line to the grid item's placement." 1-based;
    /// negative values count from the end of the explicit grid.
    Line(i32),
    /// "Contributes a grid span to the grid item's placement such that the
    /// corresponding edge of the grid item's grid area is N lines from its
    /// opposite edge."
    Span(u32),
}

impl GridLine {
    /// Parse `auto`, `<integer>`, `span <integer>` or `span`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Keyword`] for names and zero line numbers.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValueError::Empty);
        }
        if text.eq_ignore_ascii_case("auto") {
            return Ok(GridLine::Auto);
        }
        let parts: Vec<&str> = text.split_whitespace().collect();
        let invalid = || ValueError::Keyword(text.to_string());
        match parts[..] {
            [span] if span.eq_ignore_ascii_case("span") => Ok(GridLine::Span(1)),
            [span, n] | [n, span] if span.eq_ignore_ascii_case("span") => {
                let n: u32 = n.parse().map_err(|_| invalid())?;
                if n == 0 || n as usize > MAX_TRACKS {
                    return Err(invalid());
                }
                Ok(GridLine::Span(n))
            }
            [n] => {
                let n: i32 = n.parse().map_err(|_| invalid())?;
                // "A value of zero makes the declaration invalid."
                if n == 0 || n.unsigned_abs() as usize > MAX_TRACKS {
                    return Err(invalid());
                }
                Ok(GridLine::Line(n))
            }
            _ => Err(invalid()),
        }
    }

    /// 0-based track index this line starts, for a definite line.
    ///
    /// Line `-1` is the last line of the explicit grid. Lines before the
    /// first clamp to it.
    fn index(self, explicit_tracks: usize) -> Option<usize> {
        match self {
            GridLine::Line(n) if n > 0 => Some((n - 1) as usize),
            GridLine::Line(n) => {
                let lines = explicit_tracks as i64 + 1;
                Some((lines + i64::from(n)).max(0) as usize)
            }
            _ => None,
        }
    }

    const fn span(self) -> Option<usize> {
        match self {
            GridLine::Span(n) => Some(n as usize),
            _ => None,
        }
    }
}

/// Placement along one axis: a 0-based start track and a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisPlacement {
    start: usize,
    span: usize,
}

impl AxisPlacement {
    /// [§ 8.3.1 Grid Placement Conflict Handling](https://www.w3.org/TR/css-grid-1/#grid-placement-errors)
    ///
    /// An axis with no definite line starts at line 1.
    fn resolve(start: GridLine, end: GridLine, explicit_tracks: usize) -> Self {
        let span_of = |line: GridLine| line.span().unwrap_or(1);
        match (start.index(explicit_tracks), end.index(explicit_tracks)) {
            // "If the placement for a grid item contains two lines, and the
            // start line is further end-ward than the end line, swap the two
            // lines. If the start line is equal to the end line, remove the
            // end line."
            (Some(s), Some(e)) => {
                let (s, e) = if e < s { (e, s) } else { (s, e) };
                AxisPlacement {
                    start: s,
                    span: (e - s).max(1),
                }
            }
            (Some(s), None) => AxisPlacement {
                start: s,
                span: span_of(end),
            },
            (None, Some(e)) => {
                let span = span_of(start);
                // Lines before the first one are clamped into the grid.
                let e = e.max(span);
                AxisPlacement { start: e - span, span }
            }
            (None, None) => AxisPlacement {
                start: 0,
                span: span_of(start).max(span_of(end)),
            },
        }
    }

    const fn end(self) -> usize {
        self.start + self.span
    }
}

/// 0-based grid area for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridPosition {
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
}

/// A grid item with its child index and resolved position.
#[derive(Debug, Clone, Copy)]
struct GridItem {
    child_index: usize,
    position: GridPosition,
}

/// Main entry point for grid layout.
///
/// [§ 12 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)
///
/// The container's own box is already resolved and positioned; `cb` is its
/// content box. Returns the content height the rows need.
pub(crate) fn layout_grid(container: &mut LayoutBox, cb: &ContainingBlock, ctx: &mut LayoutContext<'_>) -> f32 {
    let content = container.metrics.content;
    let lengths = ctx.length_context(&container.style);

    // STEP 1: Read the explicit grid.
    let template_columns = track_list_property(container, "grid-template-columns", &lengths, ctx);
    let template_rows = track_list_property(container, "grid-template-rows", &lengths, ctx);
    let auto_column = implicit_track_property(container, "grid-auto-columns", &lengths, ctx);
    let auto_row = implicit_track_property(container, "grid-auto-rows", &lengths, ctx);
    let column_gap = gap_property(&container.style, "column-gap", cb.width_base(), ctx);
    let row_gap = gap_property(&container.style, "row-gap", cb.height_base(), ctx);

    // STEP 2 (§ 8.3): Place grid items.
    let items = place_grid_items(container, template_columns.len(), template_rows.len(), ctx);

    // Determine the actual grid dimensions from placed items.
    let mut num_cols = template_columns.len().max(1);
    let mut num_rows = template_rows.len().max(1);
    for item in &items {
        num_cols = num_cols.max(item.position.col_end);
        num_rows = num_rows.max(item.position.row_end);
    }
    let columns = complete_tracks(&template_columns, &auto_column, num_cols);
    let rows = complete_tracks(&template_rows, &auto_row, num_rows);

    // STEP 3 (§ 12.3): Resolve column track sizes.
    let column_sizes = resolve_track_sizes(&columns, cb.width, column_gap);
    log::debug!("grid {}: columns {column_sizes:?}", container.describe());

    // STEP 4: First pass, laying children out in their column span to
    // find content heights for auto row sizing.
    let mut item_heights = vec![0.0_f32; container.children.len()];
    for item in &items {
        let child = &mut container.children[item.child_index];
        let cell_width = track_span_size(&column_sizes, item.position.col_start, item.position.col_end, column_gap);
        let cell = ContainingBlock::with_auto_height(cell_width);
        let over = SizeOverride {
            width: stretched_width(child, &cell, ctx),
            height: None,
        };
        child.layout(&cell, Point::default(), ctx, over);
        item_heights[item.child_index] = child.margin_box().height;
    }

    // STEP 5 (§ 12.3): Resolve row track sizes.
    //
    // With a definite container height rows share it exactly as columns
    // share the width. Otherwise auto and fr rows fit their tallest item.
    let row_sizes = match cb.height_base() {
        Some(height) => resolve_track_sizes(&rows, height, row_gap),
        None => resolve_content_rows(&rows, &items, &item_heights),
    };
    log::debug!("grid {}: rows {row_sizes:?}", container.describe());

    // STEP 6: Compute track offsets.
    let col_offsets = compute_track_offsets(&column_sizes, column_gap, content.x);
    let row_offsets = compute_track_offsets(&row_sizes, row_gap, content.y);

    // STEP 7: Final pass, laying each child out in its grid area.
    //
    // [§ 6.2 Grid Item Sizing](https://www.w3.org/TR/css-grid-1/#grid-item-sizing)
    //
    // Items stretch to fill their area in both axes when their size is auto.
    for item in &items {
        let child = &mut container.children[item.child_index];
        let position = item.position;
        let cell = ContainingBlock::definite(
            track_span_size(&column_sizes, position.col_start, position.col_end, column_gap),
            track_span_size(&row_sizes, position.row_start, position.row_end, row_gap),
        );
        let used = resolve_box(child, &cell, ctx);
        let over = SizeOverride {
            width: stretched_width(child, &cell, ctx),
            height: used
                .height
                .is_auto()
                .then(|| used.clamp_height(cell.height - child.metrics.outer_vertical())),
        };
        let origin = Point::new(col_offsets[position.col_start], row_offsets[position.row_start]);
        child.layout(&cell, origin, ctx, over);
    }

    // STEP 8: Container height.
    //
    // [§ 12.1 Grid Sizing Algorithm](https://www.w3.org/TR/css-grid-1/#algo-overview)
    track_span_size(&row_sizes, 0, row_sizes.len(), row_gap)
}

/// Content width for an auto-width item filling a cell.
fn stretched_width(child: &mut LayoutBox, cell: &ContainingBlock, ctx: &mut LayoutContext<'_>) -> Option<f32> {
    let used = resolve_box(child, cell, ctx);
    used.width
        .is_auto()
        .then(|| used.clamp_width(cell.width - child.metrics.outer_horizontal()))
}

fn track_list_property(
    container: &LayoutBox,
    property: &str,
    lengths: &LengthContext,
    ctx: &mut LayoutContext<'_>,
) -> Vec<TrackSize> {
    let value = container.style.get_or(property, "none");
    parse_track_list(value, lengths).unwrap_or_else(|err| {
        ctx.diagnostics
            .report(DiagnosticKind::InvalidTrackList, Some(property), value, err.to_string());
        Vec::new()
    })
}

/// [§ 7.6 Implicit Track Sizing](https://www.w3.org/TR/css-grid-1/#auto-tracks)
///
/// "If multiple track sizes are given, the pattern is repeated as necessary
/// to find the size of the implicit tracks."
fn implicit_track_property(
    container: &LayoutBox,
    property: &str,
    lengths: &LengthContext,
    ctx: &mut LayoutContext<'_>,
) -> Vec<TrackSize> {
    let value = container.style.get_or(property, "auto");
    match parse_track_list(value, lengths) {
        Ok(tracks) if !tracks.is_empty() => tracks,
        Ok(_) => vec![TrackSize::Auto],
        Err(err) => {
            ctx.diagnostics
                .report(DiagnosticKind::InvalidTrackList, Some(property), value, err.to_string());
            vec![TrackSize::Auto]
        }
    }
}

/// Explicit tracks followed by implicit ones up to `count`.
fn complete_tracks(explicit: &[TrackSize], implicit: &[TrackSize], count: usize) -> Vec<TrackSize> {
    let mut tracks = explicit.to_vec();
    let mut pattern = implicit.iter().cycle();
    while tracks.len() < count {
        tracks.push(pattern.next().cloned().unwrap_or(TrackSize::Auto));
    }
    tracks
}

/// Parse one placement longhand, reporting malformed values.
fn placement_property(child: &LayoutBox, property: &str, fallback: GridLine, ctx: &mut LayoutContext<'_>) -> GridLine {
    let value = child.style.get_or(property, "auto");
    GridLine::parse(value).unwrap_or_else(|err| {
        ctx.diagnostics
            .report(DiagnosticKind::InvalidPlacement, Some(property), value, err.to_string());
        fallback
    })
}

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// Resolve every item's grid area from its placement longhands. Omitted
/// (`auto`) and unparseable start lines mean line 1, so an item with no
/// placement takes the 1x1 cell in the first row and column. Unparseable end
/// lines behave as `auto`. Items may overlap; there is no auto-placement.
fn place_grid_items(
    container: &LayoutBox,
    explicit_cols: usize,
    explicit_rows: usize,
    ctx: &mut LayoutContext<'_>,
) -> Vec<GridItem> {
    let mut items = Vec::with_capacity(container.children.len());
    for (child_index, child) in container.children.iter().enumerate() {
        let column = AxisPlacement::resolve(
            placement_property(child, "grid-column-start", GridLine::Line(1), ctx),
            placement_property(child, "grid-column-end", GridLine::Auto, ctx),
            explicit_cols,
        );
        let row = AxisPlacement::resolve(
            placement_property(child, "grid-row-start", GridLine::Line(1), ctx),
            placement_property(child, "grid-row-end", GridLine::Auto, ctx),
            explicit_rows,
        );
        items.push(GridItem {
            child_index,
            position: GridPosition {
                col_start: column.start,
                col_end: column.end(),
                row_start: row.start,
                row_end: row.end(),
            },
        });
    }
    items
}

/// [§ 12.3 Track Sizing Algorithm](https://www.w3.org/TR/css-grid-1/#algo-track-sizing)
///
/// Share `available` between tracks:
///
/// 1. Fixed tracks take their resolved size.
/// 2. Fr tracks share what is left in proportion to their factor.
/// 3. Auto tracks split whatever then remains equally, never below zero.
fn resolve_track_sizes(tracks: &[TrackSize], available: f32, gap: f32) -> Vec<f32> {
    let total_gaps = gap * tracks.len().saturating_sub(1) as f32;
    let mut sizes = vec![0.0_f32; tracks.len()];
    let mut auto_tracks = Vec::new();
    let mut total_fixed = 0.0_f32;
    let mut total_fr = 0.0_f32;

    // STEP 1: Initialize fixed tracks.
    for (i, track) in tracks.iter().enumerate() {
        match track {
            TrackSize::Fixed(dimension) => match dimension.resolve(Some(available)).length() {
                Some(px) => {
                    sizes[i] = px.max(0.0);
                    total_fixed += sizes[i];
                }
                None => auto_tracks.push(i),
            },
            TrackSize::Fr(fr) => total_fr += fr,
            TrackSize::Auto => auto_tracks.push(i),
        }
    }

    // STEP 2: Distribute remaining space to fr tracks.
    //
    // [§ 12.7.1 Find the Size of an fr](https://www.w3.org/TR/css-grid-1/#algo-find-fr-size)
    let free_space = (available - total_fixed - total_gaps).max(0.0);
    let mut total_flexible = 0.0_f32;
    if total_fr > 0.0 {
        let px_per_fr = free_space / total_fr;
        for (size, track) in sizes.iter_mut().zip(tracks) {
            if let TrackSize::Fr(fr) = track {
                *size = px_per_fr * fr;
                total_flexible += *size;
            }
        }
    }

    // STEP 3: Auto tracks share the rest.
    if !auto_tracks.is_empty() {
        let share = (free_space - total_flexible).max(0.0) / auto_tracks.len() as f32;
        for i in auto_tracks {
            sizes[i] = share;
        }
    }

    sizes
}

/// Row sizes for a container whose height depends on its content.
///
/// Fixed rows keep their size. Auto and fr rows take the tallest item that
/// starts in them.
fn resolve_content_rows(rows: &[TrackSize], items: &[GridItem], item_heights: &[f32]) -> Vec<f32> {
    let tallest_starting_in = |row: usize| {
        items
            .iter()
            .filter(|item| item.position.row_start == row)
            .map(|item| item_heights[item.child_index])
            .fold(0.0_f32, f32::max)
    };
    rows.iter()
        .enumerate()
        .map(|(i, track)| {
            let fixed = match track {
                TrackSize::Fixed(dimension) => dimension.resolve(None).length(),
                TrackSize::Fr(_) | TrackSize::Auto => None,
            };
            fixed.map_or_else(|| tallest_starting_in(i), |px| px.max(0.0))
        })
        .collect()
}

/// Compute the x or y offset for each track from track sizes and gaps.
fn compute_track_offsets(sizes: &[f32], gap: f32, start: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut pos = start;
    for &size in sizes {
        offsets.push(pos);
        pos += size + gap;
    }
    offsets
}

/// Compute the total size of a span of tracks including gaps between them.
fn track_span_size(sizes: &[f32], start: usize, end: usize, gap: f32) -> f32 {
    if start >= end || start >= sizes.len() {
        return 0.0;
    }
    let end = end.min(sizes.len());
    let track_sum: f32 = sizes[start..end].iter().sum();
    let num_gaps = (end - start).saturating_sub(1);
    track_sum + gap * num_gaps as f32
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::inline::ApproximateTextMeasure;
    use crate::layout::layout_box::{BoxSource, BoxType};
    use crate::layout::{Size, SpacingTable};
    use crate::style::ComputedStyle;
    use trellis_common::Diagnostics;

    fn styled(box_type: BoxType, declarations: &[(&str, &str)]) -> LayoutBox {
        let mut style = ComputedStyle::initial();
        for (property, value) in declarations {
            style.set(property, value);
        }
        LayoutBox::new(box_type, BoxSource::Anonymous, Arc::new(style))
    }

    fn grid(declarations: &[(&str, &str)], items: Vec<LayoutBox>) -> LayoutBox {
        let mut container = styled(BoxType::GridContainer, declarations);
        container.children = items;
        container
    }

    fn run(root: &mut LayoutBox, width: f32) -> Diagnostics {
        let measurer = ApproximateTextMeasure;
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(width, 600.0), &measurer, &spacing);
        root.layout(
            &ContainingBlock::definite(width, 600.0),
            Point::default(),
            &mut ctx,
            SizeOverride::NONE,
        );
        ctx.diagnostics
    }

    fn cell(item: &LayoutBox) -> (f32, f32, f32, f32) {
        let content = item.metrics.content;
        (content.x, content.y, content.width, content.height)
    }

    #[test]
    fn test_parse_track_list() {
        let lengths = LengthContext::default();
        assert_eq!(
            parse_track_list("100px 1fr auto 25%", &lengths).unwrap(),
            vec![
                TrackSize::Fixed(Dimension::Pixels(100.0)),
                TrackSize::Fr(1.0),
                TrackSize::Auto,
                TrackSize::Fixed(Dimension::Percent(25.0)),
            ]
        );
        assert_eq!(parse_track_list("repeat(3, 1fr)", &lengths).unwrap().len(), 3);
        assert_eq!(parse_track_list("50px repeat(2, 10px 2fr)", &lengths).unwrap().len(), 5);
        assert!(parse_track_list("none", &lengths).unwrap().is_empty());
        assert!(parse_track_list("1fr wide", &lengths).is_err());
        assert!(parse_track_list("repeat(0, 1fr)", &lengths).is_err());
    }

    #[test]
    fn test_parse_grid_line() {
        assert_eq!(GridLine::parse("auto"), Ok(GridLine::Auto));
        assert_eq!(GridLine::parse("2"), Ok(GridLine::Line(2)));
        assert_eq!(GridLine::parse("-1"), Ok(GridLine::Line(-1)));
        assert_eq!(GridLine::parse("span 3"), Ok(GridLine::Span(3)));
        assert!(GridLine::parse("0").is_err());
        assert!(GridLine::parse("header").is_err());
    }

    #[test]
    fn test_axis_placement_conflicts() {
        let resolve = AxisPlacement::resolve;
        assert_eq!(resolve(GridLine::Line(3), GridLine::Line(1), 4), AxisPlacement { start: 0, span: 2 });
        assert_eq!(resolve(GridLine::Line(2), GridLine::Line(2), 4), AxisPlacement { start: 1, span: 1 });
        assert_eq!(resolve(GridLine::Span(2), GridLine::Line(4), 4), AxisPlacement { start: 1, span: 2 });
        assert_eq!(resolve(GridLine::Line(-1), GridLine::Auto, 3), AxisPlacement { start: 3, span: 1 });
        // no definite line: line 1
        assert_eq!(resolve(GridLine::Auto, GridLine::Span(2), 3), AxisPlacement { start: 0, span: 2 });
        assert_eq!(resolve(GridLine::Auto, GridLine::Auto, 3), AxisPlacement { start: 0, span: 1 });
    }

    #[test]
    fn test_fr_distribution() {
        let mut root = grid(
            &[("grid-template-columns", "100px 1fr 1fr")],
            vec![
                styled(BoxType::Block, &[("height", "10px")]),
                styled(BoxType::Block, &[("grid-column-start", "2")]),
                styled(BoxType::Block, &[("grid-column-start", "3")]),
            ],
        );
        let _ = run(&mut root, 500.0);
        let widths: Vec<f32> = root.children.iter().map(|c| c.metrics.content.width).collect();
        assert_eq!(widths, vec![100.0, 200.0, 200.0]);
        assert_eq!(root.children[2].metrics.content.x, 300.0);
        // auto rows fit the tallest item, which the others stretch to
        assert_eq!(root.metrics.content.height, 10.0);
        assert_eq!(root.children[1].metrics.content.height, 10.0);
    }

    #[test]
    fn test_auto_tracks_share_leftover() {
        assert_eq!(
            resolve_track_sizes(&[TrackSize::Fixed(Dimension::Pixels(100.0)), TrackSize::Auto, TrackSize::Auto], 300.0, 0.0),
            vec![100.0, 100.0, 100.0]
        );
        // fr tracks take the free space first
        assert_eq!(
            resolve_track_sizes(&[TrackSize::Fr(1.0), TrackSize::Auto], 300.0, 0.0),
            vec![300.0, 0.0]
        );
        // never negative
        assert_eq!(
            resolve_track_sizes(&[TrackSize::Fixed(Dimension::Pixels(400.0)), TrackSize::Auto], 300.0, 0.0),
            vec![400.0, 0.0]
        );
    }

    #[test]
    fn test_line_placement_with_gaps() {
        let mut root = grid(
            &[
                ("grid-template-columns", "repeat(2, 1fr)"),
                ("grid-auto-rows", "40px"),
                ("row-gap", "10px"),
                ("column-gap", "20px"),
            ],
            vec![
                styled(BoxType::Block, &[]),
                styled(BoxType::Block, &[("grid-column-start", "2")]),
                styled(BoxType::Block, &[("grid-row-start", "2")]),
            ],
        );
        let _ = run(&mut root, 220.0);
        assert_eq!(cell(&root.children[0]), (0.0, 0.0, 100.0, 40.0));
        assert_eq!(cell(&root.children[1]), (120.0, 0.0, 100.0, 40.0));
        assert_eq!(cell(&root.children[2]), (0.0, 50.0, 100.0, 40.0));
        assert_eq!(root.metrics.content.height, 90.0);
    }

    #[test]
    fn test_explicit_placement_and_implicit_tracks() {
        let mut root = grid(
            &[("grid-template-columns", "50px 50px"), ("grid-auto-columns", "30px")],
            vec![
                styled(BoxType::Block, &[("grid-column-start", "3"), ("height", "5px")]),
                styled(BoxType::Block, &[("grid-column-start", "1"), ("grid-column-end", "span 2")]),
                styled(BoxType::Block, &[]),
            ],
        );
        let _ = run(&mut root, 500.0);
        // the third column is implicit
        assert_eq!(cell(&root.children[0]).0, 100.0);
        assert_eq!(cell(&root.children[0]).2, 30.0);
        // definite column, omitted row: row line 1
        assert_eq!(cell(&root.children[1]), (0.0, 0.0, 100.0, 5.0));
        // nothing given: the first cell, overlapping the item above
        assert_eq!(cell(&root.children[2]), (0.0, 0.0, 50.0, 5.0));
    }

    #[test]
    fn test_omitted_placement_takes_first_cell() {
        let mut root = grid(
            &[("grid-template-columns", "100px 100px 100px")],
            vec![
                styled(BoxType::Block, &[("height", "20px")]),
                styled(BoxType::Block, &[("height", "30px")]),
                styled(BoxType::Block, &[("grid-column-end", "auto"), ("grid-row-start", "auto")]),
            ],
        );
        let diagnostics = run(&mut root, 300.0);
        assert!(diagnostics.is_empty());
        for child in &root.children {
            let (x, y, width, _) = cell(child);
            assert_eq!((x, y, width), (0.0, 0.0, 100.0));
        }
        // one row, as tall as its tallest item
        assert_eq!(root.metrics.content.height, 30.0);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut root = grid(
            &[("grid-template-columns", "1fr banana")],
            vec![styled(BoxType::Block, &[("grid-row-start", "middle")])],
        );
        let diagnostics = run(&mut root, 100.0);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::InvalidTrackList).count(), 1);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::InvalidPlacement).count(), 1);
        // one implicit auto column holding the item at line 1
        assert_eq!(cell(&root.children[0]).2, 100.0);
    }

    #[test]
    fn test_definite_height_sizes_rows() {
        let mut root = grid(
            &[("height", "300px"), ("grid-template-rows", "1fr 2fr")],
            vec![styled(BoxType::Block, &[]), styled(BoxType::Block, &[("grid-row-start", "2")])],
        );
        let _ = run(&mut root, 100.0);
        assert_eq!(cell(&root.children[0]).3, 100.0);
        assert_eq!(cell(&root.children[1]), (0.0, 100.0, 100.0, 200.0));
    }
}
