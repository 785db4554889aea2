//! CSS Inline Layout and Line Box Model.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."
//!
//! [§ 10.8 Line height calculations: the 'line-height' and 'vertical-align' properties](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of the line box is determined by the rules given in the
//! section on line height calculations."
//!
//! The inline content of a block container is flattened into a sequence of
//! items (words, atomic inlines, inline box edges, forced breaks), broken
//! into lines greedily, and the resulting positions are written back into
//! the box tree. Every item sits at the top of its line box.

use serde::Serialize;
use strum_macros::{Display, EnumString};
use trellis_common::{DiagnosticKind, MeasureError};

use crate::style::ComputedStyle;
use crate::style::values::parse_number;

use super::box_model::{Point, Rect};
use super::layout_box::{BoxType, LayoutBox};
use super::resolve::resolve_edges;
use super::values::Dimension;
use super::{ContainingBlock, LayoutContext, SizeOverride};

/// Overflow below this is rounding noise, not a reason to break a line.
const LINE_FIT_EPSILON: f32 = 0.01;

/// [§ 3.4 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Cursive italic face.
    Italic,
    /// Slanted face.
    Oblique,
}

/// Everything the host needs to measure a run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    /// First family of the `font-family` list, unquoted.
    pub family: String,
    /// Font size in pixels.
    pub size: f32,
    /// Numeric weight, 400 is normal and 700 bold.
    pub weight: u16,
    /// Slant.
    pub style: FontStyle,
}

impl FontSpec {
    /// The font a box with `style` uses.
    #[must_use]
    pub fn from_style(style: &ComputedStyle) -> Self {
        let family = style
            .get_or("font-family", "serif")
            .split(',')
            .next()
            .unwrap_or("serif")
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        // [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
        let weight = match style.get_or("font-weight", "normal").trim() {
            "normal" => 400,
            "bold" | "bolder" => 700,
            "lighter" => 300,
            other => other
                .parse::<f32>()
                .ok()
                .filter(|w| w.is_finite())
                .map_or(400, |w| w.clamp(1.0, 1000.0) as u16),
        };
        FontSpec {
            family,
            size: style.font_size_px() as f32,
            weight,
            style: style.get_or("font-style", "normal").parse().unwrap_or_default(),
        }
    }
}

/// Text measurement supplied by the host.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
///
/// Implementations must be synchronous and free of side effects visible to
/// layout. A failure makes the run zero-width and is recorded as a
/// diagnostic.
pub trait TextMeasure {
    /// Advance width of `text` set in `font`, in pixels.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the host cannot measure the run.
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f32, MeasureError>;
}

/// Approximate text measurement using fixed ratios.
///
/// Without access to font data, the average advance of Latin glyphs in a
/// proportional face is taken as 0.6 × the font size. Bold text is 10%
/// wider. Used in tests and by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasure;

impl TextMeasure for ApproximateTextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<f32, MeasureError> {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        const BOLD_RATIO: f32 = 1.1;
        let width = text.chars().count() as f32 * font.size * CHAR_WIDTH_RATIO;
        Ok(if font.weight >= 600 { width * BOLD_RATIO } else { width })
    }
}

/// A piece of a text box placed on one line.
///
/// [§ 9.2.1.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
///
/// One text box produces a fragment per line it appears on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    /// The text shown, with collapsible whitespace already collapsed.
    pub text: String,
    /// Position and size in absolute coordinates.
    pub rect: Rect,
    /// Index of the line box within its inline formatting context.
    pub line: usize,
}

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// "This property describes how inline-level content of a block container
/// is aligned."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Flush right.
    Right,
    /// Centered.
    Center,
    /// Laid out as `left`; spacing is not stretched.
    Justify,
    /// `left` in a left-to-right context.
    Start,
    /// `right` in a left-to-right context.
    End,
}

impl TextAlign {
    /// Horizontal shift of a line with `free` unused pixels.
    #[must_use]
    pub fn offset(self, free: f32) -> f32 {
        let free = free.max(0.0);
        match self {
            TextAlign::Left | TextAlign::Justify | TextAlign::Start => 0.0,
            TextAlign::Right | TextAlign::End => free,
            TextAlign::Center => free / 2.0,
        }
    }
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// Collapse and wrap.
    #[default]
    Normal,
    /// Collapse, never wrap.
    Nowrap,
    /// Preserve everything, never wrap.
    Pre,
    /// Preserve everything, wrap.
    PreWrap,
    /// Collapse spaces, keep newlines, wrap.
    PreLine,
    /// Like `pre-wrap`.
    BreakSpaces,
}

impl WhiteSpace {
    pub(crate) fn from_style(style: &ComputedStyle) -> Self {
        style.get_or("white-space", "normal").trim().parse().unwrap_or_default()
    }

    /// "sequences of white space are collapsed"
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine)
    }

    /// Lines may break at soft wrap opportunities.
    #[must_use]
    pub const fn wraps(self) -> bool {
        !matches!(self, WhiteSpace::Nowrap | WhiteSpace::Pre)
    }

    /// Newlines are forced line breaks.
    #[must_use]
    pub const fn keeps_newlines(self) -> bool {
        !matches!(self, WhiteSpace::Normal | WhiteSpace::Nowrap)
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "normal: Tells user agents to set the used value to a 'reasonable' value
/// based on the font of the element. We recommend a used value for 'normal'
/// between 1.0 to 1.2."
///
/// "<number>: The used value of the property is this number multiplied by
/// the element's font size."
pub(crate) fn line_height(style: &ComputedStyle, ctx: &mut LayoutContext<'_>) -> f32 {
    const NORMAL_RATIO: f32 = 1.2;
    let font_size = style.font_size_px() as f32;
    let value = style.get_or("line-height", "normal").trim();
    if value.eq_ignore_ascii_case("normal") {
        return font_size * NORMAL_RATIO;
    }
    if let Ok(factor) = parse_number(value) {
        return (factor as f32 * font_size).max(0.0);
    }
    let lengths = ctx.length_context(style);
    match Dimension::parse(value, &lengths) {
        Ok(Dimension::Pixels(px)) => (px as f32).max(0.0),
        Ok(Dimension::Percent(p)) => (p as f32 * font_size / 100.0).max(0.0),
        Ok(dimension) => dimension
            .resolve(Some(font_size))
            .to_px_or(font_size * NORMAL_RATIO)
            .max(0.0),
        Err(err) => {
            ctx.diagnostics.report(
                DiagnosticKind::MalformedValue,
                Some("line-height"),
                value,
                err.to_string(),
            );
            font_size * NORMAL_RATIO
        }
    }
}

/// Min-content and max-content widths of a text box's own text.
pub(crate) fn text_content_widths(text_box: &LayoutBox, ctx: &mut LayoutContext<'_>) -> (f32, f32) {
    let Some(text) = text_box.text() else {
        return (0.0, 0.0);
    };
    let white_space = WhiteSpace::from_style(&text_box.style);
    let font = FontSpec::from_style(&text_box.style);
    let mut min = 0.0_f32;
    let mut max = 0.0_f32;
    for segment in segments(text, white_space) {
        if white_space.collapses_spaces() {
            let words: Vec<&str> = segment.split_whitespace().collect();
            let line = words.join(" ");
            max = max.max(ctx.measure(&line, &font));
            for word in words {
                min = min.max(ctx.measure(word, &font));
            }
        } else {
            max = max.max(ctx.measure(segment, &font));
            for token in preserved_tokens(segment) {
                min = min.max(ctx.measure(token, &font));
            }
        }
    }
    if !white_space.wraps() {
        min = max;
    }
    (min, max)
}

/// Lines of `text` as separated by forced breaks.
fn segments(text: &str, white_space: WhiteSpace) -> Vec<&str> {
    if white_space.keeps_newlines() {
        text.split('\n').collect()
    } else {
        vec![text]
    }
}

/// Alternating runs of spaces and non-spaces, all kept.
fn preserved_tokens(segment: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, ch) in segment.char_indices() {
        let is_space = ch == ' ' || ch == '\t';
        if in_space.is_some_and(|s| s != is_space) {
            tokens.push(&segment[start..i]);
            start = i;
        }
        in_space = Some(is_space);
    }
    if start < segment.len() {
        tokens.push(&segment[start..]);
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    /// A word (or a preserved run of spaces) of a text box.
    Word,
    /// An inline-block or inline flex/grid container, laid out as a unit.
    Atomic,
    /// Start edge of an inline box.
    Open,
    /// End edge of an inline box.
    Close,
    /// Forced line break.
    Break,
}

#[derive(Debug, Clone)]
struct Item {
    kind: ItemKind,
    /// Child indices from the container down to the box this item belongs to.
    path: Vec<usize>,
    text: String,
    width: f32,
    height: f32,
    /// Collapsible space in front of the item; dropped at the start of a line.
    space: f32,
    /// A line may end right before this item.
    breakable: bool,
}

impl Item {
    fn new(kind: ItemKind, path: &[usize]) -> Self {
        Item {
            kind,
            path: path.to_vec(),
            text: String::new(),
            width: 0.0,
            height: 0.0,
            space: 0.0,
            breakable: false,
        }
    }
}

/// Collapsed whitespace waiting for the next item.
#[derive(Debug, Clone, Copy)]
struct PendingSpace {
    width: f32,
    breakable: bool,
}

struct Flattener<'c, 'a> {
    ctx: &'c mut LayoutContext<'a>,
    cb: ContainingBlock,
    wraps: bool,
    items: Vec<Item>,
    pending: Option<PendingSpace>,
    /// The last thing seen was collapsible space, possibly already handed to
    /// an inline box edge.
    in_space: bool,
    after_atomic: bool,
}

impl Flattener<'_, '_> {
    fn push(&mut self, mut item: Item) {
        if item.kind != ItemKind::Close {
            if let Some(pending) = self.pending.take() {
                item.space = pending.width;
                item.breakable |= pending.breakable;
            }
            if self.after_atomic && self.wraps {
                item.breakable = true;
            }
            self.after_atomic = item.kind == ItemKind::Atomic;
        }
        if matches!(item.kind, ItemKind::Word | ItemKind::Atomic | ItemKind::Break) {
            self.in_space = false;
        }
        self.items.push(item);
    }

    fn pend_space(&mut self, width: f32, breakable: bool) {
        if !self.in_space {
            self.pending = Some(PendingSpace { width, breakable });
            self.in_space = true;
        }
    }

    fn flatten(&mut self, children: &mut [LayoutBox], path: &mut Vec<usize>) {
        for (i, child) in children.iter_mut().enumerate() {
            path.push(i);
            if child.is_text() {
                self.text(child, path);
            } else if child.box_type == BoxType::Inline {
                self.inline_box(child, path);
            } else {
                self.atomic(child, path);
            }
            let _ = path.pop();
        }
    }

    fn text(&mut self, text_box: &LayoutBox, path: &[usize]) {
        let Some(text) = text_box.text() else {
            return;
        };
        let white_space = WhiteSpace::from_style(&text_box.style);
        let font = FontSpec::from_style(&text_box.style);
        let height = line_height(&text_box.style, self.ctx);

        for (n, segment) in segments(text, white_space).into_iter().enumerate() {
            if n > 0 {
                // [§ 4.1.2 Segment Breaks](https://www.w3.org/TR/css-text-3/#line-break-transform)
                self.pending = None;
                self.push(Item::new(ItemKind::Break, path));
            }
            if white_space.collapses_spaces() {
                // [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
                //
                // "Any collapsible space immediately following another
                // collapsible space is collapsed to have zero advance width."
                let space_width = self.ctx.measure(" ", &font);
                let starts_with_space = segment.starts_with(char::is_whitespace);
                for (k, word) in segment.split_whitespace().enumerate() {
                    if k > 0 || starts_with_space {
                        self.pend_space(space_width, white_space.wraps());
                    }
                    let mut item = Item::new(ItemKind::Word, path);
                    item.width = self.ctx.measure(word, &font);
                    item.height = height;
                    item.text = word.to_string();
                    self.push(item);
                }
                if segment.ends_with(char::is_whitespace) {
                    self.pend_space(space_width, white_space.wraps());
                }
            } else {
                let mut after_space = false;
                for token in preserved_tokens(segment) {
                    let mut item = Item::new(ItemKind::Word, path);
                    item.width = self.ctx.measure(token, &font);
                    item.height = height;
                    item.text = token.to_string();
                    item.breakable = after_space && white_space.wraps();
                    after_space = token.starts_with([' ', '\t']);
                    self.push(item);
                }
            }
        }
    }

    fn inline_box(&mut self, inline: &mut LayoutBox, path: &mut Vec<usize>) {
        let edges = resolve_edges(&inline.style, self.cb.width_base(), self.ctx);
        inline.metrics.padding = edges.padding;
        inline.metrics.border = edges.border;
        inline.metrics.margin = edges.margin;

        let mut open = Item::new(ItemKind::Open, path);
        open.width = edges.margin.left + edges.border.left + edges.padding.left;
        open.height = line_height(&inline.style, self.ctx);
        self.push(open);

        self.flatten(&mut inline.children, path);

        let mut close = Item::new(ItemKind::Close, path);
        close.width = edges.margin.right + edges.border.right + edges.padding.right;
        self.push(close);
    }

    fn atomic(&mut self, atomic: &mut LayoutBox, path: &[usize]) {
        // [§ 10.3.9 'Inline-block', non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
        //
        // Laid out once at the origin, moved into its line afterwards.
        let cb = self.cb;
        atomic.layout(&cb, Point::default(), self.ctx, SizeOverride::NONE);
        let margin_box = atomic.margin_box();
        let mut item = Item::new(ItemKind::Atomic, path);
        item.width = margin_box.width;
        item.height = margin_box.height;
        item.breakable = self.wraps && !self.items.is_empty();
        self.push(item);
    }
}

#[derive(Debug, Clone, Copy)]
struct Placed {
    item: usize,
    /// Offset of the item's start from the line start.
    x: f32,
    /// Whether the item's collapsible space was kept.
    spaced: bool,
}

#[derive(Debug, Clone)]
struct Line {
    placed: Vec<Placed>,
    width: f32,
    height: f32,
}

impl Line {
    const fn new(strut: f32) -> Self {
        Line {
            placed: Vec::new(),
            width: 0.0,
            height: strut,
        }
    }
}

/// Width of the unbreakable run starting at each item, the item included.
fn run_widths(items: &[Item]) -> Vec<f32> {
    let mut runs = vec![0.0; items.len()];
    let mut continued = 0.0;
    for i in (0..items.len()).rev() {
        if items[i].kind == ItemKind::Break {
            continued = 0.0;
            continue;
        }
        let tail = match items.get(i + 1) {
            Some(next) if !next.breakable && next.kind != ItemKind::Break => continued,
            _ => 0.0,
        };
        runs[i] = items[i].width + tail;
        continued = items[i].space + runs[i];
    }
    runs
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "When several inline-level boxes cannot fit horizontally within a single
/// line box, they are distributed among two or more vertically-stacked line
/// boxes."
fn break_lines(items: &[Item], available: f32, strut: f32) -> Vec<Line> {
    let runs = run_widths(items);
    let mut lines = vec![Line::new(strut)];
    for (i, item) in items.iter().enumerate() {
        if item.kind == ItemKind::Break {
            lines.push(Line::new(strut));
            continue;
        }
        let mut line = lines.len() - 1;
        let has_content = !lines[line].placed.is_empty();
        let mut space = if has_content { item.space } else { 0.0 };
        if item.breakable && has_content && lines[line].width + space + runs[i] > available + LINE_FIT_EPSILON {
            lines.push(Line::new(strut));
            line += 1;
            space = 0.0;
        }
        let current = &mut lines[line];
        current.placed.push(Placed {
            item: i,
            x: current.width + space,
            spaced: space > 0.0,
        });
        current.width += space + item.width;
        current.height = current.height.max(item.height);
    }
    // A trailing forced break does not open a line of its own.
    if lines.len() > 1 && lines.last().is_some_and(|l| l.placed.is_empty()) {
        let _ = lines.pop();
    }
    lines
}

fn box_at_path<'b>(children: &'b mut [LayoutBox], path: &[usize]) -> Option<&'b mut LayoutBox> {
    let (first, rest) = path.split_first()?;
    let mut current = children.get_mut(*first)?;
    for &i in rest {
        current = current.children.get_mut(i)?;
    }
    Some(current)
}

/// Lay out the inline-level children of `container` in line boxes.
///
/// Returns the total height of the line boxes.
pub(crate) fn layout_inline_content(
    container: &mut LayoutBox,
    cb: &ContainingBlock,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let content = container.metrics.content;
    let strut = line_height(&container.style, ctx);
    let align: TextAlign = container
        .style
        .get_or("text-align", "left")
        .trim()
        .parse()
        .unwrap_or_default();
    let wraps = WhiteSpace::from_style(&container.style).wraps();

    // STEP 1: Flatten the inline content into items.
    let items = {
        let mut flattener = Flattener {
            ctx: &mut *ctx,
            cb: *cb,
            wraps,
            items: Vec::new(),
            pending: None,
            in_space: false,
            after_atomic: false,
        };
        let mut path = Vec::new();
        flattener.flatten(&mut container.children, &mut path);
        flattener.items
    };
    for child in &mut container.children {
        clear_fragments(child);
    }
    if items.is_empty() {
        finalize(&mut container.children, Point::new(content.x, content.y), strut);
        return 0.0;
    }

    // STEP 2: Break into lines.
    let lines = break_lines(&items, content.width, strut);

    // STEP 3: Position every item and write the result back.
    let mut line_top = content.y;
    let mut openers: Vec<(Vec<usize>, Rect)> = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        let offset = align.offset(content.width - line.width);
        for placed in &line.placed {
            let item = &items[placed.item];
            let x = content.x + offset + placed.x;
            let Some(target) = box_at_path(&mut container.children, &item.path) else {
                continue;
            };
            match item.kind {
                ItemKind::Word => place_word(target, item, x, line_top, line_index, placed.spaced),
                ItemKind::Atomic => {
                    let margin_box = target.margin_box();
                    target.translate(x - margin_box.x, line_top - margin_box.y);
                }
                ItemKind::Open => openers.push((
                    item.path.clone(),
                    Rect {
                        x: x + item.width,
                        y: line_top,
                        width: 0.0,
                        height: item.height,
                    },
                )),
                ItemKind::Close | ItemKind::Break => {}
            }
        }
        log::trace!(
            "line {line_index} of {}: width {} height {}",
            container.describe(),
            line.width,
            line.height
        );
        line_top += line.height;
    }

    // STEP 4: Size text and inline boxes from what they contain.
    for (path, rect) in openers {
        if let Some(inline) = box_at_path(&mut container.children, &path) {
            if inline.metrics.content == Rect::default() {
                inline.metrics.content = rect;
            }
        }
    }
    finalize(&mut container.children, Point::new(content.x, content.y), strut);

    line_top - content.y
}

fn place_word(target: &mut LayoutBox, item: &Item, x: f32, top: f32, line: usize, spaced: bool) {
    if let Some(last) = target.fragments.last_mut().filter(|f| f.line == line) {
        if spaced {
            last.text.push(' ');
        }
        last.text.push_str(&item.text);
        last.rect.width = x + item.width - last.rect.x;
        last.rect.height = last.rect.height.max(item.height);
        return;
    }
    target.fragments.push(TextFragment {
        text: item.text.clone(),
        rect: Rect {
            x,
            y: top,
            width: item.width,
            height: item.height,
        },
        line,
    });
}

fn clear_fragments(layout_box: &mut LayoutBox) {
    if layout_box.is_inline_box() {
        layout_box.fragments.clear();
        layout_box.metrics.content = Rect::default();
        for child in &mut layout_box.children {
            clear_fragments(child);
        }
    }
}

/// Content rectangles of text and inline boxes: the union of what was placed
/// inside them. Empty ones collapse to a point at `fallback`.
fn finalize(children: &mut [LayoutBox], fallback: Point, strut: f32) {
    for child in children {
        if child.is_text() {
            child.metrics.content = child
                .fragments
                .iter()
                .map(|f| f.rect)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(Rect {
                    x: fallback.x,
                    y: fallback.y,
                    width: 0.0,
                    height: 0.0,
                });
        } else if child.box_type == BoxType::Inline {
            let opener = child.metrics.content;
            finalize(&mut child.children, Point::new(opener.x, opener.y), strut);
            let union = child
                .children
                .iter()
                .filter(|c| !c.is_text() || !c.fragments.is_empty())
                .map(LayoutBox::margin_box)
                .reduce(|a, b| a.union(&b));
            child.metrics.content = match union {
                Some(rect) => rect,
                None if opener == Rect::default() => Rect {
                    x: fallback.x,
                    y: fallback.y,
                    width: 0.0,
                    height: strut,
                },
                None => opener,
            };
        }
    }
}

/// A text box laid out on its own, outside any line box: one fragment with
/// the collapsed text.
pub(crate) fn layout_lone_text(
    text_box: &mut LayoutBox,
    cb: &ContainingBlock,
    origin: Point,
    ctx: &mut LayoutContext<'_>,
) {
    let text = text_box
        .text()
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let font = FontSpec::from_style(&text_box.style);
    let width = ctx.measure(&text, &font).min(cb.width.max(0.0));
    let height = if text.is_empty() { 0.0 } else { line_height(&text_box.style, ctx) };
    let rect = Rect {
        x: origin.x,
        y: origin.y,
        width,
        height,
    };
    text_box.metrics.content = rect;
    text_box.fragments.clear();
    if !text.is_empty() {
        text_box.fragments.push(TextFragment { text, rect, line: 0 });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trellis_common::Diagnostics;
    use trellis_dom::NodeId;

    use super::*;
    use crate::layout::layout_box::BoxSource;
    use crate::layout::{Size, SpacingTable};

    /// 10px per character with a 16px font.
    struct TenPx;

    impl TextMeasure for TenPx {
        fn measure(&self, text: &str, _font: &FontSpec) -> Result<f32, MeasureError> {
            Ok(text.chars().count() as f32 * 10.0)
        }
    }

    struct Failing;

    impl TextMeasure for Failing {
        fn measure(&self, _text: &str, font: &FontSpec) -> Result<f32, MeasureError> {
            Err(MeasureError::FontUnavailable(font.family.clone()))
        }
    }

    fn style(declarations: &[(&str, &str)]) -> Arc<ComputedStyle> {
        let mut style = ComputedStyle::initial();
        for (property, value) in declarations {
            style.set(property, value);
        }
        Arc::new(style)
    }

    fn text(content: &str, declarations: &[(&str, &str)]) -> LayoutBox {
        LayoutBox::new(
            BoxType::Inline,
            BoxSource::Text {
                node: NodeId(9),
                text: content.to_string(),
            },
            style(declarations),
        )
    }

    fn block(declarations: &[(&str, &str)], children: Vec<LayoutBox>) -> LayoutBox {
        let mut b = LayoutBox::new(BoxType::Block, BoxSource::Anonymous, style(declarations));
        b.children = children;
        b
    }

    fn run_with(root: &mut LayoutBox, width: f32, measurer: &dyn TextMeasure) -> Diagnostics {
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(width, 600.0), measurer, &spacing);
        root.layout(
            &ContainingBlock::definite(width, 600.0),
            Point::default(),
            &mut ctx,
            SizeOverride::NONE,
        );
        ctx.diagnostics
    }

    fn run(root: &mut LayoutBox, width: f32) -> Diagnostics {
        run_with(root, width, &TenPx)
    }

    #[test]
    fn test_words_wrap_at_available_width() {
        // "aaa bbb ccc": 30px words, 10px spaces, 75px line
        let mut root = block(&[], vec![text("aaa bbb ccc", &[])]);
        let _ = run(&mut root, 75.0);
        let fragments = &root.children[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "aaa bbb");
        assert_eq!(fragments[0].rect.width, 70.0);
        assert_eq!(fragments[1].text, "ccc");
        assert_eq!(fragments[1].rect.x, 0.0);
        assert_eq!(fragments[1].rect.y, 19.2);
        assert!((root.metrics.content.height - 38.4).abs() < 0.01);
    }

    #[test]
    fn test_whitespace_collapses_across_boxes() {
        let mut span = LayoutBox::new(
            BoxType::Inline,
            BoxSource::Element {
                node: NodeId(2),
                tag: "span".to_string(),
            },
            style(&[("padding-left", "5px")]),
        );
        span.children.push(text("  b  ", &[]));
        let mut root = block(&[], vec![text("a   ", &[]), span, text(" c", &[])]);
        let _ = run(&mut root, 500.0);

        assert_eq!(root.children[0].fragments[0].rect.x, 0.0);
        // "a" + space + 5px padding
        assert_eq!(root.children[1].children[0].fragments[0].rect.x, 25.0);
        assert_eq!(root.children[1].children[0].fragments[0].text, "b");
        assert_eq!(root.children[2].fragments[0].rect.x, 45.0);
        assert_eq!(root.children[1].metrics.content.x, 25.0);
        assert_eq!(root.children[1].metrics.padding.left, 5.0);
    }

    #[test]
    fn test_nowrap_and_pre() {
        let mut root = block(&[], vec![text("aaa bbb ccc", &[("white-space", "nowrap")])]);
        let _ = run(&mut root, 40.0);
        assert_eq!(root.children[0].fragments.len(), 1);
        assert_eq!(root.children[0].fragments[0].rect.width, 110.0);

        let mut root = block(&[], vec![text("a  b\nc\n", &[("white-space", "pre")])]);
        let _ = run(&mut root, 500.0);
        let fragments = &root.children[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "a  b");
        assert_eq!(fragments[0].rect.width, 40.0);
        assert_eq!(fragments[1].text, "c");
        assert_eq!(fragments[1].line, 1);
    }

    #[test]
    fn test_text_align() {
        let mut root = block(&[("text-align", "center")], vec![text("ab", &[])]);
        let _ = run(&mut root, 100.0);
        assert_eq!(root.children[0].fragments[0].rect.x, 40.0);

        let mut root = block(&[("text-align", "right")], vec![text("ab", &[])]);
        let _ = run(&mut root, 100.0);
        assert_eq!(root.children[0].fragments[0].rect.x, 80.0);
    }

    #[test]
    fn test_line_height_values() {
        let mut root = block(&[("line-height", "2")], vec![text("x", &[("line-height", "2")])]);
        let _ = run(&mut root, 100.0);
        assert_eq!(root.metrics.content.height, 32.0);

        let mut root = block(&[("line-height", "10px")], vec![text("x", &[("line-height", "24px")])]);
        let _ = run(&mut root, 100.0);
        assert_eq!(root.metrics.content.height, 24.0);
    }

    #[test]
    fn test_inline_block_sits_on_the_line() {
        let atomic = LayoutBox::new(
            BoxType::InlineBlock,
            BoxSource::Anonymous,
            style(&[("width", "50px"), ("height", "30px")]),
        );
        let mut root = block(&[], vec![text("ab ", &[]), atomic, text(" cd", &[])]);
        let _ = run(&mut root, 500.0);
        assert_eq!(root.children[1].metrics.content.x, 30.0);
        assert_eq!(root.children[1].metrics.content.y, 0.0);
        assert_eq!(root.children[2].fragments[0].rect.x, 90.0);
        assert_eq!(root.metrics.content.height, 30.0);
    }

    #[test]
    fn test_measure_failure_is_zero_width() {
        let mut root = block(&[], vec![text("abc def", &[])]);
        let diagnostics = run_with(&mut root, 100.0, &Failing);
        assert_eq!(root.children[0].fragments[0].rect.width, 0.0);
        assert!(diagnostics.of_kind(DiagnosticKind::MeasureFailed).count() >= 1);
    }

    #[test]
    fn test_font_spec_from_style() {
        let font = FontSpec::from_style(&style(&[
            ("font-family", "\"Helvetica Neue\", Arial, sans-serif"),
            ("font-weight", "bold"),
            ("font-style", "italic"),
            ("font-size", "20px"),
        ]));
        assert_eq!(font.family, "Helvetica Neue");
        assert_eq!(font.weight, 700);
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.size, 20.0);
        let width = ApproximateTextMeasure.measure("abcd", &font).unwrap();
        assert!((width - 52.8).abs() < 0.001);
    }

    #[test]
    fn test_text_content_widths() {
        let measurer = TenPx;
        let spacing = SpacingTable::new();
        let mut ctx = LayoutContext::new(Size::new(100.0, 100.0), &measurer, &spacing);
        assert_eq!(text_content_widths(&text(" ab  cde f ", &[]), &mut ctx), (30.0, 80.0));
        assert_eq!(
            text_content_widths(&text("ab cde", &[("white-space", "nowrap")]), &mut ctx),
            (60.0, 60.0)
        );
    }
}
