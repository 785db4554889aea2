//! CSS Layout Engine
//!
//! This module turns styled nodes into a tree of positioned boxes.
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Flexible Box Layout Module Level 1](https://www.w3.org/TR/css-flexbox-1/)
//! - [CSS Grid Layout Module Level 1](https://www.w3.org/TR/css-grid-1/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles, edge sizes and box metrics
//! - [`values`] - Specified dimensions and `auto`
//! - [`builder`] - Box tree construction from styled nodes
//! - [`resolve`] - Box model resolution (edges, width/height constraints)
//! - [`layout_box`] - Layout box type and the layout dispatch
//! - [`block`] - Block formatting context
//! - [`inline`] - Inline formatting context and text measurement
//! - [`intrinsic`] - Min/max-content sizes
//! - [`flex`] - Flex layout
//! - [`grid`] - Grid layout
//! - [`positioned`] - Relative positioning
//! - [`stacking`] - Paint order by z-index
//! - [`spacing`] - Tag-pair spacing between block siblings

pub mod block;
pub mod box_model;
pub mod builder;
pub mod flex;
pub mod grid;
pub mod inline;
pub mod intrinsic;
pub mod layout_box;
pub mod positioned;
pub mod resolve;
pub mod spacing;
pub mod stacking;
pub mod values;

pub use box_model::{BoxMetrics, EdgeSizes, Point, Rect};
pub use builder::build_box_tree;
pub use inline::{ApproximateTextMeasure, FontSpec, FontStyle, TextFragment, TextMeasure};
pub use layout_box::{BoxSource, BoxType, LayoutBox};
pub use resolve::{UsedSizes, resolve_box};
pub use spacing::SpacingTable;
pub use stacking::{ZIndex, finalize_stacking_order};
pub use values::{AutoOr, Dimension};

use serde::Serialize;
use strum_macros::{Display, EnumString};
use trellis_common::{DiagnosticKind, Diagnostics};

use crate::style::{ComputedStyle, LengthContext};

/// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The single-keyword `display` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DisplayValue {
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// "The element itself does not generate any boxes, but its children and
    /// pseudo-elements still generate boxes and text runs as normal."
    Contents,
    /// Block-level block container.
    Block,
    /// Block-level box establishing an independent formatting context.
    FlowRoot,
    /// Block box with a marker. Markers are not generated.
    ListItem,
    /// Inline box.
    Inline,
    /// Atomic inline-level block container.
    InlineBlock,
    /// Block-level flex container.
    Flex,
    /// Inline-level flex container.
    InlineFlex,
    /// Block-level grid container.
    Grid,
    /// Inline-level grid container.
    InlineGrid,
    /// Tables lay out as blocks.
    Table,
    /// Inline-level table, laid out as an inline-block.
    InlineTable,
    /// Table part, laid out as a block.
    TableRow,
    /// Table part, laid out as a block.
    TableCell,
    /// Table part, laid out as a block.
    TableRowGroup,
    /// Table part, laid out as a block.
    TableHeaderGroup,
    /// Table part, laid out as a block.
    TableFooterGroup,
    /// Table part, laid out as a block.
    TableColumn,
    /// Table part, laid out as a block.
    TableColumnGroup,
    /// Table part, laid out as a block.
    TableCaption,
}

impl DisplayValue {
    /// The box this value generates, or `None` for `none` and `contents`.
    #[must_use]
    pub const fn box_type(self) -> Option<BoxType> {
        match self {
            Self::None | Self::Contents => None,
            Self::Inline => Some(BoxType::Inline),
            Self::InlineBlock | Self::InlineTable => Some(BoxType::InlineBlock),
            Self::Flex | Self::InlineFlex => Some(BoxType::FlexContainer),
            Self::Grid | Self::InlineGrid => Some(BoxType::GridContainer),
            _ => Some(BoxType::Block),
        }
    }

    /// [§ 2.1 Outer display roles](https://www.w3.org/TR/css-display-3/#outer-role)
    ///
    /// Whether the box participates in an inline formatting context.
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(
            self,
            Self::Inline | Self::InlineBlock | Self::InlineTable | Self::InlineFlex | Self::InlineGrid
        )
    }

    /// Parse a `display` value, recording unknown keywords.
    ///
    /// Unknown values lay out as `block`.
    pub fn from_style(value: &str, diagnostics: &mut Diagnostics) -> Self {
        value.trim().parse().unwrap_or_else(|_| {
            diagnostics.report(
                DiagnosticKind::UnknownDisplay,
                Some("display"),
                value,
                "unrecognized display value, using block",
            );
            Self::Block
        })
    }
}

// [HTML Living Standard § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
// defines the default display of HTML elements.

/// Returns the default display value for an HTML element.
///
/// `None` means the element is hidden (`display: none`).
///
/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
#[must_use]
pub fn default_display_for_element(tag_name: &str) -> Option<DisplayValue> {
    // [§ 15.3.1 Hidden elements]
    // "The following elements must have their display set to none:"
    const HIDDEN: &[&str] = &[
        "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
        "param", "rp", "script", "style", "template", "title",
    ];
    // [§ 15.3.3 Flow content]
    const BLOCK: &[&str] = &[
        "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
        "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
        "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend", "listing", "main",
        "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary", "ul", "xmp",
    ];
    // [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
    const INLINE: &[&str] = &[
        "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "br", "cite", "code", "data", "del",
        "dfn", "em", "font", "i", "ins", "kbd", "label", "mark", "nobr", "q", "ruby", "s", "samp",
        "small", "span", "strike", "strong", "sub", "sup", "time", "tt", "u", "var", "wbr",
    ];

    let tag_name = tag_name.to_ascii_lowercase();
    let tag_name = tag_name.as_str();
    if HIDDEN.contains(&tag_name) {
        return None;
    }
    if BLOCK.contains(&tag_name) {
        return Some(DisplayValue::Block);
    }
    if INLINE.contains(&tag_name) {
        return Some(DisplayValue::Inline);
    }
    match tag_name {
        // [§ 15.3.8 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists)
        "li" => Some(DisplayValue::ListItem),
        // [§ 15.3.9 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2)
        "table" => Some(DisplayValue::Table),
        "tr" => Some(DisplayValue::TableRow),
        "td" | "th" => Some(DisplayValue::TableCell),
        "thead" => Some(DisplayValue::TableHeaderGroup),
        "tbody" => Some(DisplayValue::TableRowGroup),
        "tfoot" => Some(DisplayValue::TableFooterGroup),
        "caption" => Some(DisplayValue::TableCaption),
        // Replaced elements and form controls are atomic inlines.
        "img" | "video" | "canvas" | "iframe" | "object" | "embed" | "svg" | "input"
        | "button" | "textarea" | "select" => Some(DisplayValue::InlineBlock),
        // Flow content and unknown tags are blocks.
        _ => Some(DisplayValue::Block),
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// `width × height`
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "The position and size of an element's box(es) are sometimes calculated
/// relative to a certain rectangle, called the containing block of the
/// element."
///
/// Passed down by value during layout and never stored on a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainingBlock {
    /// Width available to children.
    pub width: f32,
    /// Height available to children; meaningful only when definite.
    pub height: f32,
    /// Whether `width` may resolve percentages.
    pub width_definite: bool,
    /// Whether `height` may resolve percentages.
    pub height_definite: bool,
}

impl ContainingBlock {
    /// Both dimensions definite.
    #[must_use]
    pub const fn definite(width: f32, height: f32) -> Self {
        ContainingBlock {
            width,
            height,
            width_definite: true,
            height_definite: true,
        }
    }

    /// Definite width, height depending on content.
    #[must_use]
    pub const fn with_auto_height(width: f32) -> Self {
        ContainingBlock {
            width,
            height: 0.0,
            width_definite: true,
            height_definite: false,
        }
    }

    /// Percentage base for horizontal properties.
    #[must_use]
    pub const fn width_base(&self) -> Option<f32> {
        if self.width_definite { Some(self.width) } else { None }
    }

    /// Percentage base for `height`, `min-height` and `max-height`.
    #[must_use]
    pub const fn height_base(&self) -> Option<f32> {
        if self.height_definite { Some(self.height) } else { None }
    }
}

/// Content sizes imposed on a box by its parent's formatting context (flex
/// target sizes, stretched cross sizes, grid areas, shrink-to-fit widths).
///
/// Overrides win over the box's own `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeOverride {
    /// Forced content width.
    pub width: Option<f32>,
    /// Forced content height.
    pub height: Option<f32>,
}

impl SizeOverride {
    /// No override.
    pub const NONE: Self = SizeOverride {
        width: None,
        height: None,
    };

    /// Force only the content width.
    #[must_use]
    pub const fn width(width: f32) -> Self {
        SizeOverride {
            width: Some(width),
            height: None,
        }
    }
}

/// Everything a layout pass shares across boxes.
pub struct LayoutContext<'a> {
    /// Initial containing block size.
    pub viewport: Size,
    /// Font size for `rem` units.
    pub root_font_size: f32,
    /// Host-supplied text measurement.
    pub measurer: &'a dyn TextMeasure,
    /// Extra spacing between block siblings.
    pub spacing: &'a SpacingTable,
    /// Non-fatal problems found while laying out.
    pub diagnostics: Diagnostics,
}

impl std::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("viewport", &self.viewport)
            .field("root_font_size", &self.root_font_size)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl<'a> LayoutContext<'a> {
    /// A context with a 16px root font size and no diagnostics yet.
    #[must_use]
    pub fn new(viewport: Size, measurer: &'a dyn TextMeasure, spacing: &'a SpacingTable) -> Self {
        LayoutContext {
            viewport,
            root_font_size: 16.0,
            measurer,
            spacing,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Length context for resolving values of an element with `style`.
    #[must_use]
    pub fn length_context(&self, style: &ComputedStyle) -> LengthContext {
        LengthContext {
            font_size: style.font_size_px(),
            root_font_size: f64::from(self.root_font_size),
            viewport_width: f64::from(self.viewport.width),
            viewport_height: f64::from(self.viewport.height),
            percent_base: None,
        }
    }

    /// Measure `text`, treating failures as zero width.
    pub fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self.measurer.measure(text, font) {
            Ok(width) if width.is_finite() => width.max(0.0),
            Ok(width) => {
                self.diagnostics.report(
                    DiagnosticKind::MeasureFailed,
                    None,
                    text,
                    format!("measurement returned {width}"),
                );
                0.0
            }
            Err(err) => {
                self.diagnostics
                    .report(DiagnosticKind::MeasureFailed, None, text, err.to_string());
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keywords() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(DisplayValue::from_style("inline-block", &mut diagnostics), DisplayValue::InlineBlock);
        assert_eq!(DisplayValue::from_style(" FLEX ", &mut diagnostics), DisplayValue::Flex);
        assert_eq!(DisplayValue::from_style("table-row-group", &mut diagnostics).box_type(), Some(BoxType::Block));
        assert!(diagnostics.is_empty());

        assert_eq!(DisplayValue::from_style("sideways", &mut diagnostics), DisplayValue::Block);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnknownDisplay).count(), 1);
    }

    #[test]
    fn test_default_display_table() {
        assert_eq!(default_display_for_element("div"), Some(DisplayValue::Block));
        assert_eq!(default_display_for_element("span"), Some(DisplayValue::Inline));
        assert_eq!(default_display_for_element("img"), Some(DisplayValue::InlineBlock));
        assert_eq!(default_display_for_element("li"), Some(DisplayValue::ListItem));
        assert_eq!(default_display_for_element("script"), None);
        assert_eq!(default_display_for_element("STRONG"), Some(DisplayValue::Inline));
        assert_eq!(default_display_for_element("made-up"), Some(DisplayValue::Block));
        assert_eq!(default_display_for_element("custom-widget"), Some(DisplayValue::Block));
    }

    #[test]
    fn test_containing_block_bases() {
        let cb = ContainingBlock::with_auto_height(300.0);
        assert_eq!(cb.width_base(), Some(300.0));
        assert_eq!(cb.height_base(), None);
    }
}
