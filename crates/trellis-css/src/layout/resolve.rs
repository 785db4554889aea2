//! Box Model Resolver
//!
//! [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! Turns the computed strings of one box into pixel edges and used sizes
//! against a containing block. `auto` widths and heights stay `auto`: the
//! formatting context decides what they mean.

use trellis_common::DiagnosticKind;

use crate::style::{ComputedStyle, LengthContext};

use super::box_model::EdgeSizes;
use super::layout_box::{BoxSource, LayoutBox};
use super::values::{AutoOr, Dimension};
use super::{ContainingBlock, LayoutContext};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Which margins were specified as `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoMargins {
    /// `margin-top: auto`
    pub top: bool,
    /// `margin-right: auto`
    pub right: bool,
    /// `margin-bottom: auto`
    pub bottom: bool,
    /// `margin-left: auto`
    pub left: bool,
}

/// Padding, border and margin of a box in pixels. Auto margins are 0 here
/// and flagged in `auto_margins`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedEdges {
    /// Padding widths.
    pub padding: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Margin widths.
    pub margin: EdgeSizes,
    /// Margins given as `auto`.
    pub auto_margins: AutoMargins,
}

impl ResolvedEdges {
    /// Horizontal padding + border.
    #[must_use]
    pub fn inner_horizontal(&self) -> f32 {
        self.padding.horizontal() + self.border.horizontal()
    }

    /// Vertical padding + border.
    #[must_use]
    pub fn inner_vertical(&self) -> f32 {
        self.padding.vertical() + self.border.vertical()
    }

    /// Horizontal margin + border + padding.
    #[must_use]
    pub fn outer_horizontal(&self) -> f32 {
        self.inner_horizontal() + self.margin.horizontal()
    }

    /// Vertical margin + border + padding.
    #[must_use]
    pub fn outer_vertical(&self) -> f32 {
        self.inner_vertical() + self.margin.vertical()
    }
}

/// Used sizes of a box, all in content-box terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UsedSizes {
    /// Content width, or `auto`.
    pub width: AutoOr,
    /// Content height, or `auto`.
    pub height: AutoOr,
    /// Lower bound for the content width.
    pub min_width: f32,
    /// Upper bound for the content width.
    pub max_width: Option<f32>,
    /// Lower bound for the content height.
    pub min_height: f32,
    /// Upper bound for the content height.
    pub max_height: Option<f32>,
    /// Margins given as `auto`.
    pub auto_margins: AutoMargins,
}

impl UsedSizes {
    /// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    ///
    /// "If the tentative used width is greater than 'max-width', the rules
    /// above are applied again, but this time using the computed value of
    /// 'max-width' as the computed value for 'width'. If the resulting width
    /// is smaller than 'min-width', the rules above are applied again, but
    /// this time using the value of 'min-width' as the computed value for
    /// 'width'."
    #[must_use]
    pub fn clamp_width(&self, width: f32) -> f32 {
        let width = self.max_width.map_or(width, |max| width.min(max));
        width.max(self.min_width).max(0.0)
    }

    /// [§ 10.7 Minimum and maximum heights](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    #[must_use]
    pub fn clamp_height(&self, height: f32) -> f32 {
        let height = self.max_height.map_or(height, |max| height.min(max));
        height.max(self.min_height).max(0.0)
    }
}

/// Resolve `box.metrics` edges against `cb` and return the used sizes.
///
/// Only `box.metrics` is written. Text boxes carry no edges of their own.
pub fn resolve_box(
    layout_box: &mut LayoutBox,
    cb: &ContainingBlock,
    ctx: &mut LayoutContext<'_>,
) -> UsedSizes {
    if matches!(layout_box.source, BoxSource::Text { .. }) {
        layout_box.metrics.padding = EdgeSizes::default();
        layout_box.metrics.border = EdgeSizes::default();
        layout_box.metrics.margin = EdgeSizes::default();
        return UsedSizes::default();
    }

    let style = std::sync::Arc::clone(&layout_box.style);
    let edges = resolve_edges(&style, cb.width_base(), ctx);
    layout_box.metrics.padding = edges.padding;
    layout_box.metrics.border = edges.border;
    layout_box.metrics.margin = edges.margin;

    let lengths = ctx.length_context(&style);
    let width = size_property(&style, "width", &lengths, ctx).resolve(cb.width_base());
    let height = size_property(&style, "height", &lengths, ctx).resolve(cb.height_base());
    let min_width = min_property(&style, "min-width", &lengths, cb.width_base(), ctx);
    let max_width = max_property(&style, "max-width", &lengths, cb.width_base(), ctx);
    let min_height = min_property(&style, "min-height", &lengths, cb.height_base(), ctx);
    let max_height = max_property(&style, "max-height", &lengths, cb.height_base(), ctx);

    let mut used = UsedSizes {
        width,
        height,
        min_width,
        max_width,
        min_height,
        max_height,
        auto_margins: edges.auto_margins,
    };

    // [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
    //
    // "border-box: the specified width and height (and respective min/max
    // properties) on this element determine the border box of the element."
    //
    // Everything downstream works in content-box terms.
    if style.get("box-sizing").is_some_and(|v| v.eq_ignore_ascii_case("border-box")) {
        let dx = edges.inner_horizontal();
        let dy = edges.inner_vertical();
        let shrink = |v: f32, by: f32| (v - by).max(0.0);
        if let AutoOr::Length(w) = used.width {
            used.width = AutoOr::Length(shrink(w, dx));
        }
        if let AutoOr::Length(h) = used.height {
            used.height = AutoOr::Length(shrink(h, dy));
        }
        used.min_width = shrink(used.min_width, dx);
        used.min_height = shrink(used.min_height, dy);
        used.max_width = used.max_width.map(|m| shrink(m, dx));
        used.max_height = used.max_height.map(|m| shrink(m, dy));
    }

    log::trace!(
        "resolved {}: width={:?} height={:?} edges={:?}",
        layout_box.describe(),
        used.width,
        used.height,
        edges
    );
    used
}

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
/// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
/// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "The percentage is calculated with respect to the width of the generated
/// box's containing block. Note that this is true for 'padding-top' and
/// 'padding-bottom' as well."
///
/// Malformed values resolve to 0 and are reported.
pub fn resolve_edges(
    style: &ComputedStyle,
    width_base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> ResolvedEdges {
    let lengths = ctx.length_context(style);
    let mut edges = ResolvedEdges::default();
    let mut auto = [false; 4];

    for (i, side) in SIDES.iter().enumerate() {
        // "Unlike margin properties, values for padding values cannot be negative."
        let padding = edge_length(style, &format!("padding-{side}"), &lengths, width_base, ctx)
            .to_px_or(0.0)
            .max(0.0);
        let margin_property = format!("margin-{side}");
        let margin = edge_length(style, &margin_property, &lengths, width_base, ctx);
        auto[i] = margin.is_auto();
        let border = border_width(style, side, &lengths, ctx);

        let margin = margin.to_px_or(0.0);
        match i {
            0 => {
                edges.padding.top = padding;
                edges.margin.top = margin;
                edges.border.top = border;
            }
            1 => {
                edges.padding.right = padding;
                edges.margin.right = margin;
                edges.border.right = border;
            }
            2 => {
                edges.padding.bottom = padding;
                edges.margin.bottom = margin;
                edges.border.bottom = border;
            }
            _ => {
                edges.padding.left = padding;
                edges.margin.left = margin;
                edges.border.left = border;
            }
        }
    }
    edges.auto_margins = AutoMargins {
        top: auto[0],
        right: auto[1],
        bottom: auto[2],
        left: auto[3],
    };
    edges
}

/// A margin or padding side. `auto` survives only for margins; a percentage
/// without a base counts as 0.
fn edge_length(
    style: &ComputedStyle,
    property: &str,
    lengths: &LengthContext,
    width_base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> AutoOr {
    let value = style.get_or(property, "0");
    let dimension = match Dimension::parse(value, lengths) {
        Ok(Dimension::Auto) if !property.starts_with("margin") => {
            malformed(ctx, property, value, "auto is not allowed here");
            return AutoOr::Length(0.0);
        }
        Ok(dimension) => dimension,
        Err(err) => {
            malformed(ctx, property, value, err.to_string());
            return AutoOr::Length(0.0);
        }
    };
    match dimension {
        Dimension::Auto => AutoOr::Auto,
        other => AutoOr::Length(other.resolve(width_base).to_px_or(0.0)),
    }
}

/// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "thin <= medium <= thick". A side whose style is `none` or `hidden` has
/// no border.
fn border_width(
    style: &ComputedStyle,
    side: &str,
    lengths: &LengthContext,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let border_style = style.get_or(&format!("border-{side}-style"), "none");
    if border_style.eq_ignore_ascii_case("none") || border_style.eq_ignore_ascii_case("hidden") {
        return 0.0;
    }
    let property = format!("border-{side}-width");
    let value = style.get_or(&property, "medium");
    match value.to_ascii_lowercase().as_str() {
        "thin" => 1.0,
        "medium" => 3.0,
        "thick" => 5.0,
        _ => match Dimension::parse(value, lengths) {
            Ok(Dimension::Pixels(px)) => (px as f32).max(0.0),
            Ok(_) => {
                malformed(ctx, &property, value, "border width must be an absolute length");
                0.0
            }
            Err(err) => {
                malformed(ctx, &property, value, err.to_string());
                0.0
            }
        },
    }
}

/// `width` / `height`. Keywords such as `fit-content` behave as `auto`.
/// Unparseable values are reported and resolve to 0.
fn size_property(
    style: &ComputedStyle,
    property: &str,
    lengths: &LengthContext,
    ctx: &mut LayoutContext<'_>,
) -> Dimension {
    let value = style.get_or(property, "auto");
    if is_content_keyword(value) {
        return Dimension::Auto;
    }
    Dimension::parse(value, lengths).unwrap_or_else(|err| {
        malformed(ctx, property, value, err.to_string());
        Dimension::Pixels(0.0)
    })
}

/// `min-width` / `min-height`: `auto` is 0.
fn min_property(
    style: &ComputedStyle,
    property: &str,
    lengths: &LengthContext,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let value = style.get_or(property, "auto");
    if is_content_keyword(value) {
        return 0.0;
    }
    match Dimension::parse(value, lengths) {
        Ok(dimension) => dimension.resolve(base).to_px_or(0.0).max(0.0),
        Err(err) => {
            malformed(ctx, property, value, err.to_string());
            0.0
        }
    }
}

/// `max-width` / `max-height`: `none` (or a percentage with no base) is
/// unbounded.
fn max_property(
    style: &ComputedStyle,
    property: &str,
    lengths: &LengthContext,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> Option<f32> {
    let value = style.get_or(property, "none");
    if value.eq_ignore_ascii_case("none") || is_content_keyword(value) {
        return None;
    }
    match Dimension::parse(value, lengths) {
        Ok(Dimension::Auto) => None,
        Ok(dimension) => dimension.resolve(base).length().map(|m| m.max(0.0)),
        Err(err) => {
            malformed(ctx, property, value, err.to_string());
            None
        }
    }
}

fn is_content_keyword(value: &str) -> bool {
    ["min-content", "max-content", "fit-content"]
        .iter()
        .any(|k| value.eq_ignore_ascii_case(k))
}

fn malformed(ctx: &mut LayoutContext<'_>, property: &str, value: &str, message: impl Into<String>) {
    ctx.diagnostics
        .report(DiagnosticKind::MalformedValue, Some(property), value, message);
}

/// A keyword property parsed into its enum. Unknown keywords fall back to
/// the enum's default and are reported.
pub(crate) fn keyword_property<T>(style: &ComputedStyle, property: &str, ctx: &mut LayoutContext<'_>) -> T
where
    T: std::str::FromStr + Default,
{
    let Some(value) = style.get(property) else {
        return T::default();
    };
    value.trim().parse().unwrap_or_else(|_| {
        malformed(ctx, property, value, "unrecognized keyword");
        T::default()
    })
}

/// A `<number>` property such as `flex-grow`. Malformed or negative values
/// fall back to `default` and are reported.
pub(crate) fn number_property(
    style: &ComputedStyle,
    property: &str,
    default: f32,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let Some(value) = style.get(property) else {
        return default;
    };
    match crate::style::values::parse_number(value) {
        Ok(n) if n >= 0.0 => n as f32,
        Ok(_) => {
            malformed(ctx, property, value, "must not be negative");
            default
        }
        Err(err) => {
            malformed(ctx, property, value, err.to_string());
            default
        }
    }
}

/// A length or percentage that cannot be `auto`, such as a gap. `normal`
/// is 0; percentages without a base are 0.
pub(crate) fn gap_property(
    style: &ComputedStyle,
    property: &str,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> f32 {
    let value = style.get_or(property, "normal");
    if value.trim().eq_ignore_ascii_case("normal") {
        return 0.0;
    }
    let lengths = ctx.length_context(style);
    match Dimension::parse(value, &lengths) {
        Ok(Dimension::Auto) => {
            malformed(ctx, property, value, "auto is not allowed here");
            0.0
        }
        Ok(dimension) => dimension.resolve(base).to_px_or(0.0).max(0.0),
        Err(err) => {
            malformed(ctx, property, value, err.to_string());
            0.0
        }
    }
}

/// The specified main size (`width` or `height`) as a content-box length,
/// if definite against `base`.
pub(crate) fn specified_size(
    style: &ComputedStyle,
    property: &str,
    base: Option<f32>,
    ctx: &mut LayoutContext<'_>,
) -> Option<f32> {
    let lengths = ctx.length_context(style);
    size_property(style, property, &lengths, ctx).resolve(base).length()
}
