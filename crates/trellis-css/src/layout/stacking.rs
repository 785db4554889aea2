//! Paint order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! Geometry is never touched here. Each box's children are reordered so a
//! painter walking them front to back gets the right layering.

use serde::Serialize;
use trellis_common::{DiagnosticKind, Diagnostics};

use super::layout_box::LayoutBox;
use crate::style::ComputedStyle;

/// [§ 9.9.1 Specifying the stack level: the 'z-index' property](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "Values have the following meanings:
///
/// <integer>
///   This integer is the stack level of the generated box in the current
///   stacking context. The box also establishes a new stacking context.
///
/// auto
///   The stack level of the generated box in the current stacking context
///   is 0. The box does not establish a new stacking context unless it is
///   the root element."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZIndex {
    /// Takes the stack level of the parent.
    #[default]
    Auto,
    /// "This integer is the stack level."
    Integer(i32),
}

impl ZIndex {
    /// Read `z-index` from a computed style. Malformed values are `auto`.
    pub fn from_style(style: &ComputedStyle, diagnostics: &mut Diagnostics) -> Self {
        let value = style.get_or("z-index", "auto").trim();
        if value.eq_ignore_ascii_case("auto") {
            return ZIndex::Auto;
        }
        value.parse().map_or_else(
            |_| {
                diagnostics.report(
                    DiagnosticKind::MalformedValue,
                    Some("z-index"),
                    value,
                    "z-index must be auto or an integer",
                );
                ZIndex::Auto
            },
            ZIndex::Integer,
        )
    }

    /// The stack level a box gets when its parent sits at `parent_level`.
    #[must_use]
    pub const fn effective(self, parent_level: i32) -> i32 {
        match self {
            ZIndex::Auto => parent_level,
            ZIndex::Integer(level) => level,
        }
    }
}

/// Assign every box its effective stack level and stable-sort each box's
/// children by it.
///
/// "Boxes with the same stack level in a stacking context are stacked
/// back-to-front according to document tree order."
pub fn finalize_stacking_order(root: &mut LayoutBox) {
    root.stack_level = root.z_index.effective(0);
    order_children(root);
}

fn order_children(parent: &mut LayoutBox) {
    let level = parent.stack_level;
    for child in &mut parent.children {
        child.stack_level = child.z_index.effective(level);
    }
    // sort_by_key is stable
    parent.children.sort_by_key(|child| child.stack_level);
    for child in &mut parent.children {
        order_children(child);
    }
}
