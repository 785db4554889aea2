//! The property table: every longhand the engine knows, its initial value
//! and whether it inherits.
//!
//! [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
//!
//! "Some properties are inherited properties, as defined in their property
//! definition table. This means that, unless the cascade results in a value,
//! the value will be determined by inheritance."
//!
//! [§ 7.1 Initial Values](https://www.w3.org/TR/css-cascade-4/#initial-values)
//!
//! "If the cascade does not result in a value, the initial value of the
//! property is used."

/// One row of the property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// Longhand name.
    pub name: &'static str,
    /// Initial value as a CSS string.
    pub initial: &'static str,
    /// Whether the property inherits.
    pub inherited: bool,
}

const fn inherited(name: &'static str, initial: &'static str) -> PropertyDef {
    PropertyDef {
        name,
        initial,
        inherited: true,
    }
}

const fn reset(name: &'static str, initial: &'static str) -> PropertyDef {
    PropertyDef {
        name,
        initial,
        inherited: false,
    }
}

/// Every property a [`ComputedStyle`](super::ComputedStyle) always carries.
///
/// `display` is deliberately absent: when no rule sets it, the box tree
/// builder falls back to its per-tag default table.
pub const PROPERTIES: &[PropertyDef] = &[
    // Inherited
    inherited("color", "black"),
    inherited("cursor", "auto"),
    inherited("direction", "ltr"),
    inherited("font-family", "serif"),
    inherited("font-size", "16px"),
    inherited("font-style", "normal"),
    inherited("font-variant", "normal"),
    inherited("font-weight", "normal"),
    inherited("letter-spacing", "normal"),
    inherited("line-height", "normal"),
    inherited("list-style-type", "disc"),
    inherited("text-align", "left"),
    inherited("text-indent", "0px"),
    inherited("text-transform", "none"),
    inherited("visibility", "visible"),
    inherited("white-space", "normal"),
    inherited("word-spacing", "normal"),
    // Box model
    reset("width", "auto"),
    reset("height", "auto"),
    reset("min-width", "0px"),
    reset("min-height", "0px"),
    reset("max-width", "none"),
    reset("max-height", "none"),
    reset("box-sizing", "content-box"),
    reset("margin-top", "0px"),
    reset("margin-right", "0px"),
    reset("margin-bottom", "0px"),
    reset("margin-left", "0px"),
    reset("padding-top", "0px"),
    reset("padding-right", "0px"),
    reset("padding-bottom", "0px"),
    reset("padding-left", "0px"),
    reset("border-top-width", "medium"),
    reset("border-right-width", "medium"),
    reset("border-bottom-width", "medium"),
    reset("border-left-width", "medium"),
    reset("border-top-style", "none"),
    reset("border-right-style", "none"),
    reset("border-bottom-style", "none"),
    reset("border-left-style", "none"),
    reset("border-top-color", "currentcolor"),
    reset("border-right-color", "currentcolor"),
    reset("border-bottom-color", "currentcolor"),
    reset("border-left-color", "currentcolor"),
    // Positioning and painting
    reset("position", "static"),
    reset("top", "auto"),
    reset("right", "auto"),
    reset("bottom", "auto"),
    reset("left", "auto"),
    reset("z-index", "auto"),
    reset("float", "none"),
    reset("overflow", "visible"),
    reset("opacity", "1"),
    reset("background-color", "transparent"),
    reset("background-image", "none"),
    reset("text-decoration", "none"),
    reset("vertical-align", "baseline"),
    // Flexbox
    reset("flex-direction", "row"),
    reset("flex-wrap", "nowrap"),
    reset("flex-grow", "0"),
    reset("flex-shrink", "1"),
    reset("flex-basis", "auto"),
    reset("order", "0"),
    reset("justify-content", "flex-start"),
    reset("align-items", "stretch"),
    reset("align-self", "auto"),
    reset("row-gap", "normal"),
    reset("column-gap", "normal"),
    // Grid
    reset("grid-template-columns", "none"),
    reset("grid-template-rows", "none"),
    reset("grid-auto-columns", "auto"),
    reset("grid-auto-rows", "auto"),
    reset("grid-row-start", "auto"),
    reset("grid-row-end", "auto"),
    reset("grid-column-start", "auto"),
    reset("grid-column-end", "auto"),
];

/// Properties accepted in declarations even though they carry no initial
/// value in [`PROPERTIES`].
const EXTRA_KNOWN: &[&str] = &["display", "content", "list-style-position", "outline"];

/// Look up a longhand.
#[must_use]
pub fn property(name: &str) -> Option<&'static PropertyDef> {
    PROPERTIES.iter().find(|p| p.name == name)
}

/// Whether `name` inherits when no rule sets it.
#[must_use]
pub fn is_inherited(name: &str) -> bool {
    property(name).is_some_and(|p| p.inherited)
}

/// Initial value for `name`, if it is in the table.
#[must_use]
pub fn initial_value(name: &str) -> Option<&'static str> {
    property(name).map(|p| p.initial)
}

/// Whether declarations of `name` are understood. Custom properties
/// (`--*`) always are.
#[must_use]
pub fn is_known_property(name: &str) -> bool {
    name.starts_with("--") || property(name).is_some() || EXTRA_KNOWN.contains(&name)
}

/// Properties whose values must parse as colors.
#[must_use]
pub fn is_color_property(name: &str) -> bool {
    name == "color" || name == "background-color" || (name.starts_with("border-") && name.ends_with("-color"))
}
