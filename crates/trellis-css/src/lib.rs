//! CSS cascade, box model resolution and layout for the trellis engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style Rule Store** - structured rules per document, default and author
//!   origins, compact selector text and declaration blocks
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Structural pseudo-classes
//!   - Descendant and child combinators
//!   - Specificity calculation
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Importance, origin, specificity and source order
//!   - Shorthand expansion and CSS-wide keywords
//!   - Property inheritance
//!
//! - **Layout** ([CSS Display Level 3](https://www.w3.org/TR/css-display-3/))
//!   - Box tree construction with anonymous boxes
//!   - Box model resolution (px, em, rem, %, vw, vh, calc())
//!   - Block, inline, flex and grid formatting contexts
//!   - Relative positioning and z-index paint order
//!
//! The entry point is [`layout_document`]. Text is measured by the host
//! through [`TextMeasure`]; the crate owns no I/O.
//!
//! # Not Yet Implemented
//!
//! - Margin collapsing and floats
//! - Absolute and fixed positioning
//! - Multi-line flex containers
//! - Sibling combinators
//! - Grid auto-placement

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// The layout pipeline entry point.
pub mod engine;
/// Box tree and formatting contexts per [CSS Display Level 3](https://www.w3.org/TR/css-display-3/).
pub mod layout;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Structured style rules for one document.
pub mod store;
/// Computed style representation and value parsing.
pub mod style;
/// Default stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{Cascade, compute_styles};
pub use engine::{LayoutOptions, LayoutResult, layout_document};
pub use layout::{
    ApproximateTextMeasure, BoxMetrics, BoxSource, BoxType, EdgeSizes, FontSpec, FontStyle, LayoutBox, Point, Rect,
    Size, SpacingTable, TextFragment, TextMeasure, ZIndex,
};
pub use selector::{Selector, Specificity};
pub use store::{Declaration, Origin, StyleRule, StyleRuleStore, parse_declarations};
pub use style::ComputedStyle;
