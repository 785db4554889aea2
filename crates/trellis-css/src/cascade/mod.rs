//! CSS Cascading and Style Computation
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_common::{DiagnosticKind, Diagnostics};
use trellis_dom::{LayoutNode, NodeId, NodeKind};

use crate::selector::{MatchContext, SiblingPosition, Specificity};
use crate::store::{Origin, StyleRuleStore, parse_declarations};
use crate::style::properties::{initial_value, is_color_property, is_inherited, is_known_property};
use crate::style::shorthand::{expand, is_css_wide_keyword};
use crate::style::values::color::validate_color;
use crate::style::values::DEFAULT_FONT_SIZE_PX;
use crate::style::{ComputedStyle, LengthContext, LengthValue};

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// One longhand declaration that applies to the element, with everything
/// needed to rank it. Ordering the fields this way makes the derived `Ord`
/// the cascade order: importance, then origin, then specificity, then
/// source order, then position inside the declaration block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CascadedDeclaration {
    important: bool,
    origin: Origin,
    specificity: Specificity,
    source_index: u32,
    position: usize,
    property: String,
    value: String,
}

/// Resolves computed styles against one [`StyleRuleStore`].
#[derive(Debug, Clone, Copy)]
pub struct Cascade<'a> {
    store: &'a StyleRuleStore,
    root_font_size: f64,
}

impl<'a> Cascade<'a> {
    /// A resolver over `store` with the default 16px root font size.
    #[must_use]
    pub const fn new(store: &'a StyleRuleStore) -> Self {
        Cascade {
            store,
            root_font_size: DEFAULT_FONT_SIZE_PX,
        }
    }

    /// Use a different font size for `rem` units.
    #[must_use]
    pub const fn with_root_font_size(mut self, root_font_size: f64) -> Self {
        self.root_font_size = root_font_size;
        self
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    /// "The cascade takes an unordered list of declared values for a given property
    /// on a given element, sorts them by their declaration's precedence..."
    ///
    /// Compute the style of the element in `ctx`, inheriting from `inherited`
    /// (the parent's computed style, `None` for the root).
    pub fn resolve<N: LayoutNode>(
        &self,
        ctx: &MatchContext<'_, N>,
        inherited: Option<&ComputedStyle>,
        diagnostics: &mut Diagnostics,
    ) -> ComputedStyle {
        let initial;
        let parent = match inherited {
            Some(parent) => parent,
            None => {
                initial = ComputedStyle::initial();
                &initial
            }
        };

        // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
        let mut computed = ComputedStyle::inherit_from(parent);

        let mut declarations = self.collect_declarations(ctx, diagnostics);
        // Stable, and the key is total, so equal inputs give equal output.
        declarations.sort();

        for declaration in &declarations {
            self.apply(&mut computed, parent, declaration, diagnostics);
        }
        computed
    }

    /// Gather every longhand declaration from matching rules plus the
    /// element's `style` attribute.
    fn collect_declarations<N: LayoutNode>(
        &self,
        ctx: &MatchContext<'_, N>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<CascadedDeclaration> {
        let mut out = Vec::new();

        for rule in self.store.rules() {
            if !rule.selector.matches(ctx) {
                continue;
            }
            for (position, declaration) in rule.declarations.iter().enumerate() {
                push_expanded(
                    &mut out,
                    &declaration.property,
                    &declaration.value,
                    declaration.important,
                    (rule.origin, rule.selector.specificity(), rule.source_index, position),
                    diagnostics,
                );
            }
        }

        // [§ 6.4.4 Style attribute](https://www.w3.org/TR/css-style-attr/#interpret)
        // Declarations in a style attribute rank after every rule.
        if let Some(style_attribute) = ctx.node.attribute("style") {
            for (position, declaration) in parse_declarations(style_attribute).iter().enumerate() {
                push_expanded(
                    &mut out,
                    &declaration.property,
                    &declaration.value,
                    declaration.important,
                    (Origin::Inline, Specificity::default(), u32::MAX, position),
                    diagnostics,
                );
            }
        }
        out
    }

    /// Write one ranked declaration into `computed`.
    fn apply(
        &self,
        computed: &mut ComputedStyle,
        parent: &ComputedStyle,
        declaration: &CascadedDeclaration,
        diagnostics: &mut Diagnostics,
    ) {
        let property = declaration.property.as_str();
        let value = declaration.value.as_str();

        // [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
        if is_css_wide_keyword(value) {
            let keyword = value.to_ascii_lowercase();
            let inherit = keyword == "inherit" || (keyword == "unset" && is_inherited(property));
            let resolved = if inherit {
                parent.get(property).or_else(|| initial_value(property))
            } else {
                initial_value(property)
            };
            if let Some(resolved) = resolved {
                let resolved = resolved.to_string();
                computed.set(property, &resolved);
            }
            return;
        }

        if !is_known_property(property) {
            diagnostics.report(
                DiagnosticKind::UnknownProperty,
                Some(property),
                value,
                "unknown property kept as written",
            );
        }

        if is_color_property(property) {
            if let Err(err) = validate_color(value) {
                diagnostics.report(DiagnosticKind::InvalidColor, Some(property), value, err.to_string());
                return;
            }
        }

        if property == "font-size" {
            match self.compute_font_size(value, parent.font_size_px()) {
                Some(px) => computed.set(property, &format_px(px)),
                None => diagnostics.report(
                    DiagnosticKind::MalformedValue,
                    Some(property),
                    value,
                    "font-size is not a length, percentage or size keyword",
                ),
            }
            return;
        }

        computed.set(property, value);
    }

    /// [§ 2.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    ///
    /// "Computed value: an absolute length". Relative sizes resolve against
    /// the parent's font size, `rem` against the root font size.
    fn compute_font_size(&self, value: &str, parent_px: f64) -> Option<f64> {
        let keyword = value.to_ascii_lowercase();
        // [§ 2.5.1 absolute-size](https://www.w3.org/TR/css-fonts-4/#absolute-size-mapping)
        let absolute = match keyword.as_str() {
            "xx-small" => Some(9.0),
            "x-small" => Some(10.0),
            "small" => Some(13.0),
            "medium" => Some(16.0),
            "large" => Some(18.0),
            "x-large" => Some(24.0),
            "xx-large" => Some(32.0),
            "xxx-large" => Some(48.0),
            // [§ 2.5.2 relative-size](https://www.w3.org/TR/css-fonts-4/#relative-size-value)
            "smaller" => Some(parent_px / 1.2),
            "larger" => Some(parent_px * 1.2),
            _ => None,
        };
        if absolute.is_some() {
            return absolute;
        }

        let length = LengthValue::parse(value).ok()?;
        let ctx = LengthContext {
            font_size: parent_px,
            root_font_size: self.root_font_size,
            percent_base: Some(parent_px),
            ..LengthContext::default()
        };
        length.to_px(&ctx).map(|px| px.max(0.0))
    }
}

/// Expand a declaration into ranked longhands, diagnosing bad shorthands.
fn push_expanded(
    out: &mut Vec<CascadedDeclaration>,
    property: &str,
    value: &str,
    important: bool,
    (origin, specificity, source_index, position): (Origin, Specificity, u32, usize),
    diagnostics: &mut Diagnostics,
) {
    match expand(property, value) {
        Ok(longhands) => out.extend(longhands.into_iter().map(|(property, value)| {
            CascadedDeclaration {
                important,
                origin,
                specificity,
                source_index,
                position,
                property,
                value,
            }
        })),
        Err(err) => diagnostics.report(
            DiagnosticKind::MalformedValue,
            Some(property),
            value,
            err.to_string(),
        ),
    }
}

/// `32px`, `18.72px`: rounded to a thousandth of a pixel.
pub(crate) fn format_px(px: f64) -> String {
    let rounded = (px * 1000.0).round() / 1000.0;
    format!("{rounded}px")
}

/// Compute styles for every element under `root`.
///
/// Document and other non-element nodes have no style of their own; text
/// nodes are styled by their parent and are absent from the map. The walk
/// carries the [`MatchContext`] chain, so descendant and child combinators
/// and structural pseudo-classes resolve without parent pointers.
pub fn compute_styles<N: LayoutNode>(
    root: N,
    cascade: &Cascade<'_>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<NodeId, Arc<ComputedStyle>> {
    let mut styles = BTreeMap::new();
    match root.kind() {
        NodeKind::Element => {
            let ctx = MatchContext::root(root);
            compute_element(&ctx, None, cascade, diagnostics, &mut styles);
        }
        NodeKind::Document => {
            compute_children(root, None, None, cascade, diagnostics, &mut styles);
        }
        NodeKind::Text | NodeKind::Other => {}
    }
    styles
}

fn compute_element<N: LayoutNode>(
    ctx: &MatchContext<'_, N>,
    inherited: Option<&ComputedStyle>,
    cascade: &Cascade<'_>,
    diagnostics: &mut Diagnostics,
    styles: &mut BTreeMap<NodeId, Arc<ComputedStyle>>,
) {
    let computed = Arc::new(cascade.resolve(ctx, inherited, diagnostics));
    let _ = styles.insert(ctx.node.id(), Arc::clone(&computed));
    compute_children(ctx.node, Some(ctx), Some(&computed), cascade, diagnostics, styles);
}

fn compute_children<N: LayoutNode>(
    node: N,
    parent_ctx: Option<&MatchContext<'_, N>>,
    inherited: Option<&ComputedStyle>,
    cascade: &Cascade<'_>,
    diagnostics: &mut Diagnostics,
    styles: &mut BTreeMap<NodeId, Arc<ComputedStyle>>,
) {
    let elements: Vec<N> = node
        .children()
        .into_iter()
        .filter(LayoutNode::is_element)
        .collect();
    let count = elements.len();
    for (index, child) in elements.into_iter().enumerate() {
        let position = SiblingPosition { index, count };
        let ctx = match parent_ctx {
            Some(parent) => parent.child(child, position),
            None => MatchContext {
                node: child,
                position,
                parent: None,
            },
        };
        compute_element(&ctx, inherited, cascade, diagnostics, styles);
    }
}
