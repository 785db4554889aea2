//! CSS selectors and matching.
//!
//! This module implements the part of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) layout needs:
//! compound selectors of type, class, id, universal, attribute and
//! pseudo-class conditions, joined by descendant or child combinators.
//!
//! Matching runs against a [`MatchContext`], the chain of element ancestors
//! the box tree builder carries while it walks down the document, so no
//! parent pointers are needed on the nodes themselves.

mod parse;

use serde::Serialize;
use trellis_dom::{LayoutNode, NodeKind};

pub use parse::parse_selector_list;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `span`. Stored lowercase.
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.btn`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Layout generates no pseudo-element boxes, so these never match.
    PseudoElement(String),
}

/// Pseudo-classes. Structural ones match using the sibling position known
/// during the walk. Everything else (`:hover`, `:focus`, `:nth-child(2n)`)
/// never matches a static document but still weighs in specificity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// [§ 14.3.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.3.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.3.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children
    /// except, optionally, document white space characters."
    Empty,
    /// Any other pseudo-class, by name.
    Other(String),
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Attribute names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]` "Represents an element with the att attribute"
    Exists(String),
    /// `[attr=value]` "whose value is exactly 'val'"
    Equals(String, String),
    /// `[attr~=value]` "a whitespace-separated list of words, one of which is exactly 'val'"
    Includes(String, String),
    /// `[attr|=value]` "either being exactly 'val' or beginning with 'val' immediately followed by '-'"
    DashMatch(String, String),
    /// `[attr^=value]` "begins with the prefix 'val'"
    PrefixMatch(String, String),
    /// `[attr$=value]` "ends with the suffix 'val'"
    SuffixMatch(String, String),
    /// `[attr*=value]` "contains at least one instance of the substring 'val'"
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The simple selectors that all have to hold.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`: B is an arbitrary descendant of A.
    Descendant,
    /// `A > B`: B is a direct child of A.
    Child,
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// A structured selector ready for matching.
///
/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// For `ul.nav > li a` the subject is `a` and `ancestors` is
/// `[(Descendant, li), (Child, ul.nav)]`, innermost first, because matching
/// walks outward from the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    subject: CompoundSelector,
    ancestors: Vec<(Combinator, CompoundSelector)>,
    specificity: Specificity,
}

impl Selector {
    /// Build from a subject and its ancestor chain (innermost first).
    #[must_use]
    pub fn new(subject: CompoundSelector, ancestors: Vec<(Combinator, CompoundSelector)>) -> Self {
        let specificity = ancestors
            .iter()
            .map(|(_, compound)| compound.specificity())
            .fold(subject.specificity(), |acc, s| acc + s);
        Selector {
            subject,
            ancestors,
            specificity,
        }
    }

    /// A selector made of one compound.
    #[must_use]
    pub fn compound(simple_selectors: Vec<SimpleSelector>) -> Self {
        Self::new(CompoundSelector { simple_selectors }, Vec::new())
    }

    /// `tag`
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::compound(vec![SimpleSelector::Type(name.to_ascii_lowercase())])
    }

    /// `.class`
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::compound(vec![SimpleSelector::Class(name.to_string())])
    }

    /// `#id`
    #[must_use]
    pub fn id(name: &str) -> Self {
        Self::compound(vec![SimpleSelector::Id(name.to_string())])
    }

    /// Parse one compact selector such as `div.note > p:first-child`.
    ///
    /// Returns `None` for syntax this engine does not match (sibling
    /// combinators, namespaces, malformed text).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        parse::parse_selector(text)
    }

    /// The rightmost compound.
    #[must_use]
    pub const fn subject(&self) -> &CompoundSelector {
        &self.subject
    }

    /// The specificity, summed over every compound.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match against the element described by `ctx`, walking its ancestor
    /// chain for combinators.
    #[must_use]
    pub fn matches<N: LayoutNode>(&self, ctx: &MatchContext<'_, N>) -> bool {
        if !self.subject.matches(ctx) {
            return false;
        }

        let mut current = ctx;
        for (combinator, compound) in &self.ancestors {
            match combinator {
                // "A selector of the form 'A > B' represents an element B
                // that is a direct child of element A."
                Combinator::Child => {
                    let Some(parent) = current.parent else {
                        return false;
                    };
                    if !compound.matches(parent) {
                        return false;
                    }
                    current = parent;
                }
                // "A selector of the form 'A B' represents an element B that
                // is an arbitrary descendant of some ancestor element A."
                Combinator::Descendant => {
                    let mut candidate = current.parent;
                    loop {
                        let Some(ancestor) = candidate else {
                            return false;
                        };
                        if compound.matches(ancestor) {
                            current = ancestor;
                            break;
                        }
                        candidate = ancestor.parent;
                    }
                }
            }
        }
        true
    }
}

impl CompoundSelector {
    /// Specificity of this compound alone.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for simple in &self.simple_selectors {
            match simple {
                SimpleSelector::Id(_) => spec.0 += 1,
                SimpleSelector::Class(_)
                | SimpleSelector::Attribute(_)
                | SimpleSelector::PseudoClass(_) => spec.1 += 1,
                SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.2 += 1,
                // "ignore the universal selector"
                SimpleSelector::Universal => {}
            }
        }
        spec
    }

    /// Whether every simple selector holds for the element in `ctx`.
    #[must_use]
    pub fn matches<N: LayoutNode>(&self, ctx: &MatchContext<'_, N>) -> bool {
        ctx.node.is_element() && self.simple_selectors.iter().all(|s| s.matches(ctx))
    }
}

impl SimpleSelector {
    /// Whether this condition holds for the element in `ctx`.
    #[must_use]
    pub fn matches<N: LayoutNode>(&self, ctx: &MatchContext<'_, N>) -> bool {
        let node = &ctx.node;
        match self {
            Self::Type(name) => node
                .tag_name()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name)),
            Self::Class(class) => node.has_class(class),
            Self::Id(id) => node.element_id() == Some(id.as_str()),
            Self::Universal => true,
            Self::Attribute(attr) => attr.matches(node),
            Self::PseudoClass(pseudo) => pseudo.matches(ctx),
            Self::PseudoElement(_) => false,
        }
    }
}

impl AttributeSelector {
    fn matches<N: LayoutNode>(&self, node: &N) -> bool {
        match self {
            Self::Exists(name) => node.attribute(name).is_some(),
            Self::Equals(name, val) => node.attribute(name) == Some(val.as_str()),
            Self::Includes(name, val) => node
                .attribute(name)
                .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
            Self::DashMatch(name, val) => node.attribute(name).is_some_and(|v| {
                v == val || (v.starts_with(val.as_str()) && v[val.len()..].starts_with('-'))
            }),
            // "If 'val' is the empty string then the selector does not
            // represent anything."
            Self::PrefixMatch(name, val) => {
                !val.is_empty() && node.attribute(name).is_some_and(|v| v.starts_with(val.as_str()))
            }
            Self::SuffixMatch(name, val) => {
                !val.is_empty() && node.attribute(name).is_some_and(|v| v.ends_with(val.as_str()))
            }
            Self::SubstringMatch(name, val) => {
                !val.is_empty() && node.attribute(name).is_some_and(|v| v.contains(val.as_str()))
            }
        }
    }
}

impl PseudoClass {
    fn matches<N: LayoutNode>(&self, ctx: &MatchContext<'_, N>) -> bool {
        match self {
            Self::Root => ctx.parent.is_none(),
            Self::FirstChild => ctx.position.index == 0,
            Self::LastChild => ctx.position.index + 1 == ctx.position.count,
            Self::OnlyChild => ctx.position.count == 1,
            Self::Empty => ctx.node.children().iter().all(|child| match child.kind() {
                NodeKind::Element => false,
                NodeKind::Text => child.text().is_none_or(|t| t.trim().is_empty()),
                NodeKind::Document | NodeKind::Other => true,
            }),
            Self::Other(_) => false,
        }
    }
}

/// Where an element sits among its element siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiblingPosition {
    /// 0-based index among element siblings.
    pub index: usize,
    /// Number of element siblings, the element included.
    pub count: usize,
}

impl SiblingPosition {
    /// Position of a lone element.
    pub const ONLY: Self = Self { index: 0, count: 1 };
}

/// An element plus the element ancestors above it.
///
/// Built on the stack as the walk descends; `parent` is `None` for the
/// document element (or whatever element the walk started at).
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a, N> {
    /// The element being matched.
    pub node: N,
    /// Its position among element siblings.
    pub position: SiblingPosition,
    /// The enclosing element's context.
    pub parent: Option<&'a MatchContext<'a, N>>,
}

impl<'a, N: LayoutNode> MatchContext<'a, N> {
    /// Context for an element with no known ancestors.
    pub const fn root(node: N) -> Self {
        MatchContext {
            node,
            position: SiblingPosition::ONLY,
            parent: None,
        }
    }

    /// Context for a child element of `self`.
    #[must_use]
    pub const fn child(&'a self, node: N, position: SiblingPosition) -> Self {
        MatchContext {
            node,
            position,
            parent: Some(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_dom::{DomTree, ElementData, NodeId};

    use super::*;

    #[test]
    fn test_specificity_ordering() {
        let id = Selector::parse("#a").unwrap().specificity();
        let class = Selector::parse(".a").unwrap().specificity();
        let tag = Selector::parse("div").unwrap().specificity();
        assert!(id > class && class > tag);
        assert_eq!(
            Selector::parse("ul#nav > li.item:first-child a[href]")
                .unwrap()
                .specificity(),
            Specificity::new(1, 3, 3)
        );
        assert_eq!(Selector::parse("*").unwrap().specificity(), Specificity::default());
    }

    #[test]
    fn test_descendant_and_child_matching() {
        let mut tree = DomTree::new();
        let section = tree.append_element(NodeId::ROOT, ElementData::new("section").with_attr("id", "main"));
        let div = tree.append_element(section, ElementData::new("div"));
        let p = tree.append_element(div, ElementData::new("p").with_attr("class", "note"));

        let section_ctx = MatchContext::root(tree.node(section));
        let div_ctx = section_ctx.child(tree.node(div), SiblingPosition::ONLY);
        let p_ctx = div_ctx.child(tree.node(p), SiblingPosition::ONLY);

        assert!(Selector::parse("#main p").unwrap().matches(&p_ctx));
        assert!(Selector::parse("div > p.note").unwrap().matches(&p_ctx));
        assert!(!Selector::parse("section > p").unwrap().matches(&p_ctx));
        assert!(Selector::parse("section div p").unwrap().matches(&p_ctx));
        assert!(!Selector::parse("p div").unwrap().matches(&p_ctx));
        assert!(Selector::parse(":root").unwrap().matches(&section_ctx));
        assert!(!Selector::parse(":root").unwrap().matches(&div_ctx));
    }

    #[test]
    fn test_attribute_and_structural_pseudo_classes() {
        let mut tree = DomTree::new();
        let ul = tree.append_element(NodeId::ROOT, ElementData::new("ul"));
        let first = tree.append_element(
            ul,
            ElementData::new("li").with_attr("lang", "en-US").with_attr("data-x", "alpha beta"),
        );
        let _ = tree.append_text(first, "text");
        let last = tree.append_element(ul, ElementData::new("li"));

        let ul_ctx = MatchContext::root(tree.node(ul));
        let first_ctx = ul_ctx.child(tree.node(first), SiblingPosition { index: 0, count: 2 });
        let last_ctx = ul_ctx.child(tree.node(last), SiblingPosition { index: 1, count: 2 });

        assert!(Selector::parse("li:first-child").unwrap().matches(&first_ctx));
        assert!(!Selector::parse("li:first-child").unwrap().matches(&last_ctx));
        assert!(Selector::parse("li:last-child").unwrap().matches(&last_ctx));
        assert!(!Selector::parse("li:only-child").unwrap().matches(&last_ctx));
        assert!(Selector::parse("li:empty").unwrap().matches(&last_ctx));
        assert!(!Selector::parse("li:empty").unwrap().matches(&first_ctx));
        assert!(Selector::parse("[lang|=en]").unwrap().matches(&first_ctx));
        assert!(Selector::parse("[data-x~=beta]").unwrap().matches(&first_ctx));
        assert!(Selector::parse("[data-x^='al']").unwrap().matches(&first_ctx));
        assert!(!Selector::parse("[data-x$=alpha]").unwrap().matches(&first_ctx));
        assert!(!Selector::parse("li:hover").unwrap().matches(&first_ctx));
    }
}
