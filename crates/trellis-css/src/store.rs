//! Style Rule Store
//!
//! [CSS Cascading § 6.1 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
//!
//! Holds structured style rules for one document, partitioned into default
//! (user-agent) rules and author rules. A store is built fresh per document;
//! nothing here is process-wide.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::selector::{Selector, parse_selector_list};
use crate::ua_stylesheet::DEFAULT_RULES;

/// [§ 6.1 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// Where a rule enters the cascade. Declaration order of the variants is the
/// precedence order, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// The built-in default stylesheet.
    Default,
    /// Rules supplied by the document's stylesheets.
    Author,
    /// Declarations from a `style` attribute.
    Inline,
}

/// [§ 3 Declarations](https://www.w3.org/TR/css-syntax-3/#declaration)
///
/// One `property: value` pair. Property names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Lowercase property name.
    pub property: String,
    /// Value text with `!important` removed.
    pub value: String,
    /// [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
    pub important: bool,
}

impl Declaration {
    /// A normal (not important) declaration.
    #[must_use]
    pub fn new(property: &str, value: &str) -> Self {
        Declaration {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
            important: false,
        }
    }

    /// The same declaration flagged `!important`.
    #[must_use]
    pub const fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// A selector with its declaration block, origin and source position.
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Structured selector.
    pub selector: Selector,
    /// Declarations in block order.
    pub declarations: Vec<Declaration>,
    /// Cascade origin.
    pub origin: Origin,
    /// Monotonic position across the whole store; later rules win ties.
    pub source_index: u32,
}

/// Rules for one document.
#[derive(Debug, Clone, Default)]
pub struct StyleRuleStore {
    default_rules: Vec<StyleRule>,
    author_rules: Vec<StyleRule>,
    next_index: u32,
}

impl StyleRuleStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the default stylesheet.
    #[must_use]
    pub fn with_default_rules() -> Self {
        let mut store = Self::new();
        for (selectors, declarations) in DEFAULT_RULES {
            let _ = store.add(selectors, declarations, Origin::Default);
        }
        store
    }

    /// Add one structured rule, returning its source index.
    pub fn add_rule(
        &mut self,
        selector: Selector,
        declarations: Vec<Declaration>,
        origin: Origin,
    ) -> u32 {
        let source_index = self.next_index;
        self.next_index += 1;
        let rule = StyleRule {
            selector,
            declarations,
            origin,
            source_index,
        };
        match origin {
            Origin::Default => self.default_rules.push(rule),
            Origin::Author | Origin::Inline => self.author_rules.push(rule),
        }
        source_index
    }

    /// Add rules from compact selector text and a declaration block string.
    ///
    /// A selector list produces one rule per selector, all sharing the
    /// declarations. Selectors that fail to parse are skipped with a
    /// warning. Returns the number of rules added.
    pub fn add(&mut self, selectors: &str, declarations: &str, origin: Origin) -> usize {
        let parsed = parse_selector_list(selectors);
        if parsed.is_empty() {
            log::warn!("skipping rule with unsupported selector '{selectors}'");
            return 0;
        }
        let declarations = parse_declarations(declarations);
        let count = parsed.len();
        for selector in parsed {
            let _ = self.add_rule(selector, declarations.clone(), origin);
        }
        count
    }

    /// Rules with [`Origin::Default`].
    #[must_use]
    pub fn default_rules(&self) -> &[StyleRule] {
        &self.default_rules
    }

    /// Author and inline-origin rules.
    #[must_use]
    pub fn author_rules(&self) -> &[StyleRule] {
        &self.author_rules
    }

    /// Every rule, default rules first.
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.default_rules.iter().chain(&self.author_rules)
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.default_rules.len() + self.author_rules.len()
    }

    /// True when no rules have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a declaration block (`"color: red; margin: 0 !important"`) into
/// declarations.
///
/// Pieces without a colon or with an empty name or value are skipped. The
/// value keeps its internal text; only a trailing `!important` is removed.
#[must_use]
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    text.split(';')
        .filter_map(|piece| {
            let (property, value) = piece.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            let (value, important) = strip_important(value);
            if value.is_empty() {
                return None;
            }
            let declaration = Declaration::new(property, value);
            Some(if important {
                declaration.important()
            } else {
                declaration
            })
        })
        .collect()
}

/// [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
/// "A declaration is important if it has a !important annotation"
fn strip_important(value: &str) -> (&str, bool) {
    let Some(bang) = value.rfind('!') else {
        return (value, false);
    };
    if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
        (value[..bang].trim_end(), true)
    } else {
        (value, false)
    }
}
