//! Selector text to [`Selector`].
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)

use std::iter::Peekable;
use std::str::Chars;

use super::{
    AttributeSelector, Combinator, CompoundSelector, PseudoClass, Selector, SimpleSelector,
};

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

struct SelectorParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> SelectorParser<'a> {
    fn new(text: &'a str) -> Self {
        SelectorParser {
            chars: text.chars().peekable(),
        }
    }

    /// Consume whitespace, reporting whether any was there.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.next_if(char::is_ascii_whitespace).is_some() {
            skipped = true;
        }
        skipped
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.chars.next_if(|&c| is_ident_char(c)) {
            out.push(c);
        }
        out
    }

    fn non_empty_ident(&mut self) -> Option<String> {
        let ident = self.ident();
        (!ident.is_empty()).then_some(ident)
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// Stops at whitespace, `>` or the end of input. Any other character
    /// this engine does not understand rejects the whole selector.
    fn compound(&mut self) -> Option<CompoundSelector> {
        let mut simple_selectors = Vec::new();
        while let Some(&c) = self.chars.peek() {
            let simple = match c {
                c if c.is_ascii_whitespace() || c == '>' => break,
                '*' => {
                    let _ = self.chars.next();
                    SimpleSelector::Universal
                }
                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                // "The class selector is given as a full stop (. U+002E)
                // immediately followed by an identifier."
                '.' => {
                    let _ = self.chars.next();
                    SimpleSelector::Class(self.non_empty_ident()?)
                }
                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                // "An ID selector is a hash (#, U+0023) immediately followed by the ID value"
                '#' => {
                    let _ = self.chars.next();
                    SimpleSelector::Id(self.non_empty_ident()?)
                }
                '[' => {
                    let _ = self.chars.next();
                    SimpleSelector::Attribute(self.attribute()?)
                }
                ':' => {
                    let _ = self.chars.next();
                    self.pseudo()?
                }
                // Type selectors must lead the compound.
                c if (is_ident_start_char(c) || c == '-') && simple_selectors.is_empty() => {
                    SimpleSelector::Type(self.ident().to_ascii_lowercase())
                }
                // Sibling combinators, namespaces and stray punctuation.
                _ => return None,
            };
            simple_selectors.push(simple);
        }
        (!simple_selectors.is_empty()).then_some(CompoundSelector { simple_selectors })
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the opening `[`.
    fn attribute(&mut self) -> Option<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = self.non_empty_ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match self.chars.next()? {
            ']' => return Some(AttributeSelector::Exists(name)),
            '=' => '=',
            op @ ('~' | '|' | '^' | '$' | '*') => {
                if self.chars.next()? != '=' {
                    return None;
                }
                op
            }
            _ => return None,
        };

        let value = self.attribute_value()?;
        let _ = self.skip_whitespace();
        // Case-sensitivity flags (`i`, `s`) are accepted and ignored.
        let _ = self.chars.next_if(|&c| c == 'i' || c == 's' || c == 'I' || c == 'S');
        let _ = self.skip_whitespace();
        if self.chars.next()? != ']' {
            return None;
        }

        Some(match operator {
            '=' => AttributeSelector::Equals(name, value),
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            _ => AttributeSelector::SubstringMatch(name, value),
        })
    }

    /// Quoted (`"val"`, `'val'`) or unquoted ident values.
    fn attribute_value(&mut self) -> Option<String> {
        let _ = self.skip_whitespace();
        match self.chars.peek().copied()? {
            quote @ ('"' | '\'') => {
                let _ = self.chars.next();
                let mut value = String::new();
                for c in self.chars.by_ref() {
                    if c == quote {
                        return Some(value);
                    }
                    value.push(c);
                }
                // unterminated string
                None
            }
            _ => {
                let mut value = String::new();
                while let Some(c) = self.chars.next_if(|&c| is_ident_char(c) || c == '.') {
                    value.push(c);
                }
                (!value.is_empty()).then_some(value)
            }
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Called after the first `:`.
    fn pseudo(&mut self) -> Option<SimpleSelector> {
        let is_element = self.chars.next_if_eq(&':').is_some();
        let name = self.non_empty_ident()?.to_ascii_lowercase();

        // :nth-child(...), :not(...) and friends: keep the name, skip the
        // balanced argument list.
        let has_arguments = self.chars.next_if_eq(&'(').is_some();
        if has_arguments {
            let mut depth = 1u32;
            for c in self.chars.by_ref() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if depth != 0 {
                return None;
            }
        }

        // Legacy single-colon pseudo-elements (CSS 2).
        let legacy_element = matches!(
            name.as_str(),
            "before" | "after" | "first-line" | "first-letter"
        );
        if is_element || legacy_element {
            return Some(SimpleSelector::PseudoElement(name));
        }

        let pseudo = match name.as_str() {
            "root" if !has_arguments => PseudoClass::Root,
            "first-child" if !has_arguments => PseudoClass::FirstChild,
            "last-child" if !has_arguments => PseudoClass::LastChild,
            "only-child" if !has_arguments => PseudoClass::OnlyChild,
            "empty" if !has_arguments => PseudoClass::Empty,
            _ => PseudoClass::Other(name),
        };
        Some(SimpleSelector::PseudoClass(pseudo))
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    /// "A complex selector is a chain of one or more compound selectors
    /// separated by combinators."
    fn complex(&mut self) -> Option<Selector> {
        let _ = self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.chars.peek() {
                None => break,
                // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
                Some('>') => {
                    let _ = self.chars.next();
                    let _ = self.skip_whitespace();
                    Combinator::Child
                }
                // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
                // "A descendant combinator is whitespace that separates two
                // compound selectors."
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return None,
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        // Left-to-right text, right-to-left matching.
        let subject = compounds.pop()?;
        let ancestors = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Some(Selector::new(subject, ancestors))
    }
}

/// Parse a single complex selector.
pub(super) fn parse_selector(text: &str) -> Option<Selector> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    SelectorParser::new(trimmed).complex()
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// Parse a comma-separated selector list. Entries this engine cannot
/// match are skipped rather than invalidating the whole list, so
/// `h1, p::before, .x + .y` still yields `h1` and `p::before`.
#[must_use]
pub fn parse_selector_list(text: &str) -> Vec<Selector> {
    text.split(',').filter_map(parse_selector).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let selector = parse_selector("DIV.note#main[data-x]").unwrap();
        assert_eq!(
            selector.subject().simple_selectors,
            vec![
                SimpleSelector::Type("div".into()),
                SimpleSelector::Class("note".into()),
                SimpleSelector::Id("main".into()),
                SimpleSelector::Attribute(AttributeSelector::Exists("data-x".into())),
            ]
        );
    }

    #[test]
    fn test_parse_combinators_innermost_first() {
        let selector = parse_selector("ul.nav > li  a").unwrap();
        assert_eq!(
            selector.subject().simple_selectors,
            vec![SimpleSelector::Type("a".into())]
        );
        assert_eq!(
            selector.ancestors,
            vec![
                (
                    Combinator::Descendant,
                    CompoundSelector {
                        simple_selectors: vec![SimpleSelector::Type("li".into())]
                    }
                ),
                (
                    Combinator::Child,
                    CompoundSelector {
                        simple_selectors: vec![
                            SimpleSelector::Type("ul".into()),
                            SimpleSelector::Class("nav".into())
                        ]
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_parse_pseudo() {
        let selector = parse_selector("p::first-line").unwrap();
        assert_eq!(
            selector.subject().simple_selectors[1],
            SimpleSelector::PseudoElement("first-line".into())
        );
        let selector = parse_selector("li:nth-child(2n + 1)").unwrap();
        assert_eq!(
            selector.subject().simple_selectors[1],
            SimpleSelector::PseudoClass(PseudoClass::Other("nth-child".into()))
        );
    }

    #[test]
    fn test_parse_attribute_operators() {
        let selector = parse_selector("a[href^=\"https\" i]").unwrap();
        assert_eq!(
            selector.subject().simple_selectors[1],
            SimpleSelector::Attribute(AttributeSelector::PrefixMatch(
                "href".into(),
                "https".into()
            ))
        );
        assert!(parse_selector("a[href^]").is_none());
        assert!(parse_selector("a[href").is_none());
    }

    #[test]
    fn test_rejects_unsupported_syntax() {
        assert!(parse_selector("").is_none());
        assert!(parse_selector("> p").is_none());
        assert!(parse_selector("h1 + p").is_none());
        assert!(parse_selector("h1 ~ p").is_none());
        assert!(parse_selector("div >").is_none());
        assert!(parse_selector(".").is_none());
    }

    #[test]
    fn test_selector_list_skips_invalid_entries() {
        let list = parse_selector_list("h1, h2 + p ,  .note");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], Selector::tag("h1"));
        assert_eq!(list[1], Selector::class("note"));
    }
}
