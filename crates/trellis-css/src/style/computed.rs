//! Computed style: the cascade's output for one node.

use std::collections::BTreeMap;

use serde::Serialize;

use super::properties::PROPERTIES;
use super::values::{ColorValue, DEFAULT_FONT_SIZE_PX, LengthValue};
use super::values::color::is_color_keyword;

/// Property name → value string for one node.
///
/// Every property of the [property table](super::properties::PROPERTIES)
/// is present after resolution. Ordered so that equal styles compare, hash
/// and serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    values: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// Style holding every property at its initial value.
    #[must_use]
    pub fn initial() -> Self {
        ComputedStyle {
            values: PROPERTIES
                .iter()
                .map(|p| (p.name.to_string(), p.initial.to_string()))
                .collect(),
        }
    }

    /// Starting point for a child of `parent`: inherited properties copied,
    /// everything else initial.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        ComputedStyle {
            values: PROPERTIES
                .iter()
                .map(|p| {
                    let value = if p.inherited {
                        parent.get(p.name).unwrap_or(p.initial)
                    } else {
                        p.initial
                    };
                    (p.name.to_string(), value.to_string())
                })
                .collect(),
        }
    }

    /// Value of a property.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.values.get(property).map(String::as_str)
    }

    /// Value of a property, or `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, property: &str, default: &'a str) -> &'a str {
        self.get(property).unwrap_or(default)
    }

    /// Set a property value.
    pub fn set(&mut self, property: &str, value: &str) {
        let _ = self.values.insert(property.to_string(), value.to_string());
    }

    /// Iterate over `(property, value)` in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The computed `font-size` in pixels.
    ///
    /// The cascade stores font sizes as absolute `px` strings, so this only
    /// falls back to the default for styles built by hand.
    #[must_use]
    pub fn font_size_px(&self) -> f64 {
        self.get("font-size")
            .and_then(|v| LengthValue::parse(v).ok())
            .and_then(|len| match len {
                LengthValue::Px(px) => Some(px),
                _ => None,
            })
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// A color property as a concrete color, resolving `currentcolor`
    /// against `color`.
    #[must_use]
    pub fn color(&self, property: &str) -> Option<ColorValue> {
        let value = self.get(property)?;
        if is_color_keyword(value) {
            if property == "color" {
                return Some(ColorValue::BLACK);
            }
            return self.color("color");
        }
        ColorValue::parse(value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_covers_property_table() {
        let style = ComputedStyle::initial();
        assert_eq!(style.len(), PROPERTIES.len());
        assert_eq!(style.get("width"), Some("auto"));
        assert_eq!(style.get("display"), None);
    }

    #[test]
    fn test_inherit_from_copies_only_inherited() {
        let mut parent = ComputedStyle::initial();
        parent.set("color", "red");
        parent.set("width", "100px");
        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.get("color"), Some("red"));
        assert_eq!(child.get("width"), Some("auto"));
    }

    #[test]
    fn test_current_color_resolution() {
        let mut style = ComputedStyle::initial();
        style.set("color", "#00f");
        assert_eq!(style.color("border-top-color"), style.color("color"));
        assert_eq!(style.color("border-top-color").map(|c| c.b), Some(255));
        assert_eq!(style.font_size_px(), 16.0);
    }
}
