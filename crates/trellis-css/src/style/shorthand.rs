//! Shorthand expansion.
//!
//! [§ 1.2 Shorthand Properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
//!
//! "Some properties are shorthand properties, meaning that they allow
//! authors to specify the values of several properties with a single
//! property."
//!
//! The cascade expands shorthands into longhands before ranking, so a later
//! `margin-top` beats an earlier `margin` and vice versa by the usual rules.

use trellis_common::ValueError;

use super::values::color::validate_color;
use super::values::{parse_number, split_components, split_top_level};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const SHORTHANDS: &[&str] = &[
    "margin",
    "padding",
    "inset",
    "border",
    "border-top",
    "border-right",
    "border-bottom",
    "border-left",
    "border-width",
    "border-style",
    "border-color",
    "flex",
    "flex-flow",
    "gap",
    "grid-gap",
    "grid-row",
    "grid-column",
    "background",
];

/// Whether `property` is a shorthand this module expands.
#[must_use]
pub fn is_shorthand(property: &str) -> bool {
    SHORTHANDS.contains(&property)
}

/// Expand a declaration into longhand `(property, value)` pairs.
///
/// Non-shorthands come back unchanged as a single pair. The CSS-wide
/// keywords `inherit`, `initial` and `unset` are copied to every longhand.
///
/// # Errors
///
/// Fails when a shorthand value has the wrong number of components or a
/// component that fits none of its slots.
pub fn expand(property: &str, value: &str) -> Result<Vec<(String, String)>, ValueError> {
    let value = value.trim();
    if !is_shorthand(property) {
        return Ok(vec![(property.to_string(), value.to_string())]);
    }
    if value.is_empty() {
        return Err(ValueError::Empty);
    }
    if is_css_wide_keyword(value) {
        return Ok(longhands_of(property)
            .into_iter()
            .map(|name| (name, value.to_ascii_lowercase()))
            .collect());
    }

    let parts = split_components(value);
    match property {
        "margin" | "padding" => four_sides(&parts, |side| format!("{property}-{side}")),
        "inset" => four_sides(&parts, |side| side.to_string()),
        "border-width" | "border-style" | "border-color" => {
            let kind = &property["border-".len()..];
            four_sides(&parts, |side| format!("border-{side}-{kind}"))
        }
        "border" => {
            let (width, style, color) = border_components(&parts)?;
            Ok(SIDES
                .iter()
                .flat_map(|side| border_side_longhands(side, &width, &style, &color))
                .collect())
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            let side = &property["border-".len()..];
            let (width, style, color) = border_components(&parts)?;
            Ok(border_side_longhands(side, &width, &style, &color))
        }
        "flex" => expand_flex(&parts, value),
        "flex-flow" => expand_flex_flow(&parts, value),
        "gap" | "grid-gap" => match parts[..] {
            [both] => Ok(pairs(&[("row-gap", both), ("column-gap", both)])),
            [row, column] => Ok(pairs(&[("row-gap", row), ("column-gap", column)])),
            _ => Err(ValueError::Keyword(value.to_string())),
        },
        "grid-row" | "grid-column" => {
            let lines = split_top_level(value, '/');
            let (start, end) = match lines.as_slice() {
                [start] => (*start, "auto"),
                [start, end] => (*start, *end),
                _ => return Err(ValueError::Keyword(value.to_string())),
            };
            if start.is_empty() || end.is_empty() {
                return Err(ValueError::Keyword(value.to_string()));
            }
            Ok(vec![
                (format!("{property}-start"), start.to_string()),
                (format!("{property}-end"), end.to_string()),
            ])
        }
        "background" => {
            let color = parts
                .iter()
                .rev()
                .find(|part| validate_color(part).is_ok())
                .map_or("transparent", |c| *c);
            Ok(pairs(&[("background-color", color)]))
        }
        _ => Ok(vec![(property.to_string(), value.to_string())]),
    }
}

/// `inherit`, `initial` or `unset`.
#[must_use]
pub fn is_css_wide_keyword(value: &str) -> bool {
    ["inherit", "initial", "unset"]
        .iter()
        .any(|k| value.eq_ignore_ascii_case(k))
}

/// The longhands a shorthand sets.
#[must_use]
pub fn longhands_of(property: &str) -> Vec<String> {
    let sided = |f: &dyn Fn(&str) -> String| SIDES.iter().map(|s| f(s)).collect::<Vec<_>>();
    match property {
        "margin" | "padding" => sided(&|side| format!("{property}-{side}")),
        "inset" => sided(&|side| side.to_string()),
        "border-width" | "border-style" | "border-color" => {
            let kind = &property["border-".len()..];
            sided(&|side| format!("border-{side}-{kind}"))
        }
        "border" => SIDES
            .iter()
            .flat_map(|side| ["width", "style", "color"].map(|k| format!("border-{side}-{k}")))
            .collect(),
        "border-top" | "border-right" | "border-bottom" | "border-left" => ["width", "style", "color"]
            .iter()
            .map(|k| format!("{property}-{k}"))
            .collect(),
        "flex" => vec!["flex-grow".into(), "flex-shrink".into(), "flex-basis".into()],
        "flex-flow" => vec!["flex-direction".into(), "flex-wrap".into()],
        "gap" | "grid-gap" => vec!["row-gap".into(), "column-gap".into()],
        "grid-row" | "grid-column" => vec![format!("{property}-start"), format!("{property}-end")],
        "background" => vec!["background-color".into()],
        other => vec![other.to_string()],
    }
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// [§ 4.2 Box edges](https://www.w3.org/TR/css-box-4/#margin-shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom margins are set to the first value and
/// the right and left margins are set to the second. If there are three
/// values, the top is set to the first value, the left and right are set to
/// the second, and the bottom is set to the third. If there are four values
/// they apply to the top, right, bottom, and left, respectively."
fn four_sides(
    parts: &[&str],
    name: impl Fn(&str) -> String,
) -> Result<Vec<(String, String)>, ValueError> {
    let [top, right, bottom, left] = match *parts {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return Err(ValueError::Keyword(parts.join(" "))),
    };
    Ok(vec![
        (name("top"), top.to_string()),
        (name("right"), right.to_string()),
        (name("bottom"), bottom.to_string()),
        (name("left"), left.to_string()),
    ])
}

/// [§ 4.4 Border Shorthand](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
///
/// "Omitted values are set to their initial values."
fn border_components(parts: &[&str]) -> Result<(String, String, String), ValueError> {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for part in parts {
        let lower = part.to_ascii_lowercase();
        if BORDER_STYLES.contains(&lower.as_str()) && style.is_none() {
            style = Some(lower);
        } else if is_border_width(&lower) && width.is_none() {
            width = Some(lower);
        } else if validate_color(part).is_ok() && color.is_none() {
            color = Some((*part).to_string());
        } else {
            return Err(ValueError::Keyword((*part).to_string()));
        }
    }
    Ok((
        width.unwrap_or_else(|| "medium".to_string()),
        style.unwrap_or_else(|| "none".to_string()),
        color.unwrap_or_else(|| "currentcolor".to_string()),
    ))
}

fn is_border_width(text: &str) -> bool {
    matches!(text, "thin" | "medium" | "thick")
        || text.starts_with("calc(")
        || text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn border_side_longhands(side: &str, width: &str, style: &str, color: &str) -> Vec<(String, String)> {
    vec![
        (format!("border-{side}-width"), width.to_string()),
        (format!("border-{side}-style"), style.to_string()),
        (format!("border-{side}-color"), color.to_string()),
    ]
}

/// [§ 7.1 The flex Shorthand](https://www.w3.org/TR/css-flexbox-1/#flex-property)
///
/// "When omitted from the flex shorthand, its specified value is 1" for
/// `flex-shrink`, and `flex-basis` becomes `0%` when only factors are given.
fn expand_flex(parts: &[&str], value: &str) -> Result<Vec<(String, String)>, ValueError> {
    let is_number = |text: &str| parse_number(text).is_ok();
    let (grow, shrink, basis) = match *parts {
        [keyword] if keyword.eq_ignore_ascii_case("none") => ("0", "0", "auto"),
        [keyword] if keyword.eq_ignore_ascii_case("auto") => ("1", "1", "auto"),
        [grow] if is_number(grow) => (grow, "1", "0%"),
        [basis] => ("1", "1", basis),
        [grow, shrink] if is_number(grow) && is_number(shrink) => (grow, shrink, "0%"),
        [grow, basis] if is_number(grow) => (grow, "1", basis),
        [grow, shrink, basis] if is_number(grow) && is_number(shrink) => (grow, shrink, basis),
        _ => return Err(ValueError::Keyword(value.to_string())),
    };
    Ok(pairs(&[
        ("flex-grow", grow),
        ("flex-shrink", shrink),
        ("flex-basis", basis),
    ]))
}

fn expand_flex_flow(parts: &[&str], value: &str) -> Result<Vec<(String, String)>, ValueError> {
    let mut direction = "row";
    let mut wrap = "nowrap";
    for part in parts {
        match *part {
            "row" | "row-reverse" | "column" | "column-reverse" => direction = *part,
            "nowrap" | "wrap" | "wrap-reverse" => wrap = *part,
            _ => return Err(ValueError::Keyword(value.to_string())),
        }
    }
    Ok(pairs(&[("flex-direction", direction), ("flex-wrap", wrap)]))
}
