//! Specified sizes and their used values.
//!
//! [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)

use trellis_common::ValueError;

use crate::style::values::CalcExpr;
use crate::style::{LengthContext, LengthValue};

/// A box dimension as specified, with every unit except percentages already
/// turned into pixels.
///
/// Each variant carries exactly what is needed to finish the job once the
/// containing block is known, so layout arithmetic never inspects strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    /// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
    Auto,
    /// An absolute length.
    Pixels(f64),
    /// A percentage of the containing block dimension.
    Percent(f64),
    /// `calc()` mixing percentages with lengths, evaluated once the base is
    /// known.
    Calc(CalcExpr, LengthContext),
}

impl Dimension {
    /// Parse `auto`, a length, a percentage or `calc()`.
    ///
    /// Font and viewport relative units resolve against `ctx` immediately.
    ///
    /// # Errors
    ///
    /// Fails for anything that is not one of the above.
    pub fn parse(text: &str, ctx: &LengthContext) -> Result<Self, ValueError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("auto") {
            return Ok(Dimension::Auto);
        }
        match LengthValue::parse(text)? {
            LengthValue::Percent(p) => Ok(Dimension::Percent(p)),
            LengthValue::Calc(expr) if expr.has_percentage() => Ok(Dimension::Calc(expr, *ctx)),
            length => length
                .to_px(ctx)
                .map(Dimension::Pixels)
                .ok_or_else(|| ValueError::Calc(text.to_string())),
        }
    }

    /// [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)
    ///
    /// Resolve against `base`, the relevant containing block dimension.
    /// Percentages with no definite base behave as `auto`.
    #[must_use]
    pub fn resolve(&self, base: Option<f32>) -> AutoOr {
        match self {
            Dimension::Auto => AutoOr::Auto,
            Dimension::Pixels(px) => AutoOr::Length(*px as f32),
            Dimension::Percent(p) => base.map_or(AutoOr::Auto, |b| AutoOr::Length(b * (*p as f32) / 100.0)),
            Dimension::Calc(expr, ctx) => {
                let ctx = ctx.with_percent_base(base.map(f64::from));
                expr.evaluate(&ctx)
                    .map_or(AutoOr::Auto, |px| AutoOr::Length(px as f32))
            }
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoOr {
    /// Filled in by the formatting context.
    #[default]
    Auto,
    /// A used length in pixels.
    Length(f32),
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, AutoOr::Auto)
    }

    /// Get the length value, or a default if 'auto'.
    #[must_use]
    pub const fn to_px_or(&self, default: f32) -> f32 {
        match self {
            AutoOr::Length(v) => *v,
            AutoOr::Auto => default,
        }
    }

    /// The length, if not 'auto'.
    #[must_use]
    pub const fn length(&self) -> Option<f32> {
        match self {
            AutoOr::Length(v) => Some(*v),
            AutoOr::Auto => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_font_relative_units_early() {
        let ctx = LengthContext {
            font_size: 20.0,
            ..LengthContext::default()
        };
        assert_eq!(Dimension::parse("2em", &ctx).unwrap(), Dimension::Pixels(40.0));
        assert_eq!(Dimension::parse("AUTO", &ctx).unwrap(), Dimension::Auto);
        assert_eq!(Dimension::parse("25%", &ctx).unwrap(), Dimension::Percent(25.0));
        assert!(Dimension::parse("wide", &ctx).is_err());
    }

    #[test]
    fn test_percent_needs_base() {
        assert_eq!(Dimension::Percent(50.0).resolve(Some(200.0)), AutoOr::Length(100.0));
        assert_eq!(Dimension::Percent(50.0).resolve(None), AutoOr::Auto);
    }

    #[test]
    fn test_calc_with_percentage() {
        let ctx = LengthContext::default();
        let dim = Dimension::parse("calc(100% - 20px)", &ctx).unwrap();
        assert_eq!(dim.resolve(Some(300.0)), AutoOr::Length(280.0));
        assert_eq!(dim.resolve(None), AutoOr::Auto);
    }
}
