//! CSS length values.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! Absolute units (`pt`, `pc`, `in`, `cm`, `mm`, `Q`) are folded into `px`
//! at parse time. Font-relative and viewport-relative units stay symbolic
//! until a [`LengthContext`] is available.

use serde::Serialize;
use trellis_common::ValueError;

use super::{parse_number, split_number_unit};

/// Default font size when nothing else applies (16px, the initial `medium`).
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 5.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
///
/// "1in = 2.54cm = 96px", "1pt = 1/72th of 1in", "1pc = 1/6th of 1in"
const PX_PER_IN: f64 = 96.0;

/// A parsed length or percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LengthValue {
    /// Absolute pixels.
    Px(f64),
    /// Multiple of the element's font size.
    Em(f64),
    /// Multiple of the root font size.
    Rem(f64),
    /// x-height, approximated as half an em.
    Ex(f64),
    /// Advance of "0", approximated as half an em.
    Ch(f64),
    /// 1% of the viewport width.
    Vw(f64),
    /// 1% of the viewport height.
    Vh(f64),
    /// 1% of the smaller viewport dimension.
    Vmin(f64),
    /// 1% of the larger viewport dimension.
    Vmax(f64),
    /// Percentage of a property-specific base.
    Percent(f64),
    /// A `calc()` expression.
    Calc(CalcExpr),
}

/// Everything a length needs to become pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthContext {
    /// The element's own computed font size.
    pub font_size: f64,
    /// The root element's font size (for `rem`).
    pub root_font_size: f64,
    /// Viewport width.
    pub viewport_width: f64,
    /// Viewport height.
    pub viewport_height: f64,
    /// What 100% means for the property being resolved, if anything.
    pub percent_base: Option<f64>,
}

impl Default for LengthContext {
    fn default() -> Self {
        LengthContext {
            font_size: DEFAULT_FONT_SIZE_PX,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            viewport_width: 0.0,
            viewport_height: 0.0,
            percent_base: None,
        }
    }
}

impl LengthContext {
    /// Same context with a different percentage base.
    #[must_use]
    pub const fn with_percent_base(mut self, base: Option<f64>) -> Self {
        self.percent_base = base;
        self
    }
}

impl LengthValue {
    /// Parse a single length token: `12px`, `1.5em`, `50%`, `0`, `calc(...)`.
    ///
    /// Unitless numbers are taken as pixels.
    ///
    /// # Errors
    ///
    /// Fails on empty input, unreadable numbers, unknown units and malformed
    /// `calc()` expressions.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        if let Some(inner) = strip_function(trimmed, "calc") {
            return CalcExpr::parse(inner).map(LengthValue::Calc);
        }

        let (number, unit) = split_number_unit(trimmed);
        if number.is_empty() {
            return Err(ValueError::InvalidNumber(trimmed.to_string()));
        }
        let n = parse_number(number)?;
        let value = match unit.to_ascii_lowercase().as_str() {
            "" | "px" => LengthValue::Px(n),
            "em" => LengthValue::Em(n),
            "rem" => LengthValue::Rem(n),
            "ex" => LengthValue::Ex(n),
            "ch" => LengthValue::Ch(n),
            "vw" => LengthValue::Vw(n),
            "vh" => LengthValue::Vh(n),
            "vmin" => LengthValue::Vmin(n),
            "vmax" => LengthValue::Vmax(n),
            "%" => LengthValue::Percent(n),
            "pt" => LengthValue::Px(n * PX_PER_IN / 72.0),
            "pc" => LengthValue::Px(n * PX_PER_IN / 6.0),
            "in" => LengthValue::Px(n * PX_PER_IN),
            "cm" => LengthValue::Px(n * PX_PER_IN / 2.54),
            "mm" => LengthValue::Px(n * PX_PER_IN / 25.4),
            "q" => LengthValue::Px(n * PX_PER_IN / 101.6),
            other => {
                return Err(ValueError::UnknownUnit {
                    unit: other.to_string(),
                    value: trimmed.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Whether the value (or any calc() operand) depends on a percentage base.
    #[must_use]
    pub fn has_percentage(&self) -> bool {
        match self {
            LengthValue::Percent(_) => true,
            LengthValue::Calc(expr) => expr.has_percentage(),
            _ => false,
        }
    }

    /// Resolve to pixels.
    ///
    /// Returns `None` only when a percentage is involved and `ctx` carries
    /// no percentage base.
    #[must_use]
    pub fn to_px(&self, ctx: &LengthContext) -> Option<f64> {
        let px = match *self {
            LengthValue::Px(n) => n,
            LengthValue::Em(n) => n * ctx.font_size,
            LengthValue::Rem(n) => n * ctx.root_font_size,
            LengthValue::Ex(n) | LengthValue::Ch(n) => n * ctx.font_size * 0.5,
            LengthValue::Vw(n) => n * ctx.viewport_width / 100.0,
            LengthValue::Vh(n) => n * ctx.viewport_height / 100.0,
            LengthValue::Vmin(n) => n * ctx.viewport_width.min(ctx.viewport_height) / 100.0,
            LengthValue::Vmax(n) => n * ctx.viewport_width.max(ctx.viewport_height) / 100.0,
            LengthValue::Percent(p) => ctx.percent_base? * p / 100.0,
            LengthValue::Calc(ref expr) => expr.evaluate(ctx)?,
        };
        Some(px)
    }
}

/// `name(...)` → the text between the parentheses.
pub(crate) fn strip_function<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let open = text.find('(')?;
    if !text[..open].trim().eq_ignore_ascii_case(name) || !text.ends_with(')') {
        return None;
    }
    Some(&text[open + 1..text.len() - 1])
}

/// [§ 10.1 calc()](https://www.w3.org/TR/css-values-4/#calc-func)
///
/// Arithmetic over lengths and numbers. Operators are applied strictly left
/// to right: `calc(10px + 5px * 2)` is `30px`. Parenthesized groups are
/// evaluated first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcExpr {
    /// Leftmost operand.
    pub first: CalcOperand,
    /// Remaining `(operator, operand)` pairs in source order.
    pub rest: Vec<(CalcOp, CalcOperand)>,
}

/// A calc() operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CalcOperand {
    /// A unitless number.
    Number(f64),
    /// A length or percentage.
    Length(Box<LengthValue>),
    /// A parenthesized sub-expression.
    Group(Box<CalcExpr>),
}

/// A calc() operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalcOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

enum CalcToken<'a> {
    Operand(&'a str),
    Group(&'a str),
    Op(CalcOp),
}

impl CalcExpr {
    /// Parse the text inside `calc( ... )`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Calc`] for unbalanced parentheses, missing
    /// operands or stray operators, and [`ValueError::DivisionByZero`] when
    /// the divisor is a literal zero.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let tokens = tokenize_calc(text)?;
        let mut iter = tokens.into_iter();
        let first = match iter.next() {
            Some(token) => parse_operand(token, text)?,
            None => return Err(ValueError::Calc(text.to_string())),
        };
        let mut rest = Vec::new();
        while let Some(token) = iter.next() {
            let CalcToken::Op(op) = token else {
                return Err(ValueError::Calc(text.to_string()));
            };
            let operand = match iter.next() {
                Some(token) => parse_operand(token, text)?,
                None => return Err(ValueError::Calc(text.to_string())),
            };
            if op == CalcOp::Div && matches!(operand, CalcOperand::Number(n) if n == 0.0) {
                return Err(ValueError::DivisionByZero(text.to_string()));
            }
            rest.push((op, operand));
        }
        Ok(CalcExpr { first, rest })
    }

    /// Whether any operand is a percentage.
    #[must_use]
    pub fn has_percentage(&self) -> bool {
        std::iter::once(&self.first)
            .chain(self.rest.iter().map(|(_, operand)| operand))
            .any(|operand| match operand {
                CalcOperand::Number(_) => false,
                CalcOperand::Length(length) => length.has_percentage(),
                CalcOperand::Group(group) => group.has_percentage(),
            })
    }

    /// Evaluate left to right. A runtime division by zero yields 0.
    #[must_use]
    pub fn evaluate(&self, ctx: &LengthContext) -> Option<f64> {
        let mut acc = evaluate_operand(&self.first, ctx)?;
        for (op, operand) in &self.rest {
            let value = evaluate_operand(operand, ctx)?;
            acc = match op {
                CalcOp::Add => acc + value,
                CalcOp::Sub => acc - value,
                CalcOp::Mul => acc * value,
                CalcOp::Div if value == 0.0 => 0.0,
                CalcOp::Div => acc / value,
            };
        }
        Some(acc)
    }
}

fn evaluate_operand(operand: &CalcOperand, ctx: &LengthContext) -> Option<f64> {
    match operand {
        CalcOperand::Number(n) => Some(*n),
        CalcOperand::Length(length) => length.to_px(ctx),
        CalcOperand::Group(group) => group.evaluate(ctx),
    }
}

fn parse_operand(token: CalcToken<'_>, whole: &str) -> Result<CalcOperand, ValueError> {
    match token {
        CalcToken::Op(_) => Err(ValueError::Calc(whole.to_string())),
        CalcToken::Group(inner) => Ok(CalcOperand::Group(Box::new(CalcExpr::parse(inner)?))),
        CalcToken::Operand(text) => {
            let (number, unit) = split_number_unit(text);
            if unit.is_empty() {
                Ok(CalcOperand::Number(parse_number(number)?))
            } else {
                Ok(CalcOperand::Length(Box::new(LengthValue::parse(text)?)))
            }
        }
    }
}

/// Break a calc() body into operands, groups and operators.
///
/// `+` and `-` are operators only when followed by whitespace (CSS requires
/// whitespace around them); otherwise they sign the following number.
fn tokenize_calc(text: &str) -> Result<Vec<CalcToken<'_>>, ValueError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match b {
            b'*' => {
                tokens.push(CalcToken::Op(CalcOp::Mul));
                i += 1;
            }
            b'/' => {
                tokens.push(CalcToken::Op(CalcOp::Div));
                i += 1;
            }
            b'+' | b'-'
                if bytes.get(i + 1).is_none_or(u8::is_ascii_whitespace) =>
            {
                tokens.push(CalcToken::Op(if b == b'+' { CalcOp::Add } else { CalcOp::Sub }));
                i += 1;
            }
            b')' => return Err(ValueError::Calc(text.to_string())),
            _ => {
                // Either `(` / `calc(` opening a group, or a plain operand.
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'*' | b'/' | b'(' | b')')
                {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'(' {
                    let prefix = &text[start..i];
                    if !prefix.is_empty() && !prefix.eq_ignore_ascii_case("calc") {
                        return Err(ValueError::Calc(text.to_string()));
                    }
                    let close = matching_paren(bytes, i)
                        .ok_or_else(|| ValueError::Calc(text.to_string()))?;
                    tokens.push(CalcToken::Group(&text[i + 1..close]));
                    i = close + 1;
                } else {
                    tokens.push(CalcToken::Operand(&text[start..i]));
                }
            }
        }
    }
    Ok(tokens)
}

fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0_u32;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}
