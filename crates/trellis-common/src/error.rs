//! Error types shared across the engine.
//!
//! These never escape a layout pass. Resolution boundaries turn them into a
//! default value plus a [`Diagnostic`](crate::Diagnostic).

use thiserror::Error;

/// A style value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value was empty after trimming.
    #[error("empty value")]
    Empty,
    /// A number could not be read.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    /// A dimension carried a unit we do not resolve.
    #[error("unknown unit {unit:?} in {value:?}")]
    UnknownUnit {
        /// The unit as written.
        unit: String,
        /// The full value.
        value: String,
    },
    /// A calc() expression was malformed.
    #[error("malformed calc() expression {0:?}")]
    Calc(String),
    /// calc() divided by zero.
    #[error("division by zero in {0:?}")]
    DivisionByZero(String),
    /// A color could not be parsed.
    #[error("invalid color {0:?}")]
    Color(String),
    /// A keyword outside the property's grammar.
    #[error("unexpected keyword {0:?}")]
    Keyword(String),
    /// A grid track list could not be parsed.
    #[error("invalid track {0:?}")]
    Track(String),
}

/// Text measurement failed in the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The requested font family is unavailable.
    #[error("font family {0:?} is not available")]
    FontUnavailable(String),
    /// Any other host-side failure.
    #[error("text measurement failed: {0}")]
    Failed(String),
}
