//! Common infrastructure for the trellis layout engine.
//!
//! This crate provides the pieces every pipeline stage shares:
//! - **Diagnostics** - the non-fatal channel malformed input is reported through
//! - **Errors** - typed parse and measurement errors

pub mod diagnostics;
pub mod error;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{MeasureError, ValueError};
