//! Layout diagnostics with deduplication.
//!
//! A layout pass never fails. Every recoverable problem (a malformed length,
//! an unknown `display` keyword, a text run the host could not measure)
//! degrades to a default value and leaves a [`Diagnostic`] behind. The
//! collector is owned by one pass and handed back beside the box tree, so
//! two documents laid out in sequence never see each other's records.

use std::collections::HashSet;

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Category of a recoverable problem found during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A length, number or calc() expression that could not be parsed.
    /// Resolved to 0.
    MalformedValue,
    /// A `display` keyword the builder does not know. Resolved to block.
    UnknownDisplay,
    /// A color value that could not be parsed. The declaration is skipped.
    InvalidColor,
    /// A property name outside the known property table.
    UnknownProperty,
    /// The host's text measurement failed. The run is treated as zero-width.
    MeasureFailed,
    /// A `grid-template-*` track list that could not be parsed.
    InvalidTrackList,
    /// A `grid-row` / `grid-column` placement that could not be parsed.
    InvalidPlacement,
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The property involved, when there is one.
    pub property: Option<String>,
    /// The offending value as written.
    pub value: String,
    /// Human-readable detail.
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property {
            Some(property) => write!(
                f,
                "[{}] {property}: {:?}: {}",
                self.kind, self.value, self.message
            ),
            None => write!(f, "[{}] {:?}: {}", self.kind, self.value, self.message),
        }
    }
}

/// Per-pass diagnostics collector.
///
/// Identical `(kind, property, value)` triples are recorded once, so a
/// malformed rule that matches a thousand elements produces one record.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    seen: HashSet<(DiagnosticKind, Option<String>, String)>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem (once per unique kind, property and value).
    ///
    /// Newly recorded diagnostics are also forwarded to the `log` facade at
    /// `warn` level.
    ///
    /// # Example
    /// ```
    /// use trellis_common::{DiagnosticKind, Diagnostics};
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// diagnostics.report(DiagnosticKind::MalformedValue, Some("width"), "12qq", "unknown unit");
    /// diagnostics.report(DiagnosticKind::MalformedValue, Some("width"), "12qq", "unknown unit");
    /// assert_eq!(diagnostics.len(), 1);
    /// ```
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        property: Option<&str>,
        value: &str,
        message: impl Into<String>,
    ) {
        let key = (kind, property.map(str::to_string), value.to_string());
        if !self.seen.insert(key) {
            return;
        }
        let diagnostic = Diagnostic {
            kind,
            property: property.map(str::to_string),
            value: value.to_string(),
            message: message.into(),
        };
        log::warn!("{diagnostic}");
        self.records.push(diagnostic);
    }

    /// Append every record of `other` that this collector has not seen.
    pub fn merge(&mut self, other: Self) {
        for record in other.records {
            let key = (record.kind, record.property.clone(), record.value.clone());
            if self.seen.insert(key) {
                self.records.push(record);
            }
        }
    }

    /// All records in the order they were first reported.
    #[must_use]
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Iterate over records of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.kind == kind)
    }

    /// Number of unique records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for Diagnostics {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deduplicates_same_value() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(DiagnosticKind::UnknownDisplay, Some("display"), "bogus", "x");
        diagnostics.report(DiagnosticKind::UnknownDisplay, Some("display"), "bogus", "y");
        diagnostics.report(DiagnosticKind::UnknownDisplay, Some("display"), "weird", "z");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.records()[0].message, "x");
    }

    #[test]
    fn test_merge_skips_seen_records() {
        let mut a = Diagnostics::new();
        a.report(DiagnosticKind::MalformedValue, Some("width"), "1zz", "bad");
        let mut b = Diagnostics::new();
        b.report(DiagnosticKind::MalformedValue, Some("width"), "1zz", "bad");
        b.report(DiagnosticKind::MeasureFailed, None, "hello", "font missing");
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.of_kind(DiagnosticKind::MeasureFailed).count(), 1);
    }

    #[test]
    fn test_kind_keyword_round_trip() {
        assert_eq!(DiagnosticKind::InvalidTrackList.to_string(), "invalid-track-list");
        let parsed: DiagnosticKind = "unknown-display".parse().unwrap();
        assert_eq!(parsed, DiagnosticKind::UnknownDisplay);
    }
}
