//! Extra vertical space between block siblings, keyed by tag pairs.
//!
//! This is a presentational table applied on top of ordinary margins, not
//! CSS margin collapsing. It is empty by default, so standard layout is
//! unaffected unless a host opts in.

use std::collections::BTreeMap;

/// Wildcard tag matching any element (and anonymous boxes).
pub const ANY_TAG: &str = "*";

/// Spacing in pixels between a previous block sibling and the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacingTable {
    pairs: BTreeMap<(String, String), f32>,
}

impl SpacingTable {
    /// An empty table: no extra spacing anywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A preset adding breathing room around headings, paragraphs and
    /// preformatted blocks.
    #[must_use]
    pub fn classic() -> Self {
        [
            ("h1", 10.0),
            ("h2", 8.0),
            ("h3", 6.0),
            ("p", 4.0),
            ("pre", 6.0),
        ]
        .into_iter()
        .fold(Self::new(), |table, (tag, px)| {
            table.with(tag, ANY_TAG, px).with(ANY_TAG, tag, px)
        })
    }

    /// Set the spacing for `(previous, current)`. Either side may be
    /// [`ANY_TAG`].
    pub fn set(&mut self, previous: &str, current: &str, px: f32) {
        let _ = self.pairs.insert(
            (previous.to_ascii_lowercase(), current.to_ascii_lowercase()),
            px,
        );
    }

    /// Builder form of [`SpacingTable::set`].
    #[must_use]
    pub fn with(mut self, previous: &str, current: &str, px: f32) -> Self {
        self.set(previous, current, px);
        self
    }

    /// Space to insert between a box with tag `previous` and the next box
    /// with tag `current` (`None` for anonymous boxes).
    ///
    /// An exact pair wins. Otherwise the space below `previous` and the space
    /// above `current` add up.
    #[must_use]
    pub fn between(&self, previous: Option<&str>, current: Option<&str>) -> f32 {
        if self.pairs.is_empty() {
            return 0.0;
        }
        let previous = previous.unwrap_or(ANY_TAG);
        let current = current.unwrap_or(ANY_TAG);
        if let Some(px) = self.lookup(previous, current) {
            return px;
        }
        let below = if previous == ANY_TAG {
            0.0
        } else {
            self.lookup(previous, ANY_TAG).unwrap_or(0.0)
        };
        let above = if current == ANY_TAG {
            0.0
        } else {
            self.lookup(ANY_TAG, current).unwrap_or(0.0)
        };
        below + above
    }

    fn lookup(&self, previous: &str, current: &str) -> Option<f32> {
        self.pairs
            .get(&(previous.to_string(), current.to_string()))
            .copied()
    }

    /// True when no pair is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
