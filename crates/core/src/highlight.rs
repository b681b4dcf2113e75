//! Highlight specs, the line-indexed highlight map, and palette resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of palette entries levels cycle through.
pub const PALETTE_SIZE: usize = 4;

/// Palette index for a nesting level: `((level - 1) mod 4) + 1`.
///
/// Level 0 is treated as level 1.
///
/// ```
/// use hlmark_core::palette_index;
///
/// assert_eq!(palette_index(1), 1);
/// assert_eq!(palette_index(4), 4);
/// assert_eq!(palette_index(5), palette_index(1));
/// ```
pub fn palette_index(level: usize) -> usize {
    (level.max(1) - 1) % PALETTE_SIZE + 1
}

/// Decoration applied to one output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpec {
    /// Nesting level the span was opened at (>= 1).
    pub level: usize,
    /// Explicit background color overriding the palette.
    #[serde(default, alias = "bgcolor", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl HighlightSpec {
    /// Spec resolved through the palette.
    pub fn level(level: usize) -> Self {
        Self { level, color: None }
    }

    /// Spec with an explicit background color.
    pub fn colored(level: usize, color: impl Into<String>) -> Self {
        Self {
            level,
            color: Some(color.into()),
        }
    }

    /// Resolve how a renderer should paint this line.
    pub fn decoration(&self) -> Decoration<'_> {
        match self.color.as_deref() {
            Some(color) => Decoration::Color(color),
            None => Decoration::Palette(palette_index(self.level)),
        }
    }
}

/// Resolved paint for a highlighted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration<'a> {
    /// Palette entry 1..=4, styled by the site stylesheet.
    Palette(usize),
    /// Explicit background color.
    Color(&'a str),
}

impl Decoration<'_> {
    /// CSS class for palette decorations (`highlight-level-N`).
    pub fn class_name(&self) -> Option<String> {
        match self {
            Decoration::Palette(index) => Some(format!("highlight-level-{}", index)),
            Decoration::Color(_) => None,
        }
    }

    /// Inline style for explicit colors.
    pub fn inline_style(&self) -> Option<String> {
        match self {
            Decoration::Palette(_) => None,
            Decoration::Color(color) => Some(format!(
                "background-color: {}; display: inline-block; width: 100%; position: relative",
                color
            )),
        }
    }
}

/// Sparse map from cleaned line number (1-based) to its highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightMap(BTreeMap<usize, HighlightSpec>);

impl HighlightMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the highlight of a line, replacing any earlier one.
    pub fn insert(&mut self, line: usize, spec: HighlightSpec) {
        self.0.insert(line, spec);
    }

    /// Highlight of a line, if any.
    pub fn get(&self, line: usize) -> Option<&HighlightSpec> {
        self.0.get(&line)
    }

    /// Iterates highlighted lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &HighlightSpec)> {
        self.0.iter().map(|(line, spec)| (*line, spec))
    }

    /// Highlighted line numbers in ascending order.
    pub fn lines(&self) -> Vec<usize> {
        self.0.keys().copied().collect()
    }

    /// Number of highlighted lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no line is highlighted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
