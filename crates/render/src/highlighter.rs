//! The seam between block rendering and an actual syntax highlighter.
//!
//! Any `Fn(code, language, theme) -> Result<String, HighlightError>` is a
//! [`Highlighter`]. Output must be HTML with one `<span class="line">` per
//! source line inside a `<pre>`; decoration counts those spans.

use crate::error::HighlightError;
use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::OnceCell;

/// Turns cleaned source into highlighted HTML.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `language` using `theme`.
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Result<String, HighlightError>;
}

impl<F> Highlighter for F
where
    F: Fn(&str, &str, &str) -> Result<String, HighlightError> + Send + Sync,
{
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Result<String, HighlightError> {
        (self)(code, language, theme)
    }
}

/// Escaping-only highlighter producing the line structure decoration expects.
///
/// Used when no grammar-aware highlighter is plugged in, and in tests.
#[derive(Debug, Clone, Default)]
pub struct PlainHighlighter {
    languages: Vec<String>,
}

impl PlainHighlighter {
    /// Accepts every language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only the listed languages.
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Result<String, HighlightError> {
        if !self.languages.is_empty() && !self.languages.iter().any(|l| l == language) {
            return Err(HighlightError::UnsupportedLanguage(language.to_string()));
        }

        let mut html = String::with_capacity(code.len() + 64);
        html.push_str("<pre class=\"hlmark-plain ");
        html.push_str(&encode_double_quoted_attribute(theme));
        html.push_str("\" tabindex=\"0\"><code class=\"language-");
        html.push_str(&encode_double_quoted_attribute(language));
        html.push_str("\">");
        for (index, line) in code.split('\n').enumerate() {
            if index > 0 {
                html.push('\n');
            }
            html.push_str("<span class=\"line\">");
            html.push_str(&encode_text(line));
            html.push_str("</span>");
        }
        html.push_str("</code></pre>");
        Ok(html)
    }
}

/// Holds a highlighter that is loaded at most once.
///
/// A failed load leaves the cache empty, so the next request retries.
#[derive(Default)]
pub struct HighlighterCache {
    cell: OnceCell<Box<dyn Highlighter>>,
}

impl HighlighterCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached highlighter, running `load` if none is cached yet.
    pub fn get_or_load<F>(&self, load: F) -> Result<&dyn Highlighter, HighlightError>
    where
        F: FnOnce() -> Result<Box<dyn Highlighter>, HighlightError>,
    {
        self.cell
            .get_or_try_init(load)
            .map(|highlighter| highlighter.as_ref())
    }

    /// Check if a highlighter has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drops the cached highlighter.
    pub fn reset(&mut self) {
        self.cell.take();
    }
}

impl std::fmt::Debug for HighlighterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlighterCache")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
