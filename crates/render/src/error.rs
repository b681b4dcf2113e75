use thiserror::Error;

/// Failures reported by a [`Highlighter`](crate::Highlighter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The highlighter has no grammar for the language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// The highlighter could not be initialized.
    #[error("highlighter failed to load: {0}")]
    Load(String),
    /// Highlighting a block failed.
    #[error("highlighting failed: {0}")]
    Failed(String),
}

/// Errors surfaced while rendering blocks or pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// lol_html rejected the markup or a handler failed.
    #[error("HTML rewrite failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
    /// The highlighter failed.
    #[error(transparent)]
    Highlight(#[from] HighlightError),
    /// Configuration JSON could not be read.
    #[error("invalid render config: {0}")]
    Config(#[from] serde_json::Error),
}
