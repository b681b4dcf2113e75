//! Rendering of a single code block.

use crate::config::RenderConfig;
use crate::decorate::{BlockWrapper, decorate_block};
use crate::error::RenderError;
use crate::highlighter::Highlighter;
use hlmark_core::{
    PLAIN_TEXT, ParseOutput, Severity, is_passthrough, language_from_class, normalize_language,
    parse_directives,
};

/// A code block as found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Block text, directives included.
    pub source: String,
    /// Declared language tag (`julia-repl`, `nohighlight`, ...), if any.
    pub language: Option<String>,
}

impl CodeBlock {
    /// Creates a block with an explicit language tag.
    pub fn new(source: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            source: source.into(),
            language: language.map(str::to_string),
        }
    }

    /// Creates a block from the `class` attribute of its `<code>` element.
    pub fn from_class(source: impl Into<String>, class_attr: Option<&str>) -> Self {
        Self::new(source, class_attr.and_then(language_from_class))
    }

    /// Declared language, or plain text.
    pub fn language_tag(&self) -> &str {
        self.language.as_deref().unwrap_or(PLAIN_TEXT)
    }
}

/// Why a block was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Plain text or `nohighlight`.
    Passthrough,
    /// Language outside the configured allow-list.
    Unsupported(String),
    /// No highlighter could be loaded.
    HighlighterUnavailable,
}

/// Result of rendering one block.
#[derive(Debug)]
pub enum BlockOutcome {
    /// Highlighted and decorated HTML replacing the block.
    Rendered {
        /// Replacement markup.
        html: String,
        /// Directive parse of the block.
        parse: ParseOutput,
    },
    /// The block keeps its original markup.
    Skipped(SkipReason),
    /// Highlighting or decoration failed; the block keeps its original markup.
    Failed {
        /// What went wrong.
        error: RenderError,
        /// Directive parse of the block.
        parse: ParseOutput,
    },
}

impl BlockOutcome {
    /// Replacement markup, when the block was rendered.
    pub fn html(&self) -> Option<&str> {
        match self {
            BlockOutcome::Rendered { html, .. } => Some(html),
            _ => None,
        }
    }

    /// Directive parse, when the block got that far.
    pub fn parse(&self) -> Option<&ParseOutput> {
        match self {
            BlockOutcome::Rendered { parse, .. } | BlockOutcome::Failed { parse, .. } => {
                Some(parse)
            }
            BlockOutcome::Skipped(_) => None,
        }
    }
}

/// Decides from the language alone whether a block is left untouched.
pub fn skip_reason(block: &CodeBlock, config: &RenderConfig) -> Option<SkipReason> {
    let tag = block.language_tag();
    if is_passthrough(tag) {
        return Some(SkipReason::Passthrough);
    }
    let language = normalize_language(tag);
    if !config.supports(&language) {
        log::debug!("skipping unsupported language: {}", language);
        return Some(SkipReason::Unsupported(language.into_owned()));
    }
    None
}

/// Renders one block: language policy, directive parsing, highlighting of
/// the cleaned source, then decoration.
///
/// Failures never escape; they are logged and reported in the outcome.
pub fn render_block(
    block: &CodeBlock,
    config: &RenderConfig,
    highlighter: &dyn Highlighter,
    theme: &str,
) -> BlockOutcome {
    if let Some(reason) = skip_reason(block, config) {
        return BlockOutcome::Skipped(reason);
    }
    let language = normalize_language(block.language_tag());

    let parse = parse_directives(&block.source);
    for diagnostic in &parse.diagnostics {
        match diagnostic.severity() {
            Severity::Error => log::error!("{} block: {}", language, diagnostic),
            Severity::Warning => log::warn!("{} block: {}", language, diagnostic),
        }
    }

    let markup = match highlighter.highlight(&parse.cleaned, &language, theme) {
        Ok(markup) => markup,
        Err(error) => {
            log::warn!("failed to highlight {} block: {}", language, error);
            return BlockOutcome::Failed {
                error: error.into(),
                parse,
            };
        }
    };

    let wrapper = BlockWrapper {
        original_code: &block.source,
        original_lang: block.language.as_deref(),
        copy_button: config.copy_button,
    };
    match decorate_block(&markup, &parse.highlights, &wrapper) {
        Ok(html) => BlockOutcome::Rendered { html, parse },
        Err(error) => {
            log::warn!("failed to decorate {} block: {}", language, error);
            BlockOutcome::Failed { error, parse }
        }
    }
}
