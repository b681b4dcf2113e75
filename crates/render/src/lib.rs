//! Re-highlights the code blocks of a rendered documentation page and paints
//! the lines selected by `@highlight` directives.
//!
//! A [`Renderer`] owns the configuration and a lazily loaded [`Highlighter`].
//! Pages are rewritten with lol_html: blocks are collected, rendered (on a
//! bounded rayon pool when the `parallel` feature is on), then spliced back.
#![deny(missing_docs)]

/// Per-block rendering pipeline.
pub mod block;
/// Renderer configuration.
pub mod config;
/// Line decoration of highlighted markup.
pub mod decorate;
/// Error types.
pub mod error;
/// Highlighter seam and its lazily loaded cache.
pub mod highlighter;
/// Page-level collection and replacement of code blocks.
pub mod page;
/// Light/dark theme selection.
pub mod theme;

mod batch;
mod renderer;

pub use block::{BlockOutcome, CodeBlock, SkipReason, render_block, skip_reason};
pub use config::RenderConfig;
pub use decorate::{BLOCK_CLASS, BlockWrapper, apply_highlights, decorate_block};
pub use error::{HighlightError, RenderError};
pub use highlighter::{Highlighter, HighlighterCache, PlainHighlighter};
pub use page::{BlockDiagnostic, PageOptions, PageResult, PageStats};
pub use renderer::Renderer;
pub use theme::{ThemeMode, detect_dark_mode};
