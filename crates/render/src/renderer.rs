//! The [`Renderer`] entry point tying configuration to a lazily loaded highlighter.

use crate::block::{BlockOutcome, CodeBlock, SkipReason, render_block, skip_reason};
use crate::config::RenderConfig;
use crate::error::{HighlightError, RenderError};
use crate::highlighter::{Highlighter, HighlighterCache, PlainHighlighter};
use crate::page::{self, PageOptions, PageResult};
use crate::theme::ThemeMode;

type Loader = dyn Fn(&RenderConfig) -> Result<Box<dyn Highlighter>, HighlightError> + Send + Sync;

/// Renders blocks and pages with one configuration and a lazily loaded
/// highlighter.
pub struct Renderer {
    config: RenderConfig,
    cache: HighlighterCache,
    loader: Box<Loader>,
}

impl Renderer {
    /// Renderer backed by [`PlainHighlighter`].
    pub fn new(config: RenderConfig) -> Self {
        Self::with_loader(config, |_| Ok(Box::new(PlainHighlighter::new())))
    }

    /// Renderer whose highlighter is built by `loader` on first use.
    ///
    /// A failing loader is called again on the next render.
    pub fn with_loader<F>(config: RenderConfig, loader: F) -> Self
    where
        F: Fn(&RenderConfig) -> Result<Box<dyn Highlighter>, HighlightError> + Send + Sync + 'static,
    {
        Self {
            config,
            cache: HighlighterCache::new(),
            loader: Box::new(loader),
        }
    }

    /// Renderer using an already constructed highlighter.
    pub fn with_highlighter<H>(config: RenderConfig, highlighter: H) -> Self
    where
        H: Highlighter + Clone + 'static,
    {
        Self::with_loader(config, move |_| Ok(Box::new(highlighter.clone())))
    }

    /// Reads the configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Ok(Self::new(RenderConfig::from_json(json)?))
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Returns the highlighter, loading it on first use.
    pub fn highlighter(&self) -> Result<&dyn Highlighter, HighlightError> {
        self.cache.get_or_load(|| {
            log::debug!("loading highlighter for {} languages", self.config.languages.len());
            (self.loader)(&self.config)
        })
    }

    /// Check if the highlighter has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Drops the loaded highlighter; the next render loads a fresh one.
    pub fn reset_highlighter(&mut self) {
        self.cache.reset();
    }

    /// Renders one block for a page in `mode`.
    pub fn render_block(&self, block: &CodeBlock, mode: ThemeMode) -> BlockOutcome {
        if let Some(reason) = skip_reason(block, &self.config) {
            return BlockOutcome::Skipped(reason);
        }
        match self.highlighter() {
            Ok(highlighter) => {
                render_block(block, &self.config, highlighter, self.config.theme_for(mode))
            }
            Err(error) => {
                log::warn!("highlighter not available: {}", error);
                BlockOutcome::Skipped(SkipReason::HighlighterUnavailable)
            }
        }
    }

    /// Re-highlights every code block of an HTML page.
    pub fn render_page(&self, html: &str, options: &PageOptions) -> Result<PageResult, RenderError> {
        page::render_page(self, html, options)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
