//! Page rewriting.
//!
//! A first lol_html pass records every `<pre>` in document order, with the
//! text of its `<code>` child, the language class, and any source stored by
//! an earlier render. Blocks are rendered, then a second pass swaps each
//! rendered `<pre>` for its replacement. `<pre>` elements are matched between
//! passes by position.

use crate::batch::map_bounded;
use crate::block::{BlockOutcome, CodeBlock, SkipReason, render_block, skip_reason};
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::theme::ThemeMode;
use hlmark_core::Diagnostic;
use html_escape::decode_html_entities;
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

/// Per-call page options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Forces a theme mode instead of detecting it from `<html>`.
    pub mode: Option<ThemeMode>,
}

impl PageOptions {
    /// Options forcing `mode`.
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self { mode: Some(mode) }
    }
}

/// A directive diagnostic tagged with the block it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDiagnostic {
    /// Zero-based index of the block among the page's code blocks.
    pub block: usize,
    /// The diagnostic.
    pub diagnostic: Diagnostic,
}

/// Counters for one page render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    /// `<pre>` elements holding code.
    pub blocks_found: usize,
    /// Blocks replaced with highlighted markup.
    pub blocks_highlighted: usize,
    /// Replaced blocks that came from an earlier render.
    pub blocks_rerendered: usize,
    /// Blocks left as they were.
    pub blocks_skipped: usize,
    /// Blocks whose highlighting failed.
    pub blocks_failed: usize,
    /// Languages outside the allow-list, sorted.
    pub unsupported_languages: Vec<String>,
    /// Directive diagnostics across all blocks.
    pub diagnostics: Vec<BlockDiagnostic>,
}

/// Output of [`Renderer::render_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Rewritten page.
    pub html: String,
    /// Mode the page was rendered in.
    pub mode: ThemeMode,
    /// Theme handed to the highlighter.
    pub theme: String,
    /// Counters.
    pub stats: PageStats,
}

#[derive(Debug, Default)]
struct FoundPre {
    text: String,
    code_class: Option<String>,
    has_code: bool,
    stored_code: Option<String>,
    stored_lang: Option<String>,
}

impl FoundPre {
    fn into_block(self) -> Option<(CodeBlock, bool)> {
        if let Some(source) = self.stored_code {
            return Some((CodeBlock::new(source, self.stored_lang.as_deref()), true));
        }
        if !self.has_code {
            return None;
        }
        let source = decode_html_entities(&self.text).into_owned();
        Some((CodeBlock::from_class(source, self.code_class.as_deref()), false))
    }
}

#[derive(Debug, Default)]
struct PageScan {
    pres: Vec<FoundPre>,
    root_class: Option<String>,
    root_theme: Option<String>,
}

fn decoded_attribute(value: Option<String>) -> Option<String> {
    value.map(|v| decode_html_entities(&v).into_owned())
}

fn scan_page(html: &str) -> Result<PageScan, RenderError> {
    let scan = RefCell::new(PageScan::default());

    let element_content_handlers = vec![
        element!("html", |el| {
            let mut scan = scan.borrow_mut();
            scan.root_class = el.get_attribute("class");
            scan.root_theme = el.get_attribute("data-theme");
            Ok(())
        }),
        element!("pre", |el| {
            scan.borrow_mut().pres.push(FoundPre {
                stored_code: decoded_attribute(el.get_attribute("data-original-code")),
                stored_lang: decoded_attribute(el.get_attribute("data-original-lang")),
                ..FoundPre::default()
            });
            Ok(())
        }),
        element!("pre code", |el| {
            if let Some(pre) = scan.borrow_mut().pres.last_mut()
                && !pre.has_code
            {
                pre.has_code = true;
                pre.code_class = el.get_attribute("class");
            }
            Ok(())
        }),
        text!("pre code", |chunk| {
            if let Some(pre) = scan.borrow_mut().pres.last_mut() {
                pre.text.push_str(chunk.as_str());
            }
            Ok(())
        }),
    ];

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(scan.into_inner())
}

fn replace_blocks(html: &str, replacements: &[Option<String>]) -> Result<String, RenderError> {
    let position = Cell::new(0usize);

    let element_content_handlers = vec![element!("pre", |el| {
        let index = position.get();
        position.set(index + 1);
        if let Some(Some(markup)) = replacements.get(index) {
            el.replace(markup, ContentType::Html);
        }
        Ok(())
    })];

    Ok(rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::new()
        },
    )?)
}

pub(crate) fn render_page(
    renderer: &Renderer,
    html: &str,
    options: &PageOptions,
) -> Result<PageResult, RenderError> {
    let config = renderer.config();
    let scan = if html.contains("<pre") {
        scan_page(html)?
    } else {
        PageScan::default()
    };

    let mode = options.mode.unwrap_or_else(|| {
        ThemeMode::from_root_attributes(scan.root_class.as_deref(), scan.root_theme.as_deref())
    });
    let theme = config.theme_for(mode).to_string();
    let mut stats = PageStats::default();

    let pre_count = scan.pres.len();
    let mut blocks = Vec::new();
    for (position, pre) in scan.pres.into_iter().enumerate() {
        if let Some((block, rerender)) = pre.into_block() {
            blocks.push((position, block, rerender));
        }
    }
    stats.blocks_found = blocks.len();

    if blocks.is_empty() {
        return Ok(PageResult {
            html: html.to_string(),
            mode,
            theme,
            stats,
        });
    }
    log::debug!("rendering {} code blocks with theme {}", blocks.len(), theme);

    let needs_highlighter = blocks
        .iter()
        .any(|(_, block, _)| skip_reason(block, config).is_none());
    let highlighter = if needs_highlighter {
        match renderer.highlighter() {
            Ok(highlighter) => Some(highlighter),
            Err(error) => {
                log::warn!("highlighter not available, leaving page unchanged: {}", error);
                None
            }
        }
    } else {
        None
    };

    let outcomes = map_bounded(
        blocks,
        config.effective_batch_size(),
        |(position, block, rerender)| {
            let outcome = match highlighter {
                Some(highlighter) => render_block(&block, config, highlighter, &theme),
                None => BlockOutcome::Skipped(
                    skip_reason(&block, config).unwrap_or(SkipReason::HighlighterUnavailable),
                ),
            };
            (position, rerender, outcome)
        },
    );

    let mut replacements: Vec<Option<String>> = vec![None; pre_count];
    let mut unsupported = BTreeSet::new();
    for (index, (position, rerender, outcome)) in outcomes.into_iter().enumerate() {
        if let Some(parse) = outcome.parse() {
            stats
                .diagnostics
                .extend(parse.diagnostics.iter().map(|diagnostic| BlockDiagnostic {
                    block: index,
                    diagnostic: diagnostic.clone(),
                }));
        }
        match outcome {
            BlockOutcome::Rendered { html: markup, .. } => {
                stats.blocks_highlighted += 1;
                if rerender {
                    stats.blocks_rerendered += 1;
                }
                replacements[position] = Some(markup);
            }
            BlockOutcome::Skipped(reason) => {
                stats.blocks_skipped += 1;
                if let SkipReason::Unsupported(language) = reason {
                    unsupported.insert(language);
                }
            }
            BlockOutcome::Failed { .. } => stats.blocks_failed += 1,
        }
    }
    stats.unsupported_languages = unsupported.into_iter().collect();

    let html = if stats.blocks_highlighted > 0 {
        replace_blocks(html, &replacements)?
    } else {
        html.to_string()
    };

    Ok(PageResult {
        html,
        mode,
        theme,
        stats,
    })
}
