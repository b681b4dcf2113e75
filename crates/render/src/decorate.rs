//! Paints highlighted lines in highlighter output and marks the rendered
//! `<pre>` so the page can be re-rendered later.

use crate::error::RenderError;
use hlmark_core::HighlightMap;
use html_escape::encode_double_quoted_attribute;
use lol_html::html_content::ContentType;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str};
use std::borrow::Cow;
use std::cell::Cell;

/// Class added to every `<pre>` this crate renders.
pub const BLOCK_CLASS: &str = "hlmark";

const COPY_BUTTON: &str = "<button class=\"copy-button\" type=\"button\">Copy</button>";

type Handler<'h> = (Cow<'static, Selector>, ElementContentHandlers<'h>);

/// What to record on the outer `<pre>` of a rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWrapper<'a> {
    /// Block source before directive removal.
    pub original_code: &'a str,
    /// Language tag the block was declared with.
    pub original_lang: Option<&'a str>,
    /// Append the copy button.
    pub copy_button: bool,
}

/// Adds highlight classes and styles to the `span.line` elements of
/// `markup`. The n-th line span is line n of the cleaned source.
pub fn apply_highlights(markup: &str, highlights: &HighlightMap) -> Result<String, RenderError> {
    if highlights.is_empty() {
        return Ok(markup.to_string());
    }
    let counter = Cell::new(0);
    rewrite(markup, vec![line_handler(highlights, &counter)])
}

/// [`apply_highlights`] plus the wrapper attributes on the first `<pre>`.
pub fn decorate_block(
    markup: &str,
    highlights: &HighlightMap,
    wrapper: &BlockWrapper<'_>,
) -> Result<String, RenderError> {
    let counter = Cell::new(0);
    let wrapped = Cell::new(false);
    let mut handlers = vec![wrapper_handler(wrapper, &wrapped)];
    if !highlights.is_empty() {
        handlers.push(line_handler(highlights, &counter));
    }
    rewrite(markup, handlers)
}

fn rewrite(markup: &str, element_content_handlers: Vec<Handler<'_>>) -> Result<String, RenderError> {
    Ok(rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::new()
        },
    )?)
}

fn line_handler<'h>(highlights: &'h HighlightMap, counter: &'h Cell<usize>) -> Handler<'h> {
    element!("span.line", move |el| {
        let line = counter.get() + 1;
        counter.set(line);

        let Some(spec) = highlights.get(line) else {
            return Ok(());
        };
        let decoration = spec.decoration();

        if let Some(class) = decoration.class_name() {
            let merged = match el.get_attribute("class") {
                Some(existing) if !existing.trim().is_empty() => {
                    format!("{} {}", existing.trim(), class)
                }
                _ => class,
            };
            el.set_attribute("class", &merged)?;
        }
        if let Some(style) = decoration.inline_style() {
            el.set_attribute("style", &style)?;
        }
        Ok(())
    })
}

// Attribute values are escaped here; lol_html itself only escapes quotes.
fn wrapper_handler<'h>(wrapper: &'h BlockWrapper<'h>, done: &'h Cell<bool>) -> Handler<'h> {
    element!("pre", move |el| {
        if done.replace(true) {
            return Ok(());
        }

        let mut classes = vec![BLOCK_CLASS.to_string()];
        if let Some(existing) = el.get_attribute("class")
            && !existing.trim().is_empty()
        {
            classes.push(existing.trim().to_string());
        }
        el.set_attribute("class", &classes.join(" "))?;
        el.set_attribute(
            "data-original-code",
            &encode_double_quoted_attribute(wrapper.original_code),
        )?;
        if let Some(lang) = wrapper.original_lang {
            el.set_attribute("data-original-lang", &encode_double_quoted_attribute(lang))?;
        }
        if wrapper.copy_button {
            el.append(COPY_BUTTON, ContentType::Html);
        }
        Ok(())
    })
}
