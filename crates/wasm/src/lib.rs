use hlmark_render::{CodeBlock, PageOptions, RenderConfig, Renderer, ThemeMode};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

fn parse_config(config: JsValue) -> Result<RenderConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(RenderConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn theme_mode(dark: Option<bool>) -> Option<ThemeMode> {
    dark.map(|dark| if dark { ThemeMode::Dark } else { ThemeMode::Light })
}

// Maps become plain objects so line-keyed highlight maps read naturally in JS.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Directive API
// ============================================================================

/// Strips highlight directives from `source`.
///
/// Returns `{ cleaned, highlights, diagnostics, removedLines }`, where
/// `highlights` maps 1-based cleaned line numbers to `{ level, color? }`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { parse_directives } from './hlmark_wasm';
///
/// const out = parse_directives("# @highlight: 1\nx = 1");
/// // out.cleaned === "x = 1"
/// // out.highlights["1"].level === 1
/// ```
#[wasm_bindgen]
pub fn parse_directives(source: &str) -> Result<JsValue, JsError> {
    to_js(&hlmark_core::parse_directives(source))
}

/// Palette slot (1..=4) used for a nesting level.
#[wasm_bindgen]
pub fn palette_index(level: usize) -> usize {
    hlmark_core::palette_index(level)
}

/// Check if `<html>` attributes mark the page as dark.
#[wasm_bindgen]
pub fn detect_dark_mode(class: Option<String>, data_theme: Option<String>) -> bool {
    hlmark_render::detect_dark_mode(class.as_deref(), data_theme.as_deref())
}

// ============================================================================
// Render API
// ============================================================================

/// Re-highlights every code block of an HTML page.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `config` - Optional `{ theme, darkTheme, languages, batchSize, copyButton }`
/// * `dark` - Forces the dark or light theme; detected from `<html>` when omitted
///
/// # Returns
///
/// Returns `{ html, mode, theme, stats }`.
#[wasm_bindgen]
pub fn render_page(html: &str, config: JsValue, dark: Option<bool>) -> Result<JsValue, JsError> {
    let renderer = Renderer::new(parse_config(config)?);
    let options = PageOptions {
        mode: theme_mode(dark),
    };
    let result = renderer
        .render_page(html, &options)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&result)
}

/// Renders a single block; returns `undefined` when the block is left as is.
#[wasm_bindgen]
pub fn render_block(
    source: &str,
    language: Option<String>,
    config: JsValue,
    dark: Option<bool>,
) -> Result<Option<String>, JsError> {
    let renderer = Renderer::new(parse_config(config)?);
    let block = CodeBlock::new(source, language.as_deref());
    let outcome = renderer.render_block(&block, theme_mode(dark).unwrap_or_default());
    Ok(outcome.html().map(str::to_string))
}
