use hlmark_wasm::{detect_dark_mode, palette_index, parse_directives, render_block, render_page};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ParseResult {
    cleaned: String,
    highlights: BTreeMap<String, Spec>,
    diagnostics: Vec<Diagnostic>,
    removed_lines: usize,
}

#[derive(Deserialize, Debug)]
struct Spec {
    level: usize,
    color: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Diagnostic {
    kind: String,
    line: usize,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PageResult {
    html: String,
    mode: String,
    theme: String,
    stats: Stats,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Stats {
    blocks_found: usize,
    blocks_highlighted: usize,
    unsupported_languages: Vec<String>,
}

#[wasm_bindgen_test]
fn parse_strips_directives() {
    let source = "# @highlight-start\nx = 1\n# @highlight-auto-start,bgcolor=#ffeeaa\ny = 2\n# @highlight-auto-end\n# @highlight-end";
    let result = parse_directives(source).expect("parse should succeed");
    let result: ParseResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.cleaned, "x = 1\ny = 2");
    assert_eq!(result.removed_lines, 4);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.highlights["1"].level, 1);
    assert_eq!(result.highlights["2"].level, 2);
    assert_eq!(result.highlights["2"].color.as_deref(), Some("#ffeeaa"));
}

#[wasm_bindgen_test]
fn parse_reports_diagnostics() {
    let result = parse_directives("x\n# @highlight-end").expect("parse should succeed");
    let result: ParseResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, "unmatchedEnd");
    assert_eq!(result.diagnostics[0].line, 2);
}

#[wasm_bindgen_test]
fn palette_and_dark_mode_helpers() {
    assert_eq!(palette_index(5), 1);
    assert_eq!(palette_index(0), 1);
    assert!(detect_dark_mode(Some("theme--documenter-dark".into()), None));
    assert!(!detect_dark_mode(None, Some("light".into())));
}

#[wasm_bindgen_test]
fn render_page_with_default_config() {
    let page = "<html class=\"theme--dark\"><pre><code class=\"language-julia\"># @highlight: 1\nx</code></pre></html>";
    let result = render_page(page, JsValue::UNDEFINED, None).expect("render should succeed");
    let result: PageResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.mode, "dark");
    assert_eq!(result.theme, "github-dark");
    assert_eq!(result.stats.blocks_found, 1);
    assert_eq!(result.stats.blocks_highlighted, 1);
    assert!(result.html.contains("highlight-level-1"));
    assert!(result.html.contains("copy-button"));
}

#[wasm_bindgen_test]
fn render_page_with_config_object() {
    let config = js_sys::JSON::parse(r#"{"languages":["python"],"copyButton":false}"#)
        .expect("valid json");
    let page = "<pre><code class=\"language-julia\">x</code></pre><pre><code class=\"language-python\">y</code></pre>";
    let result = render_page(page, config, Some(false)).expect("render should succeed");
    let result: PageResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.theme, "github-light");
    assert_eq!(result.stats.blocks_highlighted, 1);
    assert_eq!(result.stats.unsupported_languages, vec!["julia"]);
    assert!(!result.html.contains("copy-button"));
}

#[wasm_bindgen_test]
fn render_block_skips_passthrough() {
    let html = render_block("x", Some("python".into()), JsValue::NULL, None).expect("render");
    assert!(html.is_some_and(|html| html.contains("<span class=\"line\">x</span>")));

    let skipped = render_block("x", Some("nohighlight".into()), JsValue::NULL, None).expect("render");
    assert!(skipped.is_none());
}
