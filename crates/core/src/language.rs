//! Language tag handling for code blocks.

use std::borrow::Cow;

const LANGUAGE_CLASS_PREFIX: &str = "language-";
const REPL_SUFFIX: &str = "-repl";

/// Language used when a block declares none.
pub const PLAIN_TEXT: &str = "text";

/// Extracts the language from a `class` attribute (`language-julia` → `julia`).
pub fn language_from_class(class_attr: &str) -> Option<&str> {
    class_attr
        .split_whitespace()
        .find_map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX))
        .filter(|lang| !lang.is_empty())
}

/// Maps REPL variants onto their base language (`julia-repl` → `julia`).
pub fn normalize_language(tag: &str) -> Cow<'_, str> {
    let tag = tag.trim();
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(strip_repl(&tag.to_ascii_lowercase()).to_string())
    } else {
        Cow::Borrowed(strip_repl(tag))
    }
}

fn strip_repl(tag: &str) -> &str {
    match tag.strip_suffix(REPL_SUFFIX) {
        Some(base) if !base.is_empty() => base,
        _ => tag,
    }
}

/// Check if blocks in this language bypass directive parsing and
/// highlighting altogether.
pub fn is_passthrough(tag: &str) -> bool {
    tag == PLAIN_TEXT || tag == "nohighlight" || tag.starts_with("nohighlight-")
}
