//! Recognition of comment-embedded highlight directives.
//!
//! A directive is a line comment (`#` or `//`) whose text is one of:
//!
//! ```text
//! @highlight: 1,3-4
//! @highlight-start
//! @highlight-start[2]
//! @highlight-auto-start
//! @highlight-auto-start,bgcolor=#ffeeaa
//! @highlight-end
//! @highlight-auto-end
//! ```
//!
//! The comment may fill the whole line (standalone) or follow code on the
//! same line (trailing). Anything after the directive other than whitespace
//! makes the line ordinary content.

const DIRECTIVE_PREFIX: &str = "@highlight";

/// What a directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind<'a> {
    /// `@highlight: <ranges>`, raw range list text.
    Ranges(&'a str),
    /// `@highlight-start` with an optional declared level.
    Start {
        /// Level written inside `[...]`, if any.
        level: Option<i64>,
    },
    /// `@highlight-auto-start` with an optional `bgcolor`.
    AutoStart {
        /// Explicit background color, if any.
        color: Option<&'a str>,
    },
    /// `@highlight-end`
    End,
    /// `@highlight-auto-end`
    AutoEnd,
}

/// Where the directive sits on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The directive is the entire line.
    Standalone,
    /// The directive follows code on the same line.
    Trailing,
}

/// A directive recognized on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Directive kind and arguments.
    pub kind: DirectiveKind<'a>,
    /// Standalone or trailing.
    pub placement: Placement,
    /// Byte offset of the comment marker within the line.
    pub marker_start: usize,
}

impl Directive<'_> {
    /// Check if the directive fills the whole line.
    pub fn is_standalone(&self) -> bool {
        matches!(self.placement, Placement::Standalone)
    }

    /// Check if the directive closes a span.
    pub fn is_end(&self) -> bool {
        matches!(self.kind, DirectiveKind::End | DirectiveKind::AutoEnd)
    }

    /// Code left on `line` once the directive and the whitespace before its
    /// comment marker are removed.
    pub fn strip<'l>(&self, line: &'l str) -> &'l str {
        line[..self.marker_start].trim_end()
    }
}

/// Recognize a highlight directive on a single line.
///
/// The marker is one or more `#`, or two or more `/`, optionally followed by
/// whitespace. Returns `None` for lines that carry no well-formed directive.
///
/// ```
/// use hlmark_core::directive::{DirectiveKind, Placement, recognize};
///
/// let d = recognize("x = 1  # @highlight-end").unwrap();
/// assert_eq!(d.kind, DirectiveKind::End);
/// assert_eq!(d.placement, Placement::Trailing);
/// assert_eq!(d.strip("x = 1  # @highlight-end"), "x = 1");
///
/// assert!(recognize("// @highlight-start[2]").unwrap().is_standalone());
/// assert!(recognize("// @highlight-end please").is_none());
/// ```
pub fn recognize(line: &str) -> Option<Directive<'_>> {
    let body_start = line.rfind(DIRECTIVE_PREFIX)?;
    let before = line[..body_start].trim_end();

    let marker_start = if before.ends_with("//") {
        before.trim_end_matches('/').len()
    } else if before.ends_with('#') {
        before.trim_end_matches('#').len()
    } else {
        return None;
    };

    let kind = parse_body(line[body_start..].trim_end())?;
    let placement = if line[..marker_start].trim().is_empty() {
        Placement::Standalone
    } else {
        Placement::Trailing
    };

    Some(Directive {
        kind,
        placement,
        marker_start,
    })
}

fn parse_body(body: &str) -> Option<DirectiveKind<'_>> {
    let rest = body.strip_prefix(DIRECTIVE_PREFIX)?;

    if let Some(ranges) = rest.strip_prefix(':') {
        let ranges = ranges.trim();
        return (!ranges.is_empty()).then_some(DirectiveKind::Ranges(ranges));
    }

    match rest {
        "-end" => return Some(DirectiveKind::End),
        "-auto-end" => return Some(DirectiveKind::AutoEnd),
        _ => {}
    }

    if let Some(args) = rest.strip_prefix("-auto-start") {
        if args.is_empty() {
            return Some(DirectiveKind::AutoStart { color: None });
        }
        let color = args
            .strip_prefix(',')?
            .trim_start()
            .strip_prefix("bgcolor=")?;
        if color.is_empty() || !color.chars().all(is_color_char) {
            return None;
        }
        return Some(DirectiveKind::AutoStart { color: Some(color) });
    }

    if let Some(args) = rest.strip_prefix("-start") {
        if args.is_empty() {
            return Some(DirectiveKind::Start { level: None });
        }
        let level = args
            .strip_prefix('[')?
            .strip_suffix(']')?
            .trim()
            .parse::<i64>()
            .ok()?;
        return Some(DirectiveKind::Start { level: Some(level) });
    }

    None
}

fn is_color_char(ch: char) -> bool {
    ch == '#' || ch == '_' || ch.is_ascii_alphanumeric()
}
