//! Single-pass highlight directive parser.
//!
//! Walks the source once, keeping an explicit stack of open highlight spans
//! and a count of dropped lines. Standalone directive lines are removed,
//! trailing directives are stripped from their code, and every retained line
//! covered by an open span is recorded in the [`HighlightMap`] under its
//! renumbered (cleaned) line number.

use serde::Serialize;

use crate::directive::{Directive, DirectiveKind, recognize};
use crate::error::Diagnostic;
use crate::highlight::{HighlightMap, HighlightSpec};
use crate::ranges::parse_line_ranges;

/// Result of parsing one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    /// Source with directives removed; this is what gets highlighted.
    pub cleaned: String,
    /// Cleaned line number (1-based) to highlight.
    pub highlights: HighlightMap,
    /// Non-fatal findings, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of standalone directive lines dropped.
    pub removed_lines: usize,
}

impl ParseOutput {
    /// Lines of the cleaned text.
    pub fn cleaned_lines(&self) -> impl Iterator<Item = &str> {
        self.cleaned.split('\n')
    }

    /// Check if the parser found anything to report.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Open span on the nesting stack.
#[derive(Debug, Clone)]
struct OpenSpan {
    spec: HighlightSpec,
    opened_at: usize,
}

/// Mutable state for one parse call.
#[derive(Default)]
struct ParseState {
    stack: Vec<OpenSpan>,
    kept: Vec<String>,
    highlights: HighlightMap,
    diagnostics: Vec<Diagnostic>,
    offset: usize,
}

impl ParseState {
    fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Cleaned line number the next kept line will get.
    fn next_line_number(&self) -> usize {
        self.kept.len() + 1
    }

    fn keep(&mut self, line: &str) {
        self.kept.push(line.to_string());
    }

    fn drop_line(&mut self) {
        self.offset += 1;
    }

    /// Keep a content line, inheriting the innermost open span.
    fn keep_content(&mut self, line: &str) {
        if let Some(top) = self.stack.last() {
            let number = self.next_line_number();
            log::debug!("line {} highlighted at level {}", number, top.spec.level);
            self.highlights.insert(number, top.spec.clone());
        }
        self.keep(line);
    }

    fn open(&mut self, color: Option<&str>, source_line: usize) {
        let level = self.depth() + 1;
        let spec = match color {
            Some(color) => HighlightSpec::colored(level, color),
            None => HighlightSpec::level(level),
        };
        log::debug!("line {}: highlight level {} opened", source_line, level);
        self.stack.push(OpenSpan {
            spec,
            opened_at: source_line,
        });
    }

    fn close(&mut self, source_line: usize) -> Option<OpenSpan> {
        let closed = self.stack.pop();
        match &closed {
            Some(span) => log::debug!(
                "line {}: highlight level {} closed",
                source_line,
                span.spec.level
            ),
            None => self
                .diagnostics
                .push(Diagnostic::UnmatchedEnd { line: source_line }),
        }
        closed
    }

    fn finish(mut self) -> ParseOutput {
        for span in self.stack.drain(..) {
            self.diagnostics.push(Diagnostic::UnclosedHighlight {
                level: span.spec.level,
                line: span.opened_at,
            });
        }

        ParseOutput {
            cleaned: self.kept.join("\n"),
            highlights: self.highlights,
            diagnostics: self.diagnostics,
            removed_lines: self.offset,
        }
    }
}

/// Parse highlight directives out of a code block.
///
/// Never fails: malformed directives are kept as content or resolved to the
/// level implied by the nesting stack, and reported in
/// [`ParseOutput::diagnostics`].
///
/// A `@highlight: <ranges>` list is only honored on the first line. Its
/// numbers are stored as written, without subtracting the removed directive
/// line, so `@highlight: 1` marks the first line *after* it.
///
/// ```
/// use hlmark_core::{HighlightSpec, parse_directives};
///
/// let source = "a = 1\n# @highlight-start\nb = 2\n# @highlight-end\nc = 3";
/// let out = parse_directives(source);
/// assert_eq!(out.cleaned, "a = 1\nb = 2\nc = 3");
/// assert_eq!(out.highlights.get(2), Some(&HighlightSpec::level(1)));
/// assert!(out.diagnostics.is_empty());
/// ```
pub fn parse_directives(source: &str) -> ParseOutput {
    let mut state = ParseState::default();
    let line_count = source.split('\n').count();

    for (index, line) in source.split('\n').enumerate() {
        let source_line = index + 1;

        let Some(directive) = recognize(line) else {
            state.keep_content(line);
            continue;
        };

        match directive.kind {
            DirectiveKind::Ranges(ranges) if index == 0 && directive.is_standalone() => {
                apply_ranges(&mut state, ranges, source_line, line_count);
                state.drop_line();
            }
            DirectiveKind::Ranges(_) => state.keep_content(line),
            DirectiveKind::End | DirectiveKind::AutoEnd => {
                apply_end(&mut state, &directive, line, source_line);
            }
            DirectiveKind::Start { level } => {
                apply_start(&mut state, &directive, level, line, source_line);
            }
            DirectiveKind::AutoStart { color } => {
                state.open(color, source_line);
                keep_or_drop(&mut state, &directive, line);
            }
        }
    }

    state.finish()
}

fn apply_ranges(state: &mut ParseState, ranges: &str, source_line: usize, line_count: usize) {
    let (lines, invalid) = parse_line_ranges(ranges, line_count);
    log::debug!("explicit highlight ranges: {:?}", lines);
    for number in lines {
        state.highlights.insert(number, HighlightSpec::level(1));
    }
    for item in invalid {
        state.diagnostics.push(Diagnostic::InvalidRange {
            line: source_line,
            item,
        });
    }
}

fn apply_start(
    state: &mut ParseState,
    directive: &Directive<'_>,
    declared: Option<i64>,
    line: &str,
    source_line: usize,
) {
    let expected = state.depth() + 1;

    if let Some(got) = declared {
        if got < 1 {
            state.diagnostics.push(Diagnostic::InvalidLevel {
                line: source_line,
                got,
            });
            state.keep_content(line);
            return;
        }
        if got != expected as i64 {
            state.diagnostics.push(Diagnostic::LevelSkew {
                line: source_line,
                expected,
                got,
            });
        }
    }

    state.open(None, source_line);
    keep_or_drop(state, directive, line);
}

fn apply_end(state: &mut ParseState, directive: &Directive<'_>, line: &str, source_line: usize) {
    if directive.is_standalone() {
        state.close(source_line);
        state.drop_line();
        return;
    }

    // The closing line itself belongs to the span being closed.
    if let Some(span) = state.close(source_line) {
        let number = state.next_line_number();
        state.highlights.insert(number, span.spec);
    }
    state.keep(directive.strip(line));
}

fn keep_or_drop(state: &mut ParseState, directive: &Directive<'_>, line: &str) {
    if directive.is_standalone() {
        state.drop_line();
    } else {
        state.keep(directive.strip(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(out: &ParseOutput) -> Vec<(usize, usize)> {
        out.highlights
            .iter()
            .map(|(line, spec)| (line, spec.level))
            .collect()
    }

    #[test]
    fn no_directives_round_trips() {
        let source = "fn main() {\n    println!(\"hi\");\n}\n";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, source);
        assert!(out.highlights.is_empty());
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.removed_lines, 0);
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = parse_directives("");
        assert_eq!(out.cleaned, "");
        assert!(out.highlights.is_empty());
    }

    #[test]
    fn explicit_ranges_use_literal_numbers() {
        let source = "# @highlight: 1,3-4\nl1\nl2\nl3\nl4";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "l1\nl2\nl3\nl4");
        assert_eq!(out.highlights.lines(), vec![1, 3, 4]);
        assert!(out.highlights.iter().all(|(_, spec)| spec.level == 1));
        assert_eq!(out.removed_lines, 1);
    }

    #[test]
    fn ranges_only_count_on_first_line() {
        let source = "x\n# @highlight: 1";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, source);
        assert!(out.highlights.is_empty());
    }

    #[test]
    fn trailing_ranges_are_content() {
        let source = "x = 1 # @highlight: 1";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, source);
        assert!(out.highlights.is_empty());
    }

    #[test]
    fn invalid_range_items_are_reported() {
        let out = parse_directives("// @highlight: 2,4-1\na\nb");
        assert_eq!(out.highlights.lines(), vec![2]);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::InvalidRange {
                line: 1,
                item: "4-1".to_string()
            }]
        );
    }

    #[test]
    fn standalone_block_is_highlighted_and_dropped() {
        let source = "a\n# @highlight-start\nb\nc\n# @highlight-end\nd";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a\nb\nc\nd");
        assert_eq!(levels(&out), vec![(2, 1), (3, 1)]);
        assert_eq!(out.removed_lines, 2);
    }

    #[test]
    fn nested_levels_use_innermost_span() {
        let source = "# @highlight-start[1]\n# @highlight-start[2]\nx\ny\n# @highlight-end\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "x\ny");
        assert_eq!(levels(&out), vec![(1, 2), (2, 2)]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn outer_level_resumes_after_inner_end() {
        let source = "# @highlight-start\na\n# @highlight-start\nb\n# @highlight-end\nc\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a\nb\nc");
        assert_eq!(levels(&out), vec![(1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn first_start_with_wrong_level_is_skewed_but_pushed() {
        let out = parse_directives("# @highlight-start[3]\nx\n# @highlight-end");
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::LevelSkew {
                line: 1,
                expected: 1,
                got: 3
            }]
        );
        assert_eq!(levels(&out), vec![(1, 1)]);
    }

    #[test]
    fn skipped_nested_level_uses_depth() {
        let source = "# @highlight-start[1]\na\n# @highlight-start[3]\nb\n# @highlight-end\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(levels(&out), vec![(1, 1), (2, 2)]);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::LevelSkew {
                line: 3,
                expected: 2,
                got: 3
            }]
        );
    }

    #[test]
    fn level_one_required_again_after_stack_empties() {
        let source = "# @highlight-start[1]\na\n# @highlight-end\n# @highlight-start[2]\nb\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(out.diagnostics.len(), 1);
        assert!(matches!(
            out.diagnostics[0],
            Diagnostic::LevelSkew {
                line: 4,
                expected: 1,
                got: 2
            }
        ));
        assert_eq!(levels(&out), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn zero_level_is_inert_content() {
        let source = "# @highlight-start[0]\nx";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, source);
        assert!(out.highlights.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::InvalidLevel { line: 1, got: 0 }]
        );
    }

    #[test]
    fn inert_start_inside_span_inherits_highlight() {
        let source = "# @highlight-start\n# @highlight-start[-1]\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "# @highlight-start[-1]");
        assert_eq!(levels(&out), vec![(1, 1)]);
        assert!(out.diagnostics.iter().all(|d| d.line() == 2));
    }

    #[test]
    fn auto_start_with_color_marks_line() {
        let source = "# @highlight-auto-start,bgcolor=#ff0000\nx = 1\n# @highlight-auto-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "x = 1");
        assert_eq!(
            out.highlights.get(1),
            Some(&HighlightSpec::colored(1, "#ff0000"))
        );
    }

    #[test]
    fn auto_start_without_color_uses_palette() {
        let out = parse_directives("# @highlight-auto-start\nx = 1\n# @highlight-auto-end");
        assert_eq!(out.highlights.get(1), Some(&HighlightSpec::level(1)));
        assert_eq!(out.highlights.get(1).and_then(|s| s.color.as_deref()), None);
    }

    #[test]
    fn auto_levels_keep_growing_past_palette() {
        let mut source = String::new();
        for _ in 0..5 {
            source.push_str("# @highlight-auto-start\n");
        }
        source.push_str("deep\n");
        for _ in 0..5 {
            source.push_str("# @highlight-auto-end\n");
        }
        let out = parse_directives(source.trim_end());
        assert_eq!(levels(&out), vec![(1, 5)]);
        assert_eq!(out.highlights.get(1).map(|s| s.decoration()), Some(crate::Decoration::Palette(1)));
    }

    #[test]
    fn nested_color_applies_only_inside_inner_span() {
        let source = "# @highlight-auto-start\na\n# @highlight-auto-start,bgcolor=gold\nb\n# @highlight-auto-end\nc\n# @highlight-auto-end";
        let out = parse_directives(source);
        assert_eq!(out.highlights.get(1), Some(&HighlightSpec::level(1)));
        assert_eq!(out.highlights.get(2), Some(&HighlightSpec::colored(2, "gold")));
        assert_eq!(out.highlights.get(3), Some(&HighlightSpec::level(1)));
    }

    #[test]
    fn trailing_end_decorates_closing_line() {
        let source = "# @highlight-start\na\nb  # @highlight-end\nc";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a\nb\nc");
        assert_eq!(levels(&out), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn trailing_auto_end_keeps_color_on_closing_line() {
        let source = "a // @highlight-auto-start,bgcolor=pink\nb // @highlight-auto-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a\nb");
        assert_eq!(out.highlights.get(1), None);
        assert_eq!(out.highlights.get(2), Some(&HighlightSpec::colored(1, "pink")));
    }

    #[test]
    fn trailing_start_keeps_code_undecorated() {
        let source = "a = 1  # @highlight-start[1]\nb = 2\n# @highlight-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a = 1\nb = 2");
        assert_eq!(levels(&out), vec![(2, 1)]);
        assert_eq!(out.removed_lines, 1);
    }

    #[test]
    fn standalone_end_line_is_never_decorated() {
        let source = "# @highlight-start\na\n# @highlight-end\nb";
        let out = parse_directives(source);
        assert_eq!(levels(&out), vec![(1, 1)]);
    }

    #[test]
    fn unmatched_end_is_reported_and_consumed() {
        let source = "a\n# @highlight-end\nb # @highlight-auto-end";
        let out = parse_directives(source);
        assert_eq!(out.cleaned, "a\nb");
        assert!(out.highlights.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![
                Diagnostic::UnmatchedEnd { line: 2 },
                Diagnostic::UnmatchedEnd { line: 3 }
            ]
        );
    }

    #[test]
    fn unclosed_spans_are_reported_outermost_first() {
        let source = "# @highlight-start\na\n# @highlight-auto-start\nb";
        let out = parse_directives(source);
        assert_eq!(levels(&out), vec![(1, 1), (2, 2)]);
        assert_eq!(
            out.diagnostics,
            vec![
                Diagnostic::UnclosedHighlight { level: 1, line: 1 },
                Diagnostic::UnclosedHighlight { level: 2, line: 3 }
            ]
        );
    }

    #[test]
    fn removed_lines_match_line_count_difference() {
        let source = "# @highlight: 2\na\n# @highlight-start\nb # @highlight-end\n// @highlight-auto-start\nc\n// @highlight-auto-end\n";
        let out = parse_directives(source);
        let source_lines = source.split('\n').count();
        let cleaned_lines = out.cleaned_lines().count();
        assert_eq!(cleaned_lines, source_lines - out.removed_lines);
        assert_eq!(out.removed_lines, 4);
    }

    #[test]
    fn huge_range_is_bounded_by_the_source() {
        let out = parse_directives("# @highlight: 1-3000000\nx");
        assert_eq!(out.cleaned, "x");
        assert_eq!(out.highlights.lines(), vec![1, 2]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn range_past_the_source_is_reported() {
        let out = parse_directives("# @highlight: 1,9-12\nx");
        assert_eq!(out.highlights.lines(), vec![1]);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::InvalidRange {
                line: 1,
                item: "9-12".to_string()
            }]
        );
    }

    #[test]
    fn later_span_overrides_literal_range() {
        let source = "# @highlight: 1\n# @highlight-auto-start,bgcolor=red\na\n# @highlight-auto-end";
        let out = parse_directives(source);
        assert_eq!(out.highlights.get(1), Some(&HighlightSpec::colored(1, "red")));
    }

    #[test]
    fn output_serializes_for_bindings() {
        let out = parse_directives("# @highlight-start\nx\n# @highlight-end");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["cleaned"], "x");
        assert_eq!(json["highlights"]["1"]["level"], 1);
        assert_eq!(json["removedLines"], 2);
    }
}
