use serde::Serialize;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Malformed directive that was recovered from
    Error,
    /// Suspicious input that doesn't change the output
    Warning,
}

/// Non-fatal findings produced while parsing highlight directives.
///
/// Line numbers refer to the original source text (1-indexed), not to the
/// cleaned output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// `@highlight-start[n]` declared a level other than the current depth + 1
    LevelSkew {
        /// Source line of the directive
        line: usize,
        /// Level implied by the nesting stack
        expected: usize,
        /// Level written by the author
        got: i64,
    },
    /// `@highlight-start[n]` with `n < 1`; the directive was ignored
    InvalidLevel {
        /// Source line of the directive
        line: usize,
        /// Level written by the author
        got: i64,
    },
    /// A span was still open when the input ended
    UnclosedHighlight {
        /// Level of the open span
        level: usize,
        /// Source line that opened the span
        line: usize,
    },
    /// An end directive was found with no open span
    UnmatchedEnd {
        /// Source line of the directive
        line: usize,
    },
    /// An item of a `@highlight:` range list could not be parsed
    InvalidRange {
        /// Source line of the range list
        line: usize,
        /// Offending item as written
        item: String,
    },
}

impl Diagnostic {
    /// Get the source line this diagnostic points at
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::LevelSkew { line, .. }
            | Diagnostic::InvalidLevel { line, .. }
            | Diagnostic::UnclosedHighlight { line, .. }
            | Diagnostic::UnmatchedEnd { line }
            | Diagnostic::InvalidRange { line, .. } => *line,
        }
    }

    /// Get the severity of this diagnostic
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::LevelSkew { .. } | Diagnostic::InvalidLevel { .. } => Severity::Error,
            Diagnostic::UnclosedHighlight { .. }
            | Diagnostic::UnmatchedEnd { .. }
            | Diagnostic::InvalidRange { .. } => Severity::Warning,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::LevelSkew {
                line,
                expected,
                got,
            } => {
                if *expected == 1 {
                    write!(
                        f,
                        "line {}: first @highlight-start must be level 1, got {}",
                        line, got
                    )
                } else {
                    write!(
                        f,
                        "line {}: @highlight-start[{}] skips nesting levels, expected level {}",
                        line, got, expected
                    )
                }
            }
            Diagnostic::InvalidLevel { line, got } => {
                write!(
                    f,
                    "line {}: @highlight-start level must be >= 1, got {}",
                    line, got
                )
            }
            Diagnostic::UnclosedHighlight { level, line } => {
                write!(
                    f,
                    "line {}: highlight level {} is never closed",
                    line, level
                )
            }
            Diagnostic::UnmatchedEnd { line } => {
                write!(f, "line {}: highlight end without an open highlight", line)
            }
            Diagnostic::InvalidRange { line, item } => {
                write!(f, "line {}: invalid line range '{}'", line, item)
            }
        }
    }
}
