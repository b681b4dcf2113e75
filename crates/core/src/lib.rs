#![deny(missing_docs)]
//! hlmark core: highlight directive parsing, highlight maps, and palette resolution.

/// Comment-embedded directive recognition.
pub mod directive;
/// Diagnostic types.
pub mod error;
/// Highlight specs, maps, and palette resolution.
pub mod highlight;
/// Language tag policy.
pub mod language;
/// The single-pass directive parser.
pub mod parser;
/// Line range list parsing.
pub mod ranges;

pub use directive::{Directive, DirectiveKind, Placement, recognize};
pub use error::{Diagnostic, Severity};
pub use highlight::{Decoration, HighlightMap, HighlightSpec, PALETTE_SIZE, palette_index};
pub use language::{PLAIN_TEXT, is_passthrough, language_from_class, normalize_language};
pub use parser::{ParseOutput, parse_directives};
pub use ranges::parse_line_ranges;
