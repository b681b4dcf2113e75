//! Line range lists such as `1,3-4`.

/// Parses a comma-separated list of line numbers and inclusive ranges.
///
/// Returns the line numbers in list order together with the items that could
/// not be parsed. Empty items are skipped silently; zero, reversed, and
/// non-numeric items are returned as invalid. Numbers are bounded by
/// `max_line`: ranges running past it are cut short, and items starting past
/// it are invalid.
///
/// ```
/// use hlmark_core::parse_line_ranges;
///
/// let (lines, invalid) = parse_line_ranges("1, 3-4", 5);
/// assert_eq!(lines, vec![1, 3, 4]);
/// assert!(invalid.is_empty());
///
/// let (lines, invalid) = parse_line_ranges("2-99, 7", 3);
/// assert_eq!(lines, vec![2, 3]);
/// assert_eq!(invalid, vec!["7"]);
/// ```
pub fn parse_line_ranges(text: &str, max_line: usize) -> (Vec<usize>, Vec<String>) {
    let mut lines = Vec::new();
    let mut invalid = Vec::new();

    for entry in text.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        if let Some((start, end)) = entry.split_once('-') {
            match (start.trim().parse::<usize>(), end.trim().parse::<usize>()) {
                (Ok(start), Ok(end)) if start > 0 && start <= end && start <= max_line => {
                    lines.extend(start..=end.min(max_line))
                }
                _ => invalid.push(entry.to_string()),
            }
            continue;
        }

        match entry.parse::<usize>() {
            Ok(line) if line > 0 && line <= max_line => lines.push(line),
            _ => invalid.push(entry.to_string()),
        }
    }

    (lines, invalid)
}
