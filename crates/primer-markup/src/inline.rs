//! Inline span formatting.
//!
//! Recognizes two non-nesting markers: `` `code` `` and `**bold**`.
//! There is no escaping. An opening marker without a partner is kept as
//! literal text and scanning continues after it.

use crate::node::{RunStyle, StyledRun};

const CODE_MARKER: &str = "`";
const BOLD_MARKER: &str = "**";

/// Split a line into styled runs.
///
/// Concatenating the returned texts gives back `line` with every matched
/// marker pair removed once. Adjacent plain text is merged and empty runs
/// are dropped.
///
/// # Examples
///
/// ```
/// use primer_markup::{StyledRun, format_inline};
///
/// assert_eq!(
///     format_inline("Use `let` **carefully**"),
///     vec![
///         StyledRun::plain("Use "),
///         StyledRun::code("let"),
///         StyledRun::plain(" "),
///         StyledRun::bold("carefully"),
///     ]
/// );
/// ```
#[must_use]
pub fn format_inline(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut rest = line;

    while let Some((start, style, marker)) = next_marker(rest) {
        let content_start = start + marker.len();
        match rest[content_start..].find(marker) {
            Some(len) => {
                push_run(&mut runs, &rest[..start], RunStyle::Plain);
                push_run(
                    &mut runs,
                    &rest[content_start..content_start + len],
                    style,
                );
                rest = &rest[content_start + len + marker.len()..];
            }
            None => {
                // Unmatched marker stays literal
                push_run(&mut runs, &rest[..content_start], RunStyle::Plain);
                rest = &rest[content_start..];
            }
        }
    }

    push_run(&mut runs, rest, RunStyle::Plain);
    runs
}

/// Find the earliest marker in `s`.
fn next_marker(s: &str) -> Option<(usize, RunStyle, &'static str)> {
    let code = s.find(CODE_MARKER);
    let bold = s.find(BOLD_MARKER);

    match (code, bold) {
        (Some(c), Some(b)) if b < c => Some((b, RunStyle::Bold, BOLD_MARKER)),
        (Some(c), _) => Some((c, RunStyle::Code, CODE_MARKER)),
        (None, Some(b)) => Some((b, RunStyle::Bold, BOLD_MARKER)),
        (None, None) => None,
    }
}

fn push_run(runs: &mut Vec<StyledRun>, text: &str, style: RunStyle) {
    if text.is_empty() {
        return;
    }
    if style == RunStyle::Plain
        && let Some(last) = runs.last_mut()
        && last.style == RunStyle::Plain
    {
        last.text.push_str(text);
        return;
    }
    runs.push(StyledRun::new(text, style));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn joined(runs: &[StyledRun]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(format_inline("just text"), vec![StyledRun::plain("just text")]);
    }

    #[test]
    fn test_empty_line() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn test_mixed_spans() {
        assert_eq!(
            format_inline("Some **bold** and `code`."),
            vec![
                StyledRun::plain("Some "),
                StyledRun::bold("bold"),
                StyledRun::plain(" and "),
                StyledRun::code("code"),
                StyledRun::plain("."),
            ]
        );
    }

    #[test]
    fn test_span_at_line_edges() {
        assert_eq!(
            format_inline("`x` middle **y**"),
            vec![
                StyledRun::code("x"),
                StyledRun::plain(" middle "),
                StyledRun::bold("y"),
            ]
        );
    }

    #[test]
    fn test_bold_marker_inside_code_is_literal() {
        assert_eq!(
            format_inline("`a ** b`"),
            vec![StyledRun::code("a ** b")]
        );
    }

    #[test]
    fn test_backtick_inside_bold_is_literal() {
        assert_eq!(
            format_inline("**see `x**"),
            vec![StyledRun::bold("see `x")]
        );
    }

    #[test]
    fn test_unmatched_code_marker_keeps_trailing_text() {
        let runs = format_inline("a `b c");
        assert_eq!(runs, vec![StyledRun::plain("a `b c")]);
    }

    #[test]
    fn test_unmatched_bold_then_code_span() {
        assert_eq!(
            format_inline("a **b `c`"),
            vec![StyledRun::plain("a **b "), StyledRun::code("c")]
        );
    }

    #[test]
    fn test_empty_spans_are_dropped() {
        assert_eq!(format_inline("a``b"), vec![StyledRun::plain("ab")]);
        assert!(format_inline("****").is_empty());
    }

    #[test]
    fn test_markers_removed_exactly_once() {
        let line = "x **y** `z` w";
        assert_eq!(joined(&format_inline(line)), "x y z w");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            format_inline("héllo **wörld** ✓"),
            vec![
                StyledRun::plain("héllo "),
                StyledRun::bold("wörld"),
                StyledRun::plain(" ✓"),
            ]
        );
    }
}
