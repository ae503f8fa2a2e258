//! Fence line detection.
//!
//! Fences are triple backticks. An opening fence carries an optional info
//! string; a closing fence is a bare triple-backtick line.

const FENCE: &str = "```";

/// Parsed opening fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FenceOpen<'a> {
    /// Generic code fence with its language tag, if any.
    Code { language: Option<&'a str> },
    /// Diagram fence with its kind tag, if any.
    Diagram { kind: Option<&'a str> },
}

/// Detect an opening fence.
///
/// `diagram_keyword` is the reserved word that turns a fence into a diagram
/// fence (```` ```diagram tree ````). The keyword must stand alone; a tag such
/// as `diagrammer` is an ordinary language tag.
pub(crate) fn parse_fence_open<'a>(line: &'a str, diagram_keyword: &str) -> Option<FenceOpen<'a>> {
    let info = line.trim().strip_prefix(FENCE)?;
    if info.starts_with('`') {
        return None;
    }
    let info = info.trim();

    if let Some(after) = info.strip_prefix(diagram_keyword)
        && (after.is_empty() || after.starts_with(char::is_whitespace))
    {
        let kind = after.split_whitespace().next();
        return Some(FenceOpen::Diagram { kind });
    }

    Some(FenceOpen::Code {
        language: info.split_whitespace().next(),
    })
}

/// Check whether a line closes the current fence.
pub(crate) fn is_fence_close(line: &str) -> bool {
    line.trim() == FENCE
}
