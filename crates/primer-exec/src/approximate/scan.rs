//! Textual scanning of snippet source.
//!
//! Locates print calls and literal assignments without parsing the
//! language. Strings are only understood well enough to find the closing
//! parenthesis of a call.

use regex::Regex;

use super::expr::{Value, parse_literal};

/// One recognized print call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrintCall<'a> {
    /// Byte offset of the callee name in the source.
    pub offset: usize,
    /// Callee as written (`print`, `System.out.println`, ...).
    pub callee: &'a str,
    /// Raw text between the call's parentheses.
    pub args: &'a str,
}

/// Scanning failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScanError {
    #[error("unterminated call to {callee} at byte {offset}")]
    UnterminatedCall { callee: String, offset: usize },
}

/// Build a regex matching any of `callees` followed by `(`.
///
/// The callee must not be preceded by an identifier character or a dot, so
/// `print` does not match inside `sprint(` or `out.print(`.
pub(crate) fn callee_pattern(callees: &[&str]) -> Regex {
    let mut names: Vec<&str> = callees.to_vec();
    // Longest first so `println` wins over `print`
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    let alternatives: Vec<String> = names.iter().map(|name| regex::escape(name)).collect();
    let pattern = format!(r"(?:^|[^\w.])({})\s*\(", alternatives.join("|"));
    Regex::new(&pattern).unwrap()
}

/// Find all print calls at or after byte `start`.
///
/// Calls on lines that start with a `#` or `//` comment are skipped.
pub(crate) fn find_print_calls<'a>(
    source: &'a str,
    start: usize,
    pattern: &Regex,
) -> Result<Vec<PrintCall<'a>>, ScanError> {
    let mut calls = Vec::new();
    let mut pos = start;

    while let Some(caps) = pattern.captures_at(source, pos) {
        let (Some(callee), Some(whole)) = (caps.get(1), caps.get(0)) else {
            break;
        };
        // `whole` ends just after the opening parenthesis
        let args_start = whole.end();
        if in_line_comment(source, callee.start()) {
            pos = args_start;
            continue;
        }
        let Some(args_len) = closing_paren(&source[args_start..]) else {
            return Err(ScanError::UnterminatedCall {
                callee: callee.as_str().to_owned(),
                offset: callee.start(),
            });
        };

        calls.push(PrintCall {
            offset: callee.start(),
            callee: callee.as_str(),
            args: &source[args_start..args_start + args_len],
        });
        pos = args_start + args_len + 1;
    }

    Ok(calls)
}

/// Whether the line holding byte `offset` is commented out before it.
fn in_line_comment(source: &str, offset: usize) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = source[line_start..offset].trim_start();
    prefix.starts_with('#') || prefix.starts_with("//")
}

/// Byte length up to the parenthesis closing an already-open call.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Find the most recent literal assignment to `name` in `source`.
///
/// Accepts `name = literal` with anything before the name (a type,
/// `let`, `var`, `const`, ...). Compound operators such as `+=` do not
/// match, and neither do assignments from expressions.
pub(crate) fn last_literal_assignment(source: &str, name: &str) -> Option<Value> {
    let pattern = format!(
        r#"\b{}\s*=\s*("(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|-?\d+)\s*(?:[;\n,)]|$)"#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    let literal = re.captures_iter(source).last()?.get(1)?;
    parse_literal(literal.as_str())
}
