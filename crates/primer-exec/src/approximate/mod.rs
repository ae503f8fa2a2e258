//! Local approximation of program output.
//!
//! Used only when the remote sandbox is unavailable. This is a textual
//! pattern matcher, not an interpreter: it finds print calls, evaluates
//! their arguments with a tiny expression grammar (see [`expr`]) and
//! resolves identifiers from literal assignments found earlier in the
//! source. Loops, branches, function calls and arithmetic beyond `+` are
//! invisible to it.

mod expr;
mod scan;

use crate::consts::NO_OUTPUT_MESSAGE;
use crate::language::Language;
use crate::result::{ExecutionResult, ResultOrigin};

use expr::{Expr, Value, parse_args, tokenize};
use scan::{PrintCall, callee_pattern, find_print_calls, last_literal_assignment};

/// How a print callee turns its arguments into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Arguments joined with a space.
    Join,
    /// First argument is a `printf` template (`%d`, `%s`, ...).
    Printf,
    /// First argument is a `{}` template.
    Braces,
}

#[derive(Debug)]
struct Callee {
    name: &'static str,
    newline: bool,
    format: Format,
}

/// Print statements and entry point of one language.
#[derive(Debug)]
struct Profile {
    callees: &'static [Callee],
    /// Only text after this marker is scanned, when present.
    entry_marker: Option<&'static str>,
}

const fn callee(name: &'static str, newline: bool, format: Format) -> Callee {
    Callee {
        name,
        newline,
        format,
    }
}

const PYTHON: Profile = Profile {
    callees: &[callee("print", true, Format::Join)],
    entry_marker: Some("__main__"),
};

const JAVA: Profile = Profile {
    callees: &[
        callee("System.out.println", true, Format::Join),
        callee("System.out.print", false, Format::Join),
        callee("System.out.printf", false, Format::Printf),
    ],
    entry_marker: Some("static void main"),
};

const JAVASCRIPT: Profile = Profile {
    callees: &[callee("console.log", true, Format::Join)],
    entry_marker: None,
};

const C_FAMILY: Profile = Profile {
    callees: &[
        callee("printf", false, Format::Printf),
        callee("puts", true, Format::Join),
    ],
    entry_marker: Some("int main"),
};

const RUST: Profile = Profile {
    callees: &[
        callee("println!", true, Format::Braces),
        callee("print!", false, Format::Braces),
    ],
    entry_marker: Some("fn main"),
};

/// Union of the common print statements, for languages without a profile.
const GENERIC: Profile = Profile {
    callees: &[
        callee("print", true, Format::Join),
        callee("println", true, Format::Join),
        callee("console.log", true, Format::Join),
        callee("System.out.println", true, Format::Join),
        callee("puts", true, Format::Join),
    ],
    entry_marker: None,
};

fn profile(language: &Language) -> &'static Profile {
    match language {
        Language::Python => &PYTHON,
        Language::Java => &JAVA,
        Language::JavaScript => &JAVASCRIPT,
        Language::C | Language::Cpp => &C_FAMILY,
        Language::Rust => &RUST,
        Language::Other(_) => &GENERIC,
    }
}

/// Approximate the output of `source` without running it.
///
/// Recognizes the print statements of `language`, evaluates their
/// arguments (string and integer literals, identifiers bound by an earlier
/// literal assignment, `+` chains) and concatenates the results. Arguments
/// outside that grammar are echoed as written.
///
/// When no print call is found the result is a success carrying
/// [`NO_OUTPUT_MESSAGE`]. Blank source and unterminated calls or string
/// literals are failures.
///
/// # Examples
///
/// ```
/// use primer_exec::{Language, approximate};
///
/// let result = approximate("name = 'Ada'\nprint('Hello, ' + name)", &Language::Python);
/// assert!(result.is_success());
/// assert_eq!(result.output, "Hello, Ada");
/// ```
#[must_use]
pub fn approximate(source: &str, language: &Language) -> ExecutionResult {
    if source.trim().is_empty() {
        return ExecutionResult::failure("", "no source to run", ResultOrigin::Approximated);
    }

    let profile = profile(language);
    let start = profile
        .entry_marker
        .and_then(|marker| source.find(marker))
        .unwrap_or(0);
    let names: Vec<&str> = profile.callees.iter().map(|c| c.name).collect();

    let calls = match find_print_calls(source, start, &callee_pattern(&names)) {
        Ok(calls) => calls,
        Err(e) => {
            return ExecutionResult::failure("", e.to_string(), ResultOrigin::Approximated);
        }
    };

    if calls.is_empty() {
        return ExecutionResult::success(NO_OUTPUT_MESSAGE, ResultOrigin::Approximated);
    }

    let mut output = String::new();
    for call in &calls {
        let Some(callee) = profile.callees.iter().find(|c| c.name == call.callee) else {
            continue;
        };
        output.push_str(&render_call(source, call, callee));
        if callee.newline {
            output.push('\n');
        }
    }

    let output = output.trim_end_matches('\n');
    ExecutionResult::success(output, ResultOrigin::Approximated)
}

/// Produce the text printed by one call.
///
/// Arguments that do not tokenize or parse are echoed as written. The
/// scanner has already rejected calls with unterminated strings.
fn render_call(source: &str, call: &PrintCall<'_>, callee: &Callee) -> String {
    let before = &source[..call.offset];
    let resolve = |name: &str| last_literal_assignment(before, name);

    let Some(args) = tokenize(call.args).ok().and_then(parse_args) else {
        return call.args.trim().to_owned();
    };
    let values: Vec<Value> = args.iter().map(|arg: &Expr| arg.eval(&resolve)).collect();

    match (callee.format, values.split_first()) {
        (Format::Printf, Some((Value::Text(template), rest))) => printf(template, rest),
        (Format::Braces, Some((Value::Text(template), rest))) => braces(template, rest, &resolve),
        _ => join(&values),
    }
}

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Substitute `printf` conversions with successive arguments.
fn printf(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        // Flags, width, precision and length modifiers
        let mut spec = String::from('%');
        while let Some(&m) = chars.peek()
            && (m.is_ascii_digit() || "-+ #.lh".contains(m))
        {
            spec.push(m);
            chars.next();
        }
        match chars.peek() {
            Some(&'n') if spec.len() == 1 => {
                chars.next();
                out.push('\n');
            }
            Some(&conv) if "dioufFeEgGxXsc".contains(conv) => {
                chars.next();
                match args.next() {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push_str(&spec);
                        out.push(conv);
                    }
                }
            }
            _ => out.push_str(&spec),
        }
    }
    out
}

/// Substitute `{}` placeholders; `{name}` resolves an identifier.
fn braces(template: &str, args: &[Value], resolve: &impl Fn(&str) -> Option<Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        let Some(close) = tail.find('}').filter(|_| tail.starts_with('{')) else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
            continue;
        };

        let inner = &tail[1..close];
        let name = inner.split(':').next().unwrap_or("").trim();
        let value = if name.is_empty() {
            args.next().cloned()
        } else {
            Some(resolve(name).unwrap_or_else(|| Value::Text(name.to_owned())))
        };
        match value {
            Some(value) => out.push_str(&value.to_string()),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}
