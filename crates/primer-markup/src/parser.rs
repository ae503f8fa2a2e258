//! Single-pass document parser.
//!
//! The parser walks the document line by line carrying an explicit
//! [`State`]. Each line either extends the open block, closes it, or is
//! classified on its own in document order:
//!
//! 1. diagram fence body / close
//! 2. code fence body / close
//! 3. fence open (diagram, then generic)
//! 4. image directives (`!gif[..](..)`, then `![..](..)`)
//! 5. table rows
//! 6. heading, blockquote, list item, paragraph
//!
//! An open table is flushed before any non-table line is handled. At end of
//! input an open code fence or table is flushed with whatever was buffered;
//! an open diagram fence is dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagram::decode_diagram;
use crate::fence::{FenceOpen, is_fence_close, parse_fence_open};
use crate::inline::format_inline;
use crate::node::ContentNode;
use crate::table::{build_table, is_table_continuation, is_table_row, split_table_row};

/// Language recorded for a fence without a tag.
const DEFAULT_LANGUAGE: &str = "text";

/// Reserved fence word introducing a diagram.
const DEFAULT_DIAGRAM_KEYWORD: &str = "diagram";

/// Kind recorded for a diagram fence without a kind tag.
const DEFAULT_DIAGRAM_KIND: &str = "tree";

static ANIMATED_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!gif\[([^\]]*)\]\(([^)]*)\)$").unwrap());

static STATIC_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]*)\)$").unwrap());

/// Parse a document with default options.
///
/// Never fails: unrecognized lines become paragraphs.
///
/// # Examples
///
/// ```
/// use primer_markup::{ContentNode, parse};
///
/// let nodes = parse("| A | B |\n|---|---|\n| 1 | 2 |\n");
/// assert_eq!(
///     nodes,
///     vec![ContentNode::Table {
///         header: vec!["A".to_owned(), "B".to_owned()],
///         rows: vec![vec!["1".to_owned(), "2".to_owned()]],
///     }]
/// );
/// ```
#[must_use]
pub fn parse(document: &str) -> Vec<ContentNode> {
    Parser::new().parse(document)
}

/// Block the parser is currently inside.
#[derive(Debug)]
enum State {
    Normal,
    InCodeFence { language: String, lines: Vec<String> },
    InDiagramFence { kind: String, lines: Vec<String> },
    InTable { rows: Vec<Vec<String>> },
}

/// Configurable document parser.
///
/// Holds only options, so one parser can be shared across threads and
/// reused for any number of documents.
///
/// # Example
///
/// ```
/// use primer_markup::{ContentNode, Parser};
///
/// let parser = Parser::new().default_language("java");
/// let nodes = parser.parse("```\nint x = 1;\n```");
/// assert_eq!(
///     nodes,
///     vec![ContentNode::CodeBlock {
///         language: "java".to_owned(),
///         source: "int x = 1;".to_owned(),
///     }]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    default_language: String,
    diagram_keyword: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_owned(),
            diagram_keyword: DEFAULT_DIAGRAM_KEYWORD.to_owned(),
        }
    }

    /// Set the language recorded for untagged code fences (default: `text`).
    #[must_use]
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Set the reserved word that opens a diagram fence (default: `diagram`).
    #[must_use]
    pub fn diagram_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.diagram_keyword = keyword.into();
        self
    }

    /// Parse a document into content nodes.
    #[must_use]
    pub fn parse(&self, document: &str) -> Vec<ContentNode> {
        let mut nodes = Vec::new();
        let mut state = State::Normal;

        for line in document.lines() {
            state = self.step(state, line, &mut nodes);
        }
        finish(state, &mut nodes);

        tracing::trace!(node_count = nodes.len(), "Parsed document");
        nodes
    }

    /// Advance the state machine by one line.
    fn step(&self, state: State, line: &str, nodes: &mut Vec<ContentNode>) -> State {
        match state {
            State::InDiagramFence { kind, mut lines } => {
                if is_fence_close(line) {
                    emit_diagram(&kind, &lines, nodes);
                    State::Normal
                } else {
                    lines.push(line.to_owned());
                    State::InDiagramFence { kind, lines }
                }
            }
            State::InCodeFence { language, mut lines } => {
                if is_fence_close(line) {
                    nodes.push(code_block(language, lines));
                    State::Normal
                } else {
                    lines.push(line.to_owned());
                    State::InCodeFence { language, lines }
                }
            }
            State::InTable { mut rows } => {
                if is_table_continuation(line) {
                    rows.push(split_table_row(line));
                    State::InTable { rows }
                } else {
                    nodes.push(build_table(rows));
                    self.step_normal(line, nodes)
                }
            }
            State::Normal => self.step_normal(line, nodes),
        }
    }

    /// Handle a line outside any open block.
    fn step_normal(&self, line: &str, nodes: &mut Vec<ContentNode>) -> State {
        if let Some(open) = parse_fence_open(line, &self.diagram_keyword) {
            return match open {
                FenceOpen::Diagram { kind } => State::InDiagramFence {
                    kind: kind.unwrap_or(DEFAULT_DIAGRAM_KIND).to_owned(),
                    lines: Vec::new(),
                },
                FenceOpen::Code { language } => State::InCodeFence {
                    language: language.unwrap_or(&self.default_language).to_owned(),
                    lines: Vec::new(),
                },
            };
        }

        let trimmed = line.trim();

        if let Some(image) = image_directive(trimmed) {
            nodes.push(image);
            return State::Normal;
        }

        if is_table_row(trimmed) {
            return State::InTable {
                rows: vec![split_table_row(trimmed)],
            };
        }

        if let Some(node) = classify_line(trimmed) {
            nodes.push(node);
        }
        State::Normal
    }
}

/// Flush whatever block is still open at end of input.
fn finish(state: State, nodes: &mut Vec<ContentNode>) {
    match state {
        State::Normal => {}
        State::InCodeFence { language, lines } => {
            tracing::debug!(%language, "Unterminated code fence, flushing buffered lines");
            nodes.push(code_block(language, lines));
        }
        State::InTable { rows } => nodes.push(build_table(rows)),
        State::InDiagramFence { kind, lines } => {
            tracing::debug!(
                %kind,
                buffered_lines = lines.len(),
                "Unterminated diagram fence dropped"
            );
        }
    }
}

fn emit_diagram(kind: &str, lines: &[String], nodes: &mut Vec<ContentNode>) {
    match decode_diagram(kind, &lines.join("\n")) {
        Ok(payload) => nodes.push(ContentNode::DiagramBlock {
            kind: kind.to_owned(),
            payload,
        }),
        Err(e) => tracing::debug!(error = %e, "Dropping diagram block"),
    }
}

/// Build a code block, trimming trailing blank lines.
fn code_block(language: String, mut lines: Vec<String>) -> ContentNode {
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    ContentNode::CodeBlock {
        language,
        source: lines.join("\n"),
    }
}

fn image_directive(trimmed: &str) -> Option<ContentNode> {
    let (caps, animated) = match ANIMATED_IMAGE.captures(trimmed) {
        Some(caps) => (caps, true),
        None => (STATIC_IMAGE.captures(trimmed)?, false),
    };
    Some(ContentNode::ImageRef {
        alt: caps[1].trim().to_owned(),
        src: caps[2].trim().to_owned(),
        animated,
    })
}

/// Classify a single trimmed line; blank lines produce nothing.
fn classify_line(trimmed: &str) -> Option<ContentNode> {
    if trimmed.is_empty() {
        return None;
    }

    if let Some((level, text)) = heading(trimmed) {
        return Some(ContentNode::Heading {
            level,
            text: format_inline(text),
        });
    }

    if let Some(rest) = trimmed.strip_prefix("> ") {
        return Some(ContentNode::Blockquote {
            runs: format_inline(rest.trim_start()),
        });
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Some(ContentNode::ListItem {
            runs: format_inline(rest.trim_start()),
        });
    }

    Some(ContentNode::Paragraph {
        runs: format_inline(trimmed),
    })
}

/// Parse `#`, `##` or `###` followed by a space.
fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let text = trimmed[hashes..].strip_prefix(' ')?;
    Some((u8::try_from(hashes).ok()?, text.trim()))
}
