//! Content node types produced by the parser.

use serde_json::{Map, Value};

/// Inline style of a [`StyledRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RunStyle {
    Plain,
    Code,
    Bold,
}

/// A span of text with a single inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StyledRun {
    /// Text with inline markers removed.
    pub text: String,
    /// Style applied to the whole run.
    pub style: RunStyle,
}

impl StyledRun {
    /// Create a run with the given style.
    #[must_use]
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Plain)
    }

    #[must_use]
    pub fn code(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Code)
    }

    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Bold)
    }
}

/// Hierarchy decoded from a diagram fence.
///
/// `label` and `children` are the typed part of the payload. Any other keys
/// the author wrote are kept untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagramTree {
    /// Display label of this node (empty when the payload has none).
    pub label: String,
    /// Child nodes in payload order.
    pub children: Vec<DiagramTree>,
    /// Remaining payload keys, verbatim.
    pub attributes: Map<String, Value>,
}

impl DiagramTree {
    /// Create a childless node.
    #[must_use]
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Total number of nodes in the tree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of levels in the tree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// One parsed block of a lesson document.
///
/// Nodes own their text; nothing borrows from the source buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ContentNode {
    /// `#`, `##` or `###` heading.
    Heading { level: u8, text: Vec<StyledRun> },
    Paragraph { runs: Vec<StyledRun> },
    Blockquote { runs: Vec<StyledRun> },
    /// Flat list item; nesting is not supported.
    ListItem { runs: Vec<StyledRun> },
    /// Verbatim fenced code.
    CodeBlock { language: String, source: String },
    /// Pipe table with the alignment row removed.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    DiagramBlock { kind: String, payload: DiagramTree },
    /// `![alt](src)` or, when `animated`, `!gif[alt](src)`.
    ImageRef {
        alt: String,
        src: String,
        animated: bool,
    },
}

impl ContentNode {
    /// Short name of the node kind, used in logs and renderer class names.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::Blockquote { .. } => "blockquote",
            Self::ListItem { .. } => "list_item",
            Self::CodeBlock { .. } => "code_block",
            Self::Table { .. } => "table",
            Self::DiagramBlock { .. } => "diagram_block",
            Self::ImageRef { .. } => "image_ref",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_run_constructors() {
        assert_eq!(StyledRun::plain("a").style, RunStyle::Plain);
        assert_eq!(StyledRun::code("a").style, RunStyle::Code);
        assert_eq!(StyledRun::bold("a").style, RunStyle::Bold);
        assert_eq!(StyledRun::bold("a").text, "a");
    }

    #[test]
    fn test_diagram_tree_counts() {
        let tree = DiagramTree {
            label: "root".to_owned(),
            children: vec![
                DiagramTree {
                    label: "a".to_owned(),
                    children: vec![DiagramTree::leaf("a1")],
                    attributes: Map::new(),
                },
                DiagramTree::leaf("b"),
            ],
            attributes: Map::new(),
        };

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(DiagramTree::leaf("x").depth(), 1);
    }

    #[test]
    fn test_node_kind_names() {
        let node = ContentNode::CodeBlock {
            language: "rust".to_owned(),
            source: String::new(),
        };
        assert_eq!(node.kind(), "code_block");

        let node = ContentNode::ImageRef {
            alt: String::new(),
            src: String::new(),
            animated: true,
        };
        assert_eq!(node.kind(), "image_ref");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_diagram_block_keeps_kind_field() {
        let node = ContentNode::DiagramBlock {
            kind: "org".to_owned(),
            payload: DiagramTree::leaf("CEO"),
        };

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({
                "type": "diagram_block",
                "kind": "org",
                "payload": {"label": "CEO", "children": [], "attributes": {}}
            })
        );
    }
}
