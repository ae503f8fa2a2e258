//! Lesson markup parser.
//!
//! Converts author-written lesson documents into a flat, ordered list of
//! [`ContentNode`] values. The markup is a small dialect: headings, quotes,
//! flat list items, fenced code, pipe tables, JSON diagram fences and
//! single-line image directives, with `code` and **bold** inline spans.
//!
//! # Architecture
//!
//! - [`inline`](format_inline): splits a line into [`StyledRun`]s
//! - [`table`](build_table): turns buffered pipe rows into a table node
//! - [`diagram`](decode_diagram): decodes a diagram fence's JSON payload
//! - [`Parser`]: single-pass state machine tying the above together
//! - [`HtmlBackend`]: reference renderer mapping nodes to HTML
//!
//! Parsing is total: any input yields a node list, and lines that fit no
//! block rule degrade to paragraphs.
//!
//! # Example
//!
//! ```
//! use primer_markup::{ContentNode, StyledRun, parse};
//!
//! let nodes = parse("# Title\n\nSome **bold** text.");
//! assert_eq!(
//!     nodes[0],
//!     ContentNode::Heading {
//!         level: 1,
//!         text: vec![StyledRun::plain("Title")],
//!     }
//! );
//! assert_eq!(nodes.len(), 2);
//! ```

mod diagram;
mod fence;
mod html;
mod inline;
mod node;
mod parser;
mod table;

pub use diagram::{DecodeError, DecodeErrorKind, decode_diagram};
pub use html::{HtmlBackend, RenderBackend, escape_html};
pub use inline::format_inline;
pub use node::{ContentNode, DiagramTree, RunStyle, StyledRun};
pub use parser::{Parser, parse};
pub use table::{build_table, is_separator_row, is_table_continuation, is_table_row, split_table_row};
