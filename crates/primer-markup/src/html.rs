//! Reference HTML renderer.
//!
//! Maps each [`ContentNode`] to a semantic HTML5 fragment. The mapping is a
//! plain dispatch on node kind and keeps no state between nodes.

use std::borrow::Cow;
use std::fmt::Write;

use crate::node::{ContentNode, DiagramTree, RunStyle, StyledRun};

/// Render backend for content nodes.
///
/// Implementors only provide [`render_node`](Self::render_node); the
/// default [`render`](Self::render) concatenates nodes in order.
pub trait RenderBackend {
    /// Append the rendering of one node to `out`.
    fn render_node(node: &ContentNode, out: &mut String);

    /// Render a whole node list.
    fn render(nodes: &[ContentNode]) -> String {
        let mut out = String::with_capacity(nodes.len() * 64);
        for node in nodes {
            Self::render_node(node, &mut out);
        }
        out
    }
}

/// HTML render backend.
///
/// Produces:
/// - `<h1>`..`<h3>`, `<p>`, `<blockquote>`, `<li class="flat">`
/// - `<pre><code class="language-..">` for code blocks
/// - `<table>` with `<thead>`/`<tbody>`
/// - `<figure class="diagram diagram-{kind}">` with nested `<ul>` for diagrams
/// - `<img>` for images, `class="animated"` for `!gif` directives
///
/// # Example
///
/// ```
/// use primer_markup::{HtmlBackend, RenderBackend, parse};
///
/// let html = HtmlBackend::render(&parse("# Hi\n\nUse `x < y`"));
/// assert_eq!(html, "<h1>Hi</h1><p>Use <code>x &lt; y</code></p>");
/// ```
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn render_node(node: &ContentNode, out: &mut String) {
        match node {
            ContentNode::Heading { level, text } => {
                write!(out, "<h{level}>").unwrap();
                runs(text, out);
                write!(out, "</h{level}>").unwrap();
            }
            ContentNode::Paragraph { runs: content } => wrap("p", content, out),
            ContentNode::Blockquote { runs: content } => wrap("blockquote", content, out),
            ContentNode::ListItem { runs: content } => {
                out.push_str(r#"<li class="flat">"#);
                runs(content, out);
                out.push_str("</li>");
            }
            ContentNode::CodeBlock { language, source } => {
                write!(
                    out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(language),
                    escape_html(source)
                )
                .unwrap();
            }
            ContentNode::Table { header, rows } => table(header, rows, out),
            ContentNode::DiagramBlock { kind, payload } => {
                write!(
                    out,
                    r#"<figure class="diagram diagram-{}"><ul>"#,
                    escape_html(kind)
                )
                .unwrap();
                diagram_node(payload, out);
                out.push_str("</ul></figure>");
            }
            ContentNode::ImageRef { alt, src, animated } => {
                let class_attr = if *animated { r#" class="animated""# } else { "" };
                write!(
                    out,
                    r#"<img src="{}" alt="{}"{class_attr}>"#,
                    escape_html(src),
                    escape_html(alt)
                )
                .unwrap();
            }
        }
    }
}

fn wrap(tag: &str, content: &[StyledRun], out: &mut String) {
    write!(out, "<{tag}>").unwrap();
    runs(content, out);
    write!(out, "</{tag}>").unwrap();
}

fn runs(content: &[StyledRun], out: &mut String) {
    for run in content {
        let text = escape_html(&run.text);
        match run.style {
            RunStyle::Plain => out.push_str(&text),
            RunStyle::Code => write!(out, "<code>{text}</code>").unwrap(),
            RunStyle::Bold => write!(out, "<strong>{text}</strong>").unwrap(),
        }
    }
}

fn table(header: &[String], rows: &[Vec<String>], out: &mut String) {
    out.push_str("<table><thead><tr>");
    for cell in header {
        write!(out, "<th>{}</th>", escape_html(cell)).unwrap();
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{}</td>", escape_html(cell)).unwrap();
        }
        // Short rows get empty trailing cells
        for _ in row.len()..header.len() {
            out.push_str("<td></td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

fn diagram_node(tree: &DiagramTree, out: &mut String) {
    write!(out, "<li><span>{}</span>", escape_html(&tree.label)).unwrap();
    if !tree.children.is_empty() {
        out.push_str("<ul>");
        for child in &tree.children {
            diagram_node(child, out);
        }
        out.push_str("</ul>");
    }
    out.push_str("</li>");
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attribute values.
///
/// Borrows the input when nothing needs escaping.
#[must_use]
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
