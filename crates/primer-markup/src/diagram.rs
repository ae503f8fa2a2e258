//! Diagram fence decoding.
//!
//! A diagram fence holds a strict JSON object describing a hierarchy:
//!
//! ````text
//! ```diagram tree
//! {"label": "Animal", "children": [{"label": "Dog"}, {"label": "Cat"}]}
//! ```
//! ````
//!
//! Decoding is pure: it returns a [`DiagramTree`] value and never touches
//! presentation state.

use serde_json::{Map, Value};

use crate::node::DiagramTree;

/// Diagram decoding error.
#[derive(Debug, thiserror::Error)]
#[error("{diagram} diagram: {kind}")]
pub struct DecodeError {
    /// Kind tag from the opening fence.
    pub diagram: String,
    pub kind: DecodeErrorKind,
}

/// Kind of diagram decoding error.
#[derive(Debug, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("children must be an array of objects, found {0}")]
    InvalidChildren(&'static str),
}

/// Decode a buffered diagram fence body.
///
/// The body must parse as strict JSON and the top-level value must be an
/// object. `children`, when present, must be an array of objects at every
/// level. A scalar `label` is rendered as text.
///
/// # Examples
///
/// ```
/// use primer_markup::decode_diagram;
///
/// let tree = decode_diagram("tree", r#"{"label": "root", "children": [{"label": "a"}]}"#).unwrap();
/// assert_eq!(tree.label, "root");
/// assert_eq!(tree.children[0].label, "a");
///
/// assert!(decode_diagram("tree", "{ not json").is_err());
/// ```
pub fn decode_diagram(kind: &str, buffered: &str) -> Result<DiagramTree, DecodeError> {
    let error = |kind_err: DecodeErrorKind| DecodeError {
        diagram: kind.to_owned(),
        kind: kind_err,
    };

    let value: Value =
        serde_json::from_str(buffered).map_err(|e| error(DecodeErrorKind::Json(e)))?;

    match value {
        Value::Object(map) => tree_from_object(map).map_err(error),
        other => Err(error(DecodeErrorKind::NotAnObject(json_type_name(&other)))),
    }
}

fn tree_from_object(mut map: Map<String, Value>) -> Result<DiagramTree, DecodeErrorKind> {
    let label = match map.remove("label") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(value @ (Value::Bool(_) | Value::Number(_))) => value.to_string(),
        // Structured labels are not labels; keep them for the renderer
        Some(value) => {
            map.insert("label".to_owned(), value);
            String::new()
        }
    };

    let children = match map.remove("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(child) => tree_from_object(child),
                other => Err(DecodeErrorKind::InvalidChildren(json_type_name(&other))),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(DecodeErrorKind::InvalidChildren(json_type_name(&other))),
    };

    Ok(DiagramTree {
        label,
        children,
        attributes: map,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
