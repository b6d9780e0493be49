//! # Object Form
//!
//! Bidirectional mapping between a [`Tree`] and a nested JSON-like object:
//!
//! - keys starting with the attribute prefix (`_` by default) are attributes
//! - any other key is a child tag; an array value yields one sibling per entry
//! - tags listed in `array_tags` always decode to arrays, even with a single
//!   occurrence, so consumers never special-case singular vs. plural
//!
//! ```text
//! { "_type": "mainGrid", "content": { "row": [ { "cell": [ ... ] } ] } }
//!                      <=>
//! <grid type="mainGrid"><content><row><cell .../></row></content></grid>
//! ```

use crate::error::CodecError;
use crate::node::{AttrValue, NodeId, Tree};
use serde_json::{Map, Number, Value};

pub const DEFAULT_ATTRIBUTE_PREFIX: char = '_';

/// Configuration of the object form
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCodec {
    attribute_prefix: char,
    array_tags: Vec<String>,
}

impl ObjectCodec {
    pub fn new() -> Self {
        Self {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX,
            array_tags: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: char) -> Self {
        self.attribute_prefix = prefix;
        self
    }

    /// Tags that always decode to arrays
    pub fn with_array_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.array_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn attribute_prefix(&self) -> char {
        self.attribute_prefix
    }

    pub fn array_tags(&self) -> &[String] {
        &self.array_tags
    }

    fn is_array_tag(&self, tag: &str) -> bool {
        self.array_tags.iter().any(|t| t == tag)
    }

    // ------------------------------------------------------------------
    // object -> tree
    // ------------------------------------------------------------------

    /// Build a tree whose root element is `root_tag` from an object
    pub fn encode(&self, root_tag: &str, object: &Value) -> Result<Tree, CodecError> {
        if root_tag.is_empty() {
            return Err(CodecError::EmptyTag);
        }
        let map = object.as_object().ok_or_else(|| CodecError::NotAnObject {
            tag: root_tag.to_string(),
        })?;
        let mut tree = Tree::new(root_tag);
        let root = tree.root();
        self.encode_map(&mut tree, root, map)?;
        tracing::trace!(root = root_tag, nodes = tree.arena_len(), "encoded object form");
        Ok(tree)
    }

    fn encode_map(&self, tree: &mut Tree, node: NodeId, map: &Map<String, Value>) -> Result<(), CodecError> {
        for (key, value) in map {
            if let Some(name) = key.strip_prefix(self.attribute_prefix) {
                let text = stringify_scalar(value).ok_or_else(|| CodecError::InvalidAttribute {
                    name: name.to_string(),
                })?;
                if name.is_empty() {
                    return Err(CodecError::InvalidAttribute {
                        name: key.to_string(),
                    });
                }
                tree.set_attr(node, name, text);
                continue;
            }

            if key.is_empty() {
                return Err(CodecError::EmptyTag);
            }
            match value {
                Value::Array(items) => {
                    for item in items {
                        self.encode_child(tree, node, key, item)?;
                    }
                }
                other => self.encode_child(tree, node, key, other)?,
            }
        }
        Ok(())
    }

    fn encode_child(&self, tree: &mut Tree, parent: NodeId, tag: &str, value: &Value) -> Result<(), CodecError> {
        let child = tree.append_element(parent, tag);
        match value {
            Value::Object(map) => self.encode_map(tree, child, map),
            Value::Null | Value::Bool(true) => Ok(()),
            _ => Err(CodecError::UnsupportedValue {
                tag: tag.to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // tree -> object
    // ------------------------------------------------------------------

    /// Decode `node` and its subtree to the object form
    pub fn decode(&self, tree: &Tree, node: NodeId) -> Value {
        let mut map = Map::new();

        for (name, value) in tree.attributes(node) {
            map.insert(format!("{}{}", self.attribute_prefix, name), attr_to_value(value));
        }

        for child in tree.children(node) {
            let tag = tree.tag(*child);
            let decoded = self.decode(tree, *child);
            match map.get_mut(tag) {
                Some(Value::Array(items)) => items.push(decoded),
                Some(existing) => {
                    let previous = existing.take();
                    *existing = Value::Array(vec![previous, decoded]);
                }
                None if self.is_array_tag(tag) => {
                    map.insert(tag.to_string(), Value::Array(vec![decoded]));
                }
                None => {
                    map.insert(tag.to_string(), decoded);
                }
            }
        }

        Value::Object(map)
    }

    /// Decode the whole tree
    pub fn to_object(&self, tree: &Tree) -> Value {
        self.decode(tree, tree.root())
    }
}

impl Default for ObjectCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Type inference applied to attribute text when decoding
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(float_to_number)
    {
        return Value::Number(number);
    }
    Value::String(trimmed.to_string())
}

fn attr_to_value(value: &AttrValue) -> Value {
    match value {
        AttrValue::Bool(b) => Value::Bool(*b),
        AttrValue::Number(n) => float_to_number(*n).map(Value::Number).unwrap_or(Value::Null),
        AttrValue::Text(s) => infer_value(s),
    }
}

/// Integral floats become integers so that `5` and `5.0` decode alike
fn float_to_number(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => f.to_string(),
            (None, None, None) => n.to_string(),
        }),
        Value::Array(_) | Value::Object(_) => None,
    }
}
