//! The position-preserving syntax tree produced by the parser.
//!
//! Nodes live in an arena owned by [`JsonDocument`]; parent links are
//! back-indices into that arena rather than owning references, so the tree
//! can represent cyclic-looking structures (property -> value -> property's
//! own parent) without `Rc`/`Weak` bookkeeping.
use serde_json::{Map, Number, Value};

use crate::diagnostics::{Diagnostic, Range};

/// An index into a [`JsonDocument`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// The payload carried by a syntax node, distinguished by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Object {
        properties: Vec<NodeId>,
    },
    Array {
        items: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: Option<NodeId>,
        colon_offset: Option<usize>,
    },
    String {
        value: String,
    },
    Number {
        value: f64,
        is_integer: bool,
    },
    Boolean {
        value: bool,
    },
    Null,
}

impl NodePayload {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Object { .. } => NodeKind::Object,
            NodePayload::Array { .. } => NodeKind::Array,
            NodePayload::Property { .. } => NodeKind::Property,
            NodePayload::String { .. } => NodeKind::String,
            NodePayload::Number { .. } => NodeKind::Number,
            NodePayload::Boolean { .. } => NodeKind::Boolean,
            NodePayload::Null => NodeKind::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Property,
    String,
    Number,
    Boolean,
    Null,
}

/// A node in the syntax tree: shared attributes plus its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub range: Range,
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self.payload, NodePayload::Number { is_integer: true, .. })
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::String { value } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match &self.payload {
            NodePayload::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match &self.payload {
            NodePayload::Boolean { value } => Some(*value),
            _ => None,
        }
    }
}

/// A comment's byte range, collected only when the caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange(pub Range);

/// A fully parsed document: its (optional) root node, syntax diagnostics and
/// collected comment ranges.
///
/// A document with no productive tokens (e.g. an empty string, or a string
/// containing only comments) has `root = None` but is still well-formed: it
/// carries no diagnostics beyond whatever the scanner/parser found.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    arena: Vec<Node>,
    pub root: Option<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
    pub comments: Vec<CommentRange>,
}

impl JsonDocument {
    pub(crate) fn new() -> Self {
        JsonDocument {
            arena: Vec::new(),
            root: None,
            diagnostics: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(node);
        id
    }

    pub(crate) fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        self.arena[child.0].parent = Some(parent);
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<&Node> {
        self.get(id).parent.map(|p| self.get(p))
    }

    /// Whether the property value node `id`'s parent is a property, i.e. `id`
    /// is itself a property's key or value.
    #[must_use]
    pub fn is_property_value(&self, id: NodeId) -> bool {
        matches!(self.parent_of(id).map(Node::kind), Some(NodeKind::Property))
    }

    /// The JSON Pointer path from the root to `id`, as an ordered list of
    /// property names / array indices.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<crate::pointer::PathSegment> {
        let mut segments = Vec::new();
        let mut current = id;
        loop {
            let node = self.get(current);
            match node.parent {
                None => break,
                Some(parent_id) => {
                    let parent = self.get(parent_id);
                    match &parent.payload {
                        NodePayload::Property { key, value, .. } => {
                            if Some(current) == *value {
                                if let Some(name) = self.get(*key).as_str() {
                                    segments.push(crate::pointer::PathSegment::Key(name.to_string()));
                                }
                            }
                            current = parent_id;
                        }
                        NodePayload::Array { items } => {
                            if let Some(index) = items.iter().position(|item| *item == current) {
                                segments.push(crate::pointer::PathSegment::Index(index));
                            }
                            current = parent_id;
                        }
                        _ => current = parent_id,
                    }
                }
            }
        }
        segments.reverse();
        segments
    }

    /// Converts the subtree rooted at `id` into a `serde_json::Value`,
    /// discarding position information. Used when handing schema content to
    /// components that operate on plain values (the resolver/cache).
    #[must_use]
    pub fn to_value(&self, id: NodeId) -> Value {
        match &self.get(id).payload {
            NodePayload::Object { properties } => {
                let mut map = Map::new();
                for prop_id in properties {
                    if let NodePayload::Property { key, value, .. } = &self.get(*prop_id).payload {
                        if let Some(name) = self.get(*key).as_str() {
                            let value = value.map_or(Value::Null, |v| self.to_value(v));
                            map.insert(name.to_string(), value);
                        }
                    }
                }
                Value::Object(map)
            }
            NodePayload::Array { items } => Value::Array(items.iter().map(|item| self.to_value(*item)).collect()),
            NodePayload::String { value } => Value::String(value.clone()),
            NodePayload::Number { value, .. } => {
                Number::from_f64(*value).map_or(Value::Null, Value::Number)
            }
            NodePayload::Boolean { value } => Value::Bool(*value),
            NodePayload::Null => Value::Null,
            NodePayload::Property { value, .. } => value.map_or(Value::Null, |v| self.to_value(v)),
        }
    }

    #[must_use]
    pub fn root_value(&self) -> Value {
        self.root.map_or(Value::Null, |id| self.to_value(id))
    }

    /// Looks up a property's value node by name, if `id` is an object node.
    #[must_use]
    pub fn get_property(&self, id: NodeId, name: &str) -> Option<NodeId> {
        if let NodePayload::Object { properties } = &self.get(id).payload {
            for prop_id in properties {
                if let NodePayload::Property { key, value, .. } = &self.get(*prop_id).payload {
                    if self.get(*key).as_str() == Some(name) {
                        return *value;
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn offsets_nest_within_parent() {
        let doc = parse("{ \"a\": [1, 2] }", Default::default());
        let root = doc.root.expect("root");
        fn check(doc: &JsonDocument, id: NodeId) {
            let node = doc.get(id);
            if let Some(parent_id) = node.parent {
                let parent = doc.get(parent_id);
                assert!(parent.range.offset <= node.range.offset);
                assert!(node.range.end() <= parent.range.end());
            }
            match &node.payload {
                NodePayload::Object { properties } => {
                    for p in properties {
                        check(doc, *p);
                    }
                }
                NodePayload::Array { items } => {
                    for i in items {
                        check(doc, *i);
                    }
                }
                NodePayload::Property { key, value, .. } => {
                    check(doc, *key);
                    if let Some(v) = value {
                        check(doc, *v);
                    }
                }
                _ => {}
            }
        }
        check(&doc, root);
    }
}
