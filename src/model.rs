use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

static PAGE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// One node as the generator emitted it. Every field is optional and loosely
/// typed; nothing downstream of [`crate::reconstruct`] sees this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNodeRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "parent_id", alias = "parent")]
    pub parent_id: Option<Value>,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub quote: Option<Value>,
    #[serde(default, alias = "page_number", alias = "page")]
    pub page_number: Option<Value>,
}

impl RawNodeRecord {
    pub fn new(id: &str, parent_id: Option<&str>) -> Self {
        Self {
            id: Some(Value::from(id)),
            parent_id: parent_id.map(Value::from),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(Value::from(label));
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(Value::from(summary));
        self
    }

    pub fn with_quote(mut self, quote: &str) -> Self {
        self.quote = Some(Value::from(quote));
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(Value::from(page));
        self
    }

    pub(crate) fn key(&self) -> Option<String> {
        self.id.as_ref().and_then(scalar_to_string)
    }

    /// Missing, empty, `undefined` and the literal `"null"` all mean "no parent".
    pub(crate) fn parent_key(&self) -> Option<String> {
        let key = self.parent_id.as_ref().and_then(scalar_to_string)?;
        if key.eq_ignore_ascii_case("null") || key.eq_ignore_ascii_case("undefined") {
            return None;
        }
        Some(key)
    }

    pub(crate) fn label_text(&self) -> Option<String> {
        self.label.as_ref().and_then(scalar_to_string)
    }

    pub(crate) fn summary_text(&self) -> Option<String> {
        self.summary.as_ref().and_then(scalar_to_string)
    }

    pub(crate) fn quote_text(&self) -> Option<String> {
        self.quote.as_ref().and_then(scalar_to_string)
    }

    /// Page numbers arrive as integers, floats or strings like `"p. 4"`.
    /// Anything that does not yield a page >= 1 is treated as absent.
    pub(crate) fn page(&self) -> Option<u32> {
        let page = match self.page_number.as_ref()? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))?,
            Value::String(text) => PAGE_DIGITS.find(text)?.as_str().parse::<i64>().ok()?,
            _ => return None,
        };
        if page < 1 {
            return None;
        }
        Some(u32::try_from(page).unwrap_or(u32::MAX))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(float) = number.as_f64().filter(|f| f.fract() == 0.0) {
                format!("{}", float as i64)
            } else {
                number.to_string()
            }
        }
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Handle to a node inside a [`ConceptTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    pub id: String,
    pub label: String,
    pub summary: String,
    pub quote: Option<String>,
    pub page_number: u32,
    /// Placeholder injected by reconstruction rather than read from the input.
    pub synthetic: bool,
    #[serde(skip)]
    pub parent: Option<NodeIndex>,
    #[serde(skip)]
    pub children: Vec<NodeIndex>,
}

impl ConceptNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            summary: String::new(),
            quote: None,
            page_number: 1,
            synthetic: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A rooted concept tree stored as an arena. Children are owned exclusively
/// through their parent's `children` list, in source order.
#[derive(Debug, Clone)]
pub struct ConceptTree {
    nodes: Vec<ConceptNode>,
    root: NodeIndex,
    ids: HashMap<String, NodeIndex>,
    pub executive_summary: String,
    pub research_report: String,
}

impl ConceptTree {
    /// Builds a tree from an arena whose parent/child links are already
    /// consistent.
    pub(crate) fn from_arena(nodes: Vec<ConceptNode>, root: NodeIndex) -> Self {
        let ids = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), NodeIndex(idx)))
            .collect();
        Self {
            nodes,
            root,
            ids,
            executive_summary: String::new(),
            research_report: String::new(),
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn root_node(&self) -> &ConceptNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, idx: NodeIndex) -> &ConceptNode {
        &self.nodes[idx.0]
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.nodes[idx.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ConceptNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeIndex(idx), node))
    }

    pub fn depth_of(&self, idx: NodeIndex) -> usize {
        let mut depth = 0;
        let mut cursor = self.nodes[idx.0].parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Nodes reachable from the root, parents before children, siblings in
    /// source order.
    pub fn preorder(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.nodes[idx.0].children.iter().rev().copied());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawNodeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parent_sentinels_normalize_to_none() {
        for parent in [json!(null), json!("null"), json!("NULL"), json!(""), json!("undefined"), json!("  ")] {
            let raw = record(json!({ "id": "a", "parentId": parent }));
            assert_eq!(raw.parent_key(), None, "{parent}");
        }
        let missing = record(json!({ "id": "a" }));
        assert_eq!(missing.parent_key(), None);
    }

    #[test]
    fn numeric_ids_are_coerced_to_strings() {
        let raw = record(json!({ "id": 7, "parent_id": 3.0 }));
        assert_eq!(raw.key().as_deref(), Some("7"));
        assert_eq!(raw.parent_key().as_deref(), Some("3"));
    }

    #[test]
    fn page_numbers_accept_loose_shapes() {
        assert_eq!(record(json!({ "pageNumber": 4 })).page(), Some(4));
        assert_eq!(record(json!({ "pageNumber": "12" })).page(), Some(12));
        assert_eq!(record(json!({ "page": "p. 9" })).page(), Some(9));
        assert_eq!(record(json!({ "pageNumber": 2.7 })).page(), Some(2));
        assert_eq!(record(json!({ "pageNumber": 0 })).page(), None);
        assert_eq!(record(json!({ "pageNumber": "n/a" })).page(), None);
        assert_eq!(record(json!({})).page(), None);
    }

    #[test]
    fn preorder_follows_child_order() {
        let mut nodes = vec![
            ConceptNode::new("r", "Root"),
            ConceptNode::new("a", "A"),
            ConceptNode::new("b", "B"),
            ConceptNode::new("a1", "A1"),
        ];
        nodes[0].children = vec![NodeIndex(1), NodeIndex(2)];
        nodes[1].parent = Some(NodeIndex(0));
        nodes[1].children = vec![NodeIndex(3)];
        nodes[2].parent = Some(NodeIndex(0));
        nodes[3].parent = Some(NodeIndex(1));
        let tree = ConceptTree::from_arena(nodes, NodeIndex(0));
        let ids: Vec<&str> = tree
            .preorder()
            .into_iter()
            .map(|idx| tree.node(idx).id.as_str())
            .collect();
        assert_eq!(ids, ["r", "a", "a1", "b"]);
        assert_eq!(tree.depth_of(NodeIndex(3)), 2);
        assert_eq!(tree.find("b"), Some(NodeIndex(2)));
    }
}
