//! Removal of card elements left empty by substitution.
//!
//! A blank `{{due}}` should not leave a "Due:" fact or an empty text line in
//! the rendered card, so after substitution the tree is walked and:
//! - `TextBlock` with blank `text` is dropped
//! - `FactSet` loses facts with a blank `value`, and is dropped when none remain
//! - `Action.OpenUrl` with a blank `url` is dropped
//! - `Container`/`Column` without items, `ColumnSet` without columns and
//!   `ActionSet` without actions are dropped once their children are pruned
//!
//! The `AdaptiveCard` root is kept even if its body ends up empty.

use serde_json::{Map, Value};

/// Card element kinds that pruning distinguishes, keyed by the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    AdaptiveCard,
    Container,
    Column,
    ColumnSet,
    TextBlock,
    FactSet,
    Fact,
    OpenUrl,
    ActionSet,
    /// Any other element, passed through with its children pruned
    Other,
}

impl NodeKind {
    pub fn from_type(type_name: Option<&str>) -> Self {
        match type_name {
            Some("AdaptiveCard") => NodeKind::AdaptiveCard,
            Some("Container") => NodeKind::Container,
            Some("Column") => NodeKind::Column,
            Some("ColumnSet") => NodeKind::ColumnSet,
            Some("TextBlock") => NodeKind::TextBlock,
            Some("FactSet") => NodeKind::FactSet,
            Some("Fact") => NodeKind::Fact,
            Some("Action.OpenUrl") => NodeKind::OpenUrl,
            Some("ActionSet") => NodeKind::ActionSet,
            _ => NodeKind::Other,
        }
    }

    fn of(node: &Map<String, Value>) -> Self {
        Self::from_type(node.get("type").and_then(Value::as_str))
    }

    /// Collection that must be non-empty for the node to survive pruning.
    fn required_collection(self) -> Option<&'static str> {
        match self {
            NodeKind::Container | NodeKind::Column => Some("items"),
            NodeKind::ColumnSet => Some("columns"),
            NodeKind::ActionSet => Some("actions"),
            _ => None,
        }
    }
}

/// Prune a JSON value. Returns `None` when the value itself is dropped.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Object(node) => prune_node(node).map(Value::Object),
        Value::Array(items) => Some(Value::Array(items.into_iter().filter_map(prune).collect())),
        other => Some(other),
    }
}

fn prune_node(mut node: Map<String, Value>) -> Option<Map<String, Value>> {
    let kind = NodeKind::of(&node);

    match kind {
        NodeKind::TextBlock if is_blank(node.get("text")) => return None,
        NodeKind::OpenUrl if is_blank(node.get("url")) => return None,
        NodeKind::FactSet => {
            let facts: Vec<Value> = match node.remove("facts") {
                Some(Value::Array(facts)) => facts
                    .into_iter()
                    .filter(|fact| !is_blank(fact.get("value")))
                    .collect(),
                _ => Vec::new(),
            };
            if facts.is_empty() {
                return None;
            }
            node.insert("facts".to_string(), Value::Array(facts));
        }
        _ => {}
    }

    let node: Map<String, Value> = node
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(_) | Value::Array(_) => prune(value).map(|v| (key, v)),
            scalar => Some((key, scalar)),
        })
        .collect();

    if let Some(collection) = kind.required_collection() {
        if is_empty_collection(node.get(collection)) {
            return None;
        }
    }

    Some(node)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn is_empty_collection(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
        Some(_) => false,
    }
}
