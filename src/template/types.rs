//! Card template types and error definitions

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// The `type` every card template root must declare.
pub const ROOT_CARD_TYPE: &str = "AdaptiveCard";

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Card template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read card template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in card template {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Card template must be an AdaptiveCard object with type 'AdaptiveCard'")]
    InvalidRoot,
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Values substituted into `{{placeholder}}` tokens of a card template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardVariables {
    pub account: String,
    pub opportunity: String,
    pub amount: String,
    /// Optional due date; renders as an empty string when absent
    pub due: Option<String>,
    pub cta_url: String,
}

impl CardVariables {
    /// Placeholder map keyed by token name, in substitution order:
    /// `account`, `opportunity`, `amount`, `due`, `cta_url`.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("account".into(), Value::String(self.account.clone()));
        map.insert("opportunity".into(), Value::String(self.opportunity.clone()));
        map.insert("amount".into(), Value::String(self.amount.clone()));
        map.insert(
            "due".into(),
            Value::String(self.due.clone().unwrap_or_default()),
        );
        map.insert("cta_url".into(), Value::String(self.cta_url.clone()));
        map
    }
}

/// A card after substitution and pruning.
///
/// Construction goes through [`super::render`], so the root is always an
/// object whose `type` is [`ROOT_CARD_TYPE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderedCard(Value);

impl RenderedCard {
    pub(super) fn new(card: Value) -> TemplateResult<Self> {
        let is_root = card
            .as_object()
            .and_then(|obj| obj.get("type"))
            .and_then(Value::as_str)
            == Some(ROOT_CARD_TYPE);

        if !is_root {
            return Err(TemplateError::InvalidRoot);
        }
        Ok(Self(card))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
