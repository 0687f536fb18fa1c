//! Adaptive Card template rendering.
//!
//! This module provides:
//! - Loading a card template from a JSON file
//! - Variable substitution for `{{variable}}` placeholders in string values
//! - Pruning of elements left empty after substitution
//! - The markdown fallback text that accompanies every card
//!
//! # Example
//!
//! ```ignore
//! let template = load_template(Path::new("main.json"))?;
//! let variables = CardVariables {
//!     account: "ACME Corp".to_string(),
//!     opportunity: "Q4 Expansion".to_string(),
//!     amount: "$50,000".to_string(),
//!     due: None,
//!     cta_url: "https://example.crm.com/opportunities/ACME-Q4".to_string(),
//! };
//!
//! let card = render(&template, &variables.to_map())?;
//! ```

mod fallback;
mod prune;
mod substitution;
mod types;

use std::path::Path;

use serde_json::{Map, Value};

pub use fallback::build_fallback_text;
pub use prune::{prune, NodeKind};
pub use types::{CardVariables, RenderedCard, TemplateError, TemplateResult, ROOT_CARD_TYPE};

/// Read and parse a card template. No substitution happens here.
pub fn load_template(path: &Path) -> TemplateResult<Value> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound(path.to_path_buf())
        } else {
            TemplateError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|source| TemplateError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Substitute `variables` into `template` and prune empty elements.
///
/// Fails with [`TemplateError::InvalidRoot`] unless the result is an
/// `AdaptiveCard` object.
pub fn render(template: &Value, variables: &Map<String, Value>) -> TemplateResult<RenderedCard> {
    let substituted = substitution::substitute_value(template, variables);
    let pruned = prune(substituted).ok_or(TemplateError::InvalidRoot)?;
    RenderedCard::new(pruned)
}
