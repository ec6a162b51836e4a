pub mod document;

#[cfg(test)]
mod tests;

pub use document::{Document, Node, QueryError};

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{acquirer::Strategy, scrape::FieldSelector};

const FRAMEWORK_TOKENS: [&str; 3] = ["react", "vue", "angular"];

pub const CLIENT_RENDERED_HINT: &str = "This site appears to use client-side rendering (React/Vue/Angular). A static fetch cannot execute JavaScript. Try the rendered strategy (HARVESTER_STRATEGY=rendered) for JavaScript-heavy sites.";
pub const SELECTOR_MISMATCH_HINT: &str =
    "The selector might be incorrect or the page structure has changed.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid CSS selector: \"{selector}\". {reason}")]
    InvalidContainer { selector: String, reason: String },

    #[error("No elements found with selector \"{selector}\". {hint}")]
    NoContainers {
        selector: String,
        hint: &'static str,
    },
}

/// Raw values pulled from one container, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub metadata: BTreeMap<String, String>,
    pub text: String,
    pub first_href: Option<String>,
}

/// A field selector the engine refused while scoped to one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    pub field: String,
    pub selector: String,
    pub reason: String,
}

/// Enumerate containers and pull every field from each of them.
///
/// Only the container selector can fail the extraction. Field selectors that
/// match nothing, yield an empty value, or are rejected by the engine simply
/// leave their key out of that container's metadata.
pub fn extract(
    markup: &str,
    container_selector: &str,
    fields: &[FieldSelector],
    strategy: Strategy,
) -> Result<Vec<RawRecord>, ExtractError> {
    let document = Document::parse(markup);

    let containers =
        document
            .query(container_selector)
            .map_err(|err| ExtractError::InvalidContainer {
                selector: container_selector.to_string(),
                reason: err.reason,
            })?;

    info!(
        selector = container_selector,
        count = containers.len(),
        "matched container nodes"
    );

    if containers.is_empty() {
        let hint = if strategy == Strategy::Static && looks_client_rendered(markup) {
            CLIENT_RENDERED_HINT
        } else {
            SELECTOR_MISMATCH_HINT
        };
        return Err(ExtractError::NoContainers {
            selector: container_selector.to_string(),
            hint,
        });
    }

    let records = containers
        .iter()
        .map(|container| {
            let (metadata, diagnostics) = extract_fields(container, fields);
            for diagnostic in &diagnostics {
                warn!(
                    field = %diagnostic.field,
                    selector = %diagnostic.selector,
                    reason = %diagnostic.reason,
                    "skipping field selector"
                );
            }
            RawRecord {
                metadata,
                text: container.text(),
                first_href: container.first_anchor_href().map(str::to_string),
            }
        })
        .collect();

    Ok(records)
}

/// Fold the field selectors over one container into a value map plus the
/// selectors the engine rejected.
pub fn extract_fields(
    container: &Node<'_>,
    fields: &[FieldSelector],
) -> (BTreeMap<String, String>, Vec<FieldDiagnostic>) {
    fields
        .iter()
        .filter(|field| !field.selector.is_empty())
        .fold(
            (BTreeMap::new(), Vec::new()),
            |(mut metadata, mut diagnostics), field| {
                match container.query_within(&field.selector) {
                    Ok(Some(found)) => {
                        let value = match field.attribute_name() {
                            Some(attribute) => found.attr(attribute).map(str::to_string),
                            None => Some(found.text().trim().to_string()),
                        };
                        match value.filter(|value| !value.is_empty()) {
                            Some(value) => {
                                metadata.insert(field.field.clone(), value);
                            }
                            None => debug!(field = %field.field, "field matched without a value"),
                        }
                    }
                    Ok(None) => {}
                    Err(err) => diagnostics.push(FieldDiagnostic {
                        field: field.field.clone(),
                        selector: err.selector,
                        reason: err.reason,
                    }),
                }
                (metadata, diagnostics)
            },
        )
}

/// Script tag plus a known framework name anywhere in the markup.
pub fn looks_client_rendered(markup: &str) -> bool {
    let lower = markup.to_lowercase();
    lower.contains("<script") && FRAMEWORK_TOKENS.iter().any(|token| lower.contains(token))
}
