use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Container query used when the first selector entry leaves it blank.
pub const DEFAULT_CONTAINER_SELECTOR: &str = "body";

/// One entry of the ordered selector list. The entry at index 0 names the
/// repeating container; only its `selector` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldSelector {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub field: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl FieldSelector {
    pub fn new(field: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            selector: selector.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Attribute to read, if any. Forms send `""` for "use the text".
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref().filter(|name| !name.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body as received. Everything is optional so that missing pieces
/// are reported as input errors instead of body rejections.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapePayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<FieldSelector>>)]
    pub selectors: Option<Value>,
    #[serde(default, rename = "saveToDb")]
    pub save_to_db: Option<bool>,
}

impl ScrapePayload {
    pub fn into_request(self) -> Result<ScrapeRequest, String> {
        let url = self
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| "URL is required".to_string())?;

        let entries = match self.selectors {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err("Selectors array is required".to_string()),
        };

        let selectors = entries
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<FieldSelector>, _>>()
            .map_err(|e| format!("Invalid selector entry: {}", e))?;

        Ok(ScrapeRequest {
            url,
            selectors,
            save_to_db: self.save_to_db.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
    pub selectors: Vec<FieldSelector>,
    pub save_to_db: bool,
}

impl ScrapeRequest {
    pub fn container_selector(&self) -> &str {
        self.selectors
            .first()
            .map(|first| first.selector.as_str())
            .filter(|selector| !selector.is_empty())
            .unwrap_or(DEFAULT_CONTAINER_SELECTOR)
    }

    pub fn field_selectors(&self) -> &[FieldSelector] {
        self.selectors.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedRecord {
    pub title: String,
    pub description: String,
    pub url: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScrapeResponse {
    pub success: bool,
    /// Records extracted before the result cap was applied.
    pub count: usize,
    pub results: Vec<ExtractedRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ScrapePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_payload_into_request() {
        let request = payload(json!({
            "url": "https://news.ycombinator.com",
            "selectors": [
                { "field": "container", "selector": ".athing", "attribute": "" },
                { "field": "title", "selector": ".titleline > a" },
                { "field": "link", "selector": ".titleline > a", "attribute": "href" }
            ],
            "saveToDb": true
        }))
        .into_request()
        .unwrap();

        assert_eq!(request.url, "https://news.ycombinator.com");
        assert_eq!(request.container_selector(), ".athing");
        assert_eq!(request.field_selectors().len(), 2);
        assert_eq!(request.field_selectors()[1].attribute_name(), Some("href"));
        assert!(request.save_to_db);
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = payload(json!({ "selectors": [{ "selector": "li" }] }))
            .into_request()
            .unwrap_err();
        assert_eq!(err, "URL is required");

        let err = payload(json!({ "url": "", "selectors": [{ "selector": "li" }] }))
            .into_request()
            .unwrap_err();
        assert_eq!(err, "URL is required");
    }

    #[test]
    fn test_missing_or_malformed_selectors_are_rejected() {
        for selectors in [Value::Null, json!([]), json!("li"), json!({ "selector": "li" })] {
            let err = payload(json!({ "url": "https://example.com", "selectors": selectors }))
                .into_request()
                .unwrap_err();
            assert_eq!(err, "Selectors array is required");
        }

        let err = payload(json!({ "url": "https://example.com" }))
            .into_request()
            .unwrap_err();
        assert_eq!(err, "Selectors array is required");
    }

    #[test]
    fn test_non_string_selector_is_rejected() {
        let err = payload(json!({ "url": "https://example.com", "selectors": [{ "selector": 42 }] }))
            .into_request()
            .unwrap_err();
        assert!(err.starts_with("Invalid selector entry"));
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let request = payload(json!({
            "url": "https://example.com",
            "selectors": [{ "field": null, "selector": null }]
        }))
        .into_request()
        .unwrap();

        assert_eq!(request.selectors[0], FieldSelector::default());
        assert_eq!(request.container_selector(), DEFAULT_CONTAINER_SELECTOR);
        assert!(!request.save_to_db);
    }

    #[test]
    fn test_field_selectors_empty_for_container_only() {
        let request = ScrapeRequest {
            url: "https://example.com".to_string(),
            selectors: vec![FieldSelector::new("container", "li")],
            save_to_db: false,
        };
        assert!(request.field_selectors().is_empty());
    }
}
