use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to parse anchor selector"));

/// The selector engine refused a query string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct QueryError {
    pub selector: String,
    pub reason: String,
}

fn compile(selector: &str) -> Result<Selector, QueryError> {
    Selector::parse(selector).map_err(|err| QueryError {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

/// Parsed page snapshot. Queries borrow from it and never mutate it.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn query(&self, selector: &str) -> Result<Vec<Node<'_>>, QueryError> {
        let selector = compile(selector)?;
        Ok(self
            .html
            .select(&selector)
            .map(|element| Node { element })
            .collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    /// First descendant matching `selector`; the node itself is not a candidate.
    pub fn query_within(&self, selector: &str) -> Result<Option<Node<'a>>, QueryError> {
        let selector = compile(selector)?;
        Ok(self
            .element
            .select(&selector)
            .next()
            .map(|element| Node { element }))
    }

    /// Concatenated text of every descendant text node, untrimmed.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        let name = name.to_ascii_lowercase();
        self.element.value().attr(&name)
    }

    pub fn first_anchor_href(&self) -> Option<&'a str> {
        self.element
            .select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
    }
}
