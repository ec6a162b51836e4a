pub mod dtos;
pub mod handlers;

pub use dtos::{
    ErrorResponse, ExtractedRecord, FieldSelector, ScrapePayload, ScrapeRequest, ScrapeResponse,
};
