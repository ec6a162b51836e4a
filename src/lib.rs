pub mod acquirer;
pub mod app_state;
pub mod assembler;
pub mod config;
pub mod error;
pub mod extractor;
pub mod health;
pub mod normalizer;
pub mod pipeline;
pub mod routes;
pub mod scrape;
pub mod selector;
pub mod sink;
