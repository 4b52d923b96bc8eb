pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod importer;
pub mod model;
pub mod neo;
pub mod pipeline;
pub mod scrape;
pub mod server;
pub mod source;
pub mod summary;
