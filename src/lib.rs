//! UniFi API documentation scraper and Rust type generator, plus typed clients for the
//! Site Manager cloud API and the local Network integration API.

pub mod client;
pub mod clientgen;
pub mod codegen;
pub mod discovery;
pub mod dom;
pub mod network;
pub mod output;
pub mod parser;
pub mod schema;
pub mod scraper;
pub mod sitemanager;
