pub mod config;
pub mod export;
pub mod fetch;
pub mod process;
pub mod schema;
pub mod scrape;
pub mod store;
