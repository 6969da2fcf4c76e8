pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod query;
pub mod server;
pub mod store;
pub mod tool;
