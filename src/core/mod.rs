pub mod config;
pub mod connections;
pub mod errors;
pub mod models;
pub mod types;
pub mod values;
