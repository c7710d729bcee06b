pub mod catalog;
pub mod config;
pub mod errors;
pub mod ingestor;
pub mod logo_assets;
pub mod models;
pub mod proxy;
pub mod sources;
pub mod utils;
pub mod web;
