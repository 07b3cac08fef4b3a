//! docingest - document ingestion service.
//!
//! Uploaded files are fingerprinted, converted to text, scanned for
//! entities and sections, and stored once per distinct content in SQLite.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
pub mod utils;
