//! HTTP request handlers for the web server.

mod api;
mod files;
mod static_files;

// Re-export handlers for use by the router
pub use api::health;
pub use files::{file_json, list_files, upload_file};
pub use static_files::{index, serve_css, serve_js};
