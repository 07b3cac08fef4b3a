//! Service layer for docingest business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by CLI, web server, or other interfaces.

pub mod processor;

pub use processor::{FileDetail, FileProcessor, PipelineError};
