//! Pixconv Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the conversion pipeline, the upload endpoint and the command-line client.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AttachedFile, FileCollection, MimeType, Quality, TargetFormat, UploadOutcome,
    ValidationPolicy,
};
