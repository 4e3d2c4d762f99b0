//! Domain models shared across pixconv crates.

pub mod file;
pub mod format;
pub mod policy;
pub mod upload;

pub use file::{AttachedFile, FileCollection};
pub use format::{MimeType, Quality, TargetFormat};
pub use policy::ValidationPolicy;
pub use upload::UploadOutcome;
