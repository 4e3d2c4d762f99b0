//! Pixconv Storage Library
//!
//! Storage abstraction for files received by the upload endpoint, with a local
//! filesystem implementation.
//!
//! Keys are plain file names relative to the storage root. They must not
//! contain `..`, a path separator or a leading `/`.

#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
