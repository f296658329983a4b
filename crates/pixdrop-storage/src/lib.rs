//! Pixdrop Storage Library
//!
//! Storage abstraction and the local filesystem implementation backing the
//! image store.
//!
//! # Key format
//!
//! The store is a single flat directory. A storage key is a bare filename
//! (`<epoch-millis>-<token>.<ext>`); keys must not contain path separators,
//! `..`, NUL bytes or a leading `.`. Key generation and validation live in the
//! `keys` module so the filesystem layer and the HTTP layer agree.

pub mod keys;
pub mod local;
pub mod mime;
pub mod traits;

// Re-export commonly used types
pub use keys::{generate_filename, validate_key};
pub use local::LocalStorage;
pub use mime::content_type_for;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
