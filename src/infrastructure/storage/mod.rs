//! # Image Storage
//!
//! Local filesystem storage for uploaded product images. Files are written
//! under the configured upload directory with generated names; the public
//! `image/<file>` path handed to clients is served straight off this
//! directory.

mod images;

pub use images::{ImageStore, StorageError, StorageResult, StoredImage};
