#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, encoding/decoding failures,
/// and format-specific errors.
pub mod error;

/// High-level image reading and writing functions.
///
/// Reads any format supported by the `image` crate and writes by file extension.
/// See [`functional::read_image_any_rgb8`].
pub mod functional;

/// PNG image encoding and decoding.
pub mod png;

pub use crate::error::IoError;
