#![deny(missing_docs)]
//! Image types and traits for generating and manipulating images

/// image representation for image manipulation purposes.
pub mod image;

/// packed 24-bit colour values.
pub mod color;

/// coordinate-addressable colour grids.
pub mod raster;

/// Error types for the image module.
pub mod error;

pub use crate::color::Rgb;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::raster::Raster;
