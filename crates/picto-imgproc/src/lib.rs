#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// blending and tiling of several images.
pub mod blend;

/// color transformations module.
pub mod color;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// image flipping module.
pub mod flip;

/// module containing parallization utilities.
pub mod parallel;

/// k-means colour quantization.
pub mod quantize;

/// image geometric transformations module.
pub mod warp;
