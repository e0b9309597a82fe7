#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use picto_image as image;

#[doc(inline)]
pub use picto_imgproc as imgproc;

#[doc(inline)]
pub use picto_io as io;
