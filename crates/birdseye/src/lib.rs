#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use birdseye_image as image;

#[doc(inline)]
pub use birdseye_imgproc as imgproc;
