//! Geometric image transformations using perspective warps.
//!
//! The resampler maps every destination pixel back into the source image
//! through the inverse of the supplied homography and fills it with an
//! interpolated source sample.

mod perspective;

pub use perspective::warp_perspective;
