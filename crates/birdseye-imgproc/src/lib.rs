#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// utilities to draw on images.
pub mod draw;

/// homography estimation and point projection module.
pub mod homography;

/// utilities for interpolation.
pub mod interpolation;

/// inverse perspective mapping engine module.
pub mod ipm;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
