//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling
//! images during geometric warping.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses the nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//!
//! Both kernels clamp sampling coordinates to the image borders; out-of-range
//! handling is the responsibility of the caller (see `crate::warp`).

mod bilinear;

/// Grid generation and coordinate mapping utilities.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;

pub use interpolate::interpolate_pixel;
pub use interpolate::InterpolationMode;
