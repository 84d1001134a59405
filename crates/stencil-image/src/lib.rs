#![deny(missing_docs)]
//! Image types and pixel arithmetic for stencil computations

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image basic operations module.
pub mod ops;

/// channel-wise pixel arithmetic.
pub mod pixel;

/// interior windows for dual-accessor image construction.
pub mod window;

pub use crate::error::ImageError;
pub use crate::image::{Component, Image, ImageSize};
pub use crate::window::Window;
