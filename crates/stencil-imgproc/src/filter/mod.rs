//! Filter operations
//!
//! This module provides stencil based convolution, correlation and filters built from them.

/// Filter kernels
pub mod kernels;

/// Sparse kernel representation
mod kernel;
pub use kernel::*;

/// Windowed stencil application
mod stencil;
pub use stencil::*;

/// Convolution and correlation entry points
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;

pub use kernels::SobelDirection;
