//! 2D image convolution and correlation with pluggable border handling.

#[doc(inline)]
pub use stencil_image as image;

#[doc(inline)]
pub use stencil_imgproc as imgproc;
