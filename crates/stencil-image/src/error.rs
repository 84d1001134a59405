/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the literal rows of an image have different lengths.
    #[error("Row {0} has {1} columns, expected {2}")]
    RaggedRows(usize, usize, usize),

    /// Error when an interior window does not fit inside the image.
    #[error("Window at ({0}, {1}) with size {2}x{3} exceeds image size {4}x{5}")]
    InvalidWindow(usize, usize, usize, usize, usize, usize),

    /// Error when a kernel image has zero rows or zero columns.
    #[error("Invalid kernel shape: {0} rows x {1} cols")]
    InvalidKernelShape(usize, usize),

    /// Error when a list of kernel taps is empty.
    #[error("Invalid kernel length: {0}")]
    InvalidKernelLength(usize),

    /// Error when a kernel radius gives a kernel length that does not fit in `usize`.
    #[error("Kernel radius {0} is too large")]
    InvalidKernelRadius(usize),

    /// Error when a gaussian sigma is not a positive finite number.
    #[error("Invalid sigma: {0}")]
    InvalidSigma(f64),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
