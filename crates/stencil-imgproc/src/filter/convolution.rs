use stencil_image::{Component, Image, ImageError, ImageSize};

use super::{kernel::to_kernel, stencil::apply_stencil};
use crate::{border::Border, flip::rotate180};

/// Correlate an image with a kernel image.
///
/// The kernel is used as-is: output pixel `(r, c)` is the sum of
/// `kernel[i, j] * src[r + i - M / 2, c + j - N / 2]` over the non-zero kernel weights.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - A single channel kernel image with shape (M, N).
/// * `border` - The out-of-bounds policy.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelShape`] if the kernel has no rows or no columns.
pub fn correlate<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Image<T, 1>,
    border: &Border<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    let kernel = to_kernel(kernel)?;
    apply_stencil(src, &kernel, border)
}

/// Convolve an image with a kernel image.
///
/// Convolution is correlation with the kernel rotated by 180 degrees. The rotation happens
/// before the kernel center is computed, so even sized kernels keep the same center
/// convention as [`correlate`].
///
/// # Example
///
/// ```
/// use stencil_image::Image;
/// use stencil_imgproc::{border::Border, filter::convolve};
///
/// let src = Image::<f32, 1>::from_rows(vec![vec![[0.0], [1.0], [0.0]]]).unwrap();
/// let kernel = Image::<f32, 1>::from_rows(vec![vec![[1.0], [2.0], [3.0]]]).unwrap();
///
/// let dst = convolve(&src, &kernel, &Border::Fill([0.0])).unwrap();
/// assert_eq!(dst.as_slice(), &[1.0, 2.0, 3.0]);
/// ```
pub fn convolve<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Image<T, 1>,
    border: &Border<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    let rotated = rotate180(kernel)?;
    correlate(src, &rotated, border)
}

fn taps_image<T: Component>(taps: &[T], size: ImageSize) -> Result<Image<T, 1>, ImageError> {
    if taps.is_empty() {
        return Err(ImageError::InvalidKernelLength(0));
    }
    Image::new(size, taps.iter().rev().copied().collect())
}

/// Convolve every row of an image with a list of taps.
///
/// The taps are reversed into a `1 x K` kernel and passed to [`convolve`], whose flip undoes
/// the reversal: the taps are applied left to right as listed.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelLength`] if `taps` is empty.
pub fn convolve_rows<T, const C: usize>(
    src: &Image<T, C>,
    taps: &[T],
    border: &Border<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    let size = ImageSize {
        width: taps.len(),
        height: 1,
    };
    convolve(src, &taps_image(taps, size)?, border)
}

/// Convolve every column of an image with a list of taps.
///
/// Same as [`convolve_rows`] with a `K x 1` kernel; the taps are applied top to bottom.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelLength`] if `taps` is empty.
pub fn convolve_cols<T, const C: usize>(
    src: &Image<T, C>,
    taps: &[T],
    border: &Border<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    let size = ImageSize {
        width: 1,
        height: taps.len(),
    };
    convolve(src, &taps_image(taps, size)?, border)
}
