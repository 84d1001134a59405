use num_traits::{Float, NumCast};
use stencil_image::{Component, Image, ImageError, ImageSize};

use super::{
    convolution::{convolve_cols, convolve_rows},
    kernel::to_kernel,
    kernels::{self, SobelDirection},
    stencil::apply_stencil,
};
use crate::{border::Border, flip::transpose};

type FilterFn<T, const C: usize> =
    dyn Fn(&Image<T, C>) -> Result<Image<T, C>, ImageError> + Send + Sync;

/// A single argument image transform built from convolution passes.
///
/// Kernels are validated when the filter is built, so applying a filter only fails on
/// errors of the input image itself.
pub struct Filter<T, const C: usize> {
    f: Box<FilterFn<T, C>>,
}

impl<T: Component, const C: usize> Filter<T, C> {
    /// Wrap an image transform as a filter.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Image<T, C>) -> Result<Image<T, C>, ImageError> + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }

    /// Apply the filter to an image.
    pub fn apply(&self, src: &Image<T, C>) -> Result<Image<T, C>, ImageError> {
        (self.f)(src)
    }

    /// A filter that applies `self` and then `next`.
    pub fn then(self, next: Filter<T, C>) -> Filter<T, C> {
        Filter::new(move |src| next.apply(&self.apply(src)?))
    }
}

/// Apply a filter to an image.
pub fn apply_filter<T: Component, const C: usize>(
    filter: &Filter<T, C>,
    src: &Image<T, C>,
) -> Result<Image<T, C>, ImageError> {
    filter.apply(src)
}

fn cast_taps<T: NumCast>(taps: &[f64]) -> Result<Vec<T>, ImageError> {
    taps.iter()
        .map(|&w| T::from(w).ok_or(ImageError::CastError(std::any::type_name::<T>().to_string())))
        .collect()
}

/// A filter that correlates rows with `taps` and then columns with the same taps.
fn separable<T, const C: usize>(
    taps: &[f64],
    border: Border<T, C>,
) -> Result<Filter<T, C>, ImageError>
where
    T: Component + NumCast,
{
    let row = Image::<T, 1>::new(
        ImageSize {
            width: taps.len(),
            height: 1,
        },
        cast_taps(taps)?,
    )?;
    let row_kernel = to_kernel(&row)?;
    let col_kernel = to_kernel(&transpose(&row)?)?;

    Ok(Filter::new(move |src| {
        let tmp = apply_stencil(src, &row_kernel, &border)?;
        apply_stencil(&tmp, &col_kernel, &border)
    }))
}

/// Create a gaussian low-pass filter.
///
/// The filter correlates rows and then columns with a normalized `1 x (2 radius + 1)`
/// gaussian kernel, which equals a single pass with the 2D gaussian at O(radius) work per
/// pixel.
///
/// # Arguments
///
/// * `radius` - Number of taps on each side of the center.
/// * `sigma` - The sigma of the gaussian kernel, must be positive and finite.
/// * `border` - The out-of-bounds policy.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not positive and finite, and
/// [`ImageError::InvalidKernelRadius`] if `2 radius + 1` taps cannot be allocated.
pub fn gaussian_low_pass<T, const C: usize>(
    radius: usize,
    sigma: f64,
    border: Border<T, C>,
) -> Result<Filter<T, C>, ImageError>
where
    T: Component + Float,
{
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(ImageError::InvalidSigma(sigma));
    }
    let kernel_size = radius
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<f64>())
        .ok_or(ImageError::InvalidKernelRadius(radius))?;
    separable(&kernels::gaussian_kernel_1d(kernel_size, sigma), border)
}

/// Create a gaussian blur filter with radius `ceil(2 sigma)` and [`Border::Edge`].
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] if `sigma` is not positive and finite or if
/// `ceil(2 sigma)` does not fit in `usize`.
///
/// # Example
///
/// ```
/// use stencil_image::Image;
/// use stencil_imgproc::filter::gaussian_blur;
///
/// let image = Image::<f32, 3>::from_size_pixel([4, 4].into(), [0.5, 0.25, 1.0]);
/// let blurred = gaussian_blur(1.5).unwrap().apply(&image).unwrap();
///
/// assert_eq!(blurred.size(), image.size());
/// ```
pub fn gaussian_blur<T, const C: usize>(sigma: f64) -> Result<Filter<T, C>, ImageError>
where
    T: Component + Float,
{
    // NaN and negative values do not cast, zero is rejected by the low-pass filter
    let radius: usize =
        num_traits::cast((2.0 * sigma).ceil()).ok_or(ImageError::InvalidSigma(sigma))?;
    gaussian_low_pass(radius, sigma, Border::Edge)
}

/// Create a box blur filter averaging a `kernel_size.1 x kernel_size.0` neighbourhood.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
/// * `border` - The out-of-bounds policy.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelLength`] if either size is zero.
pub fn box_blur<T, const C: usize>(
    kernel_size: (usize, usize),
    border: Border<T, C>,
) -> Result<Filter<T, C>, ImageError>
where
    T: Component + Float,
{
    let (kx, ky) = kernel_size;
    if kx == 0 || ky == 0 {
        return Err(ImageError::InvalidKernelLength(0));
    }
    if kx == ky {
        return separable(&kernels::box_blur_kernel_1d(kx), border);
    }

    let row = cast_taps::<T>(&kernels::box_blur_kernel_1d(kx))?;
    let col = cast_taps::<T>(&kernels::box_blur_kernel_1d(ky))?;
    Ok(Filter::new(move |src| {
        let tmp = convolve_rows(src, &row, &border)?;
        convolve_cols(&tmp, &col, &border)
    }))
}

/// Create a sobel filter for one gradient direction.
///
/// The filter convolves columns and then rows with the direction's 3 tap kernels from
/// [`kernels::sobel_kernel_1d`]. The row taps `[1, 0, -1]` make the horizontal response
/// negative where intensity increases from left to right; likewise the vertical response is
/// negative where intensity increases from top to bottom.
///
/// # Errors
///
/// Returns [`ImageError::CastError`] if the taps cannot be represented in `T`.
pub fn sobel_filter<T, const C: usize>(
    direction: SobelDirection,
    border: Border<T, C>,
) -> Result<Filter<T, C>, ImageError>
where
    T: Component + NumCast,
{
    let (row, col) = kernels::sobel_kernel_1d(direction);
    let row = cast_taps::<T>(&row)?;
    let col = cast_taps::<T>(&col)?;

    Ok(Filter::new(move |src| {
        let tmp = convolve_cols(src, &col, &border)?;
        convolve_rows(&tmp, &row, &border)
    }))
}

/// Compute the sobel gradient magnitude `sqrt(gx^2 + gy^2)` per pixel and channel.
///
/// Both gradients use [`Border::Edge`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
///
/// # Returns
///
/// The gradient magnitude image with shape (H, W, C).
pub fn sobel_operator<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Component + Float,
{
    let gx = sobel_filter(SobelDirection::Horizontal, Border::Edge)?.apply(src)?;
    let gy = sobel_filter(SobelDirection::Vertical, Border::Edge)?.apply(src)?;

    let magnitude = gx
        .as_slice()
        .iter()
        .zip(gy.as_slice().iter())
        .map(|(&gx, &gy)| (gx * gx + gy * gy).sqrt())
        .collect();

    Image::new(src.size(), magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_low_pass_preserves_constant() -> Result<(), ImageError> {
        let image = Image::<f64, 3>::from_size_pixel([6, 5].into(), [0.2, 0.4, 0.8]);
        let filter = gaussian_low_pass(2, 1.0, Border::Reflect)?;
        let blurred = filter.apply(&image)?;
        for (b, i) in blurred.as_slice().iter().zip(image.as_slice()) {
            assert_relative_eq!(*b, *i, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_low_pass_radius_zero_is_identity() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_fn([4, 3].into(), |r, c| [(r * 4 + c) as f32]);
        let blurred = gaussian_low_pass(0, 0.7, Border::Edge)?.apply(&image)?;
        assert_eq!(blurred, image);
        Ok(())
    }

    #[test]
    fn test_gaussian_invalid_sigma() {
        assert!(matches!(
            gaussian_low_pass::<f32, 1>(1, 0.0, Border::Edge),
            Err(ImageError::InvalidSigma(_))
        ));
        assert!(matches!(
            gaussian_blur::<f32, 1>(f64::NAN),
            Err(ImageError::InvalidSigma(_))
        ));
    }

    #[test]
    fn test_gaussian_oversized_kernel() {
        assert!(matches!(
            gaussian_low_pass::<f32, 1>(usize::MAX, 1.0, Border::Edge),
            Err(ImageError::InvalidKernelRadius(usize::MAX))
        ));
        assert!(matches!(
            gaussian_low_pass::<f32, 1>(usize::MAX / 4, 1.0, Border::Edge),
            Err(ImageError::InvalidKernelRadius(_))
        ));
        assert!(matches!(
            gaussian_blur::<f32, 1>(1e30),
            Err(ImageError::InvalidSigma(_))
        ));
        assert!(matches!(
            gaussian_blur::<f32, 1>(f64::MAX),
            Err(ImageError::InvalidSigma(_))
        ));
        assert!(matches!(
            gaussian_blur::<f32, 1>(-1.0),
            Err(ImageError::InvalidSigma(_))
        ));
        assert!(matches!(
            gaussian_blur::<f32, 1>(0.0),
            Err(ImageError::InvalidSigma(_))
        ));
    }

    #[test]
    fn test_gaussian_blur_radius() -> Result<(), ImageError> {
        let image =
            Image::<f64, 1>::from_fn([11, 9].into(), |r, c| [((r * 31 + c * 7) % 13) as f64]);
        // ceil(2 * 0.6) = 2, a radius of 1 would already differ
        let blurred = gaussian_blur(0.6)?.apply(&image)?;
        let expected = gaussian_low_pass(2, 0.6, Border::Edge)?.apply(&image)?;
        let narrower = gaussian_low_pass(1, 0.6, Border::Edge)?.apply(&image)?;
        assert_eq!(blurred, expected);
        assert_ne!(blurred, narrower);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_spreads_impulse() -> Result<(), ImageError> {
        let mut image = Image::<f32, 1>::from_size_val([9, 9].into(), 0.0)?;
        image.as_slice_mut()[4 * 9 + 4] = 1.0;
        let blurred = gaussian_blur(1.0)?.apply(&image)?;

        let total = blurred.as_slice().iter().sum::<f32>();
        assert_relative_eq!(total, 1.0, epsilon = 1e-5);

        let center = blurred.pixel(4, 4).map_or(0.0, |p| p[0]);
        let side = blurred.pixel(4, 5).map_or(0.0, |p| p[0]);
        let diagonal = blurred.pixel(5, 5).map_or(0.0, |p| p[0]);
        assert!(center > side && side > diagonal && diagonal > 0.0);
        assert_relative_eq!(side, blurred.pixel(3, 4).map_or(0.0, |p| p[0]), epsilon = 1e-7);
        Ok(())
    }

    #[test]
    fn test_box_blur() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<f32, 1>::new(
            [5, 5].into(),
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 9.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;
        let blurred = box_blur((3, 3), Border::Fill([0.0]))?.apply(&image)?;
        let xsum = blurred.as_slice().iter().sum::<f32>();
        assert_relative_eq!(xsum, 9.0, epsilon = 1e-5);
        assert_relative_eq!(blurred.as_slice()[6], 1.0, epsilon = 1e-6);
        assert_eq!(blurred.as_slice()[0], 0.0);

        let wide = box_blur((3, 1), Border::Fill([0.0]))?.apply(&image)?;
        assert_relative_eq!(wide.as_slice()[11], 3.0, epsilon = 1e-6);
        assert_eq!(wide.as_slice()[7], 0.0);

        assert!(box_blur::<f32, 1>((0, 3), Border::Edge).is_err());
        Ok(())
    }

    #[test]
    fn test_sobel_vertical_edge() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_rows(vec![vec![[0.0], [127.0], [255.0]]; 3])?;

        let gx = sobel_filter(SobelDirection::Horizontal, Border::Edge)?.apply(&image)?;
        let gy = sobel_filter(SobelDirection::Vertical, Border::Edge)?.apply(&image)?;

        assert_relative_eq!(gx.as_slice()[4], -1020.0);
        assert_relative_eq!(gy.as_slice()[4], 0.0);
        Ok(())
    }

    #[test]
    fn test_sobel_integer_image() -> Result<(), ImageError> {
        let image = Image::<i32, 1>::from_rows(vec![vec![[0], [10], [20]]; 3])?;
        let gx = sobel_filter(SobelDirection::Horizontal, Border::Edge)?.apply(&image)?;
        assert_eq!(gx.as_slice(), &[-40, -80, -40, -40, -80, -40, -40, -80, -40]);
        Ok(())
    }

    #[test]
    fn test_sobel_operator_magnitude() -> Result<(), ImageError> {
        let image = Image::<f64, 2>::from_fn([3, 3].into(), |r, c| [c as f64, r as f64]);
        let magnitude = sobel_operator(&image)?;
        // channel 0 only varies along rows, channel 1 only along columns
        let center = magnitude.pixel(1, 1).copied().unwrap_or([0.0; 2]);
        assert_relative_eq!(center[0], 8.0);
        assert_relative_eq!(center[1], 8.0);
        Ok(())
    }

    #[test]
    fn test_filter_then() -> Result<(), ImageError> {
        let double = Filter::<i32, 1>::new(|src| {
            let data = src.as_slice().iter().map(|v| v * 2).collect();
            Image::new(src.size(), data)
        });
        let add_one = Filter::<i32, 1>::new(|src| {
            let data = src.as_slice().iter().map(|v| v + 1).collect();
            Image::new(src.size(), data)
        });
        let image = Image::<i32, 1>::from_rows(vec![vec![[1], [2]]])?;
        let out = apply_filter(&double.then(add_one), &image)?;
        assert_eq!(out.as_slice(), &[3, 5]);
        Ok(())
    }
}
