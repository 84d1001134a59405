use rayon::prelude::*;

use stencil_image::{Component, Image, ImageError, ImageSize, Window};

/// Images with at least this many pixels are processed in parallel under
/// [`ExecutionStrategy::Auto`].
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Controls how per-pixel work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Process output rows in parallel on the global Rayon thread pool.
    Parallel,

    /// Parallel for images with at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serial otherwise.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels should be processed in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }
}

/// Build an image from an interior generator and a border generator, scheduling rows
/// according to `strategy`.
///
/// Serial and parallel scheduling produce identical images: every pixel is computed by
/// exactly one call to one of the generators.
///
/// # Errors
///
/// Returns [`ImageError::InvalidWindow`] if `window` does not fit inside `size`.
pub fn from_fn_windowed<T, const C: usize, I, B>(
    size: ImageSize,
    window: Window,
    interior: I,
    border: B,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
    I: Fn(usize, usize) -> [T; C] + Send + Sync,
    B: Fn(usize, usize) -> [T; C] + Send + Sync,
{
    if !strategy.is_parallel(size.num_pixels()) || size.width == 0 {
        return Image::from_fn_windowed(size, window, interior, border);
    }

    window.validate(size)?;
    let mut dst = Image::from_size_val(size, T::zero())?;
    dst.as_slice_mut()
        .par_chunks_exact_mut(size.width * C)
        .enumerate()
        .for_each(|(r, row)| window.fill_row(row, r, &interior, &border));

    Ok(dst)
}
