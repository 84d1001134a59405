use stencil_image::{pixel, Component, Image, ImageError, Window};

use super::kernel::{Kernel, Taps1d, Taps2d};
use crate::{
    border::Border,
    parallel::{self, ExecutionStrategy},
};

/// Weighted sum of the taps around one output pixel.
///
/// Implemented once per kernel shape so the accumulation loop is monomorphized and holds no
/// dispatch on the shape or on the pixel accessor.
trait Stencil<T>: Sync {
    fn apply<const C: usize, G>(&self, row: usize, col: usize, get: G) -> [T; C]
    where
        G: Fn(isize, isize) -> [T; C];
}

struct RowStencil<'a, T>(&'a Taps1d<T>);
struct ColStencil<'a, T>(&'a Taps1d<T>);
struct FullStencil<'a, T>(&'a Taps2d<T>);

impl<T: Component> Stencil<T> for RowStencil<'_, T> {
    #[inline(always)]
    fn apply<const C: usize, G>(&self, row: usize, col: usize, get: G) -> [T; C]
    where
        G: Fn(isize, isize) -> [T; C],
    {
        let (r, c) = (row as isize, col as isize);
        let mut acc = pixel::zero();
        for &(dc, w) in self.0.taps() {
            pixel::mul_add(&mut acc, &get(r, c + dc), w);
        }
        acc
    }
}

impl<T: Component> Stencil<T> for ColStencil<'_, T> {
    #[inline(always)]
    fn apply<const C: usize, G>(&self, row: usize, col: usize, get: G) -> [T; C]
    where
        G: Fn(isize, isize) -> [T; C],
    {
        let (r, c) = (row as isize, col as isize);
        let mut acc = pixel::zero();
        for &(dr, w) in self.0.taps() {
            pixel::mul_add(&mut acc, &get(r + dr, c), w);
        }
        acc
    }
}

impl<T: Component> Stencil<T> for FullStencil<'_, T> {
    #[inline(always)]
    fn apply<const C: usize, G>(&self, row: usize, col: usize, get: G) -> [T; C]
    where
        G: Fn(isize, isize) -> [T; C],
    {
        let (r, c) = (row as isize, col as isize);
        let mut acc = pixel::zero();
        for &(dr, dc, w) in self.0.taps() {
            pixel::mul_add(&mut acc, &get(r + dr, c + dc), w);
        }
        acc
    }
}

fn run_stencil<T, const C: usize, S>(
    src: &Image<T, C>,
    stencil: &S,
    half: (usize, usize),
    border: &Border<T, C>,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
    S: Stencil<T>,
{
    let size = src.size();
    let window = Window::inset(size, half.0, half.1);

    log::trace!(
        "stencil over {} with half extents {:?}, interior {:?}",
        size,
        half,
        window
    );

    let interior = |row: usize, col: usize| {
        stencil.apply(row, col, |i, j| {
            // SAFETY: the window is inset by the kernel half extents, so every tap of an
            // interior pixel lands inside the image.
            unsafe { *src.get_pixel_unchecked(i as usize, j as usize) }
        })
    };

    // SAFETY: `Border::resolve` only calls the accessor with in-bounds coordinates.
    let at = |i: usize, j: usize| unsafe { *src.get_pixel_unchecked(i, j) };
    let checked = |row: usize, col: usize| {
        stencil.apply(row, col, |i, j| border.resolve(size, at, i, j))
    };

    parallel::from_fn_windowed(size, window, interior, checked, strategy)
}

/// Apply a sparse kernel at every pixel of `src`, reading out-of-bounds taps through `border`.
///
/// Each output pixel is `sum(weight * src[row + dr, col + dc])` over the kernel taps in kernel
/// order, starting from the zero pixel. Pixels whose taps all land inside the image use
/// unchecked reads; the remaining border strip goes through [`Border::resolve`].
///
/// The sum is accumulated in `T` with [`Component::accumulate`]. Integer images wrap on
/// overflow in every build profile, giving the exact sum modulo `2^bits`; cast them to a float
/// type first when the sums can leave the range of `T`.
///
/// Uses [`ExecutionStrategy::Auto`]. See [`apply_stencil_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The sparse kernel.
/// * `border` - The out-of-bounds policy.
///
/// # Returns
///
/// A new image with the same size as `src`.
pub fn apply_stencil<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel<T>,
    border: &Border<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    apply_stencil_with_strategy(src, kernel, border, ExecutionStrategy::Auto)
}

/// Apply a sparse kernel at every pixel of `src` with execution strategy control.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The sparse kernel.
/// * `border` - The out-of-bounds policy.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
pub fn apply_stencil_with_strategy<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel<T>,
    border: &Border<T, C>,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, ImageError>
where
    T: Component,
{
    if src.is_empty() {
        return Image::new(src.size(), Vec::new());
    }

    log::debug!(
        "applying {} kernel taps to {} ({:?})",
        kernel.len(),
        src.size(),
        strategy
    );

    let half = kernel.half_extents();
    match kernel {
        Kernel::Horizontal(taps) => run_stencil(src, &RowStencil(taps), half, border, strategy),
        Kernel::Vertical(taps) => run_stencil(src, &ColStencil(taps), half, border, strategy),
        Kernel::Full(taps) => run_stencil(src, &FullStencil(taps), half, border, strategy),
    }
}
