use stencil_image::{Component, Image, ImageError};

/// Non-zero taps of a one dimensional kernel, as `(offset, weight)` pairs.
///
/// Offsets are relative to the kernel center `half = len / 2`, so an even length kernel
/// covers `[-half, half - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Taps1d<T> {
    half: usize,
    taps: Vec<(isize, T)>,
}

impl<T: Component> Taps1d<T> {
    fn from_weights(weights: &[T]) -> Self {
        let half = weights.len() / 2;
        let taps = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_zero())
            .map(|(i, &w)| (i as isize - half as isize, w))
            .collect();
        Self { half, taps }
    }

    /// Distance from the kernel center to its first element.
    pub fn half(&self) -> usize {
        self.half
    }

    /// The non-zero taps in kernel order.
    pub fn taps(&self) -> &[(isize, T)] {
        &self.taps
    }
}

/// Non-zero taps of a two dimensional kernel, as `(row_offset, col_offset, weight)` triples
/// in row-major kernel order.
#[derive(Debug, Clone, PartialEq)]
pub struct Taps2d<T> {
    half: (usize, usize),
    taps: Vec<(isize, isize, T)>,
}

impl<T> Taps2d<T> {
    /// Distances `(rows, cols)` from the kernel center to its top-left element.
    pub fn half(&self) -> (usize, usize) {
        self.half
    }

    /// The non-zero taps in kernel order.
    pub fn taps(&self) -> &[(isize, isize, T)] {
        &self.taps
    }
}

/// A sparse stencil kernel.
///
/// The shape is picked once from the kernel image dimensions so the per-pixel loop never
/// branches on it. Zero weights are dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel<T> {
    /// A `1 x N` kernel, including the degenerate `1 x 1` case.
    Horizontal(Taps1d<T>),
    /// An `M x 1` kernel.
    Vertical(Taps1d<T>),
    /// An `M x N` kernel with `M, N > 1`.
    Full(Taps2d<T>),
}

impl<T: Component> Kernel<T> {
    /// Build a sparse kernel from a single channel kernel image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidKernelShape`] if the kernel image has no rows or no columns.
    ///
    /// # Example
    ///
    /// ```
    /// use stencil_image::Image;
    /// use stencil_imgproc::filter::Kernel;
    ///
    /// let image = Image::<f32, 1>::from_rows(vec![vec![[1.0], [0.0], [-1.0]]]).unwrap();
    /// let kernel = Kernel::from_image(&image).unwrap();
    ///
    /// assert_eq!(kernel.half_extents(), (0, 1));
    /// assert_eq!(kernel.len(), 2);
    /// ```
    pub fn from_image(kernel: &Image<T, 1>) -> Result<Self, ImageError> {
        let (rows, cols) = (kernel.rows(), kernel.cols());
        if rows == 0 || cols == 0 {
            return Err(ImageError::InvalidKernelShape(rows, cols));
        }

        let weights = kernel.as_slice();
        if rows == 1 {
            return Ok(Kernel::Horizontal(Taps1d::from_weights(weights)));
        }
        if cols == 1 {
            return Ok(Kernel::Vertical(Taps1d::from_weights(weights)));
        }

        let half = (rows / 2, cols / 2);
        let taps = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_zero())
            .map(|(idx, &w)| {
                let (i, j) = (idx / cols, idx % cols);
                (i as isize - half.0 as isize, j as isize - half.1 as isize, w)
            })
            .collect();

        Ok(Kernel::Full(Taps2d { half, taps }))
    }

    /// Half extents `(rows, cols)` of the kernel; zero along an axis a 1D kernel does not span.
    pub fn half_extents(&self) -> (usize, usize) {
        match self {
            Kernel::Horizontal(t) => (0, t.half()),
            Kernel::Vertical(t) => (t.half(), 0),
            Kernel::Full(t) => t.half(),
        }
    }

    /// Number of non-zero taps.
    pub fn len(&self) -> usize {
        match self {
            Kernel::Horizontal(t) | Kernel::Vertical(t) => t.taps().len(),
            Kernel::Full(t) => t.taps().len(),
        }
    }

    /// Whether every weight of the kernel was zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a sparse kernel from a single channel kernel image.
///
/// See [`Kernel::from_image`].
pub fn to_kernel<T: Component>(kernel: &Image<T, 1>) -> Result<Kernel<T>, ImageError> {
    Kernel::from_image(kernel)
}
