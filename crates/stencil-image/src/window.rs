use crate::{error::ImageError, image::ImageSize};

/// A rectangular region of an image, given by its top-left corner and size.
///
/// Used as the interior of a dual-accessor construction: pixels inside the window are
/// produced by a fast generator, every other pixel by a checked one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// First row covered by the window.
    pub top: usize,
    /// First column covered by the window.
    pub left: usize,
    /// Extent of the window.
    pub size: ImageSize,
}

impl Window {
    /// Create a new window.
    pub fn new(top: usize, left: usize, size: ImageSize) -> Self {
        Self { top, left, size }
    }

    /// A window that covers no pixel.
    pub fn empty() -> Self {
        Self::new(
            0,
            0,
            ImageSize {
                width: 0,
                height: 0,
            },
        )
    }

    /// The window left after removing `half_rows` rows and `half_cols` columns from each side
    /// of an image of size `size`.
    ///
    /// Collapses to an empty window when the margins meet or cross.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_image::{ImageSize, Window};
    ///
    /// let size = ImageSize { width: 5, height: 4 };
    /// let window = Window::inset(size, 1, 2);
    /// assert_eq!((window.top, window.left), (1, 2));
    /// assert_eq!(window.size, ImageSize { width: 1, height: 2 });
    /// ```
    pub fn inset(size: ImageSize, half_rows: usize, half_cols: usize) -> Self {
        let height = size.height.saturating_sub(2 * half_rows);
        let width = size.width.saturating_sub(2 * half_cols);
        if height == 0 || width == 0 {
            return Self::empty();
        }
        Self::new(half_rows, half_cols, ImageSize { width, height })
    }

    /// Whether the window covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.size.num_pixels() == 0
    }

    /// Check that the window fits inside an image of size `size`.
    pub fn validate(&self, size: ImageSize) -> Result<(), ImageError> {
        if self.is_empty() {
            return Ok(());
        }
        if self.top + self.size.height > size.height || self.left + self.size.width > size.width
        {
            return Err(ImageError::InvalidWindow(
                self.top,
                self.left,
                self.size.width,
                self.size.height,
                size.width,
                size.height,
            ));
        }
        Ok(())
    }

    #[inline]
    fn covers_row(&self, row: usize) -> bool {
        !self.is_empty() && row >= self.top && row < self.top + self.size.height
    }

    /// Fill one output row of interleaved pixels.
    ///
    /// Columns inside the window on a covered row come from `interior`, the rest from `border`.
    /// The row length must be a multiple of `C`.
    pub fn fill_row<T, const C: usize, I, B>(
        &self,
        dst_row: &mut [T],
        row: usize,
        interior: &I,
        border: &B,
    ) where
        T: Copy,
        I: Fn(usize, usize) -> [T; C],
        B: Fn(usize, usize) -> [T; C],
    {
        let cols = dst_row.len() / C;
        let (start, end) = if self.covers_row(row) {
            (self.left.min(cols), (self.left + self.size.width).min(cols))
        } else {
            (cols, cols)
        };

        let mut pixels = dst_row.chunks_exact_mut(C).enumerate();
        for (col, px) in pixels.by_ref().take(start) {
            px.copy_from_slice(&border(row, col));
        }
        for (col, px) in pixels.by_ref().take(end - start) {
            px.copy_from_slice(&interior(row, col));
        }
        for (col, px) in pixels {
            px.copy_from_slice(&border(row, col));
        }
    }
}
