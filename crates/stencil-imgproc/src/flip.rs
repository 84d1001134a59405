use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};
use stencil_image::{Image, ImageError, ImageSize};

/// Flip the input image horizontally, reversing the pixel order within each row.
///
/// The channels of a pixel keep their order.
///
/// # Example
///
/// ```
/// use stencil_image::Image;
/// use stencil_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 2>::from_rows(vec![vec![[1, 2], [3, 4], [5, 6]]]).unwrap();
/// let flipped = horizontal_flip(&image).unwrap();
///
/// assert_eq!(flipped.as_slice(), &[5, 6, 3, 4, 1, 2]);
/// ```
pub fn horizontal_flip<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    if src.is_empty() {
        return Ok(dst);
    }

    // reversing the row reverses the channels too, so restore them per pixel
    dst.as_slice_mut()
        .par_chunks_exact_mut(src.cols() * C)
        .for_each(|row| {
            row.reverse();
            row.chunks_exact_mut(C).for_each(<[T]>::reverse);
        });

    Ok(dst)
}

/// Flip the input image vertically, reversing the order of its rows.
pub fn vertical_flip<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy,
{
    if src.is_empty() {
        return Ok(src.clone());
    }

    let mut data = Vec::with_capacity(src.as_slice().len());
    for row in src.as_slice().chunks_exact(src.cols() * C).rev() {
        data.extend_from_slice(row);
    }

    Image::new(src.size(), data)
}

/// Rotate the input image by 180 degrees, reversing both axes.
///
/// # Example
///
/// ```
/// use stencil_image::Image;
/// use stencil_imgproc::flip::rotate180;
///
/// let kernel = Image::<i32, 1>::from_rows(vec![vec![[1], [2]], vec![[3], [4]]]).unwrap();
/// let rotated = rotate180(&kernel).unwrap();
///
/// assert_eq!(rotated.as_slice(), &[4, 3, 2, 1]);
/// ```
pub fn rotate180<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    horizontal_flip(&vertical_flip(src)?)
}

/// Transpose the input image, swapping rows and columns.
///
/// # Returns
///
/// An image with shape (W, H, C).
pub fn transpose<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy,
{
    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();
    let mut data = Vec::with_capacity(src_data.len());

    for c in 0..cols {
        for r in 0..rows {
            let idx = (r * cols + c) * C;
            data.extend_from_slice(&src_data[idx..idx + C]);
        }
    }

    Image::new(
        ImageSize {
            width: rows,
            height: cols,
        },
        data,
    )
}
