use std::ops::{Add, Mul};

use num_traits::Zero;

use crate::{error::ImageError, window::Window};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use stencil_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by this size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }

    /// Check whether `(row, col)` addresses a pixel inside this size.
    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Numeric type stored in every channel of a pixel.
///
/// Stencil accumulation happens in the component type itself through
/// [`Component::accumulate`]. Integer components wrap on overflow in every build profile, so
/// an integer result equals the exact weighted sum modulo `2^bits`. Cast integer images to a
/// float type first when the weighted sums can leave the component range.
pub trait Component:
    Copy + Zero + PartialEq + Add<Output = Self> + Mul<Output = Self> + Send + Sync + 'static
{
    /// Returns `self + weight * x`.
    fn accumulate(self, weight: Self, x: Self) -> Self;
}

macro_rules! impl_component_wrapping {
    ($($t:ty),*) => {
        $(
            impl Component for $t {
                #[inline(always)]
                fn accumulate(self, weight: Self, x: Self) -> Self {
                    self.wrapping_add(weight.wrapping_mul(x))
                }
            }
        )*
    };
}

macro_rules! impl_component_float {
    ($($t:ty),*) => {
        $(
            impl Component for $t {
                #[inline(always)]
                fn accumulate(self, weight: Self, x: Self) -> Self {
                    self + weight * x
                }
            }
        )*
    };
}

impl_component_wrapping!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_component_float!(f32, f64);

/// Represents an image with pixel data.
///
/// The pixel data is stored row-major with interleaved channels, i.e. with shape (H, W, C).
/// A pixel is addressed by `(row, col)` and is returned as a `[T; C]` array.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.num_pixels() * C;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// Create a new image with every channel of every pixel set to `val`.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.num_pixels() * C];
        Image::new(size, data)
    }

    /// Create a new image with every pixel set to `pixel`.
    pub fn from_size_pixel(size: ImageSize, pixel: [T; C]) -> Self
    where
        T: Copy,
    {
        let mut data = Vec::with_capacity(size.num_pixels() * C);
        for _ in 0..size.num_pixels() {
            data.extend_from_slice(&pixel);
        }
        Self { size, data }
    }

    /// Create an image from literal rows of pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::RaggedRows`] if the rows do not all have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_image::Image;
    ///
    /// let kernel = Image::<f32, 1>::from_rows(vec![
    ///     vec![[1.0], [0.0], [-1.0]],
    ///     vec![[2.0], [0.0], [-2.0]],
    /// ]).unwrap();
    ///
    /// assert_eq!(kernel.rows(), 2);
    /// assert_eq!(kernel.cols(), 3);
    /// ```
    pub fn from_rows(rows: Vec<Vec<[T; C]>>) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        let width = rows.first().map_or(0, |r| r.len());
        let size = ImageSize {
            width,
            height: rows.len(),
        };
        let mut data = Vec::with_capacity(size.num_pixels() * C);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ImageError::RaggedRows(r, row.len(), width));
            }
            row.iter().for_each(|px| data.extend_from_slice(px));
        }
        Ok(Self { size, data })
    }

    /// Create an image by evaluating `f(row, col)` at every pixel position.
    pub fn from_fn<F>(size: ImageSize, f: F) -> Self
    where
        T: Copy,
        F: Fn(usize, usize) -> [T; C],
    {
        let mut data = Vec::with_capacity(size.num_pixels() * C);
        for r in 0..size.height {
            for c in 0..size.width {
                data.extend_from_slice(&f(r, c));
            }
        }
        Self { size, data }
    }

    /// Create an image from two generators split by an interior window.
    ///
    /// Pixels inside `window` are produced by `interior`, every other pixel by `border`.
    /// The window is validated once against `size` before any generator runs.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidWindow`] if the window does not fit inside `size`.
    pub fn from_fn_windowed<I, B>(
        size: ImageSize,
        window: Window,
        interior: I,
        border: B,
    ) -> Result<Self, ImageError>
    where
        T: Copy + Zero,
        I: Fn(usize, usize) -> [T; C],
        B: Fn(usize, usize) -> [T; C],
    {
        window.validate(size)?;
        let mut image = Self::from_size_val(size, T::zero())?;
        if size.width == 0 {
            return Ok(image);
        }
        image
            .data
            .chunks_exact_mut(size.width * C)
            .enumerate()
            .for_each(|(r, row)| window.fill_row(row, r, &interior, &border));
        Ok(image)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.num_pixels() == 0
    }

    /// Get the raw pixel data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the raw pixel data mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get the pixel at `(row, col)`, or `None` if it is out of bounds.
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[T; C]> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let idx = (row * self.cols() + col) * C;
        self.data[idx..idx + C].try_into().ok()
    }

    /// Get the pixel at `(row, col)` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `row < self.rows()` and `col < self.cols()`.
    #[inline(always)]
    pub unsafe fn get_pixel_unchecked(&self, row: usize, col: usize) -> &[T; C] {
        let idx = (row * self.size.width + col) * C;
        &*(self.data.as_ptr().add(idx) as *const [T; C])
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::CastError`] if any value does not fit the target type.
    pub fn cast<U>(&self) -> Result<Image<U, C>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};
    use crate::window::Window;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert!(image_size.contains(19, 9));
        assert!(!image_size.contains(20, 0));
        assert!(!image_size.contains(0, -1));
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);

        Ok(())
    }

    #[test]
    fn image_wrong_length() {
        let res = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0u8; 5],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(5, 12)));
    }

    #[test]
    fn image_from_rows() -> Result<(), ImageError> {
        let image = Image::<u8, 2>::from_rows(vec![
            vec![[0, 1], [2, 3], [4, 5]],
            vec![[6, 7], [8, 9], [10, 11]],
        ])?;
        assert_eq!(image.rows(), 2);
        assert_eq!(image.cols(), 3);
        assert_eq!(image.pixel(1, 2), Some(&[10, 11]));
        assert_eq!(image.pixel(2, 0), None);

        let ragged = Image::<u8, 1>::from_rows(vec![vec![[0], [1]], vec![[2]]]);
        assert_eq!(ragged, Err(ImageError::RaggedRows(1, 1, 2)));

        Ok(())
    }

    #[test]
    fn image_from_fn() {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let image = Image::<usize, 1>::from_fn(size, |r, c| [r * 10 + c]);
        assert_eq!(image.as_slice(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn image_from_fn_windowed() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let window = Window::new(
            1,
            1,
            ImageSize {
                width: 2,
                height: 1,
            },
        );
        let image = Image::<u8, 1>::from_fn_windowed(size, window, |_, _| [1], |_, _| [9])?;

        #[rustfmt::skip]
        assert_eq!(
            image.as_slice(),
            &[
                9, 9, 9, 9,
                9, 1, 1, 9,
                9, 9, 9, 9,
            ]
        );

        let too_big = Window::new(2, 0, size);
        assert!(Image::<u8, 1>::from_fn_windowed(size, too_big, |_, _| [1], |_, _| [9]).is_err());

        Ok(())
    }

    #[test]
    fn image_empty() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 4,
        };
        let image = Image::<f32, 3>::from_fn_windowed(
            size,
            Window::empty(),
            |_, _| [1.0; 3],
            |_, _| [2.0; 3],
        )?;
        assert!(image.is_empty());
        assert_eq!(image.rows(), 4);
        assert!(image.as_slice().is_empty());
        Ok(())
    }

    #[test]
    fn image_unchecked_access() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            vec![0., 1., 2., 3., 4., 5.],
        )?;
        // SAFETY: (1, 0) is inside a 2x1 image.
        let px = unsafe { image.get_pixel_unchecked(1, 0) };
        assert_eq!(px, &[3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let data = vec![0, 1, 2, 3, 4, 5];
        let image_u8 = Image::<u8, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            data,
        )?;
        assert_eq!(image_u8.pixel(1, 0), Some(&[3u8, 4, 5]));

        let image_i32: Image<i32, 3> = image_u8.cast()?;
        assert_eq!(image_i32.pixel(1, 0), Some(&[3i32, 4, 5]));

        let negative = Image::<i32, 1>::from_rows(vec![vec![[-1]]])?;
        assert!(negative.cast::<u8>().is_err());

        Ok(())
    }

    #[test]
    fn component_accumulate_wraps_integers() {
        use crate::image::Component;

        assert_eq!(200u8.accumulate(2, 100), 144);
        assert_eq!(i8::MAX.accumulate(1, 1), i8::MIN);
        assert_eq!(1.5f32.accumulate(2.0, 0.25), 2.0);
    }
}
