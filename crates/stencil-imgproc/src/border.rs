use stencil_image::ImageSize;

/// Policy for the value of a pixel read outside the image bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Border<T, const C: usize> {
    /// Substitute a constant pixel for every out-of-bounds read.
    ///
    /// Example: ...k k k k | a b c d | k k k k...
    Fill([T; C]),

    /// Clamp to the nearest edge pixel.
    ///
    /// Example: ...a a a a | a b c d | d d d d...
    Edge,

    /// Mirror across the boundary without repeating the edge pixel.
    ///
    /// Example: ...d c b | a b c d | c b a...
    Reflect,

    /// Mirror across the boundary, repeating the edge pixel.
    ///
    /// Example: ...c b a | a b c d | d c b...
    Symmetric,

    /// Wrap around from the opposite side of the image.
    ///
    /// Example: ...b c d | a b c d | a b c...
    Wrap,
}

impl<T, const C: usize> Border<T, C> {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let period = 2 * (len as isize - 1);
        let k = i.rem_euclid(period);
        if k >= len as isize {
            (period - k) as usize
        } else {
            k as usize
        }
    }

    #[inline]
    fn symmetric(i: isize, len: usize) -> usize {
        let period = 2 * len as isize;
        let k = i.rem_euclid(period);
        if k >= len as isize {
            (period - 1 - k) as usize
        } else {
            k as usize
        }
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    #[inline]
    fn edge(i: isize, len: usize) -> usize {
        i.clamp(0, len as isize - 1) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the border policy.
    ///
    /// Any offset resolves, so kernels larger than the image bounce as many times as needed.
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension, must be non-zero.
    ///
    /// # Returns
    /// The mapped index, or `None` for [`Border::Fill`] when `i` is out of range.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            Border::Fill(_) => None,
            Border::Edge => Some(Self::edge(i, len)),
            Border::Reflect => Some(Self::reflect(i, len)),
            Border::Symmetric => Some(Self::symmetric(i, len)),
            Border::Wrap => Some(Self::wrap(i, len)),
        }
    }

    /// Resolve the pixel at `(row, col)` for an image of size `size`.
    ///
    /// In-bounds coordinates go straight to `get`. Out-of-bounds coordinates are mapped by the
    /// policy first, except for [`Border::Fill`] which returns its constant without calling `get`.
    ///
    /// `get` is only ever called with in-bounds coordinates. The image must not be empty
    /// unless the policy is [`Border::Fill`].
    #[inline]
    pub fn resolve<G>(&self, size: ImageSize, get: G, row: isize, col: isize) -> [T; C]
    where
        T: Copy,
        G: Fn(usize, usize) -> [T; C],
    {
        if size.contains(row, col) {
            return get(row as usize, col as usize);
        }
        // each mapping is the identity on [0, len), so an in-range axis stays put
        let map: fn(isize, usize) -> usize = match self {
            Border::Fill(px) => return *px,
            Border::Edge => Self::edge,
            Border::Reflect => Self::reflect,
            Border::Symmetric => Self::symmetric,
            Border::Wrap => Self::wrap,
        };
        get(map(row, size.height), map(col, size.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_image::{Image, ImageError};

    type B = Border<u8, 1>;

    #[test]
    fn test_map_index_edge() {
        assert_eq!(B::Edge.map_index(-3, 4), Some(0));
        assert_eq!(B::Edge.map_index(2, 4), Some(2));
        assert_eq!(B::Edge.map_index(7, 4), Some(3));
    }

    #[test]
    fn test_map_index_reflect() {
        // ... 2 1 | 0 1 2 3 | 2 1 0 1 ...
        assert_eq!(B::Reflect.map_index(-1, 4), Some(1));
        assert_eq!(B::Reflect.map_index(-2, 4), Some(2));
        assert_eq!(B::Reflect.map_index(4, 4), Some(2));
        assert_eq!(B::Reflect.map_index(6, 4), Some(0));
        assert_eq!(B::Reflect.map_index(7, 4), Some(1));
        assert_eq!(B::Reflect.map_index(-5, 1), Some(0));
    }

    #[test]
    fn test_map_index_reflect_multiple_bounces() {
        // radius far larger than the image
        for i in -50..50 {
            let mapped = B::Reflect.map_index(i, 2);
            assert_eq!(mapped, Some(i.rem_euclid(2) as usize));
        }
    }

    #[test]
    fn test_map_index_symmetric() {
        // ... 1 0 | 0 1 2 | 2 1 0 0 ...
        assert_eq!(B::Symmetric.map_index(-1, 3), Some(0));
        assert_eq!(B::Symmetric.map_index(-2, 3), Some(1));
        assert_eq!(B::Symmetric.map_index(3, 3), Some(2));
        assert_eq!(B::Symmetric.map_index(5, 3), Some(0));
        assert_eq!(B::Symmetric.map_index(6, 3), Some(0));
    }

    #[test]
    fn test_map_index_wrap() {
        assert_eq!(B::Wrap.map_index(-1, 4), Some(3));
        assert_eq!(B::Wrap.map_index(-9, 4), Some(3));
        assert_eq!(B::Wrap.map_index(4, 4), Some(0));
        assert_eq!(B::Wrap.map_index(11, 4), Some(3));
    }

    #[test]
    fn test_map_index_fill() {
        assert_eq!(B::Fill([0]).map_index(-1, 4), None);
        assert_eq!(B::Fill([0]).map_index(1, 4), Some(1));
    }

    #[test]
    fn test_resolve() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_rows(vec![vec![[1], [2]], vec![[3], [4]]])?;
        let get = |r: usize, c: usize| image.pixel(r, c).copied().unwrap_or([255]);
        let size = image.size();

        assert_eq!(B::Edge.resolve(size, get, 1, 1), [4]);
        assert_eq!(B::Edge.resolve(size, get, -1, -1), [1]);
        assert_eq!(B::Edge.resolve(size, get, 5, -1), [3]);
        assert_eq!(B::Wrap.resolve(size, get, -1, 2), [3]);
        assert_eq!(B::Reflect.resolve(size, get, -1, 0), [3]);
        assert_eq!(B::Symmetric.resolve(size, get, -1, 0), [1]);
        assert_eq!(B::Fill([9]).resolve(size, get, 0, 2), [9]);
        assert_eq!(B::Fill([9]).resolve(size, get, 0, 1), [2]);

        // only one axis out of range
        assert_eq!(B::Reflect.resolve(size, get, 1, -1), [4]);
        assert_eq!(B::Symmetric.resolve(size, get, 2, 0), [3]);
        assert_eq!(B::Wrap.resolve(size, get, 0, -2), [1]);

        Ok(())
    }

    #[test]
    fn test_resolve_fill_skips_accessor() {
        let size = ImageSize {
            width: 0,
            height: 0,
        };
        let px = B::Fill([7]).resolve(size, |_, _| unreachable!(), 3, 3);
        assert_eq!(px, [7]);
    }
}
