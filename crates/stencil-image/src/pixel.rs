//! Pixels are `[T; C]` arrays. These helpers apply scalar arithmetic channel by channel.

use crate::image::Component;

/// The additive identity pixel.
#[inline(always)]
pub fn zero<T: Component, const C: usize>() -> [T; C] {
    [T::zero(); C]
}

/// Accumulate `weight * px` into `acc` in place.
///
/// Integer channels wrap on overflow, see [`Component::accumulate`].
#[inline(always)]
pub fn mul_add<T: Component, const C: usize>(acc: &mut [T; C], px: &[T; C], weight: T) {
    for (a, &x) in acc.iter_mut().zip(px.iter()) {
        *a = a.accumulate(weight, x);
    }
}
