/// Direction of the image gradient computed by a sobel filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SobelDirection {
    /// Responds to intensity changes along a row (vertical edges).
    Horizontal,
    /// Responds to intensity changes along a column (horizontal edges).
    Vertical,
}

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f64> {
    vec![1.0 / kernel_size as f64; kernel_size]
}

/// Create a gaussian blur kernel.
///
/// Tap `i` has weight `exp(-x^2 / (2 sigma^2))` with `x = i - (kernel_size - 1) / 2`, and the
/// taps are normalized to sum to one.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size as f64 - 1.0) / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the 3 tap sobel kernels for a gradient direction.
///
/// # Returns
///
/// The `(row, col)` taps: the row taps run along each row, the column taps down each column.
pub fn sobel_kernel_1d(direction: SobelDirection) -> (Vec<f64>, Vec<f64>) {
    let derivative = vec![1.0, 0.0, -1.0];
    let smoothing = vec![1.0, 2.0, 1.0];
    match direction {
        SobelDirection::Horizontal => (derivative, smoothing),
        SobelDirection::Vertical => (smoothing, derivative),
    }
}
