/// Radius of a truncated gaussian kernel.
///
/// The kernel covers `truncate` standard deviations on each side, rounded to
/// the nearest integer.
pub fn gaussian_radius(sigma: f64, truncate: f64) -> usize {
    (truncate * sigma + 0.5) as usize
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
/// * `radius` - Half width of the kernel; the kernel has `2 * radius + 1` taps.
///
/// # Returns
///
/// A normalized kernel, symmetric around its central tap.
pub fn gaussian_kernel_1d(sigma: f64, radius: usize) -> Vec<f64> {
    let sigma_sq = sigma * sigma;
    let r = radius as isize;

    // compute the kernel
    let mut kernel = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-0.5 / sigma_sq * (x * x)).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_radius() {
        assert_eq!(gaussian_radius(0.5, 4.0), 2);
        assert_eq!(gaussian_radius(1.0, 4.0), 4);
        assert_eq!(gaussian_radius(1.1, 4.0), 4);
        assert_eq!(gaussian_radius(1.2, 4.0), 5);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(1.0, 4);
        assert_eq!(kernel.len(), 9);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(kernel[4], 0.398_942_3, epsilon = 1e-4);
        for i in 0..4 {
            assert_relative_eq!(kernel[i], kernel[8 - i]);
        }
    }
}
