use inkdigit_image::{Image, ImageError};
use rayon::prelude::*;

use super::kernels;

/// Number of standard deviations covered by a gaussian kernel.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

// sigmas below this are treated as no blur at all
const MIN_SIGMA: f64 = 1e-15;

/// Map a possibly out of range index into `[0, len)` by mirroring about the
/// edge samples (`d c b | a b c d | c b a`).
#[inline]
pub fn mirror_index(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let idx = i.rem_euclid(period);
    if idx >= len as isize {
        (period - idx) as usize
    } else {
        idx as usize
    }
}

/// A separable 2D filter with a symmetric kernel per axis.
///
/// Each pass correlates one axis, rows first, with mirror boundary handling.
/// An axis without kernel is left untouched.
struct SeparableFilter {
    kernel_x: Option<Vec<f64>>,
    kernel_y: Option<Vec<f64>>,
}

impl SeparableFilter {
    fn gaussian(sigma_x: f64, sigma_y: f64) -> Self {
        let build = |sigma: f64| {
            (sigma > MIN_SIGMA).then(|| {
                let radius = kernels::gaussian_radius(sigma, GAUSSIAN_TRUNCATE);
                kernels::gaussian_kernel_1d(sigma, radius)
            })
        };
        Self {
            kernel_x: build(sigma_x),
            kernel_y: build(sigma_y),
        }
    }

    fn apply(&self, src: &Image<f64, 1>, dst: &mut Image<f64, 1>) {
        let (rows, cols) = (src.rows(), src.cols());
        let mut buf = src.as_slice().to_vec();

        if let Some(kernel) = &self.kernel_y {
            buf = correlate_vertical(&buf, rows, cols, kernel);
        }
        if let Some(kernel) = &self.kernel_x {
            buf = correlate_horizontal(&buf, cols, kernel);
        }

        dst.as_slice_mut().copy_from_slice(&buf);
    }
}

// symmetric correlation: center tap plus mirrored pairs
#[inline]
fn correlate_at(kernel: &[f64], sample: impl Fn(isize) -> f64) -> f64 {
    let radius = kernel.len() / 2;
    let mut acc = sample(0) * kernel[radius];
    for j in 1..=radius {
        acc += (sample(j as isize) + sample(-(j as isize))) * kernel[radius + j];
    }
    acc
}

fn correlate_vertical(src: &[f64], rows: usize, cols: usize, kernel: &[f64]) -> Vec<f64> {
    let mut dst = vec![0.0; src.len()];
    dst.par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, dst_row)| {
            dst_row.iter_mut().enumerate().for_each(|(c, d)| {
                *d = correlate_at(kernel, |offset| {
                    src[mirror_index(r as isize + offset, rows) * cols + c]
                });
            });
        });
    dst
}

fn correlate_horizontal(src: &[f64], cols: usize, kernel: &[f64]) -> Vec<f64> {
    let mut dst = vec![0.0; src.len()];
    dst.par_chunks_exact_mut(cols)
        .zip(src.par_chunks_exact(cols))
        .for_each(|(dst_row, src_row)| {
            dst_row.iter_mut().enumerate().for_each(|(c, d)| {
                *d = correlate_at(kernel, |offset| {
                    src_row[mirror_index(c as isize + offset, cols)]
                });
            });
        });
    dst
}

/// Blur a single channel image with a gaussian kernel and mirror boundaries.
///
/// The kernel of each axis is truncated at [`GAUSSIAN_TRUNCATE`] standard
/// deviations. Axes with a zero sigma are not filtered.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `sigma_x` - The standard deviation along the columns.
/// * `sigma_y` - The standard deviation along the rows.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::filter::gaussian_blur_mirror;
///
/// let image = Image::<f64, 1>::from_size_val(ImageSize { width: 5, height: 4 }, 0.5).unwrap();
/// let mut blurred = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gaussian_blur_mirror(&image, &mut blurred, 1.0, 0.5).unwrap();
/// assert!(blurred.as_slice().iter().all(|v| (v - 0.5).abs() < 1e-12));
/// ```
pub fn gaussian_blur_mirror(
    src: &Image<f64, 1>,
    dst: &mut Image<f64, 1>,
    sigma_x: f64,
    sigma_y: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.is_empty() {
        return Ok(());
    }

    SeparableFilter::gaussian(sigma_x, sigma_y).apply(src, dst);

    Ok(())
}
