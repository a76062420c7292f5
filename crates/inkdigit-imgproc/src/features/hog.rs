use inkdigit_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

use crate::parallel;

/// Regularization added to the L1 norm of each block.
pub const HOG_BLOCK_EPS: f64 = 1e-5;

/// Parameters of a single scale histogram of oriented gradients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HogParams {
    /// Number of unsigned orientation bins over [0, 180) degrees.
    pub orientations: usize,
    /// Side of a square cell in pixels.
    pub pixels_per_cell: usize,
}

impl HogParams {
    /// Check the parameters against the size of the image they are applied to.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidHogParameter`] if a value is zero or a cell
    /// does not fit in the image.
    pub fn validate(&self, size: ImageSize) -> Result<(), ImageError> {
        if self.orientations == 0 {
            return Err(ImageError::InvalidHogParameter(
                "orientations must be positive".to_string(),
            ));
        }
        if self.pixels_per_cell == 0 {
            return Err(ImageError::InvalidHogParameter(
                "pixels per cell must be positive".to_string(),
            ));
        }
        if self.pixels_per_cell > size.width || self.pixels_per_cell > size.height {
            return Err(ImageError::InvalidHogParameter(format!(
                "{} pixels per cell do not fit a {}x{} image",
                self.pixels_per_cell, size.width, size.height
            )));
        }
        Ok(())
    }

    fn cells(&self, size: ImageSize) -> (usize, usize) {
        (
            size.height / self.pixels_per_cell,
            size.width / self.pixels_per_cell,
        )
    }
}

/// Length of the descriptor [`hog`] returns for an image of `size`.
///
/// Blocks are single cells, so the length is
/// `(height / ppc) * (width / ppc) * orientations`.
///
/// # Example
///
/// ```
/// use inkdigit_image::ImageSize;
/// use inkdigit_imgproc::features::{hog_descriptor_len, HogParams};
///
/// let size = ImageSize { width: 28, height: 28 };
/// let params = HogParams { orientations: 9, pixels_per_cell: 7 };
/// assert_eq!(hog_descriptor_len(size, &params).unwrap(), 144);
/// ```
pub fn hog_descriptor_len(size: ImageSize, params: &HogParams) -> Result<usize, ImageError> {
    params.validate(size)?;
    let (cell_rows, cell_cols) = params.cells(size);
    Ok(cell_rows * cell_cols * params.orientations)
}

/// Central differences along both axes.
///
/// Channel 0 holds the row gradient and channel 1 the column gradient. The
/// differences are not halved and are zero on the outermost rows (row
/// gradient) and columns (column gradient).
fn gradients(src: &Image<f64, 1>) -> Result<Image<f64, 2>, ImageError> {
    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let mut grad = Image::<f64, 2>::from_size_val(src.size(), 0.0)?;

    parallel::par_fill_rows(&mut grad, |r, grad_row| {
        let line = &data[r * cols..(r + 1) * cols];
        let vertical = (r > 0 && r + 1 < rows)
            .then(|| (&data[(r - 1) * cols..r * cols], &data[(r + 1) * cols..(r + 2) * cols]));

        grad_row.chunks_exact_mut(2).enumerate().for_each(|(c, g)| {
            if let Some((above, below)) = vertical {
                g[0] = below[c] - above[c];
            }
            if c > 0 && c + 1 < cols {
                g[1] = line[c + 1] - line[c - 1];
            }
        });
    });

    Ok(grad)
}

/// Gradient magnitude and unsigned orientation in degrees, in [0, 180).
fn polar_gradients(grad: &Image<f64, 2>) -> Result<Image<f64, 2>, ImageError> {
    let mut polar = Image::<f64, 2>::from_size_val(grad.size(), 0.0)?;
    parallel::par_iter_rows(grad, &mut polar, |g, p| {
        p[0] = g[1].hypot(g[0]);
        p[1] = g[0].atan2(g[1]).to_degrees().rem_euclid(180.0);
    });
    Ok(polar)
}

/// Magnitude of the pixels of one cell whose orientation is in `[lower, upper)`.
///
/// The running sum is kept in single precision.
fn cell_bin(
    polar: &[f64],
    cols: usize,
    center: (usize, usize),
    window: (isize, isize),
    lower: f32,
    upper: f32,
) -> f32 {
    let (lower, upper) = (lower as f64, upper as f64);
    let rows = polar.len() / (2 * cols);
    let mut total = 0.0f32;

    for dr in window.0..window.1 {
        let r = center.0 as isize + dr;
        if r < 0 || r >= rows as isize {
            continue;
        }
        for dc in window.0..window.1 {
            let c = center.1 as isize + dc;
            if c < 0 || c >= cols as isize {
                continue;
            }
            let idx = 2 * (r as usize * cols + c as usize);
            let orientation = polar[idx + 1];
            if orientation >= upper || orientation < lower {
                continue;
            }
            total = (total as f64 + polar[idx]) as f32;
        }
    }

    total
}

/// Compute the histogram of oriented gradients of a single channel image.
///
/// Gradients are central differences; each pixel votes with its magnitude
/// into the unsigned orientation bin that contains its angle. The image is
/// divided into square cells of `pixels_per_cell` pixels, remainder pixels
/// on the right and bottom being ignored. Every cell histogram is averaged
/// over the cell area and L1 normalized on its own (blocks of one cell).
///
/// # Arguments
///
/// * `src` - The input image.
/// * `params` - The number of orientations and the cell size.
///
/// # Returns
///
/// The descriptor flattened in (cell row, cell column, orientation) order.
///
/// # Errors
///
/// Returns [`ImageError::InvalidHogParameter`] if `params` does not fit the
/// image.
pub fn hog(src: &Image<f64, 1>, params: &HogParams) -> Result<Vec<f64>, ImageError> {
    params.validate(src.size())?;

    let ppc = params.pixels_per_cell;
    let orientations = params.orientations;
    let (cell_rows, cell_cols) = params.cells(src.size());

    let polar = polar_gradients(&gradients(src)?)?;
    let polar = polar.as_slice();
    let cols = src.cols();

    let window = (-((ppc / 2) as isize), ((ppc + 1) / 2) as isize);
    let bin_width = (180.0 / orientations as f64) as f32;
    let area = (ppc * ppc) as f32;

    let mut descriptor = vec![0.0; cell_rows * cell_cols * orientations];

    descriptor
        .par_chunks_exact_mut(orientations)
        .enumerate()
        .for_each(|(cell, hist)| {
            let center = (
                ppc / 2 + (cell / cell_cols) * ppc,
                ppc / 2 + (cell % cell_cols) * ppc,
            );

            hist.iter_mut().enumerate().for_each(|(i, h)| {
                let lower = bin_width * i as f32;
                let upper = bin_width * (i + 1) as f32;
                *h = (cell_bin(polar, cols, center, window, lower, upper) / area) as f64;
            });

            // L1 block normalization
            let norm = hist.iter().map(|v| v.abs()).sum::<f64>() + HOG_BLOCK_EPS;
            hist.iter_mut().for_each(|v| *v /= norm);
        });

    Ok(descriptor)
}

/// Compute and concatenate histograms of oriented gradients at several cell sizes.
///
/// The 8-bit image is mapped to `0.5 - value / 255` first, so dark ink becomes
/// the high end of the range. The descriptors of each cell size are appended
/// in the order of `pixels_per_cell`.
///
/// # Arguments
///
/// * `src` - The canonical 8-bit image.
/// * `orientations` - The number of orientation bins of every scale.
/// * `pixels_per_cell` - The cell sizes, one per scale.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::features::hog_multiscale;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 28, height: 28 }, 255).unwrap();
/// let features = hog_multiscale(&image, 9, &[4, 7, 14]).unwrap();
///
/// assert_eq!(features.len(), 441 + 144 + 36);
/// assert!(features.iter().all(|&v| v == 0.0));
/// ```
pub fn hog_multiscale(
    src: &Image<u8, 1>,
    orientations: usize,
    pixels_per_cell: &[usize],
) -> Result<Vec<f64>, ImageError> {
    let mut centered = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    parallel::par_iter_rows_val(src, &mut centered, |&v, t| {
        *t = 0.5 - v as f64 / 255.0;
    });

    let mut features = Vec::new();
    for &ppc in pixels_per_cell {
        let params = HogParams {
            orientations,
            pixels_per_cell: ppc,
        };
        features.extend(hog(&centered, &params)?);
    }

    Ok(features)
}
