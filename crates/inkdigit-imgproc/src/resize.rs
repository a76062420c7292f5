use inkdigit_image::{ops, Image, ImageError};

use crate::{
    filter::{gaussian_blur_mirror, mirror_index},
    parallel,
};

/// Standard deviation of the anti-aliasing blur for a downscale factor.
///
/// Shrinking by `factor` blurs with `sigma = (factor - 1) / 2`; upscaling
/// needs no blur.
pub fn antialias_sigma(factor: f64) -> f64 {
    ((factor - 1.0) / 2.0).max(0.0)
}

// source coordinate of an output sample, aligning pixel areas rather than centers
#[inline]
fn source_coord(out: usize, factor: f64) -> f64 {
    (out as f64 + 0.5) * factor - 0.5
}

// integer neighbours and weight of the upper one
#[inline]
fn linear_taps(coord: f64, len: usize) -> (usize, usize, f64) {
    let lo = coord.floor();
    let t = coord - lo;
    let lo = lo as isize;
    (mirror_index(lo, len), mirror_index(lo + 1, len), t)
}

/// Resize a single channel image with anti-aliasing.
///
/// The input is first low-pass filtered with a gaussian whose sigma depends
/// on the downscale factor of each axis (see [`antialias_sigma`]), then
/// sampled bilinearly at `(out + 0.5) * factor - 0.5`. Both steps mirror the
/// image about its edge pixels. The result is clipped to the intensity range
/// of `src`, so no new extrema are introduced.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image; its size is the target size.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImage`] if either image has no pixels.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::resize::resize_antialiased;
///
/// let image = Image::<f64, 1>::from_size_val(ImageSize { width: 100, height: 60 }, 0.25).unwrap();
/// let mut resized = Image::<f64, 1>::from_size_val(ImageSize { width: 28, height: 28 }, 0.0).unwrap();
///
/// resize_antialiased(&image, &mut resized).unwrap();
/// assert!(resized.as_slice().iter().all(|v| (v - 0.25).abs() < 1e-12));
/// ```
pub fn resize_antialiased(src: &Image<f64, 1>, dst: &mut Image<f64, 1>) -> Result<(), ImageError> {
    if src.is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }
    if dst.is_empty() {
        return Err(ImageError::EmptyImage(dst.cols(), dst.rows()));
    }

    let factor_x = src.cols() as f64 / dst.cols() as f64;
    let factor_y = src.rows() as f64 / dst.rows() as f64;

    let mut filtered = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    gaussian_blur_mirror(
        src,
        &mut filtered,
        antialias_sigma(factor_x),
        antialias_sigma(factor_y),
    )?;

    let (min, max) = src
        .as_slice()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let (src_rows, src_cols) = (src.rows(), src.cols());
    let data = filtered.as_slice();

    parallel::par_fill_rows(dst, |r, dst_row| {
        let (y0, y1, ty) = linear_taps(source_coord(r, factor_y), src_rows);
        let (row0, row1) = (&data[y0 * src_cols..], &data[y1 * src_cols..]);

        dst_row.iter_mut().enumerate().for_each(|(c, d)| {
            let (x0, x1, tx) = linear_taps(source_coord(c, factor_x), src_cols);
            let top = (1.0 - tx) * row0[x0] + tx * row0[x1];
            let bottom = (1.0 - tx) * row1[x0] + tx * row1[x1];
            *d = ((1.0 - ty) * top + ty * bottom).clamp(min, max);
        });
    });

    Ok(())
}

/// Resize an 8-bit single channel image with anti-aliasing.
///
/// The image is scaled to [0, 1], resized with [`resize_antialiased`] and
/// scaled back to [0, 255], truncating to `u8`.
///
/// # Arguments
///
/// * `src` - The input 8-bit image.
/// * `dst` - The output 8-bit image; its size is the target size.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::resize::resize_u8_antialiased;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 7, height: 5 }, 255).unwrap();
/// let mut resized = Image::<u8, 1>::from_size_val(ImageSize { width: 28, height: 28 }, 0).unwrap();
///
/// resize_u8_antialiased(&image, &mut resized).unwrap();
/// assert!(resized.as_slice().iter().all(|&v| v == 255));
/// ```
pub fn resize_u8_antialiased(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    let mut src_f64 = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    ops::cast_and_scale(src, &mut src_f64, 1.0 / 255.0)?;

    let mut dst_f64 = Image::<f64, 1>::from_size_val(dst.size(), 0.0)?;
    resize_antialiased(&src_f64, &mut dst_f64)?;

    parallel::par_iter_rows_inplace(&mut dst_f64, |v| *v *= 255.0);
    ops::quantize_u8(&dst_f64, dst)
}
