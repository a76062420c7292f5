//! Photometric normalization of luminance planes.
//!
//! * [`normalize_polarity`] makes sure the ink is darker than the paper.
//! * [`percentile`] computes intensity percentiles with linear interpolation.
//! * [`stretch_contrast`] maps a percentile range onto the full 8-bit range.

use inkdigit_image::{Image, ImageError};

use crate::parallel;

/// Invert a luminance plane when it looks like light ink on a dark background.
///
/// The decision compares the mean intensity with the midpoint of the
/// intensity range: `mean < (max + min) / 2` means most pixels sit in the dark
/// half, i.e. the background is dark. In that case the output is
/// `max - src`, otherwise `src` is copied unchanged.
///
/// Applying the function to its own output never inverts a second time for
/// bimodal images, since the background then dominates the bright half.
///
/// # Arguments
///
/// * `src` - The input luminance image.
/// * `dst` - The output luminance image.
///
/// # Returns
///
/// `true` if the image was inverted.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImage`] for images without pixels and
/// [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::enhance::normalize_polarity;
///
/// // a bright stroke on a black canvas
/// let image = Image::<f64, 1>::new(
///     ImageSize { width: 4, height: 1 },
///     vec![0.0, 200.0, 0.0, 0.0],
/// ).unwrap();
///
/// let mut out = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
/// let inverted = normalize_polarity(&image, &mut out).unwrap();
///
/// assert!(inverted);
/// assert_eq!(out.as_slice(), &[200.0, 0.0, 200.0, 200.0]);
/// ```
pub fn normalize_polarity(src: &Image<f64, 1>, dst: &mut Image<f64, 1>) -> Result<bool, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    let data = src.as_slice();
    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let mean = data.iter().sum::<f64>() / data.len() as f64;

    let invert = mean < (max + min) / 2.0;
    if invert {
        log::debug!("inverting polarity: mean {mean:.3} below midpoint of [{min}, {max}]");
        parallel::par_iter_rows_val(src, dst, |&s, d| *d = max - s);
    } else {
        dst.as_slice_mut().copy_from_slice(data);
    }

    Ok(invert)
}

// Linear interpolation that is exact at both ends of the segment.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Compute the `q`-th percentile of a set of samples.
///
/// Uses linear interpolation between the two closest ranks: the sorted
/// samples are indexed at `q / 100 * (n - 1)` and the fractional part blends
/// the neighbours.
///
/// # Arguments
///
/// * `values` - The samples, in any order.
/// * `q` - The percentile, in [0, 100].
///
/// # Errors
///
/// Returns [`ImageError::InvalidPercentile`] if `q` is out of range and
/// [`ImageError::EmptyImage`] if there are no samples.
///
/// # Example
///
/// ```
/// use inkdigit_imgproc::enhance::percentile;
///
/// let values = [4.0, 1.0, 3.0, 2.0];
/// assert_eq!(percentile(&values, 50.0).unwrap(), 2.5);
/// assert_eq!(percentile(&values, 100.0).unwrap(), 4.0);
/// ```
pub fn percentile(values: &[f64], q: f64) -> Result<f64, ImageError> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    percentile_sorted(&sorted, q)
}

fn percentile_sorted(sorted: &[f64], q: f64) -> Result<f64, ImageError> {
    if !(0.0..=100.0).contains(&q) {
        return Err(ImageError::InvalidPercentile(q));
    }
    if sorted.is_empty() {
        return Err(ImageError::EmptyImage(0, 0));
    }

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);

    Ok(lerp(sorted[lo], sorted[hi], rank - lo as f64))
}

/// Stretch the contrast of a luminance plane between two percentiles.
///
/// The `percen_low` percentile is mapped to 0 and the `percen_upp` percentile
/// to 255, linearly. The result is clipped to [0, 255] and truncated to `u8`.
///
/// # Arguments
///
/// * `src` - The input luminance image.
/// * `dst` - The output 8-bit image.
/// * `percen_low` - The lower percentile, in [0, 100].
/// * `percen_upp` - The upper percentile, in [0, 100].
///
/// # Errors
///
/// Returns [`ImageError::DegenerateContrastRange`] when both percentiles have
/// the same intensity, which is the case for blank or near-uniform images.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::enhance::stretch_contrast;
///
/// let image = Image::<f64, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![10.0, 15.0, 20.0],
/// ).unwrap();
///
/// let mut out = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// stretch_contrast(&image, &mut out, 0.0, 100.0).unwrap();
/// assert_eq!(out.as_slice(), &[0, 127, 255]);
/// ```
pub fn stretch_contrast(
    src: &Image<f64, 1>,
    dst: &mut Image<u8, 1>,
    percen_low: f64,
    percen_upp: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut sorted = src.as_slice().to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let low = percentile_sorted(&sorted, percen_low)?;
    let upp = percentile_sorted(&sorted, percen_upp)?;

    let range = upp - low;
    if range == 0.0 {
        return Err(ImageError::DegenerateContrastRange {
            low: percen_low,
            upp: percen_upp,
            value: low,
        });
    }

    parallel::par_iter_rows_val(src, dst, |&s, d| {
        let v = (s - low) / range * 255.0;
        *d = v.clamp(0.0, 255.0) as u8;
    });

    Ok(())
}
