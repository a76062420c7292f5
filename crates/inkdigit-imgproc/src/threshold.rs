use std::cmp::PartialOrd;

use inkdigit_image::{Image, ImageError};

use crate::parallel;

/// Apply a saturating threshold to an image.
///
/// Every value strictly greater than `threshold` is replaced by `max_value`;
/// the other values are copied unchanged.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The value written above the threshold.
///
/// # Examples
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::threshold::threshold_saturate;
///
/// let data = vec![100u8, 200, 50, 150, 241, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut saturated = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_saturate(&image, &mut saturated, 240, 255).unwrap();
/// assert_eq!(saturated.as_slice(), &[100, 200, 50, 150, 255, 255]);
/// ```
pub fn threshold_saturate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            *src_pixel
        };
    });

    Ok(())
}

/// Force near-white background pixels of an 8-bit image to pure white.
///
/// Pixels with an intensity strictly greater than `sat_limit` become 255.
/// Fractional limits behave like the comparison against the real value, i.e.
/// `240.5` saturates from 241 upwards.
///
/// # Arguments
///
/// * `src` - The input 8-bit image.
/// * `dst` - The output 8-bit image.
/// * `sat_limit` - The intensity limit, in [0, 255].
pub fn saturate_background(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    sat_limit: f64,
) -> Result<(), ImageError> {
    if sat_limit < 0.0 {
        // every pixel is above a negative limit
        return threshold_saturate_all(src, dst);
    }
    let threshold = sat_limit.floor().min(255.0) as u8;
    threshold_saturate(src, dst, threshold, u8::MAX)
}

fn threshold_saturate_all(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    dst.as_slice_mut().fill(u8::MAX);
    Ok(())
}
