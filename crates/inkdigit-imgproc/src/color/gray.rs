use crate::parallel;
use inkdigit_image::{DynImage, Image, ImageError};

/// Convert an RGB8 image to a luminance plane using the unweighted sum:
///
/// Y = R + G + B
///
/// The result is not averaged, so values range over [0, 765]. The contrast
/// stretch that follows is percentile based and absorbs the scale.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output luminance image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::color::gray_from_rgb_sum;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![10, 20, 30],
/// )
/// .unwrap();
///
/// let mut gray = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
/// gray_from_rgb_sum(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[60.0]);
/// ```
pub fn gray_from_rgb_sum(src: &Image<u8, 3>, dst: &mut Image<f64, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f64;
        let g = src_pixel[1] as f64;
        let b = src_pixel[2] as f64;
        dst_pixel[0] = r + g + b;
    });

    Ok(())
}

/// Convert an RGBA8 image to an alpha weighted luminance plane:
///
/// Y = (R + G + B) * A
///
/// Alpha stays on its raw [0, 255] scale. A fully transparent image therefore
/// collapses to an all-zero plane.
///
/// # Arguments
///
/// * `src` - The input RGBA8 image.
/// * `dst` - The output luminance image.
///
/// Precondition: the input and output images must have the same size.
pub fn gray_from_rgba_weighted(
    src: &Image<u8, 4>,
    dst: &mut Image<f64, 1>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f64;
        let g = src_pixel[1] as f64;
        let b = src_pixel[2] as f64;
        let a = src_pixel[3] as f64;
        dst_pixel[0] = (r + g + b) * a;
    });

    Ok(())
}

/// Convert an RGB8 image to an 8-bit grayscale image with ITU-R 601-2 weights:
///
/// Y = (19595 * R + 38470 * G + 7471 * B + 32768) >> 16
///
/// The weights are 0.299, 0.587 and 0.114 in 16-bit fixed point, rounded
/// to the nearest integer.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![255, 0, 0, 0, 255, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[76, 150]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as u32;
        let g = src_pixel[1] as u32;
        let b = src_pixel[2] as u32;
        dst_pixel[0] = ((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u8;
    });

    Ok(())
}

/// Collapse a decoded image of any supported layout to a single luminance plane.
///
/// Gray images are promoted to `f64` unchanged, RGB images use
/// [`gray_from_rgb_sum`] and RGBA images use [`gray_from_rgba_weighted`].
///
/// # Example
///
/// ```
/// use inkdigit_image::{DynImage, Image, ImageSize};
/// use inkdigit_imgproc::color::luminance;
///
/// let image = DynImage::Gray(
///     Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![0, 255]).unwrap(),
/// );
/// let gray = luminance(&image).unwrap();
/// assert_eq!(gray.as_slice(), &[0.0, 255.0]);
/// ```
pub fn luminance(src: &DynImage) -> Result<Image<f64, 1>, ImageError> {
    let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    match src {
        DynImage::Gray(img) => {
            parallel::par_iter_rows_val(img, &mut dst, |&s, d| *d = s as f64);
        }
        DynImage::Rgb(img) => gray_from_rgb_sum(img, &mut dst)?,
        DynImage::Rgba(img) => gray_from_rgba_weighted(img, &mut dst)?,
    }
    Ok(dst)
}
