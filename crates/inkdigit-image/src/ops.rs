use crate::{Image, ImageError};

/// Cast the pixel data of an image to a different type and scale it.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f64 = Image::from_size_val(image.size(), 0.0f64).unwrap();
///
/// cast_and_scale(&image, &mut image_f64, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f64.as_slice(), &[0.0, 1.0]);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp)
                .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

/// Quantize a floating point image to 8 bits.
///
/// Values are clipped to [0, 255] and truncated toward zero, which is how the
/// digit pipeline converts its float checkpoints back to `u8`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
pub fn quantize_u8<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &inp)| {
            // NaN maps to 0, same as a saturating float to int cast
            *out = inp.clamp(0.0, 255.0) as u8;
        });

    Ok(())
}
