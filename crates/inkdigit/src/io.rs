use std::path::Path;

use inkdigit_image::{DynImage, Image, ImageError, ImageSize};
use inkdigit_imgproc::color;

use crate::error::PipelineError;

fn into_dyn_image(img: ::image::DynamicImage) -> Result<DynImage, PipelineError> {
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    // wider samples are reduced to 8 bits, keeping the channel count
    let image = match img.color() {
        ::image::ColorType::L8 | ::image::ColorType::L16 => {
            DynImage::Gray(Image::new(size, img.into_luma8().into_raw())?)
        }
        ::image::ColorType::Rgb8 | ::image::ColorType::Rgb16 | ::image::ColorType::Rgb32F => {
            DynImage::Rgb(Image::new(size, img.into_rgb8().into_raw())?)
        }
        ::image::ColorType::Rgba8 | ::image::ColorType::Rgba16 | ::image::ColorType::Rgba32F => {
            DynImage::Rgba(Image::new(size, img.into_rgba8().into_raw())?)
        }
        color => {
            return Err(ImageError::InvalidImageFormat(color.channel_count() as usize).into())
        }
    };

    Ok(image)
}

// 8-bit weighted luma, alpha dropped
fn into_luma(img: ::image::DynamicImage) -> Result<Image<u8, 1>, PipelineError> {
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    if !img.color().has_color() {
        return Ok(Image::new(size, img.into_luma8().into_raw())?);
    }

    let rgb = Image::<u8, 3>::new(size, img.into_rgb8().into_raw())?;
    let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;
    color::gray_from_rgb_u8(&rgb, &mut gray)?;
    Ok(gray)
}

/// Decode an encoded image held in memory.
///
/// The format is guessed from the content.
///
/// # Errors
///
/// Returns [`PipelineError::Decode`] if the data cannot be decoded and
/// [`ImageError::InvalidImageFormat`] for layouts other than gray, RGB and
/// RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<DynImage, PipelineError> {
    let img = ::image::load_from_memory(bytes)?;
    into_dyn_image(img)
}

/// Decode an encoded image held in memory straight to 8-bit grayscale.
///
/// This is how prediction requests are ingested: color images are reduced
/// with [`color::gray_from_rgb_u8`] and any alpha channel is dropped, so the
/// result is always [`DynImage::Gray`].
///
/// # Errors
///
/// Returns [`PipelineError::Decode`] if the data cannot be decoded.
///
/// # Example
///
/// ```
/// use inkdigit::image::ChannelLayout;
/// use inkdigit::io::decode_image_luma;
///
/// let mut bytes = std::io::Cursor::new(Vec::new());
/// image::DynamicImage::new_rgba8(3, 2)
///     .write_to(&mut bytes, image::ImageFormat::Png)
///     .unwrap();
///
/// let gray = decode_image_luma(bytes.get_ref()).unwrap();
/// assert_eq!(gray.layout(), ChannelLayout::Gray);
/// ```
pub fn decode_image_luma(bytes: &[u8]) -> Result<DynImage, PipelineError> {
    let img = ::image::load_from_memory(bytes)?;
    Ok(DynImage::Gray(into_luma(img)?))
}

/// Reads an image from the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// The image tagged with its channel layout.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DynImage, PipelineError> {
    let file_path = file_path.as_ref();
    log::debug!("reading image {}", file_path.display());
    let bytes = std::fs::read(file_path)?;
    decode_image(&bytes)
}
