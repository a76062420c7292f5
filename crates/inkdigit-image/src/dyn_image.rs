use crate::{
    error::ImageError,
    image::{Image, ImageSize},
};

/// The channel layout of a decoded input image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray,
    /// Red, green and blue.
    Rgb,
    /// Red, green, blue and alpha.
    Rgba,
}

impl ChannelLayout {
    /// Resolve a channel count into a layout.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageFormat`] for any count other than 1, 3 or 4.
    pub fn from_channels(channels: usize) -> Result<Self, ImageError> {
        match channels {
            1 => Ok(ChannelLayout::Gray),
            3 => Ok(ChannelLayout::Rgb),
            4 => Ok(ChannelLayout::Rgba),
            n => Err(ImageError::InvalidImageFormat(n)),
        }
    }

    /// Number of channels of the layout.
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// An 8-bit image whose channel layout is only known at runtime.
///
/// The layout is decided once, when the image enters the pipeline, so the
/// processing stages never have to inspect the channel count again.
#[derive(Clone, Debug, PartialEq)]
pub enum DynImage {
    /// A single channel luminance image.
    Gray(Image<u8, 1>),
    /// A three channel RGB image.
    Rgb(Image<u8, 3>),
    /// A four channel RGBA image.
    Rgba(Image<u8, 4>),
}

impl DynImage {
    /// Build a tagged image from an interleaved buffer and its channel count.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels in `data`.
    /// * `data` - The pixel data, row-major with shape (H, W, C).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageFormat`] if `channels` is not 1, 3 or 4,
    /// or [`ImageError::InvalidChannelShape`] if the buffer length is wrong.
    ///
    /// # Example
    ///
    /// ```
    /// use inkdigit_image::{ChannelLayout, DynImage, ImageError, ImageSize};
    ///
    /// let size = ImageSize { width: 2, height: 1 };
    /// let image = DynImage::from_raw(size, 3, vec![0u8; 6]).unwrap();
    /// assert_eq!(image.layout(), ChannelLayout::Rgb);
    ///
    /// let err = DynImage::from_raw(size, 2, vec![0u8; 4]).unwrap_err();
    /// assert_eq!(err, ImageError::InvalidImageFormat(2));
    /// ```
    pub fn from_raw(size: ImageSize, channels: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        Ok(match ChannelLayout::from_channels(channels)? {
            ChannelLayout::Gray => DynImage::Gray(Image::new(size, data)?),
            ChannelLayout::Rgb => DynImage::Rgb(Image::new(size, data)?),
            ChannelLayout::Rgba => DynImage::Rgba(Image::new(size, data)?),
        })
    }

    /// The channel layout of the image.
    pub fn layout(&self) -> ChannelLayout {
        match self {
            DynImage::Gray(_) => ChannelLayout::Gray,
            DynImage::Rgb(_) => ChannelLayout::Rgb,
            DynImage::Rgba(_) => ChannelLayout::Rgba,
        }
    }

    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DynImage::Gray(img) => img.size(),
            DynImage::Rgb(img) => img.size(),
            DynImage::Rgba(img) => img.size(),
        }
    }
}

impl From<Image<u8, 1>> for DynImage {
    fn from(image: Image<u8, 1>) -> Self {
        DynImage::Gray(image)
    }
}

impl From<Image<u8, 3>> for DynImage {
    fn from(image: Image<u8, 3>) -> Self {
        DynImage::Rgb(image)
    }
}

impl From<Image<u8, 4>> for DynImage {
    fn from(image: Image<u8, 4>) -> Self {
        DynImage::Rgba(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_from_channels() {
        assert_eq!(ChannelLayout::from_channels(1), Ok(ChannelLayout::Gray));
        assert_eq!(ChannelLayout::from_channels(3), Ok(ChannelLayout::Rgb));
        assert_eq!(ChannelLayout::from_channels(4), Ok(ChannelLayout::Rgba));
        for n in [0, 2, 5] {
            assert_eq!(
                ChannelLayout::from_channels(n),
                Err(ImageError::InvalidImageFormat(n))
            );
        }
    }

    #[test]
    fn from_raw_rgba() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let image = DynImage::from_raw(size, 4, vec![7u8; 3 * 2 * 4])?;
        assert_eq!(image.layout(), ChannelLayout::Rgba);
        assert_eq!(image.layout().num_channels(), 4);
        assert_eq!(image.size(), size);
        Ok(())
    }

    #[test]
    fn from_raw_wrong_length() {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        assert_eq!(
            DynImage::from_raw(size, 3, vec![0u8; 6]),
            Err(ImageError::InvalidChannelShape(6, 18))
        );
    }
}
