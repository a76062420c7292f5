/// The direction of an ink-mass sweep line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDirection {
    /// From the first row downwards.
    TopDown,
    /// From the last row upwards.
    BottomUp,
    /// From the first column rightwards.
    LeftRight,
    /// From the last column leftwards.
    RightLeft,
}

impl std::fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ScanDirection::TopDown => "top-down",
            ScanDirection::BottomUp => "bottom-up",
            ScanDirection::LeftRight => "left-right",
            ScanDirection::RightLeft => "right-left",
        };
        write!(f, "{name}")
    }
}

/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}) mismatch ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the image has no pixels.
    #[error("Image is empty ({0}x{1})")]
    EmptyImage(usize, usize),

    /// Error when a pixel value cannot be converted to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when the channel layout of an input image is not supported.
    #[error("Unsupported channel count {0}, expected 1 (gray), 3 (rgb) or 4 (rgba)")]
    InvalidImageFormat(usize),

    /// Error when the lower and upper contrast percentiles collapse to the same value.
    #[error("Degenerate contrast range: percentiles {low}% and {upp}% are both {value}")]
    DegenerateContrastRange {
        /// The lower percentile.
        low: f64,
        /// The upper percentile.
        upp: f64,
        /// The shared intensity of both percentiles.
        value: f64,
    },

    /// Error when an ink-mass sweep never crosses its threshold.
    #[error("Crop bounds not found scanning {0}")]
    CropBoundsNotFound(ScanDirection),

    /// Error when two opposite sweeps pass each other, leaving an empty box.
    #[error("Crop sweeps {0} and {1} crossed")]
    CropSweepsCrossed(ScanDirection, ScanDirection),

    /// Error when a percentile is outside of [0, 100].
    #[error("Percentile {0} is out of range [0, 100]")]
    InvalidPercentile(f64),

    /// Error when a HOG parameter is invalid.
    #[error("Invalid HOG parameter: {0}")]
    InvalidHogParameter(String),
}
