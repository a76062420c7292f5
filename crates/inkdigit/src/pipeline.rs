use inkdigit_image::{DynImage, Image, ImageError, ImageSize};
use inkdigit_imgproc::{color, crop, enhance, features, resize, threshold};

use crate::{
    config::{FeatureConfig, ImageProcessingConfig},
    error::PipelineError,
};

/// Side of the canonical digit image, in pixels.
pub const CANONICAL_SIZE: usize = 28;

/// The canonical image of a digit together with its feature vector.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedDigit {
    /// The normalized 28x28 digit, dark ink on white.
    pub canonical: Image<u8, 1>,
    /// The concatenated HOG descriptor of `canonical`.
    pub features: Vec<f64>,
}

fn normalize(image: &DynImage, config: &ImageProcessingConfig) -> Result<Image<u8, 1>, ImageError> {
    log::debug!("grayscale: {:?} image of {}", image.layout(), image.size());
    let gray = color::luminance(image)?;

    let mut light = Image::<f64, 1>::from_size_val(gray.size(), 0.0)?;
    let inverted = enhance::normalize_polarity(&gray, &mut light)?;
    log::debug!("polarity: inverted = {inverted}");

    let mut stretched = Image::<u8, 1>::from_size_val(light.size(), 0)?;
    enhance::stretch_contrast(&light, &mut stretched, config.percen_low, config.percen_upp)?;

    let mut cleaned = Image::<u8, 1>::from_size_val(stretched.size(), 0)?;
    threshold::saturate_background(&stretched, &mut cleaned, config.sat_limit)?;
    log::debug!(
        "cleaning: percentiles {}..{}, saturation above {}",
        config.percen_low,
        config.percen_upp,
        config.sat_limit
    );

    let cropped = crop::auto_crop(&cleaned, config.limite, config.f_lados)?;
    log::debug!("crop: {}", cropped.size());

    let canonical_size = ImageSize {
        width: CANONICAL_SIZE,
        height: CANONICAL_SIZE,
    };
    let mut canonical = Image::<u8, 1>::from_size_val(canonical_size, 0)?;
    resize::resize_u8_antialiased(&cropped, &mut canonical)?;
    log::debug!("resize: {} -> {}", cropped.size(), canonical_size);

    Ok(canonical)
}

fn describe(canonical: &Image<u8, 1>, config: &FeatureConfig) -> Result<Vec<f64>, ImageError> {
    let features =
        features::hog_multiscale(canonical, config.orientations, &config.pixels_per_cell)?;
    log::debug!(
        "features: {} values over cell sizes {:?}",
        features.len(),
        config.pixels_per_cell
    );
    Ok(features)
}

/// Normalize an input image into the canonical 28x28 digit.
///
/// Runs grayscale conversion, polarity normalization, contrast cleaning,
/// auto-cropping and the anti-aliased resize, in that order.
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] if `config` is out of domain, or
/// the [`ImageError`] of the first failing stage.
pub fn preprocess(
    image: &DynImage,
    config: &ImageProcessingConfig,
) -> Result<Image<u8, 1>, PipelineError> {
    config.validate()?;
    Ok(normalize(image, config)?)
}

/// Compute the multi-scale HOG feature vector of a canonical image.
pub fn extract_features(
    canonical: &Image<u8, 1>,
    config: &FeatureConfig,
) -> Result<Vec<f64>, PipelineError> {
    config.validate()?;
    Ok(describe(canonical, config)?)
}

/// Turn an input image into the feature vector of its digit.
///
/// Both configurations are validated before any pixel is touched.
///
/// # Example
///
/// ```
/// use inkdigit::{process, FeatureConfig, ImageProcessingConfig};
/// use inkdigit::image::{DynImage, Image, ImageSize};
///
/// let size = ImageSize { width: 60, height: 60 };
/// let data = (0..size.area())
///     .map(|i| if (20..40).contains(&(i / 60)) && (25..35).contains(&(i % 60)) { 0 } else { 255 })
///     .collect();
/// let image = DynImage::Gray(Image::new(size, data).unwrap());
///
/// let img_config = ImageProcessingConfig {
///     percen_low: 1.0,
///     percen_upp: 99.0,
///     sat_limit: 240.0,
///     limite: 0.02,
///     f_lados: 1.4,
/// };
/// let feature_config = FeatureConfig { orientations: 9, pixels_per_cell: vec![4, 7, 14] };
///
/// let features = process(&image, &img_config, &feature_config).unwrap();
/// assert_eq!(features.len(), 621);
/// ```
pub fn process(
    image: &DynImage,
    img_config: &ImageProcessingConfig,
    feature_config: &FeatureConfig,
) -> Result<Vec<f64>, PipelineError> {
    Ok(process_with_canonical(image, img_config, feature_config)?.features)
}

/// Same as [`process`], also returning the canonical image the features were computed on.
pub fn process_with_canonical(
    image: &DynImage,
    img_config: &ImageProcessingConfig,
    feature_config: &FeatureConfig,
) -> Result<ProcessedDigit, PipelineError> {
    img_config.validate()?;
    feature_config.validate()?;

    let canonical = normalize(image, img_config)?;
    let features = describe(&canonical, feature_config)?;

    Ok(ProcessedDigit {
        canonical,
        features,
    })
}
