use inkdigit_image::DynImage;

use crate::{
    error::PipelineError,
    io, pipeline,
    store::{ConfigStore, Label, ModelStore},
};

/// Predict the digit of an image with the model in production.
///
/// The production model record selects the feature configuration and the
/// classifier artifact; the image processing configuration comes from the
/// same store.
///
/// # Arguments
///
/// * `image` - The decoded input image.
/// * `config_store` - The source of the model record and configurations.
/// * `model_store` - The source of the classifier.
///
/// # Errors
///
/// Returns the first error of the stores, the pipeline or the classifier.
pub fn predict(
    image: &DynImage,
    config_store: &dyn ConfigStore,
    model_store: &dyn ModelStore,
) -> Result<Label, PipelineError> {
    let model = config_store.production_model()?;
    log::info!("predicting with model {}", model.name);

    let img_config = config_store.image_processing_config()?;
    let features = pipeline::process(image, &img_config, &model.model_config)?;

    let artifact = model.artifact_name();
    log::info!("loading classifier {artifact}");
    let classifier = model_store.load_classifier(&artifact)?;

    let label = classifier.predict(&features)?;
    log::info!("predicted label {label}");

    Ok(label)
}

/// Predict the digit of an encoded image, as received in a request.
///
/// The bytes are decoded to 8-bit grayscale with [`io::decode_image_luma`]
/// before running [`predict`].
///
/// # Errors
///
/// Returns [`PipelineError::Decode`] for undecodable bytes and otherwise the
/// errors of [`predict`].
pub fn predict_encoded(
    bytes: &[u8],
    config_store: &dyn ConfigStore,
    model_store: &dyn ModelStore,
) -> Result<Label, PipelineError> {
    let image = io::decode_image_luma(bytes)?;
    predict(&image, config_store, model_store)
}
