use inkdigit_image::ImageError;

/// An error type for the digit pipeline and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Error raised by a pixel level stage.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when a configuration value is out of its domain.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Error when no model matches a lookup.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Error reported by a configuration or model store.
    #[error("Store error: {0}")]
    Store(String),

    /// Error to decode the input image.
    #[error("Failed to decode the image. {0}")]
    Decode(#[from] ::image::ImageError),

    /// Error reported by a classifier.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Error to read or write a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error to parse a configuration document.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
