#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use inkdigit_image as image;

#[doc(inline)]
pub use inkdigit_imgproc as imgproc;

/// configuration records of the pipeline.
pub mod config;

/// error type of the pipeline.
pub mod error;

/// decoding of input images.
pub mod io;

/// the image normalization and feature pipeline.
pub mod pipeline;

/// prediction routing through the configured model.
pub mod predict;

/// configuration and model stores.
pub mod store;

pub use config::{FeatureConfig, ImageProcessingConfig};
pub use error::PipelineError;
pub use pipeline::{extract_features, preprocess, process, process_with_canonical, ProcessedDigit};
pub use predict::{predict, predict_encoded};
pub use store::{
    Classifier, ConfigStore, InMemoryModelStore, JsonConfigStore, Label, ModelInfo, ModelStore,
};
