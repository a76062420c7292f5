use std::{collections::HashMap, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    config::{FeatureConfig, ImageProcessingConfig},
    error::PipelineError,
};

/// Status of the model record used for predictions.
pub const PRODUCTION_STATUS: &str = "in_production";

/// Suffix of a serialized classifier artifact.
pub const MODEL_ARTIFACT_SUFFIX: &str = ".pkl";

/// The label a classifier assigns to a feature vector.
pub type Label = i64;

/// A trained model as recorded in the configuration store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Name of the model; the artifact name is derived from it.
    pub name: String,
    /// Lifecycle status, [`PRODUCTION_STATUS`] for the serving model.
    pub status: String,
    /// Feature configuration the model was trained with.
    pub model_config: FeatureConfig,
}

impl ModelInfo {
    /// Whether this is the model that serves predictions.
    pub fn is_in_production(&self) -> bool {
        self.status == PRODUCTION_STATUS
    }

    /// Name of the classifier artifact in the model store.
    ///
    /// # Example
    ///
    /// ```
    /// use inkdigit::{FeatureConfig, ModelInfo};
    ///
    /// let info = ModelInfo {
    ///     name: "svc_hog".to_string(),
    ///     status: "in_production".to_string(),
    ///     model_config: FeatureConfig { orientations: 9, pixels_per_cell: vec![4, 7, 14] },
    /// };
    /// assert_eq!(info.artifact_name(), "svc_hog.pkl");
    /// ```
    pub fn artifact_name(&self) -> String {
        format!("{}{}", self.name, MODEL_ARTIFACT_SUFFIX)
    }
}

/// Source of the configuration the pipeline runs with.
pub trait ConfigStore: Send + Sync {
    /// The record of the model currently in production.
    fn production_model(&self) -> Result<ModelInfo, PipelineError>;

    /// The parameters of the image normalization stages.
    fn image_processing_config(&self) -> Result<ImageProcessingConfig, PipelineError>;
}

/// A trained classifier, opaque to the pipeline.
pub trait Classifier: Send + Sync {
    /// Assign a label to a feature vector.
    fn predict(&self, features: &[f64]) -> Result<Label, PipelineError>;
}

/// Source of trained classifiers.
pub trait ModelStore: Send + Sync {
    /// Load the classifier stored under `artifact`.
    fn load_classifier(&self, artifact: &str) -> Result<Arc<dyn Classifier>, PipelineError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ConfigDocument {
    models: Vec<ModelInfo>,
    img_pros_config: ImageProcessingConfig,
}

/// A configuration store backed by a JSON document.
///
/// The document holds the model records and the image processing
/// configuration:
///
/// ```json
/// {
///   "models": [
///     {"name": "svc_hog", "status": "in_production",
///      "model_config": {"HOG_orientation": 9, "HOG_ppc": [4, 7, 14]}}
///   ],
///   "img_pros_config": {"percen_low": 1, "percen_upp": 99, "sat_limit": 240,
///                       "limite": 0.02, "f_lados": 1.4}
/// }
/// ```
#[derive(Clone, Debug)]
pub struct JsonConfigStore {
    document: ConfigDocument,
}

impl JsonConfigStore {
    /// Parse a configuration document from a string.
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let document = serde_json::from_str(json)?;
        Ok(Self { document })
    }

    /// Read a configuration document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        log::debug!("loading configuration from {}", path.display());
        let file = std::fs::File::open(path)?;
        let document = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Self { document })
    }

    /// All model records, in document order.
    pub fn models(&self) -> &[ModelInfo] {
        &self.document.models
    }
}

impl ConfigStore for JsonConfigStore {
    fn production_model(&self) -> Result<ModelInfo, PipelineError> {
        self.document
            .models
            .iter()
            .find(|model| model.is_in_production())
            .cloned()
            .ok_or_else(|| {
                PipelineError::ModelNotFound(format!("no model with status {PRODUCTION_STATUS}"))
            })
    }

    fn image_processing_config(&self) -> Result<ImageProcessingConfig, PipelineError> {
        Ok(self.document.img_pros_config.clone())
    }
}

/// A model store holding classifiers in memory, keyed by artifact name.
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    classifiers: HashMap<String, Arc<dyn Classifier>>,
}

impl InMemoryModelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier under an artifact name, replacing any previous one.
    pub fn insert(&mut self, artifact: impl Into<String>, classifier: Arc<dyn Classifier>) {
        self.classifiers.insert(artifact.into(), classifier);
    }
}

impl ModelStore for InMemoryModelStore {
    fn load_classifier(&self, artifact: &str) -> Result<Arc<dyn Classifier>, PipelineError> {
        self.classifiers
            .get(artifact)
            .cloned()
            .ok_or_else(|| PipelineError::ModelNotFound(artifact.to_string()))
    }
}
