use serde::{Deserialize, Serialize};

use crate::{error::PipelineError, pipeline::CANONICAL_SIZE};

/// Parameters of the image normalization stages.
///
/// Field names follow the stored configuration documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageProcessingConfig {
    /// Lower percentile of the contrast stretch, in [0, 100].
    pub percen_low: f64,
    /// Upper percentile of the contrast stretch, in [0, 100].
    pub percen_upp: f64,
    /// Intensity above which a cleaned pixel becomes pure white.
    pub sat_limit: f64,
    /// Fraction of the ink mass allowed outside each side of the crop.
    pub limite: f64,
    /// Side of the square crop relative to the longest side of the ink box.
    pub f_lados: f64,
}

impl ImageProcessingConfig {
    /// Check that every parameter is inside its domain.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let percentiles = 0.0..=100.0;
        if !percentiles.contains(&self.percen_low) || !percentiles.contains(&self.percen_upp) {
            return Err(PipelineError::Configuration(format!(
                "percentiles ({}, {}) must be in [0, 100]",
                self.percen_low, self.percen_upp
            )));
        }
        if self.percen_low >= self.percen_upp {
            return Err(PipelineError::Configuration(format!(
                "percen_low ({}) must be lower than percen_upp ({})",
                self.percen_low, self.percen_upp
            )));
        }
        if !(0.0..=255.0).contains(&self.sat_limit) {
            return Err(PipelineError::Configuration(format!(
                "sat_limit ({}) must be in [0, 255]",
                self.sat_limit
            )));
        }
        if !(self.limite > 0.0 && self.limite < 1.0) {
            return Err(PipelineError::Configuration(format!(
                "limite ({}) must be in (0, 1)",
                self.limite
            )));
        }
        if !(self.f_lados >= 1.0 && self.f_lados.is_finite()) {
            return Err(PipelineError::Configuration(format!(
                "f_lados ({}) must be at least 1",
                self.f_lados
            )));
        }
        Ok(())
    }
}

/// Parameters of the multi-scale HOG descriptor of a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Number of orientation bins of every scale.
    #[serde(rename = "HOG_orientation")]
    pub orientations: usize,
    /// Cell side of each scale, in concatenation order.
    #[serde(rename = "HOG_ppc")]
    pub pixels_per_cell: Vec<usize>,
}

impl FeatureConfig {
    /// Check the descriptor parameters against the canonical image size.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] for a zero orientation count, an
    /// empty scale list or a cell size that does not fit the canonical image.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.orientations == 0 {
            return Err(PipelineError::Configuration(
                "HOG_orientation must be positive".to_string(),
            ));
        }
        if self.pixels_per_cell.is_empty() {
            return Err(PipelineError::Configuration(
                "HOG_ppc must list at least one cell size".to_string(),
            ));
        }
        if let Some(ppc) = self
            .pixels_per_cell
            .iter()
            .find(|&&ppc| ppc == 0 || ppc > CANONICAL_SIZE)
        {
            return Err(PipelineError::Configuration(format!(
                "HOG_ppc entry {ppc} must be in [1, {CANONICAL_SIZE}]"
            )));
        }
        Ok(())
    }

    /// Length of the feature vector on the canonical image.
    pub fn descriptor_len(&self) -> usize {
        self.pixels_per_cell
            .iter()
            .map(|&ppc| (CANONICAL_SIZE / ppc).pow(2) * self.orientations)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_config() -> ImageProcessingConfig {
        ImageProcessingConfig {
            percen_low: 1.0,
            percen_upp: 99.0,
            sat_limit: 240.0,
            limite: 0.02,
            f_lados: 1.4,
        }
    }

    #[test]
    fn image_config_from_json() -> Result<(), PipelineError> {
        let config: ImageProcessingConfig = serde_json::from_str(
            r#"{"percen_low": 1, "percen_upp": 99, "sat_limit": 240, "limite": 0.02, "f_lados": 1.4}"#,
        )?;
        assert_eq!(config, image_config());
        config.validate()
    }

    #[test]
    fn image_config_out_of_domain() {
        let cases = [
            ImageProcessingConfig {
                percen_low: 99.0,
                percen_upp: 1.0,
                ..image_config()
            },
            ImageProcessingConfig {
                percen_upp: 101.0,
                ..image_config()
            },
            ImageProcessingConfig {
                sat_limit: 300.0,
                ..image_config()
            },
            ImageProcessingConfig {
                limite: 0.0,
                ..image_config()
            },
            ImageProcessingConfig {
                limite: 1.0,
                ..image_config()
            },
            ImageProcessingConfig {
                f_lados: 0.5,
                ..image_config()
            },
            ImageProcessingConfig {
                limite: f64::NAN,
                ..image_config()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(PipelineError::Configuration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn feature_config_uses_stored_names() -> Result<(), PipelineError> {
        let config: FeatureConfig =
            serde_json::from_str(r#"{"HOG_orientation": 9, "HOG_ppc": [4, 7, 14]}"#)?;
        assert_eq!(config.orientations, 9);
        assert_eq!(config.pixels_per_cell, vec![4, 7, 14]);
        assert_eq!(config.descriptor_len(), 621);

        let json = serde_json::to_value(&config)?;
        assert_eq!(json["HOG_ppc"], serde_json::json!([4, 7, 14]));
        config.validate()
    }

    #[test]
    fn feature_config_out_of_domain() {
        for (orientations, pixels_per_cell) in [(0, vec![4]), (9, vec![]), (9, vec![4, 0]), (9, vec![29])] {
            let config = FeatureConfig {
                orientations,
                pixels_per_cell,
            };
            assert!(matches!(
                config.validate(),
                Err(PipelineError::Configuration(_))
            ));
        }
    }
}
