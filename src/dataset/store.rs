use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::error::DatasetError;
use crate::labeling::LabelArray;

/// One aligned document: linearized text plus a class per character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub key: String,
    pub text: String,
    pub labels: LabelArray,
}

impl TrainingExample {
    /// Checks that there is exactly one label per character.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let text = self.text.chars().count();
        if text != self.labels.len() {
            return Err(DatasetError::LabelLength {
                text,
                labels: self.labels.len(),
            });
        }
        Ok(())
    }
}

/// Prepared training and validation splits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub train: Vec<TrainingExample>,
    pub validation: Vec<TrainingExample>,
}

impl Dataset {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let io_error = |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string(self).map_err(|source| DatasetError::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)?;

        info!(
            path = %path.display(),
            train = self.train.len(),
            validation = self.validation.len(),
            "saved dataset"
        );
        Ok(())
    }

    /// Loads a dataset and rejects any example whose labels do not cover its text.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|source| DatasetError::DatasetParse {
                path: path.to_path_buf(),
                source,
            })?;

        for example in dataset.train.iter().chain(&dataset.validation) {
            example.validate()?;
        }
        Ok(dataset)
    }
}
