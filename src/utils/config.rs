//! Application configuration module.
//!
//! Configuration is loaded from a JSON file and handed explicitly to the
//! components that need it. Missing keys fall back to their defaults.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::inference::Aggregation;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/app_config.json";

/// Application configuration structure.
///
/// String fields use `Box<str>` since they are set once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the exported tagger model
    pub model_path: Box<str>,

    /// Name of the model's index-sequence input
    pub model_input_name: Box<str>,

    /// Name of the model's class-score output
    pub model_output_name: Box<str>,

    /// Whether the model emits logits that still need a softmax
    pub apply_softmax: bool,

    /// Number of pooled tagger sessions
    pub inference_pool_size: usize,

    /// Field names in class order; class `i + 1` is `field_names[i]`
    pub field_names: Vec<String>,

    /// How per-character confidences are combined within a span
    pub aggregation: Aggregation,

    /// Number of prepared documents held out for validation
    pub validation_size: usize,

    /// Seed for the train/validation shuffle
    pub split_seed: u64,

    /// Host address for the server
    pub host_url: Box<str>,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from `config/app_config.json`.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Loads `path` if given, otherwise the default path if it exists,
    /// otherwise the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load_default(),
            None => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self {
            model_path: "models/onnx/receipt_tagger.onnx".into(),
            model_input_name: "input".into(),
            model_output_name: "output".into(),
            apply_softmax: true,
            inference_pool_size: 2,
            field_names: ["company", "date", "address", "total"]
                .into_iter()
                .map(String::from)
                .collect(),
            aggregation: Aggregation::Mean,
            validation_size: 76,
            split_seed: 0,
            host_url: "0.0.0.0:3000".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
