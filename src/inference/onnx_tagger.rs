//! ONNX Runtime adapter for the character tagger.
//!
//! The exported model takes a time-major `i64` tensor of vocabulary indices,
//! shape `(len, 1)`, and returns one row of class scores per position,
//! shape `(len, 1, classes)`.
//!
//! Several sessions are kept so concurrent requests do not queue on one
//! lock; they share ort's [`PrepackedWeights`], so the weights are resident
//! once.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use ort::{inputs, session::builder::PrepackedWeights, session::Session, value::Value};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::inference::error::InferenceError;
use crate::inference::tagger::{softmax_rows, SequenceTagger};
use crate::utils::config::AppConfig;

/// Takes the first free slot, scanning from `start` and wrapping around.
/// When every slot is busy, waits on `start`.
fn acquire_from<T>(slots: &[Mutex<T>], start: usize) -> MutexGuard<'_, T> {
    let start = start % slots.len();
    (0..slots.len())
        .map(|i| (start + i) % slots.len())
        .find_map(|i| slots[i].try_lock())
        .unwrap_or_else(|| slots[start].lock())
}

pub struct OnnxTagger {
    sessions: Vec<Mutex<Session>>,
    next: AtomicUsize,
    input_name: String,
    output_name: String,
    num_classes: usize,
    apply_softmax: bool,
}

impl OnnxTagger {
    /// Number of threads for ONNX Runtime intra-op parallelism.
    const NUM_THREADS: usize = 2;

    /// Loads the model named in `config` into a session pool.
    ///
    /// The class count is one background class plus one per configured field.
    pub fn from_config(config: &AppConfig) -> Result<Self, InferenceError> {
        let model_path = Path::new(&*config.model_path);
        info!(
            model = %model_path.display(),
            pool_size = config.inference_pool_size,
            "loading tagger model"
        );

        let weights = PrepackedWeights::new();
        let sessions = (0..config.inference_pool_size.max(1))
            .map(|_| Self::build_session(model_path, &weights).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sessions,
            next: AtomicUsize::new(0),
            input_name: config.model_input_name.to_string(),
            output_name: config.model_output_name.to_string(),
            num_classes: config.field_names.len() + 1,
            apply_softmax: config.apply_softmax,
        })
    }

    fn build_session(
        model_path: &Path,
        prepacked: &PrepackedWeights,
    ) -> Result<Session, InferenceError> {
        Session::builder()
            .map_err(|source| InferenceError::ModelFileLoadError {
                path: model_path.to_path_buf(),
                source,
            })?
            .with_intra_threads(Self::NUM_THREADS)?
            .with_prepacked_weights(prepacked)?
            .commit_from_file(model_path)
            .map_err(|source| InferenceError::ModelFileLoadError {
                path: model_path.to_path_buf(),
                source,
            })
    }

    fn run(&self, indices: &[i64]) -> Result<(Vec<f32>, Vec<i64>), InferenceError> {
        let shape = [indices.len(), 1];
        let input_value = Value::from_array((shape.as_slice(), indices.to_vec())).map_err(|e| {
            InferenceError::PredictionError {
                operation: "create input value".to_string(),
                message: e.to_string(),
            }
        })?;

        let start = self.next.fetch_add(1, Ordering::Relaxed);
        let mut session = acquire_from(&self.sessions, start);
        let outputs = session
            .run(inputs![self.input_name.as_str() => input_value])
            .map_err(|source| InferenceError::ModelExecutionError {
                operation: "tagger forward pass".to_string(),
                source,
            })?;

        let output_tensor = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError::PredictionError {
                operation: "get model outputs".to_string(),
                message: format!("Output '{}' not found", self.output_name),
            })?
            .try_extract_tensor::<f32>()
            .map_err(|source| InferenceError::PredictionError {
                operation: "extract output tensor".to_string(),
                message: source.to_string(),
            })?;

        let (shape, data) = output_tensor;
        Ok((data.to_vec(), shape.to_vec()))
    }
}

impl SequenceTagger for OnnxTagger {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn tag(&self, indices: &[i64]) -> Result<Array2<f32>, InferenceError> {
        if indices.is_empty() {
            return Ok(Array2::zeros((0, self.num_classes)));
        }

        let (data, shape) = self.run(indices)?;
        let classes = shape.last().copied().unwrap_or(0) as usize;
        if classes != self.num_classes {
            return Err(InferenceError::PredictionError {
                operation: "check output classes".to_string(),
                message: format!(
                    "model emits {classes} classes, configuration expects {}",
                    self.num_classes
                ),
            });
        }

        let rows = data.len() / classes;
        if rows != indices.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: indices.len(),
                actual: rows,
            });
        }

        let mut scores = Array2::from_shape_vec((rows, classes), data).map_err(|e| {
            InferenceError::PredictionError {
                operation: "reshape output".to_string(),
                message: e.to_string(),
            }
        })?;
        if self.apply_softmax {
            softmax_rows(&mut scores);
        }

        debug!(rows, classes, "tagged sequence");
        Ok(scores)
    }
}
