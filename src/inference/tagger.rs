//! The sequence-tagger seam.
//!
//! The model itself is opaque: anything that maps a vocabulary-index
//! sequence to one class distribution per position can serve. The ONNX
//! adapter in [`onnx_tagger`](crate::inference::onnx_tagger) is one such
//! implementation; tests use a deterministic one.

use ndarray::{Array2, ArrayView2, Axis};

use crate::inference::error::InferenceError;
use crate::labeling::ClassId;

pub trait SequenceTagger: Send + Sync {
    /// Number of classes per position, background included.
    fn num_classes(&self) -> usize;

    /// Class probabilities of shape `(indices.len(), num_classes)`.
    ///
    /// Implementations must not retain or mutate state between calls in any
    /// way that is observable in the output.
    fn tag(&self, indices: &[i64]) -> Result<Array2<f32>, InferenceError>;
}

/// Arg-max class and its probability for every position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prediction {
    pub classes: Vec<ClassId>,
    pub confidences: Vec<f32>,
}

impl Prediction {
    /// Picks the most probable class of every row. Ties go to the lower class.
    pub fn from_probabilities(probabilities: ArrayView2<'_, f32>) -> Self {
        let (classes, confidences) = probabilities
            .axis_iter(Axis(0))
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |best, (class, &p)| {
                        if p > best.1 {
                            (class, p)
                        } else {
                            best
                        }
                    })
            })
            .unzip();
        Self {
            classes,
            confidences,
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Row-wise softmax, stabilised by subtracting each row's maximum.
pub fn softmax_rows(logits: &mut Array2<f32>) {
    for mut row in logits.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let mut logits = array![[1.0_f32, 2.0, 3.0], [0.0, 0.0, 0.0]];
        softmax_rows(&mut logits);
        for row in logits.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
        assert!((logits[[1, 0]] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_prediction_argmax() {
        let probabilities = array![[0.7_f32, 0.2, 0.1], [0.1, 0.1, 0.8], [0.4, 0.4, 0.2]];
        let prediction = Prediction::from_probabilities(probabilities.view());
        assert_eq!(prediction.classes, vec![0, 2, 0]);
        assert_eq!(prediction.confidences, vec![0.7, 0.8, 0.4]);
    }
}
