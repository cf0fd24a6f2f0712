//! Span decoding.
//!
//! Collapses per-character predictions into field results: every maximal run
//! of one non-background class becomes one [`FieldResult`].
//!
//! Runs are never merged. If a class shows up in two places the decoder
//! reports both, and choosing between them is the caller's job;
//! [`best_per_field`] is the usual choice.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::labeling::{ClassId, BACKGROUND};

/// How per-character confidences within a run are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Max,
}

impl Aggregation {
    fn combine(self, confidences: &[f32]) -> f32 {
        if confidences.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Mean => confidences.iter().sum::<f32>() / confidences.len() as f32,
            Aggregation::Max => confidences.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }
}

/// One contiguous run of a predicted field class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    pub class: ClassId,
    /// Field name for `class`, when the decoder was given names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
    pub confidence: f32,
    /// Character offset of the run's first character.
    pub start: usize,
    /// Character offset one past the run's last character.
    pub end: usize,
}

/// A single value per field, as chosen by [`best_per_field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: String,
    pub value: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SpanDecoder {
    aggregation: Aggregation,
    field_names: Vec<String>,
}

impl SpanDecoder {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            field_names: Vec::new(),
        }
    }

    /// Names results by class: class `i + 1` is `field_names[i]`.
    #[must_use]
    pub fn with_field_names<I, S>(mut self, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = field_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn name_of(&self, class: ClassId) -> Option<String> {
        class
            .checked_sub(1)
            .and_then(|i| self.field_names.get(i))
            .cloned()
    }

    /// Decodes one document, left to right.
    ///
    /// # Panics
    ///
    /// Panics if `classes`, `confidences` and the characters of `text` are
    /// not all the same length. Mismatched arrays are a caller bug.
    #[instrument(skip_all, fields(chars = classes.len()))]
    pub fn decode(&self, text: &str, classes: &[ClassId], confidences: &[f32]) -> Vec<FieldResult> {
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(
            classes.len(),
            confidences.len(),
            "predicted classes and confidences differ in length"
        );
        assert_eq!(
            chars.len(),
            classes.len(),
            "prediction length does not match document length"
        );

        let mut results = Vec::new();
        let mut start = 0;
        while start < classes.len() {
            let class = classes[start];
            let end = classes[start..]
                .iter()
                .position(|&c| c != class)
                .map_or(classes.len(), |offset| start + offset);

            if class != BACKGROUND {
                results.push(FieldResult {
                    class,
                    name: self.name_of(class),
                    value: chars[start..end].iter().collect(),
                    confidence: self.aggregation.combine(&confidences[start..end]),
                    start,
                    end,
                });
            }
            start = end;
        }

        debug!(runs = results.len(), "decoded spans");
        results
    }
}

/// Decodes with mean aggregation and unnamed classes.
pub fn decode(text: &str, classes: &[ClassId], confidences: &[f32]) -> Vec<FieldResult> {
    SpanDecoder::default().decode(text, classes, confidences)
}

/// Picks the highest-confidence run for every named field.
///
/// Earlier runs win ties. The chosen value is trimmed and any tab or line
/// break inside it becomes a space. Fields without a run come back empty with
/// zero confidence, so the output always lists every name in order.
pub fn best_per_field(results: &[FieldResult], field_names: &[String]) -> Vec<ExtractedField> {
    field_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let class = i + 1;
            let best = results
                .iter()
                .filter(|r| r.class == class)
                .fold(None::<&FieldResult>, |best, r| match best {
                    Some(b) if b.confidence >= r.confidence => Some(b),
                    _ => Some(r),
                });
            match best {
                Some(r) => ExtractedField {
                    name: name.clone(),
                    value: r
                        .value
                        .trim()
                        .chars()
                        .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
                        .collect(),
                    confidence: r.confidence,
                },
                None => ExtractedField {
                    name: name.clone(),
                    value: String::new(),
                    confidence: 0.0,
                },
            }
        })
        .collect()
}
