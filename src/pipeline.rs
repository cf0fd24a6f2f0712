//! Inference pipeline.
//!
//! boxes → linearized text → vocabulary indices → tagger → per-character
//! prediction → field spans → one value per field.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::document::{LinearDocument, TextBox};
use crate::inference::{
    best_per_field, ExtractedField, FieldResult, InferenceError, Prediction, SequenceTagger,
    SpanDecoder, Vocabulary,
};
use crate::utils::config::AppConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// The linearized document the prediction was made on.
    pub text: String,
    /// Every decoded run, left to right.
    pub runs: Vec<FieldResult>,
    /// Highest-confidence run per configured field.
    pub fields: Vec<ExtractedField>,
}

pub struct Extractor {
    tagger: Box<dyn SequenceTagger>,
    vocabulary: Vocabulary,
    decoder: SpanDecoder,
}

impl Extractor {
    pub fn new(tagger: Box<dyn SequenceTagger>, vocabulary: Vocabulary, decoder: SpanDecoder) -> Self {
        Self {
            tagger,
            vocabulary,
            decoder,
        }
    }

    /// Builds an extractor over the receipt vocabulary, naming and aggregating
    /// spans as `config` says.
    pub fn from_config(tagger: Box<dyn SequenceTagger>, config: &AppConfig) -> Self {
        let decoder = SpanDecoder::new(config.aggregation).with_field_names(config.field_names.clone());
        Self::new(tagger, Vocabulary::receipt().clone(), decoder)
    }

    pub fn field_names(&self) -> &[String] {
        self.decoder.field_names()
    }

    /// Linearizes `boxes` and extracts fields from the result.
    pub fn extract(&self, boxes: Vec<TextBox>) -> Result<ExtractionResult, InferenceError> {
        let document = LinearDocument::from_boxes(boxes);
        self.extract_text(document.text())
    }

    /// Extracts fields from an already linearized document.
    ///
    /// # Errors
    ///
    /// [`InferenceError::UnknownCharacter`] if the text leaves the vocabulary,
    /// [`InferenceError::ShapeMismatch`] if the tagger returns the wrong number
    /// of rows, or whatever the tagger itself reports.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn extract_text(&self, text: &str) -> Result<ExtractionResult, InferenceError> {
        let indices = self.vocabulary.encode(text)?;

        let prediction = if indices.is_empty() {
            Prediction::default()
        } else {
            let probabilities = self.tagger.tag(&indices)?;
            if probabilities.nrows() != indices.len() {
                return Err(InferenceError::ShapeMismatch {
                    expected: indices.len(),
                    actual: probabilities.nrows(),
                });
            }
            Prediction::from_probabilities(probabilities.view())
        };

        let runs = self
            .decoder
            .decode(text, &prediction.classes, &prediction.confidences);
        let fields = best_per_field(&runs, self.decoder.field_names());
        debug!(runs = runs.len(), "extracted fields");

        Ok(ExtractionResult {
            text: text.to_string(),
            runs,
            fields,
        })
    }
}
