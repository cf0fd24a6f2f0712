use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::document::{parse_boxes, DocumentError, TextBox};
use crate::pipeline::ExtractionResult;

/// Maximum number of documents accepted in one request
pub const MAX_DOCUMENTS: usize = 256;

/// Maximum size of a single raw OCR dump (4 MB)
const MAX_OCR_TEXT_BYTES: usize = 4 * 1024 * 1024;

const MAX_KEY_LENGTH: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub documents: Vec<DocumentInput>,
}

/// One receipt, given either as structured boxes or as a raw box-line dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<TextBox>>,

    /// `x1,y1,...,x4,y4,text` lines, one box per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

impl ExtractRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.documents.is_empty() {
            return Err(ValidationError::NoDocuments);
        }
        if self.documents.len() > MAX_DOCUMENTS {
            return Err(ValidationError::TooManyDocuments {
                count: self.documents.len(),
                max: MAX_DOCUMENTS,
            });
        }
        self.documents.iter().try_for_each(DocumentInput::validate)
    }
}

impl DocumentInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(ValidationError::KeyTooLong);
        }

        match (&self.boxes, &self.ocr_text) {
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousInput {
                key: key.to_string(),
            }),
            (None, None) => Err(ValidationError::MissingInput {
                key: key.to_string(),
            }),
            (None, Some(text)) if text.len() > MAX_OCR_TEXT_BYTES => {
                Err(ValidationError::OcrTextTooLarge {
                    key: key.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn sanitized_key(&self) -> String {
        self.key.trim().to_string()
    }

    /// The document's boxes, parsed from `ocr_text` if that is what was sent.
    /// Structured boxes are checked for corner order.
    pub fn into_boxes(self) -> Result<Vec<TextBox>, DocumentError> {
        match (self.boxes, self.ocr_text) {
            (Some(boxes), _) => {
                for text_box in &boxes {
                    text_box.validate()?;
                }
                Ok(boxes)
            }
            (None, Some(text)) => parse_boxes(&text),
            (None, None) => Ok(Vec::new()),
        }
    }
}

/// Per-document outcome. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn success(key: String, result: ExtractionResult) -> Self {
        Self {
            key,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(key: String, error: impl std::fmt::Display) -> Self {
        Self {
            key,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub status: String,
    pub documents: Vec<DocumentResult>,
}

impl ExtractResponse {
    pub fn success(documents: Vec<DocumentResult>) -> Self {
        Self {
            status: "success".to_string(),
            documents,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub fields: Vec<String>,
}

impl HealthResponse {
    pub fn ok(fields: &[String]) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            fields: fields.to_vec(),
        }
    }
}
