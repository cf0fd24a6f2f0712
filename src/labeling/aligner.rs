//! Weak-label alignment.
//!
//! Given a linearized document and the values its fields are known to take,
//! the aligner finds where each value occurs and writes the field's class id
//! over those characters.

use tracing::{debug, instrument};

use crate::document::linearize::normalize_whitespace;
use crate::labeling::error::AlignmentError;
use crate::labeling::field::{class_of, FieldSpec, LabelArray, BACKGROUND};
use crate::labeling::matchers::{MatchStrategy, Span};

/// Default name of the field that gets context-aware matching.
pub const TOTAL_FIELD: &str = "total";

/// Where a field value was found and which rung of its ladder found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub strategy: MatchStrategy,
    /// Character range `[start, end)` in the document.
    pub chars: Span,
}

#[derive(Debug, Clone)]
pub struct LabelAligner {
    total_field: String,
    total_ladder: Vec<MatchStrategy>,
    field_ladder: Vec<MatchStrategy>,
}

impl Default for LabelAligner {
    fn default() -> Self {
        Self {
            total_field: TOTAL_FIELD.to_string(),
            total_ladder: MatchStrategy::TOTAL_LADDER.to_vec(),
            field_ladder: MatchStrategy::FIELD_LADDER.to_vec(),
        }
    }
}

impl LabelAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `name` instead of `"total"` as the context-matched field.
    #[must_use]
    pub fn with_total_field(mut self, name: impl Into<String>) -> Self {
        self.total_field = name.into();
        self
    }

    fn ladder_for(&self, field: &FieldSpec) -> &[MatchStrategy] {
        if field.name == self.total_field {
            &self.total_ladder
        } else {
            &self.field_ladder
        }
    }

    /// Locates one field in the whitespace-normalised text.
    ///
    /// Returns `Ok(None)` when no rung of the field's ladder matches.
    pub fn locate(
        &self,
        normalized: &str,
        field: &FieldSpec,
    ) -> Result<Option<Alignment>, AlignmentError> {
        for &strategy in self.ladder_for(field) {
            let found = strategy
                .find(normalized, &field.expected_value)
                .map_err(|source| AlignmentError::InvalidPattern {
                    field: field.name.clone(),
                    source,
                })?;
            if let Some(bytes) = found {
                let start = normalized[..bytes.start].chars().count();
                let end = start + normalized[bytes.clone()].chars().count();
                return Ok(Some(Alignment {
                    strategy,
                    chars: start..end,
                }));
            }
        }
        Ok(None)
    }

    /// Builds the label array for one document.
    ///
    /// Fields are written in declaration order and later writes are
    /// unconditional, so where two spans overlap the later field wins.
    ///
    /// # Errors
    ///
    /// [`AlignmentError::AlignmentFailure`] names the first field that no
    /// strategy could place; `document_key` is carried for reporting.
    #[instrument(skip(self, text, fields), fields(document = document_key, field_count = fields.len()))]
    pub fn align(
        &self,
        document_key: &str,
        text: &str,
        fields: &[FieldSpec],
    ) -> Result<LabelArray, AlignmentError> {
        let normalized = normalize_whitespace(text);
        let mut labels: LabelArray = vec![BACKGROUND; normalized.chars().count()];

        for (index, field) in fields.iter().enumerate() {
            let alignment = self.locate(&normalized, field)?.ok_or_else(|| {
                AlignmentError::AlignmentFailure {
                    field: field.name.clone(),
                    document: document_key.to_string(),
                }
            })?;

            debug!(
                field = %field.name,
                strategy = ?alignment.strategy,
                start = alignment.chars.start,
                end = alignment.chars.end,
                "aligned field"
            );

            labels[alignment.chars].fill(class_of(index));
        }

        Ok(labels)
    }
}

/// Aligns `fields` against `text` with the default ladders.
pub fn align(
    document_key: &str,
    text: &str,
    fields: &[FieldSpec],
) -> Result<LabelArray, AlignmentError> {
    LabelAligner::default().align(document_key, text, fields)
}
