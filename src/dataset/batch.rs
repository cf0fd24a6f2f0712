//! Time-major batches for the tagger.
//!
//! Both layouts are `(max_len, batch)`: row `t` holds position `t` of every
//! document in the batch.

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::error::DatasetError;
use crate::dataset::store::TrainingExample;
use crate::inference::Vocabulary;
use crate::labeling::BACKGROUND;

const PAD_CHAR: char = ' ';

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub keys: Vec<String>,
    /// Vocabulary indices, `(max_len, batch)`.
    pub text: Array2<i64>,
    /// Class ids, `(max_len, batch)`.
    pub labels: Array2<i64>,
}

impl Batch {
    pub fn max_len(&self) -> usize {
        self.text.nrows()
    }

    pub fn size(&self) -> usize {
        self.text.ncols()
    }
}

/// Encodes one document as a `(len, 1)` column, the shape used at inference.
pub fn encode_document(text: &str, vocabulary: &Vocabulary) -> Result<Array2<i64>, DatasetError> {
    let indices = vocabulary.encode(text)?;
    Ok(Array1::from(indices).insert_axis(Axis(1)))
}

struct Encoded<'a> {
    key: &'a str,
    indices: Vec<i64>,
    labels: Vec<i64>,
}

fn encode_examples<'a>(
    examples: &'a [TrainingExample],
    vocabulary: &Vocabulary,
) -> Result<(Vec<Encoded<'a>>, usize), DatasetError> {
    if examples.is_empty() {
        return Err(DatasetError::EmptyBatch);
    }

    let mut encoded = Vec::with_capacity(examples.len());
    for example in examples {
        example.validate()?;
        encoded.push(Encoded {
            key: &example.key,
            indices: vocabulary.encode(&example.text)?,
            labels: example.labels.iter().map(|&c| c as i64).collect(),
        });
    }
    let max_len = encoded.iter().map(|e| e.indices.len()).max().unwrap_or(0);
    Ok((encoded, max_len))
}

/// Right-pads every document with spaces and background labels.
///
/// # Errors
///
/// [`DatasetError::EmptyBatch`] for no examples, [`DatasetError::LabelLength`]
/// for an example whose labels do not cover its text, and
/// [`DatasetError::Encoding`] for characters outside `vocabulary`.
pub fn pad_right_batch(
    examples: &[TrainingExample],
    vocabulary: &Vocabulary,
) -> Result<Batch, DatasetError> {
    let (encoded, max_len) = encode_examples(examples, vocabulary)?;
    let pad = vocabulary.index_of(PAD_CHAR, 0)? as i64;

    let mut text = Array2::from_elem((max_len, encoded.len()), pad);
    let mut labels = Array2::from_elem((max_len, encoded.len()), BACKGROUND as i64);
    for (column, document) in encoded.iter().enumerate() {
        for (row, (&index, &label)) in document.indices.iter().zip(&document.labels).enumerate() {
            text[[row, column]] = index;
            labels[[row, column]] = label;
        }
    }

    Ok(Batch {
        keys: encoded.iter().map(|e| e.key.to_string()).collect(),
        text,
        labels,
    })
}

/// Places each document at a random offset within the batch length and fills
/// the surrounding positions with random vocabulary characters labelled as
/// background.
pub fn robust_pad_batch<R: Rng>(
    examples: &[TrainingExample],
    vocabulary: &Vocabulary,
    rng: &mut R,
) -> Result<Batch, DatasetError> {
    let (encoded, max_len) = encode_examples(examples, vocabulary)?;
    let alphabet = vocabulary.len() as i64;

    let mut text = Array2::from_shape_simple_fn((max_len, encoded.len()), || {
        rng.gen_range(0..alphabet.max(1))
    });
    let mut labels = Array2::from_elem((max_len, encoded.len()), BACKGROUND as i64);
    for (column, document) in encoded.iter().enumerate() {
        let offset = rng.gen_range(0..=max_len - document.indices.len());
        for (i, (&index, &label)) in document.indices.iter().zip(&document.labels).enumerate() {
            text[[offset + i, column]] = index;
            labels[[offset + i, column]] = label;
        }
    }

    Ok(Batch {
        keys: encoded.iter().map(|e| e.key.to_string()).collect(),
        text,
        labels,
    })
}

/// Draws `batch_size` examples without replacement (all of them if fewer) and
/// pads them with [`robust_pad_batch`].
pub fn sample_batch<R: Rng>(
    examples: &[TrainingExample],
    batch_size: usize,
    vocabulary: &Vocabulary,
    rng: &mut R,
) -> Result<Batch, DatasetError> {
    let chosen: Vec<TrainingExample> = examples
        .choose_multiple(rng, batch_size)
        .cloned()
        .collect();
    robust_pad_batch(&chosen, vocabulary, rng)
}
