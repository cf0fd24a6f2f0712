//! Character vocabulary.
//!
//! The tagger consumes integer indices, one per document character. The
//! mapping is fixed and total over its alphabet; anything else is an error
//! rather than a silent fallback, since a stray index would be
//! indistinguishable from a real character downstream.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::inference::error::InferenceError;

/// Uppercase letters, digits, ASCII punctuation, then space, tab and newline.
pub const RECEIPT_ALPHABET: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    " \t\n",
);

static RECEIPT_VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| Vocabulary::new(RECEIPT_ALPHABET));

#[derive(Debug, Clone)]
pub struct Vocabulary {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered alphabet. Repeated characters keep
    /// their first index.
    pub fn new(alphabet: &str) -> Self {
        let mut chars = Vec::new();
        let mut index = HashMap::new();
        for c in alphabet.chars() {
            if let std::collections::hash_map::Entry::Vacant(entry) = index.entry(c) {
                entry.insert(chars.len());
                chars.push(c);
            }
        }
        Self { chars, index }
    }

    /// The receipt alphabet used for training and inference.
    pub fn receipt() -> &'static Vocabulary {
        &RECEIPT_VOCABULARY
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Index of `c`; `position` is only used for the error report.
    pub fn index_of(&self, c: char, position: usize) -> Result<usize, InferenceError> {
        self.index
            .get(&c)
            .copied()
            .ok_or(InferenceError::UnknownCharacter {
                character: c,
                position,
            })
    }

    pub fn char_at(&self, index: i64) -> Result<char, InferenceError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chars.get(i).copied())
            .ok_or(InferenceError::UnknownIndex { index })
    }

    /// Encodes every character of `text`, failing on the first unknown one.
    pub fn encode(&self, text: &str) -> Result<Vec<i64>, InferenceError> {
        text.chars()
            .enumerate()
            .map(|(position, c)| self.index_of(c, position).map(|i| i as i64))
            .collect()
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(&self, indices: &[i64]) -> Result<String, InferenceError> {
        indices.iter().map(|&i| self.char_at(i)).collect()
    }

    /// Fails with the first character of `text` outside the vocabulary.
    pub fn check(&self, text: &str) -> Result<(), InferenceError> {
        match text.chars().enumerate().find(|(_, c)| !self.contains(*c)) {
            Some((position, character)) => Err(InferenceError::UnknownCharacter {
                character,
                position,
            }),
            None => Ok(()),
        }
    }
}
