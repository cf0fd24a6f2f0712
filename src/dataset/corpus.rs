//! Raw corpus discovery and preparation.
//!
//! A labelled corpus is a directory of `<key>.txt` OCR dumps, each paired
//! with a `<key>.json` key-info object. Preparation linearizes every dump and
//! aligns its key info; a document that fails is recorded and skipped so the
//! rest of the corpus still comes through.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::dataset::error::DatasetError;
use crate::dataset::store::TrainingExample;
use crate::document::{linearize, read_boxes};
use crate::inference::Vocabulary;
use crate::labeling::{parse_key_info, LabelAligner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub key: String,
    pub ocr_path: PathBuf,
    pub key_info_path: Option<PathBuf>,
}

/// A document that could not be prepared, and why.
#[derive(Debug)]
pub struct SkippedDocument {
    pub key: String,
    pub error: DatasetError,
}

#[derive(Debug, Default)]
pub struct PreparedCorpus {
    pub examples: Vec<TrainingExample>,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

/// Files in `dir` with extension `ext`, keyed and sorted by file stem.
fn files_with_extension(dir: &Path, ext: &str) -> Result<BTreeMap<String, PathBuf>, DatasetError> {
    let io_error = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = BTreeMap::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.insert(stem.to_string(), path);
        }
    }
    Ok(files)
}

impl Corpus {
    /// Pairs every `.txt` in `dir` with the `.json` of the same stem.
    ///
    /// # Errors
    ///
    /// [`DatasetError::UnpairedFile`] for the first file, in key order, that
    /// lacks its partner.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let ocr_files = files_with_extension(dir, "txt")?;
        let mut key_info_files = files_with_extension(dir, "json")?;

        let mut entries = Vec::with_capacity(ocr_files.len());
        for (key, ocr_path) in ocr_files {
            let key_info_path = key_info_files
                .remove(&key)
                .ok_or_else(|| DatasetError::UnpairedFile {
                    path: ocr_path.clone(),
                })?;
            entries.push(CorpusEntry {
                key,
                ocr_path,
                key_info_path: Some(key_info_path),
            });
        }

        if let Some(path) = key_info_files.into_values().next() {
            return Err(DatasetError::UnpairedFile { path });
        }

        info!(dir = %dir.display(), documents = entries.len(), "loaded labelled corpus");
        Ok(Self { entries })
    }

    /// Collects every `.txt` in `dir`, ignoring key info.
    pub fn load_unlabelled_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let entries: Vec<CorpusEntry> = files_with_extension(dir, "txt")?
            .into_iter()
            .map(|(key, ocr_path)| CorpusEntry {
                key,
                ocr_path,
                key_info_path: None,
            })
            .collect();

        info!(dir = %dir.display(), documents = entries.len(), "loaded unlabelled corpus");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linearized text for every document, by key.
    pub fn texts(&self) -> Result<BTreeMap<String, String>, DatasetError> {
        self.entries
            .iter()
            .map(|entry| -> Result<_, DatasetError> {
                Ok((entry.key.clone(), linearize(read_boxes(&entry.ocr_path)?)))
            })
            .collect()
    }

    /// Linearizes and aligns every labelled document.
    ///
    /// Documents without key info, with text outside `vocabulary`, or with a
    /// field the aligner cannot place end up in
    /// [`PreparedCorpus::skipped`]; nothing here aborts the whole corpus.
    #[instrument(skip_all, fields(documents = self.entries.len()))]
    pub fn prepare(&self, aligner: &LabelAligner, vocabulary: &Vocabulary) -> PreparedCorpus {
        let mut prepared = PreparedCorpus::default();
        for entry in &self.entries {
            match prepare_entry(entry, aligner, vocabulary) {
                Ok(example) => prepared.examples.push(example),
                Err(error) => {
                    warn!(key = %entry.key, error = %error, "skipping document");
                    prepared.skipped.push(SkippedDocument {
                        key: entry.key.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            prepared = prepared.examples.len(),
            skipped = prepared.skipped.len(),
            "corpus prepared"
        );
        prepared
    }
}

fn prepare_entry(
    entry: &CorpusEntry,
    aligner: &LabelAligner,
    vocabulary: &Vocabulary,
) -> Result<TrainingExample, DatasetError> {
    let key_info_path = entry
        .key_info_path
        .as_ref()
        .ok_or_else(|| DatasetError::UnpairedFile {
            path: entry.ocr_path.clone(),
        })?;
    let key_info = fs::read_to_string(key_info_path).map_err(|source| DatasetError::Io {
        path: key_info_path.clone(),
        source,
    })?;
    let fields = parse_key_info(&key_info).map_err(|source| DatasetError::KeyInfoParse {
        path: key_info_path.clone(),
        source,
    })?;

    let text = linearize(read_boxes(&entry.ocr_path)?);
    vocabulary.check(&text)?;
    let labels = aligner.align(&entry.key, &text, &fields)?;

    Ok(TrainingExample {
        key: entry.key.clone(),
        text,
        labels,
    })
}
