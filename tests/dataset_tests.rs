use docfields::dataset::{pad_right_batch, split_train_validation, Corpus, Dataset, DatasetError};
use docfields::inference::Vocabulary;
use docfields::labeling::{AlignmentError, LabelAligner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RECEIPT_OCR: &str = "\
72,25,326,25,326,64,72,64,BOOK TA .K(TAMAN DAYA) SDN BHD
50,82,440,82,440,121,50,121,DATE: 25/12/2018
10,200,80,200,80,220,10,220,TOTAL
300,200,360,200,360,220,300,220,9.00
";

const RECEIPT_KEY: &str = r#"{
    "company": "BOOK TA .K(TAMAN DAYA) SDN BHD",
    "date": "25/12/2018",
    "total": "9.00"
}"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_load_dir_pairs_by_key() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.txt", RECEIPT_OCR);
    write(dir.path(), "b.json", RECEIPT_KEY);
    write(dir.path(), "a.txt", RECEIPT_OCR);
    write(dir.path(), "a.json", RECEIPT_KEY);
    write(dir.path(), "notes.md", "ignored");

    let corpus = Corpus::load_dir(dir.path()).unwrap();

    let keys: Vec<_> = corpus.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_load_dir_rejects_unpaired_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", RECEIPT_OCR);

    let result = Corpus::load_dir(dir.path());
    assert!(matches!(result, Err(DatasetError::UnpairedFile { .. })));

    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", RECEIPT_KEY);
    let result = Corpus::load_dir(dir.path());
    assert!(matches!(result, Err(DatasetError::UnpairedFile { .. })));
}

#[test]
fn test_prepare_aligns_and_skips_failures() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.txt", RECEIPT_OCR);
    write(dir.path(), "good.json", RECEIPT_KEY);
    write(dir.path(), "missing.txt", RECEIPT_OCR);
    write(
        dir.path(),
        "missing.json",
        r#"{"company": "SOMETHING ELSE ENTIRELY LTD"}"#,
    );
    write(
        dir.path(),
        "lower.txt",
        "72,25,326,25,326,64,72,64,Book Shop\n",
    );
    write(dir.path(), "lower.json", r#"{"company": "Book Shop"}"#);

    let corpus = Corpus::load_dir(dir.path()).unwrap();
    let prepared = corpus.prepare(&LabelAligner::default(), Vocabulary::receipt());

    assert_eq!(prepared.examples.len(), 1);
    let example = &prepared.examples[0];
    assert_eq!(example.key, "good");
    assert_eq!(example.labels.len(), example.text.chars().count());
    assert!(example.text.starts_with("BOOK TA .K(TAMAN DAYA) SDN BHD\n"));
    assert!(example.labels[..30].iter().all(|&c| c == 1));
    assert_eq!(example.labels[30], 0);

    let skipped: Vec<_> = prepared.skipped.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(skipped, vec!["lower", "missing"]);
    assert!(matches!(
        prepared.skipped[0].error,
        DatasetError::Encoding { .. }
    ));
    match &prepared.skipped[1].error {
        DatasetError::Alignment {
            source: AlignmentError::AlignmentFailure { field, document },
        } => {
            assert_eq!(field, "company");
            assert_eq!(document, "missing");
        }
        other => panic!("expected alignment failure, got {other:?}"),
    }
}

#[test]
fn test_unlabelled_texts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x.txt", RECEIPT_OCR);

    let texts = Corpus::load_unlabelled_dir(dir.path())
        .unwrap()
        .texts()
        .unwrap();

    assert_eq!(
        texts["x"],
        "BOOK TA .K(TAMAN DAYA) SDN BHD\nDATE: 25/12/2018\nTOTAL 9.00"
    );
}

#[test]
fn test_dataset_save_and_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", RECEIPT_OCR);
    write(dir.path(), "a.json", RECEIPT_KEY);
    write(dir.path(), "b.txt", RECEIPT_OCR);
    write(dir.path(), "b.json", RECEIPT_KEY);

    let prepared = Corpus::load_dir(dir.path())
        .unwrap()
        .prepare(&LabelAligner::default(), Vocabulary::receipt());
    let dataset = split_train_validation(prepared.examples, 1, 0);

    let path = dir.path().join("out").join("dataset.json");
    dataset.save(&path).unwrap();
    let loaded = Dataset::load(&path).unwrap();

    assert_eq!(loaded, dataset);
    assert_eq!(loaded.train.len(), 1);
    assert_eq!(loaded.validation.len(), 1);

    let batch = pad_right_batch(&loaded.train, Vocabulary::receipt()).unwrap();
    assert_eq!(batch.size(), 1);
    assert_eq!(batch.max_len(), loaded.train[0].text.chars().count());
}

#[test]
fn test_dataset_load_rejects_bad_labels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dataset.json");
    fs::write(
        &path,
        r#"{"train": [{"key": "a", "text": "AB", "labels": [0]}], "validation": []}"#,
    )
    .unwrap();

    assert!(matches!(
        Dataset::load(&path),
        Err(DatasetError::LabelLength { text: 2, labels: 1 })
    ));
}
