use docfields::inference::{
    best_per_field, decode, softmax_rows, Aggregation, InferenceError, Prediction, SpanDecoder,
    Vocabulary, RECEIPT_ALPHABET,
};
use ndarray::array;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_decode_two_fields() {
    let results = decode(
        "ABCDEFGHI",
        &[0, 0, 1, 1, 1, 0, 2, 2, 0],
        &[0.9, 0.9, 0.8, 0.6, 0.7, 0.9, 0.5, 0.7, 0.9],
    );

    assert_eq!(results.len(), 2);

    assert_eq!(results[0].class, 1);
    assert_eq!(results[0].value, "CDE");
    assert_eq!((results[0].start, results[0].end), (2, 5));
    assert!((results[0].confidence - 0.7).abs() < 1e-6);

    assert_eq!(results[1].class, 2);
    assert_eq!(results[1].value, "GH");
    assert_eq!((results[1].start, results[1].end), (6, 8));
    assert!((results[1].confidence - 0.6).abs() < 1e-6);
}

#[test]
fn test_decode_does_not_merge_separated_runs() {
    let results = decode("AB CD", &[1, 1, 0, 1, 1], &[1.0; 5]);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.class == 1));
    assert_eq!(results[0].value, "AB");
    assert_eq!(results[1].value, "CD");
}

#[test]
fn test_adjacent_different_classes_split() {
    let results = decode("ABCD", &[1, 1, 2, 2], &[1.0; 4]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].end, results[1].start);
}

#[test]
fn test_run_at_document_end() {
    let results = decode("AB", &[0, 3], &[0.5, 0.25]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value, "B");
    assert_eq!(results[0].end, 2);
}

#[test]
fn test_decode_empty_and_background_only() {
    assert!(decode("", &[], &[]).is_empty());
    assert!(decode("ABC", &[0, 0, 0], &[0.1, 0.2, 0.3]).is_empty());
}

#[test]
fn test_decode_names_classes() {
    let decoder = SpanDecoder::new(Aggregation::Mean).with_field_names(["company", "date"]);
    let results = decoder.decode("X Y", &[2, 0, 1], &[1.0; 3]);

    assert_eq!(results[0].name.as_deref(), Some("date"));
    assert_eq!(results[1].name.as_deref(), Some("company"));
}

#[test]
#[should_panic(expected = "prediction length does not match document length")]
fn test_decode_length_mismatch_panics() {
    decode("ABC", &[0, 1], &[0.5, 0.5]);
}

#[test]
fn test_best_per_field_picks_highest_confidence() {
    let field_names = names(&["company", "total"]);
    let decoder = SpanDecoder::default().with_field_names(field_names.clone());
    let text = "9.00\nTOTAL 12.00 ";
    let classes = [2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 2, 2];
    let confidences = [
        0.4, 0.4, 0.4, 0.4, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9,
    ];

    let results = decoder.decode(text, &classes, &confidences);
    let fields = best_per_field(&results, &field_names);

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "company");
    assert_eq!(fields[0].value, "");
    assert_eq!(fields[0].confidence, 0.0);
    assert_eq!(fields[1].name, "total");
    assert_eq!(fields[1].value, "12.00");
}

#[test]
fn test_best_per_field_cleans_whitespace_and_prefers_first_on_tie() {
    let field_names = names(&["address"]);
    let results = decode("NO 5\nJALAN X Y", &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 0], &[0.5; 14]);

    assert_eq!(results.len(), 2);
    let fields = best_per_field(&results, &field_names);
    assert_eq!(fields[0].value, "NO 5 JALAN");
}

#[test]
fn test_vocabulary_round_trip() {
    let vocab = Vocabulary::receipt();
    let text = "TOTAL: RM 12.00\nTHANK YOU!";

    let indices = vocab.encode(text).unwrap();
    assert_eq!(indices.len(), text.chars().count());
    assert_eq!(vocab.decode(&indices).unwrap(), text);
}

#[test]
fn test_vocabulary_is_fixed() {
    let vocab = Vocabulary::receipt();
    assert_eq!(vocab.len(), RECEIPT_ALPHABET.chars().count());
    assert_eq!(vocab.index_of('A', 0).unwrap(), 0);
    assert_eq!(vocab.index_of('0', 0).unwrap(), 26);
    assert!(vocab.contains('\t'));
}

#[test]
fn test_vocabulary_rejects_unknown_character() {
    let vocab = Vocabulary::receipt();

    match vocab.encode("TOTAL total") {
        Err(InferenceError::UnknownCharacter {
            character,
            position,
        }) => {
            assert_eq!(character, 't');
            assert_eq!(position, 6);
        }
        other => panic!("expected UnknownCharacter, got {other:?}"),
    }
    assert!(vocab.check("CAFÉ").is_err());
    assert!(matches!(
        vocab.decode(&[-1]),
        Err(InferenceError::UnknownIndex { index: -1 })
    ));
}

#[test]
fn test_prediction_from_logits() {
    let mut scores = array![[2.0_f32, 0.0, 0.0], [0.0, 0.0, 5.0]];
    softmax_rows(&mut scores);
    let prediction = Prediction::from_probabilities(scores.view());

    assert_eq!(prediction.classes, vec![0, 2]);
    assert!(prediction.confidences[1] > 0.95);
    let row_sum: f32 = scores.row(0).sum();
    assert!((row_sum - 1.0).abs() < 1e-5);
}
