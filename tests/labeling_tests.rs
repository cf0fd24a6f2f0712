use docfields::labeling::{
    align, parse_key_info, AlignmentError, FieldSpec, LabelAligner, MatchStrategy, BACKGROUND,
};

fn fields(pairs: &[(&str, &str)]) -> Vec<FieldSpec> {
    pairs
        .iter()
        .map(|(name, value)| FieldSpec::new(*name, *value))
        .collect()
}

/// Character ranges carrying `class`, as `(start, end)` pairs.
fn runs_of(labels: &[usize], class: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &label) in labels.iter().enumerate() {
        match (label == class, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, labels.len()));
    }
    runs
}

#[test]
fn test_exact_match_labels_company() {
    let text = "TAN WOON YANN\nBOOK TA .K(TAMAN DAYA) SDN BND";
    let labels = align(
        "X51005200938",
        text,
        &fields(&[("company", "BOOK TA .K(TAMAN DAYA) SDN BND")]),
    )
    .unwrap();

    assert_eq!(labels.len(), text.chars().count());
    assert_eq!(runs_of(&labels, 1), vec![(14, 44)]);
}

#[test]
fn test_total_between_total_and_round() {
    let text = "SUBTOTAL 10.00 TOTAL 12.00 ROUND 12.00";
    let labels = align("doc", text, &fields(&[("total", "12.00")])).unwrap();

    assert_eq!(runs_of(&labels, 1), vec![(21, 26)]);
}

#[test]
fn test_total_strategy_is_reported() {
    let aligner = LabelAligner::new();
    let total = FieldSpec::new("total", "12.00");

    let alignment = aligner
        .locate("SUBTOTAL 10.00 TOTAL 12.00 ROUND 12.00", &total)
        .unwrap()
        .unwrap();
    assert_eq!(alignment.strategy, MatchStrategy::TotalBeforeRound);
    assert_eq!(alignment.chars, 21..26);

    let alignment = aligner.locate("TOTAL 9.00 CASH 10.00", &total).unwrap();
    assert!(alignment.is_none());

    let nine = FieldSpec::new("total", "9.00");
    let alignment = aligner
        .locate("TOTAL 9.00 CASH 10.00", &nine)
        .unwrap()
        .unwrap();
    assert_eq!(alignment.strategy, MatchStrategy::AfterTotal);
    assert_eq!(alignment.chars, 6..10);
}

#[test]
fn test_total_falls_back_to_word_boundary_then_substring() {
    let aligner = LabelAligner::new();
    let total = FieldSpec::new("total", "9.00");

    let alignment = aligner.locate("AMOUNT 9.00", &total).unwrap().unwrap();
    assert_eq!(alignment.strategy, MatchStrategy::WordBounded);
    assert_eq!(alignment.chars, 7..11);

    let alignment = aligner.locate("RM19.00", &total).unwrap().unwrap();
    assert_eq!(alignment.strategy, MatchStrategy::Substring);
    assert_eq!(alignment.chars, 3..7);
}

#[test]
fn test_total_across_line_break() {
    let text = "TOTAL\n12.00 ROUND";
    let labels = align("doc", text, &fields(&[("total", "12.00")])).unwrap();

    assert_eq!(runs_of(&labels, 1), vec![(6, 11)]);
}

#[test]
fn test_offsets_are_characters_not_bytes() {
    let text = "É TOTAL 3.00 ROUND";
    let labels = align("doc", text, &fields(&[("total", "3.00")])).unwrap();

    assert_eq!(labels.len(), 18);
    assert_eq!(runs_of(&labels, 1), vec![(8, 12)]);
}

#[test]
fn test_later_field_overwrites_earlier() {
    let text = "NO.53 55,57 JALAN";
    let labels = align(
        "doc",
        text,
        &fields(&[("address", "NO.53 55,57"), ("unit", "55")]),
    )
    .unwrap();

    assert_eq!(runs_of(&labels, 1), vec![(0, 6), (8, 11)]);
    assert_eq!(runs_of(&labels, 2), vec![(6, 8)]);
    assert_eq!(labels[11], BACKGROUND);
}

#[test]
fn test_fuzzy_match_tolerates_ocr_error() {
    let aligner = LabelAligner::new();
    let company = FieldSpec::new("company", "SANYU STATIONERY SH0P");

    let alignment = aligner
        .locate("COMPANY: SANYU STATIONERY SHOP", &company)
        .unwrap()
        .unwrap();

    assert_eq!(alignment.strategy, MatchStrategy::Fuzzy { max_edits: 1 });
    assert_eq!(alignment.chars, 9..30);
}

#[test]
fn test_field_ladder_steps() {
    let aligner = LabelAligner::new();
    let text = "COMPANY: SANYU STATIONERY SHOP";
    let locate = |value: &str| {
        aligner
            .locate(text, &FieldSpec::new("company", value))
            .unwrap()
    };

    let exact = locate("SANYU STATIONERY SHOP").unwrap();
    assert_eq!(exact.strategy, MatchStrategy::Exact);
    assert_eq!(exact.chars, 9..30);

    let two_edits = locate("SANYU STATIONARY SH0P").unwrap();
    assert_eq!(two_edits.strategy, MatchStrategy::Fuzzy { max_edits: 2 });
    assert_eq!(two_edits.chars, 9..30);

    let three_edits = locate("SANYU STAT1ONARY SH0P").unwrap();
    assert_eq!(three_edits.strategy, MatchStrategy::Fuzzy { max_edits: 3 });
    assert_eq!(three_edits.chars, 9..30);

    assert!(locate("5ANYU STAT1ONARY SH0P").is_none());
}

#[test]
fn test_four_edits_fail_alignment() {
    let result = align(
        "X51005337867",
        "COMPANY: SANYU STATIONERY SHOP",
        &fields(&[("company", "5ANYU STAT1ONARY SH0P")]),
    );
    assert!(matches!(
        result,
        Err(AlignmentError::AlignmentFailure { .. })
    ));
}

#[test]
fn test_unplaceable_field_fails_document() {
    let result = align(
        "X51006414631",
        "ABC",
        &fields(&[("company", "ABC"), ("address", "GRAND HOTEL")]),
    );

    match result {
        Err(AlignmentError::AlignmentFailure { field, document }) => {
            assert_eq!(field, "address");
            assert_eq!(document, "X51006414631");
        }
        other => panic!("expected AlignmentFailure, got {other:?}"),
    }
}

#[test]
fn test_empty_document() {
    assert_eq!(align("doc", "", &[]).unwrap(), Vec::<usize>::new());

    let result = align("doc", "", &fields(&[("company", "SHOP")]));
    assert_eq!(result.unwrap_err().field(), "company");
}

#[test]
fn test_regex_metacharacters_are_literal() {
    let text = "TOTAL (RM) 1+1.00 ROUND";
    let labels = align("doc", text, &fields(&[("total", "1+1.00")])).unwrap();

    assert_eq!(runs_of(&labels, 1), vec![(11, 17)]);
}

#[test]
fn test_custom_total_field_name() {
    let aligner = LabelAligner::new().with_total_field("amount");
    let amount = FieldSpec::new("amount", "12.00");

    let alignment = aligner
        .locate("SUBTOTAL 10.00 TOTAL 12.00 ROUND 12.00", &amount)
        .unwrap()
        .unwrap();
    assert_eq!(alignment.strategy, MatchStrategy::TotalBeforeRound);
}

#[test]
fn test_parse_key_info_keeps_order() {
    let json = r#"{
        "company": "BOOK TA .K(TAMAN DAYA) SDN BHD",
        "date": "25/12/2018",
        "address": "NO.53 55,57 & 59, JALAN SAGU 18, TAMAN DAYA",
        "total": "9.00"
    }"#;

    let specs = parse_key_info(json).unwrap();
    let names: Vec<_> = specs.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(names, vec!["company", "date", "address", "total"]);
    assert_eq!(specs[3].expected_value, "9.00");
}

#[test]
fn test_parse_key_info_rejects_non_object() {
    assert!(parse_key_info("[1, 2]").is_err());
}
