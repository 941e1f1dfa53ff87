use confmat::{
    classification_report, classification_report_from_sequences, condense_ner_labels,
    confusion_to_accuracy, confusion_to_f1, confusion_to_macro_f1, confusion_to_micro_f1,
    confusion_to_weighted_f1, format_confusion, Average, ComputationError, ConfusionMatrix,
    F1Result, FormatConfigBuilder, LabelMetrics,
};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::collections::HashSet;

#[derive(Deserialize)]
struct Example {
    true_tags: Vec<String>,
    predicted_tags: Vec<String>,
}

fn read_examples(path: &str) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let examples = json_lines::<Example, _>(path)
        .expect("fixture not found in test directory")
        .map(|r| r.unwrap())
        .collect::<Vec<_>>();
    let mut y_true = Vec::with_capacity(examples.len());
    let mut y_pred = Vec::with_capacity(examples.len());
    for ex in examples {
        y_true.push(ex.true_tags);
        y_pred.push(ex.predicted_tags);
    }
    (y_true, y_pred)
}

fn ner_matrix() -> ConfusionMatrix {
    let (y_true, y_pred) = read_examples("tests/data/ner_tags.jsonl");
    ConfusionMatrix::from_sequences(&y_true, &y_pred).unwrap()
}

pub trait CloseEnough {
    fn are_close(&self, other: &Self, eps: f64) -> bool;
}

impl CloseEnough for F1Result {
    fn are_close(&self, other: &Self, eps: f64) -> bool {
        f64::abs(self.precision - other.precision) < eps
            && f64::abs(self.recall - other.recall) < eps
            && f64::abs(self.f1 - other.f1) < eps
    }
}

// LabelMetrics only compares the label and the average.
impl CloseEnough for LabelMetrics {
    fn are_close(&self, other: &Self, eps: f64) -> bool {
        self == other
            && f64::abs(self.precision - other.precision) < eps
            && f64::abs(self.recall - other.recall) < eps
            && f64::abs(self.fscore - other.fscore) < eps
            && f64::abs(self.support - other.support) < eps
    }
}

fn f1(precision: f64, recall: f64, f1: f64) -> F1Result {
    F1Result {
        precision,
        recall,
        f1,
    }
}

#[test]
fn ner_format_default() {
    let matrix = ner_matrix();
    let expected = [
        "     t\\p      O B-LOC E-LOC S-LOC B-ORG E-ORG S-ORG B-PER E-PER S-PER",
        "        O     5     0     0     0     0     0     0     0     0     1",
        "    B-LOC     0     1     0     0     0     0     0     0     0     0",
        "    E-LOC     1     0     0     0     0     0     0     0     0     0",
        "    S-LOC     0     0     0     0     0     0     1     0     0     0",
        "    B-ORG     0     0     0     0     1     0     0     0     0     0",
        "    E-ORG     0     0     0     0     0     1     0     0     0     0",
        "    S-ORG     0     0     0     0     0     0     1     0     0     0",
        "    B-PER     0     0     0     0     0     0     0     1     0     0",
        "    E-PER     0     0     0     0     0     0     0     0     1     0",
        "    S-PER     0     0     0     0     0     0     0     0     0     1",
    ]
    .join("\n");
    assert_eq!(matrix.to_string(), expected);
}

#[test]
fn ner_format_hide_zeroes() {
    let matrix = ner_matrix();
    let config = FormatConfigBuilder::default().hide_zeroes(true).build();
    let expected = [
        "     t\\p      O B-LOC E-LOC S-LOC B-ORG E-ORG S-ORG B-PER E-PER S-PER",
        "        O     5                                                     1",
        "    B-LOC           1",
        "    E-LOC     1",
        "    S-LOC                                         1",
        "    B-ORG                             1",
        "    E-ORG                                   1",
        "    S-ORG                                         1",
        "    B-PER                                               1",
        "    E-PER                                                     1",
        "    S-PER                                                           1",
    ]
    .join("\n");
    assert_eq!(format_confusion(&matrix, &config), expected);
}

#[test]
fn ner_format_condensed() {
    let matrix = ner_matrix();
    let config = FormatConfigBuilder::default()
        .condense_width(Some(40))
        .build();
    let expected = [
        "     t\\p      O   LOC   ORG   PER",
        "        O     5     0     0     1",
        "      LOC     1     1     1     0",
        "      ORG     0     0     3     0",
        "      PER     0     0     0     3",
    ]
    .join("\n");
    assert_eq!(format_confusion(&matrix, &config), expected);
}

#[test]
fn ner_condense_labels() {
    let matrix = ner_matrix();
    let gold: Vec<&str> = matrix.gold_labels().into_iter().collect();
    let pred: Vec<&str> = matrix.pred_labels().into_iter().collect();
    let (condensed, gold, pred) = condense_ner_labels(&matrix, &gold, &pred);
    assert_eq!(gold, vec!["LOC", "ORG", "PER", "O"]);
    assert_eq!(pred, vec!["LOC", "ORG", "PER", "O"]);
    assert_eq!(condensed.get("LOC", "LOC"), 1);
    assert_eq!(condensed.get("LOC", "ORG"), 1);
    assert_eq!(condensed.get("LOC", "O"), 1);
    assert_eq!(condensed.get("ORG", "ORG"), 3);
    assert_eq!(condensed.get("PER", "PER"), 3);
    assert_eq!(condensed.get("O", "PER"), 1);
    assert_eq!(condensed.get("O", "O"), 5);
    assert_eq!(condensed.total(), matrix.total());
}

#[test]
fn ner_accuracy_and_f1() {
    let matrix = ner_matrix();
    assert_eq!(confusion_to_accuracy(&matrix), (12, 15));

    let scores = confusion_to_f1(&matrix);
    assert_eq!(scores.len(), 10);
    let expected = [
        ("B-LOC", f1(1.0, 1.0, 1.0)),
        ("B-ORG", f1(1.0, 1.0, 1.0)),
        ("B-PER", f1(1.0, 1.0, 1.0)),
        ("E-LOC", f1(0.0, 0.0, 0.0)),
        ("E-ORG", f1(1.0, 1.0, 1.0)),
        ("E-PER", f1(1.0, 1.0, 1.0)),
        ("O", f1(5.0 / 6.0, 5.0 / 6.0, 5.0 / 6.0)),
        ("S-LOC", f1(0.0, 0.0, 0.0)),
        ("S-ORG", f1(0.5, 1.0, 2.0 / 3.0)),
        ("S-PER", f1(0.5, 1.0, 2.0 / 3.0)),
    ];
    for (label, expected_scores) in expected.iter() {
        let actual = scores.get(*label).unwrap();
        dbg!(label, actual);
        assert!(actual.are_close(expected_scores, 1e-9));
    }
}

#[test]
fn ner_averages() {
    let matrix = ner_matrix();
    let macro_f1 = confusion_to_macro_f1(&matrix).unwrap();
    assert!(f64::abs(macro_f1 - 0.7166666666666667) < 1e-9);
    let weighted = confusion_to_weighted_f1(&matrix, &[]).unwrap();
    assert!(f64::abs(weighted - 0.7555555555555556) < 1e-9);
    let weighted_no_o = confusion_to_weighted_f1(&matrix, &["O"]).unwrap();
    assert!(f64::abs(weighted_no_o - 0.7037037037037037) < 1e-9);
    let micro = confusion_to_micro_f1(&matrix);
    assert!(micro.are_close(&f1(0.8, 0.8, 0.8), 1e-9));
}

#[test]
fn ner_classification_report() {
    let (y_true, y_pred) = read_examples("tests/data/ner_tags.jsonl");
    let reporter = classification_report_from_sequences(&y_true, &y_pred, &["O"]).unwrap();
    assert_eq!(reporter.accuracy(), (12.0, 15.0));
    let actual: HashSet<LabelMetrics> = reporter.into();
    assert_eq!(actual.len(), 13);
    let expected = [
        LabelMetrics {
            label: String::from("Overall_Micro"),
            average: Average::Micro,
            precision: 0.8,
            recall: 0.8,
            fscore: 0.8,
            support: 15.0,
        },
        LabelMetrics {
            label: String::from("Overall_Weighted"),
            average: Average::Weighted,
            precision: 2.0 / 3.0,
            recall: 7.0 / 9.0,
            fscore: 0.7037037037037037,
            support: 9.0,
        },
        LabelMetrics {
            label: String::from("S-ORG"),
            average: Average::None,
            precision: 0.5,
            recall: 1.0,
            fscore: 2.0 / 3.0,
            support: 1.0,
        },
        LabelMetrics {
            label: String::from("O"),
            average: Average::None,
            precision: 5.0 / 6.0,
            recall: 5.0 / 6.0,
            fscore: 5.0 / 6.0,
            support: 6.0,
        },
    ];
    for expected_row in expected.iter() {
        let actual_row = actual.get(expected_row).unwrap();
        dbg!(actual_row);
        assert!(actual_row.are_close(expected_row, 1e-9));
    }
}

#[test]
fn report_matches_matrix_report() {
    let (y_true, y_pred) = read_examples("tests/data/ner_tags.jsonl");
    let matrix = ner_matrix();
    let from_sequences = classification_report_from_sequences(&y_true, &y_pred, &[]).unwrap();
    let from_matrix = classification_report(&matrix, &[]).unwrap();
    assert_eq!(from_sequences.to_string(), from_matrix.to_string());
}

#[test]
fn inconsistent_sequences() {
    let y_true = vec![vec!["O", "S-PER"], vec!["O"]];
    let y_pred = vec![vec!["O", "S-PER"]];
    let actual = classification_report_from_sequences(&y_true, &y_pred, &[]);
    assert!(matches!(actual, Err(ComputationError::InconsistentLength(_))));
}
