/*!
This library scores the output of a classifier, such as a NER or POS tagger, from its confusion
matrix. It computes the accuracy, the precision, recall and f1 of every label, the micro, macro
and weighted averages, and pretty-prints the matrix itself.

# Terminology
* A label is a string such as `PER`, `NOUN` or `B-LOC`. Labels are case-sensitive.
* A confusion matrix counts the `(gold label, predicted label)` pairs observed during an
    evaluation. `matrix[gold][pred]` is the number of tokens labeled `gold` that were predicted as
    `pred`.
* BIES labels are of the form `<tag>-<body>` where the tag is one of `B` (beginning), `I`
    (inside), `E` (end) or `S` (single). `O` marks the tokens outside of any chunk.
* The macro average is the unweighted mean over the labels, the weighted average weighs every
    label by its number of occurrences as a gold label and the micro average pools the counts of
    every label.

# Example
```rust
use confmat::{
    classification_report, confusion_to_accuracy, confusion_to_weighted_f1, format_confusion,
    ConfusionMatrix, FormatConfigBuilder,
};

let y_true = vec![vec!["B-PER", "I-PER", "O", "B-LOC"]];
let y_pred = vec![vec!["B-PER", "O", "O", "B-LOC"]];
let matrix = ConfusionMatrix::from_sequences(&y_true, &y_pred).unwrap();

assert_eq!(confusion_to_accuracy(&matrix), (3, 4));
let weighted = confusion_to_weighted_f1(&matrix, &["O"]).unwrap();
assert!((weighted - 2.0 / 3.0).abs() < 1e-9);

let config = FormatConfigBuilder::default().hide_zeroes(true).build();
println!("{}", format_confusion(&matrix, &config));
println!("{}", classification_report(&matrix, &["O"]).unwrap());
```
*/

mod config;
mod datastructure;
mod format;
mod labels;
mod metrics;
mod reporter;

// The public api starts here
pub use datastructure::{ConfusionMatrix, Count, NumericKind};

pub use labels::{condense_label, condense_ner_labels, sort_labels, BiesLabel, BiesTag};

pub use format::format_confusion;

pub use metrics::{
    classification_report, confusion_to_accuracy, confusion_to_f1, confusion_to_macro_f1,
    confusion_to_micro_f1, confusion_to_weighted_f1, ComputationError, DivisionByZeroError,
    F1Result, InconsistentLengthError,
};

pub use reporter::{Average, AverageParsingError, LabelMetrics, Reporter};

pub use config::{FormatConfig, FormatConfigBuilder, DEFAULT_CONDENSE_WIDTH};

/// Builds the confusion matrix of aligned gold and predicted sequences and computes its
/// classification report. Labels in `exclude` are left out of the weighted average.
///
/// * `y_true`: Gold tags, one vector per sentence
/// * `y_pred`: Predicted tags, one vector per sentence
/// * `exclude`: Labels left out of the weighted average, typically `O`
///
/// #Example
/// ```rust
/// use confmat::classification_report_from_sequences;
///
/// let y_true = vec![vec!["NOUN", "VERB", "NOUN"]];
/// let y_pred = vec![vec!["NOUN", "NOUN", "NOUN"]];
/// let reporter = classification_report_from_sequences(&y_true, &y_pred, &[]).unwrap();
/// assert_eq!(reporter.accuracy(), (2.0, 3.0));
/// ```
pub fn classification_report_from_sequences<S: AsRef<str>>(
    y_true: &[Vec<S>],
    y_pred: &[Vec<S>],
    exclude: &[&str],
) -> Result<Reporter, ComputationError> {
    let matrix = ConfusionMatrix::from_sequences(y_true, y_pred)?;
    classification_report(&matrix, exclude)
}
