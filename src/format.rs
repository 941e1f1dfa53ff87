/*!
Pretty-printing of confusion matrices as aligned text tables.
*/
use crate::config::FormatConfig;
use crate::datastructure::{ConfusionMatrix, Count, NumericKind};
use crate::labels::{condense_ner_labels, sort_labels};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Display;

/// Narrowest column, in characters.
const MIN_COLUMN_WIDTH: usize = 5;
const ROW_INDENT: &str = "    ";

/// Renders a confusion matrix as a text table: one row per gold label and one column per
/// predicted label (swapped when the config asks for a transposition). Trailing whitespace is
/// trimmed from every line.
///
/// ```rust
/// use confmat::{format_confusion, ConfusionMatrix, FormatConfig};
///
/// let matrix: ConfusionMatrix = vec![("A", "A", 2), ("A", "B", 1), ("B", "A", 0), ("B", "B", 3)]
///     .into_iter()
///     .collect();
/// let expected = "     t\\p      A     B
///         A     2     1
///         B     0     3";
/// assert_eq!(format_confusion(&matrix, &FormatConfig::default()), expected);
/// ```
pub fn format_confusion<T: Count>(matrix: &ConfusionMatrix<T>, config: &FormatConfig) -> String {
    let matrix: Cow<ConfusionMatrix<T>> = if config.transpose() {
        Cow::Owned(matrix.transpose())
    } else {
        Cow::Borrowed(matrix)
    };

    let (gold_labels, pred_labels) = match config.labels() {
        Some(labels) => (labels.to_vec(), labels.to_vec()),
        None => derive_labels(&matrix, config.hide_blank()),
    };

    let kind = resolve_cell_kind(
        &matrix,
        &gold_labels,
        &pred_labels,
        config.cell_kind().unwrap_or(T::KIND),
    );
    let mut width = column_width(&matrix, &gold_labels, &pred_labels, kind);

    let (matrix, gold_labels, pred_labels) = match config.condense_width() {
        Some(limit) if width * pred_labels.len() > limit => {
            log::debug!(
                "Table too wide ({} columns of width {} > {}), condensing the labels",
                pred_labels.len(),
                width,
                limit
            );
            let (condensed, gold, pred) = condense_ner_labels(&matrix, &gold_labels, &pred_labels);
            width = width.max(column_width(&condensed, &gold, &pred, kind));
            (Cow::Owned(condensed), gold, pred)
        }
        _ => (matrix, gold_labels, pred_labels),
    };

    let corner = if config.transpose() { "p\\t" } else { "t\\p" };
    let mut lines = Vec::with_capacity(gold_labels.len() + 1);
    lines.push(header(corner, &pred_labels, width));
    let empty_cell = " ".repeat(width);
    for gold in gold_labels.iter() {
        let mut row = format!("{}{:>width$} ", ROW_INDENT, gold, width = width);
        for pred in pred_labels.iter() {
            let value = matrix.get(gold, pred);
            if config.hide_zeroes() && value.is_zero() {
                row.push_str(&empty_cell);
            } else {
                row.push_str(&render_cell(value, kind, width));
            }
            row.push(' ');
        }
        lines.push(row.trim_end().to_string());
    }
    lines.join("\n")
}

/// Gold labels are the rows of the matrix and predicted labels the union of the observed
/// predictions. When blank rows and columns are kept, both axes show the union of the two.
fn derive_labels<T: Count>(
    matrix: &ConfusionMatrix<T>,
    hide_blank: bool,
) -> (Vec<String>, Vec<String>) {
    let gold: BTreeSet<&str> = matrix
        .gold_labels()
        .into_iter()
        .filter(|g| {
            !hide_blank
                || matrix
                    .row(g)
                    .is_some_and(|row| row.values().any(|c| !c.is_zero()))
        })
        .collect();
    let pred: BTreeSet<&str> = matrix
        .iter()
        .filter(|(_, _, count)| !hide_blank || !count.is_zero())
        .map(|(_, pred, _)| pred)
        .collect();
    if hide_blank {
        (sort_labels(gold), sort_labels(pred))
    } else {
        let labels = sort_labels(gold.union(&pred));
        (labels.clone(), labels)
    }
}

/// An integer rendering is only kept if every visible cell is integral.
fn resolve_cell_kind<T: Count>(
    matrix: &ConfusionMatrix<T>,
    gold_labels: &[String],
    pred_labels: &[String],
    requested: NumericKind,
) -> NumericKind {
    if requested == NumericKind::Float {
        return requested;
    }
    let all_integral = gold_labels
        .iter()
        .all(|g| pred_labels.iter().all(|p| matrix.get(g, p).is_integral()));
    if all_integral {
        requested
    } else {
        log::debug!("Non-integral cells, rendering them as floats");
        NumericKind::Float
    }
}

fn column_width<T: Count>(
    matrix: &ConfusionMatrix<T>,
    gold_labels: &[String],
    pred_labels: &[String],
    kind: NumericKind,
) -> usize {
    let label_width = pred_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let cell_width = gold_labels
        .iter()
        .flat_map(|g| pred_labels.iter().map(move |p| (g, p)))
        .map(|(g, p)| render_cell(matrix.get(g, p), kind, 0).len())
        .max()
        .unwrap_or(0);
    MIN_COLUMN_WIDTH.max(label_width).max(cell_width)
}

fn render_cell<T: Count>(value: T, kind: NumericKind, width: usize) -> String {
    match kind {
        NumericKind::Integer => match value.to_i128() {
            Some(v) => format!("{:>width$}", v, width = width),
            None => format!("{:>width$.1}", value.as_f64(), width = width),
        },
        NumericKind::Float => format!("{:>width$.1}", value.as_f64(), width = width),
    }
}

fn header(corner: &str, pred_labels: &[String], width: usize) -> String {
    let pad = " ".repeat(width.saturating_sub(corner.len()) / 2);
    let first_cell = format!("{pad}{corner}{pad}");
    let mut header = format!("{}{:>width$} ", ROW_INDENT, first_cell, width = width);
    for label in pred_labels {
        header.push_str(&format!("{:>width$} ", label, width = width));
    }
    header.trim_end().to_string()
}

impl<T: Count> Display for ConfusionMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_confusion(self, &FormatConfig::default()))
    }
}
