/**
This module computes the metrics (accuracy, precision, recall, f-score and support) of a
confusion matrix.
*/
use crate::datastructure::{ConfusionMatrix, Count};
use crate::reporter::{Average, LabelMetricsInner, OverallAverage, Reporter};
use itertools::multizip;
use ndarray::{prelude::*, Zip};
use ndarray_stats::{errors::MultiInputError, SummaryStatisticsExt};
use num::Num;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq)]
/// A metric was averaged over nothing: no label at all, or labels whose weights sum to zero.
pub struct DivisionByZeroError(pub(crate) &'static str);

impl Display for DivisionByZeroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Encountered division by zero when computing the {}", self.0)
    }
}

impl Error for DivisionByZeroError {}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Error type to represent when two lists or arrays are not of the
/// same length (when they should be).
pub struct InconsistentLengthError(pub(crate) usize, pub(crate) usize);

impl Display for InconsistentLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inconsistent length between two lists. `y_true` is length {}, `y_pred` is length {}",
            self.0, self.1
        )
    }
}
impl Error for InconsistentLengthError {}

#[derive(Debug, Clone, PartialEq)]
/// Enum error encompassing the failures that could happen when computing the metrics of a
/// confusion matrix.
pub enum ComputationError {
    InconsistentLength(InconsistentLengthError),
    DivisionByZero(DivisionByZeroError),
    InputError(MultiInputError),
}
impl Display for ComputationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentLength(length_err) => std::fmt::Display::fmt(length_err, f),
            Self::DivisionByZero(div_err) => std::fmt::Display::fmt(div_err, f),
            Self::InputError(input_err) => std::fmt::Display::fmt(input_err, f),
        }
    }
}
impl Error for ComputationError {}

impl From<InconsistentLengthError> for ComputationError {
    fn from(value: InconsistentLengthError) -> Self {
        Self::InconsistentLength(value)
    }
}
impl From<DivisionByZeroError> for ComputationError {
    fn from(value: DivisionByZeroError) -> Self {
        Self::DivisionByZero(value)
    }
}
impl From<MultiInputError> for ComputationError {
    fn from(value: MultiInputError) -> Self {
        Self::InputError(value)
    }
}

/// Precision, recall and f1 of a single label, or of an average over the labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct F1Result {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-label metrics, in the order of `labels`.
pub(crate) struct LabelScores {
    pub(crate) labels: Vec<String>,
    pub(crate) precision: Array1<f64>,
    pub(crate) recall: Array1<f64>,
    pub(crate) fscore: Array1<f64>,
    /// Number of occurrences of each label as a gold label
    pub(crate) support: Array1<f64>,
}

impl LabelScores {
    /// The label universe is the union of the gold and predicted labels, so a label only ever
    /// predicted (or only ever expected) still gets scored.
    pub(crate) fn new<T: Count>(matrix: &ConfusionMatrix<T>) -> Self {
        let labels: Vec<String> = matrix.labels().into_iter().map(String::from).collect();
        let (pred_sum, tp_sum, true_sum) = extract_pred_tp_true(matrix, &labels);
        let (precision, recall, fscore) = precision_recall_fscore(tp_sum, pred_sum, &true_sum);
        Self {
            labels,
            precision,
            recall,
            fscore,
            support: true_sum,
        }
    }

    /// Gold occurrences of each label, with the labels of `exclude` weighted 0.
    pub(crate) fn weights(&self, exclude: &[&str]) -> Array1<f64> {
        let mut weights = self.support.clone();
        for (label, weight) in self.labels.iter().zip(weights.iter_mut()) {
            if exclude.contains(&label.as_str()) {
                log::trace!("Label {} excluded from the weighted average", label);
                *weight = 0.0;
            }
        }
        weights
    }
}

/// predicted sum, true positive sum and true sum
type PredTPTrue<T> = (Array1<T>, Array1<T>, Array1<T>);

fn extract_pred_tp_true<T: Count>(
    matrix: &ConfusionMatrix<T>,
    labels: &[String],
) -> PredTPTrue<f64> {
    let n = labels.len();
    let dense = Array2::from_shape_fn((n, n), |(i, j)| {
        matrix.get(&labels[i], &labels[j]).as_f64()
    });
    let tp_sum = dense.diag().to_owned();
    // Rows are gold labels, columns are predictions.
    let true_sum = dense.sum_axis(Axis(1));
    let pred_sum = dense.sum_axis(Axis(0));
    (pred_sum, tp_sum, true_sum)
}

fn precision_recall_fscore(
    tp_sum: Array1<f64>,
    pred_sum: Array1<f64>,
    true_sum: &Array1<f64>,
) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let precision = prf_divide(tp_sum.clone(), pred_sum);
    let recall = prf_divide(tp_sum, true_sum.clone());
    let denom = replace(&precision + &recall, 0.0, 1.0);
    let fscore = 2.0 * &precision * &recall / denom;
    (precision, recall, fscore)
}

/// Element-wise division where a zero denominator yields 0.
fn prf_divide<I: Debug + Num + Copy, D: Dimension>(
    numerator: Array<I, D>,
    denominator: Array<I, D>,
) -> Array<I, D> {
    let (result, zero_mask) = prf_divide_results_and_mask(numerator, denominator);
    result * zero_mask
}

/// Divides the arrays after replacing the zeros of the denominator by ones. The returned mask
/// holds 0 where the denominator was 0 and 1 elsewhere.
///
/// * `numerator`: Numerator of the division
/// * `denominator`: Denominator of the division
fn prf_divide_results_and_mask<I: Debug + Num + Copy, D: Dimension>(
    numerator: Array<I, D>,
    mut denominator: Array<I, D>,
) -> (Array<I, D>, Array<I, D>) {
    let zero_at_mask =
        Zip::from(&denominator).map_collect(|d| if *d == I::zero() { I::zero() } else { I::one() });
    denominator.mapv_inplace(|v| if v == I::zero() { I::one() } else { v });
    (numerator / &denominator, zero_at_mask)
}

/// Helper function to replace values from an array.
fn replace<Data: PartialEq + Copy, D: Dimension>(
    mut array: Array<Data, D>,
    replaced: Data,
    new_value: Data,
) -> Array<Data, D> {
    array.mapv_inplace(|v| if v == replaced { new_value } else { v });
    array
}

fn weighted_average(
    values: &Array1<f64>,
    weights: &Array1<f64>,
    what: &'static str,
) -> Result<f64, ComputationError> {
    if weights.sum() == 0.0 {
        return Err(DivisionByZeroError(what).into());
    }
    Ok(values.weighted_mean(weights)?)
}

fn mean(values: &Array1<f64>, what: &'static str) -> Result<f64, ComputationError> {
    values.mean().ok_or(ComputationError::DivisionByZero(DivisionByZeroError(what)))
}

/// Given a confusion matrix, returns `(correct, total)`: the sum of the diagonal cells and the sum
/// of every cell. An empty matrix yields `(0, 0)`.
pub fn confusion_to_accuracy<T: Count>(matrix: &ConfusionMatrix<T>) -> (T, T) {
    let (correct, incorrect) = matrix.iter().fold(
        (T::zero(), T::zero()),
        |(correct, incorrect), (gold, pred, count)| {
            if gold == pred {
                (correct + count, incorrect)
            } else {
                (correct, incorrect + count)
            }
        },
    );
    (correct, correct + incorrect)
}

/// Computes the precision, recall and f1 of every label appearing in the matrix, either as a gold
/// label or as a prediction. Divisions by zero yield 0: a label never predicted has a precision of
/// 0 and a label never expected has a recall of 0.
///
/// ```rust
/// use confmat::{confusion_to_f1, ConfusionMatrix};
///
/// let matrix: ConfusionMatrix = vec![("PER", "PER", 3), ("PER", "LOC", 1)].into_iter().collect();
/// let results = confusion_to_f1(&matrix);
/// assert_eq!(results["PER"].precision, 1.0);
/// assert_eq!(results["PER"].recall, 0.75);
/// assert_eq!(results["LOC"].f1, 0.0);
/// ```
pub fn confusion_to_f1<T: Count>(matrix: &ConfusionMatrix<T>) -> BTreeMap<String, F1Result> {
    let scores = LabelScores::new(matrix);
    multizip((
        scores.labels,
        scores.precision.iter(),
        scores.recall.iter(),
        scores.fscore.iter(),
    ))
    .map(|(label, precision, recall, f1)| {
        (
            label,
            F1Result {
                precision: *precision,
                recall: *recall,
                f1: *f1,
            },
        )
    })
    .collect()
}

/// Precision, recall and f1 computed from the true positives, false positives and false negatives
/// pooled over every label.
pub fn confusion_to_micro_f1<T: Count>(matrix: &ConfusionMatrix<T>) -> F1Result {
    let labels: Vec<String> = matrix.labels().into_iter().map(String::from).collect();
    let (pred_sum, tp_sum, true_sum) = extract_pred_tp_true(matrix, &labels);
    let (precision, recall, fscore) = precision_recall_fscore(
        array![tp_sum.sum()],
        array![pred_sum.sum()],
        &array![true_sum.sum()],
    );
    F1Result {
        precision: precision[0],
        recall: recall[0],
        f1: fscore[0],
    }
}

/// Returns the unweighted mean of the per-label f1. Fails if the matrix holds no label.
pub fn confusion_to_macro_f1<T: Count>(matrix: &ConfusionMatrix<T>) -> Result<f64, ComputationError> {
    let scores = LabelScores::new(matrix);
    mean(&scores.fscore, "macro f1")
}

/// Returns the mean of the per-label f1, weighted by the number of occurrences of each label as a
/// gold label. Labels listed in `exclude` (typically `O`) are left out of both the weighted sum and
/// the total weight. Fails if the total weight is zero.
///
/// * `matrix`: Confusion matrix
/// * `exclude`: Labels left out of the average
pub fn confusion_to_weighted_f1<T: Count>(
    matrix: &ConfusionMatrix<T>,
    exclude: &[&str],
) -> Result<f64, ComputationError> {
    let scores = LabelScores::new(matrix);
    let weights = scores.weights(exclude);
    weighted_average(&scores.fscore, &weights, "weighted f1")
}

/// Main entrypoint of the library. This function computes the precision, recall, fscore and
/// support of every label and the micro, macro and weighted averages. The returned structure can
/// be used to prettyprint the results or be converted into a HashSet.
///
/// * `matrix`: Confusion matrix
/// * `exclude`: Labels left out of the weighted average
pub fn classification_report<T: Count>(
    matrix: &ConfusionMatrix<T>,
    exclude: &[&str],
) -> Result<Reporter, ComputationError> {
    let scores = LabelScores::new(matrix);
    let (correct, total) = confusion_to_accuracy(matrix);
    let mut reporter = Reporter::new(correct.as_f64(), total.as_f64());
    let support_sum = scores.support.sum();

    for (label, precision, recall, fscore, support) in multizip((
        scores.labels.iter(),
        scores.precision.iter(),
        scores.recall.iter(),
        scores.fscore.iter(),
        scores.support.iter(),
    )) {
        reporter.insert(LabelMetricsInner {
            label: label.clone(),
            average: Average::None,
            precision: *precision,
            recall: *recall,
            fscore: *fscore,
            support: *support,
        });
    }

    let micro = confusion_to_micro_f1(matrix);
    reporter.insert(LabelMetricsInner::new_overall(
        OverallAverage::Micro,
        micro.precision,
        micro.recall,
        micro.f1,
        support_sum,
    ));
    reporter.insert(LabelMetricsInner::new_overall(
        OverallAverage::Macro,
        mean(&scores.precision, "macro precision")?,
        mean(&scores.recall, "macro recall")?,
        mean(&scores.fscore, "macro f1")?,
        support_sum,
    ));
    let weights = scores.weights(exclude);
    reporter.insert(LabelMetricsInner::new_overall(
        OverallAverage::Weighted,
        weighted_average(&scores.precision, &weights, "weighted precision")?,
        weighted_average(&scores.recall, &weights, "weighted recall")?,
        weighted_average(&scores.fscore, &weights, "weighted f1")?,
        weights.sum(),
    ));
    Ok(reporter)
}
