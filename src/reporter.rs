/**
This modules gives a few tools to prettyprint the metrics of every label and the overall
metrics.
*/
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

/// The reporter holds the metrics of every label, the overall metrics and the accuracy. It can be
/// used to display the results (i.e. prettyprint them) as if they were collected into a dataframe
/// and can be consumed to obtain a `HashSet` containing the metrics. The reporter is built with the
/// `classification_report` function.
///
/// # Example
///
/// ```rust
/// use confmat::{classification_report, ConfusionMatrix};
///
/// let matrix: ConfusionMatrix = vec![("PER", "PER", 1), ("PER", "LOC", 1), ("LOC", "LOC", 2)]
///     .into_iter()
///     .collect();
/// let reporter = classification_report(&matrix, &[]).unwrap();
///
/// let expected_report = "Label, Precision, Recall, Fscore, Support
/// Overall_Micro, 0.75, 0.75, 0.75, 4
/// Overall_Macro, 0.8333333333333333, 0.75, 0.7333333333333334, 4
/// Overall_Weighted, 0.8333333333333333, 0.75, 0.7333333333333334, 4
/// LOC, 0.6666666666666666, 1, 0.8, 2
/// PER, 1, 0.5, 0.6666666666666666, 2\n";
///
/// assert_eq!(expected_report, reporter.to_string());
/// assert_eq!(reporter.accuracy(), (3.0, 4.0));
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Reporter {
    pub(crate) rows: BTreeSet<LabelMetricsInner>,
    correct: f64,
    total: f64,
}

/// By converting the reporter into a `HashSet` of `LabelMetrics`, you lose the ordering of the
/// rows. If you mean to consume the data without prettypriting it, this is not a problem.
impl From<Reporter> for HashSet<LabelMetrics> {
    fn from(value: Reporter) -> Self {
        value.rows.into_iter().map(LabelMetrics::from).collect()
    }
}

impl Reporter {
    pub(crate) fn new(correct: f64, total: f64) -> Self {
        Self {
            rows: BTreeSet::new(),
            correct,
            total,
        }
    }
    pub(crate) fn insert(&mut self, metrics: LabelMetricsInner) -> bool {
        self.rows.insert(metrics)
    }
    /// Returns `(correct, total)`, the sum of the diagonal and the sum of the whole matrix.
    pub fn accuracy(&self) -> (f64, f64) {
        (self.correct, self.total)
    }
    /// Iterates over the rows, overall averages first.
    pub fn iter(&self) -> impl Iterator<Item = LabelMetrics> + '_ {
        self.rows.iter().cloned().map(LabelMetrics::from)
    }
}

/// The Reporter struct acts as a dataframe when displayed.
impl Display for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Label, Precision, Recall, Fscore, Support")?;
        for v in self.rows.iter() {
            writeln!(f, "{}", v)?
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Datastructure holding metrics about a given label.
pub struct LabelMetrics {
    /// The label, such as "PER", "NOUN", or "Overall_Macro" for an average.
    pub label: String,
    /// The average used to compute this row's metrics
    pub average: Average,
    /// Precision metric
    pub precision: f64,
    /// Recall metric
    pub recall: f64,
    /// Fscore metric
    pub fscore: f64,
    /// Support metric: occurrences as a gold label
    pub support: f64,
}

impl Hash for LabelMetrics {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.average.hash(state)
    }
}

impl PartialEq for LabelMetrics {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.average == other.average
    }
}
impl Eq for LabelMetrics {}

impl From<LabelMetricsInner> for LabelMetrics {
    fn from(value: LabelMetricsInner) -> Self {
        Self {
            label: value.label,
            average: value.average,
            precision: value.precision,
            recall: value.recall,
            fscore: value.fscore,
            support: value.support,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
/// Row of the reporter. Rows are ordered by average (overall rows first) and then by label, and
/// they are displayed as the line of a dataframe.
pub(crate) struct LabelMetricsInner {
    pub(crate) label: String,
    pub(crate) average: Average,
    pub(crate) precision: f64,
    pub(crate) recall: f64,
    pub(crate) fscore: f64,
    pub(crate) support: f64,
}
impl PartialEq for LabelMetricsInner {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.average == other.average
    }
}
impl Eq for LabelMetricsInner {}

impl PartialOrd for LabelMetricsInner {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LabelMetricsInner {
    fn cmp(&self, other: &Self) -> Ordering {
        self.average
            .cmp(&other.average)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl LabelMetricsInner {
    pub(crate) fn new_overall(
        average: OverallAverage,
        precision: f64,
        recall: f64,
        fscore: f64,
        support: f64,
    ) -> Self {
        LabelMetricsInner {
            label: average.to_string(),
            average: average.into(),
            precision,
            recall,
            fscore,
            support,
        }
    }
}

/// The LabelMetricsInner struct acts as a line in a dataframe when displayed.
impl Display for LabelMetricsInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.label, self.precision, self.recall, self.fscore, self.support
        )
    }
}

/// Enumeration of the different types of averaging supported by this crate. `None` marks the rows
/// of single labels. &str can be parsed to create an `Average`. The declaration order is the order
/// of the rows in a report.
#[derive(
    Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize,
)]
pub enum Average {
    Micro,
    Macro,
    Weighted,
    None,
}
impl Display for Average {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl FromStr for Average {
    type Err = AverageParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Average::None),
            "micro" => Ok(Average::Micro),
            "macro" => Ok(Average::Macro),
            "weighted" => Ok(Average::Weighted),
            _ => Err(AverageParsingError(String::from(s))),
        }
    }
}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub struct AverageParsingError(String);
impl Display for AverageParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Impossible to parse the string ({}) into an Average",
            self.0
        )
    }
}
impl Error for AverageParsingError {}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub(crate) enum OverallAverage {
    Micro,
    Macro,
    Weighted,
}

impl Display for OverallAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str_content = match self {
            Self::Micro => "Overall_Micro",
            Self::Macro => "Overall_Macro",
            Self::Weighted => "Overall_Weighted",
        };
        write!(f, "{}", str_content)
    }
}

impl From<OverallAverage> for Average {
    fn from(value: OverallAverage) -> Self {
        match value {
            OverallAverage::Micro => Average::Micro,
            OverallAverage::Macro => Average::Macro,
            OverallAverage::Weighted => Average::Weighted,
        }
    }
}
