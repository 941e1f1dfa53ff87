/*!
Sparse confusion matrix and the numeric trait its cells are built on.
*/
use crate::metrics::InconsistentLengthError;
use ahash::AHashMap;
use num::{Num, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};

/// How the cells of a matrix are rendered. Every `Count` type declares its kind once, at the
/// type level, instead of having each value inspected when printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    /// Cells are printed as integers
    Integer,
    /// Cells are printed with one decimal
    Float,
}

impl Display for NumericKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Numeric type usable as a cell of a `ConfusionMatrix`. Counts are usually integers, but
/// averaged or weighted matrices can hold floats.
pub trait Count:
    Num + ToPrimitive + Copy + PartialOrd + Debug + Display + Send + Sync + 'static
{
    /// Kind used when rendering cells of this type.
    const KIND: NumericKind;

    /// Lossy conversion used by the metrics. Every implementor converts without failure.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Returns `true` if the value has no fractional part.
    fn is_integral(self) -> bool {
        match Self::KIND {
            NumericKind::Integer => true,
            NumericKind::Float => self.as_f64().fract() == 0.0,
        }
    }
}

macro_rules! impl_count {
    ($kind:expr; $($t:ty),*) => {
        $(impl Count for $t {
            const KIND: NumericKind = $kind;
        })*
    };
}

impl_count!(NumericKind::Integer; usize, u32, u64, i32, i64);
impl_count!(NumericKind::Float; f32, f64);

/// Confusion matrix stored as `gold label -> predicted label -> count`. Only observed pairs are
/// stored and reads never insert: an absent cell is worth zero.
///
/// ```rust
/// use confmat::ConfusionMatrix;
///
/// let gold = vec![vec!["B-PER", "O", "O"]];
/// let pred = vec![vec!["B-PER", "B-LOC", "O"]];
/// let matrix = ConfusionMatrix::from_sequences(&gold, &pred).unwrap();
///
/// assert_eq!(matrix.get("O", "B-LOC"), 1);
/// assert_eq!(matrix.get("B-LOC", "O"), 0);
/// assert_eq!(matrix.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct ConfusionMatrix<T = usize> {
    cells: AHashMap<String, AHashMap<String, T>>,
}

impl<T> Default for ConfusionMatrix<T> {
    fn default() -> Self {
        Self {
            cells: AHashMap::default(),
        }
    }
}

impl<T: Count> ConfusionMatrix<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a cell, returning the previous value if the pair was already observed.
    pub fn insert<G, P>(&mut self, gold: G, pred: P, count: T) -> Option<T>
    where
        G: Into<String>,
        P: Into<String>,
    {
        self.cells
            .entry(gold.into())
            .or_default()
            .insert(pred.into(), count)
    }

    /// Adds `count` to the cell `(gold, pred)`.
    pub fn add(&mut self, gold: &str, pred: &str, count: T) {
        let cell = self
            .cells
            .entry(gold.to_owned())
            .or_default()
            .entry(pred.to_owned())
            .or_insert_with(T::zero);
        *cell = *cell + count;
    }

    pub fn increment(&mut self, gold: &str, pred: &str) {
        self.add(gold, pred, T::one())
    }

    /// Value of the cell `(gold, pred)`, zero if the pair was never observed.
    pub fn get(&self, gold: &str, pred: &str) -> T {
        self.cells
            .get(gold)
            .and_then(|row| row.get(pred))
            .copied()
            .unwrap_or_else(T::zero)
    }

    /// Observed predictions for a gold label.
    pub fn row(&self, gold: &str) -> Option<&AHashMap<String, T>> {
        self.cells.get(gold)
    }

    /// Labels appearing as gold labels (row keys).
    pub fn gold_labels(&self) -> BTreeSet<&str> {
        self.cells.keys().map(String::as_str).collect()
    }

    /// Labels appearing as predictions in any row.
    pub fn pred_labels(&self) -> BTreeSet<&str> {
        self.cells
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Union of the gold and predicted labels.
    pub fn labels(&self) -> BTreeSet<&str> {
        let mut labels = self.gold_labels();
        labels.extend(self.pred_labels());
        labels
    }

    /// Number of occurrences of `label` as a gold label.
    pub fn gold_total(&self, label: &str) -> T {
        self.cells
            .get(label)
            .map(|row| row.values().fold(T::zero(), |acc, v| acc + *v))
            .unwrap_or_else(T::zero)
    }

    /// Sum of every cell.
    pub fn total(&self) -> T {
        self.iter().fold(T::zero(), |acc, (_, _, v)| acc + v)
    }

    /// A matrix is empty when no pair was ever observed.
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|row| row.is_empty())
    }

    /// Iterates over the observed `(gold, pred, count)` cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, T)> + '_ {
        self.cells.iter().flat_map(|(gold, row)| {
            row.iter()
                .map(move |(pred, count)| (gold.as_str(), pred.as_str(), *count))
        })
    }

    /// Returns a new matrix with the gold and predicted axes swapped.
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::new();
        for (gold, pred, count) in self.iter() {
            transposed.insert(pred, gold, count);
        }
        transposed
    }
}

impl ConfusionMatrix<usize> {
    /// Counts `(gold, predicted)` pairs.
    pub fn from_pairs<I, G, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (G, P)>,
        G: AsRef<str>,
        P: AsRef<str>,
    {
        let mut matrix = Self::new();
        for (gold, pred) in pairs {
            matrix.increment(gold.as_ref(), pred.as_ref());
        }
        matrix
    }

    /// Counts the tags of aligned sequences. Each sentence of `y_true` must have the same length
    /// as the matching sentence of `y_pred`.
    ///
    /// * `y_true`: Gold tags, one vector per sentence
    /// * `y_pred`: Predicted tags, one vector per sentence
    pub fn from_sequences<S: AsRef<str>>(
        y_true: &[Vec<S>],
        y_pred: &[Vec<S>],
    ) -> Result<Self, InconsistentLengthError> {
        check_consistent_length(y_true, y_pred)?;
        let matrix = Self::from_pairs(
            y_true
                .iter()
                .zip(y_pred)
                .flat_map(|(t, p)| t.iter().zip(p.iter())),
        );
        log::debug!(
            "Built a confusion matrix from {} sentences ({} tokens)",
            y_true.len(),
            matrix.total()
        );
        Ok(matrix)
    }
}

impl<G, P, T> FromIterator<(G, P, T)> for ConfusionMatrix<T>
where
    G: AsRef<str>,
    P: AsRef<str>,
    T: Count,
{
    fn from_iter<I: IntoIterator<Item = (G, P, T)>>(iter: I) -> Self {
        let mut matrix = Self::new();
        matrix.extend(iter);
        matrix
    }
}

impl<G, P, T> Extend<(G, P, T)> for ConfusionMatrix<T>
where
    G: AsRef<str>,
    P: AsRef<str>,
    T: Count,
{
    fn extend<I: IntoIterator<Item = (G, P, T)>>(&mut self, iter: I) {
        for (gold, pred, count) in iter {
            self.add(gold.as_ref(), pred.as_ref(), count);
        }
    }
}

fn check_consistent_length<T>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
) -> Result<(), InconsistentLengthError> {
    if y_true.len() != y_pred.len() {
        return Err(InconsistentLengthError(y_true.len(), y_pred.len()));
    }
    for (t, p) in y_true.iter().zip(y_pred) {
        if t.len() != p.len() {
            return Err(InconsistentLengthError(t.len(), p.len()));
        }
    }
    Ok(())
}
