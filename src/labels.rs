/*!
Label handling: BIES tag parsing, the label ordering used when displaying a matrix and the
condensation of NER labels into their entity type.
*/
use crate::datastructure::{ConfusionMatrix, Count};
use enum_iterator::{all, Sequence};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::Display;

/// Label of the tokens outside of any chunk.
pub(crate) const OUTSIDE: &str = "O";

/// Position of a token inside a chunk. The declaration order is the order used when sorting
/// labels sharing the same body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum BiesTag {
    /// Beginning of a chunk
    B,
    /// Inside a chunk
    I,
    /// End of a chunk
    E,
    /// Single token chunk
    S,
}

impl BiesTag {
    fn as_char(self) -> char {
        match self {
            Self::B => 'B',
            Self::I => 'I',
            Self::E => 'E',
            Self::S => 'S',
        }
    }
    fn from_char(c: char) -> Option<Self> {
        all::<BiesTag>().find(|t| t.as_char() == c)
    }
}

impl Display for BiesTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A label of the form `<tag>-<body>` or `<tag>_<body>`, such as `B-PER` or `S_LOC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BiesLabel<'a> {
    pub tag: BiesTag,
    pub body: &'a str,
}

impl<'a> BiesLabel<'a> {
    /// Parses a label. Returns `None` if the label is not BIES-shaped: it must be longer than two
    /// characters, start with one of `B`, `I`, `E` or `S` and use `-` or `_` as delimiter.
    pub fn parse(label: &'a str) -> Option<Self> {
        let mut chars = label.chars();
        let tag = chars.next().and_then(BiesTag::from_char)?;
        if !matches!(chars.next(), Some('-') | Some('_')) || chars.next().is_none() {
            return None;
        }
        // The tag and the delimiter are both ASCII.
        Some(Self {
            tag,
            body: &label[2..],
        })
    }
}

/// Sorts and deduplicates labels for display. `O` is always placed first. If every other label is
/// BIES-shaped, labels are grouped by body and ordered B, I, E, S inside a group. Otherwise the
/// labels are sorted lexicographically.
///
/// ```rust
/// use confmat::sort_labels;
///
/// let sorted = sort_labels(["I-PER", "O", "S-LOC", "B-PER", "E-PER"]);
/// assert_eq!(sorted, vec!["O", "S-LOC", "B-PER", "I-PER", "E-PER"]);
/// ```
pub fn sort_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: BTreeSet<&str> = BTreeSet::new();
    let owned: Vec<S> = labels.into_iter().collect();
    unique.extend(owned.iter().map(AsRef::as_ref));
    let had_outside = unique.remove(OUTSIDE);

    let bies: Option<Vec<(BiesLabel, &str)>> = unique
        .iter()
        .map(|l| BiesLabel::parse(*l).map(|parsed| (parsed, *l)))
        .collect();
    let sorted: Vec<&str> = match bies {
        Some(parsed) => parsed
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.body.cmp(b.body).then(a.tag.cmp(&b.tag)))
            .map(|(_, l)| l)
            .collect(),
        None => unique.into_iter().collect(),
    };

    let mut result = Vec::with_capacity(sorted.len() + usize::from(had_outside));
    if had_outside {
        result.push(String::from(OUTSIDE));
    }
    result.extend(sorted.into_iter().map(String::from));
    result
}

/// Removes the BIES prefix of a label: everything up to and including the first `-`. Labels
/// without `-` are returned unchanged.
pub fn condense_label(label: &str) -> &str {
    label.split_once('-').map_or(label, |(_, body)| body)
}

/// Collapses BIES-tagged labels (`B-PER`, `I-PER`, ...) into their entity type (`PER`). Counts of
/// every pair of labels mapping to the same condensed pair are summed. The returned label lists
/// keep the first-seen order of the condensed labels.
///
/// * `matrix`: Matrix to condense. It is not modified.
/// * `gold_labels`: Ordered gold labels
/// * `pred_labels`: Ordered predicted labels
pub fn condense_ner_labels<T, S>(
    matrix: &ConfusionMatrix<T>,
    gold_labels: &[S],
    pred_labels: &[S],
) -> (ConfusionMatrix<T>, Vec<String>, Vec<String>)
where
    T: Count,
    S: AsRef<str>,
{
    let gold: Vec<&str> = gold_labels.iter().map(AsRef::as_ref).unique().collect();
    let pred: Vec<&str> = pred_labels.iter().map(AsRef::as_ref).unique().collect();

    let mut condensed = ConfusionMatrix::new();
    for gold_label in gold.iter() {
        let Some(row) = matrix.row(gold_label) else {
            continue;
        };
        for pred_label in pred.iter() {
            if let Some(count) = row.get(*pred_label) {
                condensed.add(condense_label(gold_label), condense_label(pred_label), *count);
            }
        }
    }
    let new_gold = condensed_order(&gold);
    let new_pred = condensed_order(&pred);
    (condensed, new_gold, new_pred)
}

fn condensed_order(labels: &[&str]) -> Vec<String> {
    labels
        .iter()
        .map(|l| condense_label(l))
        .unique()
        .map(String::from)
        .collect()
}
