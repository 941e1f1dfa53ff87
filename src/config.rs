/*
 * This modules contains the display options of a confusion matrix. Most importantly, it contains
 * the `FormatConfig` struct, which implements the default trait. This config is passed to the
 * `format_confusion` function and can be built with the `FormatConfigBuilder`.
*/
use crate::datastructure::NumericKind;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Above this row width (in characters), NER labels are condensed into their entity type.
pub const DEFAULT_CONDENSE_WIDTH: usize = 150;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
/// Config struct used to simplify the options of `format_confusion`. It implements the default
/// trait.
pub struct FormatConfig {
    /// Labels used for both the rows and the columns, in this order. When `None`, the labels are
    /// derived from the matrix and sorted.
    pub(crate) labels: Option<Vec<String>>,
    /// Print blank cells instead of zeros.
    pub(crate) hide_zeroes: bool,
    /// Drop the rows and the columns holding only zeros. Ignored when `labels` is given.
    pub(crate) hide_blank: bool,
    /// Swap the gold and predicted axes: rows become predictions.
    pub(crate) transpose: bool,
    /// If the rows of the table would be wider than this many characters, the BIES prefixes of
    /// the labels are dropped to shrink the table. `None` never condenses.
    pub(crate) condense_width: Option<usize>,
    /// How cells are rendered. When `None`, the kind of the matrix' count type is used.
    pub(crate) cell_kind: Option<NumericKind>,
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }
    pub fn hide_zeroes(&self) -> bool {
        self.hide_zeroes
    }
    pub fn hide_blank(&self) -> bool {
        self.hide_blank
    }
    pub fn transpose(&self) -> bool {
        self.transpose
    }
    pub fn condense_width(&self) -> Option<usize> {
        self.condense_width
    }
    pub fn cell_kind(&self) -> Option<NumericKind> {
        self.cell_kind
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            labels: None,
            hide_zeroes: false,
            hide_blank: false,
            transpose: false,
            condense_width: Some(DEFAULT_CONDENSE_WIDTH),
            cell_kind: None,
        }
    }
}

impl Display for FormatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!("Labels: {:?}\n Hide zero cells: {}\n Hide blank rows and columns: {}\n Transposed: {}\n Condense labels above width: {:?}\n Cell kind: {:?}", self.labels, self.hide_zeroes, self.hide_blank, self.transpose, self.condense_width, self.cell_kind);
        write!(f, "{}", string)
    }
}

impl From<FormatConfigBuilder> for FormatConfig {
    fn from(value: FormatConfigBuilder) -> Self {
        Self {
            labels: value.labels,
            hide_zeroes: value.hide_zeroes,
            hide_blank: value.hide_blank,
            transpose: value.transpose,
            condense_width: value.condense_width,
            cell_kind: value.cell_kind,
        }
    }
}

/// This builder can be used to build and customize a `FormatConfig` stucture.
#[derive(Clone, Debug)]
pub struct FormatConfigBuilder {
    labels: Option<Vec<String>>,
    hide_zeroes: bool,
    hide_blank: bool,
    transpose: bool,
    condense_width: Option<usize>,
    cell_kind: Option<NumericKind>,
}

impl Default for FormatConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatConfigBuilder {
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }
    pub fn hide_zeroes(mut self, hide_zeroes: bool) -> Self {
        self.hide_zeroes = hide_zeroes;
        self
    }
    pub fn hide_blank(mut self, hide_blank: bool) -> Self {
        self.hide_blank = hide_blank;
        self
    }
    pub fn transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }
    pub fn condense_width(mut self, condense_width: Option<usize>) -> Self {
        self.condense_width = condense_width;
        self
    }
    pub fn cell_kind(mut self, cell_kind: NumericKind) -> Self {
        self.cell_kind = Some(cell_kind);
        self
    }
    pub fn new() -> Self {
        let defaults = FormatConfig::default();
        Self {
            labels: defaults.labels,
            hide_zeroes: defaults.hide_zeroes,
            hide_blank: defaults.hide_blank,
            transpose: defaults.transpose,
            condense_width: defaults.condense_width,
            cell_kind: defaults.cell_kind,
        }
    }
    pub fn build(self) -> FormatConfig {
        FormatConfig::from(self)
    }
}
