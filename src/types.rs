//! Core data model: typed [`Cell`]s arranged in a rectangular [`Table`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Text value (including the empty string).
    Text,
    /// 64-bit floating point value.
    Number,
}

/// A single typed value read from one field.
///
/// Serializes untagged: numbers as JSON numbers, text as JSON strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Field text, with protector characters removed.
    Text(String),
    /// Field that parsed completely as a floating point literal.
    Number(f64),
}

impl Cell {
    /// The blank cell used for positions a line does not reach.
    pub fn blank() -> Self {
        Cell::Text(String::new())
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Text(_) => CellKind::Text,
            Cell::Number(_) => CellKind::Number,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    /// `true` for `Text("")`.
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Rectangular grid of cells, `row_count() x col_count()`.
///
/// Rows are stored as `Vec<Vec<Cell>>`; every row has exactly `col_count()` cells.
/// Deserialization rejects input that breaks this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    cols: usize,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct TableRepr {
    cols: usize,
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<TableRepr> for Table {
    type Error = String;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        if let Some((index, row)) = repr
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != repr.cols)
        {
            return Err(format!(
                "row {index} has {} cells, expected {}",
                row.len(),
                repr.cols
            ));
        }
        Ok(Self {
            cols: repr.cols,
            rows: repr.rows,
        })
    }
}

impl Table {
    /// A `rows x cols` table with every cell set to [`Cell::blank`].
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            rows: vec![vec![Cell::blank(); cols]; rows],
        }
    }

    /// The 0x0 table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from rows, padding short rows with blank cells up to the widest row.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, Cell::blank());
                row
            })
            .collect();
        Self { cols, rows }
    }

    /// Finalize rows that are already exactly `cols` wide.
    pub(crate) fn from_sized_rows(rows: Vec<Vec<Cell>>, cols: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == cols));
        Self { cols, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.row_count(), self.col_count())
    }

    /// `true` when the table has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols == 0
    }

    /// Cell at 0-based `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// All cells of 0-based column `col`, top to bottom.
    pub fn column(&self, col: usize) -> Option<Vec<&Cell>> {
        if col >= self.cols {
            return None;
        }
        self.rows.iter().map(|r| r.get(col)).collect()
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Numeric matrix view of the table.
    ///
    /// Returns `None` if any cell is not a [`Cell::Number`].
    pub fn to_matrix(&self) -> Option<Vec<Vec<f64>>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::as_number).collect::<Option<Vec<f64>>>())
            .collect()
    }

    /// Split off the first row as column names.
    ///
    /// Number cells in the header row are rendered with [`Cell`]'s `Display`.
    pub fn split_header(mut self) -> (Vec<String>, Table) {
        if self.rows.is_empty() {
            return (Vec::new(), self);
        }
        let header = self.rows.remove(0).iter().map(Cell::to_string).collect();
        (header, self)
    }

    /// Kind of each cell in the first row; empty for a table without rows.
    pub fn column_kinds(&self) -> Vec<CellKind> {
        self.rows
            .first()
            .map(|row| row.iter().map(Cell::kind).collect())
            .unwrap_or_default()
    }
}
