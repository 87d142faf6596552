//! Address resolution: header-line counts and spreadsheet-style ranges (`"B2:E5"`).
//!
//! Both forms resolve to a [`Rectangle`], the window of the input that the parser
//! materializes:
//!
//! - [`Rectangle::default`]: every line, column count inferred from the first line
//! - [`Rectangle::with_header_lines`]: skip `n` lines, then as above
//! - [`Rectangle::parse_range`]: an explicit block of columns and rows
//!
//! ```rust
//! use csv_cells::address::Rectangle;
//!
//! let rect = Rectangle::parse_range("b2:e5", 4096).unwrap();
//! assert_eq!(rect.header_lines, 1);
//! assert_eq!(rect.first_col, 2);
//! assert_eq!(rect.last_col, Some(5));
//! assert_eq!(rect.row_limit(), Some(4));
//! ```

mod column;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CellError, CellResult};

pub use column::{column_letters, column_number};

/// Resolved window of the input to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Leading lines skipped before the first data line.
    pub header_lines: usize,
    /// First column to keep (1-based).
    pub first_col: usize,
    /// Last column to keep (1-based, inclusive). `None` uses the first line's field count.
    pub last_col: Option<usize>,
    /// Last line to read (1-based, counted from the start of the input). Only set by ranges.
    pub bottom_row: Option<usize>,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            header_lines: 0,
            first_col: 1,
            last_col: None,
            bottom_row: None,
        }
    }
}

impl Rectangle {
    /// Skip `count` header lines; negative counts are treated as zero.
    pub fn with_header_lines(count: i64) -> Self {
        Self {
            header_lines: usize::try_from(count).unwrap_or(0),
            ..Self::default()
        }
    }

    /// Parse a range token such as `"B2:E5"` (case-insensitive).
    ///
    /// `max_line_length` is the capacity of the parser's line buffer; ranges reaching
    /// beyond column `max_line_length + 1` are rejected.
    pub fn parse_range(token: &str, max_line_length: usize) -> CellResult<Self> {
        let mut col = 0usize;
        let mut row = 0usize;
        let mut in_row = false;
        let mut top_left: Option<(usize, usize)> = None;

        for c in token.chars() {
            match c {
                'A'..='Z' | 'a'..='z' => {
                    if in_row {
                        return Err(CellError::MalformedAddress {
                            address: token.to_owned(),
                            reason: "column letters must precede row digits",
                        });
                    }
                    let digit = column::letter_value(c).unwrap_or(0);
                    col = col.saturating_mul(26).saturating_add(digit);
                }
                '0'..='9' => {
                    in_row = true;
                    let digit = c as usize - '0' as usize;
                    row = row.saturating_mul(10).saturating_add(digit);
                }
                ':' => {
                    if top_left.is_some() {
                        return Err(CellError::MalformedAddress {
                            address: token.to_owned(),
                            reason: "more than one ':'",
                        });
                    }
                    top_left = Some((col, row));
                    col = 0;
                    row = 0;
                    in_row = false;
                }
                other => {
                    return Err(CellError::AddressSyntax {
                        address: token.to_owned(),
                        character: other,
                    });
                }
            }
        }

        let (first_col, top_row) = top_left.ok_or_else(|| CellError::MalformedAddress {
            address: token.to_owned(),
            reason: "missing ':'",
        })?;
        let first_col = first_col.max(1);
        let (last_col, bottom_row) = (col, row);

        if last_col < first_col || top_row < 1 || bottom_row < top_row {
            return Err(CellError::AddressRange {
                address: token.to_owned(),
            });
        }
        if last_col > max_line_length.saturating_add(1) {
            return Err(CellError::BufferTooSmall {
                columns: last_col,
                capacity: max_line_length,
            });
        }

        Ok(Self {
            header_lines: top_row - 1,
            first_col,
            last_col: Some(last_col),
            bottom_row: Some(bottom_row),
        })
    }

    /// `true` for rectangles built from an explicit range.
    pub fn is_ranged(&self) -> bool {
        self.last_col.is_some()
    }

    /// Number of columns of a ranged rectangle.
    pub fn width(&self) -> Option<usize> {
        self.last_col.map(|last| (last + 1).saturating_sub(self.first_col))
    }

    /// Maximum number of data lines a ranged rectangle can hold.
    pub fn row_limit(&self) -> Option<usize> {
        self.bottom_row
            .map(|bottom| bottom.saturating_sub(self.header_lines))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.last_col, self.bottom_row) {
            (Some(last), Some(bottom)) => write!(
                f,
                "{}{}:{}{}",
                column_letters(self.first_col),
                self.header_lines + 1,
                column_letters(last),
                bottom
            ),
            _ => write!(f, "headerlines={}", self.header_lines),
        }
    }
}
