//! Table parser: delimited text -> [`Table`] of typed cells.
//!
//! Most callers should go through [`crate::reading`]; this module is the core that the
//! reading entrypoints delegate to:
//!
//! - [`parse_path`] opens a file and parses it
//! - [`parse_reader`] parses any [`BufRead`]
//!
//! ## Rules
//!
//! - `header_lines` leading lines are skipped; skipping past the end yields a 0x0 table.
//! - Without an explicit range, the number of fields on the first data line is the column
//!   count, and that line is also row 0 of the result.
//! - A field ends at a separator outside quotes or at end of line. Two protectors inside
//!   quotes are one literal protector; a lone protector toggles quoting and is dropped.
//! - One trailing `\r` is stripped from every field.
//! - A field is [`Cell::Number`] only if it is unquoted, non-empty and parses completely as a
//!   float; otherwise it is [`Cell::Text`].
//! - Lines with more fields than the column count lose the excess fields; a single
//!   [`ParseWarning::TooManyFields`] is reported per call. Shorter lines are padded with
//!   `Text("")`.
//!
//! ```rust
//! use csv_cells::address::Rectangle;
//! use csv_cells::parser::{parse_reader, ParserConfig};
//! use csv_cells::types::Cell;
//!
//! # fn main() -> Result<(), csv_cells::CellError> {
//! let config = ParserConfig::new(":", "\"")?;
//! let parsed = parse_reader("1:2\n3:4\n5:6".as_bytes(), &config, &Rectangle::default())?;
//! assert_eq!(parsed.table.dims(), (3, 2));
//! assert_eq!(parsed.table.get(2, 1), Some(&Cell::Number(6.0)));
//! # Ok(())
//! # }
//! ```

mod fields;
mod lines;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::address::Rectangle;
use crate::error::{CellError, CellResult};
use crate::types::{Cell, Table};

use fields::FieldTokenizer;
use lines::LineReader;

/// Default capacity of the line buffer, in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Separator, protector and line buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    separator: u8,
    protector: u8,
    max_line_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separator: b',',
            protector: b'"',
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ParserConfig {
    /// Build a configuration from separator and protector strings.
    ///
    /// Each must be exactly one byte (one ASCII character) and the separator cannot be `\n`.
    /// When both are the same byte the separator takes precedence, so quoting never starts.
    pub fn new(separator: &str, protector: &str) -> CellResult<Self> {
        let sep = single_byte("separator", separator)?;
        if sep == b'\n' {
            return Err(CellError::Config {
                what: "separator",
                value: separator.to_owned(),
                problem: "cannot be a newline",
            });
        }
        let prot = single_byte("protector", protector)?;
        Ok(Self {
            separator: sep,
            protector: prot,
            ..Self::default()
        })
    }

    /// Override the line buffer capacity (minimum 1).
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length.max(1);
        self
    }

    pub fn separator(&self) -> char {
        self.separator as char
    }

    pub fn protector(&self) -> char {
        self.protector as char
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

fn single_byte(what: &'static str, value: &str) -> CellResult<u8> {
    match value.as_bytes() {
        [b] => Ok(*b),
        _ => Err(CellError::Config {
            what,
            value: value.to_owned(),
            problem: "can only be one character",
        }),
    }
}

/// Non-fatal conditions found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A data line had more fields than the column count inferred from the first line.
    /// Only the first such line is reported.
    TooManyFields {
        /// 1-based line number in the input.
        line: usize,
        fields: usize,
        columns: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::TooManyFields {
                line,
                fields,
                columns,
            } => write!(
                f,
                "line(s) found with more fields than in headerline (line {line}: {fields} fields, {columns} columns)"
            ),
        }
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub table: Table,
    pub warnings: Vec<ParseWarning>,
}

impl Parsed {
    fn empty() -> Self {
        Self::default()
    }
}

/// Open `path` and parse it. The file handle is released before returning.
pub fn parse_path(
    path: impl AsRef<Path>,
    config: &ParserConfig,
    rect: &Rectangle,
) -> CellResult<Parsed> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CellError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(
        BufReader::with_capacity(config.max_line_length, file),
        config,
        rect,
    )
}

/// Parse delimited text from `reader` into the window described by `rect`.
pub fn parse_reader<R: BufRead>(
    reader: R,
    config: &ParserConfig,
    rect: &Rectangle,
) -> CellResult<Parsed> {
    let mut lines = LineReader::new(reader, config.max_line_length);
    for _ in 0..rect.header_lines {
        if !lines.skip_line()? {
            return Ok(Parsed::empty());
        }
    }

    let row_limit = rect.row_limit().unwrap_or(usize::MAX);
    if row_limit == 0 {
        return Ok(Parsed::empty());
    }

    let tokenizer = FieldTokenizer::new(config.separator, config.protector);
    let line_number = lines.lines_read() + 1;
    let Some(first) = lines.next_line()? else {
        return Ok(Parsed::empty());
    };

    let last_col = match rect.last_col {
        Some(last) => last,
        None => tokenizer.count(first),
    };
    let mut builder = TableBuilder {
        tokenizer,
        first_col: rect.first_col.max(1),
        last_col,
        warn_on_overflow: !rect.is_ranged(),
        rows: Vec::new(),
        overflow: None,
    };
    builder.push_line(first, line_number);

    while builder.rows.len() < row_limit {
        let line_number = lines.lines_read() + 1;
        match lines.next_line()? {
            Some(line) => builder.push_line(line, line_number),
            None => break,
        }
    }

    Ok(builder.finish())
}

/// Accumulates blank-initialized rows of the final width, one line at a time.
struct TableBuilder {
    tokenizer: FieldTokenizer,
    first_col: usize,
    last_col: usize,
    warn_on_overflow: bool,
    rows: Vec<Vec<Cell>>,
    overflow: Option<ParseWarning>,
}

impl TableBuilder {
    fn width(&self) -> usize {
        (self.last_col + 1).saturating_sub(self.first_col)
    }

    fn push_line(&mut self, line: &[u8], line_number: usize) {
        let mut row = vec![Cell::blank(); self.width()];
        for (index, field) in self.tokenizer.fields(line).enumerate() {
            let column = index + 1;
            if column > self.last_col {
                if self.warn_on_overflow && self.overflow.is_none() {
                    self.overflow = Some(ParseWarning::TooManyFields {
                        line: line_number,
                        fields: self.tokenizer.count(line),
                        columns: self.last_col,
                    });
                }
                break;
            }
            if column >= self.first_col {
                row[column - self.first_col] = field.into_cell();
            }
        }
        self.rows.push(row);
    }

    fn finish(self) -> Parsed {
        let width = self.width();
        Parsed {
            table: Table::from_sized_rows(self.rows, width),
            warnings: self.overflow.into_iter().collect(),
        }
    }
}
