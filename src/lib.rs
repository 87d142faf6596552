//! `csv-cells` reads delimited text files into a rectangular [`types::Table`] of cells, where every
//! cell is either a number or a string.
//!
//! The primary entrypoint is [`reading::read_cells`], which reads a whole file, skips a number of
//! header lines, or extracts a spreadsheet-style range such as `"B2:E5"`.
//!
//! ## Cell typing
//!
//! - a field that parses completely as a decimal floating-point number becomes
//!   [`types::Cell::Number`]
//! - every other field, including empty fields and anything written between protector (quote)
//!   characters, becomes [`types::Cell::Text`]
//! - positions a short line does not reach are blank text (`""`)
//!
//! ## Quick example: read a range
//!
//! ```no_run
//! use csv_cells::reading::{read_cells, ReadOptions, Selection};
//!
//! # fn main() -> Result<(), csv_cells::CellError> {
//! let opts = ReadOptions::default()
//!     .with_selection(Selection::Range("b2:e5".to_string()))
//!     .with_separator(";");
//! let table = read_cells("data.csv", &opts)?;
//! println!("{}x{}", table.row_count(), table.col_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing from memory
//!
//! ```rust
//! use csv_cells::address::Rectangle;
//! use csv_cells::parser::{parse_reader, ParserConfig};
//! use csv_cells::types::Cell;
//!
//! let config = ParserConfig::new(",", "\"").unwrap();
//! let parsed = parse_reader("1,\"1\",x\n".as_bytes(), &config, &Rectangle::default()).unwrap();
//! assert_eq!(parsed.table.get(0, 0), Some(&Cell::Number(1.0)));
//! assert_eq!(parsed.table.get(0, 1), Some(&Cell::from("1")));
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: option-driven and positional entrypoints, plus read observers
//! - [`parser`]: the line reader, quote-aware tokenizer and table builder
//! - [`address`]: column letters and `"B2:E5"` range resolution
//! - [`types`]: [`types::Cell`] and [`types::Table`]
//! - [`error`]: error types shared by all of the above

pub mod address;
pub mod error;
pub mod parser;
pub mod reading;
pub mod types;

pub use error::{CellError, CellResult, ErrorKind};
pub use reading::{read_cells, read_cells_from_args, ReadOptions, Selection};
pub use types::{Cell, Table};
