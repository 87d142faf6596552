//! Reading entrypoints.
//!
//! Two ways in:
//!
//! - [`read_cells`]: typed [`ReadOptions`] (selection, separator, protector, observer)
//! - [`read_cells_from_args`]: the positional calling convention
//!   `(file [, headerlines | range | separator [, separator [, protector]]])`
//!
//! Both validate everything that can fail structurally (range syntax, separator and
//! protector, opening the file) before any table is built.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::address::Rectangle;
use crate::error::{CellError, CellResult};
use crate::parser::{self, ParserConfig, DEFAULT_MAX_LINE_LENGTH};
use crate::types::Table;

use super::observability::{ReadContext, ReadObserver, ReadSeverity, ReadStats, StdErrObserver};

/// Which part of the file to read.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Every line; the first line also fixes the column count.
    #[default]
    All,
    /// Skip this many leading lines (negative counts are treated as zero).
    HeaderLines(i64),
    /// Spreadsheet-style range such as `"B2:E5"`.
    Range(String),
}

impl Selection {
    /// Resolve into the rectangle handed to the parser.
    pub fn resolve(&self, max_line_length: usize) -> CellResult<Rectangle> {
        match self {
            Selection::All => Ok(Rectangle::default()),
            Selection::HeaderLines(n) => Ok(Rectangle::with_header_lines(*n)),
            Selection::Range(token) => Rectangle::parse_range(token, max_line_length),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::HeaderLines(n) => write!(f, "headerlines={n}"),
            Selection::Range(token) => write!(f, "range={token}"),
        }
    }
}

/// Options controlling [`read_cells`].
///
/// Use [`Default`] for common cases: whole file, `,` separator, `"` protector.
#[derive(Clone)]
pub struct ReadOptions {
    pub selection: Selection,
    /// Field separator; must be exactly one ASCII character.
    pub separator: String,
    /// Quote ("protector") character; must be exactly one ASCII character.
    pub protector: String,
    /// Capacity of the line buffer; also bounds the columns a range may address.
    pub max_line_length: usize,
    /// Optional observer for logging/alerts/warnings.
    ///
    /// Without an observer, parse warnings are printed to stderr.
    pub observer: Option<Arc<dyn ReadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReadSeverity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("selection", &self.selection)
            .field("separator", &self.separator)
            .field("protector", &self.protector)
            .field("max_line_length", &self.max_line_length)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            separator: ",".to_string(),
            protector: "\"".to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            observer: None,
            alert_at_or_above: ReadSeverity::Critical,
        }
    }
}

impl ReadOptions {
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_protector(mut self, protector: impl Into<String>) -> Self {
        self.protector = protector.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReadObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Read a delimited text file into a [`Table`].
///
/// ```no_run
/// use csv_cells::reading::{read_cells, ReadOptions, Selection};
///
/// # fn main() -> Result<(), csv_cells::CellError> {
/// let opts = ReadOptions::default().with_selection(Selection::Range("B2:E5".to_string()));
/// let table = read_cells("data.csv", &opts)?;
/// println!("{}x{}", table.row_count(), table.col_count());
/// # Ok(())
/// # }
/// ```
pub fn read_cells(path: impl AsRef<Path>, options: &ReadOptions) -> CellResult<Table> {
    let path = path.as_ref();
    let ctx = ReadContext {
        path: path.to_path_buf(),
        selection: options.selection.clone(),
    };

    let result = parse_with_options(path, options);

    let observer: &dyn ReadObserver = match options.observer.as_deref() {
        Some(obs) => obs,
        None => &StdErrObserver,
    };
    match &result {
        Ok(parsed) => {
            for warning in &parsed.warnings {
                observer.on_warning(&ctx, warning);
            }
            if options.observer.is_some() {
                let (rows, cols) = parsed.table.dims();
                observer.on_success(&ctx, ReadStats { rows, cols });
            }
        }
        Err(e) if options.observer.is_some() => {
            let sev = ReadSeverity::for_error(e);
            observer.on_failure(&ctx, sev, e);
            if sev >= options.alert_at_or_above {
                observer.on_alert(&ctx, sev, e);
            }
        }
        Err(_) => {}
    }

    result.map(|parsed| parsed.table)
}

fn parse_with_options(path: &Path, options: &ReadOptions) -> CellResult<parser::Parsed> {
    let rect = options.selection.resolve(options.max_line_length)?;
    let config = ParserConfig::new(&options.separator, &options.protector)?
        .with_max_line_length(options.max_line_length);
    parser::parse_path(path, &config, &rect)
}

/// One positional argument of [`read_cells_from_args`].
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Number(f64),
    Text(String),
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Number(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Number(value as f64)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Text(value.to_owned())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Text(value)
    }
}

/// Read using positional arguments.
///
/// - `args[0]`: file name (required)
/// - `args[1]`: a number (header lines), a string longer than one character containing `:`
///   (range), or otherwise the separator
/// - the remaining slots: separator, then protector
///
/// ```no_run
/// use csv_cells::reading::{read_cells_from_args, Argument};
///
/// # fn main() -> Result<(), csv_cells::CellError> {
/// let table = read_cells_from_args(&["data.csv".into(), "b2:c3".into(), ":".into()])?;
/// # let _ = table;
/// # Ok(())
/// # }
/// ```
pub fn read_cells_from_args(args: &[Argument]) -> CellResult<Table> {
    ReadRequest::from_args(args)?.run()
}

/// Convenience helper for callers that want an owned request object.
#[derive(Clone, Debug)]
pub struct ReadRequest {
    pub path: PathBuf,
    pub options: ReadOptions,
}

impl ReadRequest {
    pub fn new(path: impl Into<PathBuf>, options: ReadOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Interpret positional arguments (see [`read_cells_from_args`]).
    pub fn from_args(args: &[Argument]) -> CellResult<Self> {
        let (file, mut rest) = args
            .split_first()
            .ok_or_else(|| CellError::usage("not enough input arguments"))?;
        let path = match file {
            Argument::Text(name) => PathBuf::from(name),
            Argument::Number(_) => return Err(CellError::usage("file name must be a string")),
        };

        let mut options = ReadOptions::default();
        match rest.first() {
            Some(Argument::Number(n)) => {
                options.selection = Selection::HeaderLines(header_count(*n));
                rest = &rest[1..];
            }
            Some(Argument::Text(s)) if s.len() > 1 && s.contains(':') => {
                options.selection = Selection::Range(s.clone());
                rest = &rest[1..];
            }
            _ => {}
        }

        if rest.len() > 2 {
            return Err(CellError::usage("too many input arguments"));
        }
        if let Some(arg) = rest.first() {
            options.separator = text_argument("separator", arg)?;
        }
        if let Some(arg) = rest.get(1) {
            options.protector = text_argument("protector", arg)?;
        }

        Ok(Self { path, options })
    }

    /// Execute the request by calling [`read_cells`].
    pub fn run(&self) -> CellResult<Table> {
        read_cells(&self.path, &self.options)
    }
}

fn header_count(n: f64) -> i64 {
    if n.is_nan() { 0 } else { n.round() as i64 }
}

fn text_argument(what: &'static str, arg: &Argument) -> CellResult<String> {
    match arg {
        Argument::Text(s) => Ok(s.clone()),
        Argument::Number(n) => Err(CellError::Config {
            what,
            value: n.to_string(),
            problem: "must be given as a character",
        }),
    }
}
