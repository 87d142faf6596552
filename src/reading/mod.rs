//! Reading entrypoints: file path + options -> [`crate::types::Table`].
//!
//! Most callers should use [`read_cells`] (from [`unified`]) which:
//!
//! - resolves the [`Selection`] (whole file, header lines, or a `"B2:E5"` range)
//! - validates separator and protector
//! - parses the file through [`crate::parser`]
//! - optionally reports success/failure/alerts/warnings to a [`ReadObserver`]
//!
//! [`read_cells_from_args`] accepts the positional calling convention instead.

pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, ReadContext, ReadObserver, ReadSeverity, ReadStats, StdErrObserver,
};
pub use unified::{read_cells, read_cells_from_args, Argument, ReadOptions, ReadRequest, Selection};
