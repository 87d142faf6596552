use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for cell reading operations.
pub type CellResult<T> = Result<T, CellError>;

/// Abstract classification of a [`CellError`], independent of the variant's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong argument arity or argument types.
    Usage,
    /// Separator or protector is not exactly one character.
    Config,
    /// The input could not be opened or read.
    Io,
    /// The range address contains a character outside the address grammar.
    AddressSyntax,
    /// The range address resolves to an invalid or oversized rectangle.
    AddressRange,
}

/// Error type returned by the reader and the address resolver.
///
/// Every variant aborts the call that produced it; no partial table is ever returned.
#[derive(Debug, Error)]
pub enum CellError {
    /// Wrong number (or kind) of positional arguments.
    #[error("csv2cell: {message}")]
    Usage { message: String },

    /// Separator or protector value is not a usable single one-byte character.
    #[error("csv2cell: {what} value {problem} (got {value:?})")]
    Config {
        what: &'static str,
        value: String,
        problem: &'static str,
    },

    /// The input file could not be opened.
    #[error("csv2cell: cannot open file {} for reading: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error while reading an already opened input.
    #[error("csv2cell: io error: {0}")]
    Io(#[from] std::io::Error),

    /// Character outside `[A-Z0-9:]` in a range address.
    #[error("csv2cell: illegal character {character:?} in address argument '{address}'")]
    AddressSyntax { address: String, character: char },

    /// Range address built from legal characters but not of the form `COL ROW ':' COL ROW`.
    #[error("csv2cell: illegal character sequence in address argument '{address}': {reason}")]
    MalformedAddress { address: String, reason: &'static str },

    /// Range address whose corners are out of order or not positive.
    #[error("csv2cell: illegal cell range specified: '{address}'")]
    AddressRange { address: String },

    /// Range address spanning more columns than a line buffer can hold.
    #[error("csv2cell: nr. of columns ({columns}) too large for buffer size ({capacity})")]
    BufferTooSmall { columns: usize, capacity: usize },
}

impl CellError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Classify this error into one of the abstract [`ErrorKind`]s.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CellError::Usage { .. } => ErrorKind::Usage,
            CellError::Config { .. } => ErrorKind::Config,
            CellError::Open { .. } | CellError::Io(_) => ErrorKind::Io,
            CellError::AddressSyntax { .. } | CellError::MalformedAddress { .. } => {
                ErrorKind::AddressSyntax
            }
            CellError::AddressRange { .. } | CellError::BufferTooSmall { .. } => {
                ErrorKind::AddressRange
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        let e = CellError::BufferTooSmall {
            columns: 5000,
            capacity: 4096,
        };
        assert_eq!(e.kind(), ErrorKind::AddressRange);
        assert!(e.to_string().contains("too large for buffer"));

        let e = CellError::MalformedAddress {
            address: "B2".to_string(),
            reason: "missing ':'",
        };
        assert_eq!(e.kind(), ErrorKind::AddressSyntax);

        let e = CellError::Open {
            path: PathBuf::from("___.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(e.kind(), ErrorKind::Io);
        assert!(e.to_string().contains("cannot open file ___.csv"));
    }
}
