use std::fmt;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A constructor argument that must be non-negative was negative.
    InvalidArgument(String),
    /// A per-spectrum operation was handed an index outside the block's
    /// range. Indicates a routing bug in the calling manager.
    OutOfRange {
        operation: &'static str,
        index: i64,
    },
    /// The underlying stream failed during a block read or write.
    IOError(std::io::Error),
    /// Manifest (de)serialization failure.
    SerdeError(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::OutOfRange { operation, index } => {
                write!(f, "{}: spectrum index {} out of range", operation, index)
            }
            Error::IOError(err) => write!(f, "I/O error: {}", err),
            Error::SerdeError(err) => write!(f, "manifest error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(err) => Some(err),
            Error::SerdeError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IOError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::SerdeError(value)
    }
}
