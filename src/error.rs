//! Error hierarchy for tcxrs
//!
//! Decoding failures are collected under [`DecodeError`] and surfaced to
//! callers through [`TcxError::Parse`], which prefixes every cause with the
//! same context message. Errors raised while opening a source are passed
//! through untouched.

use thiserror::Error;

/// Top-level error type for all tcxrs library operations
#[derive(Debug, Error)]
pub enum TcxError {
    /// The input could not be decoded into a document
    #[error("could not parse data: {0}")]
    Parse(#[from] DecodeError),

    /// The named source could not be opened or read
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Causes of a failed decode pass
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Markup is not well formed
    #[error("{source} (at byte {position})")]
    Syntax {
        position: usize,
        source: quick_xml::Error,
    },

    /// The stream ended without producing any element
    #[error("no root element found")]
    MissingRoot,

    /// The document element is not the one the schema expects
    #[error("expected element type <{expected}> but have <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    /// The stream ended while an element was still open
    #[error("unexpected end of input: <{name}> is not closed")]
    UnclosedElement { name: String },

    /// A closing tag appeared with no element open
    #[error("unexpected closing tag </{name}>")]
    UnexpectedEnd { name: String },

    /// A present value could not be converted to the field's type
    #[error("invalid value {value:?} for {path}: {reason}")]
    InvalidValue {
        path: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for tcxrs operations
pub type Result<T> = std::result::Result<T, TcxError>;

impl TcxError {
    /// Whether the error came from reading the source rather than its content
    pub fn is_io(&self) -> bool {
        matches!(self, TcxError::Io(_))
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TcxError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
                "Could not find the activity file".to_string()
            }
            TcxError::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied while opening the activity file".to_string()
            }
            TcxError::Parse(DecodeError::UnexpectedRoot { found, .. }) => {
                format!("This is not a TCX file (document element is <{}>)", found)
            }
            TcxError::Parse(cause) => {
                format!("Activity file is malformed: {}", cause)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_parse_errors_carry_context() {
        let err = TcxError::from(DecodeError::MissingRoot);
        assert_eq!(err.to_string(), "could not parse data: no root element found");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_errors_are_transparent() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = TcxError::from(inner);
        assert_eq!(err.to_string(), "no such file");
        assert!(err.is_io());
    }

    #[test]
    fn test_user_messages() {
        let err = TcxError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.user_message().contains("Could not find"));

        let err = TcxError::Parse(DecodeError::UnexpectedRoot {
            expected: "TrainingCenterDatabase".to_string(),
            found: "gpx".to_string(),
        });
        assert!(err.user_message().contains("<gpx>"));

        let err = TcxError::Parse(DecodeError::InvalidValue {
            path: "DistanceMeters".to_string(),
            value: "abc".to_string(),
            reason: "invalid float literal".to_string(),
        });
        assert!(err.user_message().starts_with("Activity file is malformed"));
    }
}
