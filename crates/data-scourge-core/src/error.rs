use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot traverse {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan root {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Selection {index} is out of range (list has {len} entries)")]
    InvalidSelection { index: usize, len: usize },
}

impl Error {
    pub(crate) fn invalid_input(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_traversal_keeps_io_error_as_source() {
        let err = Error::Traversal {
            path: PathBuf::from("/data/locked"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(err.to_string(), "Cannot traverse /data/locked");
        let source = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            Error::invalid_input("minimum size", "abc", "expected a non-negative whole number").to_string(),
            "Invalid minimum size 'abc': expected a non-negative whole number"
        );
        assert_eq!(
            Error::RootNotDirectory(PathBuf::from("/data/file.txt")).to_string(),
            "Scan root /data/file.txt is not a directory"
        );
        assert_eq!(
            Error::InvalidSelection { index: 7, len: 3 }.to_string(),
            "Selection 7 is out of range (list has 3 entries)"
        );
        assert!(Error::RootNotDirectory(PathBuf::from("/x")).source().is_none());
    }
}
