//! Error types for propsubst
//!
//! Errors are structured: a kind, the key path they occurred on, an optional
//! cause line and an actionable help message.

use std::fmt;

/// Result type alias for propsubst operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for propsubst operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Key the error is reported against: the top-level key of the lookup
    /// for a circular reference, the referencing key for a missing key
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A key was reached again while it was still being resolved
    CircularReference {
        /// The key that closed the cycle
        key: String,
        /// Every key on the resolution path, ending with `key`
        chain: Vec<String>,
    },
    /// A placeholder referenced a key that is not in the store
    /// (only raised by [`MissingKeyPolicy::Error`](crate::MissingKeyPolicy::Error))
    KeyNotFound {
        /// The missing key
        key: String,
    },
}

impl Error {
    /// Create a circular reference error
    ///
    /// `chain` is the resolution path at the point the cycle was found,
    /// including the repeated key at the end.
    pub fn circular_reference(key: impl Into<String>, chain: Vec<String>) -> Self {
        let key = key.into();
        let chain_str = chain.join(" → ");
        Self {
            path: chain.first().cloned(),
            kind: ErrorKind::CircularReference { key, chain },
            help: Some("Break the circular dependency by removing one of the references".into()),
            cause: Some(format!("Chain: {}", chain_str)),
        }
    }

    /// Create a key not found error for a placeholder inside `referenced_from`
    pub fn key_not_found(key: impl Into<String>, referenced_from: Option<String>) -> Self {
        let key = key.into();
        Self {
            help: Some(format!(
                "Define '{}' or use a lenient missing-key policy (empty, keep)",
                key
            )),
            kind: ErrorKind::KeyNotFound { key },
            path: referenced_from,
            cause: None,
        }
    }

    /// Whether this error is a circular reference
    pub fn is_circular_reference(&self) -> bool {
        matches!(self.kind, ErrorKind::CircularReference { .. })
    }

    /// The resolution chain for a circular reference, if this is one
    pub fn chain(&self) -> Option<&[String]> {
        match &self.kind {
            ErrorKind::CircularReference { chain, .. } => Some(chain),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::CircularReference { key, .. } => {
                write!(f, "Circular reference detected when resolving '{}'", key)?
            }
            ErrorKind::KeyNotFound { key } => write!(f, "Referenced key not found: {}", key)?,
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_circular_reference_error_display() {
        let err = Error::circular_reference(
            "a",
            vec!["a".into(), "b".into(), "c".into(), "a".into()],
        );
        let display = format!("{}", err);

        assert!(display.contains("Circular reference detected when resolving 'a'"));
        assert!(display.contains("a → b → c → a"));
        assert!(display.contains("Help:"));
    }

    #[test]
    fn test_circular_reference_path_is_top_level_key() {
        let err = Error::circular_reference("b", vec!["x".into(), "b".into(), "b".into()]);

        assert_eq!(err.path, Some("x".into()));
        assert!(err.is_circular_reference());
        assert_eq!(
            err.chain(),
            Some(&["x".to_string(), "b".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn test_key_not_found_error() {
        let err = Error::key_not_found("db.host", Some("db.url".into()));
        let display = format!("{}", err);

        assert!(display.contains("Referenced key not found: db.host"));
        assert!(display.contains("Path: db.url"));
        assert!(display.contains("Define 'db.host'"));
        assert!(!err.is_circular_reference());
        assert_eq!(err.chain(), None);
    }

    #[test]
    fn test_display_without_path() {
        let err = Error::key_not_found("x", None);
        let display = format!("{}", err);

        assert_eq!(
            display,
            "Referenced key not found: x\n  Help: Define 'x' or use a lenient missing-key policy (empty, keep)"
        );
    }

    #[test]
    fn test_circular_reference_display_layout() {
        let err = Error::circular_reference("a", vec!["a".into(), "a".into()]);
        let lines: Vec<_> = err.to_string().lines().map(str::to_string).collect();

        assert_eq!(lines[0], "Circular reference detected when resolving 'a'");
        assert_eq!(lines[1], "  Path: a");
        assert_eq!(lines[2], "  Chain: a → a");
        assert!(lines[3].starts_with("  Help: "));
    }
}
