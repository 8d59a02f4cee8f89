//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog engine errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A structurally mandatory leaf is absent from a persisted document.
    #[error("missing required field `{field}` at {path}")]
    MissingRequiredField {
        /// Location of the node that lacks the field.
        path: String,
        /// Name of the missing leaf.
        field: &'static str,
    },

    /// A qualified name does not follow the `Kind.TypeName` grammar.
    #[error("malformed pointer `{pointer}`: {reason}")]
    MalformedPointer {
        /// The offending pointer text.
        pointer: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Insertion into a uniquely keyed collection with an existing key.
    #[error("duplicate key `{key}` in {scope}")]
    DuplicateKey {
        /// The collection being inserted into.
        scope: String,
        /// The key that already exists.
        key: String,
    },

    /// Every candidate physical name is already taken.
    #[error("name allocation exhausted for {what}")]
    AllocationExhausted {
        /// What was being allocated.
        what: String,
    },

    /// The persisted document does not exist.
    #[error("catalog document not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An object cannot be removed because other fields still reference it.
    #[error("{target} is still referenced by {count} field(s)")]
    HasDependents {
        /// Qualified name of the object.
        target: String,
        /// Number of referencing fields.
        count: usize,
    },

    /// The live-storage table lister failed.
    #[error("table lister error: {0}")]
    TableLister(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingRequiredField {
            path: "Directories[2]".to_string(),
            field: "Name",
        };
        assert_eq!(
            err.to_string(),
            "missing required field `Name` at Directories[2]"
        );

        let err = Error::DuplicateKey {
            scope: "catalogs".to_string(),
            key: "Item".to_string(),
        };
        assert!(err.to_string().contains("Item"));

        let err = Error::FileNotFound(PathBuf::from("/tmp/none.json"));
        assert!(err.to_string().contains("/tmp/none.json"));
    }
}
