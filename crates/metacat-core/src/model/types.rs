//! Field type definitions for the catalog.

use serde::Serialize;

/// Data type of a field, with the payload that only makes sense for that type.
///
/// Reference-carrying variants hold the qualified name of their target in the
/// `Kind.TypeName` form (see [`crate::model::pointer`]). The name is stored as
/// text and resolved on demand; nothing here points at another object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 text.
    Text {
        /// Edited as a multi-line value.
        multiline: bool,
    },
    /// Integer number.
    Integer {
        /// Filled from a sequence when a new row is created.
        automatic_numbering: bool,
    },
    /// Fixed-precision decimal.
    Numeric,
    /// Boolean value.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Time of day.
    Time,
    /// UUID (128-bit identifier).
    Uuid,
    /// Binary data.
    Bytes,
    /// Reference to a row of a catalog or document (`Catalog.X` / `Document.X`).
    Pointer {
        /// Qualified name of the target.
        pointer: String,
    },
    /// Reference to an enumeration member (`Enumerations.X`).
    Enum {
        /// Qualified name of the target enumeration.
        pointer: String,
    },
    /// Reference to a row of any permitted catalog or document.
    CompositePointer(CompositeTargets),
}

/// Target restrictions of a composite pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompositeTargets {
    /// No catalog may be referenced.
    pub exclude_catalogs: bool,
    /// No document may be referenced.
    pub exclude_documents: bool,
    /// Catalog type names allowed when not excluded. Empty means all.
    pub allowed_catalogs: Vec<String>,
    /// Document type names allowed when not excluded. Empty means all.
    pub allowed_documents: Vec<String>,
}

impl CompositeTargets {
    /// Check whether the catalog with the given type name may be referenced.
    pub fn allows_catalog(&self, name: &str) -> bool {
        Self::allows(self.exclude_catalogs, &self.allowed_catalogs, name)
    }

    /// Check whether the document with the given type name may be referenced.
    pub fn allows_document(&self, name: &str) -> bool {
        Self::allows(self.exclude_documents, &self.allowed_documents, name)
    }

    fn allows(excluded: bool, list: &[String], name: &str) -> bool {
        if excluded {
            return false;
        }
        list.is_empty() || list.iter().any(|n| n == name)
    }
}

impl FieldType {
    /// Tag used for this type in persisted documents.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Text { .. } => "string",
            FieldType::Integer { .. } => "integer",
            FieldType::Numeric => "numeric",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
            FieldType::Uuid => "uuid",
            FieldType::Bytes => "bytea",
            FieldType::Pointer { .. } => "pointer",
            FieldType::Enum { .. } => "enum",
            FieldType::CompositePointer(_) => "composite_pointer",
        }
    }

    /// Create a plain text type.
    pub fn text() -> Self {
        FieldType::Text { multiline: false }
    }

    /// Create a plain integer type.
    pub fn integer() -> Self {
        FieldType::Integer {
            automatic_numbering: false,
        }
    }

    /// Create a pointer type.
    pub fn pointer(target: impl Into<String>) -> Self {
        FieldType::Pointer {
            pointer: target.into(),
        }
    }

    /// Create an enumeration reference type.
    pub fn enumeration(target: impl Into<String>) -> Self {
        FieldType::Enum {
            pointer: target.into(),
        }
    }

    /// Qualified target name for pointer and enum types.
    ///
    /// An empty target counts as unset.
    pub fn target(&self) -> Option<&str> {
        match self {
            FieldType::Pointer { pointer } | FieldType::Enum { pointer } if !pointer.is_empty() => {
                Some(pointer)
            }
            _ => None,
        }
    }

    /// Check if this type refers to another object.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            FieldType::Pointer { .. } | FieldType::Enum { .. } | FieldType::CompositePointer(_)
        )
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer { .. } | FieldType::Numeric)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::text()
    }
}
