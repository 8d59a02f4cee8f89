//! Field definitions for schema objects.

use super::types::FieldType;
use indexmap::IndexMap;
use serde::Serialize;

/// An ordered set of fields keyed by name.
pub type Fields = IndexMap<String, Field>;

/// A field definition within a schema object or table part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name (unique within its owner).
    pub name: String,
    /// Physical column id (`col_xx`).
    pub name_in_table: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Description.
    pub desc: String,
    /// Shown when a row is displayed as a reference.
    pub is_presentation: bool,
    /// Backed by a storage index.
    pub is_index: bool,
    /// Included in full-text search.
    pub is_full_text_search: bool,
    /// Offered in search dialogs.
    pub is_search: bool,
    /// Included in data export.
    pub is_export: bool,
}

impl Field {
    /// Create a new field.
    pub fn new(
        name: impl Into<String>,
        name_in_table: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            name: name.into(),
            name_in_table: name_in_table.into(),
            field_type,
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Mark as presentation field.
    pub fn with_presentation(mut self) -> Self {
        self.is_presentation = true;
        self
    }

    /// Mark as indexed.
    pub fn with_index(mut self) -> Self {
        self.is_index = true;
        self
    }

    /// Qualified target for pointer and enum fields.
    pub fn pointer(&self) -> Option<&str> {
        self.field_type.target()
    }

    /// Check whether this is a pointer field targeting `target`.
    pub fn points_to(&self, target: &str) -> bool {
        matches!(&self.field_type, FieldType::Pointer { pointer } if pointer == target)
    }

    /// Check whether this is an enum field targeting `target`.
    pub fn enumerates(&self, target: &str) -> bool {
        matches!(&self.field_type, FieldType::Enum { pointer } if pointer == target)
    }
}
