//! Journals: read-only unions over a set of documents.

use super::field::{Field, Fields};
use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// A journal list with its field bindings.
///
/// For each source document, `bindings` maps a journal field to the document
/// field that fills it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalList {
    /// List name (unique within its journal).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Document name to journal field to document field.
    pub bindings: IndexMap<String, IndexMap<String, String>>,
}

impl JournalList {
    /// Create a list without bindings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Bind `journal_field` to `document_field` of `document`.
    ///
    /// Rebinding replaces the earlier source field.
    pub fn bind(
        &mut self,
        document: impl Into<String>,
        journal_field: impl Into<String>,
        document_field: impl Into<String>,
    ) {
        self.bindings
            .entry(document.into())
            .or_default()
            .insert(journal_field.into(), document_field.into());
    }

    /// Document field that fills `journal_field` for `document`.
    pub fn source_field(&self, document: &str, journal_field: &str) -> Option<&str> {
        self.bindings
            .get(document)
            .and_then(|fields| fields.get(journal_field))
            .map(String::as_str)
    }
}

/// A journal schema object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    /// Journal name (unique among journals).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Journal columns.
    pub fields: Fields,
    /// Names of the documents shown in the journal.
    pub allowed_documents: Vec<String>,
    /// Lists with their field bindings.
    pub lists: IndexMap<String, JournalList>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a journal column.
    pub fn append_field(&mut self, field: Field) -> Result<(), Error> {
        let scope = format!("journal {}", self.name);
        insert_unique(&mut self.fields, &scope, field.name.clone(), field)
    }

    /// Append a list.
    pub fn append_list(&mut self, list: JournalList) -> Result<(), Error> {
        let scope = format!("journal {} lists", self.name);
        insert_unique(&mut self.lists, &scope, list.name.clone(), list)
    }

    /// Include a document in the journal. Adding twice has no effect.
    pub fn allow_document(&mut self, document: impl Into<String>) {
        let document = document.into();
        if !self.allowed_documents.contains(&document) {
            self.allowed_documents.push(document);
        }
    }
}
