//! Master-data catalogs.

use super::containers::{Form, ObjectTriggers, TablePart, TabularList};
use super::field::{Field, Fields};
use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// How the rows of a catalog are organized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Hierarchy {
    /// Plain list.
    #[default]
    Flat,
    /// Rows form a tree through a parent field of the catalog itself.
    Hierarchical {
        /// Field holding the parent row.
        parent_field: String,
    },
    /// Rows are grouped into folders kept in another catalog.
    DelegatedToCatalog {
        /// Qualified name of the folders catalog.
        catalog: String,
        /// Field holding the folder.
        field: String,
    },
}

impl Hierarchy {
    /// Tag used in persisted documents.
    pub fn tag(&self) -> &'static str {
        match self {
            Hierarchy::Flat => "Flat",
            Hierarchy::Hierarchical { .. } => "Hierarchical",
            Hierarchy::DelegatedToCatalog { .. } => "DelegatedToCatalog",
        }
    }
}

/// Subordination of a catalog to an owner catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subordination {
    /// Qualified name of the owner catalog.
    pub owner: String,
    /// Field carrying the owner row.
    pub field: String,
}

/// A master-data schema object (customers, products, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Catalog name (unique among catalogs).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical table id.
    pub table: String,
    /// Description.
    pub desc: String,
    /// Row organization.
    pub hierarchy: Hierarchy,
    /// Owner catalog, if rows belong to rows of another catalog.
    pub subordination: Option<Subordination>,
    /// Rows get a sequential code on creation.
    pub auto_numbering: bool,
    /// Row changes are kept as versions.
    pub versions_history: bool,
    /// Fields in declaration order.
    pub fields: Fields,
    /// Owned sub-tables.
    pub table_parts: IndexMap<String, TablePart>,
    /// Grid views.
    pub tabular_lists: IndexMap<String, TabularList>,
    /// UI forms.
    pub forms: IndexMap<String, Form>,
    /// Element hooks.
    pub triggers: ObjectTriggers,
}

impl Catalog {
    /// Create an empty flat catalog.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            table: table.into(),
            ..Default::default()
        }
    }

    /// Append a field.
    pub fn append_field(&mut self, field: Field) -> Result<(), Error> {
        let scope = format!("catalog {}", self.name);
        insert_unique(&mut self.fields, &scope, field.name.clone(), field)
    }

    /// Builder form of [`Catalog::append_field`].
    pub fn with_field(mut self, field: Field) -> Result<Self, Error> {
        self.append_field(field)?;
        Ok(self)
    }

    /// Append a table part.
    pub fn append_table_part(&mut self, part: TablePart) -> Result<(), Error> {
        let scope = format!("catalog {} table parts", self.name);
        insert_unique(&mut self.table_parts, &scope, part.name.clone(), part)
    }

    /// Append a tabular list.
    pub fn append_tabular_list(&mut self, list: TabularList) -> Result<(), Error> {
        let scope = format!("catalog {} lists", self.name);
        insert_unique(&mut self.tabular_lists, &scope, list.name.clone(), list)
    }

    /// Append a form.
    pub fn append_form(&mut self, form: Form) -> Result<(), Error> {
        let scope = format!("catalog {} forms", self.name);
        insert_unique(&mut self.forms, &scope, form.name.clone(), form)
    }

    /// Check if rows of this catalog form a tree of any kind.
    pub fn is_hierarchical(&self) -> bool {
        !matches!(self.hierarchy, Hierarchy::Flat)
    }
}
