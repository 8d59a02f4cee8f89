//! Documents: transactional objects that post against accumulation registers.

use super::containers::{Form, ObjectTriggers, SpendFunctions, TablePart, TabularList};
use super::field::{Field, Fields};
use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// A document schema object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Document name (unique among documents).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical table id.
    pub table: String,
    /// Description.
    pub desc: String,
    /// Documents get a sequential number on creation.
    pub auto_numbering: bool,
    /// Document changes are kept as versions.
    pub versions_history: bool,
    /// Included in XML data export.
    pub export_xml: bool,
    /// Accumulation registers this document may post against, by name.
    ///
    /// Source of the derived `allow_document_spend` list on each register.
    pub allow_register_accumulation: Vec<String>,
    /// Header fields in declaration order.
    pub fields: Fields,
    /// Owned sub-tables.
    pub table_parts: IndexMap<String, TablePart>,
    /// Grid views.
    pub tabular_lists: IndexMap<String, TabularList>,
    /// UI forms.
    pub forms: IndexMap<String, Form>,
    /// Element hooks.
    pub triggers: ObjectTriggers,
    /// Posting hooks.
    pub spend_functions: SpendFunctions,
}

impl Document {
    /// Create an empty document.
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
        let scope = format!("document {}", self.name);
        insert_unique(&mut self.fields, &scope, field.name.clone(), field)
    }

    /// Builder form of [`Document::append_field`].
    pub fn with_field(mut self, field: Field) -> Result<Self, Error> {
        self.append_field(field)?;
        Ok(self)
    }

    /// Append a table part.
    pub fn append_table_part(&mut self, part: TablePart) -> Result<(), Error> {
        let scope = format!("document {} table parts", self.name);
        insert_unique(&mut self.table_parts, &scope, part.name.clone(), part)
    }

    /// Append a tabular list.
    pub fn append_tabular_list(&mut self, list: TabularList) -> Result<(), Error> {
        let scope = format!("document {} lists", self.name);
        insert_unique(&mut self.tabular_lists, &scope, list.name.clone(), list)
    }

    /// Append a form.
    pub fn append_form(&mut self, form: Form) -> Result<(), Error> {
        let scope = format!("document {} forms", self.name);
        insert_unique(&mut self.forms, &scope, form.name.clone(), form)
    }

    /// Allow posting against the named accumulation register.
    ///
    /// Adding a register twice has no effect.
    pub fn allow_register(&mut self, register: impl Into<String>) {
        let register = register.into();
        if !self.allow_register_accumulation.contains(&register) {
            self.allow_register_accumulation.push(register);
        }
    }

    /// Check whether posting is switched on for this document.
    pub fn is_spendable(&self) -> bool {
        self.spend_functions.spend.enabled && !self.allow_register_accumulation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, HookFunction};

    #[test]
    fn test_allow_register_dedup() {
        let mut doc = Document::new("Invoice", "tab_a03");
        doc.allow_register("Stock");
        doc.allow_register("Stock");
        doc.allow_register("Sales");

        assert_eq!(doc.allow_register_accumulation, vec!["Stock", "Sales"]);
    }

    #[test]
    fn test_is_spendable() {
        let mut doc = Document::new("Invoice", "tab_a03");
        assert!(!doc.is_spendable());

        doc.spend_functions.spend = HookFunction::enabled("Spend");
        assert!(!doc.is_spendable());

        doc.allow_register("Stock");
        assert!(doc.is_spendable());
    }

    #[test]
    fn test_table_part_fields() {
        let mut doc = Document::new("Invoice", "tab_a03")
            .with_field(Field::new("Partner", "col_a1", FieldType::pointer("Catalog.Partner")))
            .unwrap();
        let lines = TablePart::new("Lines", "tab_a04")
            .with_field(Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")))
            .unwrap();
        doc.append_table_part(lines).unwrap();

        assert_eq!(doc.table_parts["Lines"].fields["Item"].pointer(), Some("Catalog.Item"));
    }
}
