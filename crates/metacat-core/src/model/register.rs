//! Information and accumulation registers.
//!
//! Registers keep their fields in three groups (dimensions, resources and
//! properties) instead of one flat map. [`combine_all_fields_for_register`]
//! joins the groups when a single view is needed.

use super::containers::{Form, TablePart, TabularList};
use super::field::{Field, Fields};
use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// Field group of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Key of a register record.
    Dimension,
    /// Measured value.
    Resource,
    /// Extra attribute.
    Property,
}

impl FieldGroup {
    fn label(&self) -> &'static str {
        match self {
            FieldGroup::Dimension => "dimensions",
            FieldGroup::Resource => "resources",
            FieldGroup::Property => "properties",
        }
    }
}

/// Join the three field groups into one ordered map.
///
/// Dimensions come first, then resources, then properties. A name present in
/// several groups keeps its first position and the last group's definition.
pub fn combine_all_fields_for_register(
    dimension: &Fields,
    resource: &Fields,
    property: &Fields,
) -> Fields {
    let mut all = Fields::with_capacity(dimension.len() + resource.len() + property.len());
    for group in [dimension, resource, property] {
        for (name, field) in group {
            all.insert(name.clone(), field.clone());
        }
    }
    all
}

/// Whether an accumulation register tracks balances or turnovers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccumulationKind {
    /// Remaining balance per dimension set.
    #[default]
    Balances,
    /// Movement totals per period.
    Turnovers,
}

impl AccumulationKind {
    /// Tag used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccumulationKind::Balances => "Balances",
            AccumulationKind::Turnovers => "Turnovers",
        }
    }

    /// Parse a persisted tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Balances" => Some(AccumulationKind::Balances),
            "Turnovers" => Some(AccumulationKind::Turnovers),
            _ => None,
        }
    }
}

/// A named, ordered set of query fragments used to build register totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBlock {
    /// Block name (unique within its register).
    pub name: String,
    /// Part of the final totals calculation.
    pub final_calculation: bool,
    /// Fragments keyed by their position label.
    pub queries: IndexMap<String, String>,
}

impl QueryBlock {
    /// Create an empty query block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add or replace a query fragment.
    pub fn set_query(&mut self, key: impl Into<String>, query: impl Into<String>) {
        self.queries.insert(key.into(), query.into());
    }
}

/// A point-in-time fact register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformationRegister {
    /// Register name (unique among information registers).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical table id.
    pub table: String,
    /// Description.
    pub desc: String,
    /// Record key fields.
    pub dimension_fields: Fields,
    /// Value fields.
    pub resource_fields: Fields,
    /// Attribute fields.
    pub property_fields: Fields,
    /// Grid views.
    pub tabular_lists: IndexMap<String, TabularList>,
    /// UI forms.
    pub forms: IndexMap<String, Form>,
}

impl InformationRegister {
    /// Create an empty information register.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            table: table.into(),
            ..Default::default()
        }
    }

    /// Append a field to one of the groups.
    pub fn append_field(&mut self, group: FieldGroup, field: Field) -> Result<(), Error> {
        let scope = format!("information register {} {}", self.name, group.label());
        let fields = match group {
            FieldGroup::Dimension => &mut self.dimension_fields,
            FieldGroup::Resource => &mut self.resource_fields,
            FieldGroup::Property => &mut self.property_fields,
        };
        insert_unique(fields, &scope, field.name.clone(), field)
    }

    /// Append a tabular list.
    pub fn append_tabular_list(&mut self, list: TabularList) -> Result<(), Error> {
        let scope = format!("information register {} lists", self.name);
        insert_unique(&mut self.tabular_lists, &scope, list.name.clone(), list)
    }

    /// Append a form.
    pub fn append_form(&mut self, form: Form) -> Result<(), Error> {
        let scope = format!("information register {} forms", self.name);
        insert_unique(&mut self.forms, &scope, form.name.clone(), form)
    }

    /// All fields in dimension, resource, property order.
    pub fn all_fields(&self) -> Fields {
        combine_all_fields_for_register(
            &self.dimension_fields,
            &self.resource_fields,
            &self.property_fields,
        )
    }
}

/// An accumulating fact register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulationRegister {
    /// Register name (unique among accumulation registers).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical table id.
    pub table: String,
    /// Description.
    pub desc: String,
    /// Balances or turnovers.
    pub kind: AccumulationKind,
    /// Totals are computed on the fly instead of kept in a summary table.
    pub no_summary_table: bool,
    /// Documents allowed to post against this register.
    ///
    /// Derived from `Document::allow_register_accumulation` by
    /// `Configuration::calculate_allow_document_spend`; edits are overwritten.
    pub allow_document_spend: Vec<String>,
    /// Record key fields.
    pub dimension_fields: Fields,
    /// Accumulated value fields.
    pub resource_fields: Fields,
    /// Attribute fields.
    pub property_fields: Fields,
    /// Owned sub-tables.
    pub table_parts: IndexMap<String, TablePart>,
    /// Grid views.
    pub tabular_lists: IndexMap<String, TabularList>,
    /// UI forms.
    pub forms: IndexMap<String, Form>,
    /// Query fragments for the totals.
    pub query_blocks: IndexMap<String, QueryBlock>,
}

impl AccumulationRegister {
    /// Create an empty accumulation register.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            table: table.into(),
            ..Default::default()
        }
    }

    /// Append a field to one of the groups.
    pub fn append_field(&mut self, group: FieldGroup, field: Field) -> Result<(), Error> {
        let scope = format!("accumulation register {} {}", self.name, group.label());
        let fields = match group {
            FieldGroup::Dimension => &mut self.dimension_fields,
            FieldGroup::Resource => &mut self.resource_fields,
            FieldGroup::Property => &mut self.property_fields,
        };
        insert_unique(fields, &scope, field.name.clone(), field)
    }

    /// Append a table part.
    pub fn append_table_part(&mut self, part: TablePart) -> Result<(), Error> {
        let scope = format!("accumulation register {} table parts", self.name);
        insert_unique(&mut self.table_parts, &scope, part.name.clone(), part)
    }

    /// Append a tabular list.
    pub fn append_tabular_list(&mut self, list: TabularList) -> Result<(), Error> {
        let scope = format!("accumulation register {} lists", self.name);
        insert_unique(&mut self.tabular_lists, &scope, list.name.clone(), list)
    }

    /// Append a form.
    pub fn append_form(&mut self, form: Form) -> Result<(), Error> {
        let scope = format!("accumulation register {} forms", self.name);
        insert_unique(&mut self.forms, &scope, form.name.clone(), form)
    }

    /// Append a query block.
    pub fn append_query_block(&mut self, block: QueryBlock) -> Result<(), Error> {
        let scope = format!("accumulation register {} query blocks", self.name);
        insert_unique(&mut self.query_blocks, &scope, block.name.clone(), block)
    }

    /// All fields in dimension, resource, property order.
    pub fn all_fields(&self) -> Fields {
        combine_all_fields_for_register(
            &self.dimension_fields,
            &self.resource_fields,
            &self.property_fields,
        )
    }
}
