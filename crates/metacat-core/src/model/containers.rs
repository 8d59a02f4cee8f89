//! Composite containers attached to schema objects: table parts, tabular
//! lists, forms and hook bundles.

use super::field::{Field, Fields};
use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// A named handler in generated code, switched on or off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookFunction {
    /// Handler name.
    pub name: String,
    /// Whether the handler is called.
    pub enabled: bool,
}

impl HookFunction {
    /// Create an enabled hook.
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }
}

/// Hooks of a table part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePartTriggers {
    /// Called before a row is written.
    pub before_save: HookFunction,
    /// Called after a row is written.
    pub after_save: HookFunction,
}

/// Hooks of a catalog or document element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectTriggers {
    /// Called when an element is created.
    pub new: HookFunction,
    /// Called when an element is copied.
    pub copying: HookFunction,
    /// Called before an element is written.
    pub before_save: HookFunction,
    /// Called after an element is written.
    pub after_save: HookFunction,
    /// Called when the deletion mark is set or cleared.
    pub set_deletion_label: HookFunction,
    /// Called before an element is deleted.
    pub before_delete: HookFunction,
}

/// Posting hooks of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendFunctions {
    /// Writes the register movements.
    pub spend: HookFunction,
    /// Removes the register movements.
    pub clear_spend: HookFunction,
}

/// A column of a tabular list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListColumn {
    /// Source field name.
    pub name: String,
    /// Column header.
    pub caption: String,
    /// Display width, 0 for automatic.
    pub size: u32,
    /// Position in the sort order.
    pub sort_num: u32,
    /// Included in the default ordering.
    pub sort_field: bool,
    /// Sort descending instead of ascending.
    pub sort_descending: bool,
}

impl ListColumn {
    /// Create a column showing the given field.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            caption: name.clone(),
            name,
            ..Default::default()
        }
    }
}

/// A grid projection of an object's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularList {
    /// List name (unique within its owner).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Columns in display order, keyed by field name.
    pub columns: IndexMap<String, ListColumn>,
}

impl TabularList {
    /// Create an empty tabular list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a column.
    pub fn append_column(&mut self, column: ListColumn) -> Result<(), Error> {
        let scope = format!("tabular list {}", self.name);
        insert_unique(&mut self.columns, &scope, column.name.clone(), column)
    }
}

/// Kind of a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormType {
    /// Edits a single element.
    #[default]
    Element,
    /// Full list.
    List,
    /// Compact list for selection.
    ListSmall,
    /// List with a folder tree.
    ListAndTree,
    /// Pointer picker control.
    PointerControl,
    /// Free-standing dialog.
    Function,
    /// Report.
    Report,
}

impl FormType {
    /// Tag used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Element => "Element",
            FormType::List => "List",
            FormType::ListSmall => "ListSmall",
            FormType::ListAndTree => "ListAndTree",
            FormType::PointerControl => "PointerControl",
            FormType::Function => "Function",
            FormType::Report => "Report",
        }
    }

    /// Parse a persisted tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "Element" => FormType::Element,
            "List" => FormType::List,
            "ListSmall" => FormType::ListSmall,
            "ListAndTree" => FormType::ListAndTree,
            "PointerControl" => FormType::PointerControl,
            "Function" => FormType::Function,
            "Report" => FormType::Report,
            _ => return None,
        })
    }
}

/// A UI form with its generated source.
///
/// `generated_code` and `modified_code` are opaque blobs; they are stored
/// compressed in the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    /// Form name (unique within its owner).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Kind of form.
    pub form_type: FormType,
    /// Code produced by the generator.
    pub generated_code: String,
    /// Hand-edited copy of the generated code.
    pub modified_code: String,
}

impl Form {
    /// Create an empty form.
    pub fn new(name: impl Into<String>, form_type: FormType) -> Self {
        Self {
            name: name.into(),
            form_type,
            ..Default::default()
        }
    }
}

/// A sub-table owned by a schema object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePart {
    /// Part name (unique within its owner).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical table id (`tab_xNN`).
    pub table: String,
    /// Description.
    pub desc: String,
    /// Row changes are kept as versions.
    pub versions_history: bool,
    /// Fields in declaration order.
    pub fields: Fields,
    /// Grid views.
    pub tabular_lists: IndexMap<String, TabularList>,
    /// UI forms.
    pub forms: IndexMap<String, Form>,
    /// Row hooks.
    pub triggers: TablePartTriggers,
}

impl TablePart {
    /// Create an empty table part.
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
        let scope = format!("table part {}", self.name);
        insert_unique(&mut self.fields, &scope, field.name.clone(), field)
    }

    /// Builder form of [`TablePart::append_field`].
    pub fn with_field(mut self, field: Field) -> Result<Self, Error> {
        self.append_field(field)?;
        Ok(self)
    }

    /// Append a tabular list.
    pub fn append_tabular_list(&mut self, list: TabularList) -> Result<(), Error> {
        let scope = format!("table part {} lists", self.name);
        insert_unique(&mut self.tabular_lists, &scope, list.name.clone(), list)
    }

    /// Append a form.
    pub fn append_form(&mut self, form: Form) -> Result<(), Error> {
        let scope = format!("table part {} forms", self.name);
        insert_unique(&mut self.forms, &scope, form.name.clone(), form)
    }
}
