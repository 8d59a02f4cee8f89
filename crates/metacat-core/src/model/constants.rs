//! Constants and the blocks that group them.

use super::containers::TablePart;
use super::field::Field;
use super::insert_unique;
use super::types::FieldType;
use crate::error::Error;
use indexmap::IndexMap;

/// Physical table holding the values of all constants, one column each.
pub const CONSTANTS_TABLE: &str = "tab_constants";

/// A single-valued setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constant {
    /// Name of the owning block.
    pub block: String,
    /// Constant name (unique within its block).
    pub name: String,
    /// Display name.
    pub full_name: String,
    /// Physical column id in [`CONSTANTS_TABLE`].
    pub name_in_table: String,
    /// Value type.
    pub field_type: FieldType,
    /// Description.
    pub desc: String,
    /// Included in data export.
    pub is_export: bool,
    /// Sub-tables attached to the constant.
    pub table_parts: IndexMap<String, TablePart>,
}

impl Constant {
    /// Create a constant not yet bound to a block.
    pub fn new(
        name: impl Into<String>,
        name_in_table: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            name_in_table: name_in_table.into(),
            field_type,
            ..Default::default()
        }
    }

    /// Append a table part.
    pub fn append_table_part(&mut self, part: TablePart) -> Result<(), Error> {
        let scope = format!("constant {} table parts", self.name);
        insert_unique(&mut self.table_parts, &scope, part.name.clone(), part)
    }

    /// The constant viewed as a column of [`CONSTANTS_TABLE`].
    pub fn as_field(&self) -> Field {
        Field {
            name: self.name.clone(),
            name_in_table: self.name_in_table.clone(),
            field_type: self.field_type.clone(),
            desc: self.desc.clone(),
            is_export: self.is_export,
            ..Default::default()
        }
    }
}

/// A named group of constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantsBlock {
    /// Block name (unique among blocks).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Constants in declaration order.
    pub constants: IndexMap<String, Constant>,
}

impl ConstantsBlock {
    /// Create an empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a constant, binding it to this block.
    pub fn append_constant(&mut self, mut constant: Constant) -> Result<(), Error> {
        constant.block = self.name.clone();
        let scope = format!("constants block {}", self.name);
        insert_unique(&mut self.constants, &scope, constant.name.clone(), constant)
    }

    /// Deep copy under a new name.
    ///
    /// The copied constants are rebound to the new block; a plain `clone`
    /// would leave them naming the original one.
    pub fn duplicate(&self, name: impl Into<String>) -> ConstantsBlock {
        let mut copy = self.clone();
        copy.name = name.into();
        for constant in copy.constants.values_mut() {
            constant.block = copy.name.clone();
        }
        copy
    }
}
