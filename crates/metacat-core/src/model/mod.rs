//! Schema object model.
//!
//! Every collection is an insertion-ordered map keyed by the element's name.
//! Cross-object references are qualified names resolved on demand, so the
//! graph is a tree of owned values and `Clone` yields an independent copy.

mod catalog;
mod constants;
mod containers;
mod document;
mod enumeration;
mod field;
mod journal;
pub mod pointer;
mod register;
mod types;

pub use catalog::{Catalog, Hierarchy, Subordination};
pub use constants::{Constant, ConstantsBlock, CONSTANTS_TABLE};
pub use containers::{
    Form, FormType, HookFunction, ListColumn, ObjectTriggers, SpendFunctions, TablePart,
    TablePartTriggers, TabularList,
};
pub use document::Document;
pub use enumeration::{EnumMember, Enumeration};
pub use field::{Field, Fields};
pub use journal::{Journal, JournalList};
pub use pointer::{parse_enum_pointer, parse_pointer, PointerKind, QualifiedName};
pub use register::{
    combine_all_fields_for_register, AccumulationKind, AccumulationRegister, FieldGroup,
    InformationRegister, QueryBlock,
};
pub use types::{CompositeTargets, FieldType};

use crate::error::Error;
use indexmap::IndexMap;

/// Insert into a uniquely keyed map, failing if the key is taken.
pub(crate) fn insert_unique<V>(
    map: &mut IndexMap<String, V>,
    scope: &str,
    key: String,
    value: V,
) -> Result<(), Error> {
    if map.contains_key(&key) {
        return Err(Error::DuplicateKey {
            scope: scope.to_string(),
            key,
        });
    }
    map.insert(key, value);
    Ok(())
}
