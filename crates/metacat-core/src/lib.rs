//! Metacat Core - Metadata catalog engine.
//!
//! This crate holds the schema object graph of an application (constants,
//! catalogs, documents, enumerations, journals and registers), the searches
//! that run over it, physical table and column name allocation, and the
//! persisted document format.

pub mod codec;
pub mod configuration;
pub mod error;
pub mod lister;
pub mod model;
pub mod naming;
pub mod search;
pub mod store;

pub use configuration::{Configuration, ConfigurationInfo};
pub use error::Error;
pub use lister::{StaticTableLister, TableLister};
pub use model::{
    combine_all_fields_for_register, parse_enum_pointer, parse_pointer, AccumulationKind,
    AccumulationRegister, Catalog, CompositeTargets, Constant, ConstantsBlock, Document,
    EnumMember, Enumeration, Field, FieldGroup, FieldType, Fields, Form, FormType, Hierarchy,
    HookFunction, InformationRegister, Journal, JournalList, ListColumn, ObjectTriggers,
    PointerKind, QualifiedName, QueryBlock, SpendFunctions, Subordination, TablePart,
    TablePartTriggers, TabularList, CONSTANTS_TABLE,
};
pub use naming::{validate_object_name, NameReservations, NameValidation};
pub use search::{
    DanglingPointer, DependencyRecord, Group, GroupLevel, ObjectReference, UsageFormat,
};
pub use store::{Store, StoreConfig};
