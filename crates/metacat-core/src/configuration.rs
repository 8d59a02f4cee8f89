//! The catalog root.
//!
//! [`Configuration`] owns every schema object keyed by name, keeps derived
//! relations in sync and carries the session's physical-name reservations.
//! Search lives in [`crate::search`], name allocation in [`crate::naming`].

use crate::error::Error;
use crate::model::{
    insert_unique, AccumulationRegister, Catalog, ConstantsBlock, Document, Enumeration,
    InformationRegister, Journal, QualifiedName,
};
use crate::naming::NameReservations;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Scalar metadata of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationInfo {
    /// Catalog name.
    pub name: String,
    /// Display subtitle.
    pub subtitle: String,
    /// Namespace of the generated application code.
    pub namespace_generated_code: String,
    /// Namespace of the hand-written application code.
    pub namespace: String,
    /// Author shown in the catalog header.
    pub author: String,
    /// Description.
    pub desc: String,
    /// Full-text search dictionary of the backing store.
    pub dictionary_ts_search: String,
    /// UI toolkit version the forms are generated for.
    pub variant: String,
}

/// The metadata catalog.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Scalar metadata.
    pub info: ConfigurationInfo,
    /// Constants blocks by name.
    pub constants_blocks: IndexMap<String, ConstantsBlock>,
    /// Catalogs by name.
    pub catalogs: IndexMap<String, Catalog>,
    /// Documents by name.
    pub documents: IndexMap<String, Document>,
    /// Enumerations by name.
    pub enumerations: IndexMap<String, Enumeration>,
    /// Journals by name.
    pub journals: IndexMap<String, Journal>,
    /// Information registers by name.
    pub information_registers: IndexMap<String, InformationRegister>,
    /// Accumulation registers by name.
    pub accumulation_registers: IndexMap<String, AccumulationRegister>,
    /// Physical names handed out during this session. Never persisted.
    pub reservations: NameReservations,
}

/// Catalog identity excludes the session reservations.
impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
            && self.constants_blocks == other.constants_blocks
            && self.catalogs == other.catalogs
            && self.documents == other.documents
            && self.enumerations == other.enumerations
            && self.journals == other.journals
            && self.information_registers == other.information_registers
            && self.accumulation_registers == other.accumulation_registers
    }
}

impl Eq for Configuration {}

impl Configuration {
    /// Create an empty catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: ConfigurationInfo {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// The catalog written when no persisted document exists yet.
    pub fn empty_default() -> Self {
        Self {
            info: ConfigurationInfo {
                name: "NewConfiguration".to_string(),
                subtitle: "New configuration".to_string(),
                namespace_generated_code: "GeneratedCode".to_string(),
                namespace: "Application".to_string(),
                dictionary_ts_search: "simple".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Append a constants block.
    pub fn append_constants_block(&mut self, block: ConstantsBlock) -> Result<(), Error> {
        insert_unique(
            &mut self.constants_blocks,
            "constants blocks",
            block.name.clone(),
            block,
        )
    }

    /// Append a catalog.
    pub fn append_catalog(&mut self, catalog: Catalog) -> Result<(), Error> {
        insert_unique(&mut self.catalogs, "catalogs", catalog.name.clone(), catalog)
    }

    /// Append a document.
    pub fn append_document(&mut self, document: Document) -> Result<(), Error> {
        insert_unique(
            &mut self.documents,
            "documents",
            document.name.clone(),
            document,
        )
    }

    /// Append an enumeration.
    pub fn append_enumeration(&mut self, enumeration: Enumeration) -> Result<(), Error> {
        insert_unique(
            &mut self.enumerations,
            "enumerations",
            enumeration.name.clone(),
            enumeration,
        )
    }

    /// Append a journal.
    pub fn append_journal(&mut self, journal: Journal) -> Result<(), Error> {
        insert_unique(&mut self.journals, "journals", journal.name.clone(), journal)
    }

    /// Append an information register.
    pub fn append_information_register(
        &mut self,
        register: InformationRegister,
    ) -> Result<(), Error> {
        insert_unique(
            &mut self.information_registers,
            "information registers",
            register.name.clone(),
            register,
        )
    }

    /// Append an accumulation register.
    pub fn append_accumulation_register(
        &mut self,
        register: AccumulationRegister,
    ) -> Result<(), Error> {
        insert_unique(
            &mut self.accumulation_registers,
            "accumulation registers",
            register.name.clone(),
            register,
        )
    }

    /// Rebuild every accumulation register's `allow_document_spend` from the
    /// documents' `allow_register_accumulation` lists.
    ///
    /// Running it again without changes to the documents yields the same lists.
    pub fn calculate_allow_document_spend(&mut self) {
        for register in self.accumulation_registers.values_mut() {
            register.allow_document_spend.clear();
        }

        for document in self.documents.values() {
            for register_name in &document.allow_register_accumulation {
                match self.accumulation_registers.get_mut(register_name) {
                    Some(register) => {
                        if !register.allow_document_spend.contains(&document.name) {
                            register.allow_document_spend.push(document.name.clone());
                        }
                    }
                    None => warn!(
                        document = %document.name,
                        register = %register_name,
                        "document posts to an unknown accumulation register"
                    ),
                }
            }
        }
        debug!(
            registers = self.accumulation_registers.len(),
            "recalculated document spend lists"
        );
    }

    /// Remove a catalog unless some field, owned catalog or delegated
    /// hierarchy still points at it.
    pub fn remove_catalog(&mut self, name: &str) -> Result<Option<Catalog>, Error> {
        self.ensure_unreferenced(&QualifiedName::catalog(name))?;
        Ok(self.catalogs.shift_remove(name))
    }

    /// Remove a document unless some field or journal still points at it.
    pub fn remove_document(&mut self, name: &str) -> Result<Option<Document>, Error> {
        self.ensure_unreferenced(&QualifiedName::document(name))?;
        Ok(self.documents.shift_remove(name))
    }

    /// Remove an enumeration unless some field still uses it.
    pub fn remove_enumeration(&mut self, name: &str) -> Result<Option<Enumeration>, Error> {
        let target = QualifiedName::enumeration(name).to_string();
        let usages = self.find_enum_usages(&target)?;
        if !usages.is_empty() {
            return Err(Error::HasDependents {
                target,
                count: usages.len(),
            });
        }
        Ok(self.enumerations.shift_remove(name))
    }

    fn ensure_unreferenced(&self, target: &QualifiedName) -> Result<(), Error> {
        let target = target.to_string();
        let count = self.find_dependencies(&target)?.len()
            + self.find_object_references(&target)?.len();
        if count == 0 {
            Ok(())
        } else {
            Err(Error::HasDependents { target, count })
        }
    }

    /// Every physical table id used anywhere in the catalog.
    pub fn all_tables(&self) -> Vec<&str> {
        let mut tables = Vec::new();
        for block in self.constants_blocks.values() {
            for constant in block.constants.values() {
                tables.extend(constant.table_parts.values().map(|p| p.table.as_str()));
            }
        }
        for catalog in self.catalogs.values() {
            tables.push(catalog.table.as_str());
            tables.extend(catalog.table_parts.values().map(|p| p.table.as_str()));
        }
        for document in self.documents.values() {
            tables.push(document.table.as_str());
            tables.extend(document.table_parts.values().map(|p| p.table.as_str()));
        }
        for register in self.information_registers.values() {
            tables.push(register.table.as_str());
        }
        for register in self.accumulation_registers.values() {
            tables.push(register.table.as_str());
            tables.extend(register.table_parts.values().map(|p| p.table.as_str()));
        }
        tables
    }
}
