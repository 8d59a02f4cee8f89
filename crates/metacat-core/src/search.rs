//! Cross-object search over the whole catalog.
//!
//! All searches share one traversal: constants, catalogs, documents,
//! information registers, then accumulation registers. Within an object its
//! own fields come before table-part fields, and every collection is walked
//! in insertion order, so results are deterministic.

use crate::configuration::Configuration;
use crate::error::Error;
use crate::model::{
    parse_enum_pointer, parse_pointer, Field, FieldType, Hierarchy, PointerKind, QualifiedName,
    CONSTANTS_TABLE,
};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Top-level section an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Group {
    Constants,
    Catalogs,
    Documents,
    InformationRegisters,
    AccumulationRegisters,
}

impl Group {
    /// Label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Constants => "Constants",
            Group::Catalogs => "Catalogs",
            Group::Documents => "Documents",
            Group::InformationRegisters => "InformationRegisters",
            Group::AccumulationRegisters => "AccumulationRegisters",
        }
    }
}

/// Where a field sits inside its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupLevel {
    /// A field of the object itself.
    Object,
    /// A field of a table part linked to its owner row by an owner column.
    TablePart,
    /// A field of a table part with no owner column (constants and
    /// accumulation registers).
    TablePartWithoutOwner,
}

/// How [`Configuration::find_pointer_usages`] renders each usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageFormat {
    /// `"<Group>: <Object>.<Field> [<table>.<column>]"`.
    Label,
    /// `"<table>.<column>"`.
    Column,
}

/// A field that references a searched-for object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    /// Section holding the owning object.
    pub group_name: String,
    /// Whether the field sits on the object or in a table part.
    pub group_level: GroupLevel,
    /// Owning table part, if any.
    pub table_part_name: Option<String>,
    /// Owning object name.
    pub object_name: String,
    /// Owning object description.
    pub object_desc: String,
    /// Physical table holding the field.
    pub table: String,
    /// Field name.
    pub field_name: String,
    /// The field itself.
    pub field: Field,
}

/// A reference field whose target cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingPointer {
    /// Human-readable location of the field.
    pub location: String,
    /// The unresolved target.
    pub pointer: String,
    /// Why the target cannot be resolved.
    pub reason: String,
}

/// A reference held by an object outside its fields: a catalog's owner or
/// folder catalog, or a document listed by a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReference {
    /// Human-readable location of the reference.
    pub location: String,
    /// The referenced qualified name.
    pub pointer: String,
}

struct FieldSite<'a> {
    group: Group,
    level: GroupLevel,
    object_name: &'a str,
    object_desc: &'a str,
    table_part: Option<&'a str>,
    table: &'a str,
    field: Cow<'a, Field>,
}

impl FieldSite<'_> {
    fn column(&self) -> String {
        format!("{}.{}", self.table, self.field.name_in_table)
    }

    fn label(&self) -> String {
        let path = match self.table_part {
            Some(part) => format!("{}.{}.{}", self.object_name, part, self.field.name),
            None => format!("{}.{}", self.object_name, self.field.name),
        };
        format!("{}: {} [{}]", self.group.as_str(), path, self.column())
    }

    fn to_record(&self) -> DependencyRecord {
        DependencyRecord {
            group_name: self.group.as_str().to_string(),
            group_level: self.level,
            table_part_name: self.table_part.map(str::to_string),
            object_name: self.object_name.to_string(),
            object_desc: self.object_desc.to_string(),
            table: self.table.to_string(),
            field_name: self.field.name.clone(),
            field: self.field.clone().into_owned(),
        }
    }
}

fn sites<'a>(
    group: Group,
    level: GroupLevel,
    object_name: &'a str,
    object_desc: &'a str,
    table_part: Option<&'a str>,
    table: &'a str,
    fields: impl IntoIterator<Item = &'a Field>,
) -> impl Iterator<Item = FieldSite<'a>> {
    fields.into_iter().map(move |field| FieldSite {
        group,
        level,
        object_name,
        object_desc,
        table_part,
        table,
        field: Cow::Borrowed(field),
    })
}

impl Configuration {
    fn visit_fields<'a>(&'a self, mut visit: impl FnMut(FieldSite<'a>)) {
        // A constant is a column of the block; its table parts hang off the
        // constant itself.
        for block in self.constants_blocks.values() {
            for constant in block.constants.values() {
                visit(FieldSite {
                    group: Group::Constants,
                    level: GroupLevel::Object,
                    object_name: &block.name,
                    object_desc: &block.desc,
                    table_part: None,
                    table: CONSTANTS_TABLE,
                    field: Cow::Owned(constant.as_field()),
                });
                for part in constant.table_parts.values() {
                    sites(
                        Group::Constants,
                        GroupLevel::TablePartWithoutOwner,
                        &constant.name,
                        &constant.desc,
                        Some(&part.name),
                        &part.table,
                        part.fields.values(),
                    )
                    .for_each(&mut visit);
                }
            }
        }

        for catalog in self.catalogs.values() {
            let (name, desc) = (catalog.name.as_str(), catalog.desc.as_str());
            sites(
                Group::Catalogs,
                GroupLevel::Object,
                name,
                desc,
                None,
                &catalog.table,
                catalog.fields.values(),
            )
            .for_each(&mut visit);
            for part in catalog.table_parts.values() {
                sites(
                    Group::Catalogs,
                    GroupLevel::TablePart,
                    name,
                    desc,
                    Some(&part.name),
                    &part.table,
                    part.fields.values(),
                )
                .for_each(&mut visit);
            }
        }

        for document in self.documents.values() {
            let (name, desc) = (document.name.as_str(), document.desc.as_str());
            sites(
                Group::Documents,
                GroupLevel::Object,
                name,
                desc,
                None,
                &document.table,
                document.fields.values(),
            )
            .for_each(&mut visit);
            for part in document.table_parts.values() {
                sites(
                    Group::Documents,
                    GroupLevel::TablePart,
                    name,
                    desc,
                    Some(&part.name),
                    &part.table,
                    part.fields.values(),
                )
                .for_each(&mut visit);
            }
        }

        for register in self.information_registers.values() {
            let fields = register
                .dimension_fields
                .values()
                .chain(register.resource_fields.values())
                .chain(register.property_fields.values());
            sites(
                Group::InformationRegisters,
                GroupLevel::Object,
                &register.name,
                &register.desc,
                None,
                &register.table,
                fields,
            )
            .for_each(&mut visit);
        }

        for register in self.accumulation_registers.values() {
            let (name, desc) = (register.name.as_str(), register.desc.as_str());
            let fields = register
                .dimension_fields
                .values()
                .chain(register.resource_fields.values())
                .chain(register.property_fields.values());
            sites(
                Group::AccumulationRegisters,
                GroupLevel::Object,
                name,
                desc,
                None,
                &register.table,
                fields,
            )
            .for_each(&mut visit);
            for part in register.table_parts.values() {
                sites(
                    Group::AccumulationRegisters,
                    GroupLevel::TablePartWithoutOwner,
                    name,
                    desc,
                    Some(&part.name),
                    &part.table,
                    part.fields.values(),
                )
                .for_each(&mut visit);
            }
        }
    }

    /// Walk references held outside fields, in catalog then journal order.
    /// Unset (empty) references are skipped.
    fn visit_object_references(&self, mut visit: impl FnMut(String, String)) {
        for catalog in self.catalogs.values() {
            if let Some(sub) = catalog.subordination.as_ref().filter(|s| !s.owner.is_empty()) {
                visit(
                    format!("Catalogs: {}.Subordination", catalog.name),
                    sub.owner.clone(),
                );
            }
            if let Hierarchy::DelegatedToCatalog { catalog: folders, .. } = &catalog.hierarchy {
                if !folders.is_empty() {
                    visit(format!("Catalogs: {}.Hierarchy", catalog.name), folders.clone());
                }
            }
        }

        for journal in self.journals.values() {
            for document in &journal.allowed_documents {
                visit(
                    format!("Journals: {}.AllowDocuments", journal.name),
                    QualifiedName::document(document.as_str()).to_string(),
                );
            }
            for list in journal.lists.values() {
                for document in list.bindings.keys() {
                    visit(
                        format!("Journals: {}.{}.Bindings", journal.name, list.name),
                        QualifiedName::document(document.as_str()).to_string(),
                    );
                }
            }
        }
    }

    /// Object-level references to `target` (`Catalog.X` or `Document.X`)
    /// that are not fields: subordination owners, hierarchy folder catalogs
    /// and journal document lists.
    pub fn find_object_references(&self, target: &str) -> Result<Vec<ObjectReference>, Error> {
        parse_pointer(target)?;
        let mut references = Vec::new();
        self.visit_object_references(|location, pointer| {
            if pointer == target {
                references.push(ObjectReference { location, pointer });
            }
        });
        debug!(target, found = references.len(), "object references");
        Ok(references)
    }

    /// Every pointer field targeting `target` (`Catalog.X` or `Document.X`).
    pub fn find_pointer_usages(
        &self,
        target: &str,
        format: UsageFormat,
    ) -> Result<Vec<String>, Error> {
        parse_pointer(target)?;
        let mut usages = Vec::new();
        self.visit_fields(|site| {
            if site.field.points_to(target) {
                usages.push(match format {
                    UsageFormat::Label => site.label(),
                    UsageFormat::Column => site.column(),
                });
            }
        });
        debug!(target, found = usages.len(), "pointer usages");
        Ok(usages)
    }

    /// Structured records for every pointer field targeting `target`.
    ///
    /// A non-empty result means removing the target would leave those fields
    /// dangling.
    pub fn find_dependencies(&self, target: &str) -> Result<Vec<DependencyRecord>, Error> {
        parse_pointer(target)?;
        let mut records = Vec::new();
        self.visit_fields(|site| {
            if site.field.points_to(target) {
                records.push(site.to_record());
            }
        });
        debug!(target, found = records.len(), "dependencies");
        Ok(records)
    }

    /// Every enum field targeting `target` (`Enumerations.X`).
    pub fn find_enum_usages(&self, target: &str) -> Result<Vec<DependencyRecord>, Error> {
        parse_enum_pointer(target)?;
        let mut records = Vec::new();
        self.visit_fields(|site| {
            if site.field.enumerates(target) {
                records.push(site.to_record());
            }
        });
        debug!(target, found = records.len(), "enum usages");
        Ok(records)
    }

    /// References whose target is malformed or missing: reference fields
    /// first, then the object-level references of
    /// [`Configuration::find_object_references`].
    ///
    /// References are otherwise only checked when searched for; this is the
    /// explicit whole-catalog check.
    pub fn find_dangling_pointers(&self) -> Vec<DanglingPointer> {
        let mut dangling = Vec::new();
        self.visit_fields(|site| {
            let mut report = |pointer: &str, reason: String| {
                dangling.push(DanglingPointer {
                    location: site.label(),
                    pointer: pointer.to_string(),
                    reason,
                })
            };
            match &site.field.field_type {
                FieldType::Pointer { pointer } => match parse_pointer(pointer) {
                    Err(e) => report(pointer.as_str(), e.to_string()),
                    Ok(name) => {
                        let exists = match name.kind {
                            PointerKind::Catalog => self.catalogs.contains_key(&name.type_name),
                            PointerKind::Document => self.documents.contains_key(&name.type_name),
                            PointerKind::Enumeration => false,
                        };
                        if !exists {
                            report(pointer.as_str(), "target does not exist".to_string());
                        }
                    }
                },
                FieldType::Enum { pointer } => match parse_enum_pointer(pointer) {
                    Err(e) => report(pointer.as_str(), e.to_string()),
                    Ok(name) if !self.enumerations.contains_key(&name.type_name) => {
                        report(pointer.as_str(), "target does not exist".to_string())
                    }
                    Ok(_) => {}
                },
                FieldType::CompositePointer(targets) => {
                    for catalog in &targets.allowed_catalogs {
                        if !self.catalogs.contains_key(catalog) {
                            report(catalog.as_str(), "allowed catalog does not exist".to_string());
                        }
                    }
                    for document in &targets.allowed_documents {
                        if !self.documents.contains_key(document) {
                            report(document.as_str(), "allowed document does not exist".to_string());
                        }
                    }
                }
                _ => {}
            }
        });

        self.visit_object_references(|location, pointer| {
            let reason = match parse_pointer(&pointer) {
                Err(e) => Some(e.to_string()),
                Ok(name) => {
                    let exists = match name.kind {
                        PointerKind::Catalog => self.catalogs.contains_key(&name.type_name),
                        PointerKind::Document => self.documents.contains_key(&name.type_name),
                        PointerKind::Enumeration => false,
                    };
                    (!exists).then(|| "target does not exist".to_string())
                }
            };
            if let Some(reason) = reason {
                dangling.push(DanglingPointer {
                    location,
                    pointer,
                    reason,
                });
            }
        });
        dangling
    }
}
