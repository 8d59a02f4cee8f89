//! Catalog → document.
//!
//! Keys are emitted in a fixed order; with `serde_json`'s `preserve_order`
//! the written document follows it exactly.

use super::blob::encode_blob;
use super::sections;
use crate::configuration::{Configuration, ConfigurationInfo};
use crate::error::Error;
use crate::model::{
    AccumulationRegister, Catalog, Constant, ConstantsBlock, Document, Enumeration, Field,
    FieldType, Fields, Form, Hierarchy, HookFunction, InformationRegister, Journal, TablePart,
    TabularList,
};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

struct Encoder {
    compress_blobs: bool,
}

pub(crate) fn encode(conf: &Configuration, compress_blobs: bool) -> Result<Value, Error> {
    let encoder = Encoder { compress_blobs };
    let mut root = Map::new();
    root.insert(sections::CONFIGURATION.into(), info(&conf.info));
    root.insert(
        sections::CONSTANTS_BLOCKS.into(),
        encoder.list(conf.constants_blocks.values(), Encoder::constants_block)?,
    );
    root.insert(
        sections::CATALOGS.into(),
        encoder.list(conf.catalogs.values(), Encoder::catalog)?,
    );
    root.insert(
        sections::DOCUMENTS.into(),
        encoder.list(conf.documents.values(), Encoder::document)?,
    );
    root.insert(
        sections::ENUMERATIONS.into(),
        Value::Array(conf.enumerations.values().map(enumeration).collect()),
    );
    root.insert(
        sections::JOURNALS.into(),
        Value::Array(conf.journals.values().map(journal).collect()),
    );
    root.insert(
        sections::INFORMATION_REGISTERS.into(),
        encoder.list(conf.information_registers.values(), Encoder::information_register)?,
    );
    root.insert(
        sections::ACCUMULATION_REGISTERS.into(),
        encoder.list(conf.accumulation_registers.values(), Encoder::accumulation_register)?,
    );
    Ok(Value::Object(root))
}

fn info(info: &ConfigurationInfo) -> Value {
    json!({
        "Name": info.name,
        "Subtitle": info.subtitle,
        "NameSpaceGeneratedCode": info.namespace_generated_code,
        "NameSpace": info.namespace,
        "Author": info.author,
        "Desc": info.desc,
        "DictTSearch": info.dictionary_ts_search,
        "Variant": info.variant,
    })
}

/// Write the `Type` tag and its type-specific payload.
fn put_type(map: &mut Map<String, Value>, field_type: &FieldType) {
    map.insert("Type".into(), field_type.tag().into());
    match field_type {
        FieldType::Text { multiline } => {
            map.insert("Multiline".into(), (*multiline).into());
        }
        FieldType::Integer {
            automatic_numbering,
        } => {
            map.insert("AutomaticNumbering".into(), (*automatic_numbering).into());
        }
        FieldType::Pointer { pointer } | FieldType::Enum { pointer } => {
            map.insert("Pointer".into(), pointer.as_str().into());
        }
        FieldType::CompositePointer(targets) => {
            map.insert(
                "CompositePointer".into(),
                json!({
                    "ExcludeDirectories": targets.exclude_catalogs,
                    "ExcludeDocuments": targets.exclude_documents,
                    "AllowDirectories": targets.allowed_catalogs,
                    "AllowDocuments": targets.allowed_documents,
                }),
            );
        }
        _ => {}
    }
}

fn field(field: &Field) -> Value {
    let mut map = Map::new();
    map.insert("Name".into(), field.name.as_str().into());
    map.insert("NameInTable".into(), field.name_in_table.as_str().into());
    put_type(&mut map, &field.field_type);
    map.insert("Desc".into(), field.desc.as_str().into());
    map.insert("IsPresentation".into(), field.is_presentation.into());
    map.insert("IsIndex".into(), field.is_index.into());
    map.insert("IsFullTextSearch".into(), field.is_full_text_search.into());
    map.insert("IsSearch".into(), field.is_search.into());
    map.insert("IsExport".into(), field.is_export.into());
    Value::Object(map)
}

fn fields(fields: &Fields) -> Value {
    Value::Array(fields.values().map(field).collect())
}

fn hook(hook: &HookFunction) -> Value {
    json!({ "Name": hook.name, "Action": hook.enabled })
}

fn hooks<'a>(slots: impl IntoIterator<Item = (&'static str, &'a HookFunction)>) -> Value {
    Value::Object(
        slots
            .into_iter()
            .map(|(key, h)| (key.to_string(), hook(h)))
            .collect(),
    )
}

fn tabular_list(list: &TabularList) -> Value {
    let columns: Vec<Value> = list
        .columns
        .values()
        .map(|c| {
            json!({
                "Name": c.name,
                "Caption": c.caption,
                "Size": c.size,
                "SortNum": c.sort_num,
                "SortField": c.sort_field,
                "SortDescending": c.sort_descending,
            })
        })
        .collect();
    json!({ "Name": list.name, "Desc": list.desc, "Fields": columns })
}

fn tabular_lists(lists: &IndexMap<String, TabularList>) -> Value {
    Value::Array(lists.values().map(tabular_list).collect())
}

fn enumeration(enumeration: &Enumeration) -> Value {
    let members: Vec<Value> = enumeration
        .members
        .values()
        .map(|m| json!({ "Name": m.name, "Value": m.value, "Desc": m.desc }))
        .collect();
    json!({
        "Name": enumeration.name,
        "Desc": enumeration.desc,
        "SerialNumber": enumeration.serial_number,
        "Fields": members,
    })
}

fn journal(journal: &Journal) -> Value {
    let lists: Vec<Value> = journal
        .lists
        .values()
        .map(|list| {
            let bindings: Map<String, Value> = list
                .bindings
                .iter()
                .map(|(document, fields)| {
                    let fields: Map<String, Value> = fields
                        .iter()
                        .map(|(j, d)| (j.clone(), Value::String(d.clone())))
                        .collect();
                    (document.clone(), Value::Object(fields))
                })
                .collect();
            json!({ "Name": list.name, "Desc": list.desc, "Bindings": bindings })
        })
        .collect();
    json!({
        "Name": journal.name,
        "Desc": journal.desc,
        "Fields": fields(&journal.fields),
        "AllowDocuments": journal.allowed_documents,
        "TabularLists": lists,
    })
}

impl Encoder {
    fn list<'a, T: 'a>(
        &self,
        items: impl IntoIterator<Item = &'a T>,
        encode: fn(&Self, &T) -> Result<Value, Error>,
    ) -> Result<Value, Error> {
        items
            .into_iter()
            .map(|item| encode(self, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn form(&self, form: &Form) -> Result<Value, Error> {
        Ok(json!({
            "Name": form.name,
            "Desc": form.desc,
            "Type": form.form_type.as_str(),
            "GeneratedCode": encode_blob(&form.generated_code, self.compress_blobs)?,
            "ModifiedCode": encode_blob(&form.modified_code, self.compress_blobs)?,
        }))
    }

    fn forms(&self, forms: &IndexMap<String, Form>) -> Result<Value, Error> {
        self.list(forms.values(), Encoder::form)
    }

    fn table_part(&self, part: &TablePart) -> Result<Value, Error> {
        Ok(json!({
            "Name": part.name,
            "FullName": part.full_name,
            "Table": part.table,
            "Desc": part.desc,
            "VersionsHistory": part.versions_history,
            "Fields": fields(&part.fields),
            "TabularLists": tabular_lists(&part.tabular_lists),
            "Forms": self.forms(&part.forms)?,
            "TriggerFunctions": hooks([
                ("BeforeSave", &part.triggers.before_save),
                ("AfterSave", &part.triggers.after_save),
            ]),
        }))
    }

    fn table_parts(&self, parts: &IndexMap<String, TablePart>) -> Result<Value, Error> {
        self.list(parts.values(), Encoder::table_part)
    }

    fn constant(&self, constant: &Constant) -> Result<Value, Error> {
        let mut map = Map::new();
        map.insert("Name".into(), constant.name.as_str().into());
        map.insert("FullName".into(), constant.full_name.as_str().into());
        map.insert("NameInTable".into(), constant.name_in_table.as_str().into());
        put_type(&mut map, &constant.field_type);
        map.insert("Desc".into(), constant.desc.as_str().into());
        map.insert("IsExport".into(), constant.is_export.into());
        map.insert("TableParts".into(), self.table_parts(&constant.table_parts)?);
        Ok(Value::Object(map))
    }

    fn constants_block(&self, block: &ConstantsBlock) -> Result<Value, Error> {
        Ok(json!({
            "Name": block.name,
            "Desc": block.desc,
            "Constants": self.list(block.constants.values(), Encoder::constant)?,
        }))
    }

    fn catalog(&self, catalog: &Catalog) -> Result<Value, Error> {
        let mut hierarchy = Map::new();
        hierarchy.insert("Type".into(), catalog.hierarchy.tag().into());
        match &catalog.hierarchy {
            Hierarchy::Flat => {}
            Hierarchy::Hierarchical { parent_field } => {
                hierarchy.insert("ParentField".into(), parent_field.as_str().into());
            }
            Hierarchy::DelegatedToCatalog { catalog, field } => {
                hierarchy.insert("Pointer".into(), catalog.as_str().into());
                hierarchy.insert("Field".into(), field.as_str().into());
            }
        }

        let mut map = Map::new();
        map.insert("Name".into(), catalog.name.as_str().into());
        map.insert("FullName".into(), catalog.full_name.as_str().into());
        map.insert("Table".into(), catalog.table.as_str().into());
        map.insert("Desc".into(), catalog.desc.as_str().into());
        map.insert("Hierarchy".into(), Value::Object(hierarchy));
        if let Some(sub) = &catalog.subordination {
            map.insert(
                "Subordination".into(),
                json!({ "Owner": sub.owner, "Field": sub.field }),
            );
        }
        map.insert("AutoNum".into(), catalog.auto_numbering.into());
        map.insert("VersionsHistory".into(), catalog.versions_history.into());
        map.insert("Fields".into(), fields(&catalog.fields));
        map.insert("TableParts".into(), self.table_parts(&catalog.table_parts)?);
        map.insert("TabularLists".into(), tabular_lists(&catalog.tabular_lists));
        map.insert("Forms".into(), self.forms(&catalog.forms)?);
        let t = &catalog.triggers;
        map.insert(
            "TriggerFunctions".into(),
            hooks([
                ("New", &t.new),
                ("Copying", &t.copying),
                ("BeforeSave", &t.before_save),
                ("AfterSave", &t.after_save),
                ("SetDeletionLabel", &t.set_deletion_label),
                ("BeforeDelete", &t.before_delete),
            ]),
        );
        Ok(Value::Object(map))
    }

    fn document(&self, document: &Document) -> Result<Value, Error> {
        let t = &document.triggers;
        let s = &document.spend_functions;
        Ok(json!({
            "Name": document.name,
            "FullName": document.full_name,
            "Table": document.table,
            "Desc": document.desc,
            "AutoNum": document.auto_numbering,
            "VersionsHistory": document.versions_history,
            "ExportXml": document.export_xml,
            "AllowRegisterAccumulation": document.allow_register_accumulation,
            "Fields": fields(&document.fields),
            "TableParts": self.table_parts(&document.table_parts)?,
            "TabularLists": tabular_lists(&document.tabular_lists),
            "Forms": self.forms(&document.forms)?,
            "TriggerFunctions": hooks([
                ("New", &t.new),
                ("Copying", &t.copying),
                ("BeforeSave", &t.before_save),
                ("AfterSave", &t.after_save),
                ("SetDeletionLabel", &t.set_deletion_label),
                ("BeforeDelete", &t.before_delete),
            ]),
            "SpendFunctions": hooks([("Spend", &s.spend), ("ClearSpend", &s.clear_spend)]),
        }))
    }

    fn information_register(&self, register: &InformationRegister) -> Result<Value, Error> {
        Ok(json!({
            "Name": register.name,
            "FullName": register.full_name,
            "Table": register.table,
            "Desc": register.desc,
            "DimensionFields": fields(&register.dimension_fields),
            "ResourcesFields": fields(&register.resource_fields),
            "PropertyFields": fields(&register.property_fields),
            "TabularLists": tabular_lists(&register.tabular_lists),
            "Forms": self.forms(&register.forms)?,
        }))
    }

    fn accumulation_register(&self, register: &AccumulationRegister) -> Result<Value, Error> {
        let query_blocks: Vec<Value> = register
            .query_blocks
            .values()
            .map(|block| {
                json!({
                    "Name": block.name,
                    "FinalCalculation": block.final_calculation,
                    "Query": block.queries,
                })
            })
            .collect();
        Ok(json!({
            "Name": register.name,
            "FullName": register.full_name,
            "Table": register.table,
            "Desc": register.desc,
            "Type": register.kind.as_str(),
            "NoSummary": register.no_summary_table,
            "AllowDocumentSpend": register.allow_document_spend,
            "DimensionFields": fields(&register.dimension_fields),
            "ResourcesFields": fields(&register.resource_fields),
            "PropertyFields": fields(&register.property_fields),
            "TableParts": self.table_parts(&register.table_parts)?,
            "TabularLists": tabular_lists(&register.tabular_lists),
            "Forms": self.forms(&register.forms)?,
            "QueryBlockList": query_blocks,
        }))
    }
}
