//! Document → catalog.

use super::reader::Node;
use super::sections;
use crate::configuration::{Configuration, ConfigurationInfo};
use crate::error::Error;
use crate::model::{
    AccumulationKind, AccumulationRegister, Catalog, CompositeTargets, Constant, ConstantsBlock,
    Document, EnumMember, Enumeration, Field, FieldGroup, FieldType, Fields, Form, FormType,
    Hierarchy, HookFunction, InformationRegister, Journal, JournalList, ListColumn,
    ObjectTriggers, QueryBlock, SpendFunctions, Subordination, TablePart, TablePartTriggers,
    TabularList,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

pub(crate) fn decode(document: &Value) -> Result<Configuration, Error> {
    let root = Node::new(document, "$")?;
    let mut conf = Configuration::default();

    if let Some(node) = root.child(sections::CONFIGURATION)? {
        conf.info = info(&node)?;
    }
    for node in root.children(sections::CONSTANTS_BLOCKS)? {
        conf.append_constants_block(constants_block(&node)?)?;
    }
    for node in root.children(sections::CATALOGS)? {
        conf.append_catalog(catalog(&node)?)?;
    }
    for node in root.children(sections::DOCUMENTS)? {
        conf.append_document(document_object(&node)?)?;
    }
    for node in root.children(sections::ENUMERATIONS)? {
        conf.append_enumeration(enumeration(&node)?)?;
    }
    for node in root.children(sections::JOURNALS)? {
        conf.append_journal(journal(&node)?)?;
    }
    for node in root.children(sections::INFORMATION_REGISTERS)? {
        conf.append_information_register(information_register(&node)?)?;
    }
    for node in root.children(sections::ACCUMULATION_REGISTERS)? {
        conf.append_accumulation_register(accumulation_register(&node)?)?;
    }
    Ok(conf)
}

fn info(node: &Node<'_>) -> Result<ConfigurationInfo, Error> {
    Ok(ConfigurationInfo {
        name: node.required("Name")?,
        subtitle: node.optional("Subtitle"),
        namespace_generated_code: node.optional("NameSpaceGeneratedCode"),
        namespace: node.optional("NameSpace"),
        author: node.optional("Author"),
        desc: node.optional("Desc"),
        dictionary_ts_search: node.optional("DictTSearch"),
        variant: node.optional("Variant"),
    })
}

fn field_type(node: &Node<'_>) -> Result<FieldType, Error> {
    let tag: String = node.optional("Type");
    Ok(match tag.as_str() {
        "" | "string" => FieldType::Text {
            multiline: node.optional("Multiline"),
        },
        "integer" => FieldType::Integer {
            automatic_numbering: node.optional("AutomaticNumbering"),
        },
        "numeric" => FieldType::Numeric,
        "boolean" => FieldType::Boolean,
        "date" => FieldType::Date,
        "datetime" => FieldType::DateTime,
        "time" => FieldType::Time,
        "uuid" => FieldType::Uuid,
        "bytea" => FieldType::Bytes,
        "pointer" => FieldType::Pointer {
            pointer: node.optional("Pointer"),
        },
        "enum" => FieldType::Enum {
            pointer: node.optional("Pointer"),
        },
        "composite_pointer" => {
            let targets = match node.child("CompositePointer")? {
                Some(c) => CompositeTargets {
                    exclude_catalogs: c.optional("ExcludeDirectories"),
                    exclude_documents: c.optional("ExcludeDocuments"),
                    allowed_catalogs: c.strings("AllowDirectories"),
                    allowed_documents: c.strings("AllowDocuments"),
                },
                None => CompositeTargets::default(),
            };
            FieldType::CompositePointer(targets)
        }
        other => {
            return Err(Error::Deserialization(format!(
                "{}: unknown field type `{}`",
                node.path(),
                other
            )))
        }
    })
}

fn field(node: &Node<'_>) -> Result<Field, Error> {
    Ok(Field {
        name: node.required("Name")?,
        name_in_table: node.optional("NameInTable"),
        field_type: field_type(node)?,
        desc: node.optional("Desc"),
        is_presentation: node.optional("IsPresentation"),
        is_index: node.optional("IsIndex"),
        is_full_text_search: node.optional("IsFullTextSearch"),
        is_search: node.optional("IsSearch"),
        is_export: node.optional("IsExport"),
    })
}

fn fields(node: &Node<'_>, key: &str, scope: &str) -> Result<Fields, Error> {
    let mut fields = Fields::new();
    for child in node.children(key)? {
        let field = field(&child)?;
        crate::model::insert_unique(&mut fields, scope, field.name.clone(), field)?;
    }
    Ok(fields)
}

fn hook(node: &Node<'_>, key: &str) -> Result<HookFunction, Error> {
    Ok(match node.child(key)? {
        Some(h) => HookFunction {
            name: h.optional("Name"),
            enabled: h.optional("Action"),
        },
        None => HookFunction::default(),
    })
}

fn object_triggers(node: &Node<'_>) -> Result<ObjectTriggers, Error> {
    let Some(t) = node.child("TriggerFunctions")? else {
        return Ok(ObjectTriggers::default());
    };
    Ok(ObjectTriggers {
        new: hook(&t, "New")?,
        copying: hook(&t, "Copying")?,
        before_save: hook(&t, "BeforeSave")?,
        after_save: hook(&t, "AfterSave")?,
        set_deletion_label: hook(&t, "SetDeletionLabel")?,
        before_delete: hook(&t, "BeforeDelete")?,
    })
}

fn tabular_lists(node: &Node<'_>) -> Result<IndexMap<String, TabularList>, Error> {
    let mut lists = IndexMap::new();
    for child in node.children("TabularLists")? {
        let mut list = TabularList::new(child.required::<String>("Name")?);
        list.desc = child.optional("Desc");
        for column in child.children("Fields")? {
            list.append_column(ListColumn {
                name: column.required("Name")?,
                caption: column.optional("Caption"),
                size: column.optional("Size"),
                sort_num: column.optional("SortNum"),
                sort_field: column.optional("SortField"),
                sort_descending: column.optional("SortDescending"),
            })?;
        }
        crate::model::insert_unique(&mut lists, "tabular lists", list.name.clone(), list)?;
    }
    Ok(lists)
}

fn forms(node: &Node<'_>) -> Result<IndexMap<String, Form>, Error> {
    let mut forms = IndexMap::new();
    for child in node.children("Forms")? {
        let tag: String = child.optional("Type");
        let form_type = FormType::from_tag(&tag).unwrap_or_else(|| {
            warn!(path = child.path(), tag = %tag, "unknown form type, using Element");
            FormType::Element
        });
        let form = Form {
            name: child.required("Name")?,
            desc: child.optional("Desc"),
            form_type,
            generated_code: child.blob("GeneratedCode"),
            modified_code: child.blob("ModifiedCode"),
        };
        crate::model::insert_unique(&mut forms, "forms", form.name.clone(), form)?;
    }
    Ok(forms)
}

fn table_part(node: &Node<'_>) -> Result<TablePart, Error> {
    let mut part = TablePart::new(node.required::<String>("Name")?, node.optional::<String>("Table"));
    part.full_name = node.optional("FullName");
    part.desc = node.optional("Desc");
    part.versions_history = node.optional("VersionsHistory");
    part.fields = fields(node, "Fields", &format!("table part {}", part.name))?;
    part.tabular_lists = tabular_lists(node)?;
    part.forms = forms(node)?;
    if let Some(t) = node.child("TriggerFunctions")? {
        part.triggers = TablePartTriggers {
            before_save: hook(&t, "BeforeSave")?,
            after_save: hook(&t, "AfterSave")?,
        };
    }
    Ok(part)
}

fn table_parts(node: &Node<'_>) -> Result<IndexMap<String, TablePart>, Error> {
    let mut parts = IndexMap::new();
    for child in node.children("TableParts")? {
        let part = table_part(&child)?;
        crate::model::insert_unique(&mut parts, "table parts", part.name.clone(), part)?;
    }
    Ok(parts)
}

fn constants_block(node: &Node<'_>) -> Result<ConstantsBlock, Error> {
    let mut block = ConstantsBlock::new(node.required::<String>("Name")?);
    block.desc = node.optional("Desc");
    for child in node.children("Constants")? {
        let mut constant = Constant::new(
            child.required::<String>("Name")?,
            child.optional::<String>("NameInTable"),
            field_type(&child)?,
        );
        constant.full_name = child.optional("FullName");
        constant.desc = child.optional("Desc");
        constant.is_export = child.optional("IsExport");
        constant.table_parts = table_parts(&child)?;
        block.append_constant(constant)?;
    }
    Ok(block)
}

fn catalog(node: &Node<'_>) -> Result<Catalog, Error> {
    let mut catalog = Catalog::new(node.required::<String>("Name")?, node.optional::<String>("Table"));
    catalog.full_name = node.optional("FullName");
    catalog.desc = node.optional("Desc");
    if let Some(h) = node.child("Hierarchy")? {
        let tag: String = h.optional("Type");
        catalog.hierarchy = match tag.as_str() {
            "Hierarchical" => Hierarchy::Hierarchical {
                parent_field: h.optional("ParentField"),
            },
            "DelegatedToCatalog" => Hierarchy::DelegatedToCatalog {
                catalog: h.optional("Pointer"),
                field: h.optional("Field"),
            },
            _ => Hierarchy::Flat,
        };
    }
    if let Some(s) = node.child("Subordination")? {
        catalog.subordination = Some(Subordination {
            owner: s.optional("Owner"),
            field: s.optional("Field"),
        });
    }
    catalog.auto_numbering = node.optional("AutoNum");
    catalog.versions_history = node.optional("VersionsHistory");
    catalog.fields = fields(node, "Fields", &format!("catalog {}", catalog.name))?;
    catalog.table_parts = table_parts(node)?;
    catalog.tabular_lists = tabular_lists(node)?;
    catalog.forms = forms(node)?;
    catalog.triggers = object_triggers(node)?;
    Ok(catalog)
}

fn document_object(node: &Node<'_>) -> Result<Document, Error> {
    let mut document =
        Document::new(node.required::<String>("Name")?, node.optional::<String>("Table"));
    document.full_name = node.optional("FullName");
    document.desc = node.optional("Desc");
    document.auto_numbering = node.optional("AutoNum");
    document.versions_history = node.optional("VersionsHistory");
    document.export_xml = node.optional("ExportXml");
    document.allow_register_accumulation = node.strings("AllowRegisterAccumulation");
    document.fields = fields(node, "Fields", &format!("document {}", document.name))?;
    document.table_parts = table_parts(node)?;
    document.tabular_lists = tabular_lists(node)?;
    document.forms = forms(node)?;
    document.triggers = object_triggers(node)?;
    if let Some(s) = node.child("SpendFunctions")? {
        document.spend_functions = SpendFunctions {
            spend: hook(&s, "Spend")?,
            clear_spend: hook(&s, "ClearSpend")?,
        };
    }
    Ok(document)
}

fn enumeration(node: &Node<'_>) -> Result<Enumeration, Error> {
    let mut enumeration = Enumeration::new(node.required::<String>("Name")?);
    enumeration.desc = node.optional("Desc");
    enumeration.serial_number = node.optional("SerialNumber");
    for child in node.children("Fields")? {
        enumeration.append_existing(EnumMember {
            name: child.required("Name")?,
            value: child.optional("Value"),
            desc: child.optional("Desc"),
        })?;
    }
    Ok(enumeration)
}

fn journal(node: &Node<'_>) -> Result<Journal, Error> {
    let mut journal = Journal::new(node.required::<String>("Name")?);
    journal.desc = node.optional("Desc");
    journal.fields = fields(node, "Fields", &format!("journal {}", journal.name))?;
    journal.allowed_documents = node.strings("AllowDocuments");
    for child in node.children("TabularLists")? {
        let mut list = JournalList::new(child.required::<String>("Name")?);
        list.desc = child.optional("Desc");
        if let Some(bindings) = child.child("Bindings")? {
            for document in bindings.keys() {
                list.bindings.entry(document.clone()).or_default();
                for (journal_field, document_field) in bindings.string_map(document) {
                    list.bind(document.as_str(), journal_field, document_field);
                }
            }
        }
        journal.append_list(list)?;
    }
    Ok(journal)
}

fn register_fields(
    node: &Node<'_>,
    name: &str,
    append: &mut dyn FnMut(FieldGroup, Field) -> Result<(), Error>,
) -> Result<(), Error> {
    for (group, key) in [
        (FieldGroup::Dimension, "DimensionFields"),
        (FieldGroup::Resource, "ResourcesFields"),
        (FieldGroup::Property, "PropertyFields"),
    ] {
        for child in node.children(key)? {
            append(group, field(&child)?).map_err(|e| match e {
                Error::DuplicateKey { key, .. } => Error::DuplicateKey {
                    scope: format!("register {name}"),
                    key,
                },
                other => other,
            })?;
        }
    }
    Ok(())
}

fn information_register(node: &Node<'_>) -> Result<InformationRegister, Error> {
    let mut register =
        InformationRegister::new(node.required::<String>("Name")?, node.optional::<String>("Table"));
    register.full_name = node.optional("FullName");
    register.desc = node.optional("Desc");
    let name = register.name.clone();
    register_fields(node, &name, &mut |group, field| {
        register.append_field(group, field)
    })?;
    register.tabular_lists = tabular_lists(node)?;
    register.forms = forms(node)?;
    Ok(register)
}

fn accumulation_register(node: &Node<'_>) -> Result<AccumulationRegister, Error> {
    let mut register =
        AccumulationRegister::new(node.required::<String>("Name")?, node.optional::<String>("Table"));
    register.full_name = node.optional("FullName");
    register.desc = node.optional("Desc");
    let tag: String = node.optional("Type");
    register.kind = AccumulationKind::from_tag(&tag).unwrap_or_default();
    register.no_summary_table = node.optional("NoSummary");
    register.allow_document_spend = node.strings("AllowDocumentSpend");
    let name = register.name.clone();
    register_fields(node, &name, &mut |group, field| {
        register.append_field(group, field)
    })?;
    register.table_parts = table_parts(node)?;
    register.tabular_lists = tabular_lists(node)?;
    register.forms = forms(node)?;
    for child in node.children("QueryBlockList")? {
        let mut block = QueryBlock::new(child.required::<String>("Name")?);
        block.final_calculation = child.optional("FinalCalculation");
        block.queries = child.string_map("Query");
        register.append_query_block(block)?;
    }
    Ok(register)
}
