//! Persisted document format.
//!
//! A catalog is stored as a single JSON document whose top-level keys are the
//! names in [`sections`]. Missing sections read as empty, optional leaves fall
//! back to their defaults, and only element names are structurally required.

mod blob;
mod decode;
mod encode;
mod reader;

pub use blob::{compress_text, decode_blob, decompress_text, encode_blob, ZIP_MARKER};

use crate::configuration::Configuration;
use crate::error::Error;
use serde_json::Value;

/// Top-level keys of the document, in write order.
pub mod sections {
    pub const CONFIGURATION: &str = "Configuration";
    pub const CONSTANTS_BLOCKS: &str = "ConstantsBlocks";
    pub const CATALOGS: &str = "Directories";
    pub const DOCUMENTS: &str = "Documents";
    pub const ENUMERATIONS: &str = "Enums";
    pub const JOURNALS: &str = "Journals";
    pub const INFORMATION_REGISTERS: &str = "RegistersInformation";
    pub const ACCUMULATION_REGISTERS: &str = "RegistersAccumulation";
}

/// Convert a catalog to its document tree.
pub fn to_document(conf: &Configuration, compress_blobs: bool) -> Result<Value, Error> {
    encode::encode(conf, compress_blobs)
}

/// Rebuild a catalog from a document tree.
pub fn from_document(document: &Value) -> Result<Configuration, Error> {
    decode::decode(document)
}

/// Serialize a catalog to document text.
pub fn to_string(conf: &Configuration, compress_blobs: bool, pretty: bool) -> Result<String, Error> {
    let document = to_document(conf, compress_blobs)?;
    let text = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    text.map_err(|e| Error::Serialization(e.to_string()))
}

/// Parse document text into a catalog.
pub fn from_str(text: &str) -> Result<Configuration, Error> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| Error::Deserialization(e.to_string()))?;
    from_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccumulationKind, AccumulationRegister, Catalog, CompositeTargets, Constant,
        ConstantsBlock, Document, Enumeration, Field, FieldGroup, FieldType, Form, FormType,
        Hierarchy, HookFunction, InformationRegister, Journal, JournalList, ListColumn,
        QueryBlock, Subordination, TablePart, TabularList,
    };
    use serde_json::json;

    fn hook_off(name: &str) -> HookFunction {
        HookFunction {
            name: name.into(),
            enabled: false,
        }
    }

    fn every_field_type() -> Vec<Field> {
        let types = [
            FieldType::Text { multiline: true },
            FieldType::Integer {
                automatic_numbering: true,
            },
            FieldType::Numeric,
            FieldType::Boolean,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Time,
            FieldType::Uuid,
            FieldType::Bytes,
        ];
        types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Field::new(format!("F{i}"), format!("col_b{i}"), ty))
            .collect()
    }

    fn element_list() -> TabularList {
        let mut list = TabularList::new("Main");
        list.desc = "Default list".into();
        let mut column = ListColumn::new("Code");
        column.caption = "Article".into();
        column.size = 120;
        column.sort_num = 2;
        column.sort_field = true;
        column.sort_descending = true;
        list.append_column(column).unwrap();
        list
    }

    fn form(name: &str, form_type: FormType) -> Form {
        let mut form = Form::new(name, form_type);
        form.desc = format!("{name} form");
        form
    }

    fn full_catalog() -> Configuration {
        let mut conf = Configuration::empty_default();
        conf.info.author = "Shop team".into();
        conf.info.desc = "Retail catalog".into();
        conf.info.dictionary_ts_search = "english".into();
        conf.info.variant = "gtk3".into();

        let mut block = ConstantsBlock::new("General");
        block.desc = "General settings".into();
        let mut constant = Constant::new("Currency", "col_a1", FieldType::pointer("Catalog.Currency"));
        constant.full_name = "Base currency".into();
        constant.desc = "Accounting currency".into();
        constant.is_export = true;
        constant
            .append_table_part(
                TablePart::new("Rates", "tab_a05")
                    .with_field(Field::new("Rate", "col_a1", FieldType::Numeric))
                    .unwrap(),
            )
            .unwrap();
        block.append_constant(constant).unwrap();
        conf.append_constants_block(block).unwrap();

        let mut item = Catalog::new("Item", "tab_a01")
            .with_field(
                Field::new("Code", "col_a1", FieldType::text())
                    .with_desc("Article code")
                    .with_index()
                    .with_presentation(),
            )
            .unwrap()
            .with_field(Field::new("Unit", "col_a2", FieldType::enumeration("Enumerations.Unit")))
            .unwrap();
        item.full_name = "Goods and services".into();
        item.desc = "Sold items".into();
        item.auto_numbering = true;
        item.versions_history = true;
        item.fields["Unit"].is_full_text_search = true;
        item.fields["Unit"].is_search = true;
        item.fields["Unit"].is_export = true;
        for field in every_field_type() {
            item.append_field(field).unwrap();
        }
        item.hierarchy = Hierarchy::Hierarchical {
            parent_field: "Parent".into(),
        };
        item.subordination = Some(Subordination {
            owner: "Catalog.Supplier".into(),
            field: "Owner".into(),
        });
        item.triggers.new = HookFunction::enabled("Item_New");
        item.triggers.copying = HookFunction::enabled("Item_Copying");
        item.triggers.before_save = HookFunction::enabled("Item_BeforeSave");
        item.triggers.after_save = hook_off("Item_AfterSave");
        item.triggers.set_deletion_label = HookFunction::enabled("Item_SetDeletionLabel");
        item.triggers.before_delete = HookFunction::enabled("Item_BeforeDelete");
        item.append_tabular_list(element_list()).unwrap();
        let mut element = form("ElementForm", FormType::Element);
        element.generated_code = "partial class ElementForm {}".into();
        element.modified_code = "// user code".into();
        item.append_form(element).unwrap();
        for (name, form_type) in [
            ("List", FormType::List),
            ("ListSmall", FormType::ListSmall),
            ("Tree", FormType::ListAndTree),
            ("Pointer", FormType::PointerControl),
            ("Function", FormType::Function),
            ("Report", FormType::Report),
        ] {
            item.append_form(form(name, form_type)).unwrap();
        }
        let mut barcodes = TablePart::new("Barcodes", "tab_a09")
            .with_field(Field::new("Barcode", "col_a1", FieldType::text()))
            .unwrap();
        barcodes.full_name = "Item barcodes".into();
        barcodes.desc = "Scanner codes".into();
        barcodes.versions_history = true;
        barcodes.triggers.before_save = HookFunction::enabled("Barcodes_BeforeSave");
        barcodes.triggers.after_save = hook_off("Barcodes_AfterSave");
        barcodes.append_tabular_list(element_list()).unwrap();
        barcodes.append_form(form("Barcodes", FormType::List)).unwrap();
        item.append_table_part(barcodes).unwrap();
        conf.append_catalog(item).unwrap();
        conf.append_catalog(Catalog::new("Supplier", "tab_a02")).unwrap();
        conf.append_catalog(Catalog::new("Currency", "tab_a06")).unwrap();
        conf.append_catalog(Catalog::new("Folders", "tab_a10")).unwrap();
        let mut goods = Catalog::new("Goods", "tab_a11");
        goods.hierarchy = Hierarchy::DelegatedToCatalog {
            catalog: "Catalog.Folders".into(),
            field: "Folder".into(),
        };
        conf.append_catalog(goods).unwrap();

        let mut invoice = Document::new("Invoice", "tab_a03")
            .with_field(Field::new(
                "Counterparty",
                "col_a1",
                FieldType::CompositePointer(CompositeTargets {
                    exclude_documents: true,
                    allowed_catalogs: vec!["Supplier".into()],
                    ..Default::default()
                }),
            ))
            .unwrap()
            .with_field(Field::new(
                "Basis",
                "col_a2",
                FieldType::CompositePointer(CompositeTargets {
                    exclude_catalogs: true,
                    allowed_documents: vec!["Invoice".into()],
                    ..Default::default()
                }),
            ))
            .unwrap();
        invoice.full_name = "Sales invoice".into();
        invoice.desc = "Outgoing goods".into();
        invoice.auto_numbering = true;
        invoice.versions_history = true;
        invoice.export_xml = true;
        let mut lines = TablePart::new("Lines", "tab_a04")
            .with_field(Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")))
            .unwrap();
        lines.triggers.after_save = HookFunction::enabled("Lines_AfterSave");
        invoice.append_table_part(lines).unwrap();
        invoice.append_tabular_list(element_list()).unwrap();
        invoice.append_form(form("Invoice", FormType::Element)).unwrap();
        invoice.allow_register("Stock");
        invoice.triggers.before_delete = hook_off("Invoice_BeforeDelete");
        invoice.spend_functions.spend = HookFunction::enabled("Invoice_Spend");
        invoice.spend_functions.clear_spend = hook_off("Invoice_ClearSpend");
        conf.append_document(invoice).unwrap();

        let mut unit = Enumeration::new("Unit");
        unit.desc = "Measure units".into();
        unit.append_member("Piece", "").unwrap();
        unit.append_member("Kilogram", "kg").unwrap();
        unit.serial_number = 5;
        conf.append_enumeration(unit).unwrap();

        let mut journal = Journal::new("Sales");
        journal.desc = "All sales".into();
        journal
            .append_field(Field::new("Partner", "col_a1", FieldType::pointer("Catalog.Supplier")))
            .unwrap();
        journal.allow_document("Invoice");
        let mut journal_list = JournalList::new("Main");
        journal_list.desc = "Sales list".into();
        journal_list.bind("Invoice", "Partner", "Counterparty");
        journal.append_list(journal_list).unwrap();
        conf.append_journal(journal).unwrap();

        let mut prices = InformationRegister::new("Prices", "tab_a07");
        prices.full_name = "Item prices".into();
        prices.desc = "Price list".into();
        prices
            .append_field(
                FieldGroup::Dimension,
                Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")),
            )
            .unwrap();
        prices
            .append_field(FieldGroup::Resource, Field::new("Price", "col_a2", FieldType::Numeric))
            .unwrap();
        prices
            .append_field(FieldGroup::Property, Field::new("Note", "col_a3", FieldType::text()))
            .unwrap();
        prices.append_tabular_list(element_list()).unwrap();
        prices.append_form(form("Prices", FormType::List)).unwrap();
        conf.append_information_register(prices).unwrap();

        let mut stock = AccumulationRegister::new("Stock", "tab_a08");
        stock.full_name = "Stock balance".into();
        stock.desc = "Warehouse stock".into();
        stock.kind = AccumulationKind::Turnovers;
        stock.no_summary_table = true;
        stock
            .append_field(
                FieldGroup::Dimension,
                Field::new("Item", "col_a2", FieldType::pointer("Catalog.Item")),
            )
            .unwrap();
        stock
            .append_field(FieldGroup::Resource, Field::new("Qty", "col_a1", FieldType::Numeric))
            .unwrap();
        stock
            .append_field(FieldGroup::Property, Field::new("Batch", "col_a3", FieldType::text()))
            .unwrap();
        stock
            .append_table_part(
                TablePart::new("Moves", "tab_a12")
                    .with_field(Field::new("Qty", "col_a1", FieldType::Numeric))
                    .unwrap(),
            )
            .unwrap();
        stock.append_tabular_list(element_list()).unwrap();
        stock.append_form(form("Stock", FormType::Report)).unwrap();
        let mut query = QueryBlock::new("Totals");
        query.final_calculation = true;
        query.set_query("01", "SELECT 1");
        query.set_query("02", "SELECT 2");
        stock.append_query_block(query).unwrap();
        conf.append_accumulation_register(stock).unwrap();

        conf.calculate_allow_document_spend();
        conf
    }

    #[test]
    fn test_round_trip() {
        let conf = full_catalog();
        for (compress, pretty) in [(true, true), (false, false)] {
            let text = to_string(&conf, compress, pretty).unwrap();
            let loaded = from_str(&text).unwrap();
            assert_eq!(loaded, conf);
        }
    }

    #[test]
    fn test_empty_journal_binding_survives() {
        let mut conf = Configuration::new("Shop");
        let mut journal = Journal::new("Sales");
        let mut list = JournalList::new("Main");
        list.bindings.insert("Invoice".into(), Default::default());
        list.bind("Receipt", "Partner", "Payer");
        journal.append_list(list).unwrap();
        conf.append_journal(journal).unwrap();

        let loaded = from_str(&to_string(&conf, true, false).unwrap()).unwrap();
        assert_eq!(loaded, conf);
        let bindings = &loaded.journals["Sales"].lists["Main"].bindings;
        let documents: Vec<_> = bindings.keys().cloned().collect();
        assert_eq!(documents, vec!["Invoice", "Receipt"]);
        assert!(bindings["Invoice"].is_empty());
    }

    #[test]
    fn test_section_order() {
        let document = to_document(&Configuration::new("Empty"), true).unwrap();
        let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "Configuration",
                "ConstantsBlocks",
                "Directories",
                "Documents",
                "Enums",
                "Journals",
                "RegistersInformation",
                "RegistersAccumulation",
            ]
        );
    }

    #[test]
    fn test_forms_are_compressed() {
        let document = to_document(&full_catalog(), true).unwrap();
        let form = &document["Directories"][0]["Forms"][0];
        assert_eq!(form["GeneratedCode"][ZIP_MARKER], "1");

        let plain = to_document(&full_catalog(), false).unwrap();
        assert_eq!(
            plain["Directories"][0]["Forms"][0]["GeneratedCode"],
            "partial class ElementForm {}"
        );
    }

    #[test]
    fn test_missing_sections_read_empty() {
        let conf = from_document(&json!({ "Configuration": { "Name": "Bare" } })).unwrap();
        assert_eq!(conf.info.name, "Bare");
        assert!(conf.catalogs.is_empty());
        assert!(conf.accumulation_registers.is_empty());
    }

    #[test]
    fn test_missing_name_is_error() {
        let document = json!({ "Directories": [{ "Table": "tab_a01" }] });
        let err = from_document(&document).unwrap_err();
        match err {
            Error::MissingRequiredField { path, field } => {
                assert_eq!(path, "$.Directories[0]");
                assert_eq!(field, "Name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let document = json!({
            "Directories": [
                { "Name": "Item", "Table": "tab_a01" },
                { "Name": "Item", "Table": "tab_a02" }
            ]
        });
        assert!(matches!(
            from_document(&document),
            Err(Error::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_lenient_leaves() {
        let document = json!({
            "Enums": [{
                "Name": "Unit",
                "SerialNumber": "1",
                "Fields": [{ "Name": "Piece", "Value": "1" }, { "Name": "Box", "Value": 7 }]
            }],
            "Documents": [{
                "Name": "Invoice",
                "AutoNum": "1",
                "Fields": [{ "Name": "Number", "Type": "integer", "AutomaticNumbering": "true" }]
            }]
        });
        let conf = from_document(&document).unwrap();

        let unit = &conf.enumerations["Unit"];
        assert_eq!(unit.serial_number, 7);
        assert_eq!(unit.member_by_value(7).unwrap().name, "Box");

        let invoice = &conf.documents["Invoice"];
        assert!(invoice.auto_numbering);
        assert_eq!(
            invoice.fields["Number"].field_type,
            FieldType::Integer {
                automatic_numbering: true
            }
        );
    }

    #[test]
    fn test_unknown_field_type_is_error() {
        let document = json!({
            "Directories": [{ "Name": "Item", "Fields": [{ "Name": "X", "Type": "money" }] }]
        });
        assert!(matches!(
            from_document(&document),
            Err(Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_invalid_text() {
        assert!(matches!(from_str("{ nope"), Err(Error::Deserialization(_))));
    }
}
