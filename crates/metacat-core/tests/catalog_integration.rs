//! Integration tests for the catalog engine.

use metacat_core::codec;
use metacat_core::search::{GroupLevel, UsageFormat};
use metacat_core::{
    validate_object_name, AccumulationKind, AccumulationRegister, Catalog, CompositeTargets,
    Configuration, Document, Enumeration, Error, Field, FieldGroup, FieldType, Form, FormType,
    Hierarchy, HookFunction, InformationRegister, Journal, JournalList, ListColumn, PointerKind,
    QueryBlock, StaticTableLister, Store, StoreConfig, Subordination, TablePart, TabularList,
    parse_pointer,
};

struct TestContext {
    store: Store,
    _dir: tempfile::TempDir,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(StoreConfig::new(dir.path().join("Configuration.json")));
        Self { store, _dir: dir }
    }
}

/// Item catalog referenced from the Invoice document and its lines.
fn setup_shop() -> Configuration {
    let mut conf = Configuration::new("Shop");

    conf.append_catalog(
        Catalog::new("Item", "tab_a01")
            .with_field(Field::new("Code", "col_a1", FieldType::text()).with_presentation())
            .unwrap(),
    )
    .unwrap();

    let mut unit = Enumeration::new("Unit");
    unit.append_member("Piece", "").unwrap();
    conf.append_enumeration(unit).unwrap();

    let mut invoice = Document::new("Invoice", "tab_a02")
        .with_field(Field::new("MainItem", "col_a1", FieldType::pointer("Catalog.Item")))
        .unwrap();
    invoice
        .append_table_part(
            TablePart::new("Lines", "tab_a03")
                .with_field(Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")))
                .unwrap()
                .with_field(Field::new("Unit", "col_a2", FieldType::enumeration("Enumerations.Unit")))
                .unwrap(),
        )
        .unwrap();
    invoice.allow_register("Stock");
    conf.append_document(invoice).unwrap();

    let mut stock = AccumulationRegister::new("Stock", "tab_a04");
    stock
        .append_field(
            FieldGroup::Dimension,
            Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")),
        )
        .unwrap();
    conf.append_accumulation_register(stock).unwrap();

    let mut prices = InformationRegister::new("Prices", "tab_a05");
    prices
        .append_field(FieldGroup::Resource, Field::new("Price", "col_a1", FieldType::Numeric))
        .unwrap();
    conf.append_information_register(prices).unwrap();

    conf
}

/// The shop with every persisted flag switched away from its default, plus
/// owner, folder and journal references.
fn setup_flagged_shop() -> Configuration {
    let mut conf = setup_shop();
    conf.info.desc = "Retail".into();
    conf.info.variant = "gtk3".into();
    conf.append_catalog(Catalog::new("Supplier", "tab_b01")).unwrap();
    conf.append_catalog(Catalog::new("Folders", "tab_b02")).unwrap();

    let item = &mut conf.catalogs["Item"];
    item.auto_numbering = true;
    item.versions_history = true;
    item.subordination = Some(Subordination {
        owner: "Catalog.Supplier".into(),
        field: "Owner".into(),
    });
    item.hierarchy = Hierarchy::DelegatedToCatalog {
        catalog: "Catalog.Folders".into(),
        field: "Folder".into(),
    };
    item.triggers.after_save = HookFunction {
        name: "Item_AfterSave".into(),
        enabled: false,
    };
    let code = &mut item.fields["Code"];
    code.field_type = FieldType::Text { multiline: true };
    code.is_index = true;
    code.is_full_text_search = true;
    code.is_search = true;
    code.is_export = true;
    item.append_field(Field::new(
        "Number",
        "col_a2",
        FieldType::Integer {
            automatic_numbering: true,
        },
    ))
    .unwrap();
    let mut list = TabularList::new("Main");
    let mut column = ListColumn::new("Code");
    column.sort_num = 1;
    column.sort_descending = true;
    list.append_column(column).unwrap();
    item.append_tabular_list(list).unwrap();
    let mut form = Form::new("Tree", FormType::ListAndTree);
    form.desc = "Folder tree".into();
    item.append_form(form).unwrap();

    let invoice = &mut conf.documents["Invoice"];
    invoice.export_xml = true;
    invoice.versions_history = true;
    invoice
        .append_field(Field::new(
            "Basis",
            "col_a2",
            FieldType::CompositePointer(CompositeTargets {
                exclude_catalogs: true,
                ..Default::default()
            }),
        ))
        .unwrap();
    let lines = &mut invoice.table_parts["Lines"];
    lines.versions_history = true;
    lines.triggers.before_save = HookFunction::enabled("Lines_BeforeSave");
    lines.append_form(Form::new("Lines", FormType::ListSmall)).unwrap();

    let stock = &mut conf.accumulation_registers["Stock"];
    stock.kind = AccumulationKind::Turnovers;
    stock.no_summary_table = true;
    let mut totals = QueryBlock::new("Totals");
    totals.final_calculation = true;
    totals.set_query("01", "SELECT 1");
    stock.append_query_block(totals).unwrap();

    let mut sales = Journal::new("Sales");
    sales
        .append_field(Field::new("Item", "col_a1", FieldType::pointer("Catalog.Item")))
        .unwrap();
    sales.allow_document("Invoice");
    let mut main = JournalList::new("Main");
    main.bind("Invoice", "Item", "MainItem");
    sales.append_list(main).unwrap();
    conf.append_journal(sales).unwrap();

    conf
}

#[test]
fn test_save_load_round_trip() {
    let ctx = TestContext::new();
    let mut conf = setup_shop();
    ctx.store.save(&mut conf).unwrap();

    let loaded = ctx.store.load_existing().unwrap();
    assert_eq!(loaded, conf);
    assert_eq!(
        loaded.accumulation_registers["Stock"].allow_document_spend,
        vec!["Invoice"]
    );
}

#[test]
fn test_item_dependencies() {
    let conf = setup_shop();

    let labels = conf
        .find_pointer_usages("Catalog.Item", UsageFormat::Label)
        .unwrap();
    assert_eq!(
        labels,
        vec![
            "Documents: Invoice.MainItem [tab_a02.col_a1]",
            "Documents: Invoice.Lines.Item [tab_a03.col_a1]",
            "AccumulationRegisters: Stock.Item [tab_a04.col_a1]",
        ]
    );

    let records = conf.find_dependencies("Catalog.Item").unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].group_level, GroupLevel::TablePart);
    assert_eq!(records[1].table_part_name.as_deref(), Some("Lines"));
    assert_eq!(records[2].group_level, GroupLevel::Object);

    assert!(conf.find_dependencies("Document.Invoice").unwrap().is_empty());
    assert!(matches!(
        conf.find_dependencies("Item"),
        Err(Error::MalformedPointer { .. })
    ));
}

#[test]
fn test_enum_usages_block_removal() {
    let mut conf = setup_shop();
    let usages = conf.find_enum_usages("Enumerations.Unit").unwrap();
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].field_name, "Unit");

    assert!(matches!(
        conf.remove_enumeration("Unit"),
        Err(Error::HasDependents { count: 1, .. })
    ));
    conf.documents["Invoice"].table_parts["Lines"]
        .fields
        .shift_remove("Unit");
    assert!(conf.remove_enumeration("Unit").unwrap().is_some());
}

#[test]
fn test_spend_lists_idempotent() {
    let mut conf = setup_shop();
    conf.calculate_allow_document_spend();
    let first = conf.clone();
    conf.calculate_allow_document_spend();
    assert_eq!(conf, first);
}

#[test]
fn test_copy_is_independent() {
    let conf = setup_shop();
    let mut copy = conf.clone();
    copy.catalogs["Item"].fields["Code"].name_in_table = "col_z9".into();
    copy.documents.shift_remove("Invoice");

    assert_eq!(conf.catalogs["Item"].fields["Code"].name_in_table, "col_a1");
    assert!(conf.documents.contains_key("Invoice"));
}

#[test]
fn test_name_validation() {
    assert!(validate_object_name("  Номенклатура_2 ").is_valid());
    assert_eq!(validate_object_name("  Item ").name, "Item");

    let result = validate_object_name("1 Item");
    assert_eq!(
        result.message(),
        "Name must start with a letter\nInvalid character ' ' at position 1"
    );
    assert_eq!(validate_object_name("   ").message(), "Name is empty");
}

#[test]
fn test_pointer_parsing() {
    let name = parse_pointer("Document.Invoice.Extra").unwrap();
    assert_eq!(name.kind, PointerKind::Document);
    assert_eq!(name.type_name, "Invoice.Extra");
    assert!(parse_pointer("Register.Stock").is_err());
}

#[tokio::test]
async fn test_allocation_unique_across_session() {
    let mut conf = setup_shop();
    let lister = StaticTableLister::new(["tab_a06", "tab_a07"]);

    let first = conf.allocate_table_name(&lister).await.unwrap();
    let second = conf.allocate_table_name(&lister).await.unwrap();
    assert_eq!(first, "tab_a08");
    assert_eq!(second, "tab_a09");

    let fields = conf.catalogs["Item"].fields.clone();
    let a = conf.allocate_column_name("tab_a01", &fields).unwrap();
    let b = conf
        .reservations
        .allocate_column_name("tab_a01", &conf.catalogs["Item"].fields)
        .unwrap();
    assert_eq!(a, "col_a2");
    assert_eq!(b, "col_a3");
}

#[test]
fn test_dangling_after_manual_removal() {
    let mut conf = setup_shop();
    assert!(conf.find_dangling_pointers().is_empty());

    conf.catalogs.shift_remove("Item");
    let dangling = conf.find_dangling_pointers();
    assert_eq!(dangling.len(), 3);
    assert!(dangling.iter().all(|d| d.pointer == "Catalog.Item"));
}

#[test]
fn test_document_text_is_stable() {
    let conf = setup_shop();
    let a = codec::to_string(&conf, true, true).unwrap();
    let b = codec::to_string(&codec::from_str(&a).unwrap(), true, true).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_flagged_round_trip() {
    let ctx = TestContext::new();
    let mut conf = setup_flagged_shop();
    ctx.store.save(&mut conf).unwrap();

    let loaded = ctx.store.load_existing().unwrap();
    assert_eq!(loaded, conf);
    assert!(loaded.find_dangling_pointers().is_empty());
}

#[test]
fn test_referenced_objects_not_removed() {
    let mut conf = setup_flagged_shop();

    for name in ["Supplier", "Folders"] {
        assert!(matches!(
            conf.remove_catalog(name),
            Err(Error::HasDependents { count: 1, .. })
        ));
    }
    conf.documents["Invoice"].fields.shift_remove("MainItem");
    assert!(matches!(
        conf.remove_document("Invoice"),
        Err(Error::HasDependents { count: 2, .. })
    ));

    conf.journals.shift_remove("Sales");
    assert!(conf.remove_document("Invoice").unwrap().is_some());
    assert!(conf.find_dangling_pointers().is_empty());
}
