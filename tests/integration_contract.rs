//! Integration tests for building and rendering contracts
//!
//! These tests drive the public store API end to end and check the exact
//! document text that comes out.

use datacontract::contract::{
    ContractMetadata, Field, FieldPatch, FieldStore, FieldType, Sensitivity, generate, load_draft,
    save_draft,
};
use datacontract::error::ContractError;
use tempfile::TempDir;

fn named_store(names: &[&str]) -> FieldStore {
    let mut store = FieldStore::new();
    for name in names {
        let index = store.add();
        store
            .update(index, FieldPatch::new().name(*name))
            .expect("names are distinct");
    }
    store
}

#[test]
fn test_scenario_single_required_field() {
    let metadata = ContractMetadata {
        domain: "sales".to_owned(),
        ..ContractMetadata::default()
    };
    let mut field = Field::new("id", FieldType::Integer);
    field.required = true;

    assert_eq!(
        generate(&metadata, &[field]),
        "tags:\n  domain: sales\nname: MyDataContract\nfields:\n  id:\n    type: integer\n    required: true"
    );
}

#[test]
fn test_scenario_pii_only() {
    let mut store = FieldStore::new();
    let index = store.add();
    store
        .update(
            index,
            FieldPatch::new()
                .name("ssn")
                .field_type(FieldType::String)
                .required(true)
                .sensitive(Sensitivity {
                    pii: Some(true),
                    phi: Some(false),
                }),
        )
        .unwrap();

    let output = store.generate();
    assert!(output.contains("    sensitive:\n      pii: true"));
    assert!(!output.contains("phi"));
}

#[test]
fn test_scenario_enumeration() {
    let mut store = named_store(&["grade"]);
    store
        .update(0, FieldPatch::new().enumeration(["A", "B"]))
        .unwrap();

    assert!(
        store
            .generate()
            .contains("    enumeration:\n      - A\n      - B")
    );
}

#[test]
fn test_scenario_empty_contract() {
    let store = FieldStore::new();
    assert_eq!(store.generate(), "tags:\nname: MyDataContract\nfields:");
}

#[test]
fn test_generate_is_deterministic() {
    let mut store = named_store(&["id", "email", "status"]);
    store.set_contract_name("Customers");
    store.set_subdomain("crm");
    store.set_enumeration_csv(2, "active, churned").unwrap();

    let metadata = store.metadata().clone();
    let fields = store.fields().to_vec();

    assert_eq!(generate(&metadata, &fields), generate(&metadata, &fields));
    assert_eq!(store.generate(), generate(&metadata, &fields));
}

#[test]
fn test_bare_field_renders_three_lines() {
    let field = Field::new("amount", FieldType::Number);
    let output = generate(&ContractMetadata::default(), &[field]);

    let body: Vec<&str> = output.lines().skip_while(|l| *l != "fields:").skip(1).collect();
    assert_eq!(body, vec!["  amount:", "    type: number", "    required: false"]);
}

#[test]
fn test_rejected_update_leaves_store_unchanged() {
    let mut store = named_store(&["id", "email", "phone"]);
    let before = store.fields().to_vec();
    let ids_before = store.ids().to_vec();

    let result = store.update(
        2,
        FieldPatch::new()
            .name("email")
            .title("Phone number")
            .required(true),
    );

    assert!(matches!(
        result,
        Err(ContractError::DuplicateName {
            index: 2,
            existing: 1,
            ..
        })
    ));
    assert_eq!(store.fields(), before.as_slice());
    assert_eq!(store.ids(), ids_before.as_slice());
}

#[test]
fn test_removal_shifts_without_reordering() {
    let names = ["a", "b", "c", "d", "e"];
    for removed in 0..names.len() {
        let mut store = named_store(&names);
        store.remove(removed).unwrap();

        let expected: Vec<&str> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != removed)
            .map(|(_, name)| *name)
            .collect();
        let actual: Vec<&str> = store.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(actual, expected, "removing index {removed}");
    }
}

#[test]
fn test_out_of_range_commands() {
    let mut store = named_store(&["id"]);

    assert!(matches!(
        store.remove(3),
        Err(ContractError::IndexOutOfRange { index: 3, len: 1 })
    ));
    assert!(matches!(
        store.update(1, FieldPatch::new().required(true)),
        Err(ContractError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_draft_round_trip_renders_identically() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("customers.json");

    let mut store = named_store(&["id", "email"]);
    store.set_domain("sales");
    store.set_data_product_name("customers");
    store
        .update(
            1,
            FieldPatch::new()
                .title("E-mail")
                .description("Primary contact address")
                .sensitive(Sensitivity {
                    pii: Some(true),
                    phi: None,
                }),
        )
        .unwrap();
    store.add();

    save_draft(&store, &path).unwrap();
    let loaded = load_draft(&path).unwrap();

    assert_eq!(loaded.generate(), store.generate());
    assert_eq!(loaded.len(), 3);
}

#[test]
fn test_unnamed_fields_keep_empty_name_until_named() {
    let mut store = FieldStore::new();
    store.add();
    store.add();

    store
        .update(1, FieldPatch::new().name("").field_type(FieldType::Date))
        .unwrap();
    store.update(0, FieldPatch::new().name("created")).unwrap();

    assert!(matches!(
        store.update(0, FieldPatch::new().name("")),
        Err(ContractError::DuplicateName {
            index: 0,
            existing: 1,
            ..
        })
    ));
    assert!(
        store
            .generate()
            .ends_with("  :\n    type: date\n    required: false\n    sensitive:")
    );
}
