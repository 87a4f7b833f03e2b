//! End-to-end session tests over mapping documents on disk

use std::fs;
use std::path::PathBuf;

use mapping_mocker::{
    AccessType, AnnotationSource, DeclarationKind, DocumentFormat, DocumentLoader, ElementKind,
    MetadataSaver, MockError, MockerConfig, MockingSession, Target, Value,
};
use tempfile::TempDir;

const ORDERS: &str = r#"
defaults:
  package: com.acme.sales
  schema: SALES
entities:
  - className: Order
    metadataComplete: true
    access: FIELD
    idClass: OrderKey
    attributeOverrides:
      - name: total
        column:
          name: ORDER_TOTAL
          precision: 12
          scale: 2
    basicAttributes:
      - name: placedAt
        column:
          name: PLACED_AT
        temporal: TIMESTAMP
      - name: status
        enumerated: STRING
    associations:
      - name: items
        joinTable:
          name: ORDER_ITEMS
          joinColumns:
            - name: ORDER_ID
          inverseJoinColumns:
            - name: ITEM_ID
        orderColumn:
          name: POSITION
    transientAttributes: [cachedTotal]
sequenceGenerators:
  - name: orderSeq
    sequenceName: ORDER_SEQ
    allocationSize: 20
namedQueries:
  - name: Order.findAll
    query: select o from Order o
"#;

const OVERRIDES: &str = r#"
namedQueries:
  - name: Order.findAll
    query: select o from Order o order by o.placedAt
  - name: Order.byStatus
    query: select o from Order o where o.status = :status
    lockMode: OPTIMISTIC
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_document_produces_entity_elements() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "orders.yaml", ORDERS);
    let document = DocumentLoader::new().load_document(&path).unwrap();

    let mut session = MockingSession::new(MockerConfig::new());
    let report = session.mock_document(&document).unwrap();
    assert_eq!(report.entities, 1);
    assert_eq!(report.globals, 2);

    let class = "com.acme.sales.Order";
    let index = session.index();
    assert!(index.is_metadata_complete(class));
    assert_eq!(index.access_of(class), Some(AccessType::Field));

    let id_class = &index.indexed(class, ElementKind::IdClass)[0];
    assert_eq!(
        id_class.field("value"),
        Some(&Value::Class("com.acme.sales.OrderKey".to_string()))
    );

    let join_table = &index.indexed(class, ElementKind::JoinTable)[0];
    assert_eq!(join_table.target, Some(Target::field(class, "items")));
    assert_eq!(join_table.string_field("schema"), Some("SALES"));
    assert_eq!(
        join_table
            .field("inverseJoinColumns")
            .and_then(|v| v.as_array())
            .map(|columns| columns.len()),
        Some(1)
    );

    let enumerated = &index.indexed(class, ElementKind::Enumerated)[0];
    assert_eq!(enumerated.target, Some(Target::field(class, "status")));
    assert_eq!(enumerated.string_field("value"), Some("STRING"));

    let transient = &index.indexed(class, ElementKind::Transient)[0];
    assert_eq!(transient.target, Some(Target::field(class, "cachedTotal")));
}

#[test]
fn test_documents_are_processed_in_order() {
    let dir = TempDir::new().unwrap();
    let loader = DocumentLoader::new();
    let first = loader.load_document(&write(&dir, "a.yaml", ORDERS)).unwrap();
    let second = loader.load_document(&write(&dir, "b.yaml", OVERRIDES)).unwrap();

    let mut session = MockingSession::new(MockerConfig::new());
    session.mock_document(&first).unwrap();
    session.mock_document(&second).unwrap();
    assert_eq!(
        session.registry().names(DeclarationKind::NamedQuery),
        vec!["Order.findAll", "Order.byStatus"]
    );

    let metadata = session.finish();
    let kinds: Vec<_> = metadata.globals.iter().map(|g| g.kind).collect();
    assert_eq!(
        kinds,
        vec![ElementKind::SequenceGenerator, ElementKind::NamedQueries]
    );

    let queries = metadata.globals[1].members();
    assert_eq!(
        queries[0].string_field("query"),
        Some("select o from Order o order by o.placedAt")
    );
    assert_eq!(queries[1].string_field("lockMode"), Some("OPTIMISTIC"));
}

#[test]
fn test_index_snapshot_overrides_are_merged() {
    let dir = TempDir::new().unwrap();
    let snapshot = write(
        &dir,
        "index.json",
        r#"[
            {
                "kind": "AttributeOverride",
                "target": {"kind": "class", "class": "com.acme.sales.Order"},
                "fields": {
                    "name": {"type": "string", "value": "discount"},
                    "column": {"type": "nested", "value": {
                        "kind": "Column",
                        "fields": {"name": {"type": "string", "value": "DISCOUNT_PCT"}}
                    }}
                }
            }
        ]"#,
    );
    let index = DocumentLoader::new().load_index(&snapshot).unwrap();
    let document = DocumentLoader::new()
        .load_document(&write(&dir, "orders.yaml", ORDERS))
        .unwrap();

    let mut session = MockingSession::with_index(MockerConfig::new(), index).unwrap();
    session.mock_document(&document).unwrap();

    let class = "com.acme.sales.Order";
    assert!(session.index().indexed(class, ElementKind::AttributeOverride).is_empty());
    let wrapper = &session.index().indexed(class, ElementKind::AttributeOverrides)[0];
    let names: Vec<_> = wrapper.members().iter().filter_map(|m| m.name()).collect();
    assert_eq!(names, vec!["total", "discount"]);
    let carried = wrapper.members()[1]
        .field("column")
        .and_then(|c| c.as_nested())
        .and_then(|c| c.name());
    assert_eq!(carried, Some("DISCOUNT_PCT"));
}

#[test]
fn test_strict_resolution_aborts_document() {
    let dir = TempDir::new().unwrap();
    let document = DocumentLoader::new()
        .load_document(&write(&dir, "orders.yaml", ORDERS))
        .unwrap();
    let config = MockerConfig::builder()
        .strict_class_resolution(true)
        .known_class("com.acme.sales.Order")
        .build();

    let mut session = MockingSession::new(config);
    let err = session.mock_document(&document).unwrap_err();
    match err {
        MockError::UnresolvedClass { name, .. } => assert_eq!(name, "com.acme.sales.OrderKey"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_metadata_saved_as_yaml() {
    let dir = TempDir::new().unwrap();
    let document = DocumentLoader::new()
        .load_document(&write(&dir, "orders.yaml", ORDERS))
        .unwrap();
    let mut session = MockingSession::new(MockerConfig::new());
    session.mock_document(&document).unwrap();

    let out = dir.path().join("metadata.yaml");
    MetadataSaver::new(DocumentFormat::Yaml)
        .save(&session.finish(), &out)
        .unwrap();

    let written: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(written["classes"]["com.acme.sales.Order"]["metadataComplete"]
        .as_bool()
        .unwrap());
}

const LISTENERS: &str = r#"
defaults:
  package: com.acme.sales
  cascadePersist: true
entities:
  - className: Order
    prePersist: assignNumber
    entityListeners:
      - className: AuditListener
        postPersist: recordInsert
    associations:
      - name: customer
        associationType: manyToOne
        targetEntity: Customer
"#;

#[test]
fn test_listeners_and_cascade_from_document() {
    let dir = TempDir::new().unwrap();
    let document = DocumentLoader::new()
        .load_document(&write(&dir, "listeners.yaml", LISTENERS))
        .unwrap();
    let mut session = MockingSession::new(MockerConfig::new());
    session.mock_document(&document).unwrap();

    let class = "com.acme.sales.Order";
    let index = session.index();
    let listeners = &index.indexed(class, ElementKind::EntityListeners)[0];
    assert_eq!(
        listeners.field("value"),
        Some(&Value::ClassArray(vec!["com.acme.sales.AuditListener".to_string()]))
    );
    assert_eq!(
        index.indexed(class, ElementKind::PrePersist)[0].target,
        Some(Target::method(class, "assignNumber"))
    );
    assert_eq!(
        index.indexed("com.acme.sales.AuditListener", ElementKind::PostPersist)[0].target,
        Some(Target::method("com.acme.sales.AuditListener", "recordInsert"))
    );

    let many_to_one = &index.indexed(class, ElementKind::ManyToOne)[0];
    assert_eq!(
        many_to_one.field("cascade").and_then(Value::as_names),
        Some(&["PERSIST".to_string()][..])
    );
}

#[test]
fn test_annotated_global_replaced_by_document_appears_once() {
    let dir = TempDir::new().unwrap();
    let snapshot = write(
        &dir,
        "index.json",
        r#"[
            {
                "kind": "NamedQuery",
                "target": {"kind": "class", "class": "com.acme.sales.Order"},
                "fields": {
                    "name": {"type": "string", "value": "Order.findAll"},
                    "query": {"type": "string", "value": "from Order"}
                }
            }
        ]"#,
    );
    let index = DocumentLoader::new().load_index(&snapshot).unwrap();
    let document = DocumentLoader::new()
        .load_document(&write(&dir, "overrides.yaml", OVERRIDES))
        .unwrap();

    let mut session = MockingSession::with_index(MockerConfig::new(), index).unwrap();
    session.mock_document(&document).unwrap();
    let metadata = session.finish();

    let rendered = MetadataSaver::new(DocumentFormat::Json).render(&metadata).unwrap();
    assert!(!rendered.contains("\"from Order\""));
    let queries = metadata.globals[0].members();
    assert_eq!(
        queries[0].string_field("query"),
        Some("select o from Order o order by o.placedAt")
    );
    assert!(
        metadata.classes["com.acme.sales.Order"]
            .elements()
            .all(|e| e.kind != ElementKind::NamedQuery)
    );
}
