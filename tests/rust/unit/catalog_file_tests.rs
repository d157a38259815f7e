use pathmap::catalog::{Catalog, CatalogError};
use std::io::Write;
use tempfile::Builder;

const YAML_MODEL: &str = r#"
name: library
entities:
  - name: Book
    table: books
    id: { name: id, type: long, column: book_id }
    attributes:
      - { name: title, type: string, column: title }
"#;

#[test]
fn test_loads_yaml_file() {
    let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(YAML_MODEL.as_bytes()).unwrap();

    let catalog = Catalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.name(), "library");
    assert!(catalog.metamodel().find_entity_descriptor("Book").is_some());
}

#[test]
fn test_loads_json_file() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"name": "library", "entities": [{{"name": "Book", "table": "books"}}]}}"#
    )
    .unwrap();

    let catalog = Catalog::from_file(file.path()).unwrap();
    assert!(catalog.path_sources().root_path_source("Book").is_ok());
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Catalog::from_file("/nonexistent/model.yaml"),
        Err(CatalogError::ConfigReadError { .. })
    ));
}

#[test]
fn test_empty_definition_is_rejected() {
    let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(b"name: empty\nentities: []\n").unwrap();
    assert!(matches!(
        Catalog::from_file(file.path()),
        Err(CatalogError::InvalidDefinition { .. })
    ));
}

#[test]
fn test_fixture_model_loads() {
    let catalog = Catalog::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/auction_house.yaml"
    ))
    .unwrap();
    assert_eq!(catalog.name(), "auction_house");
    let mut roots: Vec<_> = catalog.path_sources().root_names().collect();
    roots.sort();
    assert_eq!(
        roots,
        vec!["Auction", "Bid", "Member", "Node", "OtherNode", "SpecialNode"]
    );
}

#[test]
fn test_embeddable_with_collection_of_itself_is_rejected() {
    let yaml = r#"
embeddables:
  - name: Part
    attributes:
      - { name: label, type: string, column: label }
      - name: children
        plural:
          classification: bag
          table: part_children
          key_column: widget_id
          element: { embedded: Part }
entities:
  - name: Widget
    table: widgets
    id: { name: id, type: long, column: widget_id }
    attributes:
      - { name: part, embedded: Part }
"#;
    match Catalog::from_yaml_str(yaml) {
        Err(CatalogError::InvalidDefinition { message }) => {
            assert!(message.contains("contains itself"), "{}", message)
        }
        Err(other) => panic!("expected an invalid definition, got {}", other),
        Ok(_) => panic!("self-containing embeddable was accepted"),
    }
}

#[test]
fn test_indirect_embeddable_collection_cycle_is_rejected() {
    let yaml = r#"
embeddables:
  - name: Outer
    attributes:
      - { name: inner, embedded: Inner }
  - name: Inner
    attributes:
      - name: outers
        plural:
          classification: set
          table: inner_outers
          key_column: owner_id
          element: { embedded: Outer }
entities:
  - name: Widget
    table: widgets
    attributes:
      - { name: outer, embedded: Outer }
"#;
    assert!(matches!(
        Catalog::from_yaml_str(yaml),
        Err(CatalogError::InvalidDefinition { .. })
    ));
}
