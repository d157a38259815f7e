use super::fixture::{auction_house, bind, binder};
use pathmap::domain_model::BasicKind;
use pathmap::mapping_model::ModelPart;
use pathmap::sql_ast::{FromClauseError, FromClauseIndex, TableGroupLookup};
use pathmap::sqm::SqmCteTable;
use std::sync::Arc;

#[test]
fn test_roots_and_joins_get_identification_variables() {
    let catalog = auction_house();
    let mut binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(catalog.metamodel());

    let auction = from_clause.add_root(&binder.alias("a").unwrap()).unwrap();
    assert_eq!(auction.primary_table.table_expression, "auctions");
    assert_eq!(auction.primary_table.identification_variable, "a1_0");

    let bids = binder.add_join("a.bids", "b").unwrap();
    let group = from_clause.add_join(&bids).unwrap();
    assert!(matches!(group.model_part, ModelPart::Plural(_)));
    assert_eq!(group.primary_table.table_expression, "bids");
    assert_eq!(group.source_alias.as_deref(), Some("b"));

    let seller = binder.add_join("a.seller", "s").unwrap();
    assert_eq!(
        from_clause
            .add_join(&seller)
            .unwrap()
            .primary_table
            .table_expression,
        "members"
    );
    assert_eq!(from_clause.len(), 3);
    assert!(from_clause
        .find_table_group(bids.navigable_path())
        .is_some());
}

#[test]
fn test_join_through_treat_anchors_on_the_base_group() {
    let catalog = auction_house();
    let mut binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(catalog.metamodel());
    from_clause.add_root(&binder.alias("n").unwrap()).unwrap();

    let parent = binder
        .add_join("treat(n as SpecialNode).parent", "p")
        .unwrap();
    let group = from_clause.add_join(&parent).unwrap();
    assert!(matches!(group.model_part, ModelPart::EntityValued(_)));
}

#[test]
fn test_join_errors() {
    let catalog = auction_house();
    let mut binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(catalog.metamodel());

    let bids = binder.add_join("a.bids", "b").unwrap();
    assert!(matches!(
        from_clause.add_join(&bids),
        Err(FromClauseError::MissingTableGroup { .. })
    ));

    let root = binder.alias("a").unwrap();
    from_clause.add_root(&root).unwrap();
    assert!(matches!(
        from_clause.add_root(&root),
        Err(FromClauseError::DuplicateTableGroup { .. })
    ));

    let title = bind(&binder, "a.title");
    assert!(matches!(
        from_clause.add_join(&title),
        Err(FromClauseError::UnresolvedJoin { .. })
    ));

    let cte = Arc::new(SqmCteTable::new("totals", vec![("total", BasicKind::Decimal)]));
    let cte_root = binder.add_cte_root(cte, "t").unwrap();
    assert!(matches!(
        from_clause.add_root(&cte_root),
        Err(FromClauseError::UnresolvedJoin { .. })
    ));
}
