use super::fixture::{auction_house, bind, binder};
use pathmap::domain_model::BasicKind;
use pathmap::mapping_model::{CollectionPartNature, ModelPart};
use pathmap::resolver::{resolve_model_part, ModelPartResolver};
use pathmap::sql_ast::{FromClauseIndex, NoTableGroups};
use pathmap::sqm::{SqmCteTable, SqmPath};
use pathmap::ResolverConfig;
use std::sync::Arc;
use test_case::test_case;

#[test]
fn test_every_declared_attribute_resolves() {
    let catalog = auction_house();
    let domain_model = catalog.domain_model();
    let registry = catalog.path_sources();

    let mut entity_names: Vec<&str> = registry.root_names().collect();
    entity_names.sort();
    for entity_name in entity_names {
        let root = SqmPath::root(entity_name, Some("x"), registry).unwrap();
        let (type_id, _) = domain_model.entity(entity_name).unwrap();
        for (_, attribute) in domain_model.attributes(type_id) {
            let path = root.get(&attribute.name, registry).unwrap();
            assert!(
                resolve_model_part(&path, catalog.metamodel(), NoTableGroups).is_some(),
                "{} did not resolve",
                path.navigable_path()
            );
        }
    }
}

#[test_case("a.title", "basic(title -> auctions.title : string)" ; "basic column")]
#[test_case("a.status", "basic(status -> auctions.status : integer)" ; "enum stored as integer")]
#[test_case("a.createdAt", "basic(createdAt -> auctions.created_at : timestamp)" ; "mapped supertype attribute")]
#[test_case("a.reserve.amount", "basic(amount -> auctions.reserve_amount : decimal)" ; "embedded attribute")]
#[test_case("a.seller.handle", "basic(handle -> members.handle : string)" ; "through to-one")]
#[test_case("n.parent.parent.label", "basic(label -> nodes.label : string)" ; "self association")]
#[test_case("a.bids.amount.currency", "basic(currency -> bids.bid_currency : string)" ; "implicit element")]
#[test_case("a.id", "basic(id -> auctions.auction_id : long)" ; "identifier")]
fn test_resolves_to_column(expression: &str, expected: &str) {
    let catalog = auction_house();
    let binder = binder(&catalog);
    let path = bind(&binder, expression);

    let part = resolve_model_part(&path, catalog.metamodel(), NoTableGroups).unwrap();
    assert_eq!(part.to_string(), expected);
}

#[test]
fn test_element_of_entity_collection_is_the_entity_descriptor() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(metamodel);
    from_clause.add_root(&binder.alias("a").unwrap()).unwrap();

    let element = bind(&binder, "element(a.bids)");
    let bid = metamodel.find_entity_descriptor("Bid").unwrap();
    for part in [
        resolve_model_part(&element, metamodel, &from_clause),
        resolve_model_part(&element, metamodel, NoTableGroups),
    ] {
        match part {
            Some(ModelPart::Entity(entity)) => assert!(std::ptr::eq(entity, bid)),
            other => panic!("expected the Bid descriptor, got {:?}", other),
        }
    }

    let watcher = bind(&binder, "element(a.watchers)");
    let member = metamodel.find_entity_descriptor("Member").unwrap();
    assert!(matches!(
        resolve_model_part(&watcher, metamodel, NoTableGroups),
        Some(ModelPart::Entity(entity)) if std::ptr::eq(entity, member)
    ));
}

#[test]
fn test_collection_parts() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);

    let key = bind(&binder, "key(a.tags)");
    let Some(ModelPart::Collection(key)) = resolve_model_part(&key, metamodel, NoTableGroups)
    else {
        panic!("map key should resolve to a collection part");
    };
    assert_eq!(key.nature, CollectionPartNature::Index);
    assert_eq!(key.collection_role, "Auction.tags");

    let value = bind(&binder, "value(a.tags)");
    let value = resolve_model_part(&value, metamodel, NoTableGroups).unwrap();
    assert!(matches!(
        value,
        ModelPart::Collection(part) if part.nature == CollectionPartNature::Element
    ));
    assert_eq!(value.jdbc_mapping().unwrap().kind, BasicKind::String);

    let position = bind(&binder, "index(m.nicknames)");
    let position = resolve_model_part(&position, metamodel, NoTableGroups).unwrap();
    assert_eq!(position.jdbc_mapping().unwrap().kind, BasicKind::Integer);

    let price = bind(&binder, "element(a.priceHistory).currency");
    assert_eq!(
        resolve_model_part(&price, metamodel, NoTableGroups)
            .unwrap()
            .to_string(),
        "basic(currency -> auction_prices.price_currency : string)"
    );

    let watch_id = binder.alias("a").unwrap();
    let watch_id = watch_id
        .get("watchers", catalog.path_sources())
        .unwrap()
        .collection_id()
        .unwrap();
    let Some(ModelPart::Collection(watch_id)) =
        resolve_model_part(&watch_id, metamodel, NoTableGroups)
    else {
        panic!("collection id should resolve to a collection part");
    };
    assert_eq!(watch_id.nature, CollectionPartNature::Id);
}

#[test]
fn test_any_association_parts() {
    let catalog = auction_house();
    let registry = catalog.path_sources();
    let binder = binder(&catalog);
    let item = bind(&binder, "a.item");

    let ModelPart::Any(any) =
        resolve_model_part(&item, catalog.metamodel(), NoTableGroups).unwrap()
    else {
        panic!("a.item should be a discriminated association");
    };
    assert_eq!(any.entity_for_discriminator("N"), Some("Node"));

    let discriminator = item.get("{discriminator}", registry).unwrap();
    let key = item.get("{key}", registry).unwrap();
    assert_eq!(
        resolve_model_part(&discriminator, catalog.metamodel(), NoTableGroups)
            .unwrap()
            .to_string(),
        "basic({discriminator} -> auctions.item_type : string)"
    );
    assert_eq!(
        resolve_model_part(&key, catalog.metamodel(), NoTableGroups)
            .unwrap()
            .jdbc_mapping()
            .unwrap()
            .kind,
        BasicKind::Long
    );
}

#[test]
fn test_joined_paths_resolve_through_their_table_group() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let mut binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(metamodel);
    from_clause.add_root(&binder.alias("a").unwrap()).unwrap();
    let bids = binder.add_join("a.bids", "b").unwrap();
    from_clause.add_join(&bids).unwrap();

    let amount = bind(&binder, "b.amount.amount");
    assert_eq!(
        resolve_model_part(&amount, metamodel, &from_clause)
            .unwrap()
            .to_string(),
        "basic(amount -> bids.bid_amount : decimal)"
    );
    let element = bind(&binder, "element(b)");
    assert!(matches!(
        resolve_model_part(&element, metamodel, &from_clause),
        Some(ModelPart::Entity(entity)) if entity.entity_name == "Bid"
    ));
}

#[test]
fn test_cte_paths_are_absent() {
    let catalog = auction_house();
    let mut binder = binder(&catalog);
    let cte = Arc::new(SqmCteTable::new(
        "top_bids",
        vec![("auction_id", BasicKind::Long), ("total", BasicKind::Decimal)],
    ));
    let root = binder.add_cte_root(cte, "t").unwrap();

    assert_eq!(
        resolve_model_part(&root, catalog.metamodel(), NoTableGroups),
        None
    );
    let total = bind(&binder, "t.total");
    assert_eq!(
        resolve_model_part(&total, catalog.metamodel(), NoTableGroups),
        None
    );
}

#[test]
fn test_depth_limit_yields_absent() {
    let catalog = auction_house();
    let binder = binder(&catalog);
    let path = bind(&binder, "n.parent.parent.parent.label");

    let config = ResolverConfig {
        max_path_depth: 2,
        ..Default::default()
    };
    let shallow = ModelPartResolver::new(catalog.metamodel(), NoTableGroups).with_config(&config);
    assert_eq!(shallow.resolve_model_part(&path), None);

    let unbounded = ModelPartResolver::new(catalog.metamodel(), NoTableGroups);
    assert!(unbounded.resolve_model_part(&path).is_some());
}

#[test]
fn test_resolution_is_idempotent() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);
    let mut from_clause = FromClauseIndex::new(metamodel);
    from_clause.add_root(&binder.alias("a").unwrap()).unwrap();
    let resolver = ModelPartResolver::new(metamodel, &from_clause);

    for expression in [
        "a.reserve.amount",
        "element(a.bids)",
        "key(a.tags)",
        "treat(n as SpecialNode).specialAttribute",
    ] {
        let path = bind(&binder, expression);
        let first = resolver.resolve_model_part(&path);
        let second = resolver.resolve_model_part(&path);
        assert!(first.is_some(), "{} did not resolve", expression);
        assert_eq!(first, second, "{} changed between calls", expression);
    }
}
