use super::fixture::{auction_house, bind, binder};
use pathmap::mapping_model::{ModelPart, ModelPartContainer};
use pathmap::path_parser::BindError;
use pathmap::resolver::{
    resolve_entity_persister, resolve_explicit_treat_target, resolve_model_part, validate_treat,
    ModelPartResolver, ResolutionError,
};
use pathmap::sql_ast::NoTableGroups;
use pathmap::sqm::SqmPathError;
use pathmap::ResolverConfig;

#[test]
fn test_treat_resolves_to_the_target_descriptor() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);

    let treated = bind(&binder, "treat(n as SpecialNode)");
    let special = metamodel.find_entity_descriptor("SpecialNode").unwrap();
    assert!(matches!(
        resolve_model_part(&treated, metamodel, NoTableGroups),
        Some(ModelPart::Entity(entity)) if std::ptr::eq(entity, special)
    ));
}

#[test]
fn test_treat_unlocks_subtype_attribute() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);

    let special = bind(&binder, "treat(n as SpecialNode).specialAttribute");
    assert_eq!(
        resolve_model_part(&special, metamodel, NoTableGroups)
            .unwrap()
            .to_string(),
        "basic(specialAttribute -> nodes.special_attribute : string)"
    );

    // inherited attributes stay reachable through the narrowed path
    let label = bind(&binder, "treat(n.parent as SpecialNode).label");
    assert!(resolve_model_part(&label, metamodel, NoTableGroups).is_some());

    // without the treat the attribute is not part of Node at all
    assert!(matches!(
        binder.bind_str("n.specialAttribute"),
        Err(BindError::Path(SqmPathError::UnknownAttribute { .. }))
    ));
    let node = metamodel.find_entity_descriptor("Node").unwrap();
    assert_eq!(node.find_sub_part("specialAttribute", None, metamodel), None);
}

#[test]
fn test_treat_never_reaches_sibling_attributes() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let node = metamodel.find_entity_descriptor("Node").unwrap();
    let special = metamodel.find_entity_descriptor("SpecialNode").unwrap();
    let other = metamodel.find_entity_descriptor("OtherNode").unwrap();

    assert!(node
        .find_sub_part("specialAttribute", Some(special), metamodel)
        .is_some());
    assert_eq!(
        node.find_sub_part("specialAttribute", Some(other), metamodel),
        None
    );
    assert_eq!(
        special.find_sub_part("otherAttribute", Some(other), metamodel),
        None
    );

    let binder = binder(&catalog);
    assert!(matches!(
        binder.bind_str("treat(n as OtherNode).specialAttribute"),
        Err(BindError::Path(SqmPathError::UnknownAttribute { .. }))
    ));
}

#[test]
fn test_explicit_treat_target_only_looks_at_the_parent() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);

    let direct = bind(&binder, "treat(n as SpecialNode).parent");
    let target = resolve_explicit_treat_target(&direct, metamodel).unwrap();
    assert_eq!(target.map(|entity| entity.entity_name.as_str()), Some("SpecialNode"));

    let nested = bind(&binder, "treat(n as SpecialNode).parent.label");
    assert_eq!(resolve_explicit_treat_target(&nested, metamodel).unwrap(), None);

    let plain = bind(&binder, "n.label");
    assert_eq!(resolve_explicit_treat_target(&plain, metamodel).unwrap(), None);
}

#[test]
fn test_entity_persister_for_root_source() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let source = catalog.path_sources().root_path_source("Bid").unwrap();
    let persister = resolve_entity_persister(&source, metamodel).unwrap();
    assert!(std::ptr::eq(
        persister,
        metamodel.find_entity_descriptor("Bid").unwrap()
    ));

    let money = catalog.path_sources().managed_type_source("Money").unwrap();
    assert!(resolve_entity_persister(&money, metamodel).is_err());
}

#[test]
fn test_validate_treat() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);

    let narrowing = bind(&binder, "treat(n.parent as SpecialNode)");
    assert_eq!(
        validate_treat(&narrowing, metamodel).unwrap().entity_name,
        "SpecialNode"
    );
    let same_type = bind(&binder, "treat(n as Node)");
    assert!(validate_treat(&same_type, metamodel).is_ok());

    for expression in [
        "treat(n as Member)",
        "treat(a.reserve as Money)",
        "treat(n as Money)",
        "n.parent",
    ] {
        let path = bind(&binder, expression);
        assert!(
            matches!(
                validate_treat(&path, metamodel),
                Err(ResolutionError::InvalidTreatTarget { .. })
            ),
            "{} passed validation",
            expression
        );
    }
}

#[test]
fn test_treat_validation_is_opt_in() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();
    let binder = binder(&catalog);
    let widening = bind(&binder, "treat(n as Member).handle");

    let lenient = ModelPartResolver::new(metamodel, NoTableGroups);
    assert!(lenient.try_resolve_model_part(&widening).unwrap().is_some());

    let config = ResolverConfig {
        validate_treat_targets: true,
        ..Default::default()
    };
    let strict = ModelPartResolver::new(metamodel, NoTableGroups).with_config(&config);
    assert!(matches!(
        strict.try_resolve_model_part(&widening),
        Err(ResolutionError::InvalidTreatTarget { .. })
    ));
    assert!(strict
        .require_model_part(&bind(&binder, "treat(n as SpecialNode).specialAttribute"))
        .is_ok());
}
