use super::fixture::{auction_house, bind, binder};
use pathmap::domain_model::BasicKind;
use pathmap::resolver::{resolve_expression_type, ModelPartResolver, ResolutionError};
use pathmap::sql_ast::NoTableGroups;
use pathmap::sqm::{SqmCteTable, SqmExpressible, SqmExpression};
use std::sync::Arc;

#[test]
fn test_path_expression_types() {
    let catalog = auction_house();
    let binder = binder(&catalog);

    let status = SqmExpression::path(bind(&binder, "a.status"));
    let status = resolve_expression_type(&status, catalog.metamodel(), NoTableGroups).unwrap();
    assert_eq!(status.jdbc_mapping().unwrap().kind, BasicKind::Integer);
    assert!(status.model_part().is_some());

    let reserve = SqmExpression::path(bind(&binder, "a.reserve"));
    let reserve = resolve_expression_type(&reserve, catalog.metamodel(), NoTableGroups).unwrap();
    assert_eq!(reserve.jdbc_mapping(), None);
}

#[test]
fn test_basic_typed_nodes() {
    let catalog = auction_house();
    let metamodel = catalog.metamodel();

    let literal = SqmExpression::literal("42", BasicKind::Long);
    let literal = resolve_expression_type(&literal, metamodel, NoTableGroups).unwrap();
    assert_eq!(literal.jdbc_mapping().unwrap().kind, BasicKind::Long);
    assert_eq!(literal.model_part(), None);

    let function = SqmExpression::Function {
        name: "upper".to_string(),
        arguments: vec![SqmExpression::literal("x", BasicKind::String)],
        return_kind: Some(BasicKind::String),
    };
    assert!(resolve_expression_type(&function, metamodel, NoTableGroups).is_some());

    let untyped = SqmExpression::parameter("p", None);
    assert_eq!(resolve_expression_type(&untyped, metamodel, NoTableGroups), None);
}

#[test]
fn test_parameter_takes_the_type_of_the_path_it_is_compared_to() {
    let catalog = auction_house();
    let binder = binder(&catalog);
    let resolver = ModelPartResolver::new(catalog.metamodel(), NoTableGroups);

    let title = SqmExpression::path(bind(&binder, "a.title"));
    let parameter = SqmExpression::parameter("title", None);
    let (lhs, rhs) = resolver.infer_comparison_types(&title, &parameter);
    assert_eq!(lhs, rhs);
    assert_eq!(rhs.unwrap().jdbc_mapping().unwrap().kind, BasicKind::String);
}

#[test]
fn test_unanchored_comparison_stays_absent() {
    let catalog = auction_house();
    let mut binder = binder(&catalog);
    let cte = Arc::new(SqmCteTable::new("totals", vec![("total", BasicKind::Decimal)]));
    binder.add_cte_root(cte, "t").unwrap();
    let resolver = ModelPartResolver::new(catalog.metamodel(), NoTableGroups);

    let total = SqmExpression::path(bind(&binder, "t.total"));
    // the node itself knows its type
    assert!(matches!(total.node_type(), Some(SqmExpressible::Basic(_))));
    // but it has no physical model part, and neither does the parameter
    let parameter = SqmExpression::parameter("p", None);
    assert_eq!(resolver.infer_comparison_types(&parameter, &total), (None, None));

    let path = total.as_path().unwrap();
    assert!(matches!(
        resolver.require_model_part(path),
        Err(ResolutionError::UnresolvedPath { .. })
    ));
}
