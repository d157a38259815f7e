use pathmap::path_parser::{parse_path_expression, PathParseError, MAX_PATH_STEPS};
use test_case::test_case;

#[test_case("a" ; "alias")]
#[test_case("a.bids" ; "attribute")]
#[test_case("a.reserve.amount" ; "attribute chain")]
#[test_case("treat(n as SpecialNode)" ; "treat")]
#[test_case("treat(treat(n as Node).parent as SpecialNode).label" ; "nested treat")]
#[test_case("element(a.bids).amount.currency" ; "element chain")]
#[test_case("key(a.tags)" ; "map key")]
#[test_case("index(m.nicknames)" ; "list index")]
#[test_case("value(a.tags)" ; "map value")]
fn test_valid_expressions_round_trip(input: &str) {
    let expr = parse_path_expression(input).unwrap();
    assert_eq!(expr.to_string(), input);
}

#[test_case("" ; "empty")]
#[test_case("." ; "lone dot")]
#[test_case("a..b" ; "double dot")]
#[test_case("a.1x" ; "numeric attribute")]
#[test_case("treat(" ; "open treat")]
#[test_case("treat(n as)" ; "missing target")]
#[test_case("element()" ; "empty element")]
#[test_case("key(a.tags" ; "unclosed key")]
#[test_case("a b" ; "two aliases")]
#[test_case("a.bids)" ; "stray parenthesis")]
fn test_malformed_expressions_fail_without_panic(input: &str) {
    assert!(parse_path_expression(input).is_err(), "{:?} parsed", input);
}

#[test]
fn test_error_reports_offset() {
    match parse_path_expression("a.reserve.") {
        Err(PathParseError::Syntax { position, .. }) => assert_eq!(position, 10),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test_case(format!("{}a.bids{}", "element(".repeat(50_000), ")".repeat(50_000)) ; "deeply nested element")]
#[test_case(format!("{}n{}", "treat(".repeat(50_000), " as Node)".repeat(50_000)) ; "deeply nested treat")]
#[test_case(format!("a{}", ".reserve".repeat(50_000)) ; "long attribute chain")]
#[test_case("element(".repeat(50_000) ; "unclosed nesting")]
fn test_oversized_expressions_are_rejected(input: String) {
    assert_eq!(
        parse_path_expression(&input),
        Err(PathParseError::TooDeep {
            limit: MAX_PATH_STEPS
        })
    );
}
