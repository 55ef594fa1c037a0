use osrc_netconv::expression::{BinaryOp, Expression, ExpressionError, evaluate};
use osrc_netconv::naming::{camel_to_snake, synthesized_key};

#[test]
fn test_precedence() {
    assert_eq!(evaluate("2+3*4"), Ok(14.0));
    assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
    assert_eq!(evaluate("10 - 4 - 3"), Ok(3.0));
    assert_eq!(evaluate("8 / 4 / 2"), Ok(1.0));
}

#[test]
fn test_power_and_negation() {
    assert_eq!(evaluate("-(2**3)"), Ok(-8.0));
    assert_eq!(evaluate("-2**2"), Ok(-4.0));
    assert_eq!(evaluate("2**3**2"), Ok(512.0));
    assert_eq!(evaluate("2**-1"), Ok(0.5));
    assert_eq!(evaluate("--3"), Ok(3.0));
    assert_eq!(evaluate("3 * -2"), Ok(-6.0));
}

#[test]
fn test_number_literals() {
    assert_eq!(evaluate("0.25"), Ok(0.25));
    assert_eq!(evaluate(".5"), Ok(0.5));
    assert_eq!(evaluate("1e3"), Ok(1000.0));
    assert_eq!(evaluate("2.5E-1"), Ok(0.25));
    assert!(matches!(
        evaluate("1.2.3"),
        Err(ExpressionError::InvalidNumber(_))
    ));
}

#[test]
fn test_identifiers_and_calls_are_rejected() {
    assert!(matches!(
        evaluate("foo"),
        Err(ExpressionError::UnexpectedChar { found: 'f', offset: 0 })
    ));
    assert!(matches!(
        evaluate("abs(-1)"),
        Err(ExpressionError::UnexpectedChar { .. })
    ));
    assert!(matches!(
        evaluate("1 % 2"),
        Err(ExpressionError::UnexpectedChar { found: '%', offset: 2 })
    ));
}

#[test]
fn test_malformed_expressions() {
    assert_eq!(evaluate(""), Err(ExpressionError::Empty));
    assert_eq!(evaluate("   "), Err(ExpressionError::Empty));
    assert!(matches!(evaluate("+1"), Err(ExpressionError::UnexpectedToken { .. })));
    assert!(matches!(evaluate("(1 + 2"), Err(ExpressionError::UnexpectedToken { .. })));
    assert!(matches!(evaluate("1 + 2)"), Err(ExpressionError::UnexpectedToken { .. })));
    assert!(matches!(evaluate("1 2"), Err(ExpressionError::UnexpectedToken { .. })));
    assert!(matches!(evaluate("3 *"), Err(ExpressionError::UnexpectedToken { .. })));
}

#[test]
fn test_non_finite_results() {
    assert_eq!(evaluate("1/0"), Err(ExpressionError::DivisionByZero));
    assert_eq!(evaluate("0**-1"), Err(ExpressionError::DivisionByZero));
    assert_eq!(evaluate("10**400"), Err(ExpressionError::NonFinite));
}

#[test]
fn test_parse_tree_shape() {
    let expr = Expression::parse("1 - 2 * 3").unwrap();
    match &expr {
        Expression::Binary(BinaryOp::Subtract, lhs, rhs) => {
            assert_eq!(**lhs, Expression::Number(1.0));
            assert!(matches!(**rhs, Expression::Binary(BinaryOp::Multiply, _, _)));
        }
        other => panic!("unexpected tree: {:?}", other),
    }
    assert_eq!(expr.to_string(), "(1 - (2 * 3))");
    assert_eq!(Expression::parse("-2**2").unwrap().to_string(), "(-(2 ** 2))");
}

#[test]
fn test_camel_to_snake() {
    assert_eq!(camel_to_snake("GreaterThanOrEqual"), "greater_than_or_equal");
    assert_eq!(camel_to_snake("LessThan"), "less_than");
    assert_eq!(camel_to_snake("equal"), "equal");
    assert_eq!(camel_to_snake("Equal"), "equal");
    assert_eq!(camel_to_snake("notEqual"), "not_equal");
    assert_eq!(camel_to_snake(""), "");
}

#[test]
fn test_synthesized_key() {
    assert_eq!(synthesized_key("logic_gate", "12"), "logic_gate_12");
    assert_eq!(synthesized_key("math_operation", "0"), "math_operation_0");
}
