//! Literal value fidelity through `name = <literal>` definitions

use gait_config::{Error, Value, parse};
use rstest::rstest;

fn parse_item(literal: &str) -> Result<Value, Error> {
    let tree = parse(&format!("[sec]\nv = {literal}\n"))?;
    Ok(tree.value("sec", "v")?.clone())
}

#[rstest]
#[case("45", Value::Int(45))]
#[case("-45", Value::Int(-45))]
#[case("3.25", Value::Float(3.25))]
#[case("-1.5e-3", Value::Float(-1.5e-3))]
#[case("1E6", Value::Float(1e6))]
#[case("'single'", Value::from("single"))]
#[case("\"double\"", Value::from("double"))]
#[case("True", Value::Bool(true))]
#[case("False", Value::Bool(false))]
#[case("[1, 'two', 3.0]", Value::List(vec![Value::Int(1), Value::from("two"), Value::Float(3.0)]))]
#[case("(14, 12)", Value::Tuple(vec![Value::Int(14), Value::Int(12)]))]
#[case("('x',)", Value::Tuple(vec![Value::from("x")]))]
#[case(
    "{'R': 'lawngreen', 'L': 'red'}",
    Value::Dict(vec![
        (Value::from("R"), Value::from("lawngreen")),
        (Value::from("L"), Value::from("red")),
    ])
)]
#[case(
    "{'RGlut': [[0, 42], [96, 100]], 1: (True, -2)}",
    Value::Dict(vec![
        (
            Value::from("RGlut"),
            Value::List(vec![Value::from(vec![0, 42]), Value::from(vec![96, 100])]),
        ),
        (
            Value::Int(1),
            Value::Tuple(vec![Value::Bool(true), Value::Int(-2)]),
        ),
    ])
)]
fn test_literal_fidelity(#[case] literal: &str, #[case] expected: Value) {
    assert_eq!(parse_item(literal).unwrap(), expected);
}

#[rstest]
#[case("{1,2")]
#[case("[1, 2")]
#[case("'unterminated")]
#[case("foo")]
#[case("None")]
#[case("__import__('os').system('ls')")]
#[case("1 + 1")]
#[case("[x for x in range(3)]")]
#[case("{1, 2}")]
fn test_rejected_literals(#[case] literal: &str) {
    let err = parse_item(literal).unwrap_err();
    assert!(
        matches!(err, Error::InvalidLiteral { ref item, line: Some(2), .. } if item == "v"),
        "unexpected error for {literal:?}: {err}"
    );
}

#[test]
fn test_set_value_then_reparse() {
    let mut tree = parse("[sec]\nv = 1\n").unwrap();
    let nested = Value::Dict(vec![
        (Value::from("it's"), Value::from("tab\tand \"quotes\"")),
        (Value::Float(0.5), Value::List(vec![Value::Tuple(vec![])])),
        (Value::Bool(false), Value::Float(f64::INFINITY)),
    ]);
    tree.set("sec", "v", nested.clone()).unwrap();
    let reparsed = parse(&tree.dump()).unwrap();
    assert_eq!(reparsed.value("sec", "v").unwrap(), &nested);
}
