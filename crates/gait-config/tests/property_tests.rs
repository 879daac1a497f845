use gait_config::{ConfigTree, Item, Section, Value, dump, parse};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("NaN has no literal form", |f| !f.is_nan())
            .prop_map(Value::Float),
        any::<String>().prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Later duplicates would collapse into the first on reparse.
fn dedup_keys(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut out: Vec<(Value, Value)> = Vec::new();
    for (k, v) in entries {
        if !out.iter().any(|(existing, _)| *existing == k) {
            out.push((k, v));
        }
    }
    out
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Tuple),
            prop::collection::vec((scalar(), inner), 0..6)
                .prop_map(|entries| Value::Dict(dedup_keys(entries))),
        ]
    })
}

fn comment() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("([a-zA-Z0-9][a-zA-Z0-9 =\\[\\]]{0,20})?", 0..3)
}

fn tree() -> impl Strategy<Value = ConfigTree> {
    let item = ("[a-z_][a-z0-9_]{0,8}", value(), comment());
    let section = (prop::collection::vec(item, 0..5), comment());
    (
        prop::collection::btree_map("[a-z0-9][a-z0-9_-]{0,8}", section, 0..4),
        comment(),
    )
        .prop_map(|(sections, trailing)| {
            let mut tree = ConfigTree::new();
            for (name, (items, section_comment)) in sections {
                let mut section = Section::new().with_comment(section_comment);
                for (item_name, value, item_comment) in items {
                    let item = Item::new(item_name, value).unwrap().with_comment(item_comment);
                    section.insert(item);
                }
                tree.insert_section(&name, section).unwrap();
            }
            tree.set_trailing_comment(trailing);
            tree
        })
}

proptest! {
    #[test]
    fn test_value_roundtrip(v in value()) {
        let mut tree = ConfigTree::new();
        tree.set("sec", "v", v.clone()).unwrap();

        let reparsed = parse(&dump(&tree)).unwrap();
        prop_assert_eq!(reparsed.value("sec", "v").unwrap(), &v);
    }

    #[test]
    fn test_tree_roundtrip(t in tree()) {
        let text = dump(&t);
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(&reparsed, &t);

        // Canonical output is a fixed point.
        prop_assert_eq!(dump(&reparsed), text);
    }
}
