//! Property tests for path walking, depth limits, operand quoting
//! and repeatable resolution.
use proptest::prelude::*;
use serde_json::{json, Value as Json};

use story_resolver_engine::{
    stringify, Context, Error, PathWalker, Resolver, ResolverConfig, Value, ValueNode,
};

mod strategies {
    use super::*;

    /// Arbitrary JSON, a few levels deep.
    pub fn json() -> impl Strategy<Value = Json> {
        let leaf = prop_oneof![
            Just(Json::Null),
            any::<bool>().prop_map(Json::from),
            any::<i64>().prop_map(Json::from),
            "[a-z0-9]{0,6}".prop_map(Json::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
                prop::collection::btree_map("[a-z0-9]{0,3}", inner, 0..4)
                    .prop_map(|m| Json::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Trees of literal leaves inside lists and mappings. Mapping keys
    /// are unique and come out in random order.
    pub fn literal_tree() -> impl Strategy<Value = ValueNode> {
        let leaf = prop_oneof![
            Just(ValueNode::literal(Value::Null)),
            any::<bool>().prop_map(ValueNode::literal),
            any::<i64>().prop_map(ValueNode::literal),
            (-1.0e6f64..1.0e6).prop_map(ValueNode::literal),
            "[a-z0-9 ]{0,6}".prop_map(|s| ValueNode::literal(s.as_str())),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(ValueNode::list),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| m.into_iter().collect::<Vec<_>>())
                    .prop_shuffle()
                    .prop_map(|fields| {
                        ValueNode::mapping(fields.iter().map(|(k, v)| (k.as_str(), v.clone())).collect())
                    }),
            ]
        })
    }

    /// Dotted paths mixing keys, indices and junk segments.
    pub fn path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z0-9]{0,3}",
                "[0-9]{1,25}",
                Just("-1".to_owned()),
                Just("é".to_owned()),
            ],
            0..6,
        )
        .prop_map(|segments| segments.join("."))
    }

    /// Text that reads back unchanged once quoted as an expression operand.
    pub fn plain_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ',.{}()\\[\\]]{0,20}"
    }
}

fn nested_list(depth: usize) -> ValueNode {
    let mut node = ValueNode::literal("leaf");
    for _ in 0..depth {
        node = ValueNode::list(vec![node]);
    }
    node
}

proptest! {
    #[test]
    fn path_walk_never_panics(data in strategies::json(), path in strategies::path(), fallback in any::<bool>()) {
        let _ = PathWalker::new(fallback).walk(&path, &data);
    }

    #[test]
    fn path_nodes_resolve_to_what_was_walked(data in strategies::json(), path in strategies::path()) {
        let walked = PathWalker::default().walk(&path, &data).unwrap_or_default();
        let context = Context::try_from(json!({"root": data})).unwrap();
        let node = ValueNode::path(&format!("root.{path}"));
        let resolved = Resolver::default().resolve(&node, &context).unwrap();
        prop_assert_eq!(walked, resolved);
    }

    #[test]
    fn too_deep_trees_are_rejected(max_depth in 1usize..40, extra in 1usize..10) {
        let resolver = Resolver::new(ResolverConfig { max_depth, ..Default::default() });
        let context = Context::default();
        let fits = nested_list(max_depth - 1);
        prop_assert!(resolver.resolve(&fits, &context).is_ok());
        let too_deep = nested_list(max_depth - 1 + extra);
        prop_assert!(matches!(
            resolver.resolve(&too_deep, &context),
            Err(Error::DepthExceeded(d)) if d == max_depth
        ));
    }

    #[test]
    fn quoted_text_evaluates_to_itself(text in strategies::plain_text()) {
        let node = ValueNode::expression("{}", vec![ValueNode::literal(text.as_str())]);
        let value = Resolver::default().resolve(&node, &Context::default()).unwrap();
        prop_assert_eq!(Value::Text(text), value);
    }

    #[test]
    fn integer_sums_match(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let node = ValueNode::expression("{} + {}", vec![ValueNode::literal(a), ValueNode::literal(b)]);
        let value = Resolver::default().resolve(&node, &Context::default()).unwrap();
        prop_assert_eq!(Value::Int(a + b), value);
    }

    #[test]
    fn resolving_twice_gives_the_same_result(tree in strategies::literal_tree(), data in strategies::json()) {
        let resolver = Resolver::default();
        let context = Context::try_from(json!({"data": data})).unwrap();
        let first = resolver.resolve(&tree, &context).unwrap();
        let second = resolver.resolve(&tree, &context).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first.to_json()).unwrap(),
            serde_json::to_string(&second.to_json()).unwrap()
        );
    }

    #[test]
    fn floats_stringify_as_floats(f in -1.0e9f64..1.0e9) {
        let text = stringify(&Value::Float(f));
        prop_assert!(text.contains('.') || text.contains('e'), "{}", text);
    }
}

#[test]
fn decode_respects_depth() {
    let mut tree = json!("leaf");
    for _ in 0..10 {
        tree = json!([tree]);
    }
    let resolver = Resolver::new(ResolverConfig {
        max_depth: 10,
        ..Default::default()
    });
    assert!(matches!(resolver.decode(&tree), Err(Error::DepthExceeded(10))));
}
