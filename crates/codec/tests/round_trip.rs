//! Round-trip behaviour of the structured serializer and compression codec.

use plan_share_codec::structured::{decode, encode, is_iso_shaped};
use plan_share_codec::{compress, decompress, EncodeError, CIRCULAR_MARKER, MAX_DEPTH};
use plan_share_util::graph::{Graph, Value};
use plan_share_util::json_equal::deep_equal;
use proptest::prelude::*;
use serde_json::Value as Json;

fn arb_json() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i32>().prop_map(Json::from),
        (-1.0e9f64..1.0e9).prop_map(Json::from),
        any::<String>().prop_map(Json::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Json::Array),
            prop::collection::vec((any::<String>(), inner), 0..5)
                .prop_map(|entries| Json::Object(entries.into_iter().collect())),
        ]
    })
}

fn has_date_like_string(json: &Json) -> bool {
    match json {
        Json::String(s) => is_iso_shaped(s) || s == CIRCULAR_MARKER,
        Json::Array(items) => items.iter().any(has_date_like_string),
        Json::Object(map) => map.values().any(has_date_like_string),
        _ => false,
    }
}

proptest! {
    #[test]
    fn compress_round_trips_any_string(text in any::<String>()) {
        prop_assert_eq!(decompress(&compress(&text)).unwrap(), text);
    }

    #[test]
    fn compressed_token_is_url_safe(text in any::<String>()) {
        let token = compress(&text);
        prop_assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn acyclic_graphs_round_trip(json in arb_json()) {
        prop_assume!(!has_date_like_string(&json));
        let mut graph = Graph::new();
        let value = graph.import_json(&json);

        let doc = decode(&encode(&graph, &value).unwrap()).unwrap();
        prop_assert!(deep_equal(&graph, &value, &doc.graph, &doc.root));
    }

    #[test]
    fn dates_round_trip(ms in -62_135_596_800_000i64..253_402_300_799_999) {
        let mut graph = Graph::new();
        let date = graph.date(ms);
        let root = graph.array([date.clone(), Value::from("x")]);

        let doc = decode(&encode(&graph, &root).unwrap()).unwrap();
        let items = doc.graph.as_array(&doc.root).unwrap();
        prop_assert_eq!(doc.graph.date_value(&items[0]), Some(ms));
    }
}

#[test]
fn plan_with_start_date() {
    let mut graph = Graph::new();
    let start = graph.date(1_704_067_200_000);
    let plan = graph.object([("name", Value::from("Plan A")), ("start", start)]);

    let doc = decode(&encode(&graph, &plan).unwrap()).unwrap();
    assert_eq!(doc.get("name"), Some(&Value::from("Plan A")));
    assert_eq!(doc.graph.date_value(doc.get("start").unwrap()), Some(1_704_067_200_000));
    assert!(deep_equal(&graph, &plan, &doc.graph, &doc.root));
}

#[test]
fn cycle_is_cut_with_marker() {
    let mut graph = Graph::new();
    let node = graph.object([("name", Value::from("v"))]);
    graph.set(&node, "self", node.clone());

    let text = encode(&graph, &node).unwrap();
    let doc = decode(&text).unwrap();
    assert_eq!(doc.get("self"), Some(&Value::from(CIRCULAR_MARKER)));
}

#[test]
fn marker_collides_with_real_data() {
    // A genuine "[Circular]" string and a cut cycle decode identically.
    let mut graph = Graph::new();
    let genuine = graph.object([("self", Value::from("[Circular]"))]);
    let cyclic = graph.object::<&str>([]);
    graph.set(&cyclic, "self", cyclic.clone());

    assert_eq!(encode(&graph, &genuine).unwrap(), encode(&graph, &cyclic).unwrap());
}

#[test]
fn iso_looking_string_becomes_date() {
    let mut graph = Graph::new();
    let note = graph.object([("label", Value::from("2024-05-01T09:30:00.000Z"))]);

    let doc = decode(&encode(&graph, &note).unwrap()).unwrap();
    assert_eq!(doc.graph.date_value(doc.get("label").unwrap()), Some(1_714_555_800_000));
}

#[test]
fn deep_nesting_through_compression() {
    let mut graph = Graph::new();
    let mut current = graph.object([("leaf", Value::Bool(true))]);
    for depth in 0..50 {
        current = graph.object([("depth", Value::from(depth)), ("child", current)]);
    }
    let token = compress(&encode(&graph, &current).unwrap());
    let doc = decode(&decompress(&token).unwrap()).unwrap();
    assert!(deep_equal(&graph, &current, &doc.graph, &doc.root));
}

#[test]
fn nesting_limit_matches_what_decode_accepts() {
    let mut graph = Graph::new();
    let mut current = graph.object([("leaf", Value::Bool(true))]);
    for _ in 1..MAX_DEPTH {
        current = graph.object([("child", current)]);
    }
    let doc = decode(&encode(&graph, &current).unwrap()).unwrap();
    assert!(deep_equal(&graph, &current, &doc.graph, &doc.root));

    for _ in MAX_DEPTH..200 {
        current = graph.object([("child", current)]);
    }
    assert!(matches!(
        encode(&graph, &current),
        Err(EncodeError::TooDeep { .. })
    ));
}
