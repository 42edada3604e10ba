use plan_share_util::graph::{Document, Graph, Node, Object, Value};
use serde_json::{Map, Value as Json};

use super::iso::parse_iso;
use super::{DATE_TAG, DATE_TAG_FIELD, DATE_VALUE_FIELD};
use crate::error::DecodeError;

/// Parses JSON text into a fresh value graph, reviving dates.
///
/// # Example
///
/// ```
/// use plan_share_codec::structured::decode;
///
/// let doc = decode(r#"{"start":"2024-01-01T00:00:00.000Z"}"#).unwrap();
/// let start = doc.get("start").unwrap();
/// assert_eq!(doc.graph.date_value(start), Some(1_704_067_200_000));
/// ```
pub fn decode(text: &str) -> Result<Document, DecodeError> {
    let json: Json = serde_json::from_str(text)?;
    Ok(decode_value(&json))
}

/// Builds a value graph from already-parsed JSON, reviving dates.
pub fn decode_value(json: &Json) -> Document {
    let mut graph = Graph::new();
    let root = revive(&mut graph, json);
    Document::new(graph, root)
}

/// Bottom-up: children are revived before their parent is allocated.
fn revive(graph: &mut Graph, json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => match parse_iso(s) {
            Some(ms) => graph.date(ms),
            None => Value::String(s.clone()),
        },
        Json::Array(items) => {
            let items: Vec<Value> = items.iter().map(|item| revive(graph, item)).collect();
            graph.array(items)
        }
        Json::Object(map) => {
            if let Some(ms) = tagged_date(map) {
                return graph.date(ms);
            }
            let mut object = Object::new();
            for (key, val) in map {
                let val = revive(graph, val);
                object.set(key.as_str(), val);
            }
            Value::Ref(graph.alloc(Node::Object(object)))
        }
    }
}

/// Epoch milliseconds of a `{"__type":"Date","value":"<ISO>"}` record. Records
/// with extra fields or an unparseable value are left as plain objects.
fn tagged_date(map: &Map<String, Json>) -> Option<i64> {
    if map.len() != 2 || map.get(DATE_TAG_FIELD)?.as_str()? != DATE_TAG {
        return None;
    }
    parse_iso(map.get(DATE_VALUE_FIELD)?.as_str()?)
}
