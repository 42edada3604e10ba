use std::collections::HashSet;

use plan_share_util::graph::{Graph, Node, NodeId, PropertyDescriptor, PropertyKey, Value};
use serde_json::{Map, Number, Value as Json};

use super::iso::format_iso;
use super::{CIRCULAR_MARKER, DATE_TAG, DATE_TAG_FIELD, DATE_VALUE_FIELD, MAX_DEPTH};
use crate::error::EncodeError;

/// Largest magnitude below which an integral `f64` is written without a
/// fractional part (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes `value` to compact JSON text.
///
/// # Example
///
/// ```
/// use plan_share_codec::structured::encode;
/// use plan_share_util::graph::{Graph, Value};
///
/// let mut graph = Graph::new();
/// let start = graph.date(1_704_067_200_000);
/// let plan = graph.object([("name", Value::from("Plan A")), ("start", start)]);
///
/// assert_eq!(
///     encode(&graph, &plan).unwrap(),
///     r#"{"name":"Plan A","start":{"__type":"Date","value":"2024-01-01T00:00:00.000Z"}}"#,
/// );
/// ```
pub fn encode(graph: &Graph, value: &Value) -> Result<String, EncodeError> {
    let json = encode_value(graph, value)?;
    Ok(serde_json::to_string(&json)?)
}

/// Serializes `value` to a `serde_json::Value` with dates tagged and revisited
/// nodes replaced by the circular marker.
pub fn encode_value(graph: &Graph, value: &Value) -> Result<Json, EncodeError> {
    let mut encoder = Encoder {
        graph,
        visited: HashSet::new(),
        depth: 0,
    };
    encoder.value(value)?.ok_or(EncodeError::Undefined)
}

struct Encoder<'a> {
    graph: &'a Graph,
    visited: HashSet<NodeId>,
    /// Arrays and objects (tagged dates included) currently open.
    depth: usize,
}

impl Encoder<'_> {
    /// `None` means the value is omitted (undefined).
    fn value(&mut self, value: &Value) -> Result<Option<Json>, EncodeError> {
        let json = match value {
            Value::Undefined => return Ok(None),
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Ref(id) => self.node(*id)?,
        };
        Ok(Some(json))
    }

    fn node(&mut self, id: NodeId) -> Result<Json, EncodeError> {
        if !self.visited.insert(id) {
            return Ok(Json::String(CIRCULAR_MARKER.to_owned()));
        }
        let node = self
            .graph
            .get_node(id)
            .ok_or(EncodeError::UnknownNode(id.index()))?;
        if self.depth == MAX_DEPTH {
            return Err(EncodeError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let json = self.contents(node)?;
        self.depth -= 1;
        Ok(json)
    }

    fn contents(&mut self, node: &Node) -> Result<Json, EncodeError> {
        match node {
            Node::Date(ms) => {
                let iso = format_iso(*ms).ok_or(EncodeError::DateOutOfRange(*ms))?;
                let mut tagged = Map::new();
                tagged.insert(DATE_TAG_FIELD.to_owned(), Json::from(DATE_TAG));
                tagged.insert(DATE_VALUE_FIELD.to_owned(), Json::String(iso));
                Ok(Json::Object(tagged))
            }
            Node::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.value(item)?.unwrap_or(Json::Null));
                }
                Ok(Json::Array(out))
            }
            Node::Object(object) => {
                let mut out = Map::new();
                for property in &object.properties {
                    let PropertyKey::String(key) = &property.key else {
                        continue;
                    };
                    match &property.descriptor {
                        PropertyDescriptor::Data {
                            value,
                            enumerable: true,
                            ..
                        } => {
                            if let Some(json) = self.value(value)? {
                                out.insert(key.clone(), json);
                            }
                        }
                        PropertyDescriptor::Accessor {
                            enumerable: true, ..
                        } => return Err(EncodeError::AccessorProperty(key.clone())),
                        _ => {}
                    }
                }
                Ok(Json::Object(out))
            }
        }
    }
}

fn number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return Json::from(n as i64);
    }
    // Non-finite numbers have no JSON form and are written as null.
    Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}
