use std::collections::{HashMap, HashSet};

use crate::graph::{Graph, Node, NodeId, Object, PropertyDescriptor, Value};

/// Performs a deep equality check between two values, each living in its own
/// graph (the graphs may be the same).
///
/// - Numbers compare by value, with `NaN` equal to `NaN`.
/// - Dates compare by epoch milliseconds.
/// - Arrays compare element by element.
/// - Objects compare class tags and their enumerable string-keyed data
///   properties, regardless of property order.
///
/// Node identity is ignored, and a pair of nodes already under comparison is
/// assumed equal, so cyclic graphs terminate.
///
/// # Examples
///
/// ```
/// use plan_share_util::graph::{Graph, Value};
/// use plan_share_util::json_equal::deep_equal;
///
/// let mut graph = Graph::new();
/// let a = graph.object([("foo", Value::from(1))]);
/// let b = graph.object([("foo", Value::from(1))]);
/// let c = graph.object([("foo", Value::from(2))]);
///
/// assert!(deep_equal(&graph, &a, &graph, &b));
/// assert!(!deep_equal(&graph, &a, &graph, &c));
/// ```
pub fn deep_equal(a_graph: &Graph, a: &Value, b_graph: &Graph, b: &Value) -> bool {
    Comparer::new(a_graph, b_graph, false).values(a, b)
}

/// Like [`deep_equal`], but also requires a one-to-one correspondence between
/// the nodes of both sides: two positions share a node in `a` exactly when
/// they share one in `b`. All own properties take part, including hidden and
/// symbol-keyed ones, in definition order and with their full descriptors.
pub fn same_shape(a_graph: &Graph, a: &Value, b_graph: &Graph, b: &Value) -> bool {
    Comparer::new(a_graph, b_graph, true).values(a, b)
}

struct Comparer<'a> {
    a_graph: &'a Graph,
    b_graph: &'a Graph,
    strict: bool,
    pending: HashSet<(NodeId, NodeId)>,
    a_to_b: HashMap<NodeId, NodeId>,
    b_to_a: HashMap<NodeId, NodeId>,
}

impl<'a> Comparer<'a> {
    fn new(a_graph: &'a Graph, b_graph: &'a Graph, strict: bool) -> Self {
        Self {
            a_graph,
            b_graph,
            strict,
            pending: HashSet::new(),
            a_to_b: HashMap::new(),
            b_to_a: HashMap::new(),
        }
    }

    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => self.nodes(*a, *b),
            _ => false,
        }
    }

    fn nodes(&mut self, a: NodeId, b: NodeId) -> bool {
        if self.strict {
            match (self.a_to_b.get(&a), self.b_to_a.get(&b)) {
                (Some(mapped_b), Some(mapped_a)) => return *mapped_b == b && *mapped_a == a,
                (None, None) => {
                    self.a_to_b.insert(a, b);
                    self.b_to_a.insert(b, a);
                }
                _ => return false,
            }
        } else if !self.pending.insert((a, b)) {
            return true;
        }

        let (a_graph, b_graph) = (self.a_graph, self.b_graph);
        match (a_graph.node(a), b_graph.node(b)) {
            (Node::Date(a), Node::Date(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.values(a, b))
            }
            (Node::Object(a), Node::Object(b)) => {
                if self.strict {
                    self.objects_strict(a, b)
                } else {
                    self.objects(a, b)
                }
            }
            _ => false,
        }
    }

    fn objects(&mut self, a: &Object, b: &Object) -> bool {
        if a.class != b.class {
            return false;
        }
        let b_entries: HashMap<&str, &Value> = b.entries().collect();
        if a.entries().count() != b_entries.len() {
            return false;
        }
        for (key, a_val) in a.entries() {
            match b_entries.get(key) {
                Some(b_val) => {
                    if !self.values(a_val, b_val) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    fn objects_strict(&mut self, a: &Object, b: &Object) -> bool {
        if a.class != b.class || a.properties.len() != b.properties.len() {
            return false;
        }
        for (pa, pb) in a.properties.iter().zip(&b.properties) {
            if pa.key != pb.key {
                return false;
            }
            let equal = match (&pa.descriptor, &pb.descriptor) {
                (
                    PropertyDescriptor::Data {
                        value: va,
                        writable: wa,
                        enumerable: ea,
                        configurable: ca,
                    },
                    PropertyDescriptor::Data {
                        value: vb,
                        writable: wb,
                        enumerable: eb,
                        configurable: cb,
                    },
                ) => wa == wb && ea == eb && ca == cb && self.values(va, vb),
                (da, db) => da == db,
            };
            if !equal {
                return false;
            }
        }
        true
    }
}
