use std::collections::HashMap;

use crate::graph::{Graph, Node, NodeId, Object, Property, PropertyDescriptor, Value};

/// Creates a deep clone of any value in `graph`, allocating the copies in the
/// same arena.
///
/// Aliasing is preserved: two positions that referenced the same node in the
/// input reference the same (new) node in the output, and cycles terminate.
/// Objects keep their class tag and every own property with its full
/// descriptor. Accessors are copied as handles, never invoked.
///
/// # Examples
///
/// ```
/// use plan_share_util::graph::{Graph, Value};
/// use plan_share_util::json_clone::clone;
///
/// let mut graph = Graph::new();
/// let node = graph.object::<&str>([]);
/// graph.set(&node, "self", node.clone());
///
/// let copy = clone(&mut graph, &node);
/// assert_ne!(copy, node);
/// assert_eq!(graph.get(&copy, "self"), Some(&copy));
/// ```
pub fn clone(graph: &mut Graph, value: &Value) -> Value {
    let mut cloner = Cloner::default();
    let copy = cloner.value_in(value, graph);
    while let Some((source, target)) = cloner.pending.pop() {
        // Source and destination are the same arena, so the node is read by
        // value before its copy is filled in.
        let node = graph.node(source).clone();
        let filled = cloner.fill(&node, |cloner, value| cloner.value_in(value, graph));
        *graph.node_mut(target) = filled;
    }
    copy
}

/// Deep-clones `value` from `src` into a different arena `dst`.
///
/// Symbol keys are copied by id, so `dst` should share `src`'s symbol space
/// (for example, be a clone of it) when symbol-keyed properties matter.
pub fn clone_into(src: &Graph, value: &Value, dst: &mut Graph) -> Value {
    let mut cloner = Cloner::default();
    let copy = cloner.value_across(value, src, dst);
    while let Some((source, target)) = cloner.pending.pop() {
        let filled = cloner.fill(src.node(source), |cloner, value| {
            cloner.value_across(value, src, dst)
        });
        *dst.node_mut(target) = filled;
    }
    copy
}

/// Walks the graph with an explicit work list, so nesting depth is bounded by
/// memory rather than by the call stack.
#[derive(Default)]
struct Cloner {
    seen: HashMap<NodeId, NodeId>,
    /// Copies allocated but not yet filled in, as `(source, copy)`.
    pending: Vec<(NodeId, NodeId)>,
}

impl Cloner {
    fn value_in(&mut self, value: &Value, graph: &mut Graph) -> Value {
        let Value::Ref(id) = value else {
            return value.clone();
        };
        if let Some(copy) = self.seen.get(id) {
            return Value::Ref(*copy);
        }
        let shape = shape(graph.node(*id));
        Value::Ref(self.reserve(*id, shape, graph))
    }

    fn value_across(&mut self, value: &Value, src: &Graph, dst: &mut Graph) -> Value {
        let Value::Ref(id) = value else {
            return value.clone();
        };
        if let Some(copy) = self.seen.get(id) {
            return Value::Ref(*copy);
        }
        Value::Ref(self.reserve(*id, shape(src.node(*id)), dst))
    }

    /// Allocates the copy of `id` and registers it before any of its children
    /// are visited.
    fn reserve(&mut self, id: NodeId, shape: Node, dst: &mut Graph) -> NodeId {
        let filled = matches!(shape, Node::Date(_));
        let copy = dst.alloc(shape);
        self.seen.insert(id, copy);
        if !filled {
            self.pending.push((id, copy));
        }
        copy
    }

    fn fill(&mut self, node: &Node, mut value: impl FnMut(&mut Self, &Value) -> Value) -> Node {
        match node {
            Node::Date(ms) => Node::Date(*ms),
            Node::Array(items) => Node::Array(items.iter().map(|item| value(self, item)).collect()),
            Node::Object(object) => Node::Object(Object {
                class: object.class.clone(),
                properties: object
                    .properties
                    .iter()
                    .map(|p| Property {
                        key: p.key.clone(),
                        descriptor: match &p.descriptor {
                            PropertyDescriptor::Data {
                                value: data,
                                writable,
                                enumerable,
                                configurable,
                            } => PropertyDescriptor::Data {
                                value: value(self, data),
                                writable: *writable,
                                enumerable: *enumerable,
                                configurable: *configurable,
                            },
                            accessor => accessor.clone(),
                        },
                    })
                    .collect(),
            }),
        }
    }
}

/// An empty node of the same kind; dates are complete already.
fn shape(node: &Node) -> Node {
    match node {
        Node::Date(ms) => Node::Date(*ms),
        Node::Array(items) => Node::Array(Vec::with_capacity(items.len())),
        Node::Object(object) => Node::Object(Object::with_class(object.class.clone())),
    }
}
