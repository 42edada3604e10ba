//! Arena-backed value graph.
//!
//! Heap values (dates, arrays and objects) live in a caller-owned [`Graph`]
//! and are addressed by [`NodeId`] indices instead of references. A `NodeId`
//! is the identity of an object: two positions holding the same id alias the
//! same node, which is how shared references and cycles are expressed.
//!
//! # Example
//!
//! ```
//! use plan_share_util::graph::{Graph, Value};
//!
//! let mut graph = Graph::new();
//! let start = graph.date(1_704_067_200_000);
//! let plan = graph.object([("name", Value::from("Plan A")), ("start", start)]);
//!
//! assert_eq!(graph.get(&plan, "name"), Some(&Value::from("Plan A")));
//! assert_eq!(graph.date_value(graph.get(&plan, "start").unwrap()), Some(1_704_067_200_000));
//! ```

use serde_json::Value as Json;

/// Index of a heap node inside a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a symbol allocated by [`Graph::symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// Opaque handle to a getter or setter function. Never invoked by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnHandle(pub u32);

/// Prototype of an object. `None` on [`Object::class`] is the plain-object prototype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTag(pub String);

impl From<&str> for ClassTag {
    fn from(name: &str) -> Self {
        ClassTag(name.to_owned())
    }
}

/// A position in the value graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Reference to a heap node.
    Ref(NodeId),
}

impl Value {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Ref(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(SymbolId),
}

impl PropertyKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.to_owned())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s)
    }
}

impl From<SymbolId> for PropertyKey {
    fn from(id: SymbolId) -> Self {
        PropertyKey::Symbol(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDescriptor {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<FnHandle>,
        set: Option<FnHandle>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyDescriptor {
    /// A writable, enumerable, configurable data property, as created by
    /// plain assignment.
    pub fn data(value: Value) -> Self {
        PropertyDescriptor::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { enumerable, .. }
            | PropertyDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    /// The stored value of a data property; `None` for accessors.
    pub fn value(&self) -> Option<&Value> {
        match self {
            PropertyDescriptor::Data { value, .. } => Some(value),
            PropertyDescriptor::Accessor { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub descriptor: PropertyDescriptor,
}

/// Own properties of an object, in definition order, plus its class tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pub class: Option<ClassTag>,
    pub properties: Vec<Property>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class: Option<ClassTag>) -> Self {
        Self {
            class,
            properties: Vec::new(),
        }
    }

    pub fn property(&self, key: &PropertyKey) -> Option<&Property> {
        self.properties.iter().find(|p| &p.key == key)
    }

    /// Value of the data property `key`, ignoring accessors and symbol keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key.as_str() == Some(key))
            .and_then(|p| p.descriptor.value())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.iter().any(|p| p.key.as_str() == Some(key))
    }

    /// Assignment semantics: overwrite the value of an existing writable data
    /// property, or append a fresh enumerable one. Returns `false` when the
    /// existing property is read-only or an accessor.
    pub fn set(&mut self, key: impl Into<PropertyKey>, value: Value) -> bool {
        let key = key.into();
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(Property {
                descriptor:
                    PropertyDescriptor::Data {
                        value: slot,
                        writable: true,
                        ..
                    },
                ..
            }) => {
                *slot = value;
                true
            }
            Some(_) => false,
            None => {
                self.properties.push(Property {
                    key,
                    descriptor: PropertyDescriptor::data(value),
                });
                true
            }
        }
    }

    /// Replace or append a property with an explicit descriptor.
    pub fn define(&mut self, key: impl Into<PropertyKey>, descriptor: PropertyDescriptor) {
        let key = key.into();
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.descriptor = descriptor,
            None => self.properties.push(Property { key, descriptor }),
        }
    }

    /// Enumerable, string-keyed data properties: the ones a JSON writer sees.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().filter_map(|p| match (&p.key, &p.descriptor) {
            (
                PropertyKey::String(k),
                PropertyDescriptor::Data {
                    value,
                    enumerable: true,
                    ..
                },
            ) => Some((k.as_str(), value)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Array(Vec<Value>),
    Object(Object),
}

/// Arena owning every heap node of a value graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    symbols: Vec<Option<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was not allocated by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not allocated by this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn date(&mut self, epoch_ms: i64) -> Value {
        Value::Ref(self.alloc(Node::Date(epoch_ms)))
    }

    pub fn array(&mut self, items: impl IntoIterator<Item = Value>) -> Value {
        Value::Ref(self.alloc(Node::Array(items.into_iter().collect())))
    }

    /// Allocate a plain object with the given data properties.
    pub fn object<K: Into<PropertyKey>>(
        &mut self,
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Value {
        self.object_with_class(None, entries)
    }

    pub fn object_with_class<K: Into<PropertyKey>>(
        &mut self,
        class: Option<ClassTag>,
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Value {
        let mut object = Object::with_class(class);
        for (key, value) in entries {
            object.set(key, value);
        }
        Value::Ref(self.alloc(Node::Object(object)))
    }

    pub fn symbol(&mut self, description: Option<&str>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(description.map(str::to_owned));
        id
    }

    pub fn symbol_description(&self, id: SymbolId) -> Option<&str> {
        self.symbols.get(id.0 as usize).and_then(|d| d.as_deref())
    }

    pub fn as_object(&self, value: &Value) -> Option<&Object> {
        match self.get_node(value.as_node()?)? {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self, value: &Value) -> Option<&mut Object> {
        let id = value.as_node()?;
        match self.nodes.get_mut(id.index())? {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self, value: &Value) -> Option<&[Value]> {
        match self.get_node(value.as_node()?)? {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn date_value(&self, value: &Value) -> Option<i64> {
        match self.get_node(value.as_node()?)? {
            Node::Date(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Data property `key` of the object at `target`.
    pub fn get(&self, target: &Value, key: &str) -> Option<&Value> {
        self.as_object(target)?.get(key)
    }

    /// Assign `target[key] = value`. Returns `false` when `target` is not an
    /// object or the property cannot be written.
    pub fn set(&mut self, target: &Value, key: impl Into<PropertyKey>, value: Value) -> bool {
        match self.as_object_mut(target) {
            Some(object) => object.set(key, value),
            None => false,
        }
    }

    pub fn define_property(
        &mut self,
        target: &Value,
        key: impl Into<PropertyKey>,
        descriptor: PropertyDescriptor,
    ) -> bool {
        match self.as_object_mut(target) {
            Some(object) => {
                object.define(key, descriptor);
                true
            }
            None => false,
        }
    }

    /// Append to the array at `target`. Returns `false` when it is not an array.
    pub fn push(&mut self, target: &Value, value: Value) -> bool {
        let Some(id) = target.as_node() else {
            return false;
        };
        match self.nodes.get_mut(id.index()) {
            Some(Node::Array(items)) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Import a plain JSON value. Every object and array becomes a fresh node;
    /// strings are kept as strings (no date detection).
    pub fn import_json(&mut self, json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => {
                let items: Vec<Value> = items.iter().map(|item| self.import_json(item)).collect();
                self.array(items)
            }
            Json::Object(map) => {
                let mut object = Object::new();
                for (key, val) in map {
                    let val = self.import_json(val);
                    object.set(key.as_str(), val);
                }
                Value::Ref(self.alloc(Node::Object(object)))
            }
        }
    }
}

/// A graph together with its root value.
#[derive(Debug, Clone)]
pub struct Document {
    pub graph: Graph,
    pub root: Value,
}

impl Document {
    pub fn new(graph: Graph, root: Value) -> Self {
        Self { graph, root }
    }

    pub fn from_json(json: &Json) -> Self {
        let mut graph = Graph::new();
        let root = graph.import_json(json);
        Self { graph, root }
    }

    /// Top-level data property `key`, when the root is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.graph.get(&self.root, key)
    }
}
