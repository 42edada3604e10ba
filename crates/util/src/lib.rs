//! plan-share-util - value graph model and graph utilities.
//!
//! The value graph is an arena of dates, arrays and objects addressed by
//! [`graph::NodeId`]. On top of it this crate provides identity-preserving
//! deep cloning and deep equality.

pub mod graph;
pub mod json_clone;
pub mod json_equal;

// Re-exports for convenience
pub use graph::{
    ClassTag, Document, FnHandle, Graph, Node, NodeId, Object, Property, PropertyDescriptor,
    PropertyKey, SymbolId, Value,
};
pub use json_clone::{clone, clone_into};
pub use json_equal::{deep_equal, same_shape};
