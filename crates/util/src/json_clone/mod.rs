//! Identity-preserving deep cloning of value graphs.
//!
//! The clone walks the graph once with a map from source node to copy, so
//! shared references stay shared and cycles terminate.

mod clone;

pub use clone::{clone, clone_into};
