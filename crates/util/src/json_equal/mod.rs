//! Equality of value graphs.
//!
//! [`deep_equal`] compares structure only; [`same_shape`] additionally
//! requires the two graphs to alias nodes the same way.

mod deep_equal;

pub use deep_equal::{deep_equal, same_shape};
