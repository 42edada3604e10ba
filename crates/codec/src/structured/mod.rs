//! Structured serializer: value graph ⇄ JSON text.
//!
//! Encoding tags every date as `{"__type":"Date","value":"<ISO-8601>"}` and
//! replaces every node met a second time during the same walk with the
//! literal string `"[Circular]"`. Decoding turns tagged records back into
//! dates, and also turns any plain string of the exact shape
//! `YYYY-MM-DDTHH:mm:ss.sssZ` into a date. Cycles are not reconnected.

mod decode;
mod encode;
pub mod iso;

pub use decode::{decode, decode_value};
pub use encode::{encode, encode_value};
pub use iso::{format_iso, is_iso_shaped, parse_iso};

/// Deepest array/object nesting `encode` writes. `serde_json` refuses to
/// parse anything deeper.
pub const MAX_DEPTH: usize = 127;
/// Emitted in place of a node that was already written during this walk.
pub const CIRCULAR_MARKER: &str = "[Circular]";
/// Field carrying the type tag of a tagged record.
pub const DATE_TAG_FIELD: &str = "__type";
pub const DATE_TAG: &str = "Date";
/// Field carrying the ISO-8601 text of a tagged date.
pub const DATE_VALUE_FIELD: &str = "value";
