//! plan-share-codec - text and compression codecs for plan state.
//!
//! - [`structured`] turns a value graph into JSON text and back, tagging dates
//!   and cutting cycles with a marker string.
//! - [`compress`] shrinks text into a URL-safe token and expands it exactly.
//!
//! # Example
//!
//! ```
//! use plan_share_codec::{compress, decompress, structured};
//! use plan_share_util::graph::{Graph, Value};
//!
//! let mut graph = Graph::new();
//! let plan = graph.object([("name", Value::from("Plan A"))]);
//!
//! let token = compress(&structured::encode(&graph, &plan).unwrap());
//! let doc = structured::decode(&decompress(&token).unwrap()).unwrap();
//! assert_eq!(doc.get("name"), Some(&Value::from("Plan A")));
//! ```

pub mod compress;
pub mod error;
pub mod structured;

pub use compress::{compress, decompress, try_compress, MAX_DECOMPRESSED_LEN};
pub use error::{CompressError, DecodeError, DecompressError, EncodeError};
pub use structured::{decode, encode, CIRCULAR_MARKER, MAX_DEPTH};
