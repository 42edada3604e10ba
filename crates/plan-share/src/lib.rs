//! plan-share - shareable and persistent relocation plan state.
//!
//! The whole application state travels as one token: the structured
//! serializer turns the value graph into JSON text (dates tagged, cycles cut),
//! and the compression codec turns that into a URL-safe string. The same
//! pipeline persists the state into a key-value store, compressed or not.
//!
//! - [`share`]: URL tokens and share links
//! - [`store`]: persistence over a [`storage::KeyValueStore`]
//! - [`migrate`]: repairs for snapshots written by older versions
//! - [`cli`]: logic behind the `plan-share` binary

pub mod cli;
pub mod config;
pub mod error;
pub mod migrate;
pub mod share;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, ShareError, StorageError, StoreError};
pub use share::{
    from_shareable_token, share_url, state_from_url, to_shareable_token, token_from_query,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::PlanStore;
