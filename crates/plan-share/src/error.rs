use plan_share_codec::{CompressError, DecodeError, DecompressError, EncodeError};
use thiserror::Error;

/// Failure of the key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded writing {key:?}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to produce a shareable token.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("cannot encode plan: {0}")]
    Encode(#[from] EncodeError),
    #[error("cannot compress plan: {0}")]
    Compress(#[from] CompressError),
}

/// Everything that can go wrong inside the persistence store. Never escapes
/// [`crate::store::PlanStore`]'s public operations, which log it instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Compress(#[from] CompressError),
    #[error(transparent)]
    Decompress(#[from] DecompressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read store config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid store config: {0}")]
    Toml(#[from] toml::de::Error),
}
