use thiserror::Error;

/// Failure to turn a value graph into text.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot serialize undefined at the root")]
    Undefined,
    #[error("date {0} ms is outside the four-digit-year ISO-8601 range")]
    DateOutOfRange(i64),
    /// Enumerable accessors would have to be invoked to be serialized.
    #[error("accessor property {0:?} cannot be serialized")]
    AccessorProperty(String),
    /// Deeper documents could not be parsed back.
    #[error("value nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("node {0} does not belong to the graph")]
    UnknownNode(usize),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to turn text back into a value graph.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to produce a token that can be expanded again.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("text of {len} bytes exceeds the {limit}-byte compression limit")]
    TooLarge { len: usize, limit: usize },
}

/// Failure to expand a compressed token.
#[derive(Debug, Error)]
pub enum DecompressError {
    #[error("invalid base64url payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("compressed frame is truncated")]
    Truncated,
    #[error("unknown compressed frame version {0}")]
    UnknownVersion(u8),
    #[error("declared length {len} exceeds the decompression limit")]
    TooLarge { len: usize },
    #[error("lz4 decompression failed: {0}")]
    Lz4(#[from] lz4_flex::block::DecompressError),
    #[error("decompressed {actual} bytes, frame declared {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("decompressed payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
