//! URL-safe compression codec.
//!
//! A compressed token is the base64url (no padding) encoding of a small frame:
//!
//! | Offset | Size | Contents                            |
//! |--------|------|-------------------------------------|
//! | 0      | 1    | frame version, currently `1`        |
//! | 1      | 4    | uncompressed length, little endian  |
//! | 5      | ..   | LZ4 block (absent for empty input)  |
//!
//! The token alphabet is `[A-Za-z0-9_-]`, which needs no escaping inside a URL
//! query value or a storage value.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{CompressError, DecompressError};

pub const FRAME_VERSION: u8 = 1;
const HEADER_LEN: usize = 5;

/// Upper bound on the declared uncompressed length accepted by [`decompress`].
pub const MAX_DECOMPRESSED_LEN: usize = 64 * 1024 * 1024;

/// Compresses `text` into a URL-safe token. Total and deterministic.
///
/// Texts longer than [`MAX_DECOMPRESSED_LEN`] bytes produce a token that
/// [`decompress`] refuses; use [`try_compress`] when the token has to be read
/// back.
///
/// # Example
///
/// ```
/// use plan_share_codec::compress::{compress, decompress};
///
/// let token = compress("héllo wörld, héllo wörld");
/// assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
/// assert_eq!(decompress(&token).unwrap(), "héllo wörld, héllo wörld");
/// ```
pub fn compress(text: &str) -> String {
    let bytes = text.as_bytes();
    let block = if bytes.is_empty() {
        Vec::new()
    } else {
        lz4_flex::block::compress(bytes)
    };
    let mut frame = Vec::with_capacity(HEADER_LEN + block.len());
    frame.push(FRAME_VERSION);
    // Saturates, so an oversized length is rejected on the way back in.
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&block);
    URL_SAFE_NO_PAD.encode(frame)
}

/// Like [`compress`], but refuses text that [`decompress`] would not expand.
pub fn try_compress(text: &str) -> Result<String, CompressError> {
    if text.len() > MAX_DECOMPRESSED_LEN {
        return Err(CompressError::TooLarge {
            len: text.len(),
            limit: MAX_DECOMPRESSED_LEN,
        });
    }
    Ok(compress(text))
}

/// Expands a token produced by [`compress`].
///
/// Anything else fails with a [`DecompressError`] rather than panicking.
pub fn decompress(token: &str) -> Result<String, DecompressError> {
    let frame = URL_SAFE_NO_PAD.decode(token)?;
    if frame.len() < HEADER_LEN {
        return Err(DecompressError::Truncated);
    }
    if frame[0] != FRAME_VERSION {
        return Err(DecompressError::UnknownVersion(frame[0]));
    }
    let len = u32::from_le_bytes([frame[1], frame[2], frame[3], frame[4]]) as usize;
    if len > MAX_DECOMPRESSED_LEN {
        return Err(DecompressError::TooLarge { len });
    }
    let block = &frame[HEADER_LEN..];
    if len == 0 {
        if !block.is_empty() {
            return Err(DecompressError::LengthMismatch {
                expected: 0,
                actual: block.len(),
            });
        }
        return Ok(String::new());
    }
    let bytes = lz4_flex::block::decompress(block, len)?;
    if bytes.len() != len {
        return Err(DecompressError::LengthMismatch {
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        let token = compress("");
        assert_eq!(token, "AQAAAAA");
        assert_eq!(decompress(&token).unwrap(), "");
    }

    #[test]
    fn test_deterministic() {
        let text = r#"{"name":"Plan A","scenarios":[]}"#;
        assert_eq!(compress(text), compress(text));
    }

    #[test]
    fn test_repetitive_input_shrinks() {
        let text = "scenario ".repeat(500);
        let token = compress(&text);
        assert!(token.len() < text.len() / 4);
        assert_eq!(decompress(&token).unwrap(), text);
    }

    #[test]
    fn test_non_ascii() {
        for text in ["日本語テキスト", "emoji 🏡✈️ and surrogates 𝄞", "ünïcödé"] {
            assert_eq!(decompress(&compress(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_not_a_token() {
        assert!(matches!(
            decompress("not-a-real-compressed-string"),
            Err(DecompressError::UnknownVersion(_))
        ));
    }

    #[test]
    fn test_invalid_alphabet() {
        assert!(matches!(
            decompress("has spaces and +/="),
            Err(DecompressError::Base64(_))
        ));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(decompress(""), Err(DecompressError::Truncated)));
        assert!(matches!(decompress("AQA"), Err(DecompressError::Truncated)));
    }

    #[test]
    fn test_declared_length_limit() {
        let mut frame = vec![FRAME_VERSION];
        frame.extend_from_slice(&u32::MAX.to_le_bytes());
        frame.push(0);
        let token = URL_SAFE_NO_PAD.encode(frame);
        assert!(matches!(
            decompress(&token),
            Err(DecompressError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_try_compress_limit() {
        let text = "a".repeat(MAX_DECOMPRESSED_LEN);
        assert_eq!(decompress(&try_compress(&text).unwrap()).unwrap().len(), text.len());

        let text = "a".repeat(MAX_DECOMPRESSED_LEN + 1);
        assert!(matches!(
            try_compress(&text),
            Err(CompressError::TooLarge { len, limit: MAX_DECOMPRESSED_LEN })
                if len == MAX_DECOMPRESSED_LEN + 1
        ));
        // The unchecked form still produces a frame, which is then refused.
        assert!(matches!(
            decompress(&compress(&text)),
            Err(DecompressError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_corrupted_block() {
        let token = compress(&"abcdefgh".repeat(20));
        let mut frame = URL_SAFE_NO_PAD.decode(&token).unwrap();
        frame.truncate(frame.len() - 3);
        let token = URL_SAFE_NO_PAD.encode(frame);
        assert!(decompress(&token).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [0xff, 0xfe, 0xfd];
        let mut frame = vec![FRAME_VERSION];
        frame.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        frame.extend_from_slice(&lz4_flex::block::compress(&bytes));
        let token = URL_SAFE_NO_PAD.encode(frame);
        assert!(matches!(decompress(&token), Err(DecompressError::Utf8(_))));
    }
}
