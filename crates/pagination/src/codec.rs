//! Cursor values and the codecs that turn them into opaque tokens.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::CursorDecodeError;

/// Type of the column backing a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Int,
    Text,
}

/// Decoded position in a cursor column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CursorValue {
    Int(i64),
    Text(String),
}

impl CursorValue {
    pub const fn kind(&self) -> CursorKind {
        match self {
            Self::Int(_) => CursorKind::Int,
            Self::Text(_) => CursorKind::Text,
        }
    }

    /// Parses the plain textual form of a value for a column of type `kind`.
    pub fn parse(raw: &str, kind: CursorKind) -> Result<Self, CursorDecodeError> {
        if raw.is_empty() {
            return Err(CursorDecodeError::Empty);
        }
        match kind {
            CursorKind::Int => raw
                .parse()
                .map(Self::Int)
                .map_err(|_| CursorDecodeError::NotAnInteger(raw.to_owned())),
            CursorKind::Text => Ok(Self::Text(raw.to_owned())),
        }
    }
}

impl fmt::Display for CursorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for CursorValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for CursorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CursorValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Encodes cursor values into tokens (`getCursor`) and back (`parseCursor`).
///
/// `decode(encode(v), v.kind()) == Ok(v)` must hold for every value.
pub trait CursorCodec: Send + Sync {
    fn encode(&self, value: &CursorValue) -> String;

    fn decode(&self, cursor: &str, kind: CursorKind) -> Result<CursorValue, CursorDecodeError>;

    fn name(&self) -> &'static str;
}

/// Uses the column value's text as the cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCursor;

impl CursorCodec for PlainCursor {
    fn encode(&self, value: &CursorValue) -> String {
        value.to_string()
    }

    fn decode(&self, cursor: &str, kind: CursorKind) -> Result<CursorValue, CursorDecodeError> {
        CursorValue::parse(cursor, kind)
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// URL-safe base64 (no padding) over the plain form, so cursors stay opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Cursor;

impl CursorCodec for Base64Cursor {
    fn encode(&self, value: &CursorValue) -> String {
        URL_SAFE_NO_PAD.encode(value.to_string())
    }

    fn decode(&self, cursor: &str, kind: CursorKind) -> Result<CursorValue, CursorDecodeError> {
        let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| CursorDecodeError::Encoding)?;
        let raw = String::from_utf8(bytes).map_err(|_| CursorDecodeError::Utf8)?;
        CursorValue::parse(&raw, kind)
    }

    fn name(&self) -> &'static str {
        "base64"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_round_trip() {
        let codec = PlainCursor;
        for value in [CursorValue::Int(42), CursorValue::Int(-7), CursorValue::from("a@b.c")] {
            let token = codec.encode(&value);
            assert_eq!(codec.decode(&token, value.kind()).unwrap(), value);
        }
    }

    #[test]
    fn test_base64_round_trip_is_opaque() {
        let codec = Base64Cursor;
        let value = CursorValue::Int(1024);
        let token = codec.encode(&value);
        assert_ne!(token, "1024");
        assert_eq!(codec.decode(&token, CursorKind::Int).unwrap(), value);
    }

    #[test]
    fn test_plain_rejects_non_integer_for_int_column() {
        let err = PlainCursor.decode("abc", CursorKind::Int).unwrap_err();
        assert_eq!(err, CursorDecodeError::NotAnInteger("abc".to_owned()));
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert_eq!(
            Base64Cursor.decode("!!not-base64!!", CursorKind::Int).unwrap_err(),
            CursorDecodeError::Encoding
        );
        // valid base64 of bytes 0xff 0xfe
        assert_eq!(Base64Cursor.decode("__4", CursorKind::Text).unwrap_err(), CursorDecodeError::Utf8);
    }

    #[test]
    fn test_empty_cursor_is_rejected() {
        assert_eq!(PlainCursor.decode("", CursorKind::Text).unwrap_err(), CursorDecodeError::Empty);
    }
}
