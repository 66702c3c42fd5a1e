use serde_json::{Map, Value};

use crate::error::{DecodeError, Error, Result};
use crate::io::Source;

use super::index::Index;

/// Fetch the stored bytes of `path`, or `None` if the index has no such entry.
///
/// # Arguments
///
/// * `index` - Index built from the same bundle as `source`
/// * `path` - Exact member path
/// * `source` - The bundle bytes
///
/// # Errors
///
/// Returns [`Error::TooLarge`] if the member does not fit in memory, and the
/// source's error if the read fails.
pub async fn read_bytes<S: Source + ?Sized>(
    index: &Index,
    path: &str,
    source: &S,
) -> Result<Option<Vec<u8>>> {
    let Some(entry) = index.get(path) else {
        return Ok(None);
    };

    let length =
        usize::try_from(entry.stored_size).map_err(|_| Error::TooLarge(entry.stored_size))?;
    let data = source.get_bytes(entry.data_offset, length).await?;

    Ok(Some(data))
}

/// Read `path` as UTF-8 JSON.
///
/// A path missing from the index reads as an empty object, so optional
/// metadata files need no special casing by callers.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not UTF-8 or not JSON, otherwise
/// the errors of [`read_bytes`].
pub async fn read_json<S: Source + ?Sized>(index: &Index, path: &str, source: &S) -> Result<Value> {
    match read_bytes(index, path, source).await? {
        Some(data) => Ok(decode_json(&data)?),
        None => Ok(Value::Object(Map::new())),
    }
}

/// Decode entry bytes as UTF-8 text and parse them as JSON.
pub fn decode_json(data: &[u8]) -> std::result::Result<Value, DecodeError> {
    let text = std::str::from_utf8(data)?;
    Ok(serde_json::from_str(text)?)
}
