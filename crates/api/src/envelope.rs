//! Response body decoding.
//!
//! Endpoints differ in how they wrap payloads: a bare document, `{data: ...}`,
//! or `{message, order}`-style objects. Decoding tries the body as-is, then
//! `data`, then each remaining field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ApiError;

/// Decode `T` from a response body, unwrapping common envelopes.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] with the error from decoding the unwrapped
/// body when no candidate fits.
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let first_err = match T::deserialize(&body) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let Value::Object(map) = body else {
        return Err(first_err.into());
    };

    if let Some(data) = map.get("data")
        && let Ok(value) = T::deserialize(data)
    {
        return Ok(value);
    }

    map.iter()
        .filter(|(key, value)| key.as_str() != "data" && (value.is_object() || value.is_array()))
        .find_map(|(_, value)| T::deserialize(value).ok())
        .ok_or_else(|| first_err.into())
}

/// Decode a list, treating `null` or an empty body as empty.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ApiError> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    decode(body)
}
