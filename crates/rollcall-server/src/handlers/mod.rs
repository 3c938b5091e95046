pub mod attendance;
pub mod enroll;
pub mod export;
pub mod health;
pub mod identify;
pub mod sensor;
pub mod users;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Deserialise a JSON request body; an empty body yields `T::default()`.
///
/// Clients are not required to send a `Content-Type` header.
pub(crate) fn parse_body<T>(body: &Bytes) -> Result<T, ApiError>
where
  T: DeserializeOwned + Default,
{
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(T::default());
  }
  serde_json::from_slice(body)
    .map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))
}

/// Parse a `{user_id}` path segment.
pub(crate) fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::Validation("user_id must be an integer".to_string()))
}
