//! JSON body decoding that reports the failing field.

use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// Like `axum::Json`, but every decoding failure is a plain 400
/// carrying the path of the offending field.
///
/// The content type is not checked.
pub(crate) struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        decode_json(&bytes).map(Self)
    }
}

/// Decode a JSON document, rejecting trailing content.
///
/// Handlers that must answer 404 before 400 take the raw bytes and call
/// this once the booking is known to exist.
pub(crate) fn decode_json<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| ApiError::bad_request(format!("{}: {}", err.path(), err.inner())))?;
    deserializer
        .end()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    Ok(value)
}
