use headers::ContentType;
use serde::Serialize;

use super::ApiClientError;

/// A request payload with its content type.
///
/// The data is not shown in debug output: payloads can carry credentials.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(super) content_type: ContentType,
    #[debug(ignore)]
    pub(super) data: Vec<u8>,
}

impl CallBody {
    /// Serializes a value as a JSON payload.
    ///
    /// # Errors
    ///
    /// A value that serializes to JSON `null` is rejected with
    /// [`ApiClientError::InvalidArgument`], as is a value serde cannot encode.
    pub fn json<T>(t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(t).map_err(|err| ApiClientError::InvalidArgument {
            message: format!("body cannot be serialized: {err}"),
        })?;
        if value.is_null() {
            return Err(ApiClientError::InvalidArgument {
                message: "JSON body must not be null".to_string(),
            });
        }
        let data = serde_json::to_vec(&value).map_err(|err| ApiClientError::InvalidArgument {
            message: format!("body cannot be serialized: {err}"),
        })?;

        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Wraps an already encoded JSON document.
    ///
    /// The text is sent untouched so that malformed payloads can reach the
    /// server.
    pub fn raw_json(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::json(),
            data: text.into().into_bytes(),
        }
    }

    /// Wraps arbitrary bytes with an explicit content type.
    pub fn raw(data: Vec<u8>, content_type: ContentType) -> Self {
        Self { content_type, data }
    }

    /// Returns the encoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
