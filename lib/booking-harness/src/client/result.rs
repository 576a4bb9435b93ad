use std::any::type_name;
use std::time::Duration;

use headers::{ContentType, Header};
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use reqwest::Response;
use serde::de::DeserializeOwned;

use super::ApiClientError;

const BODY_MAX_LENGTH: usize = 1024;

/// The outcome of one executed call.
///
/// Holds everything read from the response, so it can be inspected several
/// times and sent across tasks.
#[derive(Debug, Clone)]
pub struct CallResult {
    method: Method,
    url: String,
    status: StatusCode,
    content_type: Option<ContentType>,
    body: RawBody,
    elapsed: Duration,
}

/// The body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBody {
    /// Text content, including JSON.
    Text(String),
    /// Binary content.
    Binary(Vec<u8>),
    /// No content.
    Empty,
}

impl RawBody {
    /// Returns the body as text, lossily decoding binary content.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Empty => String::new(),
        }
    }

    pub(super) fn truncated(&self) -> String {
        let text = self.to_text();
        if text.len() > BODY_MAX_LENGTH {
            let mut end = BODY_MAX_LENGTH;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &text[..end])
        } else {
            text
        }
    }
}

impl CallResult {
    pub(super) async fn read(
        method: Method,
        response: Response,
        elapsed: Duration,
    ) -> Result<Self, ApiClientError> {
        let url = response.url().to_string();
        let status = response.status();
        let content_type = extract_content_type(&response)?;
        let body = read_body(response, content_type.as_ref(), status).await?;

        Ok(Self {
            method,
            url,
            status,
            content_type,
            body,
            elapsed,
        })
    }

    /// The HTTP method of the call.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The resolved URL, query included.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response content type, if any.
    pub fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    /// Round-trip time from send to fully read body.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::DecodeError`] with the JSON path of the
    /// offending value and the raw body when decoding fails.
    pub fn as_json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let json = self.body.to_text();
        let deserializer = &mut serde_json::Deserializer::from_str(&json);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = err.path().to_string();
            tracing::error!(%path, expected_type = type_name::<T>(), "failed to decode response");
            ApiClientError::DecodeError {
                path,
                error: err.into_inner(),
                body: self.body.truncated(),
            }
        })
    }

    /// Returns the body as text.
    pub fn as_text(&self) -> String {
        self.body.to_text()
    }

    /// Returns the raw body.
    pub fn as_raw(&self) -> &RawBody {
        &self.body
    }

    /// Checks that the response carried no content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::DecodeError`] if a body is present.
    pub fn as_empty(&self) -> Result<(), ApiClientError> {
        match &self.body {
            RawBody::Empty => Ok(()),
            other => Err(ApiClientError::DecodeError {
                path: ".".to_string(),
                error: <serde_json::Error as serde::de::Error>::custom("expected an empty body"),
                body: other.truncated(),
            }),
        }
    }
}

fn extract_content_type(response: &Response) -> Result<Option<ContentType>, ApiClientError> {
    let values = response.headers().get_all(CONTENT_TYPE).iter().collect::<Vec<_>>();
    if values.is_empty() {
        return Ok(None);
    }
    ContentType::decode(&mut values.into_iter())
        .map(Some)
        .map_err(|err| ApiClientError::InvalidArgument {
            message: format!("invalid response content type: {err}"),
        })
}

async fn read_body(
    response: Response,
    content_type: Option<&ContentType>,
    status: StatusCode,
) -> Result<RawBody, ApiClientError> {
    if status == StatusCode::NO_CONTENT {
        return Ok(RawBody::Empty);
    }
    let is_binary = content_type.is_some_and(|ct| *ct == ContentType::octet_stream());
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        Ok(RawBody::Empty)
    } else if is_binary {
        Ok(RawBody::Binary(bytes.to_vec()))
    } else {
        Ok(RawBody::Text(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Dates {
        checkin: String,
        checkout: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Booking {
        firstname: String,
        totalprice: i32,
        bookingdates: Dates,
    }

    fn result_with(body: RawBody) -> CallResult {
        CallResult {
            method: Method::GET,
            url: "http://127.0.0.1/booking/1".to_string(),
            status: StatusCode::OK,
            content_type: Some(ContentType::json()),
            body,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn should_decode_json_body() {
        let result = result_with(RawBody::Text(
            r#"{"firstname":"Jim","totalprice":111,"bookingdates":{"checkin":"2024-01-01","checkout":"2024-01-10"}}"#
                .to_string(),
        ));

        let booking: Booking = result.as_json().expect("decoded");

        assert_eq!(booking.firstname, "Jim");
        assert_eq!(booking.totalprice, 111);
        assert_eq!(booking.bookingdates.checkout, "2024-01-10");
    }

    #[test]
    fn should_report_path_of_decode_failure() {
        let result = result_with(RawBody::Text(
            r#"{"firstname":"Jim","totalprice":111,"bookingdates":{"checkin":1,"checkout":"2024-01-10"}}"#
                .to_string(),
        ));

        let error = result.as_json::<Booking>().expect_err("should fail");

        match error {
            ApiClientError::DecodeError { path, body, .. } => {
                assert_eq!(path, "bookingdates.checkin");
                assert!(body.contains("\"checkin\":1"));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn should_accept_empty_body() {
        assert!(result_with(RawBody::Empty).as_empty().is_ok());
        assert!(result_with(RawBody::Text("Created".to_string())).as_empty().is_err());
    }

    #[test]
    fn should_truncate_long_bodies() {
        let body = RawBody::Text("x".repeat(BODY_MAX_LENGTH + 10));

        let truncated = body.truncated();

        assert!(truncated.ends_with("... (truncated)"));
        assert_eq!(truncated.len(), BODY_MAX_LENGTH + "... (truncated)".len());
    }
}
