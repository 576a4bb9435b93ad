use std::time::Duration;

use http::{Method, StatusCode};

use super::status::ExpectedStatusCodes;

/// Errors that can occur when using the [`RestClient`](super::RestClient).
///
/// Every variant is scoped to one call: none of them leaves the client in a
/// state that could affect the next request, since the request state is
/// reset before the error is returned.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// Network level failure from the underlying reqwest library.
    ///
    /// Connection refused, timeouts, broken connections. Never retried.
    #[display("Transport error: {_0}")]
    TransportError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    HttpError(http::Error),

    /// Invalid HTTP header value.
    ///
    /// Occurs when a token or body content type contains characters that
    /// cannot be carried by an HTTP header.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// Invalid base URL configuration.
    #[display("Invalid base URL: {error}")]
    #[from(skip)]
    InvalidBaseUrl {
        /// Description of why the base URL is invalid.
        error: String,
    },

    /// The caller misused the builder, detected before any network call.
    #[display("Invalid argument: {message}")]
    #[from(skip)]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// Path template contains unresolved parameters.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// Server returned a status other than the expected one.
    #[display("{method} {url}: expected status {expected}, got {actual}: {body}")]
    #[from(skip)]
    UnexpectedStatus {
        /// The HTTP method of the call.
        method: Method,
        /// The resolved URL of the call.
        url: String,
        /// The expected status codes.
        expected: ExpectedStatusCodes,
        /// The status code actually returned.
        actual: StatusCode,
        /// The response body, truncated, for diagnosis.
        body: String,
    },

    /// The response body could not be decoded into the requested type.
    #[display("Failed to decode JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    DecodeError {
        /// JSON path of the value that failed to decode.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
        /// The raw response body.
        body: String,
    },

    /// The server answered, but slower than the configured budget.
    #[display("{method} {url} answered {status} after {elapsed:?}, exceeding the {limit:?} budget")]
    #[from(skip)]
    SlowResponse {
        /// The HTTP method of the call.
        method: Method,
        /// The resolved URL of the call.
        url: String,
        /// The status code the server sent.
        status: StatusCode,
        /// Measured round-trip time.
        elapsed: Duration,
        /// Configured maximum response time.
        limit: Duration,
    },
}

impl ApiClientError {
    /// Returns the status code the server answered with, when it answered.
    ///
    /// Set for [`ApiClientError::UnexpectedStatus`] and
    /// [`ApiClientError::SlowResponse`].
    pub fn actual_status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            Self::SlowResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ApiClientError>();
        assert_sync::<ApiClientError>();
    }

    #[test]
    fn should_display_unexpected_status_with_both_codes() {
        let error = ApiClientError::UnexpectedStatus {
            method: Method::DELETE,
            url: "http://127.0.0.1:8080/booking/1".to_string(),
            expected: ExpectedStatusCodes::from_status_code(StatusCode::CREATED),
            actual: StatusCode::FORBIDDEN,
            body: "Forbidden".to_string(),
        };

        insta::assert_snapshot!(error, @"DELETE http://127.0.0.1:8080/booking/1: expected status 201, got 403 Forbidden: Forbidden");
        assert_eq!(error.actual_status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn should_keep_status_of_slow_response() {
        let error = ApiClientError::SlowResponse {
            method: Method::DELETE,
            url: "http://127.0.0.1:8080/booking/1".to_string(),
            status: StatusCode::CREATED,
            elapsed: Duration::from_millis(150),
            limit: Duration::from_millis(50),
        };

        insta::assert_snapshot!(error, @"DELETE http://127.0.0.1:8080/booking/1 answered 201 Created after 150ms, exceeding the 50ms budget");
        assert_eq!(error.actual_status(), Some(StatusCode::CREATED));
    }
}
