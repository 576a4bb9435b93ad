use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

/// Every failure answer of the API.
///
/// Bodies are the bare reason phrase, like restful-booker.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub(crate) enum ApiError {
    #[display("Forbidden")]
    Forbidden,

    #[display("Not Found")]
    NotFound,

    #[display("Bad Request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        debug!(%status, reason = %self, "request rejected");
        let body = status.canonical_reason().unwrap_or_default();

        (status, body).into_response()
    }
}
