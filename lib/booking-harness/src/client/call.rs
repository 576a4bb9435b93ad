use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::time::{Duration, Instant};

use headers::HeaderMapExt;
use http::{Method, StatusCode, Uri};
use reqwest::{Body, Request};
use tracing::{debug, warn};
use url::Url;

use super::path::PathResolved;
use super::state::{CallQuery, RequestParts};
use super::{
    ApiClientError, CallBody, CallPath, CallResult, ExpectedStatusCodes, SecureString,
    TokenTransport,
};

/// A single pending call, built by [`RestClient`](super::RestClient).
///
/// The call owns the request state it was built from, so the client is
/// already clean once the call exists. Awaiting it sends the request and
/// checks the status.
///
/// ```rust,no_run
/// # async fn example(client: &mut booking_harness::RestClient) -> Result<(), booking_harness::ApiClientError> {
/// use http::StatusCode;
///
/// let result = client
///     .with_path_param("id", 2_147_483_647)
///     .get("/booking/{id}")
///     .expect_status(StatusCode::NOT_FOUND)
///     .await?;
/// assert_eq!(result.status(), StatusCode::NOT_FOUND);
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
#[must_use = "a call does nothing until awaited"]
pub struct ApiCall {
    #[debug(ignore)]
    client: reqwest::Client,
    base_uri: Uri,
    method: Method,
    parts: RequestParts,
    token_transport: TokenTransport,
    expected_status_codes: ExpectedStatusCodes,
    max_response_time: Option<Duration>,
}

impl ApiCall {
    pub(super) fn build(
        client: reqwest::Client,
        base_uri: Uri,
        method: Method,
        parts: RequestParts,
        token_transport: TokenTransport,
        max_response_time: Option<Duration>,
    ) -> Self {
        let expected_status_codes = ExpectedStatusCodes::from_status_code(default_status(&method));
        Self {
            client,
            base_uri,
            method,
            parts,
            token_transport,
            expected_status_codes,
            max_response_time,
        }
    }

    /// Expects exactly this status code.
    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status_codes = ExpectedStatusCodes::from_status_code(status);
        self
    }

    /// Expects any status in the set.
    pub fn expect_statuses(mut self, statuses: ExpectedStatusCodes) -> Self {
        self.expected_status_codes = statuses;
        self
    }

    /// Disables the status check.
    pub fn expect_any_status(self) -> Self {
        self.expect_statuses(ExpectedStatusCodes::any())
    }

    /// Disables the response time budget for this call.
    pub fn without_time_limit(mut self) -> Self {
        self.max_response_time = None;
        self
    }

    async fn exchange(self) -> Result<CallResult, ApiClientError> {
        let Self {
            client,
            base_uri,
            method,
            parts,
            token_transport,
            expected_status_codes,
            max_response_time,
        } = self;

        let url = Self::build_url(&base_uri, parts.path, &parts.query)?;
        let request = Self::build_request(
            method.clone(),
            url,
            parts.token.as_ref().map(|token| (&token_transport, token)),
            parts.body.as_ref(),
        )?;

        debug!(?request, "sending...");
        let start = Instant::now();
        let response = client.execute(request).await?;
        debug!(?response, "...receiving");
        let result = CallResult::read(method, response, start.elapsed()).await?;

        let status = result.status();
        if !expected_status_codes.contains_status_code(status) {
            return Err(ApiClientError::UnexpectedStatus {
                method: result.method().clone(),
                url: result.url().to_string(),
                expected: expected_status_codes,
                actual: status,
                body: result.as_raw().truncated(),
            });
        }

        if let Some(limit) = max_response_time
            && result.elapsed() > limit
        {
            warn!(elapsed = ?result.elapsed(), ?limit, url = result.url(), "response too slow");
            return Err(ApiClientError::SlowResponse {
                method: result.method().clone(),
                url: result.url().to_string(),
                status,
                elapsed: result.elapsed(),
                limit,
            });
        }

        Ok(result)
    }

    fn build_url(base_uri: &Uri, path: CallPath, query: &CallQuery) -> Result<Url, ApiClientError> {
        let path_resolved = PathResolved::try_from(path)?;
        let base_uri = base_uri.to_string();
        let url = format!(
            "{}/{}",
            base_uri.trim_end_matches('/'),
            path_resolved.path.trim_start_matches('/')
        );
        let mut url = url.parse::<Url>()?;

        if !query.is_empty() {
            let query_string = query.to_query_string()?;
            url.set_query(Some(&query_string));
        }

        Ok(url)
    }

    fn build_request(
        method: Method,
        url: Url,
        token: Option<(&TokenTransport, &SecureString)>,
        body: Option<&CallBody>,
    ) -> Result<Request, ApiClientError> {
        let mut request = Request::new(method, url);
        let req_headers = request.headers_mut();

        if let Some((transport, token)) = token {
            let (name, value) = transport.to_header(token)?;
            req_headers.insert(name, value);
        }

        if let Some(body) = body {
            req_headers.typed_insert(body.content_type.clone());
            *request.body_mut() = Some(Body::from(body.data.clone()));
        }

        Ok(request)
    }
}

/// Status expected by the verb wrappers, following the booking API contract.
pub(super) fn default_status(method: &Method) -> StatusCode {
    if *method == Method::DELETE {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

impl IntoFuture for ApiCall {
    type Output = Result<CallResult, ApiClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}
