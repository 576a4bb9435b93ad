use std::future::{Future, IntoFuture};
use std::mem;
use std::time::Duration;

use http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde::de::DeserializeOwned;

mod body;
pub use self::body::CallBody;

mod builder;
pub use self::builder::{DEFAULT_MAX_RESPONSE_TIME, DEFAULT_REQUEST_TIMEOUT, RestClientBuilder};

mod call;
pub use self::call::ApiCall;

mod error;
pub use self::error::ApiClientError;

mod param;
pub use self::param::ParamValue;

mod path;
pub use self::path::CallPath;

mod result;
pub use self::result::{CallResult, RawBody};

mod secure;
pub use self::secure::SecureString;

mod state;
pub use self::state::RequestState;

mod status;
pub use self::status::ExpectedStatusCodes;

mod token;
pub use self::token::{TOKEN_COOKIE, TokenTransport};

#[cfg(test)]
mod tests;

/// A fluent, stateful HTTP client.
///
/// Parameters, token and body accumulate in a [`RequestState`] until a verb
/// method builds an [`ApiCall`]. Building the call moves the state out, so
/// whatever happens to the call afterwards (success, error, or the call being
/// dropped) the next request starts from an empty state.
///
/// Every builder method needs `&mut self`, so a client cannot be shared
/// between tasks; use [`RestClient::fork`] to get one client per task.
///
/// ```rust,no_run
/// use booking_harness::RestClient;
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct Booking { firstname: String }
///
/// # async fn example() -> Result<(), booking_harness::ApiClientError> {
/// let mut client = RestClient::builder()
///     .with_base_url("http://localhost:3000")?
///     .build()?;
///
/// let booking: Booking = client
///     .with_path_param("id", 1)
///     .get("/booking/{id}")
///     .await?
///     .as_json()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RestClient {
    client: reqwest::Client,
    base_uri: Uri,
    token_transport: TokenTransport,
    max_response_time: Option<Duration>,
    request: RequestState,
}

// Create
impl RestClient {
    /// Starts building a client.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Returns a client with the same configuration and connection pool, and
    /// an empty request state.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_uri: self.base_uri.clone(),
            token_transport: self.token_transport.clone(),
            max_response_time: self.max_response_time,
            request: RequestState::default(),
        }
    }

    /// The base URI every endpoint is resolved against.
    pub fn base_uri(&self) -> &Uri {
        &self.base_uri
    }

    /// The state that the next call will use.
    pub fn request_state(&self) -> &RequestState {
        &self.request
    }
}

// Accumulate
impl RestClient {
    /// Attaches the session token. No validation is done.
    pub fn with_token(&mut self, token: impl Into<SecureString>) -> &mut Self {
        self.request.set_token(token.into());
        self
    }

    /// Binds a `{name}` placeholder of the endpoint; the last binding wins.
    pub fn with_path_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> &mut Self {
        self.request.set_path_param(name.into(), value.into());
        self
    }

    /// Binds several placeholders at once.
    pub fn with_path_params<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (name, value) in params {
            self.request.set_path_param(name.into(), value.into());
        }
        self
    }

    /// Adds a query parameter. Repeated names are all sent, in order.
    pub fn with_query_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> &mut Self {
        self.request.add_query_param(name.into(), value.into());
        self
    }

    /// Sets a raw JSON text payload, replacing any previous body.
    pub fn with_body(&mut self, raw: impl Into<String>) -> &mut Self {
        self.request.set_body(CallBody::raw_json(raw));
        self
    }

    /// Serializes a value as the JSON payload, replacing any previous body.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] if the value serializes
    /// to JSON `null`. The request state is discarded in that case.
    pub fn with_json_body<T>(&mut self, value: &T) -> Result<&mut Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        match CallBody::json(value) {
            Ok(body) => {
                self.request.set_body(body);
                Ok(self)
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    fn reset(&mut self) -> RequestState {
        mem::take(&mut self.request)
    }
}

// Execute
impl RestClient {
    /// Builds a call with the verb's default expected status, taking the
    /// current request state.
    pub fn call(&mut self, method: Method, endpoint: &str) -> ApiCall {
        let parts = self.reset().into_parts(endpoint);
        ApiCall::build(
            self.client.clone(),
            self.base_uri.clone(),
            method,
            parts,
            self.token_transport.clone(),
            self.max_response_time,
        )
    }

    /// `GET`, expecting 200.
    pub fn get(&mut self, endpoint: &str) -> ApiCall {
        self.call(Method::GET, endpoint)
    }

    /// `POST`, expecting 200.
    pub fn post(&mut self, endpoint: &str) -> ApiCall {
        self.call(Method::POST, endpoint)
    }

    /// `PUT`, expecting 200.
    pub fn put(&mut self, endpoint: &str) -> ApiCall {
        self.call(Method::PUT, endpoint)
    }

    /// `PATCH`, expecting 200.
    pub fn patch(&mut self, endpoint: &str) -> ApiCall {
        self.call(Method::PATCH, endpoint)
    }

    /// `DELETE`, expecting 201.
    pub fn delete(&mut self, endpoint: &str) -> ApiCall {
        self.call(Method::DELETE, endpoint)
    }

    /// Executes a call and checks its status.
    ///
    /// The request state is taken before this returns, not when the future
    /// is first polled.
    pub fn execute(
        &mut self,
        method: Method,
        endpoint: &str,
        expected: StatusCode,
    ) -> impl Future<Output = Result<CallResult, ApiClientError>> + Send + use<> {
        self.call(method, endpoint)
            .expect_status(expected)
            .into_future()
    }

    /// Executes a call, checks its status and decodes the JSON body.
    pub fn execute_as<T>(
        &mut self,
        method: Method,
        endpoint: &str,
        expected: StatusCode,
    ) -> impl Future<Output = Result<T, ApiClientError>> + Send + use<T>
    where
        T: DeserializeOwned,
    {
        let call = self.execute(method, endpoint, expected);
        async move { call.await?.as_json::<T>() }
    }

    /// Executes a call without any status check.
    pub fn send(
        &mut self,
        method: Method,
        endpoint: &str,
    ) -> impl Future<Output = Result<CallResult, ApiClientError>> + Send + use<> {
        self.call(method, endpoint).expect_any_status().into_future()
    }
}
