use std::fmt::Debug;
use std::time::Duration;

use http::Uri;
use http::uri::{PathAndQuery, Scheme};

use super::{ApiClientError, RequestState, RestClient, TokenTransport};

/// Default maximum response time accepted by the client.
pub const DEFAULT_MAX_RESPONSE_TIME: Duration = Duration::from_secs(5);

/// Default transport timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`RestClient`].
///
/// Defaults to `http://127.0.0.1:80/`, the `token` cookie, a 5 seconds
/// response budget and a 30 seconds transport timeout.
///
/// ```rust
/// use booking_harness::RestClient;
///
/// # fn example() -> Result<(), booking_harness::ApiClientError> {
/// let client = RestClient::builder()
///     .with_base_url("http://localhost:3000")?
///     .build()?;
/// assert_eq!(client.base_uri().to_string(), "http://localhost:3000/");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestClientBuilder {
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: Option<PathAndQuery>,
    token_transport: TokenTransport,
    max_response_time: Option<Duration>,
    request_timeout: Duration,
}

impl RestClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails if the base URI cannot be assembled or the HTTP client cannot be
    /// initialised.
    pub fn build(self) -> Result<RestClient, ApiClientError> {
        let Self {
            scheme,
            host,
            port,
            base_path,
            token_transport,
            max_response_time,
            request_timeout,
        } = self;

        let builder = Uri::builder()
            .scheme(scheme)
            .authority(format!("{host}:{port}"));
        let builder = if let Some(path) = &base_path {
            builder.path_and_query(path.path())
        } else {
            builder.path_and_query("/")
        };
        let base_uri = builder.build()?;

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(RestClient {
            client,
            base_uri,
            token_transport,
            max_response_time,
            request: RequestState::default(),
        })
    }

    /// Sets the HTTP scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the host name or IP address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets a path prepended to every endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidBaseUrl`] if the path is not a valid
    /// URI path.
    pub fn with_base_path<P>(mut self, base_path: P) -> Result<Self, ApiClientError>
    where
        P: TryInto<PathAndQuery>,
        P::Error: Debug + 'static,
    {
        let base_path = base_path
            .try_into()
            .map_err(|err| ApiClientError::InvalidBaseUrl {
                error: format!("{err:?}"),
            })?;
        self.base_path = Some(base_path);
        Ok(self)
    }

    /// Sets scheme, host, port and base path from a full URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidBaseUrl`] if the URL has no host or
    /// uses a scheme other than `http` or `https`.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiClientError> {
        let url = url::Url::parse(base_url)?;
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(ApiClientError::InvalidBaseUrl {
                    error: format!("unsupported scheme '{other}'"),
                });
            }
        };
        let host = url.host_str().ok_or_else(|| ApiClientError::InvalidBaseUrl {
            error: format!("missing host in '{base_url}'"),
        })?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ApiClientError::InvalidBaseUrl {
                error: format!("missing port in '{base_url}'"),
            })?;

        self.scheme = scheme;
        self.host = host.to_string();
        self.port = port;
        let path = url.path().trim_end_matches('/');
        self.base_path = None;
        if path.is_empty() {
            Ok(self)
        } else {
            self.with_base_path(path.to_string())
        }
    }

    /// Chooses how the session token is sent.
    #[must_use]
    pub fn with_token_transport(mut self, token_transport: TokenTransport) -> Self {
        self.token_transport = token_transport;
        self
    }

    /// Sets the maximum accepted response time, `None` to disable the check.
    #[must_use]
    pub fn with_max_response_time(mut self, max_response_time: Option<Duration>) -> Self {
        self.max_response_time = max_response_time;
        self
    }

    /// Sets the transport timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self {
            scheme: Scheme::HTTP,
            host: "127.0.0.1".to_string(),
            port: 80,
            base_path: None,
            token_transport: TokenTransport::default(),
            max_response_time: Some(DEFAULT_MAX_RESPONSE_TIME),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_default_client() {
        let client = RestClientBuilder::default().build().expect("client");

        insta::assert_snapshot!(client.base_uri(), @"http://127.0.0.1:80/");
        assert!(client.request_state().is_empty());
    }

    #[test]
    fn should_build_from_base_url() {
        let client = RestClientBuilder::default()
            .with_base_url("https://restful-booker.herokuapp.com")
            .expect("valid url")
            .build()
            .expect("client");

        insta::assert_snapshot!(client.base_uri(), @"https://restful-booker.herokuapp.com:443/");
    }

    #[test]
    fn should_keep_base_path_from_url() {
        let client = RestClientBuilder::default()
            .with_base_url("http://localhost:3000/api/")
            .expect("valid url")
            .build()
            .expect("client");

        insta::assert_snapshot!(client.base_uri(), @"http://localhost:3000/api");
    }

    #[test]
    fn should_reject_unsupported_scheme() {
        let result = RestClientBuilder::default().with_base_url("ftp://localhost");

        insta::assert_snapshot!(result.expect_err("invalid scheme"), @"Invalid base URL: unsupported scheme 'ftp'");
    }

    #[test]
    fn should_reject_invalid_base_path() {
        let result = RestClientBuilder::default().with_base_path("/with space");

        assert!(matches!(result, Err(ApiClientError::InvalidBaseUrl { .. })));
    }
}
