use std::future::Future;
use std::net::TcpListener;
use std::time::Duration;

use crate::{RestClient, RestClientBuilder};

/// A server the harness can start in-process on an ephemeral port.
///
/// ```rust,no_run
/// use std::net::TcpListener;
///
/// use booking_harness::test_client::{HealthStatus, TestServer};
/// use booking_harness::{ApiClientError, RestClient};
///
/// #[derive(Debug)]
/// struct BookingServer;
///
/// impl TestServer for BookingServer {
///     type Error = std::io::Error;
///
///     async fn launch(&self, listener: TcpListener) -> Result<(), Self::Error> {
///         listener.set_nonblocking(true)?;
///         let _listener = tokio::net::TcpListener::from_std(listener)?;
///         // serve the booking API here
///         Ok(())
///     }
///
///     async fn is_healthy(&self, client: &mut RestClient) -> Result<HealthStatus, Self::Error> {
///         let status = match client.get("/ping").expect_any_status().await {
///             Ok(result) if result.status().is_success() => HealthStatus::Healthy,
///             _ => HealthStatus::Unhealthy,
///         };
///         Ok(status)
///     }
/// }
/// ```
pub trait TestServer {
    /// Launch or health-check failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serves on the already bound `listener` until the task is aborted.
    fn launch(&self, listener: TcpListener) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Reports whether the server accepts requests.
    ///
    /// The default cannot tell, so the harness only waits for the port to
    /// accept TCP connections.
    fn is_healthy(
        &self,
        _client: &mut RestClient,
    ) -> impl Future<Output = Result<HealthStatus, Self::Error>> + Send {
        std::future::ready(Ok(HealthStatus::Uncheckable))
    }

    /// Client and health-check settings.
    fn config(&self) -> TestServerConfig {
        TestServerConfig::default()
    }
}

/// Outcome of one health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Ready for requests.
    Healthy,
    /// Not ready yet, probe again later.
    Unhealthy,
    /// The server has no health endpoint: fall back to a TCP connection.
    Uncheckable,
}

/// How the [`TestClient`](super::TestClient) talks to the server and waits for it.
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    /// Client settings; the port is always replaced by the bound one.
    pub client: Option<RestClientBuilder>,
    /// First delay between probes.
    pub min_backoff_delay: Duration,
    /// Upper bound of the delay between probes.
    pub max_backoff_delay: Duration,
    /// Randomizes the delays.
    pub backoff_jitter: bool,
    /// Probes after the first one before giving up.
    pub max_retry_attempts: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            client: None,
            min_backoff_delay: Duration::from_millis(10),
            max_backoff_delay: Duration::from_secs(1),
            backoff_jitter: true,
            max_retry_attempts: 10,
        }
    }
}
